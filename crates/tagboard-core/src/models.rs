use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Active include/exclude tag filter. Two searches are equal iff their tag
/// sets are equal as sets; ordering of the input tags is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Search {
    pub tags: BTreeSet<String>,
    pub exclude_tags: BTreeSet<String>,
}

impl Search {
    pub fn new<I, E, S>(tags: I, exclude_tags: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            exclude_tags: exclude_tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.exclude_tags.is_empty()
    }
}

/// Opaque, backend-assigned position marker. The backend guarantees a total
/// order over items; the client only compares cursors for equality and
/// passes them back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(i64);

impl Cursor {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub(crate) fn as_query_value(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A page number paired with the cursor of that page's first item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub no: i32,
    pub cursor: Cursor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub filename: String,
    pub size: i64,
    pub width: i32,
    pub height: i32,
    pub hash: String,
    pub ext: String,
    pub tn_ext: String,
    #[serde(default)]
    pub tags: Vec<String>,
}
