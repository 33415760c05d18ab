use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::models::{Cursor, PageInfo, Post, Search};
use crate::retry;

/// Backend boundary consumed by the pagination engine. Implementations walk
/// the board's listing in cursor order; the engine never interprets cursors
/// beyond handing them back.
pub trait PostCatalog: Send + Sync {
    /// Ordered post listing starting at `cursor`.
    fn fetch_posts(&self, search: &Search, cursor: Cursor, limit: i32) -> Result<Vec<Post>>;

    /// Walk of `count` pages starting at (and including) `origin`, or from
    /// the beginning of the result set when no origin is given. Negative
    /// counts walk backward. Walks are truncated at the result-set
    /// boundaries, so fewer pages than requested may come back.
    fn calculate_pages(
        &self,
        search: &Search,
        origin: Option<PageInfo>,
        count: i32,
    ) -> Result<Vec<PageInfo>>;

    fn calculate_last_page(&self, search: &Search) -> Result<PageInfo>;

    fn get_post(&self, id: i64) -> Result<Post>;
}

pub struct HttpCatalog {
    config: BoardConfig,
    http: Client,
}

impl std::fmt::Debug for HttpCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalog")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpCatalog {
    pub fn new(config: BoardConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(BoardError::Config("board base URL is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        let resp = self.http.get(url).query(params).send()?;
        let status = resp.status();
        if status.as_u16() == 404 {
            return Err(BoardError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(BoardError::Backend(status.as_u16()));
        }
        Ok(resp.json()?)
    }

    fn with_retry<T>(&self, operation: &str, call: impl Fn() -> Result<T>) -> Result<T> {
        let mut attempt = 1;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(err) if retry::should_retry(attempt) && is_transient(&err) => {
                    let delay = retry::backoff_ms(operation, attempt);
                    tracing::warn!(operation, attempt, delay_ms = delay, error = %err, "board request failed, retrying");
                    thread::sleep(Duration::from_millis(delay));
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

fn is_transient(err: &BoardError) -> bool {
    match err {
        BoardError::Http(_) => true,
        BoardError::Backend(status) => *status >= 500,
        _ => false,
    }
}

impl PostCatalog for HttpCatalog {
    fn fetch_posts(&self, search: &Search, cursor: Cursor, limit: i32) -> Result<Vec<Post>> {
        let mut params = search_params(search);
        params.push(("sid", cursor.as_query_value()));
        params.push(("limit", limit.to_string()));
        self.get_json("/items", &params)
    }

    fn calculate_pages(
        &self,
        search: &Search,
        origin: Option<PageInfo>,
        count: i32,
    ) -> Result<Vec<PageInfo>> {
        let params = pages_params(search, self.config.page_size, count, origin);
        self.with_retry("pages", || self.get_json("/items/pages", &params))
    }

    fn calculate_last_page(&self, search: &Search) -> Result<PageInfo> {
        let mut params = search_params(search);
        params.push(("page_size", self.config.page_size.to_string()));
        self.with_retry("last_page", || self.get_json("/items/pages/last", &params))
    }

    fn get_post(&self, id: i64) -> Result<Post> {
        self.get_json(&format!("/items/{id}"), &[])
            .map_err(|err| match err {
                BoardError::NotFound(_) => BoardError::NotFound(format!("post {id}")),
                other => other,
            })
    }
}

fn join_tags(tags: &BTreeSet<String>) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.iter().cloned().collect::<Vec<_>>().join(","))
    }
}

/// Tag sets are comma-joined; empty sets are omitted entirely.
fn search_params(search: &Search) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(tags) = join_tags(&search.tags) {
        params.push(("tags", tags));
    }
    if let Some(exclude) = join_tags(&search.exclude_tags) {
        params.push(("exclude_tags", exclude));
    }
    params
}

fn pages_params(
    search: &Search,
    page_size: i32,
    count: i32,
    origin: Option<PageInfo>,
) -> Vec<(&'static str, String)> {
    let mut params = search_params(search);
    params.push(("page_size", page_size.to_string()));
    params.push(("count", count.to_string()));
    if let Some(origin) = origin {
        params.push(("origin_page", origin.no.to_string()));
        params.push(("origin_cursor", origin.cursor.as_query_value()));
    }
    params
}
