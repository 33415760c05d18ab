use std::collections::BTreeMap;
use std::ops::Bound;

use crate::models::PageInfo;

/// Sparse page-number -> PageInfo mapping for the active search. Entries are
/// only ever added within a search generation; a new search clears the whole
/// cache at once.
#[derive(Debug, Clone, Default)]
pub struct PageIndexCache {
    entries: BTreeMap<i32, PageInfo>,
}

impl PageIndexCache {
    pub fn get(&self, page: i32) -> Option<PageInfo> {
        self.entries.get(&page).copied()
    }

    /// Upserts by page number; the last write for a page wins. Backend
    /// responses for the same page are expected to be identical, so replaying
    /// a fill is a no-op.
    pub fn merge(&mut self, pages: impl IntoIterator<Item = PageInfo>) {
        for page in pages {
            self.entries.insert(page.no, page);
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pages(&self) -> impl Iterator<Item = PageInfo> + '_ {
        self.entries.values().copied()
    }

    fn nearest(&self, target: i32) -> Option<PageInfo> {
        let below = self.entries.range(..=target).next_back().map(|(_, p)| *p);
        let above = self
            .entries
            .range((Bound::Excluded(target), Bound::Unbounded))
            .next()
            .map(|(_, p)| *p);

        match (below, above) {
            (Some(b), Some(a)) => {
                // Equidistant candidates resolve to the lower page.
                if (target - b.no) <= (a.no - target) {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (Some(b), None) => Some(b),
            (None, Some(a)) => Some(a),
            (None, None) => None,
        }
    }

    fn first_above(&self, target: i32) -> Option<i32> {
        self.entries
            .range((Bound::Excluded(target), Bound::Unbounded))
            .next()
            .map(|(no, _)| *no)
    }

    fn last_below(&self, target: i32) -> Option<i32> {
        self.entries.range(..target).next_back().map(|(no, _)| *no)
    }
}

/// A single range-fill request: walk `length` pages from `anchor`. Negative
/// lengths walk backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillPlan {
    pub anchor: PageInfo,
    pub length: i32,
}

/// Picks the cached page closest to `target` and computes the span to
/// request from it. The span stops at the first already-known page beyond
/// the target, or `width` pages past it, whichever comes first. Returns
/// `None` on an empty cache; the caller then has to fill from the beginning.
pub fn find_nearest_page(cache: &PageIndexCache, target: i32, width: i32) -> Option<FillPlan> {
    let anchor = cache.nearest(target)?;

    let length = if anchor.no < target {
        let stop_at = cache.first_above(target);
        let to_page = match stop_at {
            Some(no) => no.min(target + width),
            None => target + width,
        };
        to_page - anchor.no
    } else {
        let start_at = cache.last_below(target);
        let from_page = match start_at {
            Some(no) => no.max(target - width),
            None => target - width,
        };
        from_page - anchor.no
    };

    Some(FillPlan { anchor, length })
}

/// Window of page numbers to surface around the current page, `width` pages
/// wide, clamped to `[1, last]` and widened toward the opposite edge when
/// the clamp cuts it short.
pub fn visible_window(current: i32, last: i32, width: i32) -> Vec<i32> {
    let half = width / 2;

    let mut first_page = (current - half).max(1);
    let mut last_page = (current + half).min(last);

    let diff = last_page - first_page;
    if diff < width {
        if first_page == 1 {
            last_page = (last_page + (width - diff)).min(last);
        } else {
            first_page = (first_page - (width - diff)).max(1);
        }
    }

    (first_page..=last_page).collect()
}
