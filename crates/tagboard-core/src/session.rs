use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::{HttpCatalog, PostCatalog};
use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::models::{PageInfo, Post, Search};
use crate::pages::{self, PageIndexCache};

pub const NO_PAGE: i32 = -1;

#[derive(Debug)]
struct SessionState {
    /// Bumped whenever the active search is replaced or cleared. Results of
    /// in-flight work tagged with an older generation are discarded on
    /// completion instead of overwriting fresher state.
    generation: u64,
    search: Option<Search>,
    cache: PageIndexCache,
    current_page: i32,
    last_page: Option<PageInfo>,
    posts: Vec<Post>,
    revision: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            generation: 0,
            search: None,
            cache: PageIndexCache::default(),
            current_page: NO_PAGE,
            last_page: None,
            posts: Vec::new(),
            revision: 0,
        }
    }
}

/// A browsing session over the board: one active search, the page-index
/// cache discovered for it, and the currently loaded listing. Cheap to
/// clone; clones share state.
#[derive(Clone)]
pub struct BoardSession {
    catalog: Arc<dyn PostCatalog>,
    page_size: i32,
    chunk_width: i32,
    state: Arc<RwLock<SessionState>>,
}

impl std::fmt::Debug for BoardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardSession")
            .field("page_size", &self.page_size)
            .field("chunk_width", &self.chunk_width)
            .finish_non_exhaustive()
    }
}

impl BoardSession {
    pub fn new(catalog: Arc<dyn PostCatalog>, config: &BoardConfig) -> Self {
        Self {
            catalog,
            page_size: config.page_size,
            chunk_width: config.chunk_width,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    pub fn connect(config: BoardConfig) -> Result<Self> {
        let catalog = Arc::new(HttpCatalog::new(config.clone())?);
        Ok(Self::new(catalog, &config))
    }

    pub fn active_search(&self) -> Option<Search> {
        self.state.read().search.clone()
    }

    pub fn current_page(&self) -> i32 {
        self.state.read().current_page
    }

    pub fn last_page(&self) -> Option<PageInfo> {
        self.state.read().last_page
    }

    pub fn page_count(&self) -> i32 {
        self.state.read().last_page.map(|p| p.no).unwrap_or(0)
    }

    pub fn posts(&self) -> Vec<Post> {
        self.state.read().posts.clone()
    }

    pub fn cached_pages(&self) -> Vec<PageInfo> {
        self.state.read().cache.pages().collect()
    }

    /// Bumped on every committed state change; pollers can compare
    /// revisions instead of diffing state.
    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    /// Page numbers to surface in a paginator around the current page.
    pub fn page_window(&self) -> Vec<i32> {
        let (current, count) = {
            let state = self.state.read();
            (state.current_page, state.last_page.map(|p| p.no).unwrap_or(0))
        };
        pages::visible_window(current, count, self.chunk_width)
    }

    /// Replaces the active search and rebuilds pagination state for it:
    /// clears the page cache, loads the first page, then resolves the final
    /// page so near-end navigation has a tail anchor.
    pub fn search_posts(&self, search: Search) -> Result<()> {
        let generation = {
            let mut state = self.state.write();
            state.generation += 1;
            state.search = Some(search);
            state.cache.reset();
            state.current_page = NO_PAGE;
            state.last_page = None;
            state.posts.clear();
            state.revision += 1;
            state.generation
        };

        self.load_page_at(1, generation)?;
        self.refresh_last_page(generation);
        Ok(())
    }

    /// Re-runs the unchanged active search, picking up membership changes
    /// after an external mutation.
    pub fn refresh(&self) -> Result<()> {
        match self.active_search() {
            Some(search) => self.search_posts(search),
            None => Ok(()),
        }
    }

    pub fn initialize(&self) -> Result<()> {
        if self.active_search().is_some() {
            return Ok(());
        }
        self.search_posts(Search::default())
    }

    pub fn clear_search(&self) {
        let mut state = self.state.write();
        state.generation += 1;
        state.search = None;
        state.cache.reset();
        state.current_page = NO_PAGE;
        state.last_page = None;
        state.posts.clear();
        state.revision += 1;
    }

    /// Navigates to `page`. Returns `Ok(false)` and leaves the previous
    /// listing untouched when the page cannot be resolved (past the end of
    /// the result set, backend unreachable, or no active search). Selecting
    /// the current page again is a no-op that issues no request.
    pub fn load_page(&self, page: i32) -> Result<bool> {
        let generation = self.state.read().generation;
        self.load_page_at(page, generation)
    }

    /// Navigates to the final page, resolving it first if needed.
    pub fn load_last_page(&self) -> Result<bool> {
        let (generation, known) = {
            let state = self.state.read();
            (state.generation, state.last_page)
        };

        let last = match known {
            Some(info) => Some(info),
            None => self.refresh_last_page(generation),
        };
        match last {
            Some(info) => self.load_page_at(info.no, generation),
            None => Ok(false),
        }
    }

    /// Resolves the cursor for `page`, filling the page-index cache from the
    /// nearest known anchor if needed. `None` is a normal outcome for pages
    /// past the end of the result set.
    pub fn get_page(&self, page: i32) -> Result<Option<PageInfo>> {
        ensure_valid_page(page)?;
        let (generation, search) = {
            let state = self.state.read();
            (state.generation, state.search.clone())
        };
        match search {
            Some(search) => Ok(self.resolve_page(&search, page, generation)),
            None => Ok(None),
        }
    }

    /// Fetches the true final page for the active search and seeds the cache
    /// with it. Degrades to `None` when the backend cannot answer.
    pub fn calculate_last_page(&self) -> Option<PageInfo> {
        let generation = self.state.read().generation;
        self.refresh_last_page(generation)
    }

    fn load_page_at(&self, page: i32, generation: u64) -> Result<bool> {
        ensure_valid_page(page)?;

        let (search, current) = {
            let state = self.state.read();
            if state.generation != generation {
                return Ok(false);
            }
            (state.search.clone(), state.current_page)
        };
        let Some(search) = search else {
            return Ok(false);
        };
        if current == page {
            return Ok(true);
        }

        let Some(info) = self.resolve_page(&search, page, generation) else {
            return Ok(false);
        };

        let posts = self.catalog.fetch_posts(&search, info.cursor, self.page_size)?;

        let mut state = self.state.write();
        if state.generation != generation {
            tracing::debug!(page, "discarding navigation for a replaced search");
            return Ok(false);
        }
        state.current_page = page;
        state.posts = posts;
        state.revision += 1;
        Ok(true)
    }

    fn resolve_page(&self, search: &Search, page: i32, generation: u64) -> Option<PageInfo> {
        let (hit, plan) = {
            let state = self.state.read();
            if state.generation != generation {
                return None;
            }
            (
                state.cache.get(page),
                pages::find_nearest_page(&state.cache, page, self.chunk_width),
            )
        };
        if let Some(info) = hit {
            return Some(info);
        }

        let request = match plan {
            Some(plan) => {
                tracing::debug!(page, anchor = plan.anchor.no, length = plan.length, "filling page index from anchor");
                self.catalog.calculate_pages(search, Some(plan.anchor), plan.length)
            }
            None => {
                tracing::debug!(page, count = page + self.chunk_width, "filling page index from the start");
                self.catalog.calculate_pages(search, None, page + self.chunk_width)
            }
        };
        let fetched = match request {
            Ok(fetched) => fetched,
            Err(err) => {
                tracing::warn!(page, error = %err, "page walk failed, treating page as unavailable");
                return None;
            }
        };

        let mut state = self.state.write();
        if state.generation != generation {
            tracing::debug!(page, "discarding page walk for a replaced search");
            return None;
        }
        state.cache.merge(fetched);
        state.revision += 1;
        // Still absent past the end of the result set; that is an answer,
        // not an error.
        state.cache.get(page)
    }

    fn refresh_last_page(&self, generation: u64) -> Option<PageInfo> {
        let search = {
            let state = self.state.read();
            if state.generation != generation {
                return None;
            }
            state.search.clone()?
        };

        let info = match self.catalog.calculate_last_page(&search) {
            Ok(info) => info,
            Err(err) => {
                tracing::warn!(error = %err, "last page lookup failed");
                return None;
            }
        };

        let mut state = self.state.write();
        if state.generation != generation {
            return None;
        }
        state.last_page = Some(info);
        state.cache.merge([info]);
        state.revision += 1;
        Some(info)
    }
}

fn ensure_valid_page(page: i32) -> Result<()> {
    if page < 1 {
        return Err(BoardError::Validation(format!(
            "page numbers start at 1, got {page}"
        )));
    }
    Ok(())
}
