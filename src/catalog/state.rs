//! Catalog listing state machine.
//!
//! [`CatalogState`] owns the query, the accumulated product list and the
//! pagination totals. Every mutation returns the [`FetchRequest`] the caller
//! must dispatch; the response comes back through [`CatalogState::apply`].
//! Requests are never aborted. Instead each replace-mode request bumps a
//! generation counter and responses tagged with an older generation are
//! dropped on arrival.

use std::collections::HashSet;
use std::fmt;

use crate::api::types::{PageResult, Product};
use crate::catalog::query::{CatalogFilters, CatalogQuery, FilterForm, SortKey, SortOrder};
use crate::error::{Result, ShopError};
use crate::notify::Toast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// How a response is merged into the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Replace,
    Append,
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMode::Replace => write!(f, "replace"),
            FetchMode::Append => write!(f, "append"),
        }
    }
}

/// A listing request produced by a state transition
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub generation: u64,
    pub mode: FetchMode,
    pub query: CatalogQuery,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    query: CatalogQuery,
    items: Vec<Product>,
    phase: Phase,
    total_elements: u64,
    total_pages: u32,
    /// Last page whose response was merged, 0 before the first success
    loaded_page: u32,
    generation: u64,
    error: Option<String>,
}

impl CatalogState {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: CatalogQuery::new(page_size),
            ..Default::default()
        }
    }

    pub fn with_query(query: CatalogQuery) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Message of the last failed fetch while in [`Phase::Error`]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.query.page < self.total_pages
    }

    /// Initial fetch of the first page
    pub fn load(&mut self) -> FetchRequest {
        self.restart()
    }

    pub fn set_search(&mut self, term: impl Into<String>) -> FetchRequest {
        self.query.search_term = term.into();
        self.restart()
    }

    pub fn set_sort_by(&mut self, key: SortKey) -> FetchRequest {
        self.query.sort_by = key;
        self.restart()
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> FetchRequest {
        self.query.sort_order = order;
        self.restart()
    }

    pub fn toggle_sort_order(&mut self) -> FetchRequest {
        self.query.sort_order = self.query.sort_order.toggle();
        self.restart()
    }

    /// Replace the filters. Invalid filters are rejected and leave the
    /// state untouched.
    pub fn set_filters(&mut self, filters: CatalogFilters) -> Result<FetchRequest> {
        filters.validate()?;
        self.query.filters = filters;
        Ok(self.restart())
    }

    /// Parse and apply the filter form
    pub fn submit_filter_form(&mut self, form: &FilterForm) -> Result<FetchRequest> {
        let filters = CatalogFilters::from_form(form)?;
        self.set_filters(filters)
    }

    pub fn clear_filters(&mut self) -> FetchRequest {
        self.query.filters = CatalogFilters::default();
        self.restart()
    }

    /// Advance to the next page in append mode.
    ///
    /// Refused while a fetch is in flight or when the last page is loaded.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if self.is_loading() || !self.has_more() {
            return None;
        }
        self.query.page += 1;
        self.phase = Phase::Loading;
        self.error = None;
        Some(self.request(FetchMode::Append))
    }

    /// Jump to an absolute page in replace mode.
    ///
    /// Pages outside `1..=max(total_pages, 1)` are refused.
    pub fn jump_to_page(&mut self, page: u32) -> Option<FetchRequest> {
        if page == 0 || page > self.total_pages.max(1) {
            tracing::debug!(page, total = self.total_pages, "refusing out-of-range page");
            return None;
        }
        self.generation += 1;
        self.query.page = page;
        self.phase = Phase::Loading;
        self.error = None;
        Some(self.request(FetchMode::Replace))
    }

    /// Merge a completed fetch. Returns a toast when the fetch failed.
    pub fn apply(
        &mut self,
        request: FetchRequest,
        result: Result<PageResult<Product>>,
    ) -> Option<Toast> {
        match result {
            Ok(page) => {
                self.record_page(request, page);
                None
            }
            Err(err) => self.record_failure(&request, &err),
        }
    }

    /// Merge a successful response
    pub fn record_page(&mut self, request: FetchRequest, page: PageResult<Product>) {
        if self.is_stale(&request) {
            return;
        }

        match request.mode {
            FetchMode::Replace => {
                self.items.clear();
                merge_unique(&mut self.items, page.items);
            }
            FetchMode::Append => merge_unique(&mut self.items, page.items),
        }
        self.total_elements = page.total_elements;
        self.total_pages = page.total_pages;
        self.loaded_page = request.query.page;
        self.phase = Phase::Success;
        self.error = None;
    }

    /// Record a failed response and build the toast describing it
    pub fn record_failure(&mut self, request: &FetchRequest, err: &ShopError) -> Option<Toast> {
        if self.is_stale(request) {
            return None;
        }

        tracing::warn!(mode = %request.mode, page = request.query.page, "product fetch failed: {err}");
        match request.mode {
            FetchMode::Replace => {
                self.items.clear();
                self.total_elements = 0;
                self.total_pages = 0;
                self.loaded_page = 0;
            }
            FetchMode::Append => {
                self.query.page = self.loaded_page.max(1);
            }
        }
        self.phase = Phase::Error;
        self.error = Some(err.to_string());
        Some(Toast::from_error("Failed to load products", err))
    }

    fn is_stale(&self, request: &FetchRequest) -> bool {
        if request.generation != self.generation {
            tracing::debug!(
                stale = request.generation,
                current = self.generation,
                "discarding superseded product response"
            );
            return true;
        }
        false
    }

    fn restart(&mut self) -> FetchRequest {
        self.generation += 1;
        self.query.page = 1;
        self.items.clear();
        self.loaded_page = 0;
        self.phase = Phase::Loading;
        self.error = None;
        self.request(FetchMode::Replace)
    }

    fn request(&self, mode: FetchMode) -> FetchRequest {
        FetchRequest {
            generation: self.generation,
            mode,
            query: self.query.clone(),
        }
    }
}

/// Append products whose id is not yet present
fn merge_unique(items: &mut Vec<Product>, incoming: Vec<Product>) {
    let mut seen: HashSet<u64> = items.iter().map(|p| p.id).collect();
    items.extend(incoming.into_iter().filter(|p| seen.insert(p.id)));
}
