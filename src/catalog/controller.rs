//! Fetch pipeline for the catalog listing.
//!
//! `request -> StoreApi::list_products -> CatalogState::apply`. The TUI runs
//! [`fetch_page`] inside async handlers; the CLI and tests drive a
//! [`CatalogController`] one transition at a time.

use crate::api::StoreApi;
use crate::api::types::{PageResult, Product};
use crate::catalog::state::{CatalogState, FetchRequest};
use crate::error::Result;
use crate::notify::Toast;

/// A finished request together with its result
pub struct FetchOutcome {
    pub request: FetchRequest,
    pub result: Result<PageResult<Product>>,
}

pub async fn fetch_page<A: StoreApi>(api: &A, request: FetchRequest) -> FetchOutcome {
    tracing::debug!(
        generation = request.generation,
        mode = %request.mode,
        query = %request.query.to_query_string(),
        "fetching products"
    );
    let result = api.list_products(&request.query).await;
    FetchOutcome { request, result }
}

pub struct CatalogController<A> {
    api: A,
    state: CatalogState,
}

impl<A: StoreApi> CatalogController<A> {
    pub fn new(api: A, state: CatalogState) -> Self {
        Self { api, state }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn into_state(self) -> CatalogState {
        self.state
    }

    /// Apply a transition and run the request it produces.
    ///
    /// Returns the toast for a failed fetch; a refused transition is a no-op.
    pub async fn update<F>(&mut self, transition: F) -> Option<Toast>
    where
        F: FnOnce(&mut CatalogState) -> Option<FetchRequest>,
    {
        let request = transition(&mut self.state)?;
        let outcome = fetch_page(&self.api, request).await;
        self.state.apply(outcome.request, outcome.result)
    }

    /// Like [`update`](Self::update), but hands a failed fetch back as an error
    pub async fn try_update<F>(&mut self, transition: F) -> Result<bool>
    where
        F: FnOnce(&mut CatalogState) -> Option<FetchRequest>,
    {
        let Some(request) = transition(&mut self.state) else {
            return Ok(false);
        };
        let outcome = fetch_page(&self.api, request).await;
        match outcome.result {
            Ok(page) => {
                self.state.record_page(outcome.request, page);
                Ok(true)
            }
            Err(e) => {
                self.state.record_failure(&outcome.request, &e);
                Err(e)
            }
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.try_update(|s| Some(s.load())).await.map(|_| ())
    }

    /// Keep appending pages until the listing is exhausted or `max_pages`
    /// pages are loaded.
    ///
    /// Stops at the first failed page and returns its toast. Pages loaded
    /// before the failure stay in the state.
    pub async fn load_all(&mut self, max_pages: Option<u32>) -> Option<Toast> {
        while max_pages.is_none_or(|max| self.state.page() < max) {
            let request = self.state.load_more()?;
            let outcome = fetch_page(&self.api, request).await;
            if let Some(toast) = self.state.apply(outcome.request, outcome.result) {
                return Some(toast);
            }
        }
        None
    }
}
