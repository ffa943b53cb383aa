//! Async handler factories and key dispatch for the catalog browser.
//!
//! Factory functions accept `&mut Hooks` so they can call
//! `hooks.use_async_handler()` internally.

use std::sync::Arc;
use std::time::Instant;

use iocraft::hooks::UseAsyncHandler;
use iocraft::prelude::{Handler, Hooks, State};

use crate::api::HttpStoreApi;
use crate::catalog::{
    CatalogState, Debouncer, FetchRequest, PaginationStrategy, Sidebar, fetch_page, load_sidebar,
};
use crate::notify::{Notifications, TOAST_TTL};

use super::keymap::BrowseAction;
use super::navigation::ListCursor;

/// Runs one catalog fetch and merges the outcome into the listing state
pub fn create_fetch_handler(
    hooks: &mut Hooks,
    api: &Arc<HttpStoreApi>,
    catalog: &State<CatalogState>,
    notifications: &State<Notifications>,
) -> Handler<FetchRequest> {
    let api = api.clone();
    let catalog = *catalog;
    let notifications = *notifications;

    hooks.use_async_handler(move |request: FetchRequest| {
        let api = api.clone();
        let mut catalog = catalog;
        let mut notifications = notifications;

        async move {
            let outcome = fetch_page(api.as_ref(), request).await;
            let toast = catalog.write().apply(outcome.request, outcome.result);
            if let Some(toast) = toast {
                notifications.write().push(toast);
            }
        }
    })
}

/// Applies a settled search term. Fired by the debouncer.
pub fn create_search_handler(
    hooks: &mut Hooks,
    catalog: &State<CatalogState>,
    cursor: &State<ListCursor>,
    fetch_handler: &Handler<FetchRequest>,
) -> Handler<String> {
    let catalog = *catalog;
    let cursor = *cursor;
    let fetch_handler = fetch_handler.clone();

    hooks.use_async_handler(move |term: String| {
        let mut catalog = catalog;
        let mut cursor = cursor;
        let fetch_handler = fetch_handler.clone();

        async move {
            let term = term.trim().to_string();
            if catalog.read().query().search_term == term {
                return;
            }
            let request = catalog.write().set_search(term);
            cursor.set(ListCursor::default());
            fetch_handler(request);
        }
    })
}

pub fn create_sidebar_handler(
    hooks: &mut Hooks,
    api: &Arc<HttpStoreApi>,
    sidebar: &State<Option<Sidebar>>,
    limit: u32,
) -> Handler<()> {
    let api = api.clone();
    let sidebar = *sidebar;

    hooks.use_async_handler(move |()| {
        let api = api.clone();
        let mut sidebar = sidebar;

        async move {
            let lists = load_sidebar(api.as_ref(), limit).await;
            sidebar.set(Some(lists));
        }
    })
}

/// Drops expired toasts once the newest one has been shown long enough
pub fn create_toast_expiry_handler(
    hooks: &mut Hooks,
    notifications: &State<Notifications>,
) -> Handler<()> {
    let notifications = *notifications;

    hooks.use_async_handler(move |()| {
        let mut notifications = notifications;

        async move {
            tokio::time::sleep(TOAST_TTL).await;
            notifications.write().prune(Instant::now());
        }
    })
}

/// Everything a key action can touch
pub struct BrowseContext {
    pub catalog: State<CatalogState>,
    pub cursor: State<ListCursor>,
    pub search_text: State<String>,
    pub scheduled_text: State<String>,
    pub search_focused: State<bool>,
    pub debouncer: State<Debouncer>,
    pub notifications: State<Notifications>,
    pub show_sidebar: State<bool>,
    pub should_exit: State<bool>,
    pub fetch: Handler<FetchRequest>,
    pub strategy: PaginationStrategy,
    pub list_rows: usize,
}

impl BrowseContext {
    fn restart(&mut self, request: FetchRequest) {
        self.cursor.set(ListCursor::default());
        (self.fetch)(request);
    }

    fn goto_page(&mut self, page: u32) {
        if self.strategy != PaginationStrategy::PageButtons {
            return;
        }
        let request = self.catalog.write().jump_to_page(page);
        if let Some(request) = request {
            self.restart(request);
        }
    }

    /// Search for `text` right away, skipping the quiet period
    fn search_now(&mut self, text: String) {
        self.debouncer.write().cancel();
        self.scheduled_text.set(text.clone());
        let term = text.trim().to_string();
        if self.catalog.read().query().search_term == term {
            return;
        }
        let request = self.catalog.write().set_search(term);
        self.restart(request);
    }
}

pub fn dispatch(action: BrowseAction, ctx: &mut BrowseContext) {
    let count = ctx.catalog.read().items().len();
    let rows = ctx.list_rows;

    match action {
        BrowseAction::MoveDown => ctx.cursor.write().down(count, rows),
        BrowseAction::MoveUp => ctx.cursor.write().up(),
        BrowseAction::GoToTop => ctx.cursor.write().top(),
        BrowseAction::GoToBottom => ctx.cursor.write().bottom(count, rows),
        BrowseAction::PageDown => ctx.cursor.write().page_down(count, rows),
        BrowseAction::PageUp => ctx.cursor.write().page_up(rows),

        BrowseAction::NextPage => match ctx.strategy {
            PaginationStrategy::PageButtons => {
                let page = ctx.catalog.read().page();
                ctx.goto_page(page + 1);
            }
            PaginationStrategy::InfiniteScroll => {
                let request = ctx.catalog.write().load_more();
                if let Some(request) = request {
                    (ctx.fetch)(request);
                }
            }
        },
        BrowseAction::PrevPage => {
            let page = ctx.catalog.read().page();
            if page > 1 {
                ctx.goto_page(page - 1);
            }
        }
        BrowseAction::JumpToPage(page) => ctx.goto_page(page),

        BrowseAction::FocusSearch => ctx.search_focused.set(true),
        BrowseAction::SubmitSearch => {
            ctx.search_focused.set(false);
            let text = ctx.search_text.read().clone();
            ctx.search_now(text);
        }
        BrowseAction::ClearSearchAndExit => {
            ctx.search_focused.set(false);
            ctx.search_text.set(String::new());
            ctx.search_now(String::new());
        }

        BrowseAction::CycleSort => {
            let next = ctx.catalog.read().query().sort_by.next();
            let request = ctx.catalog.write().set_sort_by(next);
            ctx.restart(request);
        }
        BrowseAction::ToggleSortOrder => {
            let request = ctx.catalog.write().toggle_sort_order();
            ctx.restart(request);
        }
        BrowseAction::ClearFilters => {
            let request = ctx.catalog.write().clear_filters();
            ctx.restart(request);
        }
        BrowseAction::Refresh => {
            let request = ctx.catalog.write().load();
            ctx.restart(request);
        }

        BrowseAction::ToggleSidebar => {
            let shown = ctx.show_sidebar.get();
            ctx.show_sidebar.set(!shown);
        }
        BrowseAction::DismissToast => ctx.notifications.set(Notifications::new()),
        BrowseAction::Quit => ctx.should_exit.set(true),
    }
}
