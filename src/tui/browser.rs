//! Interactive catalog browser
//!
//! Wide terminals get numbered page buttons and the sidebar lists; narrow
//! ones switch to infinite scroll, fetching the next page once the end of
//! the list comes into view.

use std::sync::Arc;
use std::time::{Duration, Instant};

use iocraft::prelude::*;

use crate::api::{HttpStoreApi, Product};
use crate::catalog::{
    CatalogQuery, CatalogState, Debouncer, PageButtons, PaginationStrategy, Phase, Sentinel,
    Sidebar,
};
use crate::config::{CatalogConfig, Config};
use crate::notify::Notifications;

use super::components::{
    Footer, Header, InlineSearchBox, PageBar, ProductList, SidebarPane, catalog_shortcuts,
    render_toast, search_shortcuts,
};
use super::handlers::{
    BrowseContext, create_fetch_handler, create_search_handler, create_sidebar_handler,
    create_toast_expiry_handler, dispatch,
};
use super::keymap::key_to_action;
use super::navigation::ListCursor;

const SIDEBAR_WIDTH: u16 = 34;
/// Header, search line, list borders, pager and footer
const CHROME_ROWS: u16 = 7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrowserSettings {
    /// Below this width the browser uses infinite scroll
    pub mobile_breakpoint: u16,
    pub search_debounce: Duration,
    pub sidebar_limit: u32,
    /// Page size when no starting query is given
    pub page_size: u32,
}

impl BrowserSettings {
    pub fn from_config(config: &Config) -> Self {
        Self::from_catalog(&config.catalog)
    }

    fn from_catalog(catalog: &CatalogConfig) -> Self {
        Self {
            mobile_breakpoint: catalog.mobile_breakpoint,
            search_debounce: Duration::from_millis(catalog.search_debounce_ms),
            sidebar_limit: catalog.sidebar_limit,
            page_size: catalog.page_size,
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self::from_catalog(&CatalogConfig::default())
    }
}

#[derive(Default, Props)]
pub struct CatalogBrowserProps {
    pub api: Option<Arc<HttpStoreApi>>,
    /// Starting query, e.g. from command-line filters
    pub query: Option<CatalogQuery>,
    pub settings: BrowserSettings,
    /// Signed-in user shown in the header
    pub user: Option<String>,
}

/// Status line at the bottom of the list in infinite-scroll mode
fn sentinel_text(state: &CatalogState) -> Option<String> {
    if state.items().is_empty() {
        return None;
    }
    Some(match state.phase() {
        Phase::Loading => "Loading more...".to_string(),
        Phase::Error => "Could not load more. Press n to retry".to_string(),
        _ if state.has_more() => format!(
            "{} of {} shown",
            state.items().len(),
            state.total_elements()
        ),
        _ => "End of results".to_string(),
    })
}

/// Text shown in place of the list when there is nothing to list
fn placeholder_text(state: &CatalogState) -> Option<String> {
    if !state.items().is_empty() {
        return None;
    }
    match state.phase() {
        Phase::Idle | Phase::Loading => Some("Loading products...".to_string()),
        Phase::Error => Some(
            state
                .error()
                .map(|e| format!("Failed to load products: {e}"))
                .unwrap_or_else(|| "Failed to load products".to_string()),
        ),
        Phase::Success if state.query().search_term.is_empty() => {
            Some("No products found".to_string())
        }
        Phase::Success => Some(format!(
            "No products match \"{}\"",
            state.query().search_term
        )),
    }
}

#[component]
pub fn CatalogBrowser<'a>(props: &CatalogBrowserProps, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let settings = props.settings;

    let initial_query = props.query.clone();
    let page_size = settings.page_size;
    let mut catalog: State<CatalogState> = hooks.use_state(move || match initial_query {
        Some(query) => CatalogState::with_query(query),
        None => CatalogState::new(page_size),
    });
    let cursor = hooks.use_state(ListCursor::default);
    let initial_search = props
        .query
        .as_ref()
        .map(|q| q.search_term.clone())
        .unwrap_or_default();
    let search_text = hooks.use_state({
        let initial = initial_search.clone();
        move || initial
    });
    let mut scheduled_text = hooks.use_state(move || initial_search);
    let search_focused = hooks.use_state(|| false);
    let mut debouncer = hooks.use_state(move || Debouncer::new(settings.search_debounce));
    let notifications: State<Notifications> = hooks.use_state(Notifications::new);
    let sidebar: State<Option<Sidebar>> = hooks.use_state(|| None);
    let show_sidebar = hooks.use_state(|| true);
    let should_exit = hooks.use_state(|| false);
    let mut fetch_started = hooks.use_state(|| false);
    let mut watched_toast: State<Option<Instant>> = hooks.use_state(|| None);

    let Some(api) = props.api.clone() else {
        return element! {
            View(width: width, height: height, align_items: AlignItems::Center, justify_content: JustifyContent::Center) {
                Text(content: "No store connection configured")
            }
        };
    };

    let fetch_handler = create_fetch_handler(&mut hooks, &api, &catalog, &notifications);
    let search_handler = create_search_handler(&mut hooks, &catalog, &cursor, &fetch_handler);
    let sidebar_handler =
        create_sidebar_handler(&mut hooks, &api, &sidebar, settings.sidebar_limit);
    let expiry_handler = create_toast_expiry_handler(&mut hooks, &notifications);

    let strategy = PaginationStrategy::for_width(width, settings.mobile_breakpoint);
    let toast = notifications.read().current().cloned();
    let toast_rows = if toast.is_some() { 2 } else { 0 };
    let list_rows = height.saturating_sub(CHROME_ROWS + toast_rows).max(1) as usize;

    let mut ctx = BrowseContext {
        catalog,
        cursor,
        search_text,
        scheduled_text,
        search_focused,
        debouncer,
        notifications,
        show_sidebar,
        should_exit,
        fetch: fetch_handler.clone(),
        strategy,
        list_rows,
    };

    hooks.use_terminal_events({
        move |event| match event {
            TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) if kind != KeyEventKind::Release => {
                if let Some(action) = key_to_action(code, modifiers, ctx.search_focused.get()) {
                    dispatch(action, &mut ctx);
                }
            }
            _ => {}
        }
    });

    if !fetch_started.get() {
        fetch_started.set(true);
        let request = catalog.write().load();
        fetch_handler(request);
        sidebar_handler(());
    }

    // Debounce typing: each edit replaces the pending search
    let typed = search_text.read().clone();
    if typed != *scheduled_text.read() {
        scheduled_text.set(typed.clone());
        let search_handler = search_handler.clone();
        debouncer.write().schedule(move || search_handler(typed));
    }

    let toast_stamp = toast.as_ref().map(|t| t.timestamp);
    if toast_stamp != watched_toast.get() {
        watched_toast.set(toast_stamp);
        if toast_stamp.is_some() {
            expiry_handler(());
        }
    }

    let item_count = catalog.read().items().len();
    let mut view_cursor = cursor.get();
    view_cursor.clamp(item_count, list_rows);

    let sentinel_visible = view_cursor.sees_end(item_count, list_rows);
    if strategy == PaginationStrategy::InfiniteScroll
        && Sentinel::should_load(sentinel_visible, &catalog.read())
    {
        let request = Sentinel::next_request(sentinel_visible, &mut catalog.write());
        if let Some(request) = request {
            fetch_handler(request);
        }
    }

    let state = catalog.read();
    let visible: Vec<Product> = state
        .items()
        .iter()
        .skip(view_cursor.offset)
        .take(list_rows)
        .cloned()
        .collect();
    let selected = (item_count > 0).then(|| view_cursor.selected - view_cursor.offset);
    let placeholder = placeholder_text(&state);
    let sentinel = match strategy {
        PaginationStrategy::InfiniteScroll => sentinel_text(&state),
        PaginationStrategy::PageButtons => None,
    };
    let buttons = match strategy {
        PaginationStrategy::PageButtons => Some(PageButtons::from_state(&state)),
        PaginationStrategy::InfiniteScroll => None,
    };
    let query = state.query().clone();
    let total = state.total_elements();
    let is_loading = state.is_loading();
    drop(state);

    let sidebar_visible =
        strategy == PaginationStrategy::PageButtons && show_sidebar.get();
    let shortcuts = if search_focused.get() {
        search_shortcuts()
    } else {
        catalog_shortcuts(strategy)
    };

    if should_exit.get() {
        system.exit();
    }

    element! {
        View(
            width: width,
            height: height,
            flex_direction: FlexDirection::Column,
        ) {
            Header(
                query: Some(query.clone()),
                total: total,
                is_loading: is_loading,
                user: props.user.clone(),
            )
            View(height: 1, flex_shrink: 0.0, padding_left: 1, padding_right: 1) {
                InlineSearchBox(
                    value: Some(search_text),
                    has_focus: search_focused.get(),
                    placeholder: "Press / to search products",
                )
            }
            View(flex_grow: 1.0, flex_direction: FlexDirection::Row) {
                ProductList(
                    products: visible,
                    selected: selected,
                    query: query.search_term.clone(),
                    is_loading: is_loading,
                    placeholder: placeholder,
                    sentinel: sentinel,
                )
                #(sidebar_visible.then(|| element! {
                    SidebarPane(sidebar: sidebar.read().clone(), width: SIDEBAR_WIDTH)
                }))
            }
            #(buttons.map(|buttons| element! {
                PageBar(buttons: Some(buttons))
            }))
            Footer(shortcuts: shortcuts)
            #(render_toast(&toast))
        }
    }
}
