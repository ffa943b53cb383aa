#[path = "common/mod.rs"]
mod common;

use std::time::Duration;

use common::{FakeStoreApi, product, products};
use shopfront::catalog::{
    CatalogController, CatalogState, Debouncer, FetchMode, PageButtons, PaginationStrategy,
    Phase, Sentinel, SidebarList, SortKey, fetch_page, load_sidebar,
};
use shopfront::error::ShopError;

const DEFAULT_SUFFIX: &str = "&size=12&sortBy=updatedAt&ascending=false&active=true";

// ============================================================================
// Search debounce
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_typing_settles_into_one_search_request() {
    let api = FakeStoreApi::new().with_catalog(vec![
        product(1, "Trail Shoe"),
        product(2, "Sun Hat"),
        product(3, "Shoe Laces"),
    ]);
    let mut controller = CatalogController::new(api, CatalogState::new(12));

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let mut debouncer = Debouncer::new(Duration::from_millis(500));
    for typed in ["s", "sh", "sho", "shoe"] {
        let tx = tx.clone();
        let term = typed.to_string();
        debouncer.schedule(move || {
            let _ = tx.send(term);
        });
        tokio::time::sleep(Duration::from_millis(120)).await;
    }
    assert!(rx.try_recv().is_err(), "nothing fires while typing");

    let settled = rx.recv().await.expect("debounced search fires");
    assert_eq!(settled, "shoe");
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(rx.try_recv().is_err(), "earlier keystrokes never fire");

    controller.update(|s| Some(s.set_search(settled))).await;

    assert_eq!(
        controller.api().listing_queries(),
        vec![format!("search=shoe&page=1{DEFAULT_SUFFIX}")]
    );
    assert_eq!(controller.state().items().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_debouncer_cancels_search() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<()>();
    {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.schedule(move || {
            let _ = tx.send(());
        });
    }
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_narrow_viewport_appends_next_page_once() {
    let mut page_two = vec![product(12, "Product 12")];
    page_two.extend(products(24).into_iter().skip(12));
    let api = FakeStoreApi::new()
        .with_catalog(products(30))
        .with_page(2, page_two);

    assert_eq!(
        PaginationStrategy::for_width(80, 100),
        PaginationStrategy::InfiniteScroll
    );

    let mut state = CatalogState::new(12);
    let request = state.load();
    let outcome = fetch_page(&api, request).await;
    assert!(state.apply(outcome.request, outcome.result).is_none());
    assert_eq!(state.total_pages(), 3);
    assert!(Sentinel::should_load(true, &state));
    assert!(!Sentinel::should_load(false, &state));

    let request = state.load_more().expect("page 2 is available");
    assert_eq!(request.mode, FetchMode::Append);
    assert!(!Sentinel::should_load(true, &state), "no second trigger while loading");
    assert!(state.load_more().is_none());

    let outcome = fetch_page(&api, request).await;
    state.apply(outcome.request, outcome.result);

    let queries = api.listing_queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1], format!("search=&page=2{DEFAULT_SUFFIX}"));

    let ids: Vec<u64> = state.items().iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=24).collect::<Vec<_>>(), "duplicate id 12 merged once");
    assert_eq!(state.page(), 2);
    assert!(state.has_more());
}

#[tokio::test]
async fn test_failed_append_keeps_loaded_pages() {
    let api = FakeStoreApi::new().with_catalog(products(30));
    let mut controller = CatalogController::new(api, CatalogState::new(12));
    controller.load().await.unwrap();

    let mut state = controller.into_state();
    let request = state.load_more().unwrap();
    let toast = state.apply(request, Err(ShopError::Api("timeout".into())));

    assert!(toast.is_some());
    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(state.items().len(), 12);
    assert_eq!(state.page(), 1);
    assert!(state.has_more(), "the failed page can be retried");
}

#[tokio::test]
async fn test_page_jump_out_of_range_sends_nothing() {
    let api = FakeStoreApi::new().with_catalog(products(30));
    let mut controller = CatalogController::new(api, CatalogState::new(12));
    controller.load().await.unwrap();

    assert!(!controller.try_update(|s| s.jump_to_page(4)).await.unwrap());
    assert!(!controller.try_update(|s| s.jump_to_page(0)).await.unwrap());
    assert_eq!(controller.api().listing_queries().len(), 1);

    assert!(controller.try_update(|s| s.jump_to_page(3)).await.unwrap());
    assert_eq!(controller.state().items().len(), 6);
    let buttons = PageButtons::from_state(controller.state());
    assert_eq!(buttons.current, 3);
    assert_eq!(buttons.next, None);
}

#[tokio::test]
async fn test_load_all_follows_pages_to_the_end() {
    let api = FakeStoreApi::new().with_catalog(products(30));
    let mut controller = CatalogController::new(api, CatalogState::new(12));
    controller.load().await.unwrap();
    assert!(controller.load_all(None).await.is_none());

    assert_eq!(controller.state().items().len(), 30);
    assert_eq!(controller.api().listing_queries().len(), 3);
}

#[tokio::test]
async fn test_load_all_keeps_pages_before_a_failure() {
    let api = FakeStoreApi::new()
        .with_catalog(products(40))
        .failing_from_page(3);
    let mut controller = CatalogController::new(api, CatalogState::new(12));
    controller.load().await.unwrap();

    let toast = controller.load_all(None).await.expect("page 3 fails");
    assert!(toast.message.starts_with("Failed to load products"));

    let state = controller.state();
    assert_eq!(state.items().len(), 24);
    assert_eq!(state.page(), 2);
    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(controller.api().listing_queries().len(), 3);
}

#[tokio::test]
async fn test_failed_append_waits_for_explicit_retry() {
    let api = FakeStoreApi::new().with_catalog(products(30));
    let mut controller = CatalogController::new(api, CatalogState::new(12));
    controller.load().await.unwrap();
    let mut state = controller.into_state();

    let request = Sentinel::next_request(true, &mut state).expect("sentinel fires");
    assert_eq!(request.query.page, 2);
    state.apply(request, Err(ShopError::Api("timeout".into())));

    // Re-rendering with the sentinel still on screen must not refetch
    for _ in 0..5 {
        assert!(Sentinel::next_request(true, &mut state).is_none());
    }
    assert_eq!(state.items().len(), 12);

    let retry = state.load_more().expect("next page key retries");
    assert_eq!(retry.mode, FetchMode::Append);
    assert_eq!(retry.query.page, 2);

    let api = FakeStoreApi::new().with_catalog(products(30));
    let outcome = fetch_page(&api, retry).await;
    assert!(state.apply(outcome.request, outcome.result).is_none());
    assert_eq!(state.items().len(), 24);

    let next = Sentinel::next_request(true, &mut state).expect("sentinel re-armed");
    assert_eq!(next.query.page, 3);
}

// ============================================================================
// Query transitions
// ============================================================================

#[tokio::test]
async fn test_toggling_sort_twice_restores_query() {
    let api = FakeStoreApi::new().with_catalog(products(5));
    let mut controller = CatalogController::new(api, CatalogState::new(12));
    controller.load().await.unwrap();
    let original = controller.state().query().clone();

    controller.update(|s| Some(s.toggle_sort_order())).await;
    assert_ne!(controller.state().query(), &original);
    controller.update(|s| Some(s.toggle_sort_order())).await;
    assert_eq!(controller.state().query(), &original);

    let queries = controller.api().listing_queries();
    assert_eq!(queries.len(), 3);
    assert!(queries[1].contains("ascending=true"));
    assert_eq!(queries[0], queries[2]);
}

#[tokio::test]
async fn test_query_changes_reset_to_first_page() {
    let api = FakeStoreApi::new().with_catalog(products(30));
    let mut controller = CatalogController::new(api, CatalogState::new(12));
    controller.load().await.unwrap();
    controller.update(|s| s.jump_to_page(3)).await;
    assert_eq!(controller.state().page(), 3);

    controller.update(|s| Some(s.set_sort_by(SortKey::Price))).await;
    assert_eq!(controller.state().page(), 1);
    let last = controller.api().listing_queries().pop().unwrap();
    assert!(last.contains("page=1&"));
    assert!(last.contains("sortBy=price"));

    controller.update(|s| s.jump_to_page(2)).await;
    controller.update(|s| Some(s.set_search("product"))).await;
    assert_eq!(controller.state().page(), 1);

    controller.update(|s| s.jump_to_page(2)).await;
    controller.update(|s| Some(s.clear_filters())).await;
    assert_eq!(controller.state().page(), 1);
}

#[tokio::test]
async fn test_superseded_response_is_ignored() {
    let api = FakeStoreApi::new().with_catalog(vec![
        product(1, "Trail Shoe"),
        product(2, "Sun Hat"),
    ]);
    let mut state = CatalogState::new(12);

    let first = state.load();
    let second = state.set_search("hat");
    let newer = fetch_page(&api, second).await;
    let older = fetch_page(&api, first).await;

    state.apply(newer.request, newer.result);
    state.apply(older.request, older.result);

    let names: Vec<&str> = state.items().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Sun Hat"]);
}

#[tokio::test]
async fn test_failed_listing_surfaces_error() {
    let api = FakeStoreApi::new().failing_listing();
    let mut controller = CatalogController::new(api, CatalogState::new(12));

    let toast = controller.update(|s| Some(s.load())).await.expect("toast");
    assert!(toast.message.starts_with("Failed to load products"));
    assert_eq!(controller.state().phase(), Phase::Error);
    assert!(controller.state().items().is_empty());
}

#[tokio::test]
async fn test_empty_search_has_no_page_buttons() {
    let api = FakeStoreApi::new().with_catalog(products(5));
    let mut controller = CatalogController::new(api, CatalogState::new(12));
    controller.update(|s| Some(s.set_search("zzz"))).await;

    assert_eq!(controller.state().phase(), Phase::Success);
    assert!(controller.state().items().is_empty());
    assert!(PageButtons::from_state(controller.state()).slots.is_empty());
}

// ============================================================================
// Sidebar
// ============================================================================

#[tokio::test]
async fn test_sidebar_degrades_per_list() {
    let api = FakeStoreApi::new()
        .with_sidebar(products(8))
        .failing_sidebar(SidebarList::New);

    let sidebar = load_sidebar(&api, 5).await;

    let popular = sidebar.section(SidebarList::Popular).unwrap();
    assert_eq!(popular.products.len(), 5);
    assert!(popular.empty_message().is_none());

    let new = sidebar.section(SidebarList::New).unwrap();
    assert!(new.products.is_empty());
    assert!(new.error.is_some());
    assert_eq!(
        new.empty_message(),
        Some(format!("{} is unavailable right now", SidebarList::New.title()))
    );

    assert_eq!(
        sidebar.section(SidebarList::Recommended).unwrap().products.len(),
        5
    );
    assert_eq!(api.call_count("sidebar_products"), 3);
}
