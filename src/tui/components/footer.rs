//! Keyboard shortcuts bar component
//!
//! Displays available keyboard shortcuts at the bottom of the screen.

use iocraft::prelude::*;

use crate::catalog::PaginationStrategy;
use crate::tui::theme::theme;

/// A single keyboard shortcut entry
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// The key or key combination (e.g., "q", "C-d", "Enter")
    pub key: String,
    pub action: String,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

#[derive(Default, Props)]
pub struct FooterProps {
    pub shortcuts: Vec<Shortcut>,
}

/// Keyboard shortcuts bar at the bottom of the screen
#[component]
pub fn Footer(props: &FooterProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    element! {
        View(
            width: 100pct,
            min_height: 1,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::Wrap,
            flex_shrink: 0.0,
            padding_left: 1,
            padding_right: 1,
            column_gap: 2,
            background_color: theme.border,
        ) {
            #(props.shortcuts.iter().map(|shortcut| {
                element! {
                    View(flex_direction: FlexDirection::Row) {
                        Text(
                            content: format!("[{}]", shortcut.key),
                            color: theme.highlight,
                            weight: Weight::Bold,
                        )
                        Text(
                            content: format!(" {}", shortcut.action),
                            color: theme.text,
                        )
                    }
                }
            }))
        }
    }
}

/// Shortcuts for browsing the catalog
pub fn catalog_shortcuts(strategy: PaginationStrategy) -> Vec<Shortcut> {
    let paging = match strategy {
        PaginationStrategy::PageButtons => Shortcut::new("n/p 1-9", "Page"),
        PaginationStrategy::InfiniteScroll => Shortcut::new("n", "More"),
    };
    vec![
        Shortcut::new("j/k", "Up/Down"),
        paging,
        Shortcut::new("/", "Search"),
        Shortcut::new("s", "Sort"),
        Shortcut::new("o", "Order"),
        Shortcut::new("c", "Clear"),
        Shortcut::new("r", "Reload"),
        Shortcut::new("b", "Sidebar"),
        Shortcut::new("q", "Quit"),
    ]
}

/// Shortcuts while the search box has focus
pub fn search_shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new("Enter", "Search Now"),
        Shortcut::new("Tab", "Exit Search"),
        Shortcut::new("Esc", "Clear & Exit"),
        Shortcut::new("C-c", "Quit"),
    ]
}
