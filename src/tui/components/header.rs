//! Title bar with sort and result summary

use iocraft::prelude::*;

use crate::catalog::CatalogQuery;
use crate::tui::theme::theme;

#[derive(Default, Props)]
pub struct HeaderProps {
    pub query: Option<CatalogQuery>,
    pub total: u64,
    pub is_loading: bool,
    /// Signed-in user, if any
    pub user: Option<String>,
}

/// One-line summary of sort and filters, e.g. `price asc, 2 filters`
pub fn describe_query(query: &CatalogQuery) -> String {
    let filters = &query.filters;
    let active = [
        filters.category_id.is_some(),
        filters.min_price.is_some(),
        filters.max_price.is_some(),
        filters.min_stock.is_some(),
        filters.max_stock.is_some(),
    ]
    .iter()
    .filter(|set| **set)
    .count();

    let mut text = format!("{} {}", query.sort_by, query.sort_order);
    match active {
        0 => {}
        1 => text.push_str(", 1 filter"),
        n => text.push_str(&format!(", {n} filters")),
    }
    text
}

#[component]
pub fn Header(props: &HeaderProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let summary = props.query.as_ref().map(describe_query).unwrap_or_default();
    let status = if props.is_loading {
        "loading...".to_string()
    } else {
        format!("{} products", props.total)
    };

    element! {
        View(
            height: 1,
            width: 100pct,
            flex_shrink: 0.0,
            flex_direction: FlexDirection::Row,
            padding_left: 1,
            padding_right: 1,
            column_gap: 2,
        ) {
            Text(content: "shopfront", color: theme.highlight, weight: Weight::Bold)
            Text(content: summary, color: theme.text_dimmed)
            View(flex_grow: 1.0)
            Text(content: status, color: theme.text_dimmed)
            #(props.user.as_ref().map(|user| element! {
                Text(content: user.clone(), color: theme.id_color)
            }))
        }
    }
}
