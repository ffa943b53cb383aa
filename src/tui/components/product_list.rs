//! Product list pane
//!
//! Renders the visible window of catalog items with the selected row
//! highlighted and search matches marked in each name.

use iocraft::prelude::*;

use crate::api::Product;
use crate::tui::highlight::highlight_segments;
use crate::tui::theme::theme;

#[derive(Default, Props)]
pub struct ProductRowProps {
    pub product: Option<Product>,
    pub is_selected: bool,
    /// Search term used to mark matching characters
    pub query: String,
}

#[component]
pub fn ProductRow(props: &ProductRowProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let Some(product) = &props.product else {
        return element!(View()).into_any();
    };

    let bg = if props.is_selected {
        Some(theme.highlight)
    } else {
        None
    };
    let text_color = if props.is_selected {
        theme.highlight_text
    } else {
        theme.text
    };
    let stock = if product.stock_quantity > 0 {
        format!("{} in stock", product.stock_quantity)
    } else {
        "sold out".to_string()
    };

    element! {
        View(
            height: 1,
            width: 100pct,
            flex_direction: FlexDirection::Row,
            background_color: bg,
            padding_left: 1,
            padding_right: 1,
            column_gap: 1,
        ) {
            View(width: 7, flex_shrink: 0.0) {
                Text(content: format!("#{}", product.id), color: theme.id_color)
            }
            View(flex_grow: 1.0, flex_direction: FlexDirection::Row, overflow: Overflow::Hidden) {
                #(highlight_segments(&product.name, &props.query).into_iter().map(|segment| {
                    element! {
                        Text(
                            content: segment.text,
                            color: if segment.matched { theme.search_match } else { text_color },
                            weight: if segment.matched { Weight::Bold } else { Weight::Normal },
                        )
                    }
                }))
            }
            View(width: 11, flex_shrink: 0.0, justify_content: JustifyContent::End) {
                Text(content: format!("{:.2}", product.price), color: theme.price)
            }
            View(width: 13, flex_shrink: 0.0, justify_content: JustifyContent::End) {
                Text(content: stock, color: theme.stock_color(product.stock_quantity))
            }
        }
    }
    .into_any()
}

#[derive(Default, Props)]
pub struct ProductListProps {
    /// Rows currently on screen
    pub products: Vec<Product>,
    /// Index into `products` of the selected row
    pub selected: Option<usize>,
    pub query: String,
    pub is_loading: bool,
    /// Message to show instead of rows, e.g. an error or empty result
    pub placeholder: Option<String>,
    /// Status line under the rows in infinite-scroll mode
    pub sentinel: Option<String>,
}

#[component]
pub fn ProductList(props: &ProductListProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    if let Some(message) = &props.placeholder
        && props.products.is_empty()
    {
        return element! {
            View(
                flex_grow: 1.0,
                border_style: BorderStyle::Round,
                border_color: theme.border,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
            ) {
                Text(content: message.clone(), color: theme.text_dimmed)
            }
        }
        .into_any();
    }

    let query = props.query.clone();
    element! {
        View(
            flex_grow: 1.0,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: theme.border_focused,
            overflow: Overflow::Hidden,
        ) {
            #(props.products.iter().enumerate().map(|(i, product)| {
                element! {
                    ProductRow(
                        product: Some(product.clone()),
                        is_selected: props.selected == Some(i),
                        query: query.clone(),
                    )
                }
            }))
            #(props.sentinel.as_ref().map(|status| element! {
                View(height: 1, padding_left: 1) {
                    Text(content: status.clone(), color: theme.text_dimmed)
                }
            }))
        }
    }
    .into_any()
}
