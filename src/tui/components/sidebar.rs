//! Popular / new / recommended product lists

use iocraft::prelude::*;

use crate::catalog::Sidebar;
use crate::tui::theme::theme;

#[derive(Default, Props)]
pub struct SidebarPaneProps {
    /// `None` while the lists are still loading
    pub sidebar: Option<Sidebar>,
    pub width: u16,
}

#[component]
pub fn SidebarPane(props: &SidebarPaneProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();

    let Some(sidebar) = &props.sidebar else {
        return element! {
            View(
                width: props.width,
                border_style: BorderStyle::Round,
                border_color: theme.border,
                padding_left: 1,
            ) {
                Text(content: "Loading...", color: theme.text_dimmed)
            }
        };
    };

    element! {
        View(
            width: props.width,
            flex_shrink: 0.0,
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Round,
            border_color: theme.border,
            padding_left: 1,
            padding_right: 1,
            row_gap: 1,
            overflow: Overflow::Hidden,
        ) {
            #(sidebar.sections.iter().map(|section| element! {
                View(flex_direction: FlexDirection::Column) {
                    Text(content: section.list.title(), color: theme.text, weight: Weight::Bold)
                    #(section.empty_message().map(|message| element! {
                        Text(content: message, color: theme.text_dimmed)
                    }))
                    #(section.products.iter().map(|product| element! {
                        View(height: 1, flex_direction: FlexDirection::Row, column_gap: 1) {
                            View(flex_grow: 1.0, overflow: Overflow::Hidden) {
                                Text(content: product.name.clone(), color: theme.text)
                            }
                            Text(content: format!("{:.2}", product.price), color: theme.price)
                        }
                    }))
                }
            }))
        }
    }
}
