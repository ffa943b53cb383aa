//! Page button bar for wide terminals

use iocraft::prelude::*;

use crate::catalog::{PageButtons, PageSlot};
use crate::tui::theme::theme;

/// Text labels for the bar, in display order
pub fn page_labels(buttons: &PageButtons) -> Vec<(String, bool)> {
    let mut labels = Vec::with_capacity(buttons.slots.len() + 2);
    if buttons.prev.is_some() {
        labels.push(("<".to_string(), false));
    }
    for slot in &buttons.slots {
        labels.push(match slot {
            PageSlot::Page(p) => (p.to_string(), *p == buttons.current),
            PageSlot::Gap => ("...".to_string(), false),
        });
    }
    if buttons.next.is_some() {
        labels.push((">".to_string(), false));
    }
    labels
}

#[derive(Default, Props)]
pub struct PageBarProps {
    pub buttons: Option<PageButtons>,
}

#[component]
pub fn PageBar(props: &PageBarProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let labels = props.buttons.as_ref().map(page_labels).unwrap_or_default();

    element! {
        View(
            height: 1,
            flex_shrink: 0.0,
            width: 100pct,
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::Center,
            column_gap: 1,
        ) {
            #(labels.into_iter().map(|(label, current)| element! {
                Text(
                    content: if current { format!("[{label}]") } else { label },
                    color: if current { theme.border_focused } else { theme.text_dimmed },
                    weight: if current { Weight::Bold } else { Weight::Normal },
                )
            }))
        }
    }
}
