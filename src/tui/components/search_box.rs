//! Inline search input for the catalog header

use iocraft::prelude::*;

use crate::tui::theme::theme;

#[derive(Default, Props)]
pub struct InlineSearchBoxProps {
    /// State for the search query value
    pub value: Option<State<String>>,
    pub has_focus: bool,
    /// Shown dimmed while the box is empty and unfocused
    pub placeholder: String,
}

/// Single-line search input with a `/` prompt
#[component]
pub fn InlineSearchBox(props: &InlineSearchBoxProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let has_focus = props.has_focus;

    let Some(mut value) = props.value else {
        return element! {
            View(flex_direction: FlexDirection::Row, height: 1) {
                Text(content: "search unavailable", color: theme.text_dimmed)
            }
        };
    };

    let show_placeholder = !has_focus && value.read().is_empty();

    element! {
        View(
            flex_direction: FlexDirection::Row,
            width: 100pct,
            height: 1,
        ) {
            View(margin_right: 1) {
                Text(
                    content: "/",
                    color: if has_focus { theme.border_focused } else { theme.text_dimmed },
                )
            }
            View(flex_grow: 1.0) {
                #(if show_placeholder {
                    element! {
                        Text(content: props.placeholder.clone(), color: theme.text_dimmed)
                    }.into_any()
                } else {
                    element! {
                        TextInput(
                            value: value.to_string(),
                            has_focus: has_focus,
                            on_change: move |new_value| value.set(new_value),
                            color: theme.text,
                        )
                    }.into_any()
                })
            }
        }
    }
}
