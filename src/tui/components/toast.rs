//! Toast bar rendering

use iocraft::prelude::*;

use crate::notify::Toast;
use crate::tui::theme::theme;

/// Render the current toast, if any, as a bar with a colored top edge
pub fn render_toast(toast: &Option<Toast>) -> Option<AnyElement<'static>> {
    toast.as_ref().map(|t| {
        let color = theme().toast_color(t.level);
        element! {
            View(
                width: 100pct,
                height: 2,
                flex_shrink: 0.0,
                padding_left: 1,
                background_color: Color::Black,
                border_edges: Edges::Top,
                border_style: BorderStyle::Single,
                border_color: color,
            ) {
                Text(content: t.message.clone(), color: color)
            }
        }
        .into_any()
    })
}
