//! Theme system for TUI colors and styles
//!
//! Colors mirror the CLI output in `commands/mod.rs`.

use iocraft::prelude::Color;

use crate::notify::ToastLevel;

const GREY: Color = Color::Rgb {
    r: 120,
    g: 120,
    b: 120,
};

#[derive(Debug, Clone)]
pub struct Theme {
    pub price: Color,
    pub in_stock: Color,
    pub low_stock: Color,
    pub out_of_stock: Color,

    pub toast_info: Color,
    pub toast_warning: Color,
    pub toast_error: Color,

    pub border: Color,
    pub border_focused: Color,
    pub background: Color,
    pub text: Color,
    pub text_dimmed: Color,
    pub highlight: Color,
    pub highlight_text: Color,
    pub search_match: Color,
    pub id_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            price: Color::Green,
            in_stock: Color::White,
            low_stock: Color::Yellow,
            out_of_stock: Color::Red,

            toast_info: Color::Cyan,
            toast_warning: Color::Yellow,
            toast_error: Color::Red,

            border: GREY,
            border_focused: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            text_dimmed: GREY,
            highlight: Color::Blue,
            highlight_text: Color::White,
            search_match: Color::Yellow,
            id_color: Color::Cyan,
        }
    }
}

impl Theme {
    pub fn toast_color(&self, level: ToastLevel) -> Color {
        match level {
            ToastLevel::Info => self.toast_info,
            ToastLevel::Warning => self.toast_warning,
            ToastLevel::Error => self.toast_error,
        }
    }

    /// Stock count color: red when sold out, yellow when running low
    pub fn stock_color(&self, stock: i64) -> Color {
        match stock {
            i64::MIN..=0 => self.out_of_stock,
            1..=5 => self.low_stock,
            _ => self.in_stock,
        }
    }
}

/// Global theme instance
pub static THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get a reference to the global theme
pub fn theme() -> &'static Theme {
    &THEME
}
