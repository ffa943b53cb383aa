//! Interactive terminal catalog browser

pub mod browser;
pub mod components;
pub mod handlers;
pub mod highlight;
pub mod keymap;
pub mod navigation;
pub mod theme;

pub use browser::{BrowserSettings, CatalogBrowser, CatalogBrowserProps};
pub use theme::Theme;
