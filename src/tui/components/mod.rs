//! Catalog browser widgets

pub mod footer;
pub mod header;
pub mod pager;
pub mod product_list;
pub mod search_box;
pub mod sidebar;
pub mod toast;

pub use footer::{Footer, FooterProps, Shortcut, catalog_shortcuts, search_shortcuts};
pub use header::{Header, HeaderProps};
pub use pager::{PageBar, PageBarProps};
pub use product_list::{ProductList, ProductListProps, ProductRow, ProductRowProps};
pub use search_box::{InlineSearchBox, InlineSearchBoxProps};
pub use sidebar::{SidebarPane, SidebarPaneProps};
pub use toast::render_toast;
