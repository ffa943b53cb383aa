//! Product catalog browsing: query building, listing state, pagination,
//! search debounce and the sidebar lists.

pub mod controller;
pub mod debounce;
pub mod pagination;
pub mod query;
pub mod sidebar;
pub mod state;

pub use controller::{CatalogController, FetchOutcome, fetch_page};
pub use debounce::Debouncer;
pub use pagination::{PageButtons, PageSlot, PaginationStrategy, Sentinel};
pub use query::{CatalogFilters, CatalogQuery, FilterForm, SortKey, SortOrder};
pub use sidebar::{Sidebar, SidebarList, SidebarSection, load_sidebar};
pub use state::{CatalogState, FetchMode, FetchRequest, Phase};
