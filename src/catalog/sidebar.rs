//! Curated product lists shown beside the catalog.
//!
//! The three lists load concurrently and fail independently: a failing list
//! turns into an empty section with a message, never an error for the page.

use std::fmt;

use crate::api::StoreApi;
use crate::api::types::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidebarList {
    Popular,
    New,
    Recommended,
}

impl SidebarList {
    pub const ALL: [SidebarList; 3] = [
        SidebarList::Popular,
        SidebarList::New,
        SidebarList::Recommended,
    ];

    /// API path relative to the base URL
    pub fn path(self) -> &'static str {
        match self {
            SidebarList::Popular => "products/popular",
            SidebarList::New => "products/new",
            SidebarList::Recommended => "products/recommended",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SidebarList::Popular => "Popular",
            SidebarList::New => "New arrivals",
            SidebarList::Recommended => "Recommended",
        }
    }
}

impl fmt::Display for SidebarList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarSection {
    pub list: SidebarList,
    pub products: Vec<Product>,
    /// Set when the list failed to load
    pub error: Option<String>,
}

impl SidebarSection {
    /// Text to show in place of an empty list
    pub fn empty_message(&self) -> Option<String> {
        if !self.products.is_empty() {
            return None;
        }
        Some(match &self.error {
            Some(_) => format!("{} is unavailable right now", self.list.title()),
            None => "No products yet".to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sidebar {
    pub sections: Vec<SidebarSection>,
}

impl Sidebar {
    pub fn section(&self, list: SidebarList) -> Option<&SidebarSection> {
        self.sections.iter().find(|s| s.list == list)
    }
}

/// Fetch the popular, new and recommended lists concurrently
pub async fn load_sidebar<A: StoreApi>(api: &A, limit: u32) -> Sidebar {
    let (popular, new, recommended) = futures::join!(
        load_section(api, SidebarList::Popular, limit),
        load_section(api, SidebarList::New, limit),
        load_section(api, SidebarList::Recommended, limit),
    );
    Sidebar {
        sections: vec![popular, new, recommended],
    }
}

async fn load_section<A: StoreApi>(api: &A, list: SidebarList, limit: u32) -> SidebarSection {
    match api.sidebar_products(list, limit).await {
        Ok(mut products) => {
            products.truncate(limit as usize);
            SidebarSection {
                list,
                products,
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(%list, "sidebar list failed: {e}");
            SidebarSection {
                list,
                products: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}
