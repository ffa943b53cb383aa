//! Catalog query model and its translation into listing parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShopError};

/// Field the product listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    Price,
    Name,
    #[default]
    UpdatedAt,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Price, SortKey::Name, SortKey::UpdatedAt];

    /// Parameter value understood by the listing endpoint
    pub fn as_param(self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::Name => "name",
            SortKey::UpdatedAt => "updatedAt",
        }
    }

    /// Next key in display order, wrapping around
    pub fn next(self) -> Self {
        match self {
            SortKey::Price => SortKey::Name,
            SortKey::Name => SortKey::UpdatedAt,
            SortKey::UpdatedAt => SortKey::Price,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Price => "price",
            SortKey::Name => "name",
            SortKey::UpdatedAt => "updated",
        };
        write!(f, "{s}")
    }
}

impl FromStr for SortKey {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "price" => Ok(SortKey::Price),
            "name" => Ok(SortKey::Name),
            "updated" | "updatedat" | "updated_at" => Ok(SortKey::UpdatedAt),
            _ => Err(ShopError::validation(format!(
                "invalid sort key '{s}', expected price, name or updated"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortOrder::Asc
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(ShopError::validation(format!(
                "invalid sort order '{s}', expected asc or desc"
            ))),
        }
    }
}

/// Structured listing filters. `None` means the filter is not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFilters {
    pub category_id: Option<u64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_stock: Option<u64>,
    pub max_stock: Option<u64>,
}

impl CatalogFilters {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_stock.is_none()
            && self.max_stock.is_none()
    }

    /// Build filters from raw form text, treating blank fields as unset
    pub fn from_form(form: &FilterForm) -> Result<Self> {
        let filters = Self {
            category_id: parse_field("category", &form.category_id)?,
            min_price: parse_field("min price", &form.min_price)?,
            max_price: parse_field("max price", &form.max_price)?,
            min_stock: parse_field("min stock", &form.min_stock)?,
            max_stock: parse_field("max stock", &form.max_stock)?,
        };
        filters.validate()?;
        Ok(filters)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("min price", self.min_price), ("max price", self.max_price)] {
            if let Some(v) = value
                && (!v.is_finite() || v < 0.0)
            {
                return Err(ShopError::validation(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err(ShopError::validation(
                "min price cannot be greater than max price",
            ));
        }
        if let (Some(min), Some(max)) = (self.min_stock, self.max_stock)
            && min > max
        {
            return Err(ShopError::validation(
                "min stock cannot be greater than max stock",
            ));
        }
        Ok(())
    }
}

/// Raw text of the filter fields as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub category_id: String,
    pub min_price: String,
    pub max_price: String,
    pub min_stock: String,
    pub max_stock: String,
}

fn parse_field<T: FromStr>(name: &str, raw: &str) -> Result<Option<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ShopError::validation(format!("{name}: '{trimmed}' is not a valid number")))
}

/// Everything that determines which slice of the catalog is requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub search_term: String,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub filters: CatalogFilters,
    /// 1-based
    pub page: u32,
    pub page_size: u32,
}

impl CatalogQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            search_term: String::new(),
            sort_by: SortKey::default(),
            sort_order: SortOrder::default(),
            filters: CatalogFilters::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Query parameters for `GET /products/all`, in a stable order
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("search", self.search_term.trim().to_string()),
            ("page", self.page.max(1).to_string()),
            ("size", self.page_size.to_string()),
            ("sortBy", self.sort_by.as_param().to_string()),
            ("ascending", self.sort_order.is_ascending().to_string()),
            ("active", "true".to_string()),
        ];

        let f = &self.filters;
        if let Some(id) = f.category_id {
            pairs.push(("categoryId", id.to_string()));
        }
        if let Some(v) = f.min_price {
            pairs.push(("minPrice", v.to_string()));
        }
        if let Some(v) = f.max_price {
            pairs.push(("maxPrice", v.to_string()));
        }
        if let Some(v) = f.min_stock {
            pairs.push(("minStock", v.to_string()));
        }
        if let Some(v) = f.max_stock {
            pairs.push(("maxStock", v.to_string()));
        }
        pairs
    }

    /// Encoded query string, mainly for logs and tests
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self::new(12)
    }
}
