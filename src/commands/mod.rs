mod admin;
mod browse;
mod cart;
mod config;
mod order;
mod products;
mod profile;
mod session;

pub use admin::{cmd_admin_product_create, cmd_admin_product_delete, cmd_admin_product_update};
pub use browse::cmd_browse;
pub use cart::{cmd_cart_add, cmd_cart_ls, cmd_cart_rm};
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use order::{cmd_order_ls, cmd_order_pay, cmd_order_place, cmd_order_return, cmd_order_show};
pub use products::{cmd_categories, cmd_product, cmd_products, cmd_sidebar};
pub use profile::{AvatarPlacement, cmd_profile_avatar, cmd_profile_password, cmd_profile_show};
pub use session::{cmd_session_login, cmd_session_logout, cmd_session_show};

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::api::HttpStoreApi;
use crate::api::types::{OrderStatus, PaymentStatus};
use crate::cli::{ListingArgs, OutputOptions};
use crate::catalog::query::{CatalogFilters, CatalogQuery, FilterForm};
use crate::config::Config;
use crate::error::Result;
use crate::paths;
use crate::session::{CookieJar, Session};
use crate::storage::FileStorage;

/// Result of a command, printable as text or JSON
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output: OutputOptions) -> Result<()> {
        if output.json {
            return print_json(&self.json);
        }
        match self.text {
            Some(text) => println!("{text}"),
            None => print_json(&self.json)?,
        }
        Ok(())
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Everything a command needs to talk to the shop: configuration, the
/// cookie jar and an API client carrying the stored session
pub struct ClientContext {
    pub config: Config,
    pub jar: CookieJar,
    pub api: HttpStoreApi,
}

impl ClientContext {
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let jar = CookieJar::open(paths::cookie_jar_path())?;
        let session = Session::from_cookies(&jar);
        tracing::debug!(signed_in = session.is_some(), "client context loaded");
        let api = HttpStoreApi::from_config(&config, session)?;
        Ok(Self { config, jar, api })
    }

    pub fn session(&self) -> Option<&Session> {
        self.api.session()
    }

    /// Fail early for commands that need a signed-in user
    pub fn require_session(&self) -> Result<&Session> {
        crate::session::require(self.session())
    }

    pub fn storage(&self) -> Result<FileStorage> {
        FileStorage::open(paths::local_storage_path())
    }
}

/// Build the initial catalog query from command-line flags
pub fn query_from_args(listing: &ListingArgs, page_size: u32) -> Result<CatalogQuery> {
    let form = FilterForm {
        category_id: listing.category.clone().unwrap_or_default(),
        min_price: listing.min_price.clone().unwrap_or_default(),
        max_price: listing.max_price.clone().unwrap_or_default(),
        min_stock: listing.min_stock.clone().unwrap_or_default(),
        max_stock: listing.max_stock.clone().unwrap_or_default(),
    };

    let mut query = CatalogQuery::new(page_size);
    query.search_term = listing.search.clone();
    query.filters = CatalogFilters::from_form(&form)?;
    if let Some(sort) = listing.sort {
        query.sort_by = sort;
    }
    if let Some(order) = listing.order {
        query.sort_order = order;
    }
    Ok(query)
}

pub fn format_price(amount: f64) -> String {
    format!("{amount:.2}")
}

pub fn format_order_status(status: OrderStatus) -> String {
    let label = status.to_string();
    match status {
        OrderStatus::Pending => label.yellow().to_string(),
        OrderStatus::Confirmed | OrderStatus::Shipping => label.cyan().to_string(),
        OrderStatus::Delivered => label.green().to_string(),
        OrderStatus::Cancelled => label.dimmed().to_string(),
    }
}

pub fn format_payment_status(status: PaymentStatus) -> String {
    let label = status.to_string();
    match status {
        PaymentStatus::Paid => label.green().to_string(),
        PaymentStatus::Failed => label.red().to_string(),
        PaymentStatus::Pending => label.yellow().to_string(),
        PaymentStatus::Unpaid | PaymentStatus::Refunded => label.dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_args_treats_missing_filters_as_unset() {
        let listing = ListingArgs {
            search: "boot".into(),
            min_price: Some(" ".into()),
            max_stock: Some("5".into()),
            ..Default::default()
        };
        let q = query_from_args(&listing, 24).unwrap();
        assert_eq!(q.page_size, 24);
        assert_eq!(q.filters.min_price, None);
        assert_eq!(q.filters.max_stock, Some(5));
    }

    #[test]
    fn test_query_from_args_rejects_garbage() {
        let listing = ListingArgs {
            max_price: Some("cheap".into()),
            ..Default::default()
        };
        assert!(query_from_args(&listing, 12).is_err());
    }
}
