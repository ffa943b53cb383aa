use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

use crate::catalog::query::{SortKey, SortOrder};
use crate::payment::PaymentMethod;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(about = "Terminal storefront for the shop API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format shared by every data command
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Listing selection shared by `products` and `browse`
#[derive(Args, Debug, Clone, Default)]
pub struct ListingArgs {
    /// Search term
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Sort key: price, name, updated (default: updated)
    #[arg(long, value_parser = parse_sort_key)]
    pub sort: Option<SortKey>,

    /// Sort direction: asc, desc (default: desc)
    #[arg(long, value_parser = parse_sort_order)]
    pub order: Option<SortOrder>,

    /// Category id
    #[arg(long)]
    pub category: Option<String>,

    /// Minimum price
    #[arg(long)]
    pub min_price: Option<String>,

    /// Maximum price
    #[arg(long)]
    pub max_price: Option<String>,

    /// Minimum stock
    #[arg(long)]
    pub min_stock: Option<String>,

    /// Maximum stock
    #[arg(long)]
    pub max_stock: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List, search and filter products
    #[command(visible_alias = "ls")]
    Products {
        #[command(flatten)]
        listing: ListingArgs,

        /// Page to show (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Keep loading pages until the listing is exhausted
        #[arg(long, conflicts_with = "page")]
        all: bool,

        /// Stop --all after this many pages
        #[arg(long, requires = "all")]
        max_pages: Option<u32>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show one product
    Product {
        id: u64,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// List product categories
    Categories {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show the popular, new and recommended lists
    Sidebar {
        /// Products per list (default: catalog.sidebar_limit)
        #[arg(long)]
        limit: Option<u32>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Browse the catalog interactively
    #[command(visible_alias = "b")]
    Browse {
        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },

    /// Place, list and pay orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// View and edit your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Sign in and out
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Store administration
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Ls {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Add a product to the cart
    Add {
        product_id: u64,

        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Remove a product from the cart
    Rm {
        product_id: u64,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// Place an order for the current cart
    Place {
        /// Shipping address
        #[arg(long)]
        address: String,

        /// Note for the seller
        #[arg(long)]
        note: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// List your orders
    Ls {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show one order
    Show {
        id: u64,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Pay for an order
    Pay {
        id: u64,

        /// Payment method: cod, card, ewallet
        #[arg(short, long, value_parser = parse_payment_method)]
        method: PaymentMethod,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Reconcile a payment after returning from the gateway
    Return {
        /// Return URL the gateway redirected to (default: the pending payment)
        url: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show your profile
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Change your password
    Password {
        /// Current password
        #[arg(long, env = "SHOPFRONT_CURRENT_PASSWORD", hide_env_values = true)]
        current: String,

        /// New password (at least 8 characters)
        #[arg(long = "new", env = "SHOPFRONT_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,

        /// New password again
        #[arg(long, env = "SHOPFRONT_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Crop an image and upload it as your avatar
    Avatar {
        /// PNG or JPEG file
        path: PathBuf,

        /// Zoom between 1.0 and 3.0
        #[arg(long, default_value_t = 1.0)]
        zoom: f32,

        /// Rotation in degrees
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        rotate: f32,

        /// Horizontal pan in output pixels
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        pan_x: f32,

        /// Vertical pan in output pixels
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        pan_y: f32,

        /// Write the cropped PNG here instead of uploading it
        #[arg(long)]
        save: Option<PathBuf>,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Sign in and store the session
    Login {
        email: String,

        /// Password
        #[arg(long, env = "SHOPFRONT_PASSWORD", hide_env_values = true)]
        password: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Forget the stored session
    Logout {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show who is signed in
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// Manage products
    Product {
        #[command(subcommand)]
        action: AdminProductAction,
    },
}

/// Product fields for create/update
#[derive(Args, Debug, Clone)]
pub struct ProductFields {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long)]
    pub price: f64,

    #[arg(long, default_value_t = 0)]
    pub stock: i64,

    #[arg(long)]
    pub image_url: Option<String>,

    #[arg(long)]
    pub category: Option<u64>,

    /// Hide the product from the catalog
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Subcommand)]
pub enum AdminProductAction {
    /// Create a product
    Create {
        #[command(flatten)]
        fields: ProductFields,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Replace a product's fields
    Update {
        id: u64,

        #[command(flatten)]
        fields: ProductFields,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Delete a product
    Delete {
        id: u64,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },

    /// Read one value
    Get {
        /// Dotted key (e.g. catalog.page_size)
        key: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Set one value
    Set {
        /// Dotted key (e.g. api.base_url)
        key: String,
        value: String,

        #[command(flatten)]
        output: OutputOptions,
    },
}

fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    s.parse().map_err(|e: crate::error::ShopError| e.to_string())
}

fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    s.parse().map_err(|e: crate::error::ShopError| e.to_string())
}

fn parse_payment_method(s: &str) -> Result<PaymentMethod, String> {
    s.parse().map_err(|e: crate::error::ShopError| e.to_string())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "shopfront", &mut io::stdout());
}
