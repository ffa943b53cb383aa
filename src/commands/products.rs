//! Catalog commands: product listing, detail, categories and sidebar lists.

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{ClientContext, CommandOutput, format_price, query_from_args};
use crate::api::StoreApi;
use crate::api::types::Product;
use crate::catalog::controller::CatalogController;
use crate::catalog::sidebar::load_sidebar;
use crate::catalog::state::CatalogState;
use crate::cli::{ListingArgs, OutputOptions};
use crate::error::{Result, ShopError};

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: i64,
    #[tabled(rename = "Category")]
    category: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            price: format_price(p.price),
            stock: p.stock_quantity,
            category: p
                .category_id
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

fn product_table(products: &[Product]) -> String {
    let mut table = Table::new(products.iter().map(ProductRow::from));
    table.with(Style::rounded());
    table.to_string()
}

/// List products with search, filters, sorting and paging
pub async fn cmd_products(
    listing: &ListingArgs,
    page: u32,
    all: bool,
    max_pages: Option<u32>,
    output: OutputOptions,
) -> Result<()> {
    let ctx = ClientContext::load()?;
    let query = query_from_args(listing, ctx.config.catalog.page_size)?;
    let mut controller = CatalogController::new(ctx.api, CatalogState::with_query(query));

    controller.load().await?;
    let mut warning = None;
    if all {
        warning = controller.load_all(max_pages).await;
    } else if page != 1 {
        let moved = controller.try_update(|s| s.jump_to_page(page)).await?;
        if !moved {
            return Err(ShopError::validation(format!(
                "page {page} is out of range (1-{})",
                controller.state().total_pages().max(1)
            )));
        }
    }

    let state = controller.state();
    let json_output = json!({
        "query": state.query().to_query_string(),
        "page": state.page(),
        "total_pages": state.total_pages(),
        "total_elements": state.total_elements(),
        "items": state.items(),
        "warning": warning.as_ref().map(|t| t.message.clone()),
    });

    let mut text = String::new();
    if state.items().is_empty() {
        text.push_str(&"No products match.".dimmed().to_string());
    } else {
        text.push_str(&product_table(state.items()));
        text.push('\n');
        let summary = if all {
            format!(
                "{} of {} products",
                state.items().len(),
                state.total_elements()
            )
        } else {
            format!(
                "Page {} of {} ({} products)",
                state.page(),
                state.total_pages().max(1),
                state.total_elements()
            )
        };
        text.push_str(&summary.dimmed().to_string());
    }

    CommandOutput::new(json_output).with_text(text).print(output)?;
    if let Some(toast) = warning {
        toast.eprint();
    }
    Ok(())
}

/// Show one product
pub async fn cmd_product(id: u64, output: OutputOptions) -> Result<()> {
    let ctx = ClientContext::load()?;
    let product = ctx.api.get_product(id).await?;

    let mut text = format!("{} {}\n", format!("#{}", product.id).cyan(), product.name.bold());
    text.push_str(&format!("Price: {}\n", format_price(product.price)));
    text.push_str(&format!("Stock: {}\n", product.stock_quantity));
    if let Some(category) = product.category_id {
        text.push_str(&format!("Category: {category}\n"));
    }
    if !product.active {
        text.push_str(&format!("{}\n", "inactive".dimmed()));
    }
    if let Some(updated) = &product.updated_at {
        text.push_str(&format!("{}\n", format!("Updated {updated}").dimmed()));
    }
    if !product.description.is_empty() {
        text.push('\n');
        text.push_str(&product.description);
    }

    CommandOutput::new(serde_json::to_value(&product)?)
        .with_text(text.trim_end().to_string())
        .print(output)
}

/// List product categories
pub async fn cmd_categories(output: OutputOptions) -> Result<()> {
    let ctx = ClientContext::load()?;
    let categories = ctx.api.list_categories().await?;

    let text = if categories.is_empty() {
        "No categories.".dimmed().to_string()
    } else {
        categories
            .iter()
            .map(|c| match &c.description {
                Some(d) if !d.is_empty() => format!("{:>4}  {} - {}", c.id.cyan(), c.name, d.dimmed()),
                _ => format!("{:>4}  {}", c.id.cyan(), c.name),
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    CommandOutput::new(serde_json::to_value(&categories)?)
        .with_text(text)
        .print(output)
}

/// Show the popular, new and recommended lists
pub async fn cmd_sidebar(limit: Option<u32>, output: OutputOptions) -> Result<()> {
    let ctx = ClientContext::load()?;
    let limit = limit.unwrap_or(ctx.config.catalog.sidebar_limit);
    let sidebar = load_sidebar(&ctx.api, limit).await;

    let json_output = json!(
        sidebar
            .sections
            .iter()
            .map(|s| json!({
                "list": s.list.title(),
                "products": s.products,
                "error": s.error,
            }))
            .collect::<Vec<_>>()
    );

    let mut text = String::new();
    for section in &sidebar.sections {
        text.push_str(&format!("{}\n", section.list.title().cyan().bold()));
        match section.empty_message() {
            Some(message) => text.push_str(&format!("  {}\n", message.dimmed())),
            None => {
                for p in &section.products {
                    text.push_str(&format!("  {} {}\n", p.name, format_price(p.price).dimmed()));
                }
            }
        }
        text.push('\n');
    }

    CommandOutput::new(json_output)
        .with_text(text.trim_end().to_string())
        .print(output)
}
