//! Shopping cart commands.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{ClientContext, CommandOutput, format_price};
use crate::api::StoreApi;
use crate::api::types::{AddCartItem, Cart};
use crate::cli::OutputOptions;
use crate::error::Result;

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "Product")]
    product_id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Subtotal")]
    subtotal: String,
}

fn cart_text(cart: &Cart) -> String {
    if cart.items.is_empty() {
        return "Your cart is empty.".dimmed().to_string();
    }

    let rows = cart.items.iter().map(|item| CartRow {
        product_id: item.product_id,
        name: item.product_name.clone(),
        quantity: item.quantity,
        price: format_price(item.unit_price),
        subtotal: format_price(item.subtotal()),
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{table}\nTotal: {}", format_price(cart.total_amount).bold())
}

pub async fn cmd_cart_ls(output: OutputOptions) -> Result<()> {
    let ctx = ClientContext::load()?;
    ctx.require_session()?;
    let cart = ctx.api.get_cart().await?;
    CommandOutput::new(serde_json::to_value(&cart)?)
        .with_text(cart_text(&cart))
        .print(output)
}

pub async fn cmd_cart_add(product_id: u64, quantity: u32, output: OutputOptions) -> Result<()> {
    let ctx = ClientContext::load()?;
    ctx.require_session()?;
    let cart = ctx
        .api
        .add_to_cart(&AddCartItem {
            product_id,
            quantity,
        })
        .await?;
    CommandOutput::new(serde_json::to_value(&cart)?)
        .with_text(format!(
            "Added {quantity} x #{product_id} to cart\n\n{}",
            cart_text(&cart)
        ))
        .print(output)
}

pub async fn cmd_cart_rm(product_id: u64, output: OutputOptions) -> Result<()> {
    let ctx = ClientContext::load()?;
    ctx.require_session()?;
    let cart = ctx.api.remove_from_cart(product_id).await?;
    CommandOutput::new(serde_json::to_value(&cart)?)
        .with_text(format!(
            "Removed #{product_id} from cart\n\n{}",
            cart_text(&cart)
        ))
        .print(output)
}
