//! Order commands: checkout, history and payment.

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use url::Url;

use super::{
    ClientContext, CommandOutput, format_order_status, format_payment_status, format_price,
};
use crate::api::StoreApi;
use crate::api::types::{Order, PlaceOrder};
use crate::cli::OutputOptions;
use crate::error::{Result, ShopError};
use crate::payment::{self, GatewayReturn, PaymentMethod, PaymentOutcome};

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Placed")]
    placed: String,
}

fn order_text(order: &Order) -> String {
    let mut text = format!(
        "{} {} / {}\n",
        format!("Order #{}", order.id).cyan().bold(),
        format_order_status(order.status),
        format_payment_status(order.payment_status)
    );
    for item in &order.items {
        text.push_str(&format!(
            "  {} x {} @ {}\n",
            item.quantity,
            item.product_name,
            format_price(item.unit_price)
        ));
    }
    text.push_str(&format!("Total: {}\n", format_price(order.total_amount).bold()));
    if let Some(method) = &order.payment_method {
        text.push_str(&format!("Payment method: {method}\n"));
    }
    if let Some(address) = &order.shipping_address {
        text.push_str(&format!("Ship to: {address}\n"));
    }
    if let Some(created) = &order.created_at {
        text.push_str(&format!("{}", format!("Placed {created}").dimmed()));
    }
    text.trim_end().to_string()
}

/// Place an order for the current cart
pub async fn cmd_order_place(
    address: &str,
    note: Option<&str>,
    output: OutputOptions,
) -> Result<()> {
    if address.trim().is_empty() {
        return Err(ShopError::validation("shipping address is required"));
    }
    let ctx = ClientContext::load()?;
    ctx.require_session()?;

    let order = ctx
        .api
        .place_order(&PlaceOrder {
            shipping_address: address.trim().to_string(),
            note: note.map(str::to_string),
        })
        .await?;

    CommandOutput::new(serde_json::to_value(&order)?)
        .with_text(format!(
            "{}\n\n{}\n\nPay with: shopfront order pay {} --method <cod|card|ewallet>",
            "Order placed".green(),
            order_text(&order),
            order.id
        ))
        .print(output)
}

pub async fn cmd_order_ls(output: OutputOptions) -> Result<()> {
    let ctx = ClientContext::load()?;
    ctx.require_session()?;
    let orders = ctx.api.my_orders().await?;

    let text = if orders.is_empty() {
        "No orders yet.".dimmed().to_string()
    } else {
        let rows = orders.iter().map(|o| OrderRow {
            id: o.id,
            status: o.status.to_string(),
            payment: o.payment_status.to_string(),
            total: format_price(o.total_amount),
            placed: o.created_at.clone().unwrap_or_default(),
        });
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        table.to_string()
    };

    CommandOutput::new(serde_json::to_value(&orders)?)
        .with_text(text)
        .print(output)
}

pub async fn cmd_order_show(id: u64, output: OutputOptions) -> Result<()> {
    let ctx = ClientContext::load()?;
    ctx.require_session()?;
    let order = ctx.api.get_order(id).await?;
    CommandOutput::new(serde_json::to_value(&order)?)
        .with_text(order_text(&order))
        .print(output)
}

/// Pay for an order. Gateway methods print the redirect URL.
pub async fn cmd_order_pay(id: u64, method: PaymentMethod, output: OutputOptions) -> Result<()> {
    let ctx = ClientContext::load()?;
    ctx.require_session()?;
    let storage = ctx.storage()?;

    let order = ctx.api.get_order(id).await?;
    let outcome = payment::initiate(
        &ctx.api,
        &storage,
        &order,
        method,
        &ctx.config.payment.return_url,
    )
    .await?;

    match outcome {
        PaymentOutcome::Redirect { url } => CommandOutput::new(json!({
            "order_id": id,
            "method": method.to_string(),
            "redirect_url": url,
        }))
        .with_text(format!(
            "Continue payment for order #{id} at:\n  {}\n\nAfter paying, run: shopfront order return '<return url>'",
            url.cyan()
        ))
        .print(output),
        PaymentOutcome::Confirmed(order) => CommandOutput::new(serde_json::to_value(&order)?)
            .with_text(format!(
                "{}\n\n{}",
                "Cash on delivery confirmed".green(),
                order_text(&order)
            ))
            .print(output),
    }
}

/// Reconcile a gateway return, from its URL or from the pending marker
pub async fn cmd_order_return(url: Option<&str>, output: OutputOptions) -> Result<()> {
    let ret = match url {
        Some(raw) => {
            let parsed = Url::parse(raw)?;
            GatewayReturn::detect(&parsed).ok_or_else(|| {
                ShopError::validation(format!(
                    "'{raw}' is not a payment return URL (missing {})",
                    payment::RETURN_MARKER_PARAM
                ))
            })?
        }
        None => GatewayReturn::default(),
    };

    let ctx = ClientContext::load()?;
    ctx.require_session()?;
    let storage = ctx.storage()?;
    let result = payment::reconcile(&ctx.api, &storage, &ret).await?;

    let mut text = order_text(&result.order);
    if let Some(message) = &result.verification.message {
        text = format!("{message}\n\n{text}");
    }
    if !result.order.payment_status.is_final() {
        text.push_str(&format!(
            "\n\n{}",
            "Payment is still pending. Run this command again later.".yellow()
        ));
    }

    CommandOutput::new(json!({
        "order": result.order,
        "payment_status": result.verification.payment_status,
        "message": result.verification.message,
        "pending_cleared": result.marker_cleared,
    }))
    .with_text(text)
    .print(output)
}
