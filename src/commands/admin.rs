//! Admin product management. The admin role is checked locally before any
//! request is sent.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{ClientContext, CommandOutput, format_price};
use crate::api::StoreApi;
use crate::api::types::ProductDraft;
use crate::cli::{OutputOptions, ProductFields};
use crate::error::{Result, ShopError};

fn draft_from_fields(fields: &ProductFields) -> Result<ProductDraft> {
    if fields.name.trim().is_empty() {
        return Err(ShopError::validation("product name is required"));
    }
    if !fields.price.is_finite() || fields.price < 0.0 {
        return Err(ShopError::validation("price must be a non-negative number"));
    }
    if fields.stock < 0 {
        return Err(ShopError::validation("stock cannot be negative"));
    }
    Ok(ProductDraft {
        name: fields.name.trim().to_string(),
        description: fields.description.clone(),
        price: fields.price,
        stock_quantity: fields.stock,
        image_url: fields.image_url.clone(),
        category_id: fields.category,
        active: !fields.inactive,
    })
}

fn admin_context() -> Result<ClientContext> {
    let ctx = ClientContext::load()?;
    ctx.require_session()?.require_admin()?;
    Ok(ctx)
}

pub async fn cmd_admin_product_create(fields: &ProductFields, output: OutputOptions) -> Result<()> {
    let draft = draft_from_fields(fields)?;
    let ctx = admin_context()?;
    let product = ctx.api.create_product(&draft).await?;
    CommandOutput::new(serde_json::to_value(&product)?)
        .with_text(format!(
            "Created product {} {} ({})",
            format!("#{}", product.id).cyan(),
            product.name,
            format_price(product.price)
        ))
        .print(output)
}

pub async fn cmd_admin_product_update(
    id: u64,
    fields: &ProductFields,
    output: OutputOptions,
) -> Result<()> {
    let draft = draft_from_fields(fields)?;
    let ctx = admin_context()?;
    let product = ctx.api.update_product(id, &draft).await?;
    CommandOutput::new(serde_json::to_value(&product)?)
        .with_text(format!(
            "Updated product {} {}",
            format!("#{}", product.id).cyan(),
            product.name
        ))
        .print(output)
}

pub async fn cmd_admin_product_delete(id: u64, output: OutputOptions) -> Result<()> {
    let ctx = admin_context()?;
    ctx.api.delete_product(id).await?;
    CommandOutput::new(json!({ "deleted": id }))
        .with_text(format!("Deleted product {}", format!("#{id}").cyan()))
        .print(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ProductFields {
        ProductFields {
            name: " Lamp ".into(),
            description: String::new(),
            price: 19.0,
            stock: 3,
            image_url: None,
            category: Some(2),
            inactive: false,
        }
    }

    #[test]
    fn test_draft_from_fields() {
        let draft = draft_from_fields(&fields()).unwrap();
        assert_eq!(draft.name, "Lamp");
        assert!(draft.active);
    }

    #[test]
    fn test_draft_rejects_bad_values() {
        let mut f = fields();
        f.name = "  ".into();
        assert!(draft_from_fields(&f).is_err());

        let mut f = fields();
        f.price = -1.0;
        assert!(draft_from_fields(&f).is_err());

        let mut f = fields();
        f.stock = -4;
        assert!(draft_from_fields(&f).is_err());
    }
}
