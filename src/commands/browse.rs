//! Interactive catalog browser command.

use std::sync::Arc;

use iocraft::prelude::*;

use super::{ClientContext, query_from_args};
use crate::cli::ListingArgs;
use crate::error::{Result, ShopError};
use crate::tui::{BrowserSettings, CatalogBrowser};

pub async fn cmd_browse(listing: &ListingArgs) -> Result<()> {
    let ctx = ClientContext::load()?;
    let query = query_from_args(listing, ctx.config.catalog.page_size)?;
    let settings = BrowserSettings::from_config(&ctx.config);
    let user = ctx
        .session()
        .and_then(|s| s.user())
        .map(|u| u.full_name.clone().unwrap_or_else(|| u.email.clone()));
    let api = Arc::new(ctx.api);

    element!(CatalogBrowser(
        api: Some(api),
        query: Some(query),
        settings: settings,
        user: user,
    ))
    .fullscreen()
    .await
    .map_err(|e| ShopError::Other(format!("TUI error: {e}")))
}
