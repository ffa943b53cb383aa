//! Session commands: login, logout and whoami.

use owo_colors::OwoColorize;
use serde_json::json;

use super::{ClientContext, CommandOutput};
use crate::api::StoreApi;
use crate::api::types::LoginRequest;
use crate::cli::OutputOptions;
use crate::error::{Result, ShopError};
use crate::session::Session;

pub async fn cmd_session_login(email: &str, password: &str, output: OutputOptions) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ShopError::validation("email and password are required"));
    }

    let mut ctx = ClientContext::load()?;
    let login = ctx
        .api
        .login(&LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })
        .await?;
    let session = Session::establish(&mut ctx.jar, login)?;
    let user = session.user();

    CommandOutput::new(json!({ "signed_in": true, "user": user }))
        .with_text(format!(
            "Signed in as {}",
            user.map(|u| u.email.as_str()).unwrap_or(email).cyan()
        ))
        .print(output)
}

pub fn cmd_session_logout(output: OutputOptions) -> Result<()> {
    let mut ctx = ClientContext::load()?;
    let was_signed_in = ctx.session().is_some();
    Session::clear(&mut ctx.jar)?;

    let text = if was_signed_in {
        "Signed out".to_string()
    } else {
        "Not signed in".dimmed().to_string()
    };
    CommandOutput::new(json!({ "signed_out": was_signed_in }))
        .with_text(text)
        .print(output)
}

pub fn cmd_session_show(output: OutputOptions) -> Result<()> {
    let ctx = ClientContext::load()?;
    let Some(session) = ctx.session() else {
        return CommandOutput::new(json!({ "signed_in": false }))
            .with_text("Not signed in".dimmed().to_string())
            .print(output);
    };

    let text = match session.user() {
        Some(user) => format!(
            "{} {} ({})",
            user.full_name.as_deref().unwrap_or(&user.email).bold(),
            format!("<{}>", user.email).dimmed(),
            user.role
        ),
        None => "Signed in (user details unavailable)".to_string(),
    };

    CommandOutput::new(json!({
        "signed_in": true,
        "user": session.user(),
        "admin": session.is_admin(),
    }))
    .with_text(text)
    .print(output)
}
