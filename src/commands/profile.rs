//! Profile commands: view, password change and avatar upload.

use std::path::Path;

use owo_colors::OwoColorize;
use serde_json::json;

use super::{ClientContext, CommandOutput};
use crate::api::StoreApi;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::cropper::CropSession;
use crate::error::Result;
use crate::profile::{self, PasswordChangeForm};

pub async fn cmd_profile_show(output: OutputOptions) -> Result<()> {
    let ctx = ClientContext::load()?;
    ctx.require_session()?;
    let me = ctx.api.me().await?;

    let mut text = format!(
        "{} {}\n",
        me.full_name.as_deref().unwrap_or("(no name)").bold(),
        format!("<{}>", me.email).dimmed()
    );
    text.push_str(&format!("Role: {}\n", me.role));
    if let Some(phone) = &me.phone {
        text.push_str(&format!("Phone: {phone}\n"));
    }
    if let Some(avatar) = &me.avatar_url {
        text.push_str(&format!("Avatar: {avatar}\n"));
    }

    CommandOutput::new(serde_json::to_value(&me)?)
        .with_text(text.trim_end().to_string())
        .print(output)
}

/// Change the password. The form is checked before anything else runs, so
/// an invalid form never reaches the network.
pub async fn cmd_profile_password(
    form: PasswordChangeForm,
    output: OutputOptions,
) -> Result<()> {
    form.validate()?;

    let ctx = ClientContext::load()?;
    ctx.require_session()?;
    profile::change_password(&ctx.api, &form).await?;

    CommandOutput::new(json!({ "changed": true }))
        .with_text("Password changed".green().to_string())
        .print(output)
}

/// Placement of the avatar inside the crop circle
pub struct AvatarPlacement {
    pub zoom: f32,
    pub rotate: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

/// Crop an image and upload it, or save the crop locally with `save`
pub async fn cmd_profile_avatar(
    path: &Path,
    placement: AvatarPlacement,
    save: Option<&Path>,
    output: OutputOptions,
) -> Result<()> {
    let config = Config::load()?;
    let mut crop = CropSession::open(path, config.cropper.output_size)?;
    crop.set_zoom(placement.zoom);
    crop.set_rotation(placement.rotate);
    crop.drag(placement.pan_x, placement.pan_y);
    let (ox, oy) = crop.offset();

    if let Some(target) = save {
        let png = crop.confirm()?;
        std::fs::write(target, &png)?;
        return CommandOutput::new(json!({
            "saved": target.display().to_string(),
            "bytes": png.len(),
            "offset": [ox, oy],
        }))
        .with_text(format!("Saved crop to {}", target.display()))
        .print(output);
    }

    let ctx = ClientContext::load()?;
    ctx.require_session()?;
    let me = profile::upload_avatar(&ctx.api, crop).await?;

    CommandOutput::new(serde_json::to_value(&me)?)
        .with_text(format!(
            "{}{}",
            "Avatar updated".green(),
            me.avatar_url
                .as_deref()
                .map(|u| format!(": {u}"))
                .unwrap_or_default()
        ))
        .print(output)
}
