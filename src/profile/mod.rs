//! Profile settings: password change and avatar upload.

use crate::api::StoreApi;
use crate::api::types::{ChangePassword, UserProfile};
use crate::cropper::CropSession;
use crate::error::{Result, ShopError};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Password change form as typed by the user
#[derive(Debug, Clone, Default)]
pub struct PasswordChangeForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChangeForm {
    /// Check the form without contacting the server
    pub fn validate(&self) -> Result<ChangePassword> {
        if self.current_password.is_empty()
            || self.new_password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(ShopError::validation("all password fields are required"));
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ShopError::validation(format!(
                "new password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.new_password != self.confirm_password {
            return Err(ShopError::validation(
                "new password and confirmation do not match",
            ));
        }
        if self.new_password == self.current_password {
            return Err(ShopError::validation(
                "new password must differ from the current one",
            ));
        }
        Ok(ChangePassword {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

/// Validate locally, then submit. Invalid forms never reach the network.
pub async fn change_password<A: StoreApi>(api: &A, form: &PasswordChangeForm) -> Result<()> {
    let request = form.validate()?;
    api.change_password(&request).await?;
    tracing::info!("password changed");
    Ok(())
}

/// Encode the crop and upload it as the new profile picture
pub async fn upload_avatar<A: StoreApi>(api: &A, crop: CropSession) -> Result<UserProfile> {
    let png = crop.confirm()?;
    tracing::debug!(bytes = png.len(), "uploading avatar");
    api.upload_avatar(png).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(current: &str, new: &str, confirm: &str) -> PasswordChangeForm {
        PasswordChangeForm {
            current_password: current.into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
        }
    }

    fn message(form: PasswordChangeForm) -> String {
        match form.validate() {
            Err(ShopError::Validation(m)) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_form() {
        let req = form("old-secret", "new-secret-1", "new-secret-1")
            .validate()
            .unwrap();
        assert_eq!(req.new_password, "new-secret-1");
    }

    #[test]
    fn test_rules() {
        assert!(message(form("", "abcdefgh", "abcdefgh")).contains("required"));
        assert!(message(form("old-secret", "short", "short")).contains("at least 8"));
        assert!(message(form("old-secret", "abcdefgh", "abcdefgx")).contains("do not match"));
        assert!(message(form("abcdefgh", "abcdefgh", "abcdefgh")).contains("differ"));
    }
}
