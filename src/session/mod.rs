//! Session context for authenticated API calls.
//!
//! The bearer token and the signed-in user live in a small cookie jar on
//! disk (`token` and `user`, the latter as URL-encoded JSON). The jar is
//! read once at startup and turned into a [`Session`] that is handed to
//! every API call explicitly.

pub(crate) mod cookies;

pub use cookies::CookieJar;

use std::fmt;

use secrecy::{ExposeSecret, SecretBox};

use crate::api::types::{LoginResponse, Role, UserIdentity};
use crate::error::{Result, ShopError};

pub const TOKEN_COOKIE: &str = "token";
pub const USER_COOKIE: &str = "user";

/// Authenticated identity threaded through API calls
pub struct Session {
    token: SecretBox<String>,
    user: Option<UserIdentity>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Option<UserIdentity>) -> Self {
        Self {
            token: SecretBox::new(Box::new(token.into())),
            user,
        }
    }

    /// Build a session from the jar, or `None` when no token is stored.
    ///
    /// A malformed `user` cookie does not invalidate the token; the user is
    /// simply unknown until the next login.
    pub fn from_cookies(jar: &CookieJar) -> Option<Self> {
        let token = jar.get(TOKEN_COOKIE).filter(|t| !t.is_empty())?;
        let user = jar.get(USER_COOKIE).and_then(|raw| match decode_user(raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable user cookie: {e}");
                None
            }
        });
        Some(Self::new(token, user))
    }

    /// Persist a successful login into the jar and return the session
    pub fn establish(jar: &mut CookieJar, login: LoginResponse) -> Result<Self> {
        jar.set(TOKEN_COOKIE, login.token.clone());
        jar.set(USER_COOKIE, encode_user(&login.user)?);
        jar.save()?;
        Ok(Self::new(login.token, Some(login.user)))
    }

    /// Remove session cookies from the jar
    pub fn clear(jar: &mut CookieJar) -> Result<()> {
        jar.remove(TOKEN_COOKIE);
        jar.remove(USER_COOKIE);
        jar.save()
    }

    pub fn bearer_token(&self) -> &str {
        self.token.expose_secret()
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }

    /// Fail unless the signed-in user holds the admin role
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ShopError::Forbidden(Role::Admin.to_string()))
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Require a session, producing the standard "not signed in" error
pub fn require(session: Option<&Session>) -> Result<&Session> {
    session.ok_or(ShopError::NotAuthenticated)
}

pub fn encode_user(user: &UserIdentity) -> Result<String> {
    let json = serde_json::to_string(user)?;
    Ok(urlencoding::encode(&json).into_owned())
}

pub fn decode_user(raw: &str) -> Result<UserIdentity> {
    let json = urlencoding::decode(raw)
        .map_err(|e| ShopError::Other(format!("user cookie is not valid UTF-8: {e}")))?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserIdentity {
        UserIdentity {
            id: 3,
            email: "alice@example.com".to_string(),
            full_name: Some("Alice Nguyen".to_string()),
            role: Role::Customer,
        }
    }

    #[test]
    fn test_user_cookie_is_url_encoded_json() {
        let encoded = encode_user(&alice()).unwrap();
        assert!(encoded.starts_with("%7B%22id%22%3A3"));
        assert_eq!(decode_user(&encoded).unwrap(), alice());
    }

    #[test]
    fn test_session_from_cookies() {
        let mut jar = CookieJar::in_memory();
        assert!(Session::from_cookies(&jar).is_none());

        jar.set(TOKEN_COOKIE, "abc.def".to_string());
        jar.set(USER_COOKIE, encode_user(&alice()).unwrap());
        let session = Session::from_cookies(&jar).unwrap();
        assert_eq!(session.bearer_token(), "abc.def");
        assert_eq!(session.user().unwrap().email, "alice@example.com");
        assert!(!session.is_admin());
        assert!(matches!(
            session.require_admin(),
            Err(ShopError::Forbidden(_))
        ));
    }

    #[test]
    fn test_bad_user_cookie_keeps_token() {
        let mut jar = CookieJar::in_memory();
        jar.set(TOKEN_COOKIE, "abc".to_string());
        jar.set(USER_COOKIE, "not-json".to_string());
        let session = Session::from_cookies(&jar).unwrap();
        assert!(session.user().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("super-secret", None);
        let debug = format!("{session:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_establish_and_clear() {
        let mut jar = CookieJar::in_memory();
        let session = Session::establish(
            &mut jar,
            LoginResponse {
                token: "t0k".to_string(),
                user: alice(),
            },
        )
        .unwrap();
        assert_eq!(session.bearer_token(), "t0k");
        assert_eq!(jar.get(TOKEN_COOKIE), Some("t0k"));

        Session::clear(&mut jar).unwrap();
        assert!(Session::from_cookies(&jar).is_none());
    }
}
