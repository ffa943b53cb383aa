use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("product '{0}' not found")]
    ProductNotFound(u64),

    #[error("order '{0}' not found")]
    OrderNotFound(u64),

    #[error("{0}")]
    Validation(String),

    #[error("not signed in. Run: shopfront session login <email>")]
    NotAuthenticated,

    #[error("this action requires the {0} role")]
    Forbidden(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("configuration error: {0}")]
    Config(String),

    // Errors reported by the shop API
    #[error("{0}")]
    Api(String),

    #[error("server responded {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification used when deciding how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure or non-2xx response
    Network,
    /// The API answered `success: false`
    Business,
    /// Rejected on the client before any request was sent
    Validation,
    /// Local IO, parsing, or configuration trouble
    Local,
}

impl ShopError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShopError::Http(_) | ShopError::Status { .. } => ErrorKind::Network,
            ShopError::Api(_) | ShopError::ProductNotFound(_) | ShopError::OrderNotFound(_) => {
                ErrorKind::Business
            }
            ShopError::Validation(_) | ShopError::NotAuthenticated | ShopError::Forbidden(_) => {
                ErrorKind::Validation
            }
            _ => ErrorKind::Local,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ShopError::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;
