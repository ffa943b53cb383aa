pub mod api;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod cropper;
pub mod error;
pub mod notify;
pub mod paths;
pub mod payment;
pub mod profile;
pub mod session;
pub mod storage;
pub mod tui;

pub use api::{HttpStoreApi, StoreApi};
pub use catalog::{CatalogQuery, CatalogState};
pub use config::Config;
pub use error::{Result, ShopError};
