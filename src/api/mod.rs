//! Shop REST API access.
//!
//! [`StoreApi`] is the seam between the client state machines and the
//! network. [`HttpStoreApi`] is the reqwest implementation; tests plug in
//! in-memory fakes.

pub mod client;
pub mod types;

use std::collections::BTreeMap;

pub use client::HttpStoreApi;
pub use types::{
    AddCartItem, Cart, Category, ChangePassword, CreatePayment, LoginRequest, LoginResponse,
    Order, PageResult, PaymentInitiation, PaymentVerification, PlaceOrder, Product, ProductDraft,
    UserProfile,
};

use crate::catalog::query::CatalogQuery;
use crate::catalog::sidebar::SidebarList;
use crate::error::Result;

/// Common interface for the shop backend
pub trait StoreApi: Send + Sync {
    /// Fetch one page of the product listing
    fn list_products(
        &self,
        query: &CatalogQuery,
    ) -> impl std::future::Future<Output = Result<PageResult<Product>>> + Send;

    fn get_product(&self, id: u64) -> impl std::future::Future<Output = Result<Product>> + Send;

    /// Fetch one of the curated sidebar lists
    fn sidebar_products(
        &self,
        list: SidebarList,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Product>>> + Send;

    fn list_categories(&self) -> impl std::future::Future<Output = Result<Vec<Category>>> + Send;

    fn create_product(
        &self,
        draft: &ProductDraft,
    ) -> impl std::future::Future<Output = Result<Product>> + Send;

    fn update_product(
        &self,
        id: u64,
        draft: &ProductDraft,
    ) -> impl std::future::Future<Output = Result<Product>> + Send;

    fn delete_product(&self, id: u64) -> impl std::future::Future<Output = Result<()>> + Send;

    fn get_cart(&self) -> impl std::future::Future<Output = Result<Cart>> + Send;

    fn add_to_cart(
        &self,
        item: &AddCartItem,
    ) -> impl std::future::Future<Output = Result<Cart>> + Send;

    fn remove_from_cart(
        &self,
        product_id: u64,
    ) -> impl std::future::Future<Output = Result<Cart>> + Send;

    fn place_order(
        &self,
        request: &PlaceOrder,
    ) -> impl std::future::Future<Output = Result<Order>> + Send;

    fn my_orders(&self) -> impl std::future::Future<Output = Result<Vec<Order>>> + Send;

    fn get_order(&self, id: u64) -> impl std::future::Future<Output = Result<Order>> + Send;

    /// Ask the backend for a gateway redirect URL
    fn create_payment(
        &self,
        request: &CreatePayment,
    ) -> impl std::future::Future<Output = Result<PaymentInitiation>> + Send;

    /// Confirm cash on delivery for an order
    fn confirm_cod(&self, order_id: u64) -> impl std::future::Future<Output = Result<Order>> + Send;

    /// Hand the gateway's return parameters to the backend for verification
    fn verify_payment(
        &self,
        order_id: u64,
        params: &BTreeMap<String, String>,
    ) -> impl std::future::Future<Output = Result<PaymentVerification>> + Send;

    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl std::future::Future<Output = Result<LoginResponse>> + Send;

    fn me(&self) -> impl std::future::Future<Output = Result<UserProfile>> + Send;

    fn change_password(
        &self,
        request: &ChangePassword,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Upload an already cropped PNG as the profile picture
    fn upload_avatar(
        &self,
        png: Vec<u8>,
    ) -> impl std::future::Future<Output = Result<UserProfile>> + Send;
}
