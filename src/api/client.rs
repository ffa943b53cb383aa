//! reqwest implementation of [`StoreApi`].
//!
//! The bearer token is protected from being logged through reqwest's request
//! logging by wrapping the header value in [`RedactedHeader`].

use std::collections::BTreeMap;
use std::fmt;

use reqwest::header;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::types::{
    AddCartItem, ApiEnvelope, Cart, Category, ChangePassword, CreatePayment, LoginRequest,
    LoginResponse, Order, PageData, PageResult, PaymentInitiation, PaymentVerification,
    PlaceOrder, Product, ProductDraft, UserProfile,
};
use super::StoreApi;
use crate::catalog::query::CatalogQuery;
use crate::catalog::sidebar::SidebarList;
use crate::config::Config;
use crate::error::{Result, ShopError};
use crate::session::Session;

/// Longest slice of a non-JSON error body quoted back to the user
const MAX_ERROR_BODY: usize = 200;

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn bearer(token: &str) -> Self {
        Self {
            value: format!("Bearer {token}"),
        }
    }

    fn as_header_value(&self) -> Result<header::HeaderValue> {
        let mut value = header::HeaderValue::from_str(&self.value)
            .map_err(|_| ShopError::Other("session token contains invalid characters".into()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// HTTP client for the shop API
pub struct HttpStoreApi {
    client: Client,
    base_url: Url,
    session: Option<Session>,
}

impl HttpStoreApi {
    /// Create a client from configuration, optionally authenticated
    pub fn from_config(config: &Config, session: Option<Session>) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url())?;
        if base_url.cannot_be_a_base() {
            return Err(ShopError::Config(format!(
                "api.base_url '{base_url}' cannot be used as a base URL"
            )));
        }

        let client = Client::builder()
            .timeout(config.api_timeout())
            .connect_timeout(config.api_timeout().min(std::time::Duration::from_secs(10)))
            .build()?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        endpoint_url(&self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!(%method, %url, "api request");

        let mut builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(session) = &self.session {
            let auth = RedactedHeader::bearer(session.bearer_token());
            builder = builder.header(header::AUTHORIZATION, auth.as_header_value()?);
        }
        Ok(builder)
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        if self.session.is_none() {
            return Err(ShopError::NotAuthenticated);
        }
        self.request(method, path)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        self.send_optional(builder)
            .await?
            .ok_or_else(|| ShopError::Api("response contained no data".to_string()))
    }

    async fn send_optional<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_envelope(status, &body)
    }
}

/// Append `path` to the base URL's path, keeping any prefix like `/api`
pub(crate) fn endpoint_url(base: &Url, path: &str) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ShopError::Config(format!("'{base}' cannot be used as a base URL")))?;
        segments.pop_if_empty();
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
    }
    Ok(url)
}

/// Decode a response body in the `{ success, data, message }` envelope.
///
/// `success: false` becomes [`ShopError::Api`] carrying the server message;
/// a 401 always means the stored session is no longer accepted.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<Option<T>> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(ShopError::NotAuthenticated);
    }

    match serde_json::from_str::<ApiEnvelope<T>>(body) {
        Ok(envelope) if envelope.success => Ok(envelope.data),
        Ok(envelope) => Err(ShopError::Api(envelope.message.unwrap_or_else(|| {
            format!("request failed ({})", status.as_u16())
        }))),
        Err(e) if status.is_success() => Err(ShopError::Json(e)),
        Err(_) => {
            let message: String = body.trim().chars().take(MAX_ERROR_BODY).collect();
            Err(ShopError::Status {
                status,
                message: if message.is_empty() {
                    status.canonical_reason().unwrap_or("no response body").to_string()
                } else {
                    message
                },
            })
        }
    }
}

impl StoreApi for HttpStoreApi {
    async fn list_products(&self, query: &CatalogQuery) -> Result<PageResult<Product>> {
        let builder = self
            .request(Method::GET, "products/all")?
            .query(&query.to_query_pairs());
        let data: PageData<Product> = self.send(builder).await?;
        Ok(PageResult::from_wire(data, query.page))
    }

    async fn get_product(&self, id: u64) -> Result<Product> {
        let builder = self.request(Method::GET, &format!("products/{id}"))?;
        match self.send_optional(builder).await? {
            Some(product) => Ok(product),
            None => Err(ShopError::ProductNotFound(id)),
        }
    }

    async fn sidebar_products(&self, list: SidebarList, limit: u32) -> Result<Vec<Product>> {
        let builder = self
            .request(Method::GET, list.path())?
            .query(&[("limit", limit)]);
        Ok(self.send_optional(builder).await?.unwrap_or_default())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let builder = self.request(Method::GET, "categories")?;
        Ok(self.send_optional(builder).await?.unwrap_or_default())
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        let builder = self.authed(Method::POST, "products")?.json(draft);
        self.send(builder).await
    }

    async fn update_product(&self, id: u64, draft: &ProductDraft) -> Result<Product> {
        let builder = self
            .authed(Method::PUT, &format!("products/{id}"))?
            .json(draft);
        self.send(builder).await
    }

    async fn delete_product(&self, id: u64) -> Result<()> {
        let builder = self.authed(Method::DELETE, &format!("products/{id}"))?;
        self.send_optional::<serde_json::Value>(builder).await?;
        Ok(())
    }

    async fn get_cart(&self) -> Result<Cart> {
        let builder = self.authed(Method::GET, "cart")?;
        Ok(self.send_optional(builder).await?.unwrap_or_default())
    }

    async fn add_to_cart(&self, item: &AddCartItem) -> Result<Cart> {
        let builder = self.authed(Method::POST, "cart/items")?.json(item);
        self.send(builder).await
    }

    async fn remove_from_cart(&self, product_id: u64) -> Result<Cart> {
        let builder = self.authed(Method::DELETE, &format!("cart/items/{product_id}"))?;
        Ok(self.send_optional(builder).await?.unwrap_or_default())
    }

    async fn place_order(&self, request: &PlaceOrder) -> Result<Order> {
        let builder = self.authed(Method::POST, "orders")?.json(request);
        self.send(builder).await
    }

    async fn my_orders(&self) -> Result<Vec<Order>> {
        let builder = self.authed(Method::GET, "orders/my")?;
        Ok(self.send_optional(builder).await?.unwrap_or_default())
    }

    async fn get_order(&self, id: u64) -> Result<Order> {
        let builder = self.authed(Method::GET, &format!("orders/{id}"))?;
        match self.send_optional(builder).await? {
            Some(order) => Ok(order),
            None => Err(ShopError::OrderNotFound(id)),
        }
    }

    async fn create_payment(&self, request: &CreatePayment) -> Result<PaymentInitiation> {
        let builder = self.authed(Method::POST, "payments/create")?.json(request);
        self.send(builder).await
    }

    async fn confirm_cod(&self, order_id: u64) -> Result<Order> {
        let builder = self.authed(Method::POST, &format!("payments/{order_id}/cod"))?;
        self.send(builder).await
    }

    async fn verify_payment(
        &self,
        order_id: u64,
        params: &BTreeMap<String, String>,
    ) -> Result<PaymentVerification> {
        let builder = self
            .authed(Method::POST, &format!("payments/{order_id}/verify"))?
            .json(params);
        self.send(builder).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let builder = self.request(Method::POST, "auth/login")?.json(request);
        self.send(builder).await
    }

    async fn me(&self) -> Result<UserProfile> {
        let builder = self.authed(Method::GET, "users/me")?;
        self.send(builder).await
    }

    async fn change_password(&self, request: &ChangePassword) -> Result<()> {
        let builder = self.authed(Method::PUT, "users/me/password")?.json(request);
        self.send_optional::<serde_json::Value>(builder).await?;
        Ok(())
    }

    async fn upload_avatar(&self, png: Vec<u8>) -> Result<UserProfile> {
        let part = reqwest::multipart::Part::bytes(png)
            .file_name("avatar.png")
            .mime_str("image/png")?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let builder = self.authed(Method::POST, "users/me/avatar")?.multipart(form);
        self.send(builder).await
    }
}
