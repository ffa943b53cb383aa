#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use parking_lot::Mutex;
use tempfile::TempDir;

use shopfront::StoreApi;
use shopfront::api::types::{
    AddCartItem, Cart, Category, ChangePassword, CreatePayment, LoginRequest, LoginResponse,
    Order, OrderStatus, PageResult, PaymentInitiation, PaymentStatus, PaymentVerification,
    PlaceOrder, Product, ProductDraft, UserProfile,
};
use shopfront::catalog::{CatalogQuery, SidebarList};
use shopfront::error::{Result, ShopError};

/// Nothing listens here, so any request the binary makes fails fast
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9/api";

/// Runs the shopfront binary against an isolated `SHOPFRONT_HOME`
pub struct ShopTest {
    pub temp_dir: TempDir,
    binary_path: PathBuf,
}

impl ShopTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        ShopTest {
            temp_dir,
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_shopfront")),
        }
    }

    pub fn home(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.run_with_env(args, &[])
    }

    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut cmd = Command::new(&self.binary_path);
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .env("SHOPFRONT_HOME", self.temp_dir.path())
            .env("SHOPFRONT_API_URL", UNREACHABLE_API)
            .env("NO_COLOR", "1")
            .env_remove("SHOPFRONT_LOG");
        for (key, value) in env {
            cmd.env(key, value);
        }
        cmd.output().expect("Failed to execute shopfront command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_file(&self, name: &str, content: &str) {
        std::fs::write(self.temp_dir.path().join(name), content)
            .expect("Failed to write test file");
    }

    pub fn read_file(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.temp_dir.path().join(name)).ok()
    }
}

pub fn product(id: u64, name: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: String::new(),
        price: 10.0 + id as f64,
        stock_quantity: 5,
        image_url: None,
        category_id: None,
        active: true,
        created_at: None,
        updated_at: None,
    }
}

/// `count` products named "Product 1".."Product N"
pub fn products(count: u64) -> Vec<Product> {
    (1..=count).map(|id| product(id, &format!("Product {id}"))).collect()
}

pub fn order(id: u64, status: OrderStatus, payment_status: PaymentStatus) -> Order {
    Order {
        id,
        items: vec![],
        total_amount: 42.5,
        status,
        payment_status,
        payment_method: None,
        shipping_address: Some("1 Main St".into()),
        created_at: None,
    }
}

/// In-memory shop backend that records every call it receives
#[derive(Default)]
pub struct FakeStoreApi {
    catalog: Vec<Product>,
    /// Serve these items for the given page instead of slicing `catalog`
    page_overrides: HashMap<u32, Vec<Product>>,
    fail_listing: bool,
    /// Listing requests for this page and later fail
    failing_from_page: Option<u32>,
    failing_lists: HashSet<SidebarList>,
    sidebar: Vec<Product>,
    orders: Mutex<HashMap<u64, Order>>,
    payment_url: Option<String>,
    payment_error: Option<String>,
    /// Status the gateway reports once a return is verified
    settled_status: Option<PaymentStatus>,
    calls: Mutex<Vec<String>>,
}

impl FakeStoreApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: Vec<Product>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_page(mut self, page: u32, items: Vec<Product>) -> Self {
        self.page_overrides.insert(page, items);
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn failing_from_page(mut self, page: u32) -> Self {
        self.failing_from_page = Some(page);
        self
    }

    pub fn with_sidebar(mut self, products: Vec<Product>) -> Self {
        self.sidebar = products;
        self
    }

    pub fn failing_sidebar(mut self, list: SidebarList) -> Self {
        self.failing_lists.insert(list);
        self
    }

    pub fn with_order(self, order: Order) -> Self {
        self.orders.lock().insert(order.id, order);
        self
    }

    pub fn with_payment_url(mut self, url: &str) -> Self {
        self.payment_url = Some(url.to_string());
        self
    }

    /// Make `create_payment` answer `success: false` with this message
    pub fn rejecting_payments(mut self, message: &str) -> Self {
        self.payment_error = Some(message.to_string());
        self
    }

    pub fn settling_as(mut self, status: PaymentStatus) -> Self {
        self.settled_status = Some(status);
        self
    }

    /// Every call so far, e.g. `list_products search=&page=1&...`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Query strings of every `list_products` call
    pub fn listing_queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("list_products ").map(str::to_string))
            .collect()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(name))
            .count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

fn unsupported<T>(name: &str) -> Result<T> {
    Err(ShopError::Other(format!("{name} is not faked")))
}

impl StoreApi for FakeStoreApi {
    async fn list_products(&self, query: &CatalogQuery) -> Result<PageResult<Product>> {
        self.record(format!("list_products {}", query.to_query_string()));
        if self.fail_listing || self.failing_from_page.is_some_and(|p| query.page >= p) {
            return Err(ShopError::Api("catalog unavailable".into()));
        }

        let term = query.search_term.trim().to_lowercase();
        let matching: Vec<Product> = self
            .catalog
            .iter()
            .filter(|p| term.is_empty() || p.name.to_lowercase().contains(&term))
            .cloned()
            .collect();
        let size = query.page_size.max(1) as usize;
        let total_pages = matching.len().div_ceil(size) as u32;
        let items = match self.page_overrides.get(&query.page) {
            Some(items) => items.clone(),
            None => matching
                .iter()
                .skip((query.page.max(1) as usize - 1) * size)
                .take(size)
                .cloned()
                .collect(),
        };

        Ok(PageResult {
            items,
            total_elements: matching.len() as u64,
            total_pages,
            page: query.page,
        })
    }

    async fn get_product(&self, id: u64) -> Result<Product> {
        self.record(format!("get_product {id}"));
        self.catalog
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ShopError::ProductNotFound(id))
    }

    async fn sidebar_products(&self, list: SidebarList, limit: u32) -> Result<Vec<Product>> {
        self.record(format!("sidebar_products {} {limit}", list.path()));
        if self.failing_lists.contains(&list) {
            return Err(ShopError::Api(format!("{} failed", list.title())));
        }
        Ok(self.sidebar.clone())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.record("list_categories");
        Ok(vec![])
    }

    async fn create_product(&self, _draft: &ProductDraft) -> Result<Product> {
        unsupported("create_product")
    }

    async fn update_product(&self, _id: u64, _draft: &ProductDraft) -> Result<Product> {
        unsupported("update_product")
    }

    async fn delete_product(&self, _id: u64) -> Result<()> {
        unsupported("delete_product")
    }

    async fn get_cart(&self) -> Result<Cart> {
        unsupported("get_cart")
    }

    async fn add_to_cart(&self, _item: &AddCartItem) -> Result<Cart> {
        unsupported("add_to_cart")
    }

    async fn remove_from_cart(&self, _product_id: u64) -> Result<Cart> {
        unsupported("remove_from_cart")
    }

    async fn place_order(&self, _request: &PlaceOrder) -> Result<Order> {
        unsupported("place_order")
    }

    async fn my_orders(&self) -> Result<Vec<Order>> {
        self.record("my_orders");
        Ok(self.orders.lock().values().cloned().collect())
    }

    async fn get_order(&self, id: u64) -> Result<Order> {
        self.record(format!("get_order {id}"));
        self.orders
            .lock()
            .get(&id)
            .cloned()
            .ok_or(ShopError::OrderNotFound(id))
    }

    async fn create_payment(&self, request: &CreatePayment) -> Result<PaymentInitiation> {
        self.record(format!(
            "create_payment {} {} {}",
            request.order_id, request.method, request.return_url
        ));
        if let Some(message) = &self.payment_error {
            return Err(ShopError::Api(message.clone()));
        }
        Ok(PaymentInitiation {
            payment_url: self.payment_url.clone().unwrap_or_default(),
            transaction_id: Some("tx-1".into()),
        })
    }

    async fn confirm_cod(&self, order_id: u64) -> Result<Order> {
        self.record(format!("confirm_cod {order_id}"));
        let mut orders = self.orders.lock();
        let order = orders
            .get_mut(&order_id)
            .ok_or(ShopError::OrderNotFound(order_id))?;
        order.status = OrderStatus::Confirmed;
        order.payment_method = Some("COD".into());
        Ok(order.clone())
    }

    async fn verify_payment(
        &self,
        order_id: u64,
        params: &BTreeMap<String, String>,
    ) -> Result<PaymentVerification> {
        let encoded: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        self.record(format!("verify_payment {order_id} {}", encoded.join("&")));

        let mut orders = self.orders.lock();
        let order = orders
            .get_mut(&order_id)
            .ok_or(ShopError::OrderNotFound(order_id))?;
        if let Some(status) = self.settled_status {
            order.payment_status = status;
        }
        Ok(PaymentVerification {
            order_id,
            payment_status: order.payment_status,
            message: None,
        })
    }

    async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse> {
        unsupported("login")
    }

    async fn me(&self) -> Result<UserProfile> {
        unsupported("me")
    }

    async fn change_password(&self, _request: &ChangePassword) -> Result<()> {
        self.record("change_password");
        Ok(())
    }

    async fn upload_avatar(&self, png: Vec<u8>) -> Result<UserProfile> {
        self.record(format!("upload_avatar {}", png.len()));
        unsupported("upload_avatar")
    }
}
