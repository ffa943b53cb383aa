#[path = "common/mod.rs"]
mod common;

use common::{FakeStoreApi, order};
use shopfront::StoreApi;
use shopfront::api::types::{OrderStatus, PaymentStatus};
use shopfront::error::ShopError;
use shopfront::payment::{
    GatewayReturn, PaymentMethod, PaymentOutcome, PendingPayment, initiate, pending_payment,
    reconcile,
};
use shopfront::storage::{ClientStorage, MemoryStorage, PENDING_PAYMENT_KEY};
use url::Url;

const RETURN_URL: &str = "shopfront://payment-return";

fn unpaid_order_api() -> FakeStoreApi {
    FakeStoreApi::new().with_order(order(7, OrderStatus::Pending, PaymentStatus::Unpaid))
}

async fn start_card_payment(api: &FakeStoreApi, storage: &MemoryStorage) -> String {
    let o = api.get_order(7).await.unwrap();
    match initiate(api, storage, &o, PaymentMethod::Card, RETURN_URL)
        .await
        .unwrap()
    {
        PaymentOutcome::Redirect { url } => url,
        other => panic!("expected a redirect, got {other:?}"),
    }
}

// ============================================================================
// Initiation
// ============================================================================

#[tokio::test]
async fn test_card_payment_redirects_and_remembers_order() {
    let api = unpaid_order_api().with_payment_url("https://pay.example/checkout?tx=1");
    let storage = MemoryStorage::new();

    let url = start_card_payment(&api, &storage).await;
    assert_eq!(url, "https://pay.example/checkout?tx=1");

    let marker: PendingPayment = storage.get_json(PENDING_PAYMENT_KEY).unwrap().unwrap();
    assert_eq!(marker.order_id, 7);
    assert_eq!(marker.amount, 42.5);
    assert!(marker.timestamp > 0);

    let create = api
        .calls()
        .into_iter()
        .find(|c| c.starts_with("create_payment"))
        .unwrap();
    assert!(create.contains(" CARD "));
    assert!(create.contains("paymentReturn=1&orderId=7"));
}

#[tokio::test]
async fn test_rejected_payment_leaves_no_marker() {
    let api = unpaid_order_api().rejecting_payments("Gateway unavailable");
    let storage = MemoryStorage::new();
    let o = api.get_order(7).await.unwrap();

    let err = initiate(&api, &storage, &o, PaymentMethod::EWallet, RETURN_URL)
        .await
        .unwrap_err();

    assert!(matches!(err, ShopError::Api(ref m) if m == "Gateway unavailable"));
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_missing_redirect_url_is_an_error() {
    let api = unpaid_order_api();
    let storage = MemoryStorage::new();
    let o = api.get_order(7).await.unwrap();

    let result = initiate(&api, &storage, &o, PaymentMethod::Card, RETURN_URL).await;
    assert!(result.is_err());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_cash_on_delivery_skips_gateway() {
    let api = unpaid_order_api();
    let storage = MemoryStorage::new();
    let o = api.get_order(7).await.unwrap();

    let outcome = initiate(&api, &storage, &o, PaymentMethod::CashOnDelivery, RETURN_URL)
        .await
        .unwrap();

    match outcome {
        PaymentOutcome::Confirmed(confirmed) => {
            assert_eq!(confirmed.status, OrderStatus::Confirmed)
        }
        other => panic!("expected confirmation, got {other:?}"),
    }
    assert!(storage.is_empty());
    assert_eq!(api.call_count("create_payment"), 0);
    assert_eq!(api.call_count("confirm_cod"), 1);
}

#[tokio::test]
async fn test_settled_orders_are_not_payable() {
    let paid = order(8, OrderStatus::Confirmed, PaymentStatus::Paid);
    let cancelled = order(9, OrderStatus::Cancelled, PaymentStatus::Unpaid);
    let api = FakeStoreApi::new();
    let storage = MemoryStorage::new();

    for o in [paid, cancelled] {
        for method in [PaymentMethod::Card, PaymentMethod::CashOnDelivery] {
            let err = initiate(&api, &storage, &o, method, RETURN_URL)
                .await
                .unwrap_err();
            assert!(matches!(err, ShopError::Validation(_)));
        }
    }
    assert!(api.calls().is_empty());
    assert!(storage.is_empty());
}

// ============================================================================
// Gateway return
// ============================================================================

#[test]
fn test_detect_gateway_return() {
    let url = Url::parse("shopfront://payment-return?paymentReturn=1&orderId=7&code=00").unwrap();
    let ret = GatewayReturn::detect(&url).unwrap();
    assert_eq!(ret.order_id, Some(7));
    assert_eq!(ret.params.get("code").map(String::as_str), Some("00"));
    assert!(!ret.params.contains_key("paymentReturn"));

    let plain = Url::parse("shopfront://payment-return?orderId=7").unwrap();
    assert!(GatewayReturn::detect(&plain).is_none());
}

#[tokio::test]
async fn test_paid_return_clears_marker() {
    let api = unpaid_order_api()
        .with_payment_url("https://pay.example/checkout")
        .settling_as(PaymentStatus::Paid);
    let storage = MemoryStorage::new();
    start_card_payment(&api, &storage).await;

    let url = Url::parse(&format!("{RETURN_URL}?paymentReturn=1&orderId=7&code=00")).unwrap();
    let ret = GatewayReturn::detect(&url).unwrap();
    let result = reconcile(&api, &storage, &ret).await.unwrap();

    assert_eq!(result.order.payment_status, PaymentStatus::Paid);
    assert!(result.marker_cleared);
    assert!(storage.is_empty());

    let verify = api
        .calls()
        .into_iter()
        .find(|c| c.starts_with("verify_payment"))
        .unwrap();
    assert_eq!(verify, "verify_payment 7 code=00&orderId=7");
}

#[tokio::test]
async fn test_unsettled_return_keeps_marker() {
    let api = unpaid_order_api()
        .with_payment_url("https://pay.example/checkout")
        .settling_as(PaymentStatus::Pending);
    let storage = MemoryStorage::new();
    start_card_payment(&api, &storage).await;

    let ret = GatewayReturn {
        order_id: Some(7),
        ..Default::default()
    };
    let result = reconcile(&api, &storage, &ret).await.unwrap();

    assert!(!result.marker_cleared);
    assert_eq!(pending_payment(&storage).unwrap().unwrap().order_id, 7);
}

#[tokio::test]
async fn test_return_without_order_id_uses_marker() {
    let api = unpaid_order_api()
        .with_payment_url("https://pay.example/checkout")
        .settling_as(PaymentStatus::Failed);
    let storage = MemoryStorage::new();
    start_card_payment(&api, &storage).await;

    let result = reconcile(&api, &storage, &GatewayReturn::default())
        .await
        .unwrap();

    assert_eq!(result.verification.order_id, 7);
    assert!(result.marker_cleared);
}

#[tokio::test]
async fn test_return_for_other_order_keeps_marker() {
    let api = unpaid_order_api()
        .with_order(order(11, OrderStatus::Pending, PaymentStatus::Unpaid))
        .with_payment_url("https://pay.example/checkout")
        .settling_as(PaymentStatus::Paid);
    let storage = MemoryStorage::new();
    start_card_payment(&api, &storage).await;

    let ret = GatewayReturn {
        order_id: Some(11),
        ..Default::default()
    };
    let result = reconcile(&api, &storage, &ret).await.unwrap();

    assert!(!result.marker_cleared);
    assert!(!storage.is_empty());
}

#[tokio::test]
async fn test_return_with_nothing_to_reconcile() {
    let api = unpaid_order_api();
    let storage = MemoryStorage::new();

    let err = reconcile(&api, &storage, &GatewayReturn::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::Validation(_)));
    assert!(api.calls().is_empty());
}

#[test]
fn test_corrupt_marker_is_ignored() {
    let storage = MemoryStorage::new();
    storage.set_item(PENDING_PAYMENT_KEY, "{not json").unwrap();
    assert!(pending_payment(&storage).unwrap().is_none());
}
