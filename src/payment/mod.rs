//! Order payment: initiation and gateway-return reconciliation.
//!
//! Gateway payments leave the client for an external page. Before handing
//! out that URL a `pendingPayment` marker is written to client storage so
//! the return can be matched to an order even when the gateway drops our
//! query parameters. Cash on delivery is confirmed in a single request and
//! never touches storage.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::StoreApi;
use crate::api::types::{
    CreatePayment, Order, OrderStatus, PaymentStatus, PaymentVerification,
};
use crate::error::{Result, ShopError};
use crate::storage::{ClientStorage, PENDING_PAYMENT_KEY};

/// Query parameter marking a URL as a gateway return
pub const RETURN_MARKER_PARAM: &str = "paymentReturn";
pub const ORDER_ID_PARAM: &str = "orderId";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CashOnDelivery,
    Card,
    EWallet,
}

impl PaymentMethod {
    /// Wire name sent to the payments endpoint
    pub fn as_param(self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "COD",
            PaymentMethod::Card => "CARD",
            PaymentMethod::EWallet => "E_WALLET",
        }
    }

    /// Whether paying requires a redirect to the external gateway
    pub fn uses_gateway(self) -> bool {
        !matches!(self, PaymentMethod::CashOnDelivery)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::CashOnDelivery => write!(f, "cod"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::EWallet => write!(f, "ewallet"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "cod" | "cash" | "cashondelivery" => Ok(PaymentMethod::CashOnDelivery),
            "card" => Ok(PaymentMethod::Card),
            "ewallet" | "wallet" => Ok(PaymentMethod::EWallet),
            _ => Err(ShopError::validation(format!(
                "invalid payment method '{s}', expected cod, card or ewallet"
            ))),
        }
    }
}

/// Marker persisted under `pendingPayment` while the user is at the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPayment {
    pub order_id: u64,
    pub amount: f64,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl PendingPayment {
    pub fn for_order(order: &Order) -> Self {
        Self {
            order_id: order.id,
            amount: order.total_amount,
            timestamp: jiff::Timestamp::now().as_millisecond(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// Send the user to the gateway
    Redirect { url: String },
    /// Cash on delivery accepted
    Confirmed(Order),
}

/// Refuse orders that can no longer be paid
pub fn ensure_payable(order: &Order) -> Result<()> {
    if order.payment_status == PaymentStatus::Paid {
        return Err(ShopError::validation(format!(
            "order #{} is already paid",
            order.id
        )));
    }
    if order.status == OrderStatus::Cancelled {
        return Err(ShopError::validation(format!(
            "order #{} is cancelled",
            order.id
        )));
    }
    Ok(())
}

/// Return URL handed to the gateway, tagged so the return can be detected
pub fn gateway_return_url(base: &str, order_id: u64) -> Result<String> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut()
        .append_pair(RETURN_MARKER_PARAM, "1")
        .append_pair(ORDER_ID_PARAM, &order_id.to_string());
    Ok(url.to_string())
}

/// Start paying for `order`.
///
/// Nothing is written to storage unless the gateway accepted the payment.
pub async fn initiate<A, S>(
    api: &A,
    storage: &S,
    order: &Order,
    method: PaymentMethod,
    return_url: &str,
) -> Result<PaymentOutcome>
where
    A: StoreApi,
    S: ClientStorage,
{
    ensure_payable(order)?;

    if !method.uses_gateway() {
        let confirmed = api.confirm_cod(order.id).await?;
        tracing::info!(order = order.id, "cash on delivery confirmed");
        return Ok(PaymentOutcome::Confirmed(confirmed));
    }

    let request = CreatePayment {
        order_id: order.id,
        method: method.as_param().to_string(),
        return_url: gateway_return_url(return_url, order.id)?,
    };
    let initiation = api.create_payment(&request).await?;
    if initiation.payment_url.trim().is_empty() {
        return Err(ShopError::Api("payment gateway returned no redirect URL".into()));
    }

    storage.set_json(PENDING_PAYMENT_KEY, &PendingPayment::for_order(order))?;
    tracing::info!(order = order.id, %method, "payment initiated, awaiting gateway return");
    Ok(PaymentOutcome::Redirect {
        url: initiation.payment_url,
    })
}

/// Parameters the gateway appended to the return URL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayReturn {
    pub order_id: Option<u64>,
    /// Every query parameter except the return marker
    pub params: BTreeMap<String, String>,
}

impl GatewayReturn {
    /// Recognise a gateway return by its `paymentReturn` parameter
    pub fn detect(url: &Url) -> Option<Self> {
        let mut is_return = false;
        let mut params = BTreeMap::new();
        for (key, value) in url.query_pairs() {
            if key == RETURN_MARKER_PARAM {
                is_return = true;
            } else {
                params.insert(key.into_owned(), value.into_owned());
            }
        }
        if !is_return {
            return None;
        }

        let order_id = params.get(ORDER_ID_PARAM).and_then(|v| v.parse().ok());
        Some(Self { order_id, params })
    }
}

/// Result of matching a gateway return with the backend
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub verification: PaymentVerification,
    pub order: Order,
    /// The pending marker was removed because the payment is settled
    pub marker_cleared: bool,
}

/// Read the pending marker, ignoring one that cannot be parsed
pub fn pending_payment<S: ClientStorage>(storage: &S) -> Result<Option<PendingPayment>> {
    match storage.get_json::<PendingPayment>(PENDING_PAYMENT_KEY) {
        Ok(marker) => Ok(marker),
        Err(ShopError::Json(e)) => {
            tracing::warn!("ignoring unreadable pending payment marker: {e}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Verify a gateway return and refresh the order.
///
/// The order comes from the return URL, falling back to the pending marker.
/// The marker is cleared only once the payment status is final.
pub async fn reconcile<A, S>(api: &A, storage: &S, ret: &GatewayReturn) -> Result<Reconciliation>
where
    A: StoreApi,
    S: ClientStorage,
{
    let marker = pending_payment(storage)?;
    let order_id = ret
        .order_id
        .or(marker.as_ref().map(|m| m.order_id))
        .ok_or_else(|| {
            ShopError::validation("payment return names no order and no payment is pending")
        })?;

    let verification = api.verify_payment(order_id, &ret.params).await?;
    let order = api.get_order(order_id).await?;

    let settled = order.payment_status.is_final();
    let marker_cleared = settled && marker.is_some_and(|m| m.order_id == order_id);
    if marker_cleared {
        storage.remove_item(PENDING_PAYMENT_KEY)?;
    }
    tracing::info!(
        order = order_id,
        status = %order.payment_status,
        marker_cleared,
        "payment return reconciled"
    );

    Ok(Reconciliation {
        verification,
        order,
        marker_cleared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn order(status: OrderStatus, payment_status: PaymentStatus) -> Order {
        Order {
            id: 42,
            items: vec![],
            total_amount: 59.9,
            status,
            payment_status,
            payment_method: None,
            shipping_address: None,
            created_at: None,
        }
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            "COD".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::CashOnDelivery
        );
        assert_eq!(
            "e-wallet".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::EWallet
        );
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        assert!(PaymentMethod::Card.uses_gateway());
        assert!(!PaymentMethod::CashOnDelivery.uses_gateway());
    }

    #[test]
    fn test_paid_and_cancelled_orders_are_not_payable() {
        assert!(ensure_payable(&order(OrderStatus::Pending, PaymentStatus::Unpaid)).is_ok());
        assert!(matches!(
            ensure_payable(&order(OrderStatus::Confirmed, PaymentStatus::Paid)),
            Err(ShopError::Validation(_))
        ));
        assert!(matches!(
            ensure_payable(&order(OrderStatus::Cancelled, PaymentStatus::Unpaid)),
            Err(ShopError::Validation(_))
        ));
    }

    #[test]
    fn test_return_url_roundtrips_through_detect() {
        let tagged = gateway_return_url("shopfront://payment-return", 42).unwrap();
        let mut url = Url::parse(&tagged).unwrap();
        url.query_pairs_mut().append_pair("vnp_ResponseCode", "00");

        let ret = GatewayReturn::detect(&url).unwrap();
        assert_eq!(ret.order_id, Some(42));
        assert_eq!(ret.params.get("vnp_ResponseCode").map(String::as_str), Some("00"));
        assert!(!ret.params.contains_key(RETURN_MARKER_PARAM));
    }

    #[test]
    fn test_detect_ignores_ordinary_urls() {
        let url = Url::parse("https://shop.example.com/orders?orderId=3").unwrap();
        assert!(GatewayReturn::detect(&url).is_none());
    }

    #[test]
    fn test_corrupt_marker_is_ignored() {
        let storage = MemoryStorage::new();
        storage.set_item(PENDING_PAYMENT_KEY, "{broken").unwrap();
        assert!(pending_payment(&storage).unwrap().is_none());
    }

    #[test]
    fn test_marker_wire_format() {
        let marker = PendingPayment {
            order_id: 7,
            amount: 12.5,
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&marker).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"orderId": 7, "amount": 12.5, "timestamp": 1_700_000_000_000i64})
        );
    }
}
