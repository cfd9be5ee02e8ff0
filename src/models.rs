//! Order documents and the records they touch.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A persisted checkout transaction.
///
/// Created once at checkout; `order_date`, `products` and `shipping_address`
/// are immutable afterwards. `order_status` and `payment` are replaced later
/// by the payment-confirmation step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub client_id: Uuid,
    pub email: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub products: Vec<LineItem>,
    pub order_total: Decimal,
    pub shipping_address: ShippingAddress,
    pub shipping_method: String,
    pub tracking_number: String,
    pub shipping_status: String,
    /// Exactly four milestones, computed once at creation.
    pub delivery_schedule: Vec<Milestone>,
    pub amount: Decimal,
    pub transaction_id: String,
    #[serde(flatten)]
    pub payment: PaymentDetails,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(()),
        }
    }
}

/// Product snapshot embedded in an order. Name and price are copied at
/// checkout and stay decoupled from later catalog changes.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct LineItem {
    pub product_id: Uuid,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
    pub price: Decimal,
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct ShippingAddress {
    #[validate(length(min = 1))]
    pub name: String,
    pub phone: String,
    #[validate(length(min = 1))]
    pub street: String,
    #[validate(length(min = 1))]
    pub city: String,
    pub state: String,
    pub pin_code: String,
    pub locality: String,
    /// Delivery context; `Work` addresses skip weekend delivery.
    pub kind: AddressKind,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressKind {
    #[default]
    Home,
    Work,
}

/// One labeled stage of the 4-stage delivery schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub label: MilestoneLabel,
    /// Human-formatted date, e.g. "Tue, 3rd Jun".
    pub date: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestoneLabel {
    #[serde(rename = "Order Confirmed")]
    OrderConfirmed,
    Shipped,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivery,
}

impl std::fmt::Display for MilestoneLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::OrderConfirmed => "Order Confirmed",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivery => "Delivery",
        };
        write!(f, "{s}")
    }
}

/// Payment method plus the fields specific to it. Only the fields of the
/// chosen method exist on the document; the variants keep the sets mutually
/// exclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "payment_method")]
pub enum PaymentDetails {
    #[serde(rename = "COD")]
    CashOnDelivery,
    #[serde(rename = "UPI")]
    Upi { upi_id: String },
    #[serde(rename = "CARD")]
    Card {
        card_number: String,
        card_expiry_date: String,
        card_cvv: String,
    },
}

impl PaymentDetails {
    pub fn method(&self) -> &'static str {
        match self {
            Self::CashOnDelivery => "COD",
            Self::Upi { .. } => "UPI",
            Self::Card { .. } => "CARD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payment_fields_follow_the_method() {
        let upi = serde_json::to_value(PaymentDetails::Upi {
            upi_id: "shopper@upi".into(),
        })
        .unwrap();
        assert_eq!(upi["payment_method"], "UPI");
        assert_eq!(upi["upi_id"], "shopper@upi");
        assert!(upi.get("card_number").is_none());

        let card: PaymentDetails = serde_json::from_value(json!({
            "payment_method": "CARD",
            "card_number": "4111111111111111",
            "card_expiry_date": "12/27",
            "card_cvv": "123",
        }))
        .unwrap();
        assert_eq!(card.method(), "CARD");
    }

    #[test]
    fn order_document_flattens_payment() {
        let order = Order {
            id: Uuid::nil(),
            client_id: Uuid::nil(),
            email: "shopper@example.com".into(),
            order_date: Utc::now(),
            order_status: OrderStatus::Pending,
            products: vec![],
            order_total: Decimal::new(49900, 2),
            shipping_address: ShippingAddress {
                name: "A Shopper".into(),
                phone: "5550100".into(),
                street: "1 High St".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                pin_code: "62701".into(),
                locality: "Downtown".into(),
                kind: AddressKind::Home,
            },
            shipping_method: "Standard".into(),
            tracking_number: "TRK-1".into(),
            shipping_status: "Preparing".into(),
            delivery_schedule: vec![],
            amount: Decimal::new(49900, 2),
            transaction_id: "TXN-1".into(),
            payment: PaymentDetails::CashOnDelivery,
        };
        let doc = serde_json::to_value(&order).unwrap();
        assert_eq!(doc["payment_method"], "COD");
        assert_eq!(doc["order_status"], "Pending");

        let back: Order = serde_json::from_value(doc).unwrap();
        assert_eq!(back.payment, PaymentDetails::CashOnDelivery);
    }

    #[test]
    fn milestone_labels_render_as_stage_names() {
        assert_eq!(MilestoneLabel::OrderConfirmed.to_string(), "Order Confirmed");
        assert_eq!(
            serde_json::to_value(MilestoneLabel::OutForDelivery).unwrap(),
            "Out for Delivery"
        );
    }
}
