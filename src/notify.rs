//! Customer notifications.
//!
//! Emails are not sent in-process: the service publishes a structured
//! message to NATS and an out-of-process mail relay delivers it. No delivery
//! receipt comes back. Without a NATS connection the publish degrades to a
//! logged no-op, which keeps local development decoupled from mail
//! infrastructure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Order;

/// Subject the mail relay subscribes on.
pub const EMAIL_SUBJECT: &str = "notifications.email";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to publish notification: {0}")]
    Publish(#[from] async_nats::PublishError),
}

#[derive(Clone)]
pub struct Notifier {
    nats: Option<async_nats::Client>,
    from: String,
}

impl Notifier {
    pub fn new(nats: Option<async_nats::Client>, from: String) -> Self {
        Self { nats, from }
    }

    pub fn order_confirmation(&self, order: &Order) -> EmailMessage {
        EmailMessage {
            from: self.from.clone(),
            to: order.email.clone(),
            subject: "Order Confirmation".into(),
            html_body: render_confirmation(order),
        }
    }

    pub async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        match &self.nats {
            Some(client) => {
                let payload = serde_json::to_vec(&message)?;
                client.publish(EMAIL_SUBJECT, payload.into()).await?;
                Ok(())
            }
            None => {
                tracing::warn!(to = %message.to, "mail relay not configured; dropping notification");
                Ok(())
            }
        }
    }
}

fn render_confirmation(order: &Order) -> String {
    let mut products = String::new();
    for item in &order.products {
        products.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            item.name, item.quantity, item.price
        ));
    }

    let mut schedule = String::new();
    for milestone in &order.delivery_schedule {
        schedule.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            milestone.label, milestone.date
        ));
    }

    let address = &order.shipping_address;
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h1>Order Confirmation</h1>
  <h2>Order Information</h2>
  <table border="1" cellpadding="8">
    <tr><th>Order ID</th><td>{id}</td></tr>
    <tr><th>Order Date</th><td>{date}</td></tr>
    <tr><th>Status</th><td>{status}</td></tr>
    <tr><th>Tracking Number</th><td>{tracking}</td></tr>
  </table>
  <h2>Shipping Address</h2>
  <table border="1" cellpadding="8">
    <tr><th>Name</th><td>{name}</td></tr>
    <tr><th>Phone</th><td>{phone}</td></tr>
    <tr><th>Address</th><td>{street}, {locality}, {city}, {state} - {pin}</td></tr>
  </table>
  <h2>Products</h2>
  <table border="1" cellpadding="8">
    <thead><tr><th>Name</th><th>Quantity</th><th>Price</th></tr></thead>
    <tbody>{products}</tbody>
  </table>
  <h2>Expected Delivery</h2>
  <table border="1" cellpadding="8">
    <thead><tr><th>Stage</th><th>Date</th></tr></thead>
    <tbody>{schedule}</tbody>
  </table>
  <h2>Payment Information</h2>
  <table border="1" cellpadding="8">
    <tr><th>Method</th><td>{method}</td></tr>
    <tr><th>Amount</th><td>{amount}</td></tr>
    <tr><th>Transaction ID</th><td>{transaction}</td></tr>
  </table>
</body>
</html>"#,
        id = order.id,
        date = order.order_date.to_rfc2822(),
        status = order.order_status,
        tracking = order.tracking_number,
        name = address.name,
        phone = address.phone,
        street = address.street,
        locality = address.locality,
        city = address.city,
        state = address.state,
        pin = address.pin_code,
        products = products,
        schedule = schedule,
        method = order.payment.method(),
        amount = order.amount,
        transaction = order.transaction_id,
    )
}
