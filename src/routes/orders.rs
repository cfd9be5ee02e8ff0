//! Order endpoints: listing, tracking, placement and payment update.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Local, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::effects::PostOrderJob;
use crate::error::ApiError;
use crate::models::{LineItem, Order, OrderStatus, PaymentDetails, ShippingAddress};
use crate::schedule::delivery_schedule;
use crate::state::AppState;
use crate::store::UpdateOutcome;

pub async fn orders_for_client(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.store.orders_for_client(client_id).await?))
}

pub async fn track_order(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    state
        .store
        .find_order(order_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Order not found"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    pub client_id: Uuid,
    #[validate(email)]
    pub email: String,
    pub order_status: OrderStatus,
    #[validate]
    pub products: Vec<LineItem>,
    pub order_total: Decimal,
    #[validate]
    pub shipping_address: ShippingAddress,
    pub shipping_method: String,
    pub tracking_number: String,
    pub shipping_status: String,
    pub amount: Decimal,
    pub transaction_id: String,
    #[serde(flatten)]
    pub payment: PaymentDetails,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub message: &'static str,
    pub order_id: Uuid,
}

/// Place an order: compute the delivery schedule, persist, respond, and
/// leave the cart/activity/inventory/email work to the background queue.
/// A persistence failure aborts before any side effect is submitted.
pub async fn place_order(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    if req.products.is_empty() {
        return Err(ApiError::Validation(
            "order must contain at least one line item".into(),
        ));
    }

    // Cutoff policy runs on the local wall clock.
    let schedule = delivery_schedule(Local::now().naive_local(), req.shipping_address.kind);

    let order = Order {
        id: Uuid::now_v7(),
        client_id: req.client_id,
        email: req.email,
        order_date: Utc::now(),
        order_status: req.order_status,
        products: req.products,
        order_total: req.order_total,
        shipping_address: req.shipping_address,
        shipping_method: req.shipping_method,
        tracking_number: req.tracking_number,
        shipping_status: req.shipping_status,
        delivery_schedule: schedule,
        amount: req.amount,
        transaction_id: req.transaction_id,
        payment: req.payment,
    };

    let order_id = state.store.insert_order(&order).await?;
    state.effects.submit(PostOrderJob { order });

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order placed successfully",
            order_id,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct OrderPaymentRequest {
    pub order_id: Uuid,
    pub client_id: Uuid,
    pub order_status: OrderStatus,
    #[serde(flatten)]
    pub payment: PaymentDetails,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Replace status and payment fields on an order. The update filter matches
/// both the order id and the client id, so one client cannot modify
/// another's order. The schedule and inventory are never touched here.
pub async fn order_payment(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(req): Json<OrderPaymentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    match state
        .store
        .update_payment(req.order_id, req.client_id, req.order_status, &req.payment)
        .await?
    {
        UpdateOutcome::Updated => Ok(Json(MessageResponse {
            message: "Order payment updated successfully",
        })),
        UpdateOutcome::NotFound => Err(ApiError::NotFound("Order not found or already updated")),
    }
}
