//! Postgres-backed store. Embedded documents (line items, address, schedule,
//! payment) live in JSONB columns; filterable fields get their own columns.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use async_trait::async_trait;

use super::{OrderStore, StoreError, UpdateOutcome};
use crate::models::{LineItem, Milestone, Order, OrderStatus, PaymentDetails, ShippingAddress};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(Self { pool })
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    client_id: Uuid,
    email: String,
    order_date: DateTime<Utc>,
    order_status: String,
    products: Json<Vec<LineItem>>,
    order_total: Decimal,
    shipping_address: Json<ShippingAddress>,
    shipping_method: String,
    tracking_number: String,
    shipping_status: String,
    delivery_schedule: Json<Vec<Milestone>>,
    amount: Decimal,
    transaction_id: String,
    payment: Json<PaymentDetails>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let order_status = row
            .order_status
            .parse()
            .map_err(|_| StoreError::Database(format!("unknown order status: {}", row.order_status)))?;
        Ok(Order {
            id: row.id,
            client_id: row.client_id,
            email: row.email,
            order_date: row.order_date,
            order_status,
            products: row.products.0,
            order_total: row.order_total,
            shipping_address: row.shipping_address.0,
            shipping_method: row.shipping_method,
            tracking_number: row.tracking_number,
            shipping_status: row.shipping_status,
            delivery_schedule: row.delivery_schedule.0,
            amount: row.amount,
            transaction_id: row.transaction_id,
            payment: row.payment.0,
        })
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert_order(&self, order: &Order) -> Result<Uuid, StoreError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO orders (id, client_id, email, order_date, order_status, products, \
             order_total, shipping_address, shipping_method, tracking_number, shipping_status, \
             delivery_schedule, amount, transaction_id, payment) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING id",
        )
        .bind(order.id)
        .bind(order.client_id)
        .bind(&order.email)
        .bind(order.order_date)
        .bind(order.order_status.to_string())
        .bind(Json(&order.products))
        .bind(order.order_total)
        .bind(Json(&order.shipping_address))
        .bind(&order.shipping_method)
        .bind(&order.tracking_number)
        .bind(&order.shipping_status)
        .bind(Json(&order.delivery_schedule))
        .bind(order.amount)
        .bind(&order.transaction_id)
        .bind(Json(&order.payment))
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn orders_for_client(&self, client_id: Uuid) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT * FROM orders WHERE client_id = $1 ORDER BY order_date DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Order::try_from).transpose()
    }

    async fn update_payment(
        &self,
        order_id: Uuid,
        client_id: Uuid,
        status: OrderStatus,
        payment: &PaymentDetails,
    ) -> Result<UpdateOutcome, StoreError> {
        let result = sqlx::query(
            "UPDATE orders SET order_status = $3, payment = $4 \
             WHERE id = $1 AND client_id = $2",
        )
        .bind(order_id)
        .bind(client_id)
        .bind(status.to_string())
        .bind(Json(payment))
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            Ok(UpdateOutcome::NotFound)
        } else {
            Ok(UpdateOutcome::Updated)
        }
    }

    async fn clear_cart(&self, client_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE client_id = $1")
            .bind(client_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn record_purchase(&self, client_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO user_activity (client_id, last_purchase) VALUES ($1, $2) \
             ON CONFLICT (client_id) DO UPDATE SET last_purchase = EXCLUDED.last_purchase",
        )
        .bind(client_id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn adjust_inventory(
        &self,
        product_id: Uuid,
        quantity: i64,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE inventory SET stock = stock - $2, sales = sales + $2, last_update_date = $3 \
             WHERE product_id = $1",
        )
        .bind(product_id)
        .bind(quantity)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
