//! Persistence surface.
//!
//! The service consumes a deliberately narrow slice of the storage engine:
//! insert-one, find-one/find-many by filter, filtered update with set and
//! increment semantics, delete-many. [`OrderStore`] captures exactly that
//! slice; [`postgres::PgStore`] backs it in production and
//! [`memory::MemoryStore`] in tests and local development.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Order, OrderStatus, PaymentDetails};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Outcome of an update scoped by a filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// The filter matched no document; nothing was written.
    NotFound,
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order, returning the identifier it was stored under.
    async fn insert_order(&self, order: &Order) -> Result<Uuid, StoreError>;

    /// All orders belonging to a client, newest first.
    async fn orders_for_client(&self, client_id: Uuid) -> Result<Vec<Order>, StoreError>;

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, StoreError>;

    /// Replace status and payment on the order matching BOTH identifiers.
    /// Matching on the pair keeps one client from touching another's order.
    async fn update_payment(
        &self,
        order_id: Uuid,
        client_id: Uuid,
        status: OrderStatus,
        payment: &PaymentDetails,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Delete every cart entry for a client. Returns the number removed.
    async fn clear_cart(&self, client_id: Uuid) -> Result<u64, StoreError>;

    /// Upsert the client's activity record with a new last-purchase time.
    async fn record_purchase(&self, client_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Decrement stock and increment sales for one product by `quantity`,
    /// stamping the record. Increments are commutative, so concurrent orders
    /// against the same product need no coordination here.
    async fn adjust_inventory(
        &self,
        product_id: Uuid,
        quantity: i64,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
