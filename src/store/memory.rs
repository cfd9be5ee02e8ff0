//! In-memory store for tests and local development. Mirrors the Postgres
//! semantics, including the pair-matched payment update and the commutative
//! inventory counters.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{OrderStore, StoreError, UpdateOutcome};
use crate::models::{Order, OrderStatus, PaymentDetails};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InventoryRecord {
    pub stock: i64,
    pub sales: i64,
    pub last_update_date: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Inner {
    orders: Vec<Order>,
    cart_entries: HashMap<Uuid, u64>,
    last_purchase: HashMap<Uuid, DateTime<Utc>>,
    inventory: HashMap<Uuid, InventoryRecord>,
    fail_inserts: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every subsequent insert fail, for exercising the fail-fast path.
    pub fn fail_inserts(&self) {
        self.lock().fail_inserts = true;
    }

    pub fn seed_cart(&self, client_id: Uuid, entries: u64) {
        self.lock().cart_entries.insert(client_id, entries);
    }

    pub fn seed_inventory(&self, product_id: Uuid, stock: i64, sales: i64) {
        self.lock().inventory.insert(
            product_id,
            InventoryRecord {
                stock,
                sales,
                last_update_date: None,
            },
        );
    }

    pub fn cart_entries(&self, client_id: Uuid) -> u64 {
        self.lock().cart_entries.get(&client_id).copied().unwrap_or(0)
    }

    pub fn last_purchase(&self, client_id: Uuid) -> Option<DateTime<Utc>> {
        self.lock().last_purchase.get(&client_id).copied()
    }

    pub fn inventory(&self, product_id: Uuid) -> Option<InventoryRecord> {
        self.lock().inventory.get(&product_id).copied()
    }

    pub fn order(&self, order_id: Uuid) -> Option<Order> {
        self.lock().orders.iter().find(|o| o.id == order_id).cloned()
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: &Order) -> Result<Uuid, StoreError> {
        let mut inner = self.lock();
        if inner.fail_inserts {
            return Err(StoreError::Database("insert failed".into()));
        }
        inner.orders.push(order.clone());
        Ok(order.id)
    }

    async fn orders_for_client(&self, client_id: Uuid) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self
            .lock()
            .orders
            .iter()
            .filter(|o| o.client_id == client_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.order(order_id))
    }

    async fn update_payment(
        &self,
        order_id: Uuid,
        client_id: Uuid,
        status: OrderStatus,
        payment: &PaymentDetails,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut inner = self.lock();
        match inner
            .orders
            .iter_mut()
            .find(|o| o.id == order_id && o.client_id == client_id)
        {
            Some(order) => {
                order.order_status = status;
                order.payment = payment.clone();
                Ok(UpdateOutcome::Updated)
            }
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    async fn clear_cart(&self, client_id: Uuid) -> Result<u64, StoreError> {
        Ok(self.lock().cart_entries.remove(&client_id).unwrap_or(0))
    }

    async fn record_purchase(&self, client_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.lock().last_purchase.insert(client_id, at);
        Ok(())
    }

    async fn adjust_inventory(
        &self,
        product_id: Uuid,
        quantity: i64,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        // Matches the SQL UPDATE: a missing record is a silent no-op.
        if let Some(record) = inner.inventory.get_mut(&product_id) {
            record.stock -= quantity;
            record.sales += quantity;
            record.last_update_date = Some(at);
        }
        Ok(())
    }
}
