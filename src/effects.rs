//! Post-order side effects.
//!
//! After an order is persisted the caller gets its response immediately;
//! cart cleanup, the activity-log stamp, inventory adjustment and the
//! confirmation email all run afterwards on a background worker fed by a
//! bounded queue. Each effect is best-effort: a failure is logged under the
//! `side_effects` target and never rolls back the others or the order.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;

use crate::models::Order;
use crate::notify::Notifier;
use crate::store::OrderStore;

/// Work submitted after an order insert succeeds.
pub struct PostOrderJob {
    pub order: Order,
}

#[derive(Clone)]
pub struct EffectQueue {
    tx: mpsc::Sender<PostOrderJob>,
}

impl EffectQueue {
    /// Spawn the worker task and return a handle for submitting jobs.
    pub fn start(store: Arc<dyn OrderStore>, notifier: Notifier, depth: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<PostOrderJob>(depth);
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                run_post_order_effects(store.as_ref(), &notifier, job.order).await;
            }
        });
        Self { tx }
    }

    /// Non-blocking submit. A full queue drops the job with an error log;
    /// the order itself is already durable at this point.
    pub fn submit(&self, job: PostOrderJob) {
        let order_id = job.order.id;
        if self.tx.try_send(job).is_err() {
            tracing::error!(target: "side_effects", %order_id, "effect queue full, post-order work dropped");
        }
    }
}

/// Run the three persistence side effects and the confirmation email for a
/// freshly placed order. Inventory updates are applied per line item; one
/// item failing does not stop the remaining items.
pub async fn run_post_order_effects(store: &dyn OrderStore, notifier: &Notifier, order: Order) {
    let now = Utc::now();

    if let Err(e) = store.clear_cart(order.client_id).await {
        tracing::error!(target: "side_effects", order_id = %order.id, "cart clear failed: {e}");
    }

    if let Err(e) = store.record_purchase(order.client_id, now).await {
        tracing::error!(target: "side_effects", order_id = %order.id, "activity log update failed: {e}");
    }

    for item in &order.products {
        if let Err(e) = store
            .adjust_inventory(item.product_id, i64::from(item.quantity), now)
            .await
        {
            tracing::error!(
                target: "side_effects",
                order_id = %order.id,
                product_id = %item.product_id,
                "inventory adjustment failed: {e}"
            );
        }
    }

    let email = notifier.order_confirmation(&order);
    if let Err(e) = notifier.send(email).await {
        tracing::error!(target: "side_effects", order_id = %order.id, "confirmation email failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AddressKind, LineItem, OrderStatus, PaymentDetails, ShippingAddress,
    };
    use crate::store::memory::MemoryStore;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn order_with_items(client_id: Uuid, items: Vec<LineItem>) -> Order {
        Order {
            id: Uuid::now_v7(),
            client_id,
            email: "shopper@example.com".into(),
            order_date: Utc::now(),
            order_status: OrderStatus::Pending,
            order_total: items.iter().map(|i| i.price * Decimal::from(i.quantity)).sum(),
            products: items,
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
            amount: Decimal::new(100, 0),
            transaction_id: "TXN-1".into(),
            payment: PaymentDetails::CashOnDelivery,
        }
    }

    #[tokio::test]
    async fn effects_reference_the_order_identifiers() {
        let store = MemoryStore::new();
        let client_id = Uuid::new_v4();
        let tea = Uuid::new_v4();
        let honey = Uuid::new_v4();
        store.seed_cart(client_id, 3);
        store.seed_inventory(tea, 50, 10);
        store.seed_inventory(honey, 20, 5);

        let order = order_with_items(
            client_id,
            vec![
                LineItem {
                    product_id: tea,
                    name: "Tea".into(),
                    quantity: 2,
                    price: Decimal::new(100, 0),
                },
                LineItem {
                    product_id: honey,
                    name: "Honey".into(),
                    quantity: 1,
                    price: Decimal::new(50, 0),
                },
            ],
        );

        let notifier = Notifier::new(None, "orders@storefront.example".into());
        run_post_order_effects(&store, &notifier, order).await;

        assert_eq!(store.cart_entries(client_id), 0);
        assert!(store.last_purchase(client_id).is_some());

        let tea_stock = store.inventory(tea).unwrap();
        assert_eq!(tea_stock.stock, 48);
        assert_eq!(tea_stock.sales, 12);
        assert!(tea_stock.last_update_date.is_some());

        let honey_stock = store.inventory(honey).unwrap();
        assert_eq!(honey_stock.stock, 19);
        assert_eq!(honey_stock.sales, 6);
    }

    #[tokio::test]
    async fn missing_inventory_record_does_not_stop_other_items() {
        let store = MemoryStore::new();
        let client_id = Uuid::new_v4();
        let known = Uuid::new_v4();
        let unknown = Uuid::new_v4();
        store.seed_inventory(known, 10, 0);

        let order = order_with_items(
            client_id,
            vec![
                LineItem {
                    product_id: unknown,
                    name: "Ghost".into(),
                    quantity: 1,
                    price: Decimal::new(10, 0),
                },
                LineItem {
                    product_id: known,
                    name: "Tea".into(),
                    quantity: 4,
                    price: Decimal::new(10, 0),
                },
            ],
        );

        let notifier = Notifier::new(None, "orders@storefront.example".into());
        run_post_order_effects(&store, &notifier, order).await;

        let counts = store.inventory(known).unwrap();
        assert_eq!(counts.stock, 6);
        assert_eq!(counts.sales, 4);
        assert!(store.inventory(unknown).is_none());
    }

    #[tokio::test]
    async fn queued_job_is_processed_by_the_worker() {
        let store = Arc::new(MemoryStore::new());
        let client_id = Uuid::new_v4();
        store.seed_cart(client_id, 2);

        let notifier = Notifier::new(None, "orders@storefront.example".into());
        let queue = EffectQueue::start(store.clone(), notifier, 8);
        queue.submit(PostOrderJob {
            order: order_with_items(client_id, vec![]),
        });

        for _ in 0..50 {
            if store.cart_entries(client_id) == 0 {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("worker never cleared the cart");
    }
}
