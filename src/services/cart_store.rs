//! Cart store: the session's authoritative cart plus an optional remote mirror.
//!
//! Mutations apply to local state immediately and notify subscribers. When a
//! [`CartPersistence`] is attached, each accepted mutation is queued for a
//! single background worker that mirrors them in order. A failed mirror is
//! logged and never rolls local state back; call [`CartStore::reload`] to
//! reconcile from the remote copy explicitly.

use crate::domain::aggregates::{Cart, CartItem, Product};
use crate::domain::value_objects::Money;
use crate::repository::CartPersistence;
use crate::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};

/// Read-only view of the cart published to subscribers.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub item_count: u64,
    pub total_price: Money,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        Self { items: cart.items().to_vec(), item_count: cart.item_count(), total_price: cart.total() }
    }
}

#[derive(Debug)]
enum SyncOp {
    Add(Product, i64),
    SetQuantity(i64, i64),
    Remove(i64),
    Clear,
    Flush(oneshot::Sender<()>),
}

impl SyncOp {
    fn name(&self) -> &'static str {
        match self {
            Self::Add(..) => "add",
            Self::SetQuantity(..) => "set_quantity",
            Self::Remove(_) => "remove",
            Self::Clear => "clear",
            Self::Flush(_) => "flush",
        }
    }
}

async fn run_sync(persistence: Arc<dyn CartPersistence>, mut ops: mpsc::UnboundedReceiver<SyncOp>) {
    while let Some(op) = ops.recv().await {
        let name = op.name();
        let result = match op {
            SyncOp::Add(product, quantity) => persistence.add(&product, quantity).await,
            SyncOp::SetQuantity(product_id, quantity) => persistence.set_quantity(product_id, quantity).await,
            SyncOp::Remove(product_id) => persistence.remove(product_id).await,
            SyncOp::Clear => persistence.clear().await,
            SyncOp::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };
        if let Err(e) = result {
            tracing::warn!(op = name, error = %e, "cart sync failed");
        }
    }
}

pub struct CartStore {
    cart: Cart,
    persistence: Option<Arc<dyn CartPersistence>>,
    snapshots: watch::Sender<CartSnapshot>,
    sync_tx: Option<mpsc::UnboundedSender<SyncOp>>,
}

impl Default for CartStore {
    fn default() -> Self { Self::new() }
}

impl CartStore {
    /// Memory-only store.
    pub fn new() -> Self {
        let (snapshots, _) = watch::channel(CartSnapshot::default());
        Self { cart: Cart::new(), persistence: None, snapshots, sync_tx: None }
    }

    pub fn with_persistence(persistence: Arc<dyn CartPersistence>) -> Self {
        let mut store = Self::new();
        store.persistence = Some(persistence);
        store
    }

    pub fn is_persistent(&self) -> bool { self.persistence.is_some() }

    /// Initial load from the remote mirror. A failure is logged and leaves the
    /// cart empty.
    pub async fn load(&mut self) {
        if let Err(e) = self.reload().await {
            tracing::warn!(error = %e, "failed to load cart, starting empty");
            self.cart.clear();
            self.publish();
        }
    }

    /// Replaces local state with the persisted cart, after queued mirror
    /// operations have been applied.
    pub async fn reload(&mut self) -> Result<()> {
        let Some(persistence) = self.persistence.clone() else { return Ok(()) };
        self.flush().await;
        let items = persistence.get().await?;
        self.cart = Cart::from_items(items);
        tracing::debug!(items = self.cart.items().len(), "cart loaded");
        self.publish();
        Ok(())
    }

    pub fn add_to_cart(&mut self, product: &Product, quantity: i64) {
        if !self.cart.add_item(product, quantity) {
            tracing::debug!(product_id = product.id, quantity, "ignored add with non-positive quantity");
            return;
        }
        self.publish();
        self.sync(SyncOp::Add(product.clone(), quantity));
    }

    pub fn remove_from_cart(&mut self, product_id: i64) {
        self.cart.remove_item(product_id);
        self.publish();
        self.sync(SyncOp::Remove(product_id));
    }

    /// Sets an exact quantity; zero or below behaves like [`Self::remove_from_cart`].
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(product_id);
            return;
        }
        self.cart.update_quantity(product_id, quantity);
        self.publish();
        self.sync(SyncOp::SetQuantity(product_id, quantity));
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.publish();
        self.sync(SyncOp::Clear);
    }

    pub fn items(&self) -> &[CartItem] { self.cart.items() }
    pub fn item_count(&self) -> u64 { self.cart.item_count() }
    pub fn total(&self) -> Money { self.cart.total() }
    pub fn total_price(&self) -> Decimal { self.cart.total_price() }
    pub fn snapshot(&self) -> CartSnapshot { CartSnapshot::from(&self.cart) }

    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> { self.snapshots.subscribe() }

    /// Waits until every mirror operation queued so far has been attempted.
    pub async fn flush(&self) {
        let Some(tx) = &self.sync_tx else { return };
        let (done, wait) = oneshot::channel();
        if tx.send(SyncOp::Flush(done)).is_ok() && wait.await.is_err() {
            tracing::error!("cart sync worker stopped");
        }
    }

    fn publish(&self) { self.snapshots.send_replace(CartSnapshot::from(&self.cart)); }

    /// Queues `op` for the mirror worker, starting one on the current runtime
    /// when none is running.
    fn sync(&mut self, op: SyncOp) {
        let Some(persistence) = self.persistence.clone() else { return };
        let op = match &self.sync_tx {
            Some(tx) => match tx.send(op) {
                Ok(()) => return,
                Err(mpsc::error::SendError(op)) => op,
            },
            None => op,
        };
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(op = op.name(), "no async runtime, cart sync skipped");
            return;
        };
        let (tx, rx) = mpsc::unbounded_channel();
        runtime.spawn(run_sync(persistence, rx));
        if tx.send(op).is_err() {
            tracing::error!("cart sync worker failed to start");
        }
        self.sync_tx = Some(tx);
    }
}
