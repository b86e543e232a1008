//! # Cart Store
//!
//! Owns the session's cart, applies the three cart operations, persists every
//! committed snapshot and broadcasts it to observers.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CartStore Operation                               │
//! │                                                                         │
//! │  add_product(id)                                                        │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  1. Catalog lookups (no lock held, may run concurrently)               │
//! │     stock(id) and product(id), joined                                  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  2. Commit (single writer)                                             │
//! │     ┌───────────────────────────────────────────────────────────────┐  │
//! │     │ lock writer                                                   │  │
//! │     │ S  = latest committed cart                                    │  │
//! │     │ S' = transition(S)          ── rejected? ──► S stays          │  │
//! │     │ storage.set(key, S')        ── failed?   ──► S stays          │  │
//! │     │ watch.send(S')                                                │  │
//! │     └───────────────────────────────────────────────────────────────┘  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  3. Report: on error, Notifier gets exactly one Notice                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transitions are evaluated against the cart as it is at commit time, not
//! as it was when the lookup started, so two concurrent adds of the same
//! product both count.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use rocketshoes_api::Catalog;
use rocketshoes_core::validation::requested_amount;
use rocketshoes_core::{
    Cart, CartError, CoreResult, Operation, ProductId, UpdateProductAmount, CART_STORAGE_KEY,
};
use rocketshoes_storage::KeyValueStore;

use crate::error::StoreResult;
use crate::header::HeaderDisplay;
use crate::notify::{NoOpNotifier, Notifier};

// =============================================================================
// Builder
// =============================================================================

/// Configures and opens a [`CartStore`].
pub struct CartStoreBuilder {
    catalog: Arc<dyn Catalog>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    key: String,
}

impl CartStoreBuilder {
    /// Sets the notifier that receives failure notices.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Sets the storage key for the snapshot.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Restores the persisted cart and opens the store.
    ///
    /// A missing snapshot gives an empty cart. So does an unreadable one,
    /// after a warning. Failing to read storage at all is an error.
    pub async fn open(self) -> StoreResult<CartStore> {
        let cart = match self.storage.get(&self.key).await? {
            None => {
                debug!(key = %self.key, "No stored cart");
                Cart::new()
            }
            Some(raw) => match Cart::from_snapshot(&raw) {
                Ok(Some(cart)) => cart,
                Ok(None) => {
                    warn!(key = %self.key, "Stored cart is not a product list, starting empty");
                    Cart::new()
                }
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Stored cart is invalid, starting empty");
                    Cart::new()
                }
            },
        };

        info!(key = %self.key, items = cart.len(), "Cart store opened");

        let (state, _) = watch::channel(cart);
        Ok(CartStore {
            inner: Arc::new(Inner {
                catalog: self.catalog,
                storage: self.storage,
                notifier: self.notifier,
                key: self.key,
                state,
                writer: Mutex::new(()),
            }),
        })
    }
}

// =============================================================================
// Cart Store
// =============================================================================

struct Inner {
    catalog: Arc<dyn Catalog>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    key: String,
    state: watch::Sender<Cart>,
    /// Serializes commits. Never held across a catalog lookup.
    writer: Mutex<()>,
}

/// The session's cart store. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

impl CartStore {
    /// Starts building a store over `catalog` and `storage`.
    pub fn builder(catalog: Arc<dyn Catalog>, storage: Arc<dyn KeyValueStore>) -> CartStoreBuilder {
        CartStoreBuilder {
            catalog,
            storage,
            notifier: Arc::new(NoOpNotifier),
            key: CART_STORAGE_KEY.to_string(),
        }
    }

    /// The current cart.
    pub fn cart(&self) -> Cart {
        self.inner.state.borrow().clone()
    }

    /// Receives every committed cart, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.state.subscribe()
    }

    /// A header view bound to this store.
    pub fn header(&self) -> HeaderDisplay {
        HeaderDisplay::new(self.subscribe())
    }

    /// Storage key the snapshot is written under.
    pub fn storage_key(&self) -> &str {
        &self.inner.key
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Adds one unit of a product.
    ///
    /// ## Errors
    /// - Stock exhausted or exceeded: `Notice::OutOfStock`
    /// - Lookup or persist failure: `Notice::AddFailed`
    pub async fn add_product(&self, product_id: ProductId) -> StoreResult<Cart> {
        debug!(product_id, "add_product");
        let result = self.try_add(product_id).await;
        self.report(Operation::Add, product_id, result)
    }

    /// Removes a product entirely.
    ///
    /// ## Errors
    /// - Not in cart or persist failure: `Notice::RemoveFailed`
    pub async fn remove_product(&self, product_id: ProductId) -> StoreResult<Cart> {
        debug!(product_id, "remove_product");
        let result = self.commit(|cart| cart.without(product_id).map(Some)).await;
        self.report(Operation::Remove, product_id, result)
    }

    /// Sets a product's amount.
    ///
    /// Amounts of zero or less are ignored and return the current cart
    /// without any notice. So does a product that passes the stock check
    /// but is not in the cart.
    ///
    /// ## Errors
    /// - Amount above stock: `Notice::OutOfStock`
    /// - Lookup or persist failure: `Notice::UpdateFailed`
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> StoreResult<Cart> {
        let UpdateProductAmount { product_id, amount } = request;
        debug!(product_id, amount, "update_product_amount");

        let amount = match requested_amount(amount) {
            Ok(Some(amount)) => amount,
            Ok(None) => {
                debug!(product_id, amount, "Ignoring non-positive amount");
                return Ok(self.cart());
            }
            Err(e) => {
                return self.report(
                    Operation::UpdateAmount,
                    product_id,
                    Err(CartError::from(e).into()),
                )
            }
        };

        let result = self.try_update(product_id, amount).await;
        self.report(Operation::UpdateAmount, product_id, result)
    }

    async fn try_add(&self, product_id: ProductId) -> StoreResult<Cart> {
        let catalog = &self.inner.catalog;
        let (stock, product) = tokio::try_join!(catalog.stock(product_id), catalog.product(product_id))?;

        self.commit(|cart| cart.with_added(&product, &stock).map(Some))
            .await
    }

    async fn try_update(&self, product_id: ProductId, amount: u32) -> StoreResult<Cart> {
        let stock = self.inner.catalog.stock(product_id).await?;
        self.commit(|cart| match cart.with_amount(product_id, amount, &stock) {
            Err(CartError::NotInCart(_)) => {
                debug!(product_id, "Product not in cart, nothing to update");
                Ok(None)
            }
            other => other.map(Some),
        })
        .await
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Applies `transition` to the latest cart, persists and publishes it.
    ///
    /// A transition yielding `None` leaves the cart as it is and writes
    /// nothing.
    async fn commit<F>(&self, transition: F) -> StoreResult<Cart>
    where
        F: FnOnce(&Cart) -> CoreResult<Option<Cart>>,
    {
        let _guard = self.inner.writer.lock().await;

        let current = self.inner.state.borrow().clone();
        let Some(next) = transition(&current)? else {
            return Ok(current);
        };

        self.inner
            .storage
            .set(&self.inner.key, &next.to_snapshot())
            .await?;
        self.inner.state.send_replace(next.clone());

        debug!(items = next.len(), quantity = next.total_quantity(), "Cart committed");
        Ok(next)
    }

    fn report(
        &self,
        operation: Operation,
        product_id: ProductId,
        result: StoreResult<Cart>,
    ) -> StoreResult<Cart> {
        if let Err(e) = &result {
            let notice = e.notice(operation);
            if e.is_rejection() {
                warn!(operation = %operation, product_id, reason = %e, "Cart operation rejected");
            } else {
                warn!(operation = %operation, product_id, error = %e, "Cart operation failed");
            }
            self.inner.notifier.notify(operation, notice);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rocketshoes_api::{ApiError, ApiResult, CatalogFixture};
    use rocketshoes_core::{Notice, Product, Stock};
    use rocketshoes_storage::{MemoryStorage, SqliteStorage, StorageConfig, StorageError, StorageResult};
    use tokio::sync::broadcast::error::TryRecvError;

    use crate::error::StoreError;
    use crate::notify::{Toast, ToastChannel};

    fn sneaker(id: ProductId) -> Product {
        Product {
            id,
            title: format!("Tênis {}", id),
            price: 100.0 + f64::from(id),
            image: format!("https://example.com/{}.jpg", id),
            amount: 0,
        }
    }

    fn catalog() -> Arc<CatalogFixture> {
        Arc::new(
            CatalogFixture::new()
                .with_product(sneaker(1), 5)
                .with_product(sneaker(2), 1)
                .with_product(sneaker(3), 0),
        )
    }

    struct Harness {
        store: CartStore,
        storage: Arc<MemoryStorage>,
        toasts: tokio::sync::broadcast::Receiver<Toast>,
    }

    async fn harness_with(storage: Arc<MemoryStorage>) -> Harness {
        let channel = ToastChannel::default();
        let toasts = channel.subscribe();
        let store = CartStore::builder(catalog(), storage.clone())
            .notifier(Arc::new(channel))
            .open()
            .await
            .unwrap();
        Harness {
            store,
            storage,
            toasts,
        }
    }

    async fn harness() -> Harness {
        harness_with(Arc::new(MemoryStorage::new())).await
    }

    async fn stored_cart(storage: &MemoryStorage) -> Cart {
        let raw = storage.get(CART_STORAGE_KEY).await.unwrap().unwrap();
        Cart::from_snapshot(&raw).unwrap().unwrap()
    }

    fn amounts(cart: &Cart) -> Vec<(ProductId, u32)> {
        cart.items().iter().map(|p| (p.id, p.amount)).collect()
    }

    fn next_notice(toasts: &mut tokio::sync::broadcast::Receiver<Toast>) -> Option<Notice> {
        match toasts.try_recv() {
            Ok(toast) => Some(toast.notice),
            Err(TryRecvError::Empty) => None,
            Err(e) => panic!("toast channel error: {e:?}"),
        }
    }

    struct OfflineCatalog;

    #[async_trait]
    impl Catalog for OfflineCatalog {
        async fn stock(&self, _id: ProductId) -> ApiResult<Stock> {
            Err(ApiError::Timeout)
        }

        async fn product(&self, _id: ProductId) -> ApiResult<Product> {
            Err(ApiError::Timeout)
        }
    }

    /// Reads succeed, writes fail.
    struct ReadOnlyStorage(MemoryStorage);

    #[async_trait]
    impl KeyValueStore for ReadOnlyStorage {
        async fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.get(key).await
        }

        async fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::QueryFailed("disk is read-only".into()))
        }
    }

    struct UnreachableStorage;

    #[async_trait]
    impl KeyValueStore for UnreachableStorage {
        async fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::ConnectionFailed("no database".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::ConnectionFailed("no database".into()))
        }
    }

    // =========================================================================
    // add_product
    // =========================================================================

    #[tokio::test]
    async fn test_add_new_product() {
        let mut h = harness().await;

        let cart = h.store.add_product(1).await.unwrap();

        assert_eq!(amounts(&cart), vec![(1, 1)]);
        assert_eq!(cart.items()[0].title, "Tênis 1");
        assert_eq!(stored_cart(&h.storage).await, cart);
        assert_eq!(next_notice(&mut h.toasts), None);
    }

    #[tokio::test]
    async fn test_add_existing_increments() {
        let h = harness().await;

        h.store.add_product(1).await.unwrap();
        let cart = h.store.add_product(1).await.unwrap();

        assert_eq!(amounts(&cart), vec![(1, 2)]);
        assert_eq!(stored_cart(&h.storage).await, cart);
    }

    #[tokio::test]
    async fn test_add_without_stock_is_rejected() {
        let mut h = harness().await;

        let err = h.store.add_product(3).await.unwrap_err();

        assert!(err.is_rejection());
        assert!(h.store.cart().is_empty());
        assert_eq!(h.storage.get(CART_STORAGE_KEY).await.unwrap(), None);
        assert_eq!(next_notice(&mut h.toasts), Some(Notice::OutOfStock));
    }

    #[tokio::test]
    async fn test_add_past_stock_is_rejected() {
        let mut h = harness().await;

        h.store.add_product(2).await.unwrap();
        let err = h.store.add_product(2).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Rejected(CartError::OutOfStock { available: 1, requested: 2, .. })
        ));
        assert_eq!(amounts(&h.store.cart()), vec![(2, 1)]);
        assert_eq!(next_notice(&mut h.toasts), Some(Notice::OutOfStock));
    }

    #[tokio::test]
    async fn test_add_unknown_product_fails() {
        let mut h = harness().await;

        let err = h.store.add_product(42).await.unwrap_err();

        assert!(err.is_lookup_failure());
        assert!(h.store.cart().is_empty());
        assert_eq!(next_notice(&mut h.toasts), Some(Notice::AddFailed));
    }

    #[tokio::test]
    async fn test_lookup_failure_leaves_cart_untouched() {
        let storage = Arc::new(MemoryStorage::with_entry(
            CART_STORAGE_KEY,
            r#"[{"id":1,"title":"Tênis 1","price":101.0,"image":"x","amount":2}]"#,
        ));
        let channel = ToastChannel::default();
        let mut toasts = channel.subscribe();
        let store = CartStore::builder(Arc::new(OfflineCatalog), storage.clone())
            .notifier(Arc::new(channel))
            .open()
            .await
            .unwrap();
        let before = store.cart();

        assert!(store.add_product(1).await.is_err());
        assert!(store
            .update_product_amount(UpdateProductAmount { product_id: 1, amount: 1 })
            .await
            .is_err());

        assert_eq!(store.cart(), before);
        assert_eq!(stored_cart(&storage).await, before);
        assert_eq!(next_notice(&mut toasts), Some(Notice::AddFailed));
        assert_eq!(next_notice(&mut toasts), Some(Notice::UpdateFailed));
    }

    // =========================================================================
    // remove_product
    // =========================================================================

    #[tokio::test]
    async fn test_remove_product() {
        let h = harness().await;
        h.store.add_product(1).await.unwrap();
        h.store.add_product(2).await.unwrap();

        let cart = h.store.remove_product(1).await.unwrap();

        assert_eq!(amounts(&cart), vec![(2, 1)]);
        assert_eq!(stored_cart(&h.storage).await, cart);
    }

    #[tokio::test]
    async fn test_remove_missing_product_fails() {
        let mut h = harness().await;
        h.store.add_product(1).await.unwrap();

        let err = h.store.remove_product(9).await.unwrap_err();

        assert!(matches!(err, StoreError::Rejected(CartError::NotInCart(9))));
        assert_eq!(amounts(&h.store.cart()), vec![(1, 1)]);
        assert_eq!(next_notice(&mut h.toasts), Some(Notice::RemoveFailed));
    }

    // =========================================================================
    // update_product_amount
    // =========================================================================

    #[tokio::test]
    async fn test_update_amount() {
        let h = harness().await;
        h.store.add_product(1).await.unwrap();

        let cart = h
            .store
            .update_product_amount(UpdateProductAmount { product_id: 1, amount: 5 })
            .await
            .unwrap();

        assert_eq!(amounts(&cart), vec![(1, 5)]);
        assert_eq!(stored_cart(&h.storage).await, cart);
    }

    #[tokio::test]
    async fn test_update_non_positive_is_silent_noop() {
        let mut h = harness().await;
        h.store.add_product(1).await.unwrap();
        h.store.add_product(1).await.unwrap();

        for amount in [0, -1, i64::MIN] {
            let cart = h
                .store
                .update_product_amount(UpdateProductAmount { product_id: 1, amount })
                .await
                .unwrap();
            assert_eq!(amounts(&cart), vec![(1, 2)]);
        }

        assert_eq!(next_notice(&mut h.toasts), None);
    }

    #[tokio::test]
    async fn test_update_above_stock_is_rejected() {
        let mut h = harness().await;
        h.store.add_product(1).await.unwrap();

        let err = h
            .store
            .update_product_amount(UpdateProductAmount { product_id: 1, amount: 6 })
            .await
            .unwrap_err();

        assert!(err.is_rejection());
        assert_eq!(amounts(&h.store.cart()), vec![(1, 1)]);
        assert_eq!(next_notice(&mut h.toasts), Some(Notice::OutOfStock));
    }

    #[tokio::test]
    async fn test_update_missing_product_is_silent_noop() {
        let mut h = harness().await;
        h.store.add_product(1).await.unwrap();
        let rx = h.store.subscribe();

        let cart = h
            .store
            .update_product_amount(UpdateProductAmount { product_id: 2, amount: 1 })
            .await
            .unwrap();

        assert_eq!(amounts(&cart), vec![(1, 1)]);
        assert_eq!(stored_cart(&h.storage).await, cart);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(next_notice(&mut h.toasts), None);
    }

    #[tokio::test]
    async fn test_update_missing_product_above_stock_is_rejected() {
        let mut h = harness().await;

        let err = h
            .store
            .update_product_amount(UpdateProductAmount { product_id: 2, amount: 3 })
            .await
            .unwrap_err();

        assert!(err.is_rejection());
        assert!(h.store.cart().is_empty());
        assert_eq!(next_notice(&mut h.toasts), Some(Notice::OutOfStock));
    }

    #[tokio::test]
    async fn test_update_oversized_amount_fails() {
        let mut h = harness().await;
        h.store.add_product(1).await.unwrap();

        let err = h
            .store
            .update_product_amount(UpdateProductAmount {
                product_id: 1,
                amount: i64::from(u32::MAX) + 1,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Rejected(CartError::Validation(_))));
        assert_eq!(next_notice(&mut h.toasts), Some(Notice::UpdateFailed));
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    #[tokio::test]
    async fn test_persist_failure_leaves_cart_untouched() {
        let channel = ToastChannel::default();
        let mut toasts = channel.subscribe();
        let store = CartStore::builder(catalog(), Arc::new(ReadOnlyStorage(MemoryStorage::new())))
            .notifier(Arc::new(channel))
            .open()
            .await
            .unwrap();
        let rx = store.subscribe();

        let err = store.add_product(1).await.unwrap_err();

        assert!(matches!(err, StoreError::Storage(_)));
        assert!(store.cart().is_empty());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(next_notice(&mut toasts), Some(Notice::AddFailed));
    }

    #[tokio::test]
    async fn test_open_fails_when_storage_unreadable() {
        let result = CartStore::builder(catalog(), Arc::new(UnreachableStorage))
            .open()
            .await;
        assert!(matches!(result, Err(StoreError::Storage(_))));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_starts_empty() {
        for raw in ["not json", r#"{"id": 1}"#, r#"[{"id":1,"title":"a","price":1.0,"image":"","amount":0}]"#] {
            let h = harness_with(Arc::new(MemoryStorage::with_entry(CART_STORAGE_KEY, raw))).await;
            assert!(h.store.cart().is_empty(), "snapshot {raw:?} should be discarded");

            let cart = h.store.add_product(1).await.unwrap();
            assert_eq!(stored_cart(&h.storage).await, cart);
        }
    }

    #[tokio::test]
    async fn test_reopen_restores_cart() {
        let storage = Arc::new(MemoryStorage::new());

        let first = harness_with(storage.clone()).await;
        first.store.add_product(1).await.unwrap();
        first.store.add_product(1).await.unwrap();
        first.store.add_product(2).await.unwrap();
        let saved = first.store.cart();
        drop(first);

        let second = harness_with(storage).await;
        assert_eq!(second.store.cart(), saved);
    }

    #[tokio::test]
    async fn test_sqlite_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.db");

        let storage = Arc::new(SqliteStorage::open(StorageConfig::new(path.clone())).await.unwrap());
        let store = CartStore::builder(catalog(), storage.clone())
            .storage_key("test:cart")
            .open()
            .await
            .unwrap();
        store.add_product(2).await.unwrap();
        storage.close().await;

        let storage = Arc::new(SqliteStorage::open(StorageConfig::new(path.clone())).await.unwrap());
        let store = CartStore::builder(catalog(), storage)
            .storage_key("test:cart")
            .open()
            .await
            .unwrap();
        assert_eq!(amounts(&store.cart()), vec![(2, 1)]);
        assert_eq!(store.storage_key(), "test:cart");
    }

    // =========================================================================
    // Observation and concurrency
    // =========================================================================

    #[tokio::test]
    async fn test_subscribers_see_commits() {
        let h = harness().await;
        let mut rx = h.store.subscribe();

        h.store.add_product(1).await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(amounts(&rx.borrow_and_update()), vec![(1, 1)]);
    }

    #[tokio::test]
    async fn test_concurrent_adds_never_exceed_stock() {
        let mut h = harness().await;

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let store = h.store.clone();
            tasks.push(tokio::spawn(async move { store.add_product(1).await }));
        }

        let mut accepted = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, 5);
        assert_eq!(amounts(&h.store.cart()), vec![(1, 5)]);
        assert_eq!(stored_cart(&h.storage).await, h.store.cart());

        let mut rejections = 0;
        while let Some(notice) = next_notice(&mut h.toasts) {
            assert_eq!(notice, Notice::OutOfStock);
            rejections += 1;
        }
        assert_eq!(rejections, 3);
    }
}
