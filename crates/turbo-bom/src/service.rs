//! Generate-and-commit cycle over pluggable catalog and stock backends.
//!
//! Regeneration of one product is serialized by a per-product lock so two
//! concurrent runs can never both create the same option-set.

use crate::bom::{BomResolver, ResolvedBom};
use crate::catalog::{CatalogSnapshot, Variant};
use crate::config::EngineConfig;
use crate::error::{CommerceError, Result};
use crate::ids::{BatchId, ProductId, VariantId};
use crate::pricing::{EffectivePricing, PricingResolver};
use crate::producibility::{Producibility, ProducibilityCalculator};
use crate::stock::{ConsumptionPlan, StockLedger, StockMovement};
use crate::variants::{GenerationOutcome, VariantChange, VariantGenerator};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// Persistence for catalog snapshots and variant rows.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// A consistent snapshot of one product's catalog data.
    async fn snapshot(&self, product: &ProductId) -> Result<CatalogSnapshot>;

    /// All variants of a product, active and inactive.
    async fn variants(&self, product: &ProductId) -> Result<Vec<Variant>>;

    /// Apply the changes from one generation run.
    async fn apply(&self, product: &ProductId, changes: &[VariantChange]) -> Result<()>;
}

/// Catalog store held in memory (for development/testing).
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    snapshots: RwLock<HashMap<ProductId, CatalogSnapshot>>,
    variants: RwLock<HashMap<ProductId, Vec<Variant>>>,
    writes: AtomicUsize,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product's catalog data.
    pub async fn put_snapshot(&self, snapshot: CatalogSnapshot) {
        self.snapshots
            .write()
            .await
            .insert(snapshot.product.id.clone(), snapshot);
    }

    /// Edit a product's catalog data in place.
    pub async fn edit_snapshot<F>(&self, product: &ProductId, edit: F) -> Result<()>
    where
        F: FnOnce(&mut CatalogSnapshot) + Send,
    {
        let mut snapshots = self.snapshots.write().await;
        let snapshot = snapshots
            .get_mut(product)
            .ok_or_else(|| CommerceError::ProductNotFound(product.to_string()))?;
        edit(snapshot);
        Ok(())
    }

    /// Number of variant rows written so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn snapshot(&self, product: &ProductId) -> Result<CatalogSnapshot> {
        self.snapshots
            .read()
            .await
            .get(product)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(product.to_string()))
    }

    async fn variants(&self, product: &ProductId) -> Result<Vec<Variant>> {
        Ok(self
            .variants
            .read()
            .await
            .get(product)
            .cloned()
            .unwrap_or_default())
    }

    async fn apply(&self, product: &ProductId, changes: &[VariantChange]) -> Result<()> {
        let mut all = self.variants.write().await;
        let rows = all.entry(product.clone()).or_default();

        for change in changes {
            match change {
                VariantChange::Created(variant) => rows.push(variant.clone()),
                VariantChange::Reactivated(id) | VariantChange::Deactivated(id) => {
                    let row = rows
                        .iter_mut()
                        .find(|v| &v.id == id)
                        .ok_or_else(|| CommerceError::VariantNotFound(id.to_string()))?;
                    row.is_active = matches!(change, VariantChange::Reactivated(_));
                }
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// One exclusive lock per product.
#[derive(Debug, Default)]
pub struct RegenerationLocks {
    locks: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl RegenerationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait up to `timeout` for exclusive access to `product`.
    pub async fn acquire(
        &self,
        product: &ProductId,
        timeout: Duration,
    ) -> Result<OwnedMutexGuard<()>> {
        let lock = self
            .locks
            .lock()
            .await
            .entry(product.clone())
            .or_default()
            .clone();

        tokio::time::timeout(timeout, lock.lock_owned())
            .await
            .map_err(|_| CommerceError::LockTimeout(product.to_string()))
    }
}

/// Ties the pure resolvers to a catalog store and a stock ledger.
pub struct VariantService<S, L> {
    store: Arc<S>,
    ledger: Arc<L>,
    locks: RegenerationLocks,
    config: EngineConfig,
}

impl<S: CatalogStore, L: StockLedger> VariantService<S, L> {
    pub fn new(store: Arc<S>, ledger: Arc<L>, config: EngineConfig) -> Self {
        Self {
            store,
            ledger,
            locks: RegenerationLocks::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Regenerate a product's variants and commit the changes.
    ///
    /// Nothing is written when generation fails as a whole.
    pub async fn regenerate(&self, product: &ProductId) -> Result<GenerationOutcome> {
        let _guard = self
            .locks
            .acquire(product, self.config.regeneration.lock_timeout())
            .await?;

        let snapshot = self.store.snapshot(product).await?;
        let existing = self.store.variants(product).await?;
        let outcome = VariantGenerator::new(&self.config.sku).generate(&snapshot, &existing)?;

        if !outcome.changes.is_empty() {
            self.store.apply(product, &outcome.changes).await?;
        }

        tracing::info!(
            product = %product,
            created = outcome.created().len(),
            reactivated = outcome.reactivated().len(),
            deactivated = outcome.deactivated.len(),
            failed = outcome.failures.len(),
            "regenerated variants"
        );
        Ok(outcome)
    }

    pub async fn resolve_bom(&self, product: &ProductId, variant: &VariantId) -> Result<ResolvedBom> {
        let (snapshot, variant) = self.load(product, variant).await?;
        BomResolver::new(&snapshot).resolve(&variant)
    }

    pub async fn pricing(&self, product: &ProductId, variant: &VariantId) -> Result<EffectivePricing> {
        let (snapshot, variant) = self.load(product, variant).await?;
        PricingResolver::new(&snapshot).resolve(&variant)
    }

    /// Producible units of a variant against the ledger's current stock.
    pub async fn producibility(
        &self,
        product: &ProductId,
        variant: &VariantId,
    ) -> Result<Producibility> {
        let bom = self.resolve_bom(product, variant).await?;
        let stock = self.ledger.stock_levels().await?;
        Ok(ProducibilityCalculator::for_bom(&bom, &stock))
    }

    /// Run a production batch of `units` for a variant.
    pub async fn produce(
        &self,
        product: &ProductId,
        variant: &VariantId,
        units: u64,
        batch: &BatchId,
        actor: Option<&str>,
    ) -> Result<Vec<StockMovement>> {
        let bom = self.resolve_bom(product, variant).await?;
        let plan = ConsumptionPlan::for_units(&bom, units)?;
        self.ledger.produce(&plan, batch, actor).await
    }

    async fn load(
        &self,
        product: &ProductId,
        variant: &VariantId,
    ) -> Result<(CatalogSnapshot, Variant)> {
        let snapshot = self.store.snapshot(product).await?;
        let variant = self
            .store
            .variants(product)
            .await?
            .into_iter()
            .find(|v| &v.id == variant)
            .ok_or_else(|| CommerceError::VariantNotFound(variant.to_string()))?;
        Ok((snapshot, variant))
    }
}
