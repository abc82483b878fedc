// ============================================================================
// Stockroom Library
// ============================================================================

pub mod config;
pub mod core;
pub mod model;
pub mod query;
pub mod reconcile;
pub mod repository;
pub mod service;
pub mod storage;

// Re-export main types for convenience
pub use config::CatalogConfig;
pub use crate::core::{
    CatalogError, CategoryId, EntityStatus, ImageId, ProductId, Result, VariantId, VersionToken,
};
pub use model::{
    Category, CreateProduct, Product, ProductAggregate, ProductImage, ProductVariant,
    UpdateProduct, VariantEntry,
};
pub use query::{PageRequest, Paged, ProductFilter};
pub use repository::ProductRepository;
pub use service::{ProductService, ProductView, VariantView};
pub use storage::{CatalogStore, InMemoryCatalogStore, ProductCommit};

use std::sync::Arc;

// ============================================================================
// High-level Catalog API
// ============================================================================

/// Embeddable product catalog backed by the in-memory store.
///
/// This is the recommended entry point: it wires the store, repository and
/// product service together. Updates use optimistic concurrency — every
/// loaded product carries a version token, and an update supplying a stale
/// token fails with [`CatalogError::StaleVersion`] instead of overwriting
/// a concurrent change.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use stockroom::{Catalog, CreateProduct};
///
/// async fn demo() -> stockroom::Result<()> {
///     let catalog = Catalog::new();
///     let shoes = catalog.add_category("Shoes").await?;
///
///     let view = catalog
///         .products()
///         .create(CreateProduct {
///             name: "Trail Runner".to_string(),
///             description: None,
///             sku: "TRL-001".to_string(),
///             base_price: Decimal::new(8999, 2),
///             category_id: shoes.id,
///             variants: Vec::new(),
///             image_urls: vec!["trail.png".to_string()],
///         })
///         .await?;
///
///     assert_eq!(view.category_name.as_deref(), Some("Shoes"));
///     Ok(())
/// }
/// ```
pub struct Catalog {
    store: Arc<InMemoryCatalogStore>,
    products: ProductService<InMemoryCatalogStore>,
}

impl Catalog {
    /// Create a catalog with default configuration.
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Create a catalog with custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockroom::{Catalog, CatalogConfig};
    ///
    /// let catalog = Catalog::with_config(CatalogConfig::new().default_page_size(50));
    /// ```
    pub fn with_config(config: CatalogConfig) -> Self {
        let store = Arc::new(InMemoryCatalogStore::new());
        Self {
            products: ProductService::new(Arc::clone(&store), config),
            store,
        }
    }

    /// Product operations: create, get, paged listing, update, soft delete.
    pub fn products(&self) -> &ProductService<InMemoryCatalogStore> {
        &self.products
    }

    /// Register a category products can reference.
    pub async fn add_category(&self, name: &str) -> Result<Category> {
        let category = Category::new(name);
        self.store.insert_category(category.clone()).await?;
        Ok(category)
    }

    pub async fn category(&self, id: CategoryId) -> Result<Option<Category>> {
        self.store.fetch_category(id).await
    }

    /// Soft-delete a category. Existing products keep referencing it, but
    /// creating or re-targeting products at it fails with `NotFound`.
    pub async fn retire_category(&self, id: CategoryId) -> Result<()> {
        self.store.retire_category(id).await
    }

    /// Direct handle on the underlying store, for advanced usage such as
    /// wiring a custom repository.
    pub fn store(&self) -> &Arc<InMemoryCatalogStore> {
        &self.store
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
