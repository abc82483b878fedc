//! The storage collaborator: per-entity CRUD, filtered scans, and an
//! atomic multi-row commit with conflict detection on the version token.

pub mod memory;

pub use memory::InMemoryCatalogStore;

use async_trait::async_trait;

use crate::core::{CategoryId, ImageId, ProductId, Result, VariantId, VersionToken};
use crate::model::{Category, Product, ProductAggregate, ProductImage, ProductVariant};
use crate::query::ProductFilter;

/// Write set for one product aggregate, produced by the reconciliation
/// engine and applied as a single atomic commit.
#[derive(Debug, Clone)]
pub struct ProductCommit {
    /// The product row with scalar fields already overwritten. The store
    /// stamps a fresh version token on it at commit time.
    pub product: Product,
    pub upsert_variants: Vec<ProductVariant>,
    pub remove_variants: Vec<VariantId>,
    pub upsert_images: Vec<ProductImage>,
    pub remove_images: Vec<ImageId>,
}

impl ProductCommit {
    /// A commit that only touches the product row itself.
    pub fn scalars_only(product: Product) -> Self {
        Self {
            product,
            upsert_variants: Vec::new(),
            remove_variants: Vec::new(),
            upsert_images: Vec::new(),
            remove_images: Vec::new(),
        }
    }
}

/// Transactional store the catalog core depends on.
///
/// `commit_product` is the only mutation path for existing products and is
/// all-or-nothing: it fails the whole operation if `expected` does not
/// match the currently stored version token.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Eagerly load a product with its variant and image collections,
    /// regardless of lifecycle status. Images come back in position order.
    async fn fetch_product(&self, id: ProductId) -> Result<Option<ProductAggregate>>;

    /// Insert a brand-new aggregate.
    async fn insert_product(&self, aggregate: ProductAggregate) -> Result<()>;

    /// Atomically apply a reconciled write set. Fails with a stale-version
    /// conflict if `expected` no longer matches; on success the fresh token
    /// is returned and visible on the stored product.
    async fn commit_product(
        &self,
        expected: &VersionToken,
        commit: ProductCommit,
    ) -> Result<VersionToken>;

    /// True if another *active* product (not `ignore`) holds this SKU.
    async fn sku_in_use(&self, sku: &str, ignore: Option<ProductId>) -> Result<bool>;

    /// Filtered scan over active products, newest created first. Returns
    /// the requested window plus the total match count.
    async fn query_products(
        &self,
        filter: &ProductFilter,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<ProductAggregate>, usize)>;

    async fn insert_category(&self, category: Category) -> Result<()>;

    async fn fetch_category(&self, id: CategoryId) -> Result<Option<Category>>;

    /// True if the category exists and is active.
    async fn category_is_active(&self, id: CategoryId) -> Result<bool>;

    /// Soft-delete a category (products keep referencing it).
    async fn retire_category(&self, id: CategoryId) -> Result<()>;
}
