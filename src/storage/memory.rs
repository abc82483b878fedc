use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{CatalogStore, ProductCommit};
use crate::core::{
    CatalogError, CategoryId, EntityStatus, ImageId, ProductId, Result, VariantId, VersionToken,
};
use crate::model::{Category, Product, ProductAggregate, ProductImage, ProductVariant};
use crate::query::ProductFilter;

/// Entity tables. `im` maps clone in O(1) with structural sharing, so a
/// commit can build its successor state on a private copy and swap it in
/// whole: a failed commit leaves the published state untouched.
#[derive(Debug, Clone, Default)]
struct Tables {
    products: im::HashMap<ProductId, Product>,
    variants: im::HashMap<VariantId, ProductVariant>,
    images: im::HashMap<ImageId, ProductImage>,
    categories: im::HashMap<CategoryId, Category>,
}

impl Tables {
    fn assemble(&self, product: &Product) -> ProductAggregate {
        let mut variants: Vec<_> = self
            .variants
            .values()
            .filter(|v| v.product_id == product.id)
            .cloned()
            .collect();
        variants.sort_by_key(|v| v.id);

        let mut images: Vec<_> = self
            .images
            .values()
            .filter(|img| img.product_id == product.id)
            .cloned()
            .collect();
        images.sort_by_key(|img| img.position);

        ProductAggregate {
            product: product.clone(),
            variants,
            images,
        }
    }
}

/// In-memory implementation of the storage collaborator.
///
/// All tables live behind one `RwLock`; a commit is a single critical
/// section, so concurrent updates to the same product serialize there and
/// the loser of a race observes a stale token.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn fetch_product(&self, id: ProductId) -> Result<Option<ProductAggregate>> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(&id).map(|p| tables.assemble(p)))
    }

    async fn insert_product(&self, aggregate: ProductAggregate) -> Result<()> {
        let mut tables = self.tables.write().await;
        let id = aggregate.product.id;
        if tables.products.contains_key(&id) {
            return Err(CatalogError::Internal(format!(
                "product id collision on insert: {id}"
            )));
        }

        let mut next = tables.clone();
        next.products.insert(id, aggregate.product);
        for variant in aggregate.variants {
            next.variants.insert(variant.id, variant);
        }
        for image in aggregate.images {
            next.images.insert(image.id, image);
        }
        *tables = next;
        debug!(product = %id, "product inserted");
        Ok(())
    }

    async fn commit_product(
        &self,
        expected: &VersionToken,
        commit: ProductCommit,
    ) -> Result<VersionToken> {
        let mut tables = self.tables.write().await;
        let id = commit.product.id;

        let Some(current) = tables.products.get(&id) else {
            return Err(CatalogError::NotFound(format!("product '{id}'")));
        };
        if current.version.as_bytes() != expected.as_bytes() {
            warn!(product = %id, "version token mismatch at commit");
            return Err(CatalogError::StaleVersion(format!(
                "product '{id}' was modified by another process"
            )));
        }

        let mut next = tables.clone();
        let token = VersionToken::fresh();
        let mut product = commit.product;
        product.version = token.clone();
        next.products.insert(id, product);

        for variant_id in &commit.remove_variants {
            next.variants.remove(variant_id);
        }
        for image_id in &commit.remove_images {
            next.images.remove(image_id);
        }
        for variant in commit.upsert_variants {
            next.variants.insert(variant.id, variant);
        }
        for image in commit.upsert_images {
            next.images.insert(image.id, image);
        }

        *tables = next;
        debug!(product = %id, "aggregate commit applied");
        Ok(token)
    }

    async fn sku_in_use(&self, sku: &str, ignore: Option<ProductId>) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.products.values().any(|p| {
            p.is_active() && p.sku == sku && Some(p.id) != ignore
        }))
    }

    async fn query_products(
        &self,
        filter: &ProductFilter,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<ProductAggregate>, usize)> {
        let tables = self.tables.read().await;

        let mut matched: Vec<_> = tables
            .products
            .values()
            .filter(|p| p.is_active() && filter.matches(p))
            .collect();
        // Newest first; id as tiebreak so paging is deterministic.
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = matched.len();
        let window = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|p| tables.assemble(p))
            .collect();
        Ok((window, total))
    }

    async fn insert_category(&self, category: Category) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.categories.contains_key(&category.id) {
            return Err(CatalogError::Internal(format!(
                "category id collision on insert: {}",
                category.id
            )));
        }
        tables.categories.insert(category.id, category);
        Ok(())
    }

    async fn fetch_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.get(&id).cloned())
    }

    async fn category_is_active(&self, id: CategoryId) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.categories.get(&id).is_some_and(Category::is_active))
    }

    async fn retire_category(&self, id: CategoryId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let Some(category) = tables.categories.get(&id) else {
            return Err(CatalogError::NotFound(format!("category '{id}'")));
        };
        let mut retired = category.clone();
        retired.status = EntityStatus::Deleted;
        tables.categories.insert(id, retired);
        Ok(())
    }
}
