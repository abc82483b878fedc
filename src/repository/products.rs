use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::core::{
    CatalogError, CategoryId, EntityStatus, ImageId, ProductId, Result, VariantId, VersionToken,
};
use crate::model::{CreateProduct, Product, ProductAggregate, ProductImage, ProductVariant, UpdateProduct};
use crate::query::{PageRequest, Paged, ProductFilter};
use crate::reconcile;
use crate::storage::{CatalogStore, ProductCommit};

/// Loads and saves a product with its variant and image collections as
/// one consistency unit. The read side sees active products only.
pub struct ProductRepository<S> {
    store: Arc<S>,
    config: CatalogConfig,
}

impl<S: CatalogStore> ProductRepository<S> {
    pub fn new(store: Arc<S>, config: CatalogConfig) -> Self {
        Self { store, config }
    }

    /// Eager aggregate load; `None` for unknown or soft-deleted products.
    pub async fn find_by_id(&self, id: ProductId) -> Result<Option<ProductAggregate>> {
        let aggregate = self.store.fetch_product(id).await?;
        Ok(aggregate.filter(|a| a.product.is_active()))
    }

    pub async fn create(&self, draft: CreateProduct) -> Result<ProductAggregate> {
        draft.validate()?;
        self.require_active_category(draft.category_id).await?;
        if self.store.sku_in_use(&draft.sku, None).await? {
            return Err(CatalogError::DuplicateSku(draft.sku));
        }

        let now = Utc::now();
        let id = ProductId::new();
        let product = Product {
            id,
            name: draft.name,
            description: draft.description,
            sku: draft.sku,
            base_price: draft.base_price,
            category_id: draft.category_id,
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
            version: VersionToken::fresh(),
        };
        let variants = draft
            .variants
            .iter()
            .map(|entry| ProductVariant {
                id: VariantId::new(),
                product_id: id,
                color: entry.color.clone(),
                size: entry.size.clone(),
                additional_price: entry.additional_price,
                stock_quantity: entry.stock_quantity,
            })
            .collect();
        let images = draft
            .image_urls
            .iter()
            .enumerate()
            .map(|(index, url)| ProductImage {
                id: ImageId::new(),
                product_id: id,
                url: url.clone(),
                is_primary: index == 0,
                position: index as u32,
            })
            .collect();

        let aggregate = ProductAggregate {
            product,
            variants,
            images,
        };
        self.store.insert_product(aggregate.clone()).await?;
        debug!(product = %id, "product created");
        Ok(aggregate)
    }

    /// The aggregate update protocol: version check, SKU re-validation,
    /// reconciliation, one atomic commit. Fails without touching anything
    /// persisted; on success the returned aggregate carries the fresh
    /// version token.
    pub async fn update(&self, id: ProductId, request: UpdateProduct) -> Result<ProductAggregate> {
        let Some(aggregate) = self.find_by_id(id).await? else {
            return Err(CatalogError::NotFound(format!("product '{id}'")));
        };

        reconcile::check_version(&aggregate.product, &request.version)?;
        if self
            .store
            .sku_in_use(&aggregate.product.sku, Some(id))
            .await?
        {
            return Err(CatalogError::DuplicateSku(aggregate.product.sku.clone()));
        }
        self.require_active_category(request.category_id).await?;

        let commit = reconcile::build_commit(&aggregate, &request, Utc::now())?;
        self.store.commit_product(&request.version, commit).await?;
        debug!(product = %id, "product updated");

        self.find_by_id(id).await?.ok_or_else(|| {
            CatalogError::Internal(format!("product '{id}' vanished after commit"))
        })
    }

    /// Flip to `Deleted` and touch `updated_at`. Children are left in
    /// place; they become unreachable through active-product queries.
    pub async fn soft_delete(&self, id: ProductId) -> Result<()> {
        let Some(aggregate) = self.find_by_id(id).await? else {
            return Err(CatalogError::NotFound(format!("product '{id}'")));
        };

        let expected = aggregate.product.version.clone();
        let mut product = aggregate.product;
        product.status = EntityStatus::Deleted;
        product.updated_at = Utc::now();

        self.store
            .commit_product(&expected, ProductCommit::scalars_only(product))
            .await?;
        debug!(product = %id, "product soft-deleted");
        Ok(())
    }

    /// Filtered, paged listing. Filtering, ordering and windowing are
    /// delegated to the store; paging bounds are clamped here.
    pub async fn paged(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Paged<ProductAggregate>> {
        let page = page.clamp(&self.config);
        let (items, total) = self
            .store
            .query_products(filter, page.offset(), page.page_size)
            .await?;
        Ok(Paged::new(items, total, page))
    }

    async fn require_active_category(&self, id: CategoryId) -> Result<()> {
        if !self.store.category_is_active(id).await? {
            return Err(CatalogError::NotFound(format!("category '{id}'")));
        }
        Ok(())
    }
}
