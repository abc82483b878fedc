//! Domain-facing product operations: thin orchestration over the
//! repository plus view mapping. A surrounding transport layer maps the
//! error taxonomy to its own responses.

mod views;

pub use views::{ProductView, VariantView};

use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::core::{ProductId, Result};
use crate::model::{CreateProduct, ProductAggregate, UpdateProduct};
use crate::query::{PageRequest, Paged, ProductFilter};
use crate::repository::ProductRepository;
use crate::storage::CatalogStore;

pub struct ProductService<S> {
    store: Arc<S>,
    repository: ProductRepository<S>,
}

impl<S: CatalogStore> ProductService<S> {
    pub fn new(store: Arc<S>, config: CatalogConfig) -> Self {
        Self {
            repository: ProductRepository::new(Arc::clone(&store), config),
            store,
        }
    }

    pub async fn create(&self, draft: CreateProduct) -> Result<ProductView> {
        let aggregate = self.repository.create(draft).await?;
        self.view(&aggregate).await
    }

    pub async fn get(&self, id: ProductId) -> Result<Option<ProductView>> {
        match self.repository.find_by_id(id).await? {
            Some(aggregate) => Ok(Some(self.view(&aggregate).await?)),
            None => Ok(None),
        }
    }

    pub async fn update(&self, id: ProductId, request: UpdateProduct) -> Result<ProductView> {
        let aggregate = self.repository.update(id, request).await?;
        self.view(&aggregate).await
    }

    pub async fn delete(&self, id: ProductId) -> Result<()> {
        self.repository.soft_delete(id).await
    }

    pub async fn paged(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Paged<ProductView>> {
        let aggregates = self.repository.paged(filter, page).await?;

        let mut items = Vec::with_capacity(aggregates.items.len());
        for aggregate in &aggregates.items {
            items.push(self.view(aggregate).await?);
        }
        Ok(Paged {
            items,
            total: aggregates.total,
            page: aggregates.page,
            page_size: aggregates.page_size,
            total_pages: aggregates.total_pages,
        })
    }

    async fn view(&self, aggregate: &ProductAggregate) -> Result<ProductView> {
        let category_name = self
            .store
            .fetch_category(aggregate.product.category_id)
            .await?
            .map(|category| category.name);
        Ok(ProductView::from_aggregate(aggregate, category_name))
    }
}
