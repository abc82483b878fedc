//! Filter, sort and pagination over the product collection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::CatalogConfig;
use crate::core::CategoryId;
use crate::model::Product;

/// Filter over active products. All criteria are conjunctive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring match on name or SKU.
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, id: CategoryId) -> Self {
        self.category_id = Some(id);
        self
    }

    pub fn min_price(mut self, price: Decimal) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn max_price(mut self, price: Decimal) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = &self.search {
            let needle = term.to_lowercase();
            let in_name = product.name.to_lowercase().contains(&needle);
            let in_sku = product.sku.to_lowercase().contains(&needle);
            if !in_name && !in_sku {
                return false;
            }
        }
        if let Some(category_id) = self.category_id
            && product.category_id != category_id
        {
            return false;
        }
        if let Some(min) = self.min_price
            && product.base_price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && product.base_price > max
        {
            return false;
        }
        true
    }
}

/// 1-based page request. Values are clamped before use: page floors at 1,
/// a zero page size falls back to the configured default, and the size is
/// capped at the configured maximum.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// First page with the default size (signalled by zero).
    pub fn first() -> Self {
        Self { page: 1, page_size: 0 }
    }

    pub(crate) fn clamp(self, config: &CatalogConfig) -> Self {
        let page = self.page.max(1);
        let page_size = if self.page_size == 0 {
            config.default_page_size
        } else {
            self.page_size.min(config.max_page_size)
        };
        Self { page, page_size }
    }

    pub(crate) fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> Paged<T> {
    pub(crate) fn new(items: Vec<T>, total: usize, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages: total.div_ceil(request.page_size.max(1)),
        }
    }
}
