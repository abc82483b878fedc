use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{CategoryId, EntityStatus, ImageId, ProductId, VariantId, VersionToken};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Unique among active products.
    pub sku: String,
    pub base_price: Decimal,
    pub category_id: CategoryId,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: VersionToken,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Owned exclusively by one product; removed when the parent is hard
/// deleted, retained (and unreachable through active queries) when the
/// parent is soft deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub color: Option<String>,
    pub size: Option<String>,
    /// Added on top of the product's base price.
    pub additional_price: Decimal,
    pub stock_quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
    /// True iff this image sits at position 0. At most one per product.
    pub is_primary: bool,
    /// Position in submission order; image diffs are positional, not
    /// identifier-based.
    pub position: u32,
}

/// A product plus its owned variant and image rows, loaded and committed
/// as one consistency unit. Children reference the owner by id; there are
/// no back-pointers.
#[derive(Debug, Clone)]
pub struct ProductAggregate {
    pub product: Product,
    pub variants: Vec<ProductVariant>,
    pub images: Vec<ProductImage>,
}

impl ProductAggregate {
    pub fn variant(&self, id: VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == id)
    }
}
