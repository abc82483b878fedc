use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{CategoryId, ProductId, VariantId, VersionToken};
use crate::model::ProductAggregate;

/// Outward-facing shape of a product aggregate: every field plus the
/// current version token, which the caller must echo on its next update.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub base_price: Decimal,
    pub category_id: CategoryId,
    pub category_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: VersionToken,
    pub variants: Vec<VariantView>,
    /// Primary image first, the rest in position order.
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantView {
    pub id: VariantId,
    pub color: Option<String>,
    pub size: Option<String>,
    pub additional_price: Decimal,
    pub stock_quantity: u32,
}

impl ProductView {
    pub(crate) fn from_aggregate(
        aggregate: &ProductAggregate,
        category_name: Option<String>,
    ) -> Self {
        let variants = aggregate
            .variants
            .iter()
            .map(|v| VariantView {
                id: v.id,
                color: v.color.clone(),
                size: v.size.clone(),
                additional_price: v.additional_price,
                stock_quantity: v.stock_quantity,
            })
            .collect();

        let mut images = aggregate.images.clone();
        images.sort_by(|a, b| b.is_primary.cmp(&a.is_primary));
        let image_urls = images.into_iter().map(|img| img.url).collect();

        let product = &aggregate.product;
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            sku: product.sku.clone(),
            base_price: product.base_price,
            category_id: product.category_id,
            category_name,
            is_active: product.is_active(),
            created_at: product.created_at,
            updated_at: product.updated_at,
            version: product.version.clone(),
            variants,
            image_urls,
        }
    }
}
