//! Product aggregate reconciliation.
//!
//! Turns a persisted aggregate plus a submitted update payload into a
//! [`ProductCommit`] ready for one atomic store commit, or fails without
//! mutating anything. Variants are diffed by identifier (order
//! independent); images are diffed by position (the submitted list's
//! index 0 is always the primary image).

use chrono::{DateTime, Utc};

use crate::core::{CatalogError, ImageId, ProductId, Result, VariantId, VersionToken};
use crate::model::{
    Product, ProductAggregate, ProductImage, ProductVariant, UpdateProduct, VariantEntry,
};
use crate::storage::ProductCommit;

/// Byte-for-byte comparison of the caller-supplied token against the
/// persisted one. Runs before any other processing; a mismatch rejects
/// the whole update.
pub fn check_version(persisted: &Product, supplied: &VersionToken) -> Result<()> {
    if persisted.version.as_bytes() != supplied.as_bytes() {
        return Err(CatalogError::StaleVersion(format!(
            "product '{}' was modified by another process",
            persisted.id
        )));
    }
    Ok(())
}

/// Build the reconciled write set for an update.
///
/// The version check runs first; the payload is then validated and the
/// scalar fields, variant diff and image diff are assembled in memory.
/// `updated_at` is stamped with `now`. Nothing persisted is touched.
pub fn build_commit(
    aggregate: &ProductAggregate,
    request: &UpdateProduct,
    now: DateTime<Utc>,
) -> Result<ProductCommit> {
    check_version(&aggregate.product, &request.version)?;
    request.validate()?;

    let mut product = aggregate.product.clone();
    product.name = request.name.clone();
    product.description = request.description.clone();
    product.base_price = request.base_price;
    product.category_id = request.category_id;
    product.updated_at = now;

    let (upsert_variants, remove_variants) =
        reconcile_variants(product.id, &aggregate.variants, &request.variants);
    let (upsert_images, remove_images) =
        reconcile_images(product.id, &aggregate.images, &request.image_urls);

    Ok(ProductCommit {
        product,
        upsert_variants,
        remove_variants,
        upsert_images,
        remove_images,
    })
}

/// Identifier-based variant diff.
///
/// A submitted entry whose id matches a persisted variant overwrites that
/// row's mutable fields, keeping its identity. An entry without an id, or
/// carrying an id that matches nothing, becomes a new row with a server
/// assigned id (unknown ids deliberately do not fail). Persisted variants
/// referenced by no entry are removed; a row is never both updated and
/// removed.
fn reconcile_variants(
    product_id: ProductId,
    persisted: &[ProductVariant],
    submitted: &[VariantEntry],
) -> (Vec<ProductVariant>, Vec<VariantId>) {
    let mut upserts = Vec::with_capacity(submitted.len());

    for entry in submitted {
        let existing = entry
            .id
            .and_then(|id| persisted.iter().find(|v| v.id == id));

        match existing {
            Some(variant) => {
                let mut updated = variant.clone();
                updated.color = entry.color.clone();
                updated.size = entry.size.clone();
                updated.additional_price = entry.additional_price;
                updated.stock_quantity = entry.stock_quantity;
                upserts.push(updated);
            }
            None => upserts.push(ProductVariant {
                id: VariantId::new(),
                product_id,
                color: entry.color.clone(),
                size: entry.size.clone(),
                additional_price: entry.additional_price,
                stock_quantity: entry.stock_quantity,
            }),
        }
    }

    let removals = persisted
        .iter()
        .filter(|v| !submitted.iter().any(|entry| entry.id == Some(v.id)))
        .map(|v| v.id)
        .collect();

    (upserts, removals)
}

/// Positional image diff.
///
/// Walks the submitted URL list by index: positions that already exist
/// get their URL overwritten in place, positions past the persisted count
/// become new rows. `is_primary` is recomputed as `index == 0` across the
/// board. Persisted rows past the submitted length are removed.
/// `persisted` must be in position order, which is how the store loads it.
fn reconcile_images(
    product_id: ProductId,
    persisted: &[ProductImage],
    submitted: &[String],
) -> (Vec<ProductImage>, Vec<ImageId>) {
    let mut upserts = Vec::with_capacity(submitted.len());

    for (index, url) in submitted.iter().enumerate() {
        match persisted.get(index) {
            Some(image) => {
                let mut updated = image.clone();
                updated.url = url.clone();
                updated.is_primary = index == 0;
                upserts.push(updated);
            }
            None => upserts.push(ProductImage {
                id: ImageId::new(),
                product_id,
                url: url.clone(),
                is_primary: index == 0,
                position: index as u32,
            }),
        }
    }

    let removals = persisted
        .iter()
        .skip(submitted.len())
        .map(|img| img.id)
        .collect();

    (upserts, removals)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;
    use crate::core::{CategoryId, EntityStatus};
    use crate::model::Product;

    fn sample_product() -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(),
            name: "Trail Runner".to_string(),
            description: None,
            sku: "TRL-001".to_string(),
            base_price: Decimal::new(8999, 2),
            category_id: CategoryId::new(),
            status: EntityStatus::Active,
            created_at: now,
            updated_at: now,
            version: VersionToken::fresh(),
        }
    }

    fn variant(product_id: ProductId, color: &str) -> ProductVariant {
        ProductVariant {
            id: VariantId::new(),
            product_id,
            color: Some(color.to_string()),
            size: None,
            additional_price: Decimal::ZERO,
            stock_quantity: 5,
        }
    }

    fn image(product_id: ProductId, url: &str, position: u32) -> ProductImage {
        ProductImage {
            id: ImageId::new(),
            product_id,
            url: url.to_string(),
            is_primary: position == 0,
            position,
        }
    }

    fn entry(id: Option<VariantId>, color: &str) -> VariantEntry {
        VariantEntry {
            id,
            color: Some(color.to_string()),
            size: None,
            additional_price: Decimal::ZERO,
            stock_quantity: 5,
        }
    }

    #[test]
    fn version_mismatch_rejects_before_anything_else() {
        let product = sample_product();
        let err = check_version(&product, &VersionToken::fresh()).unwrap_err();
        assert!(matches!(err, CatalogError::StaleVersion(_)));
        assert!(check_version(&product, &product.version).is_ok());
    }

    #[test]
    fn matched_variant_is_updated_in_place() {
        let product_id = ProductId::new();
        let red = variant(product_id, "red");
        let blue = variant(product_id, "blue");
        let persisted = vec![red.clone(), blue.clone()];

        let submitted = vec![entry(Some(red.id), "green"), entry(None, "yellow")];
        let (upserts, removals) = reconcile_variants(product_id, &persisted, &submitted);

        assert_eq!(upserts.len(), 2);
        assert_eq!(upserts[0].id, red.id);
        assert_eq!(upserts[0].color.as_deref(), Some("green"));
        assert_ne!(upserts[1].id, red.id);
        assert_ne!(upserts[1].id, blue.id);
        assert_eq!(removals, vec![blue.id]);
    }

    #[test]
    fn unknown_variant_id_creates_a_new_row() {
        let product_id = ProductId::new();
        let persisted = vec![variant(product_id, "red")];

        let stale_id = VariantId::new();
        let submitted = vec![
            entry(Some(persisted[0].id), "red"),
            entry(Some(stale_id), "black"),
        ];
        let (upserts, removals) = reconcile_variants(product_id, &persisted, &submitted);

        assert_eq!(upserts.len(), 2);
        assert_ne!(upserts[1].id, stale_id);
        assert!(removals.is_empty());
    }

    #[test]
    fn matching_is_order_independent() {
        let product_id = ProductId::new();
        let a = variant(product_id, "a");
        let b = variant(product_id, "b");
        let persisted = vec![a.clone(), b.clone()];

        let submitted = vec![entry(Some(b.id), "b2"), entry(Some(a.id), "a2")];
        let (upserts, removals) = reconcile_variants(product_id, &persisted, &submitted);

        assert!(removals.is_empty());
        assert_eq!(upserts[0].id, b.id);
        assert_eq!(upserts[1].id, a.id);
    }

    #[test]
    fn image_positions_overwrite_in_place() {
        let product_id = ProductId::new();
        let persisted = vec![image(product_id, "a.png", 0), image(product_id, "b.png", 1)];

        let submitted = vec!["c.png".to_string(), "a.png".to_string()];
        let (upserts, removals) = reconcile_images(product_id, &persisted, &submitted);

        assert!(removals.is_empty());
        assert_eq!(upserts[0].id, persisted[0].id);
        assert_eq!(upserts[0].url, "c.png");
        assert!(upserts[0].is_primary);
        assert_eq!(upserts[1].id, persisted[1].id);
        assert_eq!(upserts[1].url, "a.png");
        assert!(!upserts[1].is_primary);
    }

    #[test]
    fn extra_persisted_images_are_removed() {
        let product_id = ProductId::new();
        let persisted = vec![
            image(product_id, "a.png", 0),
            image(product_id, "b.png", 1),
            image(product_id, "c.png", 2),
        ];

        let submitted = vec!["only.png".to_string()];
        let (upserts, removals) = reconcile_images(product_id, &persisted, &submitted);

        assert_eq!(upserts.len(), 1);
        assert!(upserts[0].is_primary);
        assert_eq!(removals, vec![persisted[1].id, persisted[2].id]);
    }

    #[test]
    fn submitted_growth_appends_new_rows() {
        let product_id = ProductId::new();
        let persisted = vec![image(product_id, "a.png", 0)];

        let submitted = vec!["a.png".to_string(), "b.png".to_string()];
        let (upserts, removals) = reconcile_images(product_id, &persisted, &submitted);

        assert!(removals.is_empty());
        assert_eq!(upserts.len(), 2);
        assert_eq!(upserts[1].position, 1);
        assert!(!upserts[1].is_primary);
    }

    #[test]
    fn build_commit_checks_version_first() {
        let product = sample_product();
        let aggregate = ProductAggregate {
            product: product.clone(),
            variants: Vec::new(),
            images: Vec::new(),
        };

        // Invalid payload AND stale token: the stale token must win.
        let request = UpdateProduct {
            name: String::new(),
            description: None,
            base_price: Decimal::new(-1, 0),
            category_id: product.category_id,
            version: VersionToken::fresh(),
            variants: Vec::new(),
            image_urls: Vec::new(),
        };
        let err = build_commit(&aggregate, &request, Utc::now()).unwrap_err();
        assert!(matches!(err, CatalogError::StaleVersion(_)));
    }

    #[test]
    fn build_commit_overwrites_scalars() {
        let product = sample_product();
        let aggregate = ProductAggregate {
            product: product.clone(),
            variants: Vec::new(),
            images: Vec::new(),
        };
        let new_category = CategoryId::new();

        let request = UpdateProduct {
            name: "Road Runner".to_string(),
            description: Some("lighter sole".to_string()),
            base_price: Decimal::new(10999, 2),
            category_id: new_category,
            version: product.version.clone(),
            variants: Vec::new(),
            image_urls: Vec::new(),
        };
        let now = Utc::now();
        let commit = build_commit(&aggregate, &request, now).unwrap();

        assert_eq!(commit.product.name, "Road Runner");
        assert_eq!(commit.product.category_id, new_category);
        assert_eq!(commit.product.updated_at, now);
        assert_eq!(commit.product.created_at, product.created_at);
        assert_eq!(commit.product.sku, product.sku);
    }
}
