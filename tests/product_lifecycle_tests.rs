use rust_decimal::Decimal;
use stockroom::{
    Catalog, CatalogError, CatalogStore, Category, CreateProduct, EntityStatus, VariantEntry,
};

async fn seeded_catalog() -> (Catalog, Category) {
    let catalog = Catalog::new();
    let category = catalog.add_category("Kitchen").await.expect("category");
    (catalog, category)
}

fn draft(sku: &str, category: &Category) -> CreateProduct {
    CreateProduct {
        name: format!("Product {sku}"),
        description: None,
        sku: sku.to_string(),
        base_price: Decimal::new(1500, 2),
        category_id: category.id,
        variants: Vec::new(),
        image_urls: Vec::new(),
    }
}

#[tokio::test]
async fn create_assigns_ids_timestamps_and_primary_image() {
    let (catalog, category) = seeded_catalog().await;

    let mut create = draft("KET-001", &category);
    create.variants = vec![VariantEntry {
        id: None,
        color: Some("steel".to_string()),
        size: Some("1.5l".to_string()),
        additional_price: Decimal::new(500, 2),
        stock_quantity: 12,
    }];
    create.image_urls = vec!["kettle.png".to_string(), "kettle-side.png".to_string()];

    let view = catalog.products().create(create).await.expect("create");
    assert_eq!(view.variants.len(), 1);
    assert_eq!(view.image_urls[0], "kettle.png");
    assert_eq!(view.created_at, view.updated_at);
    assert_eq!(view.category_name.as_deref(), Some("Kitchen"));

    let aggregate = catalog
        .store()
        .fetch_product(view.id)
        .await
        .expect("fetch")
        .expect("aggregate");
    assert!(aggregate.images[0].is_primary);
    assert!(!aggregate.images[1].is_primary);
}

#[tokio::test]
async fn duplicate_sku_conflicts_on_create() {
    let (catalog, category) = seeded_catalog().await;
    catalog
        .products()
        .create(draft("DUP-001", &category))
        .await
        .expect("first create");

    let err = catalog
        .products()
        .create(draft("DUP-001", &category))
        .await
        .expect_err("second create");
    assert!(matches!(err, CatalogError::DuplicateSku(_)));
    assert!(err.is_conflict());
}

#[tokio::test]
async fn soft_deleted_sku_is_free_for_reuse() {
    let (catalog, category) = seeded_catalog().await;
    let first = catalog
        .products()
        .create(draft("REUSE-001", &category))
        .await
        .expect("create");
    catalog.products().delete(first.id).await.expect("delete");

    // The SKU of an inactive product does not block reuse.
    catalog
        .products()
        .create(draft("REUSE-001", &category))
        .await
        .expect("recreate after soft delete");
}

#[tokio::test]
async fn soft_delete_hides_product_but_keeps_children() {
    let (catalog, category) = seeded_catalog().await;
    let mut create = draft("HID-001", &category);
    create.variants = vec![VariantEntry {
        id: None,
        color: None,
        size: Some("M".to_string()),
        additional_price: Decimal::ZERO,
        stock_quantity: 2,
    }];
    create.image_urls = vec!["front.png".to_string()];
    let view = catalog.products().create(create).await.expect("create");

    catalog.products().delete(view.id).await.expect("delete");

    assert!(catalog.products().get(view.id).await.expect("get").is_none());

    // The rows are still there underneath, just inactive.
    let aggregate = catalog
        .store()
        .fetch_product(view.id)
        .await
        .expect("fetch")
        .expect("aggregate");
    assert_eq!(aggregate.product.status, EntityStatus::Deleted);
    assert!(aggregate.product.updated_at > aggregate.product.created_at);
    assert_eq!(aggregate.variants.len(), 1);
    assert_eq!(aggregate.images.len(), 1);
    assert_ne!(aggregate.product.version, view.version, "delete rotates the token");
}

#[tokio::test]
async fn delete_twice_is_not_found() {
    let (catalog, category) = seeded_catalog().await;
    let view = catalog
        .products()
        .create(draft("TWICE-001", &category))
        .await
        .expect("create");

    catalog.products().delete(view.id).await.expect("first delete");
    let err = catalog
        .products()
        .delete(view.id)
        .await
        .expect_err("second delete");
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn create_validates_payload_shape() {
    let (catalog, category) = seeded_catalog().await;

    let mut nameless = draft("VAL-001", &category);
    nameless.name = "   ".to_string();
    let err = catalog
        .products()
        .create(nameless)
        .await
        .expect_err("blank name");
    assert!(matches!(err, CatalogError::Validation(_)));

    let mut negative = draft("VAL-002", &category);
    negative.base_price = Decimal::new(-100, 2);
    let err = catalog
        .products()
        .create(negative)
        .await
        .expect_err("negative price");
    assert!(matches!(err, CatalogError::Validation(_)));

    let mut blank_sku = draft("", &category);
    blank_sku.name = "Named".to_string();
    let err = catalog
        .products()
        .create(blank_sku)
        .await
        .expect_err("blank sku");
    assert!(matches!(err, CatalogError::Validation(_)));
}

#[tokio::test]
async fn retired_category_still_resolves_for_existing_products() {
    let (catalog, category) = seeded_catalog().await;
    let view = catalog
        .products()
        .create(draft("HIST-001", &category))
        .await
        .expect("create");

    catalog.retire_category(category.id).await.expect("retire");

    // The historical reference keeps resolving in views.
    let fetched = catalog
        .products()
        .get(view.id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(fetched.category_name.as_deref(), Some("Kitchen"));
}
