use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::{CatalogError, CategoryId, Result, VariantId, VersionToken};

const MAX_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 500;
const MAX_SKU_LEN: usize = 100;

/// Payload for creating a product together with its initial variants and
/// images. The image at index 0 becomes the primary image.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub base_price: Decimal,
    pub category_id: CategoryId,
    #[serde(default)]
    pub variants: Vec<VariantEntry>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl CreateProduct {
    pub(crate) fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_description(self.description.as_deref())?;
        if self.sku.trim().is_empty() {
            return Err(CatalogError::Validation("sku must not be empty".into()));
        }
        if self.sku.chars().count() > MAX_SKU_LEN {
            return Err(CatalogError::Validation(format!(
                "sku exceeds {MAX_SKU_LEN} characters"
            )));
        }
        validate_price(self.base_price)
    }
}

/// Payload for the aggregate update protocol.
///
/// The SKU is not re-specified on update; it is re-validated against other
/// active products. `version` must echo the token the caller loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProduct {
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub category_id: CategoryId,
    pub version: VersionToken,
    #[serde(default)]
    pub variants: Vec<VariantEntry>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl UpdateProduct {
    pub(crate) fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_description(self.description.as_deref())?;
        validate_price(self.base_price)
    }
}

/// One submitted variant. An entry carrying the id of a persisted variant
/// updates that row in place; an entry without an id creates a new row.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantEntry {
    pub id: Option<VariantId>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub additional_price: Decimal,
    pub stock_quantity: u32,
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CatalogError::Validation("name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CatalogError::Validation(format!(
            "name exceeds {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<()> {
    if let Some(text) = description
        && text.chars().count() > MAX_DESCRIPTION_LEN
    {
        return Err(CatalogError::Validation(format!(
            "description exceeds {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> Result<()> {
    if price < Decimal::ZERO {
        return Err(CatalogError::Validation(
            "base_price must be non-negative".into(),
        ));
    }
    Ok(())
}
