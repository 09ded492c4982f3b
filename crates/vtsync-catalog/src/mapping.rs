//! Supplier row to [`ProductPayload`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use vtsync_core::{ImagePayload, ProductPayload, ProductStatus, VariantPayload};

use crate::error::CatalogError;
use crate::supplier::SupplierRow;
use crate::transform::{
    categorize, extra_images, handle_from, is_valid_gtin, normalize_brand, parse_amount,
    price_with_vat, repair_ean, repair_encoding, stock_quantity, translate,
};

const SPECIFICATIONS_HEADING: &str = "<h3>Especificações</h3>";

/// Supplier status values that keep a product out of the storefront.
const INACTIVE_STATUSES: &[&str] = &["discontinued", "descatalogado", "inactive", "inactivo"];

#[derive(Debug, Clone, Copy, Default)]
pub struct MappingOptions {
    /// Fail rows whose brand is not on the approved list.
    pub approved_brands_only: bool,
}

/// A row that could not be mapped.
#[derive(Debug)]
pub struct RowError {
    pub line: u64,
    pub sku: String,
    pub error: CatalogError,
}

/// Outcome of mapping a whole supplier file.
#[derive(Debug, Default)]
pub struct TransformReport {
    pub products: Vec<ProductPayload>,
    /// Rows with a SKU that were attempted.
    pub processed: usize,
    /// Rows without a SKU.
    pub skipped: usize,
    pub errors: Vec<RowError>,
}

/// Map every row, collecting per-row failures instead of aborting.
#[must_use]
pub fn transform_rows(rows: &[SupplierRow], options: &MappingOptions) -> TransformReport {
    let mut report = TransformReport::default();

    for row in rows {
        if row.name.trim().is_empty() {
            report.skipped += 1;
            tracing::debug!(line = row.line, "skipping row without SKU");
            continue;
        }
        report.processed += 1;

        match map_row(row, options) {
            Ok(product) => report.products.push(product),
            Err(e) => {
                tracing::warn!(line = row.line, sku = %row.name, error = %e, "row rejected");
                report.errors.push(RowError {
                    line: row.line,
                    sku: row.name.clone(),
                    error: e,
                });
            }
        }
    }

    tracing::info!(
        processed = report.processed,
        mapped = report.products.len(),
        skipped = report.skipped,
        failed = report.errors.len(),
        "supplier rows mapped"
    );
    report
}

/// Map one supplier row.
///
/// # Errors
///
/// - [`CatalogError::EmptySku`] when `name` is blank
/// - [`CatalogError::InvalidAmount`] when a price, cost or weight is not a number
/// - [`CatalogError::MissingPrice`] when neither price column is set
/// - [`CatalogError::UnapprovedBrand`] when `approved_brands_only` is set and
///   the brand is unknown
pub fn map_row(
    row: &SupplierRow,
    options: &MappingOptions,
) -> Result<ProductPayload, CatalogError> {
    let sku = row.name.trim();
    if sku.is_empty() {
        return Err(CatalogError::EmptySku);
    }

    let brand = normalize_brand(&repair_encoding(&row.brand));
    if options.approved_brands_only && !brand.approved {
        return Err(CatalogError::UnapprovedBrand { brand: brand.name });
    }

    let title = text_field(&row.short_description);
    let title = if title.is_empty() { sku.to_owned() } else { title };

    let variant = build_variant(row, sku)?;
    let images = build_images(row, &title);

    let category = text_field(&row.category);
    let category_parent = text_field(&row.category_parent);
    let tags = dedup_tags([brand.name.clone(), category, category_parent]);

    let status = if INACTIVE_STATUSES.contains(&row.status.trim().to_lowercase().as_str()) {
        ProductStatus::Draft
    } else {
        ProductStatus::Active
    };

    Ok(ProductPayload {
        handle: handle_from(sku),
        title,
        body_html: body_html(row),
        vendor: brand.name,
        product_type: categorize(&row.category_parent, &row.category).to_owned(),
        tags,
        status,
        published: status == ProductStatus::Active,
        variants: vec![variant],
        images,
    })
}

fn text_field(raw: &str) -> String {
    translate(&repair_encoding(raw.trim()))
}

fn body_html(row: &SupplierRow) -> String {
    let description = text_field(&row.description);
    let specifications = text_field(&row.specifications);
    if specifications.is_empty() {
        return description;
    }
    format!("{description}{SPECIFICATIONS_HEADING}{specifications}")
}

fn amount(raw: &str, column: &'static str) -> Result<Option<Decimal>, CatalogError> {
    parse_amount(raw).map_err(|value| CatalogError::InvalidAmount { column, value })
}

fn overflow(raw: &str, column: &'static str) -> CatalogError {
    CatalogError::InvalidAmount {
        column,
        value: raw.trim().to_owned(),
    }
}

fn gross_amount(raw: &str, column: &'static str) -> Result<Option<Decimal>, CatalogError> {
    amount(raw, column)?
        .map(|net| price_with_vat(net).ok_or_else(|| overflow(raw, column)))
        .transpose()
}

fn build_variant(row: &SupplierRow, sku: &str) -> Result<VariantPayload, CatalogError> {
    let price = match gross_amount(&row.pvp, "PVP")? {
        Some(gross) => gross,
        None => amount(&row.precio_venta_cliente_final, "precio_venta_cliente_final")?
            .ok_or_else(|| CatalogError::MissingPrice {
                sku: sku.to_owned(),
            })?,
    };

    let compare_at_price = gross_amount(&row.msrp, "msrp")?.filter(|msrp| *msrp > price);

    let cost = amount(&row.precio_neto_compra, "precio_neto_compra")?;

    let barcode = repair_ean(&row.ean);
    if let Some(code) = barcode.as_deref() {
        if !is_valid_gtin(code) {
            tracing::warn!(sku, ean = code, "barcode fails GTIN check digit");
        }
    }

    let weight_grams = match amount(&row.weight, "weight")? {
        Some(kg) => {
            let grams = kg
                .checked_mul(dec!(1000))
                .ok_or_else(|| overflow(&row.weight, "weight"))?;
            grams
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u32()
        }
        None => None,
    };

    Ok(VariantPayload {
        sku: sku.to_owned(),
        price,
        compare_at_price,
        cost,
        barcode,
        inventory_quantity: stock_quantity(&row.stock),
        weight_grams,
        requires_shipping: true,
        taxable: true,
    })
}

fn build_images(row: &SupplierRow, title: &str) -> Vec<ImagePayload> {
    let main = row.image_path.trim();
    let main = (!main.is_empty()).then_some(main);

    main.map(str::to_owned)
        .into_iter()
        .chain(extra_images(&row.extra_images_paths, main))
        .zip(1u32..)
        .map(|(src, position)| ImagePayload {
            src,
            alt: Some(title.to_owned()),
            position,
        })
        .collect()
}

fn dedup_tags(candidates: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in candidates {
        let tag = tag.trim();
        if tag.is_empty() || tags.iter().any(|t| t.to_lowercase() == tag.to_lowercase()) {
            continue;
        }
        tags.push(tag.to_owned());
    }
    tags
}

#[cfg(test)]
#[path = "mapping_test.rs"]
mod tests;
