//! Shopify product import CSV.
//!
//! One product spans several lines: the first carries the product, its first
//! variant and first image; following lines repeat only the handle plus the
//! next variant and/or image.

use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;
use vtsync_core::{ImagePayload, ProductPayload, ProductStatus, VariantPayload};

use crate::error::CatalogError;
use crate::transform::parse_amount;

pub const SHOPIFY_CSV_HEADERS: [&str; 49] = [
    "Handle",
    "Title",
    "Body (HTML)",
    "Vendor",
    "Product Category",
    "Type",
    "Tags",
    "Published",
    "Option1 Name",
    "Option1 Value",
    "Option2 Name",
    "Option2 Value",
    "Option3 Name",
    "Option3 Value",
    "Variant SKU",
    "Variant Grams",
    "Variant Inventory Tracker",
    "Variant Inventory Qty",
    "Variant Inventory Policy",
    "Variant Fulfillment Service",
    "Variant Price",
    "Variant Compare At Price",
    "Variant Requires Shipping",
    "Variant Taxable",
    "Variant Barcode",
    "Image Src",
    "Image Position",
    "Image Alt Text",
    "Gift Card",
    "SEO Title",
    "SEO Description",
    "Google Shopping / Google Product Category",
    "Google Shopping / Gender",
    "Google Shopping / Age Group",
    "Google Shopping / MPN",
    "Google Shopping / AdWords Grouping",
    "Google Shopping / AdWords Labels",
    "Google Shopping / Condition",
    "Google Shopping / Custom Product",
    "Google Shopping / Custom Label 0",
    "Google Shopping / Custom Label 1",
    "Google Shopping / Custom Label 2",
    "Google Shopping / Custom Label 3",
    "Google Shopping / Custom Label 4",
    "Variant Image",
    "Variant Weight Unit",
    "Variant Tax Code",
    "Cost per item",
    "Status",
];

// Column positions in SHOPIFY_CSV_HEADERS.
const HANDLE: usize = 0;
const TITLE: usize = 1;
const BODY: usize = 2;
const VENDOR: usize = 3;
const TYPE: usize = 5;
const TAGS: usize = 6;
const PUBLISHED: usize = 7;
const OPTION1_NAME: usize = 8;
const OPTION1_VALUE: usize = 9;
const SKU: usize = 14;
const GRAMS: usize = 15;
const INVENTORY_TRACKER: usize = 16;
const INVENTORY_QTY: usize = 17;
const INVENTORY_POLICY: usize = 18;
const FULFILLMENT: usize = 19;
const PRICE: usize = 20;
const COMPARE_AT: usize = 21;
const REQUIRES_SHIPPING: usize = 22;
const TAXABLE: usize = 23;
const BARCODE: usize = 24;
const IMAGE_SRC: usize = 25;
const IMAGE_POSITION: usize = 26;
const IMAGE_ALT: usize = 27;
const GIFT_CARD: usize = 28;
const SEO_TITLE: usize = 29;
const MPN: usize = 34;
const CONDITION: usize = 37;
const WEIGHT_UNIT: usize = 45;
const COST: usize = 47;
const STATUS: usize = 48;

fn bool_cell(value: bool) -> String {
    if value { "TRUE" } else { "FALSE" }.to_owned()
}

fn product_lines(product: &ProductPayload) -> Vec<Vec<String>> {
    let line_count = product.variants.len().max(product.images.len()).max(1);
    let mut lines = Vec::with_capacity(line_count);

    for i in 0..line_count {
        let mut line = vec![String::new(); SHOPIFY_CSV_HEADERS.len()];
        line[HANDLE].clone_from(&product.handle);

        if i == 0 {
            line[TITLE].clone_from(&product.title);
            line[BODY].clone_from(&product.body_html);
            line[VENDOR].clone_from(&product.vendor);
            line[TYPE].clone_from(&product.product_type);
            line[TAGS] = product.tags_csv();
            line[PUBLISHED] = bool_cell(product.published);
            line[OPTION1_NAME] = "Title".to_owned();
            line[GIFT_CARD] = bool_cell(false);
            line[SEO_TITLE].clone_from(&product.title);
            line[CONDITION] = "new".to_owned();
            line[STATUS] = product.status.to_string();
        }

        if let Some(variant) = product.variants.get(i) {
            line[OPTION1_VALUE] = "Default Title".to_owned();
            line[SKU].clone_from(&variant.sku);
            line[MPN].clone_from(&variant.sku);
            line[GRAMS] = variant.weight_grams.map(|g| g.to_string()).unwrap_or_default();
            line[INVENTORY_TRACKER] = "shopify".to_owned();
            line[INVENTORY_QTY] = variant.inventory_quantity.to_string();
            line[INVENTORY_POLICY] = "deny".to_owned();
            line[FULFILLMENT] = "manual".to_owned();
            line[PRICE] = variant.price.to_string();
            line[COMPARE_AT] = variant.compare_at_price.map(|p| p.to_string()).unwrap_or_default();
            line[REQUIRES_SHIPPING] = bool_cell(variant.requires_shipping);
            line[TAXABLE] = bool_cell(variant.taxable);
            line[BARCODE] = variant.barcode.clone().unwrap_or_default();
            line[WEIGHT_UNIT] = "kg".to_owned();
            line[COST] = variant.cost.map(|c| c.to_string()).unwrap_or_default();
        }

        if let Some(image) = product.images.get(i) {
            line[IMAGE_SRC].clone_from(&image.src);
            line[IMAGE_POSITION] = image.position.to_string();
            line[IMAGE_ALT] = image.alt.clone().unwrap_or_default();
        }

        lines.push(line);
    }
    lines
}

/// Write products in Shopify's import layout, header included.
///
/// # Errors
///
/// Returns [`CatalogError::Csv`] when writing fails.
pub fn write_products<W: io::Write>(
    writer: W,
    products: &[ProductPayload],
) -> Result<(), CatalogError> {
    let mut out = WriterBuilder::new().from_writer(writer);
    out.write_record(SHOPIFY_CSV_HEADERS)?;
    for product in products {
        for line in product_lines(product) {
            out.write_record(&line)?;
        }
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the import CSV to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] when the file cannot be created and
/// [`CatalogError::Csv`] when writing fails.
pub fn write_products_file(path: &Path, products: &[ProductPayload]) -> Result<(), CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = std::fs::File::create(path).map_err(io_err)?;
    write_products(io::BufWriter::new(file), products)?;
    tracing::info!(path = %path.display(), products = products.len(), "wrote Shopify import CSV");
    Ok(())
}

/// Read products back from a Shopify import CSV.
///
/// Lines with the wrong number of columns are skipped with a warning. A
/// product whose variant line has an unusable price is dropped whole, with a
/// warning, and reading continues with the next handle.
///
/// # Errors
///
/// Returns [`CatalogError::Csv`] on unreadable input.
pub fn read_products<R: io::Read>(reader: R) -> Result<Vec<ProductPayload>, CatalogError> {
    let mut rows = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut products: Vec<ProductPayload> = Vec::new();
    let mut dropped_handle: Option<String> = None;
    for record in rows.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        if record.len() != SHOPIFY_CSV_HEADERS.len() {
            tracing::warn!(
                line,
                columns = record.len(),
                expected = SHOPIFY_CSV_HEADERS.len(),
                "skipping import line with wrong column count"
            );
            continue;
        }

        let cell = |i: usize| record.get(i).unwrap_or_default().trim();
        let handle = cell(HANDLE);
        if handle.is_empty() || dropped_handle.as_deref() == Some(handle) {
            continue;
        }
        dropped_handle = None;

        let continues_previous = products.last().is_some_and(|p| p.handle == handle);
        if !continues_previous {
            products.push(product_from_record(&record));
        }
        let Some(product) = products.last_mut() else {
            continue;
        };

        if !cell(SKU).is_empty() {
            match variant_from_record(&record) {
                Ok(variant) => product.variants.push(variant),
                Err(e) => {
                    tracing::warn!(
                        line,
                        handle,
                        error = %e,
                        "dropping product with invalid variant line"
                    );
                    products.pop();
                    dropped_handle = Some(handle.to_owned());
                    continue;
                }
            }
        }
        if !cell(IMAGE_SRC).is_empty() {
            let position = cell(IMAGE_POSITION)
                .parse()
                .unwrap_or_else(|_| u32::try_from(product.images.len() + 1).unwrap_or(u32::MAX));
            product.images.push(ImagePayload {
                src: cell(IMAGE_SRC).to_owned(),
                alt: Some(cell(IMAGE_ALT).to_owned()).filter(|a| !a.is_empty()),
                position,
            });
        }
    }
    Ok(products)
}

/// Read products from a Shopify import CSV on disk.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] when the file cannot be opened and any error
/// from [`read_products`].
pub fn read_products_file(path: &Path) -> Result<Vec<ProductPayload>, CatalogError> {
    let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let products = read_products(io::BufReader::new(file))?;
    tracing::info!(path = %path.display(), products = products.len(), "read Shopify import CSV");
    Ok(products)
}

fn parse_bool(raw: &str, default: bool) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => true,
        "false" | "no" | "0" => false,
        _ => default,
    }
}

fn product_from_record(record: &StringRecord) -> ProductPayload {
    let cell = |i: usize| record.get(i).unwrap_or_default().trim();
    let status = cell(STATUS);
    ProductPayload {
        handle: cell(HANDLE).to_owned(),
        title: cell(TITLE).to_owned(),
        body_html: cell(BODY).to_owned(),
        vendor: cell(VENDOR).to_owned(),
        product_type: cell(TYPE).to_owned(),
        tags: cell(TAGS)
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect(),
        status: if status.is_empty() {
            ProductStatus::Active
        } else {
            ProductStatus::parse_lenient(status)
        },
        published: parse_bool(cell(PUBLISHED), true),
        variants: Vec::new(),
        images: Vec::new(),
    }
}

fn decimal_cell(record: &StringRecord, i: usize) -> Result<Option<Decimal>, CatalogError> {
    parse_amount(record.get(i).unwrap_or_default()).map_err(|value| CatalogError::InvalidAmount {
        column: SHOPIFY_CSV_HEADERS[i],
        value,
    })
}

fn variant_from_record(record: &StringRecord) -> Result<VariantPayload, CatalogError> {
    let cell = |i: usize| record.get(i).unwrap_or_default().trim();
    let sku = cell(SKU).to_owned();
    let price = decimal_cell(record, PRICE)?.ok_or_else(|| CatalogError::MissingPrice {
        sku: sku.clone(),
    })?;

    Ok(VariantPayload {
        price,
        compare_at_price: decimal_cell(record, COMPARE_AT)?,
        cost: decimal_cell(record, COST)?,
        barcode: Some(cell(BARCODE).to_owned()).filter(|b| !b.is_empty()),
        inventory_quantity: cell(INVENTORY_QTY).parse().unwrap_or(0),
        weight_grams: cell(GRAMS).parse().ok(),
        requires_shipping: parse_bool(cell(REQUIRES_SHIPPING), true),
        taxable: parse_bool(cell(TAXABLE), true),
        sku,
    })
}
