//! `vtsync transform`: supplier CSV in, Shopify import CSV out.

use std::path::Path;

use anyhow::Context;
use vtsync_catalog::{
    read_supplier_csv, transform_rows, write_products_file, MappingOptions, TransformReport,
};
use vtsync_core::AppConfig;

/// Reads, maps and writes. Rows that fail to map are logged and left out of
/// the output; only an unreadable input or unwritable output is an error.
pub(crate) fn run_transform(
    config: &AppConfig,
    input: &Path,
    output: &Path,
) -> anyhow::Result<TransformReport> {
    let file = read_supplier_csv(input)
        .with_context(|| format!("failed to read supplier file {}", input.display()))?;

    let options = MappingOptions {
        approved_brands_only: config.approved_brands_only,
    };
    let report = transform_rows(&file.rows, &options);

    write_products_file(output, &report.products)
        .with_context(|| format!("failed to write Shopify CSV {}", output.display()))?;

    println!(
        "transformed {} products ({} rejected, {} without SKU) -> {}",
        report.products.len(),
        report.errors.len(),
        report.skipped,
        output.display()
    );
    Ok(report)
}
