//! `vtsync sync` and `vtsync upload`.

use std::path::Path;

use anyhow::Context;
use vtsync_catalog::read_products_file;
use vtsync_core::{AppConfig, ProductPayload, ShopifyConfig, SyncApi};
use vtsync_shopify::{AdminClient, SyncOptions, SyncReport, Syncer};

use crate::transform::run_transform;

pub(crate) async fn run_sync(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    dry_run: bool,
    api: Option<SyncApi>,
) -> anyhow::Result<SyncReport> {
    let shopify = ShopifyConfig::from_app_config(config).context("Shopify is not configured")?;
    let transformed = run_transform(config, input, output)?;
    push(&shopify, &transformed.products, dry_run, api).await
}

pub(crate) async fn run_upload(
    config: &AppConfig,
    csv: &Path,
    dry_run: bool,
    api: Option<SyncApi>,
) -> anyhow::Result<SyncReport> {
    let shopify = ShopifyConfig::from_app_config(config).context("Shopify is not configured")?;
    let products = read_products_file(csv)
        .with_context(|| format!("failed to read Shopify CSV {}", csv.display()))?;
    push(&shopify, &products, dry_run, api).await
}

async fn push(
    shopify: &ShopifyConfig,
    products: &[ProductPayload],
    dry_run: bool,
    api: Option<SyncApi>,
) -> anyhow::Result<SyncReport> {
    let api = api.unwrap_or(shopify.sync_api);
    tracing::info!(
        store = %shopify.store_url,
        api = %api,
        dry_run,
        products = products.len(),
        "starting Shopify sync"
    );

    let client = AdminClient::new(shopify).context("failed to build Shopify client")?;
    let report = Syncer::new(client, SyncOptions { api, dry_run })
        .sync(products)
        .await
        .context("Shopify sync aborted")?;

    let prefix = if dry_run { "dry-run: would have " } else { "" };
    println!(
        "{prefix}created {}, updated {}; {} partial, {} failed, {} skipped",
        report.created, report.updated, report.partial, report.failed, report.skipped
    );
    Ok(report)
}
