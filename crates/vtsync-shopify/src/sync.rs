//! Create-or-update of transformed products against the store.
//!
//! GraphQL creates run in three calls: a product skeleton, then the variant
//! (price, SKU, barcode, cost, weight) plus its stock, then the images. Once
//! the skeleton exists, a later failure leaves the product in the store and is
//! reported as [`SyncOutcome::Partial`] with the step that failed.

use std::fmt;

use vtsync_core::{ProductPayload, SyncApi};

use crate::client::AdminClient;
use crate::error::ShopifyError;
use crate::index::SkuIndex;
use crate::types::SkuEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Variant,
    Inventory,
    Media,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStep::Variant => "variant",
            SyncStep::Inventory => "inventory",
            SyncStep::Media => "media",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Create,
    Update,
}

#[derive(Debug)]
pub enum SyncOutcome {
    Created {
        product_id: String,
    },
    Updated {
        product_id: String,
    },
    Partial {
        product_id: String,
        failed_step: SyncStep,
        error: ShopifyError,
    },
    /// No SKU and no handle to match on.
    Skipped,
    /// Dry run: what would have happened.
    Planned(SyncAction),
}

/// Counts per outcome. In a dry run, `created` and `updated` hold the
/// planned actions; a SKU missing from the index whose handle already exists
/// is planned as an update.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub partial: usize,
    pub failed: usize,
    pub skipped: usize,
    pub dry_run: bool,
}

impl SyncReport {
    fn record(&mut self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Created { .. } | SyncOutcome::Planned(SyncAction::Create) => {
                self.created += 1;
            }
            SyncOutcome::Updated { .. } | SyncOutcome::Planned(SyncAction::Update) => {
                self.updated += 1;
            }
            SyncOutcome::Partial { .. } => self.partial += 1,
            SyncOutcome::Skipped => self.skipped += 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    pub api: SyncApi,
    pub dry_run: bool,
}

pub struct Syncer {
    client: AdminClient,
    options: SyncOptions,
}

impl Syncer {
    #[must_use]
    pub fn new(client: AdminClient, options: SyncOptions) -> Self {
        Self { client, options }
    }

    /// Pushes every product, one at a time.
    ///
    /// Per-product failures are logged and counted; the batch continues.
    ///
    /// # Errors
    ///
    /// Returns an error only when the SKU index cannot be built (GraphQL
    /// mode), since nothing can be matched without it.
    pub async fn sync(&self, products: &[ProductPayload]) -> Result<SyncReport, ShopifyError> {
        let mut report = SyncReport {
            dry_run: self.options.dry_run,
            ..SyncReport::default()
        };

        let mut index = match self.options.api {
            SyncApi::GraphQl => self.client.fetch_sku_index().await?,
            SyncApi::Rest => SkuIndex::default(),
        };

        for product in products {
            let key = product.primary_sku().unwrap_or(&product.handle);
            let result = match self.options.api {
                SyncApi::GraphQl => self.sync_graphql(product, &mut index).await,
                SyncApi::Rest => self.sync_rest(product).await,
            };

            match result {
                Ok(outcome) => {
                    log_outcome(key, &outcome);
                    report.record(&outcome);
                }
                Err(e) => {
                    tracing::error!(
                        key,
                        handle = %product.handle,
                        error = %e,
                        "product sync failed"
                    );
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            created = report.created,
            updated = report.updated,
            partial = report.partial,
            failed = report.failed,
            skipped = report.skipped,
            dry_run = report.dry_run,
            "sync finished"
        );
        Ok(report)
    }

    async fn sync_graphql(
        &self,
        product: &ProductPayload,
        index: &mut SkuIndex,
    ) -> Result<SyncOutcome, ShopifyError> {
        let sku = product.primary_sku();
        if sku.is_none() && product.handle.is_empty() {
            return Ok(SyncOutcome::Skipped);
        }

        let existing = match sku {
            Some(sku) => index.get(sku).cloned(),
            None => self.client.find_product_by_handle(&product.handle).await?,
        };

        if self.options.dry_run {
            // A live create on a taken handle turns into an update.
            let existing = match (existing, sku) {
                (None, Some(_)) => self.client.find_product_by_handle(&product.handle).await?,
                (existing, _) => existing,
            };
            return Ok(SyncOutcome::Planned(if existing.is_some() {
                SyncAction::Update
            } else {
                SyncAction::Create
            }));
        }

        if let Some(entry) = existing {
            return self.update_existing(&entry, product).await;
        }

        let entry = match self.client.create_product_skeleton(product).await {
            Ok(entry) => entry,
            Err(e) if e.is_handle_taken() => {
                tracing::warn!(
                    handle = %product.handle,
                    "handle already taken; updating existing product"
                );
                let entry = self
                    .client
                    .find_product_by_handle(&product.handle)
                    .await?
                    .ok_or(e)?;
                if let Some(sku) = sku {
                    index.insert(sku, entry.clone());
                }
                return self.update_existing(&entry, product).await;
            }
            Err(e) => return Err(e),
        };
        if let Some(sku) = sku {
            index.insert(sku, entry.clone());
        }

        let product_id = entry.product_id.clone();
        if let Err((failed_step, error)) = self.variant_and_stock(&entry, product).await {
            return Ok(SyncOutcome::Partial {
                product_id,
                failed_step,
                error,
            });
        }
        if let Err(error) = self.client.attach_media(&entry.product_id, &product.images).await {
            return Ok(SyncOutcome::Partial {
                product_id,
                failed_step: SyncStep::Media,
                error,
            });
        }
        Ok(SyncOutcome::Created { product_id })
    }

    /// Details, then variant and stock. Images already on the product are
    /// left alone.
    async fn update_existing(
        &self,
        entry: &SkuEntry,
        product: &ProductPayload,
    ) -> Result<SyncOutcome, ShopifyError> {
        self.client
            .update_product_details(&entry.product_id, product)
            .await?;
        let product_id = entry.product_id.clone();
        if let Err((failed_step, error)) = self.variant_and_stock(entry, product).await {
            return Ok(SyncOutcome::Partial {
                product_id,
                failed_step,
                error,
            });
        }
        Ok(SyncOutcome::Updated { product_id })
    }

    async fn variant_and_stock(
        &self,
        entry: &SkuEntry,
        product: &ProductPayload,
    ) -> Result<(), (SyncStep, ShopifyError)> {
        let Some(variant) = product.variants.first() else {
            return Ok(());
        };
        self.client
            .update_variant(&entry.product_id, &entry.variant_id, variant)
            .await
            .map_err(|e| (SyncStep::Variant, e))?;

        match (self.client.location_id(), entry.inventory_item_id.as_deref()) {
            (Some(location), Some(item)) => self
                .client
                .set_available_quantity(item, location, variant.inventory_quantity)
                .await
                .map_err(|e| (SyncStep::Inventory, e)),
            (Some(_), None) => {
                tracing::warn!(sku = %variant.sku, "variant has no inventory item; stock not set");
                Ok(())
            }
            (None, _) => Ok(()),
        }
    }

    async fn sync_rest(&self, product: &ProductPayload) -> Result<SyncOutcome, ShopifyError> {
        if product.handle.is_empty() {
            return Ok(SyncOutcome::Skipped);
        }
        let existing = self.client.rest_find_by_handle(&product.handle).await?;

        if self.options.dry_run {
            return Ok(SyncOutcome::Planned(if existing.is_some() {
                SyncAction::Update
            } else {
                SyncAction::Create
            }));
        }

        let (saved, created) = match &existing {
            Some(current) => (self.client.rest_update_product(current, product).await?, false),
            None => (self.client.rest_create_product(product).await?, true),
        };
        let product_id = saved.id.to_string();

        let quantity = product.variants.first().map(|v| v.inventory_quantity);
        let item = saved.variants.first().and_then(|v| v.inventory_item_id);
        if let (Some(location), Some(item), Some(quantity)) =
            (self.client.location_numeric_id(), item, quantity)
        {
            if let Err(error) = self
                .client
                .rest_set_inventory_level(item, location, quantity)
                .await
            {
                return Ok(SyncOutcome::Partial {
                    product_id,
                    failed_step: SyncStep::Inventory,
                    error,
                });
            }
        }

        Ok(if created {
            SyncOutcome::Created { product_id }
        } else {
            SyncOutcome::Updated { product_id }
        })
    }
}

fn log_outcome(key: &str, outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Created { product_id } => {
            tracing::info!(key, product_id = %product_id, "created");
        }
        SyncOutcome::Updated { product_id } => {
            tracing::info!(key, product_id = %product_id, "updated");
        }
        SyncOutcome::Partial {
            product_id,
            failed_step,
            error,
        } => tracing::warn!(
            key,
            product_id = %product_id,
            failed_step = %failed_step,
            error = %error,
            "product saved but a follow-up step failed"
        ),
        SyncOutcome::Skipped => tracing::warn!(key, "no SKU or handle; skipped"),
        SyncOutcome::Planned(action) => tracing::info!(key, action = ?action, "dry run"),
    }
}
