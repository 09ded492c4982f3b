//! SKU → store id index, rebuilt from a full variant listing on every run.

use std::collections::HashMap;

use serde_json::json;

use crate::client::AdminClient;
use crate::error::ShopifyError;
use crate::graphql::SKU_INDEX_QUERY;
use crate::types::{ProductVariantsData, SkuEntry};

/// Variants requested per page (the Admin API maximum).
pub(crate) const VARIANT_PAGE_SIZE: u32 = 250;

/// Guard against cursors that never terminate: 400 × 250 = 100k variants.
pub(crate) const MAX_PAGES: usize = 400;

#[derive(Debug, Default, Clone)]
pub struct SkuIndex {
    entries: HashMap<String, SkuEntry>,
}

impl SkuIndex {
    #[must_use]
    pub fn get(&self, sku: &str) -> Option<&SkuEntry> {
        self.entries.get(sku)
    }

    /// Records `entry` under `sku` unless the SKU is already present.
    /// Returns `false` for a duplicate.
    pub fn insert(&mut self, sku: &str, entry: SkuEntry) -> bool {
        if self.entries.contains_key(sku) {
            return false;
        }
        self.entries.insert(sku.to_owned(), entry);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AdminClient {
    /// Lists every product variant in the store and indexes it by SKU.
    ///
    /// Variants with a blank SKU are ignored. When a SKU appears on more than
    /// one variant the first one listed wins and the rest are logged.
    ///
    /// # Errors
    ///
    /// Propagates any request error, and returns
    /// [`ShopifyError::PaginationLimit`] after [`MAX_PAGES`] pages.
    pub async fn fetch_sku_index(&self) -> Result<SkuIndex, ShopifyError> {
        let mut index = SkuIndex::default();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(ShopifyError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            let page: ProductVariantsData = self
                .graphql(
                    "productVariants",
                    SKU_INDEX_QUERY,
                    json!({ "first": VARIANT_PAGE_SIZE, "after": cursor }),
                )
                .await?;
            let connection = page.product_variants;

            for variant in connection.nodes {
                let Some(sku) = variant.sku.as_deref().map(str::trim).filter(|s| !s.is_empty())
                else {
                    continue;
                };
                let entry = SkuEntry {
                    product_id: variant.product.id,
                    variant_id: variant.id,
                    inventory_item_id: variant.inventory_item.map(|i| i.id),
                    handle: variant.product.handle,
                };
                let product_id = entry.product_id.clone();
                if !index.insert(sku, entry) {
                    tracing::warn!(
                        sku,
                        product_id = %product_id,
                        "duplicate SKU in store; keeping first"
                    );
                }
            }

            match connection.page_info {
                Some(info) if info.has_next_page => {
                    cursor = Some(info.end_cursor.ok_or(ShopifyError::MissingField {
                        operation: "productVariants",
                        field: "pageInfo.endCursor",
                    })?);
                }
                _ => break,
            }
        }

        tracing::info!(skus = index.len(), pages = page_count, "built SKU index");
        Ok(index)
    }
}
