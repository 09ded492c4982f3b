//! REST product operations, keyed by handle.

use reqwest::Method;
use serde_json::{json, Value};
use vtsync_core::ProductPayload;

use crate::client::AdminClient;
use crate::error::ShopifyError;
use crate::types::{RestProduct, RestProductResponse, RestProductsResponse};

/// REST body for `POST products.json` / `PUT products/{id}.json`.
///
/// `existing_variant_id` targets the variant to overwrite on update. Images
/// are only sent on create.
pub(crate) fn rest_product_body(
    product: &ProductPayload,
    existing: Option<(u64, Option<u64>)>,
) -> Value {
    let variants: Vec<Value> = product
        .variants
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let mut variant = json!({
                "sku": v.sku,
                "price": v.price.to_string(),
                "compare_at_price": v.compare_at_price.map(|p| p.to_string()),
                "barcode": v.barcode,
                "inventory_management": "shopify",
                "inventory_policy": "deny",
                "requires_shipping": v.requires_shipping,
                "taxable": v.taxable,
            });
            if let Some(grams) = v.weight_grams {
                variant["weight"] = json!(grams);
                variant["weight_unit"] = json!("g");
            }
            if i == 0 {
                if let Some(id) = existing.and_then(|(_, variant_id)| variant_id) {
                    variant["id"] = json!(id);
                }
            }
            variant
        })
        .collect();

    let mut body = json!({
        "handle": product.handle,
        "title": product.title,
        "body_html": product.body_html,
        "vendor": product.vendor,
        "product_type": product.product_type,
        "tags": product.tags_csv(),
        "status": product.status.to_string(),
        "variants": variants,
    });

    match existing {
        Some((id, _)) => body["id"] = json!(id),
        None => {
            body["images"] = product
                .images
                .iter()
                .map(|img| json!({ "src": img.src, "alt": img.alt, "position": img.position }))
                .collect();
        }
    }

    json!({ "product": body })
}

impl AdminClient {
    /// `GET products.json?handle=…`
    ///
    /// # Errors
    ///
    /// Returns any request or deserialization error.
    pub async fn rest_find_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<RestProduct>, ShopifyError> {
        let response: RestProductsResponse = self
            .rest(
                Method::GET,
                "products.json",
                &[("handle", handle), ("fields", "id,handle,variants")],
                None,
            )
            .await?;
        Ok(response.products.into_iter().find(|p| p.handle == handle))
    }

    /// `POST products.json` with variants and images.
    ///
    /// # Errors
    ///
    /// Returns any request or deserialization error; validation failures
    /// surface as [`ShopifyError::UnexpectedStatus`] with status 422.
    pub async fn rest_create_product(
        &self,
        product: &ProductPayload,
    ) -> Result<RestProduct, ShopifyError> {
        let body = rest_product_body(product, None);
        let response: RestProductResponse = self
            .rest(Method::POST, "products.json", &[], Some(&body))
            .await?;
        Ok(response.product)
    }

    /// `PUT products/{id}.json`, overwriting the first variant in place.
    ///
    /// # Errors
    ///
    /// Same as [`AdminClient::rest_create_product`].
    pub async fn rest_update_product(
        &self,
        existing: &RestProduct,
        product: &ProductPayload,
    ) -> Result<RestProduct, ShopifyError> {
        let variant_id = existing.variants.first().map(|v| v.id);
        let body = rest_product_body(product, Some((existing.id, variant_id)));
        let path = format!("products/{}.json", existing.id);
        let response: RestProductResponse = self.rest(Method::PUT, &path, &[], Some(&body)).await?;
        Ok(response.product)
    }

    /// `POST inventory_levels/set.json`
    ///
    /// # Errors
    ///
    /// Returns any request error.
    pub async fn rest_set_inventory_level(
        &self,
        inventory_item_id: u64,
        location_id: &str,
        available: i64,
    ) -> Result<(), ShopifyError> {
        let body = json!({
            "location_id": location_id
                .parse::<u64>()
                .map_or_else(|_| json!(location_id), |id| json!(id)),
            "inventory_item_id": inventory_item_id,
            "available": available,
        });
        let _: Value = self
            .rest(Method::POST, "inventory_levels/set.json", &[], Some(&body))
            .await?;
        Ok(())
    }
}
