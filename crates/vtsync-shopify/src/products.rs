//! GraphQL product operations: skeleton create, detail update, variant
//! update, inventory and media.

use serde_json::{json, Value};
use vtsync_core::{ImagePayload, ProductPayload, VariantPayload};

use crate::client::AdminClient;
use crate::error::ShopifyError;
use crate::graphql::{
    INVENTORY_SET_QUANTITIES_MUTATION, PRODUCT_BY_HANDLE_QUERY, PRODUCT_CREATE_MUTATION,
    PRODUCT_UPDATE_MUTATION, VARIANTS_BULK_UPDATE_MUTATION,
};
use crate::types::{
    InventorySetQuantitiesData, ProductByIdentifierData, ProductCreateData, ProductNode,
    ProductUpdateData, SkuEntry, UserError, VariantsBulkUpdateData,
};

fn ensure_no_user_errors(
    operation: &'static str,
    errors: Vec<UserError>,
) -> Result<(), ShopifyError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ShopifyError::UserErrors { operation, errors })
    }
}

fn entry_from_node(
    operation: &'static str,
    node: ProductNode,
    fallback_handle: &str,
) -> Result<SkuEntry, ShopifyError> {
    let variant = node.first_variant().ok_or(ShopifyError::MissingField {
        operation,
        field: "product.variants",
    })?;
    Ok(SkuEntry {
        variant_id: variant.id.clone(),
        inventory_item_id: variant.inventory_item.as_ref().map(|i| i.id.clone()),
        handle: node.handle.clone().unwrap_or_else(|| fallback_handle.to_owned()),
        product_id: node.id,
    })
}

/// Product-level fields shared by create and update.
fn product_fields(product: &ProductPayload) -> serde_json::Map<String, Value> {
    let mut fields = serde_json::Map::new();
    fields.insert("title".to_owned(), json!(product.title));
    fields.insert("descriptionHtml".to_owned(), json!(product.body_html));
    fields.insert("vendor".to_owned(), json!(product.vendor));
    fields.insert("productType".to_owned(), json!(product.product_type));
    fields.insert("tags".to_owned(), json!(product.tags));
    fields.insert("status".to_owned(), json!(product.status.as_graphql()));
    fields
}

pub(crate) fn variant_input(variant_id: &str, variant: &VariantPayload) -> Value {
    let mut inventory_item = json!({
        "sku": variant.sku,
        "tracked": true,
        "requiresShipping": variant.requires_shipping,
    });
    if let Some(cost) = variant.cost {
        inventory_item["cost"] = json!(cost.to_string());
    }
    if let Some(grams) = variant.weight_grams {
        inventory_item["measurement"] = json!({ "weight": { "value": grams, "unit": "GRAMS" } });
    }

    json!({
        "id": variant_id,
        "price": variant.price.to_string(),
        "compareAtPrice": variant.compare_at_price.map(|p| p.to_string()),
        "barcode": variant.barcode,
        "taxable": variant.taxable,
        "inventoryPolicy": "DENY",
        "inventoryItem": inventory_item,
    })
}

pub(crate) fn media_input(images: &[ImagePayload]) -> Value {
    let mut ordered: Vec<&ImagePayload> = images.iter().collect();
    ordered.sort_by_key(|i| i.position);
    Value::Array(
        ordered
            .into_iter()
            .map(|image| {
                json!({
                    "originalSource": image.src,
                    "alt": image.alt,
                    "mediaContentType": "IMAGE",
                })
            })
            .collect(),
    )
}

impl AdminClient {
    /// Step 1 of a create: the product with its default variant, no price,
    /// stock or media yet.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserErrors`] when Shopify rejects the input
    /// (see [`ShopifyError::is_handle_taken`]) and any request error.
    pub async fn create_product_skeleton(
        &self,
        product: &ProductPayload,
    ) -> Result<SkuEntry, ShopifyError> {
        let mut input = product_fields(product);
        input.insert("handle".to_owned(), json!(product.handle));

        let data: ProductCreateData = self
            .graphql(
                "productCreate",
                PRODUCT_CREATE_MUTATION,
                json!({ "product": Value::Object(input) }),
            )
            .await?;
        let payload = data.product_create;
        ensure_no_user_errors("productCreate", payload.user_errors)?;

        let node = payload.product.ok_or(ShopifyError::MissingField {
            operation: "productCreate",
            field: "product",
        })?;
        entry_from_node("productCreate", node, &product.handle)
    }

    /// Overwrites title, description, vendor, type, tags and status.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserErrors`] on rejection and any request error.
    pub async fn update_product_details(
        &self,
        product_id: &str,
        product: &ProductPayload,
    ) -> Result<(), ShopifyError> {
        let mut input = product_fields(product);
        input.insert("id".to_owned(), json!(product_id));

        let data: ProductUpdateData = self
            .graphql(
                "productUpdate",
                PRODUCT_UPDATE_MUTATION,
                json!({ "product": Value::Object(input), "media": Value::Null }),
            )
            .await?;
        ensure_no_user_errors("productUpdate", data.product_update.user_errors)
    }

    /// Sets price, compare-at price, barcode, SKU, cost and weight on one
    /// variant.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserErrors`] on rejection and any request error.
    pub async fn update_variant(
        &self,
        product_id: &str,
        variant_id: &str,
        variant: &VariantPayload,
    ) -> Result<(), ShopifyError> {
        let data: VariantsBulkUpdateData = self
            .graphql(
                "productVariantsBulkUpdate",
                VARIANTS_BULK_UPDATE_MUTATION,
                json!({
                    "productId": product_id,
                    "variants": [variant_input(variant_id, variant)],
                }),
            )
            .await?;
        ensure_no_user_errors(
            "productVariantsBulkUpdate",
            data.product_variants_bulk_update.user_errors,
        )
    }

    /// Sets the available quantity of an inventory item at `location_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserErrors`] on rejection and any request error.
    pub async fn set_available_quantity(
        &self,
        inventory_item_id: &str,
        location_id: &str,
        quantity: i64,
    ) -> Result<(), ShopifyError> {
        let data: InventorySetQuantitiesData = self
            .graphql(
                "inventorySetQuantities",
                INVENTORY_SET_QUANTITIES_MUTATION,
                json!({
                    "input": {
                        "name": "available",
                        "reason": "correction",
                        "ignoreCompareQuantity": true,
                        "quantities": [{
                            "inventoryItemId": inventory_item_id,
                            "locationId": location_id,
                            "quantity": quantity,
                        }],
                    }
                }),
            )
            .await?;
        ensure_no_user_errors(
            "inventorySetQuantities",
            data.inventory_set_quantities.user_errors,
        )
    }

    /// Attaches images to a product as media, in position order. No-op for
    /// an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::UserErrors`] on rejection and any request error.
    pub async fn attach_media(
        &self,
        product_id: &str,
        images: &[ImagePayload],
    ) -> Result<(), ShopifyError> {
        if images.is_empty() {
            return Ok(());
        }
        let data: ProductUpdateData = self
            .graphql(
                "productUpdate",
                PRODUCT_UPDATE_MUTATION,
                json!({ "product": { "id": product_id }, "media": media_input(images) }),
            )
            .await?;
        ensure_no_user_errors("productUpdate", data.product_update.user_errors)
    }

    /// Looks a product up by handle, returning the ids of its first variant.
    ///
    /// # Errors
    ///
    /// Returns any request error, or [`ShopifyError::MissingField`] when the
    /// product has no variants.
    pub async fn find_product_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<SkuEntry>, ShopifyError> {
        let data: ProductByIdentifierData = self
            .graphql(
                "productByIdentifier",
                PRODUCT_BY_HANDLE_QUERY,
                json!({ "handle": handle }),
            )
            .await?;
        data.product_by_identifier
            .map(|node| entry_from_node("productByIdentifier", node, handle))
            .transpose()
    }
}
