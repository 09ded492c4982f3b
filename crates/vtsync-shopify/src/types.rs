//! Wire types for the Admin API responses this crate reads.

use serde::Deserialize;

/// A `userErrors` entry from a GraphQL mutation.
///
/// Only some mutations expose `code`; for the others a handle collision is
/// recognised by the field path ending in `handle`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl UserError {
    #[must_use]
    pub fn is_handle_taken(&self) -> bool {
        if self.code.as_deref() == Some("TAKEN") {
            return true;
        }
        self.field
            .as_ref()
            .and_then(|path| path.last())
            .is_some_and(|last| last == "handle")
    }
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = self.field.as_ref().filter(|p| !p.is_empty()) {
            write!(f, "{}: ", field.join("."))?;
        }
        write!(f, "{}", self.message)?;
        if let Some(code) = &self.code {
            write!(f, " ({code})")?;
        }
        Ok(())
    }
}

/// Store identifiers for one variant, keyed by SKU in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuEntry {
    pub product_id: String,
    pub variant_id: String,
    pub inventory_item_id: Option<String>,
    pub handle: String,
}

// GraphQL envelope

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlEnvelope {
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlErrorEntry {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl GraphQlErrorEntry {
    pub(crate) fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|e| e.get("code"))
            .and_then(serde_json::Value::as_str)
    }
}

// GraphQL payloads

#[derive(Debug, Deserialize)]
pub(crate) struct Gid {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductRef {
    pub id: String,
    pub handle: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexedVariant {
    pub id: String,
    pub sku: Option<String>,
    pub inventory_item: Option<Gid>,
    pub product: ProductRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductVariantsData {
    pub product_variants: Connection<IndexedVariant>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariantRef {
    pub id: String,
    pub inventory_item: Option<Gid>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductNode {
    pub id: String,
    pub handle: Option<String>,
    pub variants: Option<Connection<VariantRef>>,
}

impl ProductNode {
    pub(crate) fn first_variant(&self) -> Option<&VariantRef> {
        self.variants.as_ref().and_then(|v| v.nodes.first())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductMutation {
    pub product: Option<ProductNode>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserErrorsOnly {
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductCreateData {
    pub product_create: ProductMutation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductUpdateData {
    pub product_update: ProductMutation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariantsBulkUpdateData {
    pub product_variants_bulk_update: UserErrorsOnly,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InventorySetQuantitiesData {
    pub inventory_set_quantities: UserErrorsOnly,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductByIdentifierData {
    pub product_by_identifier: Option<ProductNode>,
}

// REST payloads

#[derive(Debug, Clone, Deserialize)]
pub struct RestVariant {
    pub id: u64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub inventory_item_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestProduct {
    pub id: u64,
    pub handle: String,
    #[serde(default)]
    pub variants: Vec<RestVariant>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestProductsResponse {
    #[serde(default)]
    pub products: Vec<RestProduct>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RestProductResponse {
    pub product: RestProduct,
}
