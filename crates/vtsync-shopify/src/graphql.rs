//! GraphQL documents sent to the Admin API.

pub(crate) const SKU_INDEX_QUERY: &str = r"
query SkuIndex($first: Int!, $after: String) {
  productVariants(first: $first, after: $after) {
    pageInfo { hasNextPage endCursor }
    nodes {
      id
      sku
      inventoryItem { id }
      product { id handle }
    }
  }
}";

pub(crate) const PRODUCT_BY_HANDLE_QUERY: &str = r"
query ProductByHandle($handle: String!) {
  productByIdentifier(identifier: { handle: $handle }) {
    id
    handle
    variants(first: 1) { nodes { id inventoryItem { id } } }
  }
}";

pub(crate) const PRODUCT_CREATE_MUTATION: &str = r"
mutation ProductCreate($product: ProductCreateInput!) {
  productCreate(product: $product) {
    product {
      id
      handle
      variants(first: 1) { nodes { id inventoryItem { id } } }
    }
    userErrors { field message }
  }
}";

pub(crate) const PRODUCT_UPDATE_MUTATION: &str = r"
mutation ProductUpdate($product: ProductUpdateInput!, $media: [CreateMediaInput!]) {
  productUpdate(product: $product, media: $media) {
    product { id handle }
    userErrors { field message }
  }
}";

pub(crate) const VARIANTS_BULK_UPDATE_MUTATION: &str = r"
mutation VariantsBulkUpdate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
  productVariantsBulkUpdate(productId: $productId, variants: $variants) {
    productVariants { id }
    userErrors { field message code }
  }
}";

pub(crate) const INVENTORY_SET_QUANTITIES_MUTATION: &str = r"
mutation InventorySetQuantities($input: InventorySetQuantitiesInput!) {
  inventorySetQuantities(input: $input) {
    inventoryAdjustmentGroup { id }
    userErrors { field message code }
  }
}";
