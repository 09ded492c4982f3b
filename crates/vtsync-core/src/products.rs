use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Publication status of a Shopify product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Draft,
    Archived,
}

impl ProductStatus {
    /// Upper-case enum value used by the GraphQL Admin API.
    #[must_use]
    pub fn as_graphql(self) -> &'static str {
        match self {
            ProductStatus::Active => "ACTIVE",
            ProductStatus::Draft => "DRAFT",
            ProductStatus::Archived => "ARCHIVED",
        }
    }

    /// Parses the lower-case form used by REST and the import CSV.
    /// Unknown values map to `Draft` so nothing goes live by accident.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => ProductStatus::Active,
            "archived" => ProductStatus::Archived,
            _ => ProductStatus::Draft,
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Active => write!(f, "active"),
            ProductStatus::Draft => write!(f, "draft"),
            ProductStatus::Archived => write!(f, "archived"),
        }
    }
}

/// A product ready to be written to the Shopify import CSV or pushed to the
/// Admin API. One supplier row produces one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    /// URL slug derived from the supplier SKU, e.g. `"ds-2cd2143g2-i"`.
    pub handle: String,
    pub title: String,
    pub body_html: String,
    pub vendor: String,
    pub product_type: String,
    pub tags: Vec<String>,
    pub status: ProductStatus,
    pub published: bool,
    pub variants: Vec<VariantPayload>,
    pub images: Vec<ImagePayload>,
}

impl ProductPayload {
    /// SKU of the first variant, the natural key used for matching against
    /// the store.
    #[must_use]
    pub fn primary_sku(&self) -> Option<&str> {
        self.variants
            .first()
            .map(|v| v.sku.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Tags joined the way Shopify's REST API and CSV import expect them.
    #[must_use]
    pub fn tags_csv(&self) -> String {
        self.tags.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantPayload {
    pub sku: String,
    /// VAT-inclusive selling price.
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    /// Supplier purchase cost, stored on the inventory item.
    pub cost: Option<Decimal>,
    /// EAN/GTIN after scientific-notation repair.
    pub barcode: Option<String>,
    pub inventory_quantity: i64,
    pub weight_grams: Option<u32>,
    pub requires_shipping: bool,
    pub taxable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub src: String,
    pub alt: Option<String>,
    /// 1-based position within the product gallery.
    pub position: u32,
}
