use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("input file is empty")]
    EmptyInput,

    #[error("row has no SKU (name column is blank)")]
    EmptySku,

    #[error("product {sku} has no usable price (PVP and precio_venta_cliente_final are blank)")]
    MissingPrice { sku: String },

    #[error("invalid amount \"{value}\" in column {column}")]
    InvalidAmount { column: &'static str, value: String },

    #[error("brand \"{brand}\" is not on the approved list")]
    UnapprovedBrand { brand: String },
}
