pub mod error;
pub mod mapping;
pub mod shopify_csv;
pub mod supplier;
pub mod transform;

pub use error::CatalogError;
pub use mapping::{map_row, transform_rows, MappingOptions, RowError, TransformReport};
pub use shopify_csv::{
    read_products, read_products_file, write_products, write_products_file, SHOPIFY_CSV_HEADERS,
};
pub use supplier::{parse_supplier_csv, read_supplier_csv, SupplierFile, SupplierRow};
