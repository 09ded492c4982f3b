//! Pure field transforms applied to supplier values before they become a
//! Shopify payload.

pub mod brand;
pub mod category;
pub mod ean;
pub mod encoding;
pub mod handle;
pub mod images;
pub mod price;
pub mod stock;
pub mod translate;

pub use brand::{normalize_brand, Brand};
pub use category::categorize;
pub use ean::{is_valid_gtin, repair_ean};
pub use encoding::repair_encoding;
pub use handle::handle_from;
pub use images::extra_images;
pub use price::{parse_amount, price_with_vat};
pub use stock::stock_quantity;
pub use translate::translate;

/// Replace Portuguese/Spanish accented letters with their ASCII base letter.
/// Characters without a mapping pass through unchanged.
pub(crate) fn fold_accents(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            'ñ' => 'n',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}
