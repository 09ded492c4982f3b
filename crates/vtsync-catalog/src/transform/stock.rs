//! Supplier stock levels to Shopify inventory quantities.

const STOCK_HIGH: i64 = 100;
const STOCK_MEDIUM: i64 = 25;
const STOCK_LOW: i64 = 5;

/// Convert a supplier stock value into an inventory quantity.
///
/// The supplier reports buckets (`high`/`medium`/`low`/`none`, sometimes in
/// Spanish) rather than counts; plain integers are passed through with
/// negatives clamped to zero.
#[must_use]
pub fn stock_quantity(raw: &str) -> i64 {
    let value = raw.trim().to_lowercase();
    if let Ok(n) = value.parse::<i64>() {
        return n.max(0);
    }
    match value.as_str() {
        "high" | "alto" | "alta" => STOCK_HIGH,
        "medium" | "medio" | "media" => STOCK_MEDIUM,
        "low" | "bajo" | "baja" => STOCK_LOW,
        "" | "none" | "out" | "out of stock" | "sin stock" | "agotado" => 0,
        other => {
            tracing::warn!(stock = other, "unknown stock level; treating as out of stock");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_map_to_fixed_tiers() {
        assert_eq!(stock_quantity("high"), 100);
        assert_eq!(stock_quantity("Medium"), 25);
        assert_eq!(stock_quantity(" LOW "), 5);
        assert_eq!(stock_quantity("none"), 0);
    }

    #[test]
    fn spanish_buckets_are_recognised() {
        assert_eq!(stock_quantity("alto"), 100);
        assert_eq!(stock_quantity("bajo"), 5);
        assert_eq!(stock_quantity("sin stock"), 0);
    }

    #[test]
    fn integers_pass_through_and_clamp() {
        assert_eq!(stock_quantity("42"), 42);
        assert_eq!(stock_quantity("-3"), 0);
    }

    #[test]
    fn blank_and_unknown_are_zero() {
        assert_eq!(stock_quantity(""), 0);
        assert_eq!(stock_quantity("plenty"), 0);
    }
}
