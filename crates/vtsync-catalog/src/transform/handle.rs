use super::fold_accents;

/// Build a Shopify handle from a product name or SKU.
///
/// `"DS-2CD1043G2-I (2.8mm)"` becomes `"ds-2cd1043g2-i-2-8mm"`.
#[must_use]
pub fn handle_from(name: &str) -> String {
    let folded = fold_accents(name).to_lowercase();
    let mut handle = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !handle.is_empty() {
                handle.push('-');
            }
            pending_dash = false;
            handle.push(c);
        } else {
            pending_dash = true;
        }
    }
    handle
}
