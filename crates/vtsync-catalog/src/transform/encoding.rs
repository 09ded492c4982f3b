//! Repair of UTF-8 text that was decoded as Windows-1252 somewhere upstream.
//!
//! The supplier's export pipeline double-encodes accented characters in some
//! fields (`CÃ¡mara` instead of `Cámara`). Sequences are replaced from a fixed
//! table; three-character sequences come first so their two-character
//! prefixes never shadow them.

const REPLACEMENTS: &[(&str, &str)] = &[
    ("â€™", "’"),
    ("â€˜", "‘"),
    ("â€œ", "“"),
    ("â€\u{9d}", "”"),
    ("â€“", "–"),
    ("â€”", "\u{2014}"),
    ("â€¦", "…"),
    ("â‚¬", "€"),
    ("Ã¡", "á"),
    ("Ã\u{a0}", "à"),
    ("Ã¢", "â"),
    ("Ã£", "ã"),
    ("Ã¤", "ä"),
    ("Ã§", "ç"),
    ("Ã©", "é"),
    ("Ã¨", "è"),
    ("Ãª", "ê"),
    ("Ã\u{ad}", "í"),
    ("Ã³", "ó"),
    ("Ã²", "ò"),
    ("Ã´", "ô"),
    ("Ãµ", "õ"),
    ("Ã¶", "ö"),
    ("Ãº", "ú"),
    ("Ã¹", "ù"),
    ("Ã¼", "ü"),
    ("Ã±", "ñ"),
    ("Ã\u{81}", "Á"),
    ("Ã€", "À"),
    ("Ã‚", "Â"),
    ("Ãƒ", "Ã"),
    ("Ã‡", "Ç"),
    ("Ã‰", "É"),
    ("ÃŠ", "Ê"),
    ("Ã\u{8d}", "Í"),
    ("Ã“", "Ó"),
    ("Ã”", "Ô"),
    ("Ã•", "Õ"),
    ("Ãš", "Ú"),
    ("Ã‘", "Ñ"),
    ("Âº", "º"),
    ("Âª", "ª"),
    ("Â°", "°"),
    ("Â´", "´"),
    ("Â«", "«"),
    ("Â»", "»"),
    ("Â±", "±"),
    ("Â²", "²"),
    ("Â³", "³"),
    ("Âµ", "µ"),
    ("Â\u{a0}", " "),
];

/// Replace known mojibake sequences with the characters they stand for.
/// Clean text is returned unchanged.
#[must_use]
pub fn repair_encoding(text: &str) -> String {
    if !text.contains(['Ã', 'Â', 'â']) {
        return text.to_owned();
    }
    let mut repaired = text.to_owned();
    for (broken, fixed) in REPLACEMENTS {
        if repaired.contains(broken) {
            repaired = repaired.replace(broken, fixed);
        }
    }
    repaired
}
