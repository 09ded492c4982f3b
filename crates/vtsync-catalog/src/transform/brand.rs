//! Brand normalization against the list of brands the store carries.

/// Approved brands with the spellings the supplier has used for them.
/// Matching ignores case, spaces and punctuation, so aliases only need to
/// cover genuinely different names.
const APPROVED_BRANDS: &[(&str, &[&str])] = &[
    ("Hikvision", &["hikvisionpro", "hik"]),
    ("HiWatch", &["hiwatchseries"]),
    ("Dahua", &["dahuatechnology"]),
    ("Ajax", &["ajaxsystems"]),
    ("Uniview", &["unv"]),
    ("Safire", &["safiresmart"]),
    ("X-Security", &[]),
    ("Ezviz", &[]),
    ("Imou", &[]),
    ("Ubiquiti", &["ubnt", "unifi"]),
    ("TP-Link", &["omada", "tplinkomada"]),
    ("Western Digital", &["wd"]),
    ("Seagate", &[]),
    ("Paradox", &[]),
    ("Risco", &["riscogroup"]),
    ("Pyronix", &[]),
    ("Fermax", &[]),
    ("Akuvox", &[]),
    ("Axis", &["axiscommunications"]),
    ("Bosch", &["boschsecurity"]),
];

/// A brand after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    /// Display name used as the Shopify vendor.
    pub name: String,
    /// Whether the brand is on the approved list.
    pub approved: bool,
}

fn match_key(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Normalize a supplier brand string.
///
/// Approved brands come back in their canonical spelling. Anything else is
/// whitespace-collapsed and title-cased, with `approved = false`.
#[must_use]
pub fn normalize_brand(raw: &str) -> Brand {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Brand {
            name: String::new(),
            approved: false,
        };
    }

    let key = match_key(&collapsed);
    let approved = APPROVED_BRANDS.iter().find(|(canonical, aliases)| {
        match_key(canonical) == key || aliases.iter().any(|a| *a == key)
    });

    match approved {
        Some((canonical, _)) => Brand {
            name: (*canonical).to_owned(),
            approved: true,
        },
        None => Brand {
            name: title_case(&collapsed),
            approved: false,
        },
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
