//! Bucketing of supplier categories into the store's product types.

use super::fold_accents;

/// Fallback product type when no bucket matches.
pub const DEFAULT_PRODUCT_TYPE: &str = "Outros";

/// Ordered buckets: the first bucket with a needle contained in the
/// (lower-cased, accent-folded) category text wins.
const CATEGORY_BUCKETS: &[(&[&str], &str)] = &[
    (&["videoportero", "videoporteiro", "intercom", "portero"], "Videoporteiros"),
    (
        &["punto de acceso", "access point", "switch", "router", "wifi", "redes", "networking"],
        "Redes",
    ),
    (
        &["control de acceso", "control acceso", "controlo de acesso", "cerradura", "biometri"],
        "Controlo de Acessos",
    ),
    (
        &["alarma", "alarme", "intrusion", "detector", "sirena", "teclado"],
        "Alarmes e Intrusão",
    ),
    (&["grabador", "gravador", "nvr", "dvr", "xvr"], "Gravadores"),
    (&["camara", "camera", "bullet", "ptz", "videovigilancia"], "Câmaras de Vigilância"),
    (&["disco", "almacenamiento", "armazenamento", "hdd", "memoria"], "Armazenamento"),
    (&["fuente", "alimentacion", "bateria"], "Energia"),
    (&["cable", "conector", "soporte", "caja", "accesorio", "montaje"], "Acessórios"),
];

/// Map a supplier category pair to a store product type.
///
/// The specific `category` is checked before `category_parent` so a
/// "Cables" leaf under a "Videovigilancia" parent lands in accessories.
#[must_use]
pub fn categorize(category_parent: &str, category: &str) -> &'static str {
    [category, category_parent]
        .iter()
        .map(|text| fold_accents(text).to_lowercase())
        .filter(|text| !text.trim().is_empty())
        .find_map(|text| {
            CATEGORY_BUCKETS
                .iter()
                .find(|(needles, _)| needles.iter().any(|n| text.contains(n)))
                .map(|(_, bucket)| *bucket)
        })
        .unwrap_or(DEFAULT_PRODUCT_TYPE)
}
