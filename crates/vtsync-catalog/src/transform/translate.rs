//! Spanish → Portuguese substitution for titles, descriptions and categories.
//!
//! This is a fixed glossary, not machine translation: each entry is matched as
//! a whole word (or phrase), case-insensitively, and replaced with the
//! Portuguese term in the same casing shape as the matched text.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

const GLOSSARY: &[(&str, &str)] = &[
    ("fuente de alimentación", "fonte de alimentação"),
    ("control de acceso", "controlo de acessos"),
    ("visión nocturna", "visão noturna"),
    ("disco duro", "disco rígido"),
    ("punto de acceso", "ponto de acesso"),
    ("cámaras", "câmaras"),
    ("cámara", "câmara"),
    ("grabadores", "gravadores"),
    ("grabador", "gravador"),
    ("grabación", "gravação"),
    ("sirenas", "sirenes"),
    ("sirena", "sirene"),
    ("alarmas", "alarmes"),
    ("alarma", "alarme"),
    ("detectores", "detetores"),
    ("detector", "detetor"),
    ("detección", "deteção"),
    ("movimiento", "movimento"),
    ("humo", "fumo"),
    ("cables", "cabos"),
    ("cable", "cabo"),
    ("soportes", "suportes"),
    ("soporte", "suporte"),
    ("caja", "caixa"),
    ("altavoz", "altifalante"),
    ("micrófono", "microfone"),
    ("puerta", "porta"),
    ("ventana", "janela"),
    ("inalámbrico", "sem fios"),
    ("inalámbrica", "sem fios"),
    ("batería", "bateria"),
    ("accesorios", "acessórios"),
    ("accesorio", "acessório"),
    ("videoportero", "videoporteiro"),
    ("videoporteros", "videoporteiros"),
    ("cerradura", "fechadura"),
    ("almacenamiento", "armazenamento"),
    ("resolución", "resolução"),
    ("iluminación", "iluminação"),
    ("alimentación", "alimentação"),
    ("conmutador", "comutador"),
    ("mando", "comando"),
    ("canales", "canais"),
    ("salida", "saída"),
    ("salidas", "saídas"),
    ("techo", "teto"),
    ("pared", "parede"),
    ("negro", "preto"),
    ("blanco", "branco"),
    ("gris", "cinzento"),
    ("pulgadas", "polegadas"),
    ("incluye", "inclui"),
    ("incluido", "incluído"),
    ("hasta", "até"),
    ("con", "com"),
    ("sin", "sem"),
    ("red", "rede"),
];

struct Glossary {
    pattern: Regex,
    lookup: HashMap<String, &'static str>,
}

static GLOSSARY_MATCHER: LazyLock<Glossary> = LazyLock::new(|| {
    let mut terms: Vec<&(&str, &str)> = GLOSSARY.iter().collect();
    // Longest first so phrases win over the single words they contain.
    terms.sort_by_key(|(es, _)| std::cmp::Reverse(es.chars().count()));

    let alternation = terms
        .iter()
        .map(|(es, _)| regex::escape(es))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("valid glossary regex");

    let lookup = GLOSSARY
        .iter()
        .map(|(es, pt)| (es.to_lowercase(), *pt))
        .collect();

    Glossary { pattern, lookup }
});

/// Translate glossary terms from Spanish to Portuguese.
#[must_use]
pub fn translate(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let glossary = &*GLOSSARY_MATCHER;
    glossary
        .pattern
        .replace_all(text, |caps: &Captures<'_>| {
            let matched = &caps[0];
            glossary
                .lookup
                .get(&matched.to_lowercase())
                .map_or_else(|| matched.to_owned(), |pt| match_case(matched, pt))
        })
        .into_owned()
}

/// Give `replacement` the casing shape of `original`: ALL CAPS, Capitalised,
/// or as written in the glossary.
fn match_case(original: &str, replacement: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_owned()
}
