//! Extra image list handling.
//!
//! `extra_images_paths` holds a JSON array. Most exports use plain URL
//! strings; some use `{"src": ...}` or `{"url": ...}` objects, and a few
//! double-encode the whole array as a JSON string.

use serde_json::Value;

const THUMBNAIL_MARKERS: &[&str] = &["thumb", "_small", "_mini", "/mini/"];

fn is_thumbnail(url: &str) -> bool {
    let lower = url.to_lowercase();
    THUMBNAIL_MARKERS.iter().any(|m| lower.contains(m))
}

fn image_url(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map
            .get("src")
            .or_else(|| map.get("url"))
            .and_then(Value::as_str),
        _ => None,
    }
}

/// Parse the extra-images column into a list of full-size image URLs.
///
/// Thumbnails, blanks, duplicates and the main image are dropped; order is
/// preserved. Malformed JSON yields an empty list.
#[must_use]
pub fn extra_images(raw: &str, main_image: Option<&str>) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" {
        return Vec::new();
    }

    let mut parsed: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "extra_images_paths is not valid JSON; ignoring");
            return Vec::new();
        }
    };
    if let Value::String(inner) = &parsed {
        match serde_json::from_str(inner) {
            Ok(v) => parsed = v,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "extra_images_paths string is not a JSON array; ignoring"
                );
                return Vec::new();
            }
        }
    }

    let Value::Array(items) = parsed else {
        tracing::warn!("extra_images_paths is not a JSON array; ignoring");
        return Vec::new();
    };

    let main_image = main_image.map(str::trim).filter(|m| !m.is_empty());
    let mut urls: Vec<String> = Vec::with_capacity(items.len());
    for url in items.iter().filter_map(image_url).map(str::trim) {
        if url.is_empty() || is_thumbnail(url) || Some(url) == main_image {
            continue;
        }
        if !urls.iter().any(|u| u == url) {
            urls.push(url.to_owned());
        }
    }
    urls
}
