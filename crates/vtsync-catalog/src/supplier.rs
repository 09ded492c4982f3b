//! Reader for the supplier product export.
//!
//! The export has drifted across versions: the delimiter has been `;`, `|`
//! and tab, header names changed spelling, and some files ship a junk first
//! line instead of a usable header. This module absorbs all of that and hands
//! back one [`SupplierRow`] per data line with every canonical column filled
//! (blank when absent).

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::CatalogError;

/// Canonical column order. Used positionally when the header row is not
/// recognisable.
pub const SUPPLIER_COLUMNS: [&str; 23] = [
    "name",
    "short_description",
    "description",
    "specifications",
    "brand",
    "category",
    "category_parent",
    "precio_neto_compra",
    "PVP",
    "msrp",
    "precio_venta_cliente_final",
    "currency",
    "stock",
    "ean",
    "image_path",
    "extra_images_paths",
    "weight",
    "width",
    "height",
    "depth",
    "warranty",
    "status",
    "last_update",
];

/// Header spellings seen in older exports, mapped to the canonical name.
const HEADER_ALIASES: &[(&str, &str)] = &[
    ("sku", "name"),
    ("reference", "name"),
    ("price", "pvp"),
    ("cost", "precio_neto_compra"),
    ("image", "image_path"),
    ("main_image", "image_path"),
    ("extra_images", "extra_images_paths"),
    ("images", "extra_images_paths"),
    ("barcode", "ean"),
    ("stock_level", "stock"),
    ("parent_category", "category_parent"),
];

/// Candidate delimiters in tie-break order.
const DELIMITERS: [u8; 4] = [b';', b'|', b'\t', b','];

/// One supplier product line. Values are trimmed; missing columns are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierRow {
    /// 1-based line number in the source file, for error reporting.
    pub line: u64,
    pub name: String,
    pub short_description: String,
    pub description: String,
    pub specifications: String,
    pub brand: String,
    pub category: String,
    pub category_parent: String,
    pub precio_neto_compra: String,
    pub pvp: String,
    pub msrp: String,
    pub precio_venta_cliente_final: String,
    pub currency: String,
    pub stock: String,
    pub ean: String,
    pub image_path: String,
    pub extra_images_paths: String,
    pub weight: String,
    pub width: String,
    pub height: String,
    pub depth: String,
    pub warranty: String,
    pub status: String,
    pub last_update: String,
}

/// Parsed supplier file plus what was inferred about its layout.
#[derive(Debug)]
pub struct SupplierFile {
    pub delimiter: u8,
    /// `true` when the header was not recognised and columns were assigned
    /// in canonical order.
    pub positional: bool,
    pub rows: Vec<SupplierRow>,
}

/// Read and parse a supplier file from disk.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be read, and any error
/// from [`parse_supplier_csv`].
pub fn read_supplier_csv(path: &Path) -> Result<SupplierFile, CatalogError> {
    let bytes = std::fs::read(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let file = parse_supplier_csv(&bytes)?;
    tracing::info!(
        path = %path.display(),
        rows = file.rows.len(),
        delimiter = %char::from(file.delimiter).escape_default(),
        positional = file.positional,
        "read supplier file"
    );
    Ok(file)
}

/// Parse supplier CSV content.
///
/// # Errors
///
/// Returns [`CatalogError::EmptyInput`] when there is no header line and
/// [`CatalogError::Csv`] on malformed quoting.
pub fn parse_supplier_csv(bytes: &[u8]) -> Result<SupplierFile, CatalogError> {
    let text = decode_input(bytes);
    let header_line = text
        .lines()
        .find(|l| !l.trim().is_empty())
        .ok_or(CatalogError::EmptyInput)?;
    let delimiter = detect_delimiter(header_line);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = loop {
        match records.next() {
            Some(record) => {
                let record = record?;
                if record.iter().any(|f| !f.trim().is_empty()) {
                    break record;
                }
            }
            None => return Err(CatalogError::EmptyInput),
        }
    };

    let (layout, positional) = match resolve_layout(&header) {
        Some(layout) => (layout, false),
        None => {
            tracing::warn!("supplier header not recognised; using canonical column order");
            let mut layout = [None; SUPPLIER_COLUMNS.len()];
            for (i, slot) in layout.iter_mut().enumerate() {
                *slot = Some(i);
            }
            (layout, true)
        }
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let line = record.position().map_or(0, csv::Position::line);
        rows.push(build_row(&record, &layout, line));
    }

    Ok(SupplierFile {
        delimiter,
        positional,
        rows,
    })
}

/// Strip a UTF-8 BOM, falling back to ISO-8859-1 when the bytes are not
/// valid UTF-8.
fn decode_input(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_owned(),
        Err(e) => {
            tracing::warn!(
                valid_up_to = e.valid_up_to(),
                "supplier file is not valid UTF-8; decoding as ISO-8859-1"
            );
            bytes.iter().copied().map(char::from).collect()
        }
    }
}

/// Pick the delimiter that occurs most often in the header line.
/// Ties resolve in [`DELIMITERS`] order; no candidate at all means `;`.
pub(crate) fn detect_delimiter(header_line: &str) -> u8 {
    let mut best = DELIMITERS[0];
    let mut best_count = 0usize;
    for &candidate in &DELIMITERS {
        let count = header_line.bytes().filter(|&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

fn normalize_header(raw: &str) -> String {
    let lowered = raw.trim().trim_start_matches('\u{feff}').to_lowercase();
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map_or(lowered, |(_, canonical)| (*canonical).to_owned())
}

/// Map every canonical column to its index in the header, or `None` when the
/// header has no `name` column.
fn resolve_layout(header: &StringRecord) -> Option<[Option<usize>; SUPPLIER_COLUMNS.len()]> {
    let names: Vec<String> = header.iter().map(normalize_header).collect();
    let mut layout = [None; SUPPLIER_COLUMNS.len()];
    for (slot, canonical) in layout.iter_mut().zip(SUPPLIER_COLUMNS) {
        let canonical = canonical.to_lowercase();
        *slot = names.iter().position(|n| *n == canonical);
    }
    layout[0]?;
    Some(layout)
}

fn build_row(
    record: &StringRecord,
    layout: &[Option<usize>; SUPPLIER_COLUMNS.len()],
    line: u64,
) -> SupplierRow {
    let get = |col: usize| -> String {
        layout[col]
            .and_then(|i| record.get(i))
            .map(str::trim)
            .unwrap_or_default()
            .to_owned()
    };

    SupplierRow {
        line,
        name: get(0),
        short_description: get(1),
        description: get(2),
        specifications: get(3),
        brand: get(4),
        category: get(5),
        category_parent: get(6),
        precio_neto_compra: get(7),
        pvp: get(8),
        msrp: get(9),
        precio_venta_cliente_final: get(10),
        currency: get(11),
        stock: get(12),
        ean: get(13),
        image_path: get(14),
        extra_images_paths: get(15),
        weight: get(16),
        width: get(17),
        height: get(18),
        depth: get(19),
        warranty: get(20),
        status: get(21),
        last_update: get(22),
    }
}

#[cfg(test)]
#[path = "supplier_test.rs"]
mod tests;
