//! Documented (file, record-count) tables for the known dataset releases.
//!
//! Counts are empirical per-release documentation, not runtime discovery.
//! Each builder returns the schema family the release decodes with and a
//! manifest of file paths joined under `base`, in the release's canonical
//! file order.

use std::path::Path;

use crate::dataset::manifest::SourceManifest;
use crate::schema::SchemaFamily;

fn manifest_from<I: IntoIterator<Item = (String, usize)>>(
    base: &Path,
    entries: I,
) -> SourceManifest {
    SourceManifest::from_pairs(entries.into_iter().map(|(name, records)| (base.join(name), records)))
}

/// ETL1: 13 M-type files.
pub fn etl1(base: &Path) -> (SchemaFamily, SourceManifest) {
    let counts = [
        11560, 11560, 11560, 11560, 11560, 11560, 11288, 11288, 11287, 11288, 11288, 11287, 4233,
    ];
    let entries = counts
        .iter()
        .enumerate()
        .map(|(i, &records)| (format!("ETL1/ETL1C_{:02}", i + 1), records));
    (SchemaFamily::MType, manifest_from(base, entries))
}

/// ETL3: 2 C-type files.
pub fn etl3(base: &Path) -> (SchemaFamily, SourceManifest) {
    let entries = (1..=2).map(|i| (format!("ETL3/ETL3C_{}", i), 4792));
    (SchemaFamily::CType, manifest_from(base, entries))
}

/// ETL4: a single C-type file.
pub fn etl4(base: &Path) -> (SchemaFamily, SourceManifest) {
    (
        SchemaFamily::CType,
        manifest_from(base, [("ETL4/ETL4C".to_string(), 6112)]),
    )
}

/// ETL5: a single C-type file.
pub fn etl5(base: &Path) -> (SchemaFamily, SourceManifest) {
    (
        SchemaFamily::CType,
        manifest_from(base, [("ETL5/ETL5C".to_string(), 6120)]),
    )
}

/// ETL6: 12 M-type files.
pub fn etl6(base: &Path) -> (SchemaFamily, SourceManifest) {
    let entries = (1..=12).map(|i| {
        let records = if i == 12 { 6915 } else { 13800 };
        (format!("ETL6/ETL6C_{:02}", i), records)
    });
    (SchemaFamily::MType, manifest_from(base, entries))
}

/// ETL7: 4 M-type files (large and small character sets).
pub fn etl7(base: &Path) -> (SchemaFamily, SourceManifest) {
    let entries = [
        ("ETL7/ETL7LC_1".to_string(), 9600),
        ("ETL7/ETL7LC_2".to_string(), 7200),
        ("ETL7/ETL7SC_1".to_string(), 9600),
        ("ETL7/ETL7SC_2".to_string(), 7200),
    ];
    (SchemaFamily::MType, manifest_from(base, entries))
}

/// ETL8G: 32 full G-type files plus the short 33rd.
pub fn etl8g(base: &Path) -> (SchemaFamily, SourceManifest) {
    let entries = (1..=33).map(|i| {
        let records = if i == 33 { 956 } else { 4780 };
        (format!("ETL8G/ETL8G_{:02}", i), records)
    });
    (SchemaFamily::GType, manifest_from(base, entries))
}

/// ETL9G: 50 G-type files.
pub fn etl9g(base: &Path) -> (SchemaFamily, SourceManifest) {
    let entries = (1..=50).map(|i| (format!("ETL9G/ETL9G_{:02}", i), 12144));
    (SchemaFamily::GType, manifest_from(base, entries))
}
