//! Schema tables for the three documented record families.
//!
//! Layouts transcribed from the ETL format sheets (form_m, form_c,
//! form_e8g/form_e9g). Each family keeps its own quirks exactly as
//! documented: the M and G families paste at (0, 1) while C pastes at
//! (0, 0), and the C family addresses its header in 6-bit units.

use serde::{Deserialize, Serialize};

use crate::schema::field_spec::FieldSpec;
use crate::schema::record_schema::{LabelFormat, RecordSchema};

/// Tag selecting one of the three record layouts. The family is data: it
/// resolves to a schema table and the decoder itself has no per-family
/// branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaFamily {
    /// 2052-byte records, 64x63 pixels (ETL1, ETL6, ETL7).
    MType,
    /// 2952-byte records with 6-bit header units, 72x76 pixels (ETL3, ETL4, ETL5).
    CType,
    /// 8199-byte records, 128x127 pixels (ETL8G, ETL9G).
    GType,
}

impl SchemaFamily {
    /// The schema table for this family.
    pub fn schema(&self) -> RecordSchema {
        match self {
            SchemaFamily::MType => m_type(),
            SchemaFamily::CType => c_type(),
            SchemaFamily::GType => g_type(),
        }
    }
}

/// M-type layout (ETL1, ETL6, ETL7): byte-aligned header, 2016-byte pixel
/// block, 4 undefined trailing bytes. The JIS code byte is the label.
pub fn m_type() -> RecordSchema {
    RecordSchema {
        name: "M-type",
        record_byte_size: 2052,
        field_specs: vec![
            FieldSpec::uint("data_number", 16),
            FieldSpec::bytes("character_code", 2),
            FieldSpec::uint("sheet_number", 16),
            FieldSpec::uint("jis_code", 8),
            FieldSpec::uint("ebcdic_code", 8),
            FieldSpec::uint("quality_image", 8),
            FieldSpec::uint("quality_group", 8),
            FieldSpec::uint("gender", 8),
            FieldSpec::uint("age", 8),
            FieldSpec::uint("serial_data_number", 32),
            FieldSpec::uint("industry", 16),
            FieldSpec::uint("occupation", 16),
            FieldSpec::uint("gather_date", 16),
            FieldSpec::uint("scan_date", 16),
            FieldSpec::uint("sample_y", 8),
            FieldSpec::uint("sample_x", 8),
            FieldSpec::uint("min_level", 8),
            FieldSpec::uint("max_level", 8),
            FieldSpec::padding(32),
        ],
        pixel_width: 64,
        pixel_height: 63,
        paste_offset: (0, 1),
        canvas_size: 64,
        trailing_pad_bits: 32,
        label_field_index: 3,
        label_format: LabelFormat::HexUint,
        serial_field_index: 0,
    }
}

/// C-type layout (ETL3, ETL4, ETL5): header addressed in 6-bit units.
/// The JIS code occupies a 36-bit slot of which only the left 8 bits are
/// effective; the rest is reserved, as are the 28 bits after the EBCDIC
/// code, 12 bits after the T56 character code, and the 1008-bit run
/// before the pixel block.
pub fn c_type() -> RecordSchema {
    RecordSchema {
        name: "C-type",
        record_byte_size: 2952,
        field_specs: vec![
            FieldSpec::uint("serial_data_number", 36),
            FieldSpec::uint("sheet_number", 36),
            FieldSpec::uint("jis_code", 8),
            FieldSpec::padding(28),
            FieldSpec::uint("ebcdic_code", 8),
            FieldSpec::padding(28),
            FieldSpec::uint("t56_code_a", 6),
            FieldSpec::uint("t56_code_b", 6),
            FieldSpec::uint("t56_code_c", 6),
            FieldSpec::uint("t56_code_d", 6),
            FieldSpec::padding(12),
            FieldSpec::uint("quality_image", 36),
            FieldSpec::uint("quality_group", 36),
            FieldSpec::uint("sample_y", 36),
            FieldSpec::uint("sample_x", 36),
            FieldSpec::uint("gender", 36),
            FieldSpec::uint("age", 36),
            FieldSpec::uint("industry", 36),
            FieldSpec::uint("occupation", 36),
            FieldSpec::uint("gather_date", 36),
            FieldSpec::uint("scan_date", 36),
            FieldSpec::uint("x_points", 36),
            FieldSpec::uint("y_points", 36),
            FieldSpec::uint("gray_levels", 36),
            FieldSpec::uint("magnification", 36),
            FieldSpec::uint("serial_old", 36),
            FieldSpec::padding(1008),
        ],
        pixel_width: 72,
        pixel_height: 76,
        paste_offset: (0, 0),
        canvas_size: 76,
        trailing_pad_bits: 0,
        label_field_index: 2,
        label_format: LabelFormat::HexUint,
        serial_field_index: 0,
    }
}

/// G-type layout (ETL8G, ETL9G): byte-aligned header with an 8-byte ASCII
/// reading field, 8128-byte pixel block, 11 uncertain trailing bytes. The
/// 16-bit JIS Kanji code is the label.
pub fn g_type() -> RecordSchema {
    RecordSchema {
        name: "G-type",
        record_byte_size: 8199,
        field_specs: vec![
            FieldSpec::uint("sheet_number", 16),
            FieldSpec::uint("jis_code", 16),
            FieldSpec::bytes("reading", 8),
            FieldSpec::uint("serial_data_number", 32),
            FieldSpec::uint("quality_image", 8),
            FieldSpec::uint("quality_group", 8),
            FieldSpec::uint("gender", 8),
            FieldSpec::uint("age", 8),
            FieldSpec::uint("industry", 16),
            FieldSpec::uint("occupation", 16),
            FieldSpec::uint("gather_date", 16),
            FieldSpec::uint("scan_date", 16),
            FieldSpec::uint("sample_x", 8),
            FieldSpec::uint("sample_y", 8),
            FieldSpec::padding(240),
        ],
        pixel_width: 128,
        pixel_height: 127,
        paste_offset: (0, 1),
        canvas_size: 128,
        trailing_pad_bits: 88,
        label_field_index: 1,
        label_format: LabelFormat::HexUint,
        serial_field_index: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_families_are_self_consistent() {
        for family in [SchemaFamily::MType, SchemaFamily::CType, SchemaFamily::GType] {
            let schema = family.schema();
            schema.validate().unwrap_or_else(|e| panic!("{}: {}", schema.name, e));
        }
    }

    #[test]
    fn m_type_geometry() {
        let schema = m_type();
        assert_eq!(schema.record_byte_size, 2052);
        assert_eq!(schema.pixel_count(), 4032);
        assert_eq!(schema.pixel_bits(), 2016 * 8);
        assert_eq!(schema.field_bits(), 32 * 8);
        assert_eq!(schema.canvas_size, 64);
        assert_eq!(schema.paste_offset, (0, 1));
    }

    #[test]
    fn c_type_geometry() {
        let schema = c_type();
        assert_eq!(schema.record_byte_size, 2952);
        assert_eq!(schema.pixel_count(), 72 * 76);
        // 288 six-bit header characters.
        assert_eq!(schema.field_bits(), 288 * 6);
        assert_eq!(schema.trailing_pad_bits, 0);
        assert_eq!(schema.paste_offset, (0, 0));
    }

    #[test]
    fn g_type_geometry() {
        let schema = g_type();
        assert_eq!(schema.record_byte_size, 8199);
        assert_eq!(schema.pixel_count(), 16256);
        assert_eq!(schema.field_bits(), 60 * 8);
        assert_eq!(schema.trailing_pad_bits, 11 * 8);
        assert_eq!(schema.canvas_size, 128);
    }

    #[test]
    fn label_fields_point_at_jis_codes() {
        for family in [SchemaFamily::MType, SchemaFamily::CType, SchemaFamily::GType] {
            let schema = family.schema();
            let spec = schema.value_field(schema.label_field_index).unwrap();
            assert_eq!(spec.name, "jis_code", "{}", schema.name);
        }
    }
}
