use crate::error::{Error, Result};
use crate::schema::field_spec::{FieldKind, FieldSpec};

/// How the label field's decoded value becomes a label string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFormat {
    /// Lowercase hexadecimal rendering of an unsigned field, no zero padding.
    HexUint,
    /// Trimmed ASCII rendering of a raw-bytes field.
    AsciiBytes,
}

/// Declarative description of one fixed-length record layout.
///
/// A schema is static configuration: built once, validated once, never
/// mutated. The pixel block follows the declared fields, stored at 4 bits
/// per pixel, row major, MSB first; `trailing_pad_bits` bits of the record
/// remain after it and are ignored.
///
/// `label_field_index` and `serial_field_index` address the sequence of
/// value-producing fields (padding excluded), matching the field order of
/// a [`DecodedRecord`](crate::decode::DecodedRecord).
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub name: &'static str,
    pub record_byte_size: usize,
    pub field_specs: Vec<FieldSpec>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// (x, y) offset at which the native image is pasted onto the canvas.
    /// (0, 0) and (0, 1) both occur across the documented families and are
    /// kept exactly as configured per schema.
    pub paste_offset: (u32, u32),
    /// Side of the square canvas the native image is composited onto.
    pub canvas_size: u32,
    pub trailing_pad_bits: usize,
    pub label_field_index: usize,
    pub label_format: LabelFormat,
    pub serial_field_index: usize,
}

impl RecordSchema {
    /// Number of pixels in the packed image block.
    pub fn pixel_count(&self) -> usize {
        self.pixel_width as usize * self.pixel_height as usize
    }

    /// Total bits consumed by the declared fields.
    pub fn field_bits(&self) -> usize {
        self.field_specs.iter().map(|f| f.bit_width as usize).sum()
    }

    /// Total bits consumed by the packed pixel block (4 bits per pixel).
    pub fn pixel_bits(&self) -> usize {
        self.pixel_count() * 4
    }

    /// Total bits in one record.
    pub fn record_bits(&self) -> usize {
        self.record_byte_size * 8
    }

    /// Fields that produce a value when decoded, in declared order.
    pub fn value_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.field_specs.iter().filter(|f| f.produces_value())
    }

    /// The value-producing field at `index`, if any.
    pub fn value_field(&self, index: usize) -> Option<&FieldSpec> {
        self.value_fields().nth(index)
    }

    /// Checks the schema for self-consistency. Called once before any
    /// decoding starts; all failures here are configuration errors.
    pub fn validate(&self) -> Result<()> {
        for spec in &self.field_specs {
            match spec.kind {
                FieldKind::Uint => {
                    if spec.bit_width == 0 || spec.bit_width > 64 {
                        return Err(Error::FieldWidth {
                            field: spec.name,
                            bit_width: spec.bit_width,
                        });
                    }
                }
                FieldKind::Bytes => {
                    if spec.bit_width == 0 || spec.bit_width % 8 != 0 {
                        return Err(Error::BytesFieldWidth {
                            field: spec.name,
                            bit_width: spec.bit_width,
                        });
                    }
                }
                FieldKind::Padding => {}
            }
        }

        let field_bits = self.field_bits();
        let pixel_bits = self.pixel_bits();
        if field_bits + pixel_bits + self.trailing_pad_bits != self.record_bits() {
            return Err(Error::SchemaBitSum {
                schema: self.name,
                field_bits,
                pixel_bits,
                trailing_bits: self.trailing_pad_bits,
                record_bits: self.record_bits(),
            });
        }

        let label_ok = match self.value_field(self.label_field_index) {
            Some(spec) => match self.label_format {
                LabelFormat::HexUint => spec.kind == FieldKind::Uint,
                LabelFormat::AsciiBytes => spec.kind == FieldKind::Bytes,
            },
            None => false,
        };
        if !label_ok {
            return Err(Error::LabelField {
                schema: self.name,
                index: self.label_field_index,
            });
        }

        let serial_ok = matches!(
            self.value_field(self.serial_field_index),
            Some(spec) if spec.kind == FieldKind::Uint
        );
        if !serial_ok {
            return Err(Error::SerialField {
                schema: self.name,
                index: self.serial_field_index,
            });
        }

        let (x, y) = self.paste_offset;
        if x + self.pixel_width > self.canvas_size || y + self.pixel_height > self.canvas_size {
            return Err(Error::CanvasOverflow {
                width: self.pixel_width,
                height: self.pixel_height,
                x,
                y,
                canvas: self.canvas_size,
            });
        }

        Ok(())
    }
}
