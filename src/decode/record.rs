use crate::decode::bit_cursor::BitCursor;
use crate::error::{Error, Result};
use crate::schema::{FieldKind, LabelFormat, RecordSchema};

/// Value decoded from a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Uint(u64),
    Bytes(Vec<u8>),
}

impl FieldValue {
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            FieldValue::Uint(v) => Some(*v),
            FieldValue::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Uint(_) => None,
            FieldValue::Bytes(b) => Some(b),
        }
    }
}

/// One decoded field, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField {
    pub name: &'static str,
    pub value: FieldValue,
}

/// All value-producing fields of one record plus its raw pixel nibbles.
/// Produced fresh per record and immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub fields: Vec<DecodedField>,
    /// One nibble per pixel, row major, each in 0..=15.
    pub nibbles: Vec<u8>,
}

impl DecodedRecord {
    /// Looks up an unsigned field by name.
    pub fn uint(&self, name: &str) -> Option<u64> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_uint())
    }

    /// Looks up a raw-bytes field by name.
    pub fn bytes(&self, name: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_bytes())
    }

    /// Renders the label string per the schema's label rule.
    pub fn label(&self, schema: &RecordSchema) -> Result<String> {
        let field = self.fields.get(schema.label_field_index).ok_or(Error::LabelField {
            schema: schema.name,
            index: schema.label_field_index,
        })?;
        match schema.label_format {
            LabelFormat::HexUint => {
                let value = field.value.as_uint().ok_or(Error::LabelField {
                    schema: schema.name,
                    index: schema.label_field_index,
                })?;
                Ok(format!("{:x}", value))
            }
            LabelFormat::AsciiBytes => {
                let bytes = field.value.as_bytes().ok_or(Error::LabelField {
                    schema: schema.name,
                    index: schema.label_field_index,
                })?;
                Ok(String::from_utf8_lossy(bytes).trim().to_string())
            }
        }
    }

    /// The record's serial number per the schema's serial field.
    pub fn serial(&self, schema: &RecordSchema) -> Result<u64> {
        self.fields
            .get(schema.serial_field_index)
            .and_then(|f| f.value.as_uint())
            .ok_or(Error::SerialField {
                schema: schema.name,
                index: schema.serial_field_index,
            })
    }
}

/// Decodes one record buffer against a schema.
///
/// Walks the declared fields in order from bit 0, then extracts the packed
/// pixel block; whatever the schema declares as trailing padding is left
/// unread. Pure function of (buffer, schema). Callers may address record
/// `i` of a file at byte offset `i * record_byte_size` without decoding
/// the records before it.
pub fn decode_record(bytes: &[u8], schema: &RecordSchema) -> Result<DecodedRecord> {
    if bytes.len() != schema.record_byte_size {
        return Err(Error::RecordLength {
            expected: schema.record_byte_size,
            actual: bytes.len(),
        });
    }

    let mut cursor = BitCursor::new(bytes);
    let mut fields = Vec::with_capacity(schema.field_specs.len());
    for spec in &schema.field_specs {
        match spec.kind {
            FieldKind::Uint => fields.push(DecodedField {
                name: spec.name,
                value: FieldValue::Uint(cursor.read_uint(spec.name, spec.bit_width)?),
            }),
            FieldKind::Bytes => fields.push(DecodedField {
                name: spec.name,
                value: FieldValue::Bytes(cursor.read_bytes(spec.name, spec.bit_width)?.to_vec()),
            }),
            FieldKind::Padding => cursor.skip(spec.name, spec.bit_width as usize)?,
        }
    }

    let nibbles = cursor.read_nibbles(schema.pixel_count())?;
    debug_assert_eq!(cursor.remaining(), schema.trailing_pad_bits);

    Ok(DecodedRecord { fields, nibbles })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{c_type, g_type, m_type};

    /// Builds a synthetic M-type record with the given header bytes placed
    /// at their documented positions and every pixel set to `nibble`.
    fn m_record(jis_code: u8, nibble: u8) -> Vec<u8> {
        let mut buf = vec![0u8; 2052];
        buf[0..2].copy_from_slice(&7u16.to_be_bytes()); // data_number
        buf[2..4].copy_from_slice(b"0 "); // character_code
        buf[4..6].copy_from_slice(&2u16.to_be_bytes()); // sheet_number
        buf[6] = jis_code;
        buf[11] = 23; // age
        for byte in &mut buf[32..2048] {
            *byte = (nibble << 4) | nibble;
        }
        buf
    }

    #[test]
    fn m_type_record_decodes_documented_fields() {
        let schema = m_type();
        let record = decode_record(&m_record(0x30, 5), &schema).unwrap();

        assert_eq!(record.uint("data_number"), Some(7));
        assert_eq!(record.bytes("character_code"), Some(&b"0 "[..]));
        assert_eq!(record.uint("sheet_number"), Some(2));
        assert_eq!(record.uint("jis_code"), Some(0x30));
        assert_eq!(record.uint("age"), Some(23));
        assert_eq!(record.nibbles.len(), 4032);
        assert!(record.nibbles.iter().all(|&n| n == 5));

        assert_eq!(record.label(&schema).unwrap(), "30");
        assert_eq!(record.serial(&schema).unwrap(), 7);
    }

    #[test]
    fn wrong_buffer_length_is_rejected() {
        let schema = m_type();
        let err = decode_record(&[0u8; 2051], &schema).unwrap_err();
        assert!(matches!(err, Error::RecordLength { expected: 2052, actual: 2051 }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn c_type_record_decodes_six_bit_header() {
        let schema = c_type();
        let mut buf = vec![0u8; 2952];
        // serial_data_number: 36-bit value 9 -> bits 0..36.
        // Bits 28..36 live in buf[3] low nibble and buf[4] high nibble.
        buf[4] = 0x90; // value 9 in bits 32..36
        // jis_code occupies the left 8 bits of the third 36-bit slot,
        // i.e. bits 72..80 = buf[9].
        buf[9] = 0x41;
        let record = decode_record(&buf, &schema).unwrap();
        assert_eq!(record.uint("serial_data_number"), Some(9));
        assert_eq!(record.uint("jis_code"), Some(0x41));
        assert_eq!(record.nibbles.len(), 72 * 76);
        assert_eq!(record.label(&schema).unwrap(), "41");
    }

    #[test]
    fn g_type_record_decodes_reading_and_label() {
        let schema = g_type();
        let mut buf = vec![0u8; 8199];
        buf[0..2].copy_from_slice(&31u16.to_be_bytes()); // sheet_number
        buf[2..4].copy_from_slice(&0x2422u16.to_be_bytes()); // jis_code
        buf[4..12].copy_from_slice(b"AI.MEDER"); // reading
        let record = decode_record(&buf, &schema).unwrap();
        assert_eq!(record.uint("sheet_number"), Some(31));
        assert_eq!(record.bytes("reading"), Some(&b"AI.MEDER"[..]));
        assert_eq!(record.label(&schema).unwrap(), "2422");
        assert_eq!(record.serial(&schema).unwrap(), 31);
        assert_eq!(record.nibbles.len(), 16256);
    }

    #[test]
    fn padding_fields_do_not_appear_in_the_record() {
        let schema = c_type();
        let record = decode_record(&vec![0u8; 2952], &schema).unwrap();
        assert!(record.fields.iter().all(|f| f.name != "reserved"));
        assert_eq!(record.fields.len(), schema.value_fields().count());
    }
}
