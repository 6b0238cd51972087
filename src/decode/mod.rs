pub mod bit_cursor;
pub mod record;

pub use bit_cursor::BitCursor;
pub use record::{decode_record, DecodedField, DecodedRecord, FieldValue};
