use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for decoding and assembly operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating schemas or decoding record files.
///
/// Two classes share this enum. Configuration errors (bad schema tables,
/// zero target sizes) are raised before any decoding starts and abort the
/// run. Format errors (wrong buffer lengths, truncated files) are scoped
/// to a single source file; `is_recoverable` reports whether the assembler
/// may skip the offending file and keep going.
#[derive(Debug, Error)]
pub enum Error {
    /// Schema field widths, pixel block, and trailing padding do not fill
    /// the declared record size.
    #[error(
        "schema `{schema}`: {field_bits} field bits + {pixel_bits} pixel bits \
         + {trailing_bits} trailing bits do not equal {record_bits} record bits"
    )]
    SchemaBitSum {
        schema: &'static str,
        field_bits: usize,
        pixel_bits: usize,
        trailing_bits: usize,
        record_bits: usize,
    },

    /// Unsigned field wider than 64 bits or zero bits wide.
    #[error("field `{field}`: unsigned width must be 1..=64 bits, got {bit_width}")]
    FieldWidth { field: &'static str, bit_width: u32 },

    /// Raw-bytes field whose declared width is not a whole number of bytes.
    #[error("field `{field}`: raw-bytes width {bit_width} is not a multiple of 8")]
    BytesFieldWidth { field: &'static str, bit_width: u32 },

    /// Label field index out of range or of the wrong kind for the label format.
    #[error("schema `{schema}`: label field index {index} is missing or incompatible with its label format")]
    LabelField { schema: &'static str, index: usize },

    /// Serial field index out of range or not an unsigned field.
    #[error("schema `{schema}`: serial field index {index} is missing or not an unsigned field")]
    SerialField { schema: &'static str, index: usize },

    /// Pasted image extends past the canvas edge.
    #[error(
        "{width}x{height} image at offset ({x}, {y}) does not fit a {canvas}x{canvas} canvas"
    )]
    CanvasOverflow {
        width: u32,
        height: u32,
        x: u32,
        y: u32,
        canvas: u32,
    },

    /// Target output size with a zero dimension.
    #[error("invalid target size {width}x{height}: both dimensions must be nonzero")]
    TargetSize { width: u32, height: u32 },

    /// Record buffer length does not match the schema's record size.
    #[error("record buffer is {actual} bytes, schema expects {expected}")]
    RecordLength { expected: usize, actual: usize },

    /// Raw-bytes field read from a position that is not byte aligned.
    #[error("field `{field}`: raw-bytes read at bit offset {at} is not byte aligned")]
    UnalignedBytesField { field: &'static str, at: usize },

    /// Bit cursor asked to read past the end of the record buffer.
    #[error("field `{field}`: need {need} bits at offset {at}, record has {have} bits left")]
    CursorOverrun {
        field: &'static str,
        need: usize,
        at: usize,
        have: usize,
    },

    /// Nibble buffer length does not match the declared pixel dimensions.
    #[error("pixel buffer holds {actual} nibbles, expected {expected} for {width}x{height}")]
    PixelCount {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
    },

    /// A record read hit end of file before `expected` bytes arrived.
    #[error("{}: record {index} truncated (expected {expected} bytes)", .path.display())]
    TruncatedRecord {
        path: PathBuf,
        index: usize,
        expected: usize,
    },

    /// I/O error from the underlying file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the assembler may skip the offending source file and continue.
    ///
    /// Configuration errors are never recoverable; they mean no decode can
    /// produce meaningful output for any file.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::RecordLength { .. }
                | Error::UnalignedBytesField { .. }
                | Error::CursorOverrun { .. }
                | Error::PixelCount { .. }
                | Error::TruncatedRecord { .. }
                | Error::Io(_)
        )
    }
}
