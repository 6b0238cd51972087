//! Decoder for the ETL handwriting character database record formats.
//!
//! Three fixed-length binary layouts (M-type, C-type, G-type) share one
//! schema-driven decode pipeline: a bit cursor walks each record's
//! declared fields, the packed 4-bit pixel block expands to 8-bit
//! grayscale, the native image is composited onto a white canvas and
//! resampled to a common output size, and the assembler accumulates the
//! results into a tensor with parallel label and frequency tables.

pub mod dataset;
pub mod decode;
pub mod error;
pub mod raster;
pub mod schema;

// Convenience re-exports
pub use dataset::{
    AssembleConfig, AssembleEvent, DatasetAssembler, DatasetResult, ErrorPolicy, FileReport,
    FrequencyTable, OutputSample, PixelStats, ProgressSender, SourceFile, SourceManifest,
};
pub use decode::{decode_record, BitCursor, DecodedField, DecodedRecord, FieldValue};
pub use error::{Error, Result};
pub use raster::{expand_nibbles, Canvas, GrayMatrix, Polarity};
pub use schema::{FieldKind, FieldSpec, LabelFormat, RecordSchema, SchemaFamily};
