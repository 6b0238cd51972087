pub mod families;
pub mod field_spec;
pub mod record_schema;

pub use families::{c_type, g_type, m_type, SchemaFamily};
pub use field_spec::{FieldKind, FieldSpec};
pub use record_schema::{LabelFormat, RecordSchema};
