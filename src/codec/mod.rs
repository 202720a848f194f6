mod bytes;
mod error;
mod json;
mod path;
mod read;
mod scalar;
mod schema;
mod scope;
mod value;
mod write;

/// Bounded byte cursors and text codecs.
pub use bytes::{Cursor, CursorMut, Endianness, decode_text, encode_text};
/// Error and result aliases.
pub use error::{Result, StructError};
/// Runtime value / JSON bridge.
pub use json::{value_from_json, value_to_json};
/// Dotted reference path parser types.
pub use path::{PathStep, ScopePath};
/// Read evaluator entry points, options, and diagnostics.
pub use read::{ReadOptions, ReadReport, read_struct, size_of};
/// Primitive wire encoding vocabulary.
pub use scalar::ScalarType;
/// Schema model types and case selection.
pub use schema::{Body, Case, CaseTag, Directive, Field, Ref, Schema, Seek, select_case};
/// Scope stack and its push/pop guard.
pub use scope::{ScopeGuard, ScopeStack};
/// Decoded runtime value types.
pub use value::{FieldValue, RecordValue, Value};
/// Write evaluator entry point and options.
pub use write::{WriteOptions, write_struct};
