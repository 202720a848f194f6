//! Public library API for reading and writing binary structs from
//! declarative schemas.

/// Schema model, scope resolution, evaluators, and byte cursors.
pub mod codec;
