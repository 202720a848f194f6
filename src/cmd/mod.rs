/// Decoded value pretty-printing helpers.
pub mod print;
/// Struct decode command.
pub mod read;
/// Layout size command.
pub mod size;
/// Struct encode command.
pub mod write;
