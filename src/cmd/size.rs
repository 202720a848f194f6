use std::fs;
use std::path::PathBuf;

use structbuf::codec::{Schema, size_of};

/// Print the byte size a schema occupies over a zeroed scratch
/// buffer.
pub fn run(schema_path: PathBuf, scratch: usize) -> structbuf::codec::Result<()> {
	let schema = Schema::from_json_str(&fs::read_to_string(&schema_path)?)?;
	let size = size_of(&schema, scratch)?;

	println!("schema: {}", schema_path.display());
	println!("size: {size} bytes");

	Ok(())
}
