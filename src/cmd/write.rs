use std::fs;
use std::path::PathBuf;

use structbuf::codec::{Schema, WriteOptions, value_from_json, write_struct};

/// Encode the JSON value in `value_path` against `schema` and write
/// the consumed prefix of the buffer to `out_path`.
pub fn run(
	schema_path: PathBuf,
	value_path: PathBuf,
	out_path: PathBuf,
	offset: usize,
	capacity: usize,
) -> structbuf::codec::Result<()> {
	let schema = Schema::from_json_str(&fs::read_to_string(&schema_path)?)?;
	let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&value_path)?)?;
	let value = value_from_json(&json);

	let mut buf = vec![0_u8; capacity];
	let options = WriteOptions {
		offset,
		..WriteOptions::default()
	};
	let written = write_struct(&value, &schema, &mut buf, &options)?;

	fs::write(&out_path, &buf[..written])?;
	println!("wrote {written} bytes to {}", out_path.display());

	Ok(())
}
