use std::fs;
use std::path::PathBuf;

use structbuf::codec::{ReadOptions, Schema, read_struct, value_to_json};

use crate::cmd::print::{PrintOptions, print_value};

#[derive(serde::Serialize)]
struct ReadOutput {
	value: serde_json::Value,
	eof: bool,
	pos: usize,
	len: usize,
}

/// Decode `data` against `schema` and print the result.
pub fn run(schema_path: PathBuf, data_path: PathBuf, offset: usize, json: bool) -> structbuf::codec::Result<()> {
	let schema = Schema::from_json_str(&fs::read_to_string(&schema_path)?)?;
	let data = fs::read(&data_path)?;
	let options = ReadOptions {
		offset,
		..ReadOptions::default()
	};
	let report = read_struct(&schema, &data, &options)?;

	if json {
		let output = ReadOutput {
			value: value_to_json(&report.value),
			eof: report.eof,
			pos: report.pos,
			len: report.len,
		};
		println!("{}", serde_json::to_string_pretty(&output)?);
		return Ok(());
	}

	println!("schema: {}", schema_path.display());
	println!("data: {}", data_path.display());
	println!("eof: {}", report.eof);
	println!("pos: {} (0x{:x})", report.pos, report.pos);
	println!("len: {}", report.len);
	println!("value:");
	print_value(&report.value, 2, 0, PrintOptions::default());

	Ok(())
}
