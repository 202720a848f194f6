use structbuf::codec::Value;

/// Output truncation and formatting limits for decoded values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of fields printed for a single record.
	pub max_fields_per_record: usize,
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of elements printed for arrays.
	pub max_array_items: usize,
	/// Maximum recursive print depth for nested arrays/records.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_fields_per_record: 80,
			max_string_len: 200,
			max_array_items: 32,
			max_print_depth: 8,
		}
	}
}

/// Print a decoded value as an indented tree. Hidden record fields
/// are not enumerable and do not appear.
pub fn print_value(value: &Value, indent: usize, depth: u32, options: PrintOptions) {
	let pad = " ".repeat(indent);
	match value {
		Value::Null => println!("{}null", pad),
		Value::I64(v) => println!("{}{v}", pad),
		Value::U64(v) => println!("{}{v}", pad),
		Value::F32(v) => println!("{}{v}", pad),
		Value::F64(v) => println!("{}{v}", pad),
		Value::Bytes(v) => println!("{}bytes[{}]", pad, v.len()),
		Value::String(v) => println!("{}\"{}\"", pad, truncate(v, options.max_string_len)),
		Value::Array(items) => {
			if depth >= options.max_print_depth {
				println!("{}[... {} items]", pad, items.len());
				return;
			}
			println!("{}[", pad);
			for item in items.iter().take(options.max_array_items) {
				print_value(item, indent + 2, depth + 1, options);
			}
			if items.len() > options.max_array_items {
				println!("{}  ... {} more", pad, items.len() - options.max_array_items);
			}
			println!("{}]", pad);
		}
		Value::Record(record) => {
			let fields: Vec<_> = record.visible_fields().collect();
			if depth >= options.max_print_depth {
				println!("{}{{ ... }}", pad);
				return;
			}
			println!("{}{{", pad);
			for field in fields.iter().take(options.max_fields_per_record) {
				print!("{}  {} = ", pad, field.name);
				if matches!(field.value, Value::Record(_) | Value::Array(_)) {
					println!();
					print_value(&field.value, indent + 4, depth + 1, options);
				} else {
					print_value(&field.value, 0, depth + 1, options);
				}
			}
			if fields.len() > options.max_fields_per_record {
				println!("{}  ... {} more fields", pad, fields.len() - options.max_fields_per_record);
			}
			println!("{}}}", pad);
		}
	}
}

fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}
