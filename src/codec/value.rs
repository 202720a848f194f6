/// Decoded or to-be-encoded runtime value.
#[derive(Debug, Clone)]
pub enum Value {
	/// Absent or placeholder value.
	Null,
	/// Signed integer, any width up to 64 bits.
	I64(i64),
	/// Unsigned integer, preserving the full 64-bit range.
	U64(u64),
	/// IEEE-754 32-bit float.
	F32(f32),
	/// IEEE-754 64-bit float.
	F64(f64),
	/// Decoded text.
	String(Box<str>),
	/// Raw byte run.
	Bytes(Vec<u8>),
	/// Ordered sequence.
	Array(Vec<Value>),
	/// Ordered field mapping.
	Record(RecordValue),
}

/// Ordered field mapping produced by record schemas.
#[derive(Debug, Clone, Default)]
pub struct RecordValue {
	fields: Vec<FieldValue>,
}

/// One named field inside a record value.
#[derive(Debug, Clone)]
pub struct FieldValue {
	/// Field name.
	pub name: Box<str>,
	/// Field value.
	pub value: Value,
	/// Whether the field is excluded from enumeration and equality.
	/// Hidden fields stay resolvable by name.
	pub hidden: bool,
}

impl Value {
	/// Logical kind label used in error payloads.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::I64(_) | Value::U64(_) => "integer",
			Value::F32(_) | Value::F64(_) => "float",
			Value::String(_) => "string",
			Value::Bytes(_) => "bytes",
			Value::Array(_) => "array",
			Value::Record(_) => "record",
		}
	}

	/// Widen any integer variant to `i128`.
	pub fn as_int(&self) -> Option<i128> {
		match self {
			Value::I64(v) => Some(i128::from(*v)),
			Value::U64(v) => Some(i128::from(*v)),
			_ => None,
		}
	}

	/// Convert any numeric variant to `f64`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::I64(v) => Some(*v as f64),
			Value::U64(v) => Some(*v as f64),
			Value::F32(v) => Some(f64::from(*v)),
			Value::F64(v) => Some(*v),
			_ => None,
		}
	}

	/// Borrow string contents.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(v) => Some(v),
			_ => None,
		}
	}
}

impl RecordValue {
	/// Create an empty record.
	pub fn new() -> Self {
		Self { fields: Vec::new() }
	}

	/// Append a field. Hidden fields are resolvable but not enumerated.
	pub fn insert(&mut self, name: &str, value: Value, hidden: bool) {
		self.fields.push(FieldValue {
			name: name.into(),
			value,
			hidden,
		});
	}

	/// Look up a field by name, hidden fields included.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|field| &*field.name == name).map(|field| &field.value)
	}

	/// All fields in insertion order, hidden fields included.
	pub fn fields(&self) -> &[FieldValue] {
		&self.fields
	}

	/// Enumerable fields in insertion order.
	pub fn visible_fields(&self) -> impl Iterator<Item = &FieldValue> {
		self.fields.iter().filter(|field| !field.hidden)
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Null, Value::Null) => true,
			(Value::I64(a), Value::I64(b)) => a == b,
			(Value::U64(a), Value::U64(b)) => a == b,
			(Value::F32(a), Value::F32(b)) => a == b,
			(Value::F64(a), Value::F64(b)) => a == b,
			(Value::String(a), Value::String(b)) => a == b,
			(Value::Bytes(a), Value::Bytes(b)) => a == b,
			(Value::Array(a), Value::Array(b)) => a == b,
			(Value::Record(a), Value::Record(b)) => a == b,
			_ => false,
		}
	}
}

impl PartialEq for RecordValue {
	fn eq(&self, other: &Self) -> bool {
		let mut left = self.visible_fields();
		let mut right = other.visible_fields();
		loop {
			match (left.next(), right.next()) {
				(None, None) => return true,
				(Some(a), Some(b)) => {
					if a.name != b.name || a.value != b.value {
						return false;
					}
				}
				_ => return false,
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{RecordValue, Value};

	#[test]
	fn hidden_fields_do_not_affect_equality() {
		let mut a = RecordValue::new();
		a.insert("count", Value::U64(2), true);
		a.insert("name", Value::String("x".into()), false);

		let mut b = RecordValue::new();
		b.insert("name", Value::String("x".into()), false);

		assert_eq!(a, b);
		assert_eq!(a.get("count"), Some(&Value::U64(2)));
		assert_eq!(b.get("count"), None);
	}

	#[test]
	fn visible_order_is_significant() {
		let mut a = RecordValue::new();
		a.insert("x", Value::U64(1), false);
		a.insert("y", Value::U64(2), false);

		let mut b = RecordValue::new();
		b.insert("y", Value::U64(2), false);
		b.insert("x", Value::U64(1), false);

		assert_ne!(a, b);
	}
}
