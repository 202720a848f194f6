use crate::codec::bytes::{CursorMut, encode_text};
use crate::codec::schema::{Body, Directive, Schema, Seek, select_case};
use crate::codec::scope::ScopeStack;
use crate::codec::value::Value;
use crate::codec::{Result, StructError};

/// Runtime limits for one write pass.
#[derive(Debug, Clone)]
pub struct WriteOptions {
	/// Byte position the write starts at.
	pub offset: usize,
	/// Maximum recursive schema nesting depth.
	pub max_depth: u32,
}

impl Default for WriteOptions {
	fn default() -> Self {
		Self {
			offset: 0,
			max_depth: 128,
		}
	}
}

/// Encode a structured value into a buffer, returning the final
/// cursor position. The same schema that decoded a value re-encodes
/// it byte for byte; computed and `$tell` fields never need to be
/// supplied by the caller.
pub fn write_struct(value: &Value, schema: &Schema, buf: &mut [u8], options: &WriteOptions) -> Result<usize> {
	let mut cursor = CursorMut::new(buf);
	cursor.seek(options.offset);

	let mut scopes = ScopeStack::new();
	let mut eval = WriteEval {
		cursor,
		max_depth: options.max_depth,
	};
	eval.eval(schema, Some(value), &mut scopes, "value", 0)?;
	Ok(eval.cursor.pos())
}

struct WriteEval<'a> {
	cursor: CursorMut<'a>,
	max_depth: u32,
}

impl WriteEval<'_> {
	/// Mirror of the read evaluator. Returns the value that went into
	/// scope for the node, so later siblings resolve exactly what the
	/// read side would have seen; `None` only for an unmatched
	/// `$switch`, which writes nothing.
	fn eval(
		&mut self,
		schema: &Schema,
		value: Option<&Value>,
		scopes: &mut ScopeStack,
		field: &str,
		depth: u32,
	) -> Result<Option<Value>> {
		if depth >= self.max_depth {
			return Err(StructError::DepthExceeded { max_depth: self.max_depth });
		}

		match schema {
			Schema::Scalar(scalar) => {
				let value = require(value, field)?;
				scalar.write(&mut self.cursor, value)?;
				Ok(Some(value.clone()))
			}
			Schema::Tuple(items) => {
				let entries = as_array(require(value, field)?)?;
				let mut out = Vec::with_capacity(items.len());
				for (idx, item) in items.iter().enumerate() {
					let produced = self.eval(item, entries.get(idx), scopes, field, depth + 1)?;
					out.push(produced.unwrap_or(Value::Null));
				}
				Ok(Some(Value::Array(out)))
			}
			Schema::Record(fields) => {
				let record = match require(value, field)? {
					Value::Record(record) => record,
					other => {
						return Err(StructError::TypeMismatch {
							expected: "record",
							got: other.kind_name(),
						});
					}
				};

				let mut guard = scopes.enter();
				for schema_field in fields {
					// Hidden fields from an earlier read still resolve
					// here; only a truly absent field is an error.
					let supplied = record.get(&schema_field.name);
					if let Some(produced) =
						self.eval(&schema_field.schema, supplied, guard.stack(), &schema_field.name, depth + 1)?
					{
						guard
							.stack()
							.insert(&schema_field.name, produced, schema_field.schema.is_ignored());
					}
				}
				Ok(Some(Value::Record(guard.finish())))
			}
			Schema::Directive(directive) => self.eval_directive(directive, value, scopes, field, depth),
		}
	}

	fn eval_directive(
		&mut self,
		directive: &Directive,
		value: Option<&Value>,
		scopes: &mut ScopeStack,
		field: &str,
		depth: u32,
	) -> Result<Option<Value>> {
		match &directive.seek {
			Some(Seek::Goto(target)) => {
				let pos = target.resolve_int(scopes)?;
				if pos < 0 {
					return Err(StructError::SeekOutOfRange {
						from: self.cursor.pos(),
						delta: pos,
					});
				}
				self.cursor.seek(pos as usize);
			}
			Some(Seek::Skip(delta)) => {
				let delta = delta.resolve_int(scopes)?;
				self.cursor.skip(delta)?;
			}
			None => {}
		}

		match &directive.body {
			Body::Plain(inner) => self.eval(inner, value, scopes, field, depth + 1),
			Body::Computed { source, format } => {
				// Caller input is ignored; the value comes from scope
				// and is serialized through the wire type.
				let computed = source.resolve(scopes)?;
				self.eval(format, Some(&computed), scopes, field, depth + 1)?;
				Ok(Some(computed))
			}
			Body::Tell { format } => {
				let here = Value::U64(self.cursor.pos() as u64);
				format.write(&mut self.cursor, &here)?;
				Ok(Some(here))
			}
			Body::Text { length, encoding } => {
				let value = require(value, field)?;
				let text = value.as_str().ok_or_else(|| StructError::TypeMismatch {
					expected: "string",
					got: value.kind_name(),
				})?;
				let mut raw = encode_text(text, encoding.as_deref())?;
				match length {
					Some(length) => {
						let len = length.resolve_int(scopes)?;
						if len < 0 {
							return Err(StructError::InvalidLength { len });
						}
						// Exactly the sized unit count: truncate or
						// NUL-pad, never a partial write.
						raw.resize(len as usize, 0);
						self.cursor.write_exact(&raw)?;
					}
					None => {
						self.cursor.write_exact(&raw)?;
						self.cursor.write_u8(0)?;
					}
				}
				Ok(Some(value.clone()))
			}
			Body::Raw { length } => {
				let value = require(value, field)?;
				let Value::Bytes(bytes) = value else {
					return Err(StructError::TypeMismatch {
						expected: "bytes",
						got: value.kind_name(),
					});
				};
				let len = length.resolve_int(scopes)?;
				if len <= 0 {
					return Err(StructError::InvalidLength { len });
				}
				let mut raw = bytes.clone();
				raw.resize(len as usize, 0);
				self.cursor.write_exact(&raw)?;
				Ok(Some(value.clone()))
			}
			Body::Repeat { count, element } => {
				let count = count.resolve_int(scopes)?;
				if count < 0 {
					return Err(StructError::InvalidCount { count });
				}
				let entries = as_array(require(value, field)?)?;
				let mut out = Vec::with_capacity(count as usize);
				for idx in 0..count as usize {
					let produced = self.eval(element, entries.get(idx), scopes, field, depth + 1)?;
					out.push(produced.unwrap_or(Value::Null));
				}
				Ok(Some(Value::Array(out)))
			}
			Body::ForEach { list, alias, element } => {
				let listed = scopes.find(list)?;
				let Value::Array(items) = listed else {
					return Err(StructError::ForeachTargetNotArray { name: list.to_string() });
				};
				let items = items.clone();

				let entries = as_array(require(value, field)?)?;
				let mut out = Vec::with_capacity(items.len());
				for (idx, item) in items.into_iter().enumerate() {
					let mut guard = scopes.enter_outer(alias, item);
					let produced = self.eval(element, entries.get(idx), guard.stack(), field, depth + 1)?;
					out.push(produced.unwrap_or(Value::Null));
				}
				Ok(Some(Value::Array(out)))
			}
			Body::Switch { on, cases } => {
				let tag = on.resolve(scopes)?;
				match select_case(cases, &tag) {
					Some(case) => self.eval(&case.format, value, scopes, field, depth + 1),
					// Read leaves the field absent, so write emits
					// nothing, silently.
					None => Ok(None),
				}
			}
		}
	}
}

fn as_array(value: &Value) -> Result<&[Value]> {
	match value {
		Value::Array(items) => Ok(items),
		other => Err(StructError::TypeMismatch {
			expected: "array",
			got: other.kind_name(),
		}),
	}
}

fn require<'v>(value: Option<&'v Value>, field: &str) -> Result<&'v Value> {
	match value {
		Some(Value::Null) | None => Err(StructError::MissingFieldValue { field: field.to_owned() }),
		Some(value) => Ok(value),
	}
}
