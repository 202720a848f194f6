use crate::codec::bytes::{Cursor, decode_text};
use crate::codec::schema::{Body, Directive, Schema, Seek, select_case};
use crate::codec::scope::ScopeStack;
use crate::codec::value::Value;
use crate::codec::{Result, StructError};

/// Runtime limits for one read pass.
#[derive(Debug, Clone)]
pub struct ReadOptions {
	/// Byte position the read starts at.
	pub offset: usize,
	/// Maximum recursive schema nesting depth.
	pub max_depth: u32,
}

impl Default for ReadOptions {
	fn default() -> Self {
		Self {
			offset: 0,
			max_depth: 128,
		}
	}
}

/// Decoded value plus the end-of-pass cursor diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadReport {
	/// Decoded structured value.
	pub value: Value,
	/// Whether the cursor reached the end of the buffer.
	pub eof: bool,
	/// Final cursor position.
	pub pos: usize,
	/// Total buffer length.
	pub len: usize,
}

/// Decode one structured value from a materialized buffer.
pub fn read_struct(schema: &Schema, bytes: &[u8], options: &ReadOptions) -> Result<ReadReport> {
	let mut cursor = Cursor::new(bytes);
	cursor.seek(options.offset);

	let mut scopes = ScopeStack::new();
	let mut eval = ReadEval {
		cursor,
		max_depth: options.max_depth,
	};
	let value = eval.eval(schema, &mut scopes, 0)?.unwrap_or(Value::Null);

	Ok(ReadReport {
		value,
		eof: eval.cursor.is_eof(),
		pos: eval.cursor.pos(),
		len: eval.cursor.len(),
	})
}

/// Measure the byte size a schema occupies by running the read
/// evaluator over a zeroed scratch buffer. Every primitive reads as
/// zero, so data-dependent counts and length prefixes collapse to
/// their zero case; schemas that outgrow the scratch fail with the
/// cursor's end-of-buffer error.
pub fn size_of(schema: &Schema, scratch_capacity: usize) -> Result<usize> {
	let scratch = vec![0_u8; scratch_capacity];
	let report = read_struct(schema, &scratch, &ReadOptions::default())?;
	Ok(report.pos)
}

struct ReadEval<'a> {
	cursor: Cursor<'a>,
	max_depth: u32,
}

impl ReadEval<'_> {
	/// Evaluate one schema node. `None` means the node produced no
	/// value at all, which only an unmatched `$switch` does.
	fn eval(&mut self, schema: &Schema, scopes: &mut ScopeStack, depth: u32) -> Result<Option<Value>> {
		if depth >= self.max_depth {
			return Err(StructError::DepthExceeded { max_depth: self.max_depth });
		}

		match schema {
			Schema::Scalar(scalar) => Ok(Some(scalar.read(&mut self.cursor)?)),
			Schema::Tuple(items) => {
				let mut out = Vec::with_capacity(items.len());
				for item in items {
					let value = self.eval(item, scopes, depth + 1)?.unwrap_or(Value::Null);
					out.push(value);
				}
				Ok(Some(Value::Array(out)))
			}
			Schema::Record(fields) => {
				let mut guard = scopes.enter();
				for field in fields {
					// Declaration order is the wire order; each value
					// lands in scope immediately so later siblings can
					// resolve it.
					if let Some(value) = self.eval(&field.schema, guard.stack(), depth + 1)? {
						guard.stack().insert(&field.name, value, field.schema.is_ignored());
					}
				}
				Ok(Some(Value::Record(guard.finish())))
			}
			Schema::Directive(directive) => self.eval_directive(directive, scopes, depth),
		}
	}

	fn eval_directive(&mut self, directive: &Directive, scopes: &mut ScopeStack, depth: u32) -> Result<Option<Value>> {
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
			Body::Plain(inner) => self.eval(inner, scopes, depth + 1),
			// No bytes are consumed; the wire type only matters when
			// writing.
			Body::Computed { source, .. } => Ok(Some(source.resolve(scopes)?)),
			Body::Tell { .. } => Ok(Some(Value::U64(self.cursor.pos() as u64))),
			Body::Text { length, encoding } => {
				let raw = match length {
					Some(length) => {
						let len = length.resolve_int(scopes)?;
						if len < 0 {
							return Err(StructError::InvalidLength { len });
						}
						self.cursor.read_exact(len as usize)?
					}
					None => self.cursor.read_cstring_bytes()?,
				};
				Ok(Some(Value::String(decode_text(raw, encoding.as_deref())?)))
			}
			Body::Raw { length } => {
				let len = length.resolve_int(scopes)?;
				if len <= 0 {
					return Err(StructError::InvalidLength { len });
				}
				Ok(Some(Value::Bytes(self.cursor.read_exact(len as usize)?.to_vec())))
			}
			Body::Repeat { count, element } => {
				let count = count.resolve_int(scopes)?;
				if count < 0 {
					return Err(StructError::InvalidCount { count });
				}
				let mut out = Vec::new();
				for _ in 0..count {
					let value = self.eval(element, scopes, depth + 1)?.unwrap_or(Value::Null);
					out.push(value);
				}
				Ok(Some(Value::Array(out)))
			}
			Body::ForEach { list, alias, element } => {
				let listed = scopes.find(list)?;
				let Value::Array(items) = listed else {
					return Err(StructError::ForeachTargetNotArray { name: list.to_string() });
				};

				let items = items.clone();
				let mut out = Vec::with_capacity(items.len());
				for item in items {
					let mut guard = scopes.enter_outer(alias, item);
					let value = self.eval(element, guard.stack(), depth + 1)?.unwrap_or(Value::Null);
					out.push(value);
				}
				Ok(Some(Value::Array(out)))
			}
			Body::Switch { on, cases } => {
				let tag = on.resolve(scopes)?;
				match select_case(cases, &tag) {
					Some(case) => self.eval(&case.format, scopes, depth + 1),
					// Unmatched with no default leaves the field
					// absent; downstream schemas use this as an
					// optional-field idiom.
					None => Ok(None),
				}
			}
		}
	}
}
