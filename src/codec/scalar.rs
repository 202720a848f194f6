use crate::codec::bytes::{Cursor, CursorMut, Endianness, decode_text};
use crate::codec::value::Value;
use crate::codec::{Result, StructError};

/// Closed vocabulary of primitive wire encodings. Multi-byte numerics
/// carry their byte order; the unsuffixed names default to
/// little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
	/// Unsigned 8-bit (`byte`/`uint8`).
	U8,
	/// Signed 8-bit (`sbyte`/`int8`).
	I8,
	/// Unsigned 16-bit.
	U16(Endianness),
	/// Signed 16-bit.
	I16(Endianness),
	/// Unsigned 32-bit.
	U32(Endianness),
	/// Signed 32-bit.
	I32(Endianness),
	/// Unsigned 64-bit, full range preserved.
	U64(Endianness),
	/// Signed 64-bit.
	I64(Endianness),
	/// IEEE-754 32-bit (`float`).
	F32(Endianness),
	/// IEEE-754 64-bit (`double`).
	F64(Endianness),
	/// Text up to a NUL terminator, terminator consumed.
	String0,
	/// Text with a 7-bit encoded byte-length prefix.
	String7,
	/// Fixed-width text of exactly `N` bytes, NUL-padded.
	Char(usize),
}

impl ScalarType {
	/// Parse a case-sensitive type name from the vocabulary. The
	/// reserved `string`/`buffer` names are rejected here; they are
	/// only valid as a directive `$format`.
	pub fn parse(name: &str) -> Result<Self> {
		if let Some(rest) = name.strip_prefix("char_") {
			let len = rest
				.parse::<usize>()
				.map_err(|_| StructError::UnknownScalarType { name: name.to_owned() })?;
			return Ok(ScalarType::Char(len.max(1)));
		}

		match name {
			"byte" | "uint8" => Ok(ScalarType::U8),
			"sbyte" | "int8" => Ok(ScalarType::I8),
			"string0" => Ok(ScalarType::String0),
			"string7" => Ok(ScalarType::String7),
			"string" | "buffer" => Err(StructError::ReservedTypeAsScalar { name: name.to_owned() }),
			_ => {
				// Base names are tried before stripping so that
				// `double` never loses its trailing "le".
				if let Some(scalar) = base_scalar(name, Endianness::Little) {
					return Ok(scalar);
				}
				if let Some(base) = name.strip_suffix("le")
					&& let Some(scalar) = base_scalar(base, Endianness::Little)
				{
					return Ok(scalar);
				}
				if let Some(base) = name.strip_suffix("be")
					&& let Some(scalar) = base_scalar(base, Endianness::Big)
				{
					return Ok(scalar);
				}
				Err(StructError::UnknownScalarType { name: name.to_owned() })
			}
		}
	}

	/// Base name used in error payloads.
	pub fn name(&self) -> &'static str {
		match self {
			ScalarType::U8 => "byte",
			ScalarType::I8 => "sbyte",
			ScalarType::U16(_) => "uint16",
			ScalarType::I16(_) => "int16",
			ScalarType::U32(_) => "uint32",
			ScalarType::I32(_) => "int32",
			ScalarType::U64(_) => "uint64",
			ScalarType::I64(_) => "int64",
			ScalarType::F32(_) => "float",
			ScalarType::F64(_) => "double",
			ScalarType::String0 => "string0",
			ScalarType::String7 => "string7",
			ScalarType::Char(_) => "char",
		}
	}

	/// Whether the scalar holds an integer, as required for `$tell`
	/// sub-types.
	pub fn is_integer(&self) -> bool {
		matches!(
			self,
			ScalarType::U8
				| ScalarType::I8
				| ScalarType::U16(_)
				| ScalarType::I16(_)
				| ScalarType::U32(_)
				| ScalarType::I32(_)
				| ScalarType::U64(_)
				| ScalarType::I64(_)
		)
	}

	/// Read one value of this scalar from the cursor.
	pub fn read(&self, cursor: &mut Cursor<'_>) -> Result<Value> {
		Ok(match *self {
			ScalarType::U8 => Value::U64(u64::from(cursor.read_u8()?)),
			ScalarType::I8 => Value::I64(i64::from(cursor.read_i8()?)),
			ScalarType::U16(endianness) => Value::U64(u64::from(cursor.read_u16(endianness)?)),
			ScalarType::I16(endianness) => Value::I64(i64::from(cursor.read_i16(endianness)?)),
			ScalarType::U32(endianness) => Value::U64(u64::from(cursor.read_u32(endianness)?)),
			ScalarType::I32(endianness) => Value::I64(i64::from(cursor.read_i32(endianness)?)),
			ScalarType::U64(endianness) => Value::U64(cursor.read_u64(endianness)?),
			ScalarType::I64(endianness) => Value::I64(cursor.read_i64(endianness)?),
			ScalarType::F32(endianness) => Value::F32(cursor.read_f32(endianness)?),
			ScalarType::F64(endianness) => Value::F64(cursor.read_f64(endianness)?),
			ScalarType::String0 => {
				let raw = cursor.read_cstring_bytes()?;
				Value::String(decode_text(raw, None)?)
			}
			ScalarType::String7 => {
				let len = cursor.read_varint7()?;
				let raw = cursor.read_exact(len)?;
				Value::String(decode_text(raw, None)?)
			}
			ScalarType::Char(len) => {
				let raw = cursor.read_exact(len)?;
				let text = decode_text(raw, None)?;
				Value::String(text.trim_end_matches('\0').into())
			}
		})
	}

	/// Write one value of this scalar through the cursor, range- and
	/// shape-checking the runtime value first.
	pub fn write(&self, cursor: &mut CursorMut<'_>, value: &Value) -> Result<()> {
		match *self {
			ScalarType::U8 => cursor.write_u8(self.int_in_range(value, 0, u8::MAX as i128)? as u8),
			ScalarType::I8 => cursor.write_i8(self.int_in_range(value, i8::MIN as i128, i8::MAX as i128)? as i8),
			ScalarType::U16(endianness) => {
				cursor.write_u16(self.int_in_range(value, 0, u16::MAX as i128)? as u16, endianness)
			}
			ScalarType::I16(endianness) => {
				cursor.write_i16(self.int_in_range(value, i16::MIN as i128, i16::MAX as i128)? as i16, endianness)
			}
			ScalarType::U32(endianness) => {
				cursor.write_u32(self.int_in_range(value, 0, u32::MAX as i128)? as u32, endianness)
			}
			ScalarType::I32(endianness) => {
				cursor.write_i32(self.int_in_range(value, i32::MIN as i128, i32::MAX as i128)? as i32, endianness)
			}
			ScalarType::U64(endianness) => {
				cursor.write_u64(self.int_in_range(value, 0, u64::MAX as i128)? as u64, endianness)
			}
			ScalarType::I64(endianness) => {
				cursor.write_i64(self.int_in_range(value, i64::MIN as i128, i64::MAX as i128)? as i64, endianness)
			}
			ScalarType::F32(endianness) => cursor.write_f32(self.number(value)? as f32, endianness),
			ScalarType::F64(endianness) => cursor.write_f64(self.number(value)?, endianness),
			ScalarType::String0 => {
				let text = self.text(value)?;
				cursor.write_exact(text.as_bytes())?;
				cursor.write_u8(0)
			}
			ScalarType::String7 => {
				let text = self.text(value)?;
				cursor.write_varint7(text.len())?;
				cursor.write_exact(text.as_bytes())
			}
			ScalarType::Char(len) => {
				let text = self.text(value)?;
				let mut raw = text.as_bytes().to_vec();
				raw.resize(len, 0);
				cursor.write_exact(&raw)
			}
		}
	}

	fn int_in_range(&self, value: &Value, min: i128, max: i128) -> Result<i128> {
		let wide = value.as_int().ok_or_else(|| StructError::TypeMismatch {
			expected: "integer",
			got: value.kind_name(),
		})?;
		if wide < min || wide > max {
			return Err(StructError::ValueOutOfRange {
				scalar: self.name(),
				value: wide,
			});
		}
		Ok(wide)
	}

	fn number(&self, value: &Value) -> Result<f64> {
		value.as_f64().ok_or_else(|| StructError::TypeMismatch {
			expected: "number",
			got: value.kind_name(),
		})
	}

	fn text<'v>(&self, value: &'v Value) -> Result<&'v str> {
		value.as_str().ok_or_else(|| StructError::TypeMismatch {
			expected: "string",
			got: value.kind_name(),
		})
	}
}

/// Multi-byte base names that take an endianness suffix.
fn base_scalar(base: &str, endianness: Endianness) -> Option<ScalarType> {
	Some(match base {
		"int16" => ScalarType::I16(endianness),
		"uint16" => ScalarType::U16(endianness),
		"int32" => ScalarType::I32(endianness),
		"uint32" => ScalarType::U32(endianness),
		"int64" => ScalarType::I64(endianness),
		"uint64" => ScalarType::U64(endianness),
		"float" => ScalarType::F32(endianness),
		"double" => ScalarType::F64(endianness),
		_ => return None,
	})
}

#[cfg(test)]
mod tests {
	use super::ScalarType;
	use crate::codec::StructError;
	use crate::codec::bytes::{Cursor, CursorMut, Endianness};
	use crate::codec::value::Value;

	#[test]
	fn vocabulary_names_parse_with_endianness_suffixes() {
		assert_eq!(ScalarType::parse("byte").unwrap(), ScalarType::U8);
		assert_eq!(ScalarType::parse("uint8").unwrap(), ScalarType::U8);
		assert_eq!(ScalarType::parse("sbyte").unwrap(), ScalarType::I8);
		assert_eq!(ScalarType::parse("uint16").unwrap(), ScalarType::U16(Endianness::Little));
		assert_eq!(ScalarType::parse("int32be").unwrap(), ScalarType::I32(Endianness::Big));
		assert_eq!(ScalarType::parse("uint64le").unwrap(), ScalarType::U64(Endianness::Little));
		assert_eq!(ScalarType::parse("double").unwrap(), ScalarType::F64(Endianness::Little));
		assert_eq!(ScalarType::parse("doublebe").unwrap(), ScalarType::F64(Endianness::Big));
		assert_eq!(ScalarType::parse("floatle").unwrap(), ScalarType::F32(Endianness::Little));
		assert_eq!(ScalarType::parse("char_4").unwrap(), ScalarType::Char(4));
		// The original clamps char length to at least one byte.
		assert_eq!(ScalarType::parse("char_0").unwrap(), ScalarType::Char(1));
	}

	#[test]
	fn reserved_and_unknown_names_are_rejected() {
		assert!(matches!(
			ScalarType::parse("string"),
			Err(StructError::ReservedTypeAsScalar { .. })
		));
		assert!(matches!(
			ScalarType::parse("buffer"),
			Err(StructError::ReservedTypeAsScalar { .. })
		));
		assert!(matches!(
			ScalarType::parse("word"),
			Err(StructError::UnknownScalarType { .. })
		));
		assert!(matches!(
			ScalarType::parse("char_x"),
			Err(StructError::UnknownScalarType { .. })
		));
	}

	#[test]
	fn unsigned_64_bit_reads_keep_the_full_range() {
		let bytes = [0xFF_u8; 8];
		let mut cursor = Cursor::new(&bytes);
		assert_eq!(
			ScalarType::U64(Endianness::Little).read(&mut cursor).unwrap(),
			Value::U64(u64::MAX)
		);
		cursor.seek(0);
		assert_eq!(
			ScalarType::I64(Endianness::Little).read(&mut cursor).unwrap(),
			Value::I64(-1)
		);
	}

	#[test]
	fn write_checks_integer_range() {
		let mut buf = [0_u8; 1];
		let mut cursor = CursorMut::new(&mut buf);
		let err = ScalarType::U8.write(&mut cursor, &Value::U64(256)).unwrap_err();
		assert!(matches!(err, StructError::ValueOutOfRange { scalar: "byte", value: 256 }));
	}

	#[test]
	fn char_writes_pad_and_reads_trim() {
		let mut buf = [0xAA_u8; 4];
		{
			let mut cursor = CursorMut::new(&mut buf);
			ScalarType::Char(4).write(&mut cursor, &Value::String("hi".into())).unwrap();
		}
		assert_eq!(buf, *b"hi\0\0");

		let mut cursor = Cursor::new(&buf);
		assert_eq!(
			ScalarType::Char(4).read(&mut cursor).unwrap(),
			Value::String("hi".into())
		);
	}

	#[test]
	fn string7_round_trips_through_its_prefix() {
		let mut buf = [0_u8; 6];
		{
			let mut cursor = CursorMut::new(&mut buf);
			ScalarType::String7.write(&mut cursor, &Value::String("hello".into())).unwrap();
		}
		assert_eq!(&buf, b"\x05hello");
	}
}
