use crate::codec::{Result, StructError};

/// Byte order for multi-byte scalar access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
	/// Least significant byte first.
	Little,
	/// Most significant byte first.
	Big,
}

/// Maximum bytes in a 7-bit encoded length prefix.
const VARINT7_MAX_BYTES: usize = 5;

/// Simple bounded read cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return total buffer length.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Return whether the buffer is empty.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Return whether the cursor sits at or past the end.
	pub fn is_eof(&self) -> bool {
		self.pos >= self.bytes.len()
	}

	/// Move to an absolute offset. Seeking past the end is allowed;
	/// the next read fails instead.
	pub fn seek(&mut self, pos: usize) {
		self.pos = pos;
	}

	/// Move by a signed delta relative to the current position.
	pub fn skip(&mut self, delta: i64) -> Result<()> {
		let target = self.pos as i64 + delta;
		if target < 0 {
			return Err(StructError::SeekOutOfRange { from: self.pos, delta });
		}
		self.pos = target as usize;
		Ok(())
	}

	/// Read exactly `n` bytes and advance the cursor. A cursor seeked
	/// past the end fails here, even for zero-length reads.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if self.pos > self.bytes.len() || n > self.remaining() {
			return Err(StructError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read an unsigned 8-bit value.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a signed 8-bit value.
	pub fn read_i8(&mut self) -> Result<i8> {
		Ok(self.read_exact(1)?[0] as i8)
	}

	/// Read a `u16` using the selected endianness.
	pub fn read_u16(&mut self, endianness: Endianness) -> Result<u16> {
		let raw = self.read_exact(2)?;
		let mut buf = [0_u8; 2];
		buf.copy_from_slice(raw);
		Ok(match endianness {
			Endianness::Little => u16::from_le_bytes(buf),
			Endianness::Big => u16::from_be_bytes(buf),
		})
	}

	/// Read an `i16` using the selected endianness.
	pub fn read_i16(&mut self, endianness: Endianness) -> Result<i16> {
		Ok(self.read_u16(endianness)? as i16)
	}

	/// Read a `u32` using the selected endianness.
	pub fn read_u32(&mut self, endianness: Endianness) -> Result<u32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(match endianness {
			Endianness::Little => u32::from_le_bytes(buf),
			Endianness::Big => u32::from_be_bytes(buf),
		})
	}

	/// Read an `i32` using the selected endianness.
	pub fn read_i32(&mut self, endianness: Endianness) -> Result<i32> {
		Ok(self.read_u32(endianness)? as i32)
	}

	/// Read a `u64` using the selected endianness.
	pub fn read_u64(&mut self, endianness: Endianness) -> Result<u64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(match endianness {
			Endianness::Little => u64::from_le_bytes(buf),
			Endianness::Big => u64::from_be_bytes(buf),
		})
	}

	/// Read an `i64` using the selected endianness.
	pub fn read_i64(&mut self, endianness: Endianness) -> Result<i64> {
		Ok(self.read_u64(endianness)? as i64)
	}

	/// Read an IEEE-754 32-bit float using the selected endianness.
	pub fn read_f32(&mut self, endianness: Endianness) -> Result<f32> {
		Ok(f32::from_bits(self.read_u32(endianness)?))
	}

	/// Read an IEEE-754 64-bit float using the selected endianness.
	pub fn read_f64(&mut self, endianness: Endianness) -> Result<f64> {
		Ok(f64::from_bits(self.read_u64(endianness)?))
	}

	/// Read bytes up to a NUL terminator or the end of the buffer.
	/// The terminator is consumed but not returned. A cursor seeked
	/// past the end fails like any other read.
	pub fn read_cstring_bytes(&mut self) -> Result<&'a [u8]> {
		if self.pos > self.bytes.len() {
			return Err(StructError::UnexpectedEof {
				at: self.pos,
				need: 1,
				rem: 0,
			});
		}

		let start = self.pos;
		let rem = &self.bytes[start..];
		match rem.iter().position(|byte| *byte == 0) {
			Some(rel_end) => {
				let end = start + rel_end;
				self.pos = end + 1;
				Ok(&self.bytes[start..end])
			}
			None => {
				self.pos = self.bytes.len();
				Ok(rem)
			}
		}
	}

	/// Read a 7-bit encoded length prefix (low groups first, high bit
	/// marks continuation).
	pub fn read_varint7(&mut self) -> Result<usize> {
		let at = self.pos;
		let mut value = 0_u64;
		for group in 0..VARINT7_MAX_BYTES {
			let byte = self.read_u8()?;
			value |= u64::from(byte & 0x7F) << (7 * group);
			if byte & 0x80 == 0 {
				return Ok(value as usize);
			}
		}
		Err(StructError::VarintTooLong { at })
	}
}

/// Bounded write cursor over a mutable byte slice.
pub struct CursorMut<'a> {
	bytes: &'a mut [u8],
	pos: usize,
}

impl<'a> CursorMut<'a> {
	/// Create a write cursor at position 0.
	pub fn new(bytes: &'a mut [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return total buffer length.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Return whether the buffer is empty.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Return remaining writable bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Move to an absolute offset.
	pub fn seek(&mut self, pos: usize) {
		self.pos = pos;
	}

	/// Move by a signed delta relative to the current position.
	pub fn skip(&mut self, delta: i64) -> Result<()> {
		let target = self.pos as i64 + delta;
		if target < 0 {
			return Err(StructError::SeekOutOfRange { from: self.pos, delta });
		}
		self.pos = target as usize;
		Ok(())
	}

	/// Write all of `raw` and advance the cursor. A cursor seeked past
	/// the end fails here, even for zero-length writes.
	pub fn write_exact(&mut self, raw: &[u8]) -> Result<()> {
		if self.pos > self.bytes.len() || raw.len() > self.remaining() {
			return Err(StructError::UnexpectedEof {
				at: self.pos,
				need: raw.len(),
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += raw.len();
		self.bytes[start..self.pos].copy_from_slice(raw);
		Ok(())
	}

	/// Write an unsigned 8-bit value.
	pub fn write_u8(&mut self, value: u8) -> Result<()> {
		self.write_exact(&[value])
	}

	/// Write a signed 8-bit value.
	pub fn write_i8(&mut self, value: i8) -> Result<()> {
		self.write_exact(&[value as u8])
	}

	/// Write a `u16` using the selected endianness.
	pub fn write_u16(&mut self, value: u16, endianness: Endianness) -> Result<()> {
		match endianness {
			Endianness::Little => self.write_exact(&value.to_le_bytes()),
			Endianness::Big => self.write_exact(&value.to_be_bytes()),
		}
	}

	/// Write an `i16` using the selected endianness.
	pub fn write_i16(&mut self, value: i16, endianness: Endianness) -> Result<()> {
		self.write_u16(value as u16, endianness)
	}

	/// Write a `u32` using the selected endianness.
	pub fn write_u32(&mut self, value: u32, endianness: Endianness) -> Result<()> {
		match endianness {
			Endianness::Little => self.write_exact(&value.to_le_bytes()),
			Endianness::Big => self.write_exact(&value.to_be_bytes()),
		}
	}

	/// Write an `i32` using the selected endianness.
	pub fn write_i32(&mut self, value: i32, endianness: Endianness) -> Result<()> {
		self.write_u32(value as u32, endianness)
	}

	/// Write a `u64` using the selected endianness.
	pub fn write_u64(&mut self, value: u64, endianness: Endianness) -> Result<()> {
		match endianness {
			Endianness::Little => self.write_exact(&value.to_le_bytes()),
			Endianness::Big => self.write_exact(&value.to_be_bytes()),
		}
	}

	/// Write an `i64` using the selected endianness.
	pub fn write_i64(&mut self, value: i64, endianness: Endianness) -> Result<()> {
		self.write_u64(value as u64, endianness)
	}

	/// Write an IEEE-754 32-bit float using the selected endianness.
	pub fn write_f32(&mut self, value: f32, endianness: Endianness) -> Result<()> {
		self.write_u32(value.to_bits(), endianness)
	}

	/// Write an IEEE-754 64-bit float using the selected endianness.
	pub fn write_f64(&mut self, value: f64, endianness: Endianness) -> Result<()> {
		self.write_u64(value.to_bits(), endianness)
	}

	/// Write a 7-bit encoded length prefix.
	pub fn write_varint7(&mut self, value: usize) -> Result<()> {
		let mut rest = value as u64;
		loop {
			let group = (rest & 0x7F) as u8;
			rest >>= 7;
			if rest == 0 {
				return self.write_u8(group);
			}
			self.write_u8(group | 0x80)?;
		}
	}
}

/// Decode raw bytes as text in the named encoding (default `utf8`).
pub fn decode_text(bytes: &[u8], encoding: Option<&str>) -> Result<Box<str>> {
	match encoding.unwrap_or("utf8") {
		"utf8" | "utf-8" => Ok(String::from_utf8_lossy(bytes).into_owned().into_boxed_str()),
		"ascii" => Ok(bytes.iter().map(|byte| char::from(byte & 0x7F)).collect::<String>().into_boxed_str()),
		"latin1" | "binary" => Ok(bytes.iter().map(|byte| char::from(*byte)).collect::<String>().into_boxed_str()),
		other => Err(StructError::UnsupportedEncoding { encoding: other.to_owned() }),
	}
}

/// Encode text as raw bytes in the named encoding (default `utf8`).
pub fn encode_text(text: &str, encoding: Option<&str>) -> Result<Vec<u8>> {
	match encoding.unwrap_or("utf8") {
		"utf8" | "utf-8" => Ok(text.as_bytes().to_vec()),
		"ascii" => Ok(text.chars().map(|c| (c as u32 & 0x7F) as u8).collect()),
		"latin1" | "binary" => Ok(text.chars().map(|c| (c as u32 & 0xFF) as u8).collect()),
		other => Err(StructError::UnsupportedEncoding { encoding: other.to_owned() }),
	}
}
