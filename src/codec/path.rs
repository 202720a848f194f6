use std::fmt;

use crate::codec::{Result, StructError};

/// One parsed step in a dotted reference path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
	/// Select a named record field.
	Field(String),
	/// Select a sequence element by zero-based index.
	Index(usize),
}

/// Parsed dotted reference path, e.g. `header.count` or `points.0.x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePath {
	/// Ordered steps, first step always a field name.
	pub steps: Vec<PathStep>,
}

impl ScopePath {
	/// Parse dotted reference syntax. Numeric segments select sequence
	/// elements; the leading segment must be a field name.
	pub fn parse(input: &str) -> Result<Self> {
		if input.is_empty() {
			return Err(StructError::InvalidFieldPath { path: input.to_owned() });
		}

		let mut steps = Vec::new();
		for segment in input.split('.') {
			if segment.is_empty() {
				return Err(StructError::InvalidFieldPath { path: input.to_owned() });
			}

			let bytes = segment.as_bytes();
			if bytes.iter().all(u8::is_ascii_digit) {
				let number = segment
					.parse::<usize>()
					.map_err(|_| StructError::InvalidFieldPath { path: input.to_owned() })?;
				steps.push(PathStep::Index(number));
				continue;
			}

			let starts_ok = bytes[0].is_ascii_alphabetic() || bytes[0] == b'_';
			let rest_ok = bytes.iter().all(|byte| byte.is_ascii_alphanumeric() || *byte == b'_');
			if !starts_ok || !rest_ok {
				return Err(StructError::InvalidFieldPath { path: input.to_owned() });
			}
			steps.push(PathStep::Field(segment.to_owned()));
		}

		if !matches!(steps.first(), Some(PathStep::Field(_))) {
			return Err(StructError::InvalidFieldPath { path: input.to_owned() });
		}

		Ok(Self { steps })
	}

	/// Name of the leading segment, the key searched for in scopes.
	pub fn head(&self) -> &str {
		match &self.steps[0] {
			PathStep::Field(name) => name,
			PathStep::Index(_) => unreachable!("parse rejects index-first paths"),
		}
	}
}

impl fmt::Display for ScopePath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (idx, step) in self.steps.iter().enumerate() {
			if idx > 0 {
				f.write_str(".")?;
			}
			match step {
				PathStep::Field(name) => f.write_str(name)?,
				PathStep::Index(number) => write!(f, "{number}")?,
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::{PathStep, ScopePath};

	#[test]
	fn dotted_path_with_index_segments() {
		let path = ScopePath::parse("points.0.x").unwrap();
		assert_eq!(
			path.steps,
			vec![
				PathStep::Field("points".to_owned()),
				PathStep::Index(0),
				PathStep::Field("x".to_owned()),
			]
		);
		assert_eq!(path.head(), "points");
		assert_eq!(path.to_string(), "points.0.x");
	}

	#[test]
	fn empty_and_malformed_paths_are_rejected() {
		assert!(ScopePath::parse("").is_err());
		assert!(ScopePath::parse("a..b").is_err());
		assert!(ScopePath::parse("a.b-c").is_err());
		assert!(ScopePath::parse("0.a").is_err());
	}
}
