use serde_json::Value as Json;

use crate::codec::path::ScopePath;
use crate::codec::scalar::ScalarType;
use crate::codec::scope::ScopeStack;
use crate::codec::value::Value;
use crate::codec::{Result, StructError};

/// Author-supplied layout description, decided into a closed tagged
/// shape once at construction and interpreted many times.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
	/// One primitive wire encoding.
	Scalar(ScalarType),
	/// Fixed-length ordered sequence of anonymous elements.
	Tuple(Vec<Schema>),
	/// Ordered named fields, evaluated in declaration order.
	Record(Vec<Field>),
	/// Control node wrapping a nested layout.
	Directive(Box<Directive>),
}

/// One named field of a record schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
	/// Field name, also the key later siblings resolve.
	pub name: Box<str>,
	/// Field layout.
	pub schema: Schema,
}

/// Control node: optional cursor move, scope visibility, and the
/// directive body decided from the `$`-keys at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
	/// Cursor move performed before the body produces its value.
	pub seek: Option<Seek>,
	/// Keep the value out of the enumerable output fields.
	pub ignore: bool,
	/// What the directive evaluates to.
	pub body: Body,
}

/// Cursor move requested by `$goto` or `$skip`. `$goto` wins when both
/// keys appear, matching the original evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub enum Seek {
	/// Absolute position.
	Goto(Ref),
	/// Signed displacement from the current position.
	Skip(Ref),
}

/// Directive body variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
	/// Bare `$format` wrap around a nested layout.
	Plain(Schema),
	/// `$value`: computed field, resolved from scope instead of the
	/// stream. The format is the wire type used when writing only.
	Computed {
		/// Where the value comes from.
		source: Ref,
		/// Wire type for the write side.
		format: Schema,
	},
	/// `$format: "$tell"`: the cursor position itself.
	Tell {
		/// Integer wire type the position is written through.
		format: ScalarType,
	},
	/// `$format: "string"`: sized or NUL-terminated text.
	Text {
		/// Byte count when sized; terminated when absent.
		length: Option<Ref>,
		/// Decode scheme, default utf8.
		encoding: Option<Box<str>>,
	},
	/// `$format: "buffer"`: raw byte run of a required length.
	Raw {
		/// Byte count, must resolve positive.
		length: Ref,
	},
	/// `$repeat`: the element format evaluated a counted number of
	/// times.
	Repeat {
		/// Element count.
		count: Ref,
		/// Element layout.
		element: Schema,
	},
	/// `$foreach`: the element format evaluated once per entry of a
	/// previously produced list, with the entry bound to an alias.
	ForEach {
		/// Reference to the driving list.
		list: ScopePath,
		/// Alias bound to each entry.
		alias: Box<str>,
		/// Element layout.
		element: Schema,
	},
	/// `$switch`/`$cases`: layout picked by a resolved discriminant.
	Switch {
		/// Discriminant reference.
		on: Ref,
		/// Candidate layouts in declaration order.
		cases: Vec<Case>,
	},
}

/// One `$cases` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
	/// Tag the discriminant is compared against.
	pub tag: CaseTag,
	/// Layout used when the tag matches.
	pub format: Schema,
}

/// Case tag kinds. Comparison is typed: integer tags match integer
/// discriminants, string tags match string discriminants.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseTag {
	/// Integer tag.
	Int(i64),
	/// String tag.
	Text(Box<str>),
	/// The designated `"default"` marker, used when nothing matches.
	Default,
}

/// Dynamic quantity: an integer literal used verbatim, or a dotted
/// path resolved against the scope stack on every evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Ref {
	/// Literal integer.
	Lit(i64),
	/// Symbolic reference.
	Path(ScopePath),
}

impl Ref {
	/// Resolve to a runtime value. Paths are looked up fresh each call
	/// because scope frames fill in as sibling fields are evaluated.
	pub fn resolve(&self, scopes: &ScopeStack) -> Result<Value> {
		match self {
			Ref::Lit(n) => Ok(Value::I64(*n)),
			Ref::Path(path) => Ok(scopes.find(path)?.clone()),
		}
	}

	/// Resolve to an integer, failing on non-integer values.
	pub fn resolve_int(&self, scopes: &ScopeStack) -> Result<i64> {
		let value = self.resolve(scopes)?;
		value
			.as_int()
			.and_then(|wide| i64::try_from(wide).ok())
			.ok_or_else(|| StructError::TypeMismatch {
				expected: "integer",
				got: value.kind_name(),
			})
	}

	fn from_json(json: &Json) -> Result<Self> {
		if let Some(n) = json.as_i64() {
			return Ok(Ref::Lit(n));
		}
		match json.as_str() {
			Some(text) => Ok(Ref::Path(ScopePath::parse(text)?)),
			None => Err(StructError::InvalidFieldPath { path: json.to_string() }),
		}
	}
}

/// Pick the case matching a resolved discriminant: first exact tag
/// match in declaration order, then the default marker if present.
pub fn select_case<'a>(cases: &'a [Case], tag: &Value) -> Option<&'a Case> {
	cases
		.iter()
		.find(|case| match &case.tag {
			CaseTag::Int(n) => tag.as_int() == Some(i128::from(*n)),
			CaseTag::Text(text) => tag.as_str() == Some(text),
			CaseTag::Default => false,
		})
		.or_else(|| cases.iter().find(|case| case.tag == CaseTag::Default))
}

/// Modifier keys that must accompany a primary `$format`/`$value`/
/// `$switch` key; alone they cannot describe a layout.
const MODIFIER_KEYS: &[&str] = &[
	"$repeat", "$foreach", "$cases", "$goto", "$skip", "$ignore", "$length", "$encoding", "$tell",
];

impl Schema {
	/// Parse a schema from JSON text.
	pub fn from_json_str(text: &str) -> Result<Self> {
		let json: Json = serde_json::from_str(text)?;
		Self::from_json(&json)
	}

	/// Build a schema from a JSON node in the original convention:
	/// strings are scalar type names, arrays are tuples, objects with a
	/// primary `$`-key are directives, all other objects are records.
	pub fn from_json(json: &Json) -> Result<Self> {
		match json {
			Json::String(name) => Ok(Schema::Scalar(ScalarType::parse(name)?)),
			Json::Array(items) => Ok(Schema::Tuple(items.iter().map(Self::from_json).collect::<Result<_>>()?)),
			Json::Object(map) => Self::from_object(map),
			other => Err(StructError::InvalidSchemaNode { found: json_kind(other) }),
		}
	}

	/// Whether a directive marks its value `$ignore`.
	pub fn is_ignored(&self) -> bool {
		matches!(self, Schema::Directive(directive) if directive.ignore)
	}

	fn from_object(map: &serde_json::Map<String, Json>) -> Result<Self> {
		let seek = if let Some(target) = map.get("$goto") {
			Some(Seek::Goto(Ref::from_json(target)?))
		} else if let Some(delta) = map.get("$skip") {
			Some(Seek::Skip(Ref::from_json(delta)?))
		} else {
			None
		};
		let ignore = map.get("$ignore").is_some_and(json_truthy);

		// Original precedence: $value, then $format, then $switch.
		let body = if let Some(source) = map.get("$value") {
			let format = map.get("$format").ok_or(StructError::DirectiveNeedsFormat { key: "$value" })?;
			Body::Computed {
				source: Ref::from_json(source)?,
				format: Schema::from_json(format)?,
			}
		} else if let Some(format) = map.get("$format") {
			Self::body_from_format(map, format)?
		} else if let Some(on) = map.get("$switch") {
			Body::Switch {
				on: Ref::from_json(on)?,
				cases: cases_from_json(map.get("$cases"))?,
			}
		} else {
			for key in MODIFIER_KEYS.iter().copied() {
				if map.contains_key(key) {
					return Err(StructError::DirectiveNeedsFormat { key });
				}
			}
			let fields = map
				.iter()
				.map(|(name, child)| {
					Ok(Field {
						name: name.as_str().into(),
						schema: Schema::from_json(child)?,
					})
				})
				.collect::<Result<_>>()?;
			return Ok(Schema::Record(fields));
		};

		Ok(Schema::Directive(Box::new(Directive { seek, ignore, body })))
	}

	fn body_from_format(map: &serde_json::Map<String, Json>, format: &Json) -> Result<Body> {
		match format.as_str() {
			Some("$tell") => {
				let scalar = map
					.get("$tell")
					.and_then(Json::as_str)
					.map(ScalarType::parse)
					.transpose()?
					.ok_or(StructError::TellNeedsType)?;
				if !scalar.is_integer() {
					return Err(StructError::TellNeedsType);
				}
				return Ok(Body::Tell { format: scalar });
			}
			Some("string") => {
				return Ok(Body::Text {
					length: map.get("$length").map(Ref::from_json).transpose()?,
					encoding: map.get("$encoding").and_then(Json::as_str).map(Into::into),
				});
			}
			Some("buffer") => {
				let length = map
					.get("$length")
					.map(Ref::from_json)
					.transpose()?
					.ok_or(StructError::LengthRequired)?;
				return Ok(Body::Raw { length });
			}
			_ => {}
		}

		if let Some(count) = map.get("$repeat") {
			return Ok(Body::Repeat {
				count: Ref::from_json(count)?,
				element: Schema::from_json(format)?,
			});
		}
		if let Some(spec) = map.get("$foreach") {
			let (list, alias) = parse_foreach(spec)?;
			return Ok(Body::ForEach {
				list,
				alias,
				element: Schema::from_json(format)?,
			});
		}
		Ok(Body::Plain(Schema::from_json(format)?))
	}
}

/// Split a `"listRef alias"` expression once, at construction.
fn parse_foreach(spec: &Json) -> Result<(ScopePath, Box<str>)> {
	let text = spec.as_str().unwrap_or_default();
	let mut tokens = text.split_whitespace();
	let list = tokens.next().unwrap_or_default();
	match tokens.next() {
		Some(alias) => Ok((ScopePath::parse(list)?, alias.into())),
		None => Err(StructError::ForeachAliasMissing { spec: text.to_owned() }),
	}
}

fn cases_from_json(cases: Option<&Json>) -> Result<Vec<Case>> {
	let entries = cases.and_then(Json::as_array).ok_or(StructError::SwitchNeedsCases)?;
	entries
		.iter()
		.map(|entry| {
			let map = entry.as_object().ok_or(StructError::CaseNeedsTag)?;
			let tag = case_tag_from_json(map.get("$case").ok_or(StructError::CaseNeedsTag)?)?;
			let format = Schema::from_json(map.get("$format").ok_or(StructError::CaseNeedsFormat)?)?;
			Ok(Case { tag, format })
		})
		.collect()
}

fn case_tag_from_json(json: &Json) -> Result<CaseTag> {
	if let Some(n) = json.as_i64() {
		return Ok(CaseTag::Int(n));
	}
	match json.as_str() {
		Some("default") => Ok(CaseTag::Default),
		Some(text) => Ok(CaseTag::Text(text.into())),
		None => Err(StructError::InvalidCaseTag { found: json_kind(json) }),
	}
}

fn json_truthy(json: &Json) -> bool {
	json.as_bool() == Some(true) || json.as_i64().is_some_and(|n| n != 0)
}

fn json_kind(json: &Json) -> &'static str {
	match json {
		Json::Null => "null",
		Json::Bool(_) => "boolean",
		Json::Number(_) => "number",
		Json::String(_) => "string",
		Json::Array(_) => "array",
		Json::Object(_) => "object",
	}
}
