use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, StructError>;

/// Errors produced while building schemas and reading or writing structs.
#[derive(Debug, Error)]
pub enum StructError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Schema or value text was not valid JSON.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Not enough bytes remained for a requested read or write.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the access was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// A seek or skip resolved to a position before the buffer start.
	#[error("seek out of range: delta {delta} from offset {from}")]
	SeekOutOfRange {
		/// Cursor position before the move.
		from: usize,
		/// Requested signed displacement.
		delta: i64,
	},
	/// A 7-bit length prefix ran past its maximum byte count.
	#[error("malformed 7-bit length prefix at offset {at}")]
	VarintTooLong {
		/// Byte offset of the first prefix byte.
		at: usize,
	},
	/// Requested text encoding is not supported.
	#[error("unsupported encoding: {encoding}")]
	UnsupportedEncoding {
		/// Encoding name given in the schema.
		encoding: String,
	},
	/// Scalar type name is not in the vocabulary.
	#[error("unknown struct type: '{name}'")]
	UnknownScalarType {
		/// Offending type name.
		name: String,
	},
	/// `string`/`buffer` used as a bare scalar name.
	#[error("'{name}' is reserved and only valid as a directive $format")]
	ReservedTypeAsScalar {
		/// Reserved name that was used.
		name: String,
	},
	/// JSON schema node of a kind that cannot describe a layout.
	#[error("schema node must be a type name, array, or object, got {found}")]
	InvalidSchemaNode {
		/// JSON kind that was found.
		found: &'static str,
	},
	/// Reference path syntax is invalid.
	#[error("invalid field path: {path}")]
	InvalidFieldPath {
		/// Original path string.
		path: String,
	},
	/// A directive key needs an accompanying `$format`.
	#[error("directive key '{key}' requires a $format")]
	DirectiveNeedsFormat {
		/// Directive key missing its format.
		key: &'static str,
	},
	/// `$format: "$tell"` without an integer `$tell` sub-type.
	#[error("\"$tell\" format requires an integer $tell sub-type")]
	TellNeedsType,
	/// `$switch` without a `$cases` list.
	#[error("$switch requires a $cases array")]
	SwitchNeedsCases,
	/// A `$cases` entry is missing its `$case` tag.
	#[error("case entry requires a $case tag")]
	CaseNeedsTag,
	/// A `$cases` entry is missing its `$format`.
	#[error("case entry requires a $format")]
	CaseNeedsFormat,
	/// A `$case` tag of a kind that cannot be compared.
	#[error("case tag must be an integer or string, got {found}")]
	InvalidCaseTag {
		/// JSON kind that was found.
		found: &'static str,
	},
	/// A `$length` is required but was not given.
	#[error("when $format is \"buffer\", $length is required")]
	LengthRequired,
	/// A resolved `$length` was not usable.
	#[error("invalid length: {len}")]
	InvalidLength {
		/// Resolved length value.
		len: i64,
	},
	/// A resolved `$repeat` count was negative.
	#[error("repeat count must be non-negative, got {count}")]
	InvalidCount {
		/// Resolved count value.
		count: i64,
	},
	/// Symbolic lookup failed in every scope frame.
	#[error("'{name}' not found in scope")]
	ReferenceNotFound {
		/// First path segment that was searched for.
		name: String,
	},
	/// `$foreach` target resolved to a non-array value.
	#[error("$foreach: '{name}' must be an array")]
	ForeachTargetNotArray {
		/// Referenced list name.
		name: String,
	},
	/// `$foreach` expression has no item alias token.
	#[error("$foreach: item alias is missing, e.g. 'a' in $foreach: \"{spec} a\"")]
	ForeachAliasMissing {
		/// Original foreach expression.
		spec: String,
	},
	/// Write-side value for a required field is absent.
	#[error("missing value for field '{field}'")]
	MissingFieldValue {
		/// Schema field whose value was absent.
		field: String,
	},
	/// Runtime value shape does not match what the schema expects.
	#[error("type mismatch: expected {expected}, got {got}")]
	TypeMismatch {
		/// Expected logical value kind.
		expected: &'static str,
		/// Actual logical value kind.
		got: &'static str,
	},
	/// Write-side integer does not fit the target scalar width.
	#[error("value {value} out of range for {scalar}")]
	ValueOutOfRange {
		/// Target scalar name.
		scalar: &'static str,
		/// Offending value.
		value: i128,
	},
	/// Evaluator recursion depth exceeded configured limit.
	#[error("schema depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
}
