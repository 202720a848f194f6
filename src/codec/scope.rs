use crate::codec::path::{PathStep, ScopePath};
use crate::codec::value::{RecordValue, Value};
use crate::codec::{Result, StructError};

/// Stack of in-progress record scopes used for symbolic reference
/// resolution during one read or write pass. Innermost frame last.
#[derive(Debug, Default)]
pub struct ScopeStack {
	frames: Vec<Frame>,
}

#[derive(Debug)]
enum Frame {
	/// A record currently being filled in field by field.
	Record(RecordValue),
	/// Synthetic single-binding frame for a `$foreach` item alias.
	Alias { name: Box<str>, value: Value },
}

impl Frame {
	fn get(&self, key: &str) -> Option<&Value> {
		match self {
			Frame::Record(record) => record.get(key),
			Frame::Alias { name, value } => (&**name == key).then_some(value),
		}
	}
}

impl ScopeStack {
	/// Create an empty stack.
	pub fn new() -> Self {
		Self { frames: Vec::new() }
	}

	/// Number of live frames.
	pub fn depth(&self) -> usize {
		self.frames.len()
	}

	/// Push an empty record frame. The returned guard pops it again on
	/// drop; call [`ScopeGuard::finish`] to pop and keep the record.
	pub fn enter(&mut self) -> ScopeGuard<'_> {
		self.frames.push(Frame::Record(RecordValue::new()));
		ScopeGuard {
			stack: self,
			outer: false,
			armed: true,
		}
	}

	/// Push a single-binding alias frame at the *outermost* end of the
	/// chain, so every existing frame shadows it.
	pub fn enter_outer(&mut self, alias: &str, value: Value) -> ScopeGuard<'_> {
		self.frames.insert(
			0,
			Frame::Alias {
				name: alias.into(),
				value,
			},
		);
		ScopeGuard {
			stack: self,
			outer: true,
			armed: true,
		}
	}

	/// Add a field to the innermost record frame so later siblings can
	/// resolve it.
	pub fn insert(&mut self, name: &str, value: Value, hidden: bool) {
		if let Some(Frame::Record(record)) = self.frames.last_mut() {
			record.insert(name, value, hidden);
		}
	}

	/// Resolve a dotted reference path. The leading segment is searched
	/// innermost to outermost for the first frame holding a non-null
	/// value under that name; the remaining segments are then walked
	/// from that value. Hidden fields resolve like any other.
	pub fn find(&self, path: &ScopePath) -> Result<&Value> {
		let head = path.head();
		for frame in self.frames.iter().rev() {
			match frame.get(head) {
				Some(Value::Null) | None => continue,
				Some(value) => return walk_rest(value, path),
			}
		}
		Err(StructError::ReferenceNotFound { name: head.to_owned() })
	}
}

fn walk_rest<'a>(start: &'a Value, path: &ScopePath) -> Result<&'a Value> {
	let mut current = start;
	for step in &path.steps[1..] {
		let next = match (step, current) {
			(PathStep::Field(name), Value::Record(record)) => record.get(name),
			(PathStep::Index(idx), Value::Array(items)) => items.get(*idx),
			_ => None,
		};
		current = next.ok_or_else(|| StructError::ReferenceNotFound { name: path.to_string() })?;
	}
	Ok(current)
}

/// Guard keeping a pushed frame paired with its pop on every exit
/// path, success or error.
#[derive(Debug)]
pub struct ScopeGuard<'a> {
	stack: &'a mut ScopeStack,
	outer: bool,
	armed: bool,
}

impl ScopeGuard<'_> {
	/// Access the underlying stack while the frame is live.
	pub fn stack(&mut self) -> &mut ScopeStack {
		self.stack
	}

	/// Pop the frame and return the record built inside it. Alias
	/// frames hold no record and yield an empty one.
	pub fn finish(mut self) -> RecordValue {
		self.armed = false;
		if self.outer {
			if !self.stack.frames.is_empty() {
				self.stack.frames.remove(0);
			}
			return RecordValue::new();
		}
		match self.stack.frames.pop() {
			Some(Frame::Record(record)) => record,
			_ => RecordValue::new(),
		}
	}
}

impl Drop for ScopeGuard<'_> {
	fn drop(&mut self) {
		if !self.armed {
			return;
		}
		if self.outer {
			if !self.stack.frames.is_empty() {
				self.stack.frames.remove(0);
			}
		} else {
			self.stack.frames.pop();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::ScopeStack;
	use crate::codec::StructError;
	use crate::codec::path::ScopePath;
	use crate::codec::value::Value;

	fn path(text: &str) -> ScopePath {
		ScopePath::parse(text).expect("path parses")
	}

	#[test]
	fn inner_frames_shadow_outer_ones() {
		let mut scopes = ScopeStack::new();
		let mut outer = scopes.enter();
		outer.stack().insert("x", Value::U64(1), false);

		{
			let mut inner = outer.stack().enter();
			inner.stack().insert("x", Value::U64(2), false);
			assert_eq!(inner.stack().find(&path("x")).unwrap(), &Value::U64(2));
		}

		assert_eq!(outer.stack().find(&path("x")).unwrap(), &Value::U64(1));
	}

	#[test]
	fn alias_frames_sit_at_the_outermost_end() {
		let mut scopes = ScopeStack::new();
		let mut record = scopes.enter();
		record.stack().insert("n", Value::U64(7), false);

		let mut alias = record.stack().enter_outer("n", Value::U64(99));
		// The record frame still wins.
		assert_eq!(alias.stack().find(&path("n")).unwrap(), &Value::U64(7));

		let mut other = alias.stack().enter_outer("item", Value::U64(3));
		assert_eq!(other.stack().find(&path("item")).unwrap(), &Value::U64(3));
	}

	#[test]
	fn guard_pops_its_frame_on_drop() {
		let mut scopes = ScopeStack::new();
		{
			let mut guard = scopes.enter();
			guard.stack().insert("a", Value::U64(1), false);
			assert_eq!(guard.stack().depth(), 1);
		}
		assert_eq!(scopes.depth(), 0);
	}

	#[test]
	fn null_entries_do_not_satisfy_lookup() {
		let mut scopes = ScopeStack::new();
		let mut outer = scopes.enter();
		outer.stack().insert("v", Value::U64(5), false);

		let mut inner = outer.stack().enter();
		inner.stack().insert("v", Value::Null, false);
		assert_eq!(inner.stack().find(&path("v")).unwrap(), &Value::U64(5));
	}

	#[test]
	fn missing_name_reports_the_head_segment() {
		let mut scopes = ScopeStack::new();
		let mut guard = scopes.enter();
		let err = guard.stack().find(&path("nope.deep")).unwrap_err();
		match err {
			StructError::ReferenceNotFound { name } => assert_eq!(name, "nope"),
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn nested_path_walks_records_and_arrays() {
		let mut scopes = ScopeStack::new();
		let mut guard = scopes.enter();

		let mut point = crate::codec::value::RecordValue::new();
		point.insert("x", Value::U64(3), false);
		guard.stack().insert("points", Value::Array(vec![Value::Record(point)]), false);

		assert_eq!(guard.stack().find(&path("points.0.x")).unwrap(), &Value::U64(3));
		assert!(guard.stack().find(&path("points.1.x")).is_err());
	}
}
