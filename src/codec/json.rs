use serde_json::{Map, Number, Value as Json};

use crate::codec::value::{RecordValue, Value};

/// Convert a runtime value to JSON. Hidden record fields are omitted,
/// matching the value's enumerable field set; byte runs become number
/// arrays; non-finite floats become null.
pub fn value_to_json(value: &Value) -> Json {
	match value {
		Value::Null => Json::Null,
		Value::I64(v) => Json::Number(Number::from(*v)),
		Value::U64(v) => Json::Number(Number::from(*v)),
		Value::F32(v) => Number::from_f64(f64::from(*v)).map_or(Json::Null, Json::Number),
		Value::F64(v) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
		Value::String(v) => Json::String(v.to_string()),
		Value::Bytes(v) => Json::Array(v.iter().map(|byte| Json::Number(Number::from(*byte))).collect()),
		Value::Array(items) => Json::Array(items.iter().map(value_to_json).collect()),
		Value::Record(record) => {
			let mut map = Map::new();
			for field in record.visible_fields() {
				map.insert(field.name.to_string(), value_to_json(&field.value));
			}
			Json::Object(map)
		}
	}
}

/// Convert JSON to a runtime value. Non-negative integers become
/// unsigned, booleans become 0/1 integers, objects become records
/// with every field visible.
pub fn value_from_json(json: &Json) -> Value {
	match json {
		Json::Null => Value::Null,
		Json::Bool(v) => Value::U64(u64::from(*v)),
		Json::Number(number) => {
			if let Some(v) = number.as_u64() {
				Value::U64(v)
			} else if let Some(v) = number.as_i64() {
				Value::I64(v)
			} else {
				Value::F64(number.as_f64().unwrap_or(0.0))
			}
		}
		Json::String(v) => Value::String(v.as_str().into()),
		Json::Array(items) => Value::Array(items.iter().map(value_from_json).collect()),
		Json::Object(map) => {
			let mut record = RecordValue::new();
			for (name, child) in map {
				record.insert(name, value_from_json(child), false);
			}
			Value::Record(record)
		}
	}
}
