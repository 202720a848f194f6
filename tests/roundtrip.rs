#![allow(missing_docs)]

use structbuf::codec::{ReadOptions, Schema, Value, WriteOptions, read_struct, size_of, write_struct};

fn schema(text: &str) -> Schema {
	Schema::from_json_str(text).expect("schema parses")
}

/// Read `bytes`, write the decoded value back through the same
/// schema, and check the consumed region reproduces byte for byte.
fn roundtrip(schema_text: &str, bytes: &[u8]) -> (Value, usize) {
	let parsed = schema(schema_text);
	let report = read_struct(&parsed, bytes, &ReadOptions::default()).expect("read succeeds");

	let mut out = vec![0_u8; bytes.len().max(1)];
	let written = write_struct(&report.value, &parsed, &mut out, &WriteOptions::default()).expect("write succeeds");

	assert_eq!(written, report.pos, "write must consume what read consumed");
	assert_eq!(&out[..written], &bytes[..report.pos], "round-trip must be byte-exact");
	(report.value, written)
}

/// Append a 7-bit length-prefixed string, the `string7` wire form.
fn put7(buf: &mut Vec<u8>, text: &str) {
	buf.push(u8::try_from(text.len()).expect("short test string"));
	buf.extend_from_slice(text.as_bytes());
}

#[test]
fn scalar_mix_round_trips() {
	let text = r#"{
		"a": "byte",
		"b": "int16be",
		"c": "uint32",
		"d": "int64",
		"e": "float",
		"f": "double",
		"tag": "char_4",
		"name": "string7",
		"note": "string0"
	}"#;
	let mut bytes = vec![0x7F, 0x12, 0x34, 1, 0, 0, 0];
	bytes.extend_from_slice(&(-5_i64).to_le_bytes());
	bytes.extend_from_slice(&1.5_f32.to_le_bytes());
	bytes.extend_from_slice(&(-2.25_f64).to_le_bytes());
	bytes.extend_from_slice(b"ab\0\0");
	put7(&mut bytes, "seven");
	bytes.extend_from_slice(b"end\0");

	roundtrip(text, &bytes);
}

#[test]
fn persons_round_trip_restores_hidden_counters() {
	let text = r#"{
		"numPersons": {"$format": "byte", "$ignore": true},
		"persons": {
			"$repeat": "numPersons",
			"$format": {
				"firstName": "string7",
				"numHobbies": {"$ignore": true, "$format": "byte"},
				"hobbies": {"$format": "string7", "$repeat": "numHobbies"}
			}
		}
	}"#;
	let mut bytes = vec![2];
	put7(&mut bytes, "John");
	bytes.push(2);
	put7(&mut bytes, "eating");
	put7(&mut bytes, "coding");
	put7(&mut bytes, "Betty");
	bytes.push(0);

	// The hidden counters come back out of the decoded value even
	// though they are invisible in its enumerable fields.
	roundtrip(text, &bytes);
}

#[test]
fn switch_arms_round_trip_in_both_directions() {
	let text = r#"{
		"dataType": "byte",
		"data": {
			"$switch": "dataType",
			"$cases": [
				{"$case": 0, "$format": {"radius": "byte"}},
				{"$case": 1, "$format": ["byte", "byte"]}
			]
		}
	}"#;
	roundtrip(text, &[0, 50]);
	roundtrip(text, &[1, 10, 255]);
	// Unmatched tag: absent on read, nothing written on write.
	roundtrip(text, &[9]);
}

#[test]
fn seek_based_layout_round_trips() {
	let text = r#"{
		"off": "byte",
		"late": {"$goto": "off", "$format": ["byte", "byte"]},
		"back": {"$goto": 1, "$format": "byte"}
	}"#;
	// Read order: offset pointer, two bytes at its target, then one
	// byte back at position 1; the write pass replays the same moves.
	let bytes = [3_u8, 0xAA, 0, 0x10, 0x20];
	let (value, _) = roundtrip(text, &bytes);
	let Value::Record(record) = value else {
		panic!("expected record");
	};
	assert_eq!(record.get("late"), Some(&Value::Array(vec![Value::U64(0x10), Value::U64(0x20)])));
	assert_eq!(record.get("back"), Some(&Value::U64(0xAA)));
}

#[test]
fn foreach_layout_round_trips() {
	let text = r#"{
		"count": "byte",
		"sizes": {"$repeat": "count", "$format": "byte"},
		"blobs": {
			"$foreach": "sizes s",
			"$format": {"data": {"$format": "buffer", "$length": "s"}}
		}
	}"#;
	roundtrip(text, &[2, 2, 3, 10, 11, 1, 2, 3]);
	roundtrip(text, &[0]);
}

#[test]
fn sized_text_round_trips_through_padding() {
	let text = r#"{"name": {"$format": "string", "$length": 6}, "after": "byte"}"#;
	roundtrip(text, b"hey\0\0\0\x07");
}

#[test]
fn tuple_and_nested_record_round_trip() {
	let text = r#"{
		"header": ["byte", "uint16", "uint16be"],
		"point": {"x": "int32", "y": "int32"}
	}"#;
	let mut bytes = vec![9, 0x34, 0x12, 0x12, 0x34];
	bytes.extend_from_slice(&(-3_i32).to_le_bytes());
	bytes.extend_from_slice(&7_i32.to_le_bytes());
	roundtrip(text, &bytes);
}

#[test]
fn size_of_matches_what_a_read_consumes() {
	let text = r#"{"a": "uint32", "b": ["byte", "double"], "tag": "char_3"}"#;
	let parsed = schema(text);
	let size = size_of(&parsed, 64).unwrap();

	let bytes = vec![0_u8; 64];
	let report = read_struct(&parsed, &bytes, &ReadOptions::default()).unwrap();
	assert_eq!(size, report.pos);
	assert_eq!(size, 16);
}
