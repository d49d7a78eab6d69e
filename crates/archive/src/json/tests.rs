use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn test_record_fields_keep_insertion_order() {
	let mut out = JsonOutputArchive::new();
	out.start_node().unwrap();
	out.write("type", "fully_connected").unwrap();
	out.write("in_size", &4usize).unwrap();
	out.write("out_size", &2usize).unwrap();
	out.finish_node().unwrap();

	let text = out.into_string(false).unwrap();
	assert_eq!(
		text,
		r#"[{"type":"fully_connected","in_size":4,"out_size":2}]"#
	);
}

#[test]
fn test_nested_nodes_become_positional_children() {
	let mut out = JsonOutputArchive::new();
	out.start_node().unwrap();
	out.write("name", "outer").unwrap();
	for size in [3u32, 5] {
		out.start_node().unwrap();
		out.write("size", &size).unwrap();
		out.finish_node().unwrap();
	}
	out.finish_node().unwrap();

	assert_eq!(
		out.into_value().unwrap(),
		json!([{ "name": "outer", "value0": { "size": 3 }, "value1": { "size": 5 } }])
	);
}

#[test]
fn test_write_without_node_fails() {
	let mut out = JsonOutputArchive::new();
	let err = out.write("type", "dropout").unwrap_err();
	assert!(matches!(err, ArchiveError::NoOpenNode { label } if label == "type"));
}

#[test]
fn test_unbalanced_finish_fails() {
	let mut out = JsonOutputArchive::new();
	assert!(matches!(
		out.finish_node().unwrap_err(),
		ArchiveError::UnbalancedNode
	));

	let mut input = JsonInputArchive::parse("[]").unwrap();
	assert!(matches!(
		input.finish_node().unwrap_err(),
		ArchiveError::UnbalancedNode
	));
}

#[test]
fn test_unclosed_node_rejected_on_finish() {
	let mut out = JsonOutputArchive::new();
	out.start_node().unwrap();
	assert!(matches!(
		out.into_value().unwrap_err(),
		ArchiveError::UnclosedNodes { open: 1 }
	));
}

#[test]
fn test_reads_records_in_order() {
	let mut input = JsonInputArchive::parse(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
	assert_eq!(input.remaining(), 2);

	let mut seen = Vec::new();
	while input.remaining() > 0 {
		input.start_node().unwrap();
		seen.push(input.read::<u8>("a").unwrap());
		input.finish_node().unwrap();
	}
	assert_eq!(seen, vec![1, 2]);
	assert!(matches!(
		input.start_node().unwrap_err(),
		ArchiveError::EndOfRecords
	));
}

#[test]
fn test_single_object_is_one_record() {
	let mut input = JsonInputArchive::parse(r#"{"rate": 0.5}"#).unwrap();
	input.start_node().unwrap();
	assert_eq!(input.read::<f32>("rate").unwrap(), 0.5);
	input.finish_node().unwrap();
}

#[test]
fn test_missing_and_mistyped_fields() {
	let mut input = JsonInputArchive::parse(r#"[{"in_size": "four"}]"#).unwrap();
	input.start_node().unwrap();

	let err = input.read::<usize>("out_size").unwrap_err();
	assert!(matches!(err, ArchiveError::MissingField { label } if label == "out_size"));

	let err = input.read::<usize>("in_size").unwrap_err();
	assert!(matches!(err, ArchiveError::Json { label, .. } if label == "in_size"));
}

#[test]
fn test_non_object_record_rejected() {
	let mut input = JsonInputArchive::parse("[1]").unwrap();
	assert!(matches!(
		input.start_node().unwrap_err(),
		ArchiveError::NotAnObject { found: "number" }
	));
	assert!(matches!(
		JsonInputArchive::parse("\"text\"").unwrap_err(),
		ArchiveError::NotAnObject { found: "string" }
	));
}

#[test]
fn test_nested_children_read_back() {
	let mut input =
		JsonInputArchive::parse(r#"[{"name": "outer", "value0": {"size": 3}}]"#).unwrap();
	input.start_node().unwrap();
	assert_eq!(input.read::<String>("name").unwrap(), "outer");
	input.start_node().unwrap();
	assert_eq!(input.read::<u32>("size").unwrap(), 3);
	input.finish_node().unwrap();
	assert!(matches!(
		input.start_node().unwrap_err(),
		ArchiveError::MissingField { label } if label == "value1"
	));
}
