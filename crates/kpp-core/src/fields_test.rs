use std::path::Path;

use serde_json::json;

use super::*;

fn props(value: serde_json::Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn resolve_takes_first_present_candidate() {
    let table = FieldTable::default();
    let p = props(json!({ "title": "Третий", "name": "Второй" }));
    assert_eq!(table.resolve(&p, LogicalField::Name), "Второй");
}

#[test]
fn resolve_falls_back_to_name_when_checkpoint_name_missing() {
    let table = FieldTable::default();
    let p = props(json!({ "name": "Забайкальск" }));
    assert_eq!(table.resolve(&p, LogicalField::Name), "Забайкальск");
}

#[test]
fn resolve_skips_null_and_blank_values() {
    let table = FieldTable::default();
    let p = props(json!({
        "checkpoint_name": null,
        "name": "   ",
        "title": "Верхний Ларс"
    }));
    assert_eq!(table.resolve(&p, LogicalField::Name), "Верхний Ларс");
}

#[test]
fn resolve_uses_default_when_nothing_matches() {
    let table = FieldTable::default();
    let p = props(json!({ "unrelated": "x" }));
    assert_eq!(table.resolve(&p, LogicalField::Name), "Без названия");
    assert_eq!(table.resolve(&p, LogicalField::Subject), "—");
    assert_eq!(table.resolve(&p, LogicalField::Country), "—");
    assert_eq!(table.resolve(&p, LogicalField::Id), "");
}

#[test]
fn lookup_stringifies_numbers_and_booleans() {
    let table = FieldTable::default();
    let p = props(json!({ "checkpoint_id": 42, "status": true }));
    assert_eq!(table.lookup(&p, LogicalField::Id).as_deref(), Some("42"));
    assert_eq!(table.lookup(&p, LogicalField::Status).as_deref(), Some("true"));
}

#[test]
fn lookup_skips_arrays_and_objects() {
    let table = FieldTable::default();
    let p = props(json!({ "checkpoint_type": ["auto"], "type": { "x": 1 }, "transport_type": "rail" }));
    assert_eq!(
        table.lookup(&p, LogicalField::Type).as_deref(),
        Some("rail")
    );
}

#[test]
fn lookup_trims_string_values() {
    let table = FieldTable::default();
    let p = props(json!({ "region": "  Амурская область \n" }));
    assert_eq!(
        table.lookup(&p, LogicalField::Subject).as_deref(),
        Some("Амурская область")
    );
}

#[test]
fn partial_yaml_keeps_builtin_rules() {
    let yaml = "name:\n  keys: [nazvanie]\n  default: \"?\"\n";
    let table: FieldTable = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(table.name.keys, vec!["nazvanie".to_string()]);
    assert_eq!(table.name.default, "?");
    assert_eq!(table.id, FieldTable::default().id);
}

#[test]
fn rule_without_default_keeps_builtin_placeholder() {
    let yaml = "name:\n  keys: [nazvanie]\ncountry:\n  keys: [strana]\n";
    let table: FieldTable = serde_yaml::from_str(yaml).unwrap();
    assert!(validate_field_table(&table).is_ok());
    assert_eq!(table.name.keys, vec!["nazvanie".to_string()]);

    let p = props(json!({ "other": "x" }));
    assert_eq!(table.resolve(&p, LogicalField::Name), "Без названия");
    assert_eq!(table.resolve(&p, LogicalField::Country), "—");
}

#[test]
fn empty_yaml_is_builtin_table() {
    let table: FieldTable = serde_yaml::from_str("{}").unwrap();
    assert_eq!(table, FieldTable::default());
}

#[test]
fn validate_rejects_blank_name_placeholder() {
    let yaml = "name:\n  keys: [nazvanie]\n  default: \"  \"\n";
    let table: FieldTable = serde_yaml::from_str(yaml).unwrap();
    let err = validate_field_table(&table).unwrap_err();
    assert!(err.to_string().contains("'name' must have a non-blank default"));
}

#[test]
fn validate_allows_blank_type_default() {
    let yaml = "type:\n  keys: [vid]\n";
    let table: FieldTable = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(table.checkpoint_type.default, "");
    assert!(validate_field_table(&table).is_ok());
}

#[test]
fn validate_rejects_empty_key_list() {
    let mut table = FieldTable::default();
    table.country.keys.clear();
    let err = validate_field_table(&table).unwrap_err();
    assert!(err.to_string().contains("at least one source key"));
}

#[test]
fn validate_rejects_blank_key() {
    let mut table = FieldTable::default();
    table.subject.keys.push("  ".to_string());
    let err = validate_field_table(&table).unwrap_err();
    assert!(err.to_string().contains("blank source key"));
}

#[test]
fn validate_rejects_duplicate_key() {
    let mut table = FieldTable::default();
    table.id.keys.push("uid".to_string());
    let err = validate_field_table(&table).unwrap_err();
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn validate_accepts_builtin_table() {
    assert!(validate_field_table(&FieldTable::default()).is_ok());
}

#[test]
fn load_field_table_missing_file_is_io_error() {
    let err = load_field_table(Path::new("/nonexistent/fields.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::FieldsFileIo { .. }));
}

#[test]
fn load_field_table_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("fields.yaml");
    assert!(
        path.exists(),
        "fields.yaml missing at {path:?}; required for this test"
    );
    let result = load_field_table(&path);
    assert!(result.is_ok(), "failed to load fields.yaml: {result:?}");
    assert_eq!(result.unwrap(), FieldTable::default());
}
