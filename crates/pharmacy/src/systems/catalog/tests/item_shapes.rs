use super::write;
use crate::systems::catalog::{read_item_rows, ItemKind};
use crate::systems::errors::ConfigError;

fn rows_of(body: &str) -> Result<Vec<(u32, String, ItemKind)>, ConfigError> {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "items.json", body);
    let rows = read_item_rows(&path)?;
    Ok(rows
        .into_iter()
        .map(|(id, fields)| {
            (
                id,
                fields.display_name().unwrap_or_default().to_string(),
                fields.kind.unwrap_or_default(),
            )
        })
        .collect())
}

#[test]
fn reads_schema_envelope() {
    let rows = rows_of(
        r#"{"schema":"items.v1","items":[{"id":7,"name_pt":"Erva","name_en":"Herb"}]}"#,
    )
    .unwrap();
    assert_eq!(rows, vec![(7, "Erva".to_string(), ItemKind::Material)]);
}

#[test]
fn reads_plain_list() {
    let rows = rows_of(r#"[{"id":7,"name":"Herb","type":"final","recipe":"1_8"}]"#).unwrap();
    assert_eq!(rows, vec![(7, "Herb".to_string(), ItemKind::Final)]);
}

#[test]
fn reads_map_keyed_by_id() {
    let rows = rows_of(
        r#"{"8":{"name_en":"Bottle"},"7":{"name_pt":"","name_en":"Herb","type":"intermediate"}}"#,
    )
    .unwrap();
    assert_eq!(
        rows,
        vec![
            (7, "Herb".to_string(), ItemKind::Intermediate),
            (8, "Bottle".to_string(), ItemKind::Material),
        ]
    );
}

#[test]
fn rejects_other_shapes() {
    assert!(matches!(
        rows_of("42"),
        Err(ConfigError::UnsupportedShape { found: "number", .. })
    ));
    assert!(matches!(
        rows_of(r#"{"schema":"items.v2","items":[]}"#),
        Err(ConfigError::UnsupportedSchema { .. })
    ));
    assert!(matches!(
        rows_of(r#"{"abc":{"name":"Herb"}}"#),
        Err(ConfigError::UnknownItem { section: "catalog", .. })
    ));
}

#[test]
fn rejects_unknown_fields_and_kinds() {
    assert!(matches!(
        rows_of(r#"[{"id":7,"name":"Herb","weight":3}]"#),
        Err(ConfigError::Json { .. })
    ));
    assert!(matches!(
        rows_of(r#"[{"id":7,"name":"Herb","type":"gem"}]"#),
        Err(ConfigError::Json { .. })
    ));
}

#[test]
fn missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_item_rows(&dir.path().join("nope.json")),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn envelope_rows_are_as_strict_as_list_rows() {
    assert!(matches!(
        rows_of(r#"{"schema":"items.v1","items":[{"id":7,"name":"Herb","weight":3}]}"#),
        Err(ConfigError::Json { .. })
    ));
    assert!(matches!(
        rows_of(r#"[{"name":"Herb"}]"#),
        Err(ConfigError::Json { .. })
    ));
}
