use jiff::Timestamp;
use rusqlite::{params, Connection};
use tempfile::NamedTempFile;
use waymark_core::{
    db::{Database, STORAGE_KEY},
    Category, LocationId, TaggedLocation, WaymarkError,
};

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn location(id: &str, name: &str, category: Category) -> TaggedLocation {
    TaggedLocation {
        id: LocationId::from(id),
        name: name.to_string(),
        category,
        latitude: 48.8566,
        longitude: 2.3522,
        created_at: Timestamp::from_second(1_700_000_000).unwrap(),
    }
}

/// Writes a raw snapshot value, bypassing the model layer.
fn write_raw_snapshot(temp_file: &NamedTempFile, raw: &str) {
    let conn = Connection::open(temp_file.path()).expect("Failed to open raw connection");
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![STORAGE_KEY, raw, "2024-01-01T00:00:00Z"],
    )
    .expect("Failed to write raw snapshot");
}

fn read_raw_snapshot(temp_file: &NamedTempFile) -> Option<String> {
    let conn = Connection::open(temp_file.path()).expect("Failed to open raw connection");
    conn.query_row(
        "SELECT value FROM kv_store WHERE key = ?1",
        params![STORAGE_KEY],
        |row| row.get(0),
    )
    .ok()
}

#[test]
fn test_database_initialization() {
    let (temp_file, db) = create_test_db();

    assert!(temp_file.path().exists());
    assert!(db.load_locations().unwrap().is_empty());
}

#[test]
fn test_reopening_keeps_schema_and_data() {
    let (temp_file, mut db) = create_test_db();
    db.insert_location(&location("a", "Bakery", Category::Vendor))
        .unwrap();
    drop(db);

    let reopened = Database::new(temp_file.path()).expect("Failed to reopen database");
    let stored = reopened.load_locations().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Bakery");
}

#[test]
fn test_insert_appends_in_order() {
    let (_temp_file, mut db) = create_test_db();

    db.insert_location(&location("a", "First", Category::Custom))
        .unwrap();
    db.insert_location(&location("b", "Second", Category::Custom))
        .unwrap();

    let ids: Vec<String> = db
        .load_locations()
        .unwrap()
        .into_iter()
        .map(|l| l.id.to_string())
        .collect();
    assert_eq!(ids, ["a", "b"]);
}

#[test]
fn test_insert_replaces_same_id() {
    let (_temp_file, mut db) = create_test_db();

    db.insert_location(&location("a", "Old name", Category::Custom))
        .unwrap();
    db.insert_location(&location("a", "New name", Category::Vehicle))
        .unwrap();

    let stored = db.load_locations().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "New name");
    assert_eq!(stored[0].category, Category::Vehicle);
}

#[test]
fn test_remove_location() {
    let (_temp_file, mut db) = create_test_db();
    db.insert_location(&location("a", "Keep", Category::Custom))
        .unwrap();
    db.insert_location(&location("b", "Drop", Category::Custom))
        .unwrap();

    assert!(db.remove_location(&LocationId::from("b")).unwrap());
    assert!(!db.remove_location(&LocationId::from("b")).unwrap());
    assert!(!db.remove_location(&LocationId::from("zzz")).unwrap());

    let stored = db.load_locations().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, LocationId::from("a"));
}

#[test]
fn test_clear_locations() {
    let (_temp_file, mut db) = create_test_db();
    db.insert_location(&location("a", "A", Category::Custom))
        .unwrap();
    db.insert_location(&location("b", "B", Category::Custom))
        .unwrap();

    assert_eq!(db.clear_locations().unwrap(), 2);
    assert!(db.load_locations().unwrap().is_empty());
    assert_eq!(db.clear_locations().unwrap(), 0);
}

#[test]
fn test_replace_locations() {
    let (_temp_file, mut db) = create_test_db();
    db.insert_location(&location("stale", "Stale", Category::Custom))
        .unwrap();

    let fresh = vec![
        location("x", "X", Category::Vendor),
        location("y", "Y", Category::Vehicle),
    ];
    db.replace_locations(&fresh).unwrap();

    assert_eq!(db.load_locations().unwrap(), fresh);
}

#[test]
fn test_snapshot_uses_camel_case_layout() {
    let (temp_file, mut db) = create_test_db();
    db.insert_location(&location("a", "Car", Category::Vehicle))
        .unwrap();

    let raw = read_raw_snapshot(&temp_file).expect("Snapshot should exist");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &value[0];
    assert_eq!(record["id"], "a");
    assert_eq!(record["category"], "vehicle");
    assert!(record.get("createdAt").is_some());
    assert!(record.get("created_at").is_none());
}

#[test]
fn test_legacy_records_are_normalized() {
    let (temp_file, db) = create_test_db();
    write_raw_snapshot(
        &temp_file,
        r#"[
            {"id":"1709663400000","name":"My Car","type":"car","latitude":37.0,
             "longitude":-122.0,"createdAt":"2024-03-05T18:30:00.000Z","icon":"car"},
            {"id":"1709663500000","name":"Favorite Shop","type":"shop","latitude":37.1,
             "longitude":-122.1,"createdAt":"2024-03-05T18:31:40.000Z","icon":"store"}
        ]"#,
    );

    let stored = db.load_locations().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, LocationId::from("1709663400000"));
    assert_eq!(stored[0].category, Category::Vehicle);
    assert_eq!(stored[1].category, Category::Vendor);
}

#[test]
fn test_invalid_records_are_skipped() {
    let (temp_file, mut db) = create_test_db();
    write_raw_snapshot(
        &temp_file,
        r#"[
            {"id":"ok","name":"Fine","category":"custom","latitude":1.0,
             "longitude":1.0,"createdAt":"2024-01-01T00:00:00Z"},
            {"id":"lat","name":"Bad lat","category":"custom","latitude":95.0,
             "longitude":1.0,"createdAt":"2024-01-01T00:00:00Z"},
            {"id":"cat","name":"Bad category","category":"boat","latitude":1.0,
             "longitude":1.0,"createdAt":"2024-01-01T00:00:00Z"},
            {"id":"","name":"No id","category":"custom","latitude":1.0,
             "longitude":1.0,"createdAt":"2024-01-01T00:00:00Z"},
            "not even an object"
        ]"#,
    );

    let stored = db.load_locations().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, LocationId::from("ok"));

    // The next write rewrites the snapshot with only the valid records.
    db.insert_location(&location("new", "New", Category::Custom))
        .unwrap();
    let raw: serde_json::Value =
        serde_json::from_str(&read_raw_snapshot(&temp_file).unwrap()).unwrap();
    assert_eq!(raw.as_array().map(Vec::len), Some(2));
}

#[test]
fn test_corrupt_snapshot_is_an_error() {
    let (temp_file, mut db) = create_test_db();
    write_raw_snapshot(&temp_file, "{not json");

    assert!(matches!(
        db.load_locations(),
        Err(WaymarkError::Serialization { .. })
    ));
    assert!(db
        .insert_location(&location("a", "A", Category::Custom))
        .is_err());

    // A failed mutation leaves the stored value untouched.
    assert_eq!(read_raw_snapshot(&temp_file).as_deref(), Some("{not json"));
}
