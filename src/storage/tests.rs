use super::*;
use tempfile::TempDir;

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[tokio::test]
async fn test_catalogue_schema_tables() {
    let db = Database::open_in_memory(Schema::Catalogue).unwrap();
    let names = db.call(|conn| Ok(table_names(conn))).await.unwrap();
    assert!(names.contains(&"disciplines".to_string()));
    assert!(names.contains(&"descriptors".to_string()));
    assert!(names.contains(&"observations".to_string()));
    assert!(!names.contains(&"users".to_string()));
}

#[tokio::test]
async fn test_admin_schema_tables() {
    let db = Database::open_in_memory(Schema::Admin).unwrap();
    let names = db.call(|conn| Ok(table_names(conn))).await.unwrap();
    assert!(names.contains(&"users".to_string()));
    assert!(names.contains(&"activities".to_string()));
}

#[tokio::test]
async fn test_open_creates_parent_dirs_and_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("riza.db");

    {
        let db = Database::open(&path, Schema::Catalogue).unwrap();
        db.call(|conn| {
            conn.execute("INSERT INTO disciplines (name) VALUES ('Mathematics')", [])?;
            Ok(())
        })
        .await
        .unwrap();
    }

    let db = Database::open(&path, Schema::Catalogue).unwrap();
    let count: i64 = db
        .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM disciplines", [], |r| r.get(0))?))
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(db.schema(), Schema::Catalogue);
}

#[tokio::test]
async fn test_call_propagates_sqlite_errors() {
    let db = Database::open_in_memory(Schema::Admin).unwrap();
    let result = db
        .call(|conn| {
            conn.execute("INSERT INTO no_such_table VALUES (1)", [])?;
            Ok(())
        })
        .await;
    assert!(matches!(result, Err(StoreError::Sqlite(_))));
}

#[test]
fn test_now_timestamp_format() {
    let ts = now_timestamp();
    assert!(chrono::NaiveDateTime::parse_from_str(&ts, crate::constants::TIMESTAMP_FORMAT).is_ok());
}
