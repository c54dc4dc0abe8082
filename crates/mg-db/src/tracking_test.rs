use super::*;
use std::path::PathBuf;

fn file(version: u64, direction: Direction) -> MigrationFile {
    MigrationFile {
        version: Version::new(version),
        direction,
        name: "x".to_string(),
        file_name: format!("{version}_x.{direction}.sql"),
        path: PathBuf::from("x"),
    }
}

#[test]
fn test_record_sql_by_direction() {
    assert_eq!(
        record_sql(&file(3, Direction::Up)),
        "INSERT INTO schema_migrations (version) VALUES (3)"
    );
    assert_eq!(
        record_sql(&file(3, Direction::Down)),
        "DELETE FROM schema_migrations WHERE version = 3"
    );
}

#[test]
fn test_stored_version_rejects_negative() {
    assert_eq!(stored_version(5).unwrap(), Version::new(5));
    assert!(stored_version(-1).unwrap_err().is_storage());
}
