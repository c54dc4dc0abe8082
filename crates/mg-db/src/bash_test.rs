use super::*;

fn script(dir: &Path, version: u64, direction: Direction, body: &str) -> MigrationFile {
    let file_name = MigrationFile::file_name_for(Version::new(version), "job", direction, "sh");
    let path = dir.join(&file_name);
    std::fs::write(&path, body).unwrap();
    MigrationFile {
        version: Version::new(version),
        direction,
        name: "job".to_string(),
        file_name,
        path,
    }
}

#[tokio::test]
async fn test_state_file_created_on_connect() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state");
    let mut conn = BashDriver
        .connect(&format!("bash://{}", state.display()))
        .await
        .unwrap();
    assert!(state.exists());
    assert_eq!(conn.version().await.unwrap(), Version::ZERO);
}

#[tokio::test]
async fn test_scripts_see_direction_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");
    let body = format!(
        "echo \"$MIGRATE_DIRECTION $MIGRATE_VERSION\" >> '{}'\n",
        out.display()
    );
    let up = script(dir.path(), 4, Direction::Up, &body);
    let down = script(dir.path(), 4, Direction::Down, &body);

    let state = dir.path().join("state");
    let mut conn = BashDriver
        .connect(&format!("bash://{}", state.display()))
        .await
        .unwrap();
    conn.apply(&up).await.unwrap();
    assert_eq!(conn.version().await.unwrap(), Version::new(4));
    assert_eq!(std::fs::read_to_string(&state).unwrap(), "4\n");

    conn.apply(&down).await.unwrap();
    assert_eq!(conn.version().await.unwrap(), Version::ZERO);
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "up 4\ndown 4\n"
    );
}

#[tokio::test]
async fn test_failing_script_leaves_state_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let bad = script(dir.path(), 2, Direction::Up, "echo boom >&2\nexit 3\n");
    let state = dir.path().join("state");
    std::fs::write(&state, "1\n").unwrap();

    let mut conn = BashDriver
        .connect(&format!("bash://{}", state.display()))
        .await
        .unwrap();
    let err = conn.apply(&bad).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("exited with 3"), "{message}");
    assert!(message.contains("boom"), "{message}");
    assert_eq!(conn.version().await.unwrap(), Version::new(1));
    assert_eq!(std::fs::read_to_string(&state).unwrap(), "1\n");
}

#[tokio::test]
async fn test_corrupt_state_file_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state");
    std::fs::write(&state, "1\nabc\n").unwrap();

    let err = BashDriver
        .connect(&format!("bash://{}", state.display()))
        .await
        .err()
        .unwrap();
    assert!(err.is_storage());
}

#[tokio::test]
async fn test_missing_state_path_is_invalid_url() {
    let err = BashDriver.connect("bash://").await.err().unwrap();
    assert!(err.is_connection());
}
