/// Logging setup with a file sink. Kept in its own test binary because the
/// subscriber is process-global.
use chainql::logging::{LogConfig, LogFormat};
use chainql::{Error, RecordSet, Value};
use tempfile::tempdir;

#[test]
fn test_file_logging_and_double_init() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("queries.log");

    let guard = LogConfig::debug()
        .with_file(&path)
        .with_format(LogFormat::Compact)
        .init()
        .unwrap();
    assert!(guard.is_some());

    let mut set = RecordSet::new(vec![Value::from(1), Value::from(2)]);
    set.query("LIMIT 1", &[]).unwrap();
    drop(guard);

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("queries.log"))
        .collect();
    assert_eq!(files.len(), 1);

    // a second global subscriber is refused
    let err = LogConfig::info().init().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
