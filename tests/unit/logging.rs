use super::*;
use tempfile::tempdir;

#[test]
fn init_installs_subscriber_once() {
    let dir = tempdir().unwrap();
    let config = LoggingConfig {
        dir: Some(dir.path().join("logs")),
        ..LoggingConfig::default()
    };

    let guard = init(&config).expect("first init installs the subscriber");
    assert_eq!(guard.log_dir(), dir.path().join("logs"));
    assert!(guard.log_dir().is_dir());

    assert!(init(&config).is_none());
}
