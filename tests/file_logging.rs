//! File logging gets its own test binary since the logger is process-global.

#![cfg(feature = "file-logging")]

use studyhub::logger::{close_file_logging, init_file_logging, set_level, Level};
use studyhub::{error, warn};

#[test]
fn file_logging_writes_lines_and_creates_parent() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("studyhub.log");
    assert!(init_file_logging(&path));
    set_level(Level::Warn);
    warn!("written to file");
    error!("also written");
    close_file_logging();
    warn!("console only");

    let content = std::fs::read_to_string(&path).expect("log file");
    assert!(content.contains("[WARN] written to file"));
    assert!(content.contains("[ERROR] also written"));
    assert!(!content.contains("console only"));
}
