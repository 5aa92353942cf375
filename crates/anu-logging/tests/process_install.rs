//! Installing the process logger behind the `log` facade.
//!
//! Kept as a single test: the facade can only be claimed once per process.

use anu_config::{ConfigTree, DocumentSource, Format, LayeredConfigOptions};
use anu_logging::{bootstrap, process_logger};
use log::{LevelFilter, Log};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[test]
fn bootstrap_installs_then_appends_sinks() {
    let temp = tempdir().expect("tempdir");
    let defaults = temp.path().join("defaults");
    fs::create_dir_all(&defaults).expect("defaults dir");
    fs::write(
        defaults.join("logging.ini"),
        "[logging]\nprefix = app\nlevel = 20\nlogdir = ${global:cwd}/logs\n",
    )
    .expect("defaults");

    let options = LayeredConfigOptions::new(Format::Sectioned)
        .with_defaults_dir(&defaults)
        .with_override(DocumentSource::text(
            "override",
            format!("[global]\ncwd = {}\n", temp.path().display()),
        ));
    let tree = ConfigTree::load_layered_with_options(options)
        .expect("layered")
        .tree;

    assert!(process_logger().is_none());
    let logger = bootstrap(&tree).expect("bootstrap");
    assert_eq!(log::max_level(), LevelFilter::Info);
    assert!(!logger.last_resort_enabled());
    assert_eq!(logger.sink_kinds(), vec!["file"]);

    log::debug!("below threshold");
    log::info!("through the facade");
    log::logger().flush();

    let log_file = temp.path().join("logs").join("app.log");
    let contents = fs::read_to_string(&log_file).expect("log file");
    assert!(contents.contains("]: through the facade"), "{contents}");
    assert!(!contents.contains("below threshold"), "{contents}");
    assert!(contents.contains("[INFO]["), "{contents}");
    assert!(contents.contains("process_install.rs:"), "{contents}");

    // A second bootstrap keeps the same logger and adds another sink set.
    let second_dir = temp.path().join("second");
    let second = ConfigTree::load_from_str(
        Format::Sectioned,
        &format!(
            "[logging]\nprefix = again\nlevel = warning\nlogdir = {}\n",
            second_dir.display()
        ),
    )
    .expect("second tree");
    let again = bootstrap(&second).expect("second bootstrap");
    assert!(std::ptr::eq(logger, again));
    assert_eq!(again.sink_kinds(), vec!["file", "file"]);
    assert_eq!(log::max_level(), LevelFilter::Warn);

    log::warn!("to both files");
    log::logger().flush();
    let first = fs::read_to_string(&log_file).expect("first file");
    let second_contents =
        fs::read_to_string(second_dir.join("again.log")).expect("second file");
    assert!(first.contains("to both files"), "{first}");
    assert!(second_contents.contains("[again] - ["), "{second_contents}");
    assert!(second_contents.contains("to both files"), "{second_contents}");
}
