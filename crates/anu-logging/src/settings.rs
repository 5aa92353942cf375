//! Resolution of logging options from a merged config tree.
//!
//! Every option is looked up in the merged tree first and falls back to a
//! fixed constant when absent. A present value of the wrong type is an error,
//! never silently replaced by the fallback.

use anu_config::{ConfigError, ConfigTree};
use log::LevelFilter;
use std::env;
use std::path::PathBuf;

const GLOBAL_SECTION: &str = "global";
const LOGGING_SECTION: &str = "logging";

/// Prefix used for the log file name and each formatted line.
pub const DEFAULT_PREFIX: &str = "default";
/// Rotation threshold in bytes (4 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 4096 * 1024;
/// Number of rotated files kept next to the active one.
pub const DEFAULT_BACKUP_COUNT: usize = 20;
/// Datagram destination host.
pub const DEFAULT_DATAGRAM_HOST: &str = "127.0.0.1";
/// Datagram destination port.
pub const DEFAULT_DATAGRAM_PORT: u16 = 19883;

/// Resolved logging options; built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSinkConfig {
    pub prefix: String,
    /// Working directory (`global.cwd`), used to derive the log directory.
    pub cwd: PathBuf,
    pub log_dir: PathBuf,
    pub level: LevelFilter,
    pub file_log: bool,
    pub stdout: bool,
    pub datagram_log: bool,
    /// Rotation threshold; `0` disables rotation.
    pub max_bytes: u64,
    /// Rotated files kept; `0` disables rotation.
    pub backup_count: usize,
    pub host: String,
    pub port: u16,
}

impl Default for LogSinkConfig {
    fn default() -> Self {
        let cwd = current_dir();
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            log_dir: cwd.join("log"),
            cwd,
            level: LevelFilter::Info,
            file_log: true,
            stdout: false,
            datagram_log: false,
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
            host: DEFAULT_DATAGRAM_HOST.to_string(),
            port: DEFAULT_DATAGRAM_PORT,
        }
    }
}

impl LogSinkConfig {
    /// Resolve options from `global.cwd` and the `logging` section.
    pub fn from_tree(tree: &ConfigTree) -> Result<Self, ConfigError> {
        let cwd = tree
            .get_str(GLOBAL_SECTION, "cwd")?
            .map(PathBuf::from)
            .unwrap_or_else(current_dir);
        let log_dir = tree
            .get_str(LOGGING_SECTION, "logdir")?
            .map(PathBuf::from)
            .unwrap_or_else(|| cwd.join("log"));
        let level = match tree.get_str(LOGGING_SECTION, "level")? {
            Some(text) => parse_level(&text).ok_or_else(|| {
                ConfigError::InvalidField {
                    path: "logging.level".to_string(),
                    message: format!("unknown log level `{text}`"),
                }
            })?,
            None => LevelFilter::Info,
        };

        Ok(Self {
            prefix: tree
                .get_str(LOGGING_SECTION, "prefix")?
                .unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            cwd,
            log_dir,
            level,
            file_log: tree.get_bool(LOGGING_SECTION, "file_log")?.unwrap_or(true),
            stdout: tree.get_bool(LOGGING_SECTION, "stdout")?.unwrap_or(false),
            datagram_log: tree
                .get_bool(LOGGING_SECTION, "datagram_log")?
                .unwrap_or(false),
            max_bytes: non_negative(tree, "max_byte")?.unwrap_or(DEFAULT_MAX_BYTES),
            backup_count: non_negative(tree, "backup_count")?
                .map(|count| usize::try_from(count).unwrap_or(usize::MAX))
                .unwrap_or(DEFAULT_BACKUP_COUNT),
            host: tree
                .get_str(LOGGING_SECTION, "host")?
                .unwrap_or_else(|| DEFAULT_DATAGRAM_HOST.to_string()),
            port: match tree.get_int(LOGGING_SECTION, "port")? {
                Some(port) => u16::try_from(port).map_err(|_| ConfigError::InvalidField {
                    path: "logging.port".to_string(),
                    message: format!("port {port} is out of range"),
                })?,
                None => DEFAULT_DATAGRAM_PORT,
            },
        })
    }

    /// Path of the active log file: `<log_dir>/<prefix>.log`.
    pub fn log_file_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.prefix))
    }
}

/// Parse a severity name or numeric level.
///
/// Names are case-insensitive (`critical`/`fatal` map to error). Numbers
/// follow the usual 10-step scale: `0..=5` trace, `<=10` debug, `<=20` info,
/// `<=30` warning, anything higher error.
pub fn parse_level(text: &str) -> Option<LevelFilter> {
    let text = text.trim();
    if let Ok(number) = text.parse::<i64>() {
        return match number {
            n if n < 0 => None,
            0..=5 => Some(LevelFilter::Trace),
            6..=10 => Some(LevelFilter::Debug),
            11..=20 => Some(LevelFilter::Info),
            21..=30 => Some(LevelFilter::Warn),
            _ => Some(LevelFilter::Error),
        };
    }
    match text.to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::Trace),
        "debug" => Some(LevelFilter::Debug),
        "info" => Some(LevelFilter::Info),
        "warning" | "warn" => Some(LevelFilter::Warn),
        "error" | "critical" | "fatal" => Some(LevelFilter::Error),
        _ => None,
    }
}

fn non_negative(tree: &ConfigTree, key: &str) -> Result<Option<u64>, ConfigError> {
    match tree.get_int(LOGGING_SECTION, key)? {
        Some(value) => u64::try_from(value).map(Some).map_err(|_| ConfigError::InvalidField {
            path: format!("{LOGGING_SECTION}.{key}"),
            message: format!("expected a non-negative integer, found {value}"),
        }),
        None => Ok(None),
    }
}

fn current_dir() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anu_config::Format;
    use pretty_assertions::assert_eq;

    fn ini(doc: &str) -> ConfigTree {
        ConfigTree::load_from_str(Format::Sectioned, doc).expect("ini")
    }

    fn yaml(doc: &str) -> ConfigTree {
        ConfigTree::load_from_str(Format::Structured, doc).expect("yaml")
    }

    #[test]
    fn empty_tree_uses_every_fallback() {
        let config = LogSinkConfig::from_tree(&ini("")).expect("config");
        let cwd = current_dir();
        assert_eq!(config.prefix, "default");
        assert_eq!(config.cwd, cwd);
        assert_eq!(config.log_dir, cwd.join("log"));
        assert_eq!(config.level, LevelFilter::Info);
        assert!(config.file_log);
        assert!(!config.stdout);
        assert!(!config.datagram_log);
        assert_eq!(config.max_bytes, 4_194_304);
        assert_eq!(config.backup_count, 20);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 19883);
        assert_eq!(config.log_file_path(), cwd.join("log").join("default.log"));
        assert_eq!(config, LogSinkConfig::default());
    }

    #[test]
    fn interpolated_log_dir_resolves() {
        let config = LogSinkConfig::from_tree(&ini(
            "[global]\ncwd = /tmp\n[logging]\nlogdir = ${global:cwd}/log\n",
        ))
        .expect("config");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/log"));
    }

    #[test]
    fn log_dir_defaults_under_configured_cwd() {
        let config =
            LogSinkConfig::from_tree(&yaml("global:\n  cwd: /srv/app\n")).expect("config");
        assert_eq!(config.log_dir, PathBuf::from("/srv/app/log"));
    }

    #[test]
    fn explicit_values_are_used() {
        let config = LogSinkConfig::from_tree(&ini(concat!(
            "[logging]\n",
            "prefix = svc\nlevel = 30\nstdout = on\ndatagram_log = true\n",
            "max_byte = 100\nbackup_count = 2\nfile_log = no\n",
            "host = 10.1.2.3\nport = 5000\n",
        )))
        .expect("config");
        assert_eq!(config.prefix, "svc");
        assert_eq!(config.level, LevelFilter::Warn);
        assert!(config.stdout);
        assert!(config.datagram_log);
        assert!(!config.file_log);
        assert_eq!(config.max_bytes, 100);
        assert_eq!(config.backup_count, 2);
        assert_eq!(config.host, "10.1.2.3");
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn structured_values_are_used() {
        let config = LogSinkConfig::from_tree(&yaml(
            "logging:\n  level: debug\n  stdout: true\n  port: 6000\n",
        ))
        .expect("config");
        assert_eq!(config.level, LevelFilter::Debug);
        assert!(config.stdout);
        assert_eq!(config.port, 6000);
    }

    #[test]
    fn unknown_level_is_an_error() {
        let err = LogSinkConfig::from_tree(&ini("[logging]\nlevel = banana\n")).unwrap_err();
        assert!(err.to_string().contains("logging.level"), "{err}");
    }

    #[test]
    fn scalar_logging_section_is_an_error() {
        let err = LogSinkConfig::from_tree(&yaml("logging: banana\n")).unwrap_err();
        match err {
            ConfigError::InvalidField { path, .. } => assert_eq!(path, "logging"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(LogSinkConfig::from_tree(&yaml("global: [a, b]\n")).is_err());
        assert!(LogSinkConfig::from_tree(&yaml("logging:\n")).is_ok());
    }

    #[test]
    fn malformed_numbers_are_errors() {
        assert!(LogSinkConfig::from_tree(&ini("[logging]\nmax_byte = lots\n")).is_err());
        assert!(LogSinkConfig::from_tree(&ini("[logging]\nbackup_count = -1\n")).is_err());
        assert!(LogSinkConfig::from_tree(&ini("[logging]\nport = 70000\n")).is_err());
        assert!(LogSinkConfig::from_tree(&ini("[logging]\nstdout = sometimes\n")).is_err());
    }

    #[test]
    fn levels_parse_from_names_and_numbers() {
        assert_eq!(parse_level("10"), Some(LevelFilter::Debug));
        assert_eq!(parse_level("20"), Some(LevelFilter::Info));
        assert_eq!(parse_level("30"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("40"), Some(LevelFilter::Error));
        assert_eq!(parse_level("50"), Some(LevelFilter::Error));
        assert_eq!(parse_level("0"), Some(LevelFilter::Trace));
        assert_eq!(parse_level("WARNING"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("Critical"), Some(LevelFilter::Error));
        assert_eq!(parse_level("-1"), None);
        assert_eq!(parse_level("banana"), None);
    }
}
