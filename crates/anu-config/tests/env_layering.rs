//! Defaults-directory discovery through environment variables.

use anu_config::{
    ConfigError, ConfigTree, DocumentSource, Format, INI_DEFAULTS_DIR_ENV, YAML_DEFAULTS_DIR_ENV,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

/// The YAML defaults directory is picked up from its variable.
#[test]
fn yaml_defaults_dir_from_env() {
    let temp = tempdir().expect("tempdir");
    fs::write(temp.path().join("defaults.yml"), "logging:\n  prefix: env\n  port: 1\n")
        .expect("write");

    temp_env::with_var(YAML_DEFAULTS_DIR_ENV, Some(temp.path()), || {
        let layered = ConfigTree::load_layered(
            Format::Structured,
            Some(DocumentSource::text("override", "logging:\n  port: 2\n")),
        )
        .expect("layered");
        assert_eq!(
            layered.tree.get_str("logging", "prefix").expect("prefix"),
            Some("env".to_string())
        );
        assert_eq!(layered.tree.get_int("logging", "port").expect("port"), Some(2));
    });
}

/// Each format reads only its own variable.
#[test]
fn formats_use_independent_variables() {
    let temp = tempdir().expect("tempdir");
    fs::write(temp.path().join("defaults.ini"), "[logging]\nprefix = ini\n").expect("write");

    temp_env::with_vars(
        vec![
            (YAML_DEFAULTS_DIR_ENV, None),
            (INI_DEFAULTS_DIR_ENV, Some(temp.path().as_os_str())),
        ],
        || {
            let yaml = ConfigTree::load_layered(Format::Structured, None).expect("yaml");
            assert!(yaml.tree.is_empty());
            assert!(yaml.layers.is_empty());

            let ini = ConfigTree::load_layered(Format::Sectioned, None).expect("ini");
            assert_eq!(
                ini.tree.get_str("logging", "prefix").expect("prefix"),
                Some("ini".to_string())
            );
        },
    );
}

/// Unset, empty, or dangling variables all skip the defaults layer.
#[test]
fn absent_defaults_dir_is_not_an_error() {
    temp_env::with_var_unset(INI_DEFAULTS_DIR_ENV, || {
        let layered = ConfigTree::load_layered(Format::Sectioned, None).expect("unset");
        assert!(layered.tree.is_empty());
    });
    temp_env::with_var(INI_DEFAULTS_DIR_ENV, Some(""), || {
        let layered = ConfigTree::load_layered(Format::Sectioned, None).expect("empty");
        assert!(layered.tree.is_empty());
    });
    temp_env::with_var(INI_DEFAULTS_DIR_ENV, Some("/definitely/not/here"), || {
        let layered = ConfigTree::load_layered(Format::Sectioned, None).expect("dangling");
        assert!(layered.tree.is_empty());
    });
}

/// A malformed defaults file surfaces as a parse error from the env path too.
#[test]
fn malformed_env_layer_is_reported() {
    let temp = tempdir().expect("tempdir");
    fs::write(temp.path().join("broken.ini"), "no header = here\n").expect("write");

    temp_env::with_var(INI_DEFAULTS_DIR_ENV, Some(temp.path()), || {
        let err = ConfigTree::load_layered(Format::Sectioned, None).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { line: Some(1), .. }), "{err}");
    });
}
