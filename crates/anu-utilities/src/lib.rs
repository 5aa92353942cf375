//! Public surface for the AnuUtilities startup helpers.
//!
//! Re-exports the config and logging crates and offers one-call helpers
//! that load the layered config for a format and bootstrap process logging
//! from it.

/// Re-export for convenience.
pub use anu_config as config;
/// Re-export for convenience.
pub use anu_logging as logging;

use anu_config::{ConfigError, ConfigTree, DocumentSource, Format};
use anu_logging::{LoggingError, ProcessLogger};
use anyhow::Context;
use log::debug;

/// Load the YAML stack: `DEFAULT_YAML_CONF_DIR` files, then `override_source`.
pub fn init_yaml_conf(override_source: Option<DocumentSource>) -> Result<ConfigTree, ConfigError> {
    load(Format::Structured, override_source)
}

/// Load the INI stack: `DEFAULT_CONF_DIR_PATH` files, then `override_source`.
pub fn init_config_parser(
    override_source: Option<DocumentSource>,
) -> Result<ConfigTree, ConfigError> {
    load(Format::Sectioned, override_source)
}

/// Bootstrap process logging from a merged tree. Call once per process.
pub fn init_logging(tree: &ConfigTree) -> Result<&'static ProcessLogger, LoggingError> {
    anu_logging::bootstrap(tree)
}

/// Load the YAML stack and bootstrap logging from it.
pub fn init_from_yaml(override_source: Option<DocumentSource>) -> anyhow::Result<ConfigTree> {
    let tree = init_yaml_conf(override_source).context("failed to load yaml config")?;
    init_logging(&tree).context("failed to initialize logging")?;
    Ok(tree)
}

/// Load the INI stack and bootstrap logging from it.
pub fn init_from_ini(override_source: Option<DocumentSource>) -> anyhow::Result<ConfigTree> {
    let tree = init_config_parser(override_source).context("failed to load ini config")?;
    init_logging(&tree).context("failed to initialize logging")?;
    Ok(tree)
}

fn load(
    format: Format,
    override_source: Option<DocumentSource>,
) -> Result<ConfigTree, ConfigError> {
    let layered = ConfigTree::load_layered(format, override_source)?;
    debug!(
        "config ready (format={:?}, layers={})",
        format,
        layered.layers.len()
    );
    Ok(layered.tree)
}
