//! Layered configuration loader.
//!
//! Merges every document found in a defaults directory, then the explicit
//! override document on top, and produces one effective `ConfigTree`.
//!
//! Layer precedence (low -> high): defaults-directory files (deepest first,
//! then lexical path order), override document.

mod layer_io;
mod merge;


pub(crate) use merge::merge_maps;

use crate::{ConfigError, ConfigTree, DocumentSource, Format, load_document};
use log::{debug, info};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the YAML defaults directory.
pub const YAML_DEFAULTS_DIR_ENV: &str = "DEFAULT_YAML_CONF_DIR";
/// Environment variable naming the INI defaults directory.
pub const INI_DEFAULTS_DIR_ENV: &str = "DEFAULT_CONF_DIR_PATH";

/// Effective config plus metadata about which layers were merged.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged tree.
    pub tree: ConfigTree,
    /// Metadata for each merged layer, in merge order.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// A file found in the defaults directory.
    Defaults,
    /// The explicit override document (highest precedence).
    Override,
}

/// Metadata about a merged config layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Path or label of the document.
    pub origin: String,
}

/// Options controlling layered config discovery and overrides.
#[derive(Debug, Default)]
pub struct LayeredConfigOptions {
    /// Document format for every layer.
    pub format: Format,
    /// Directory whose matching files form the defaults layer.
    pub defaults_dir: Option<PathBuf>,
    /// Override document applied last.
    pub override_source: Option<DocumentSource>,
}

impl LayeredConfigOptions {
    /// Options with no defaults directory and no override.
    pub fn new(format: Format) -> Self {
        Self {
            format,
            defaults_dir: None,
            override_source: None,
        }
    }

    /// Options whose defaults directory comes from the format's environment
    /// variable (`DEFAULT_YAML_CONF_DIR` or `DEFAULT_CONF_DIR_PATH`).
    pub fn from_env(format: Format) -> Self {
        Self::from_env_var(format, format.defaults_dir_env())
    }

    /// Options whose defaults directory comes from an explicit variable name.
    ///
    /// An unset or empty variable disables the defaults layer.
    pub fn from_env_var(format: Format, var: &str) -> Self {
        let defaults_dir = env::var_os(var)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        debug!(
            "defaults directory from {} (set={})",
            var,
            defaults_dir.is_some()
        );
        Self {
            format,
            defaults_dir,
            override_source: None,
        }
    }

    /// Use the given defaults directory.
    pub fn with_defaults_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.defaults_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Apply the given override document last.
    pub fn with_override(mut self, source: DocumentSource) -> Self {
        self.override_source = Some(source);
        self
    }
}

impl ConfigTree {
    /// Load a single document from a path (no layering).
    pub fn load_from_path(format: Format, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        load_document(format, DocumentSource::path(path))
    }

    /// Load a single document from in-memory contents (no layering).
    pub fn load_from_str(format: Format, contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        format.parse(contents, "<string>")
    }

    /// Load the layered stack using the format's environment variable for the
    /// defaults directory.
    pub fn load_layered(
        format: Format,
        override_source: Option<DocumentSource>,
    ) -> Result<LayeredConfig, ConfigError> {
        let mut options = LayeredConfigOptions::from_env(format);
        options.override_source = override_source;
        Self::load_layered_with_options(options)
    }

    /// Load the layered stack using explicit options.
    ///
    /// A missing defaults directory is skipped silently. Any read or parse
    /// failure aborts the whole load.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let format = options.format;
        let mut tree = Self::new(format);
        let mut layers = Vec::new();

        match options.defaults_dir.as_deref() {
            Some(dir) if dir.is_dir() => {
                for path in layer_io::discover_layer_files(dir, format)? {
                    let layer = layer_io::load_layer(
                        format,
                        ConfigLayerSource::Defaults,
                        DocumentSource::Path(path),
                    )?;
                    tree.merge(&layer.tree);
                    layers.push(layer.meta);
                }
            }
            Some(dir) => {
                debug!(
                    "defaults directory missing; skipping defaults layer (path={})",
                    dir.display()
                );
            }
            None => debug!("no defaults directory configured"),
        }

        if let Some(source) = options.override_source {
            let layer = layer_io::load_layer(format, ConfigLayerSource::Override, source)?;
            tree.merge(&layer.tree);
            layers.push(layer.meta);
        }

        info!(
            "layered config loaded (format={:?}, layers={})",
            format,
            layers.len()
        );
        Ok(LayeredConfig { tree, layers })
    }
}

/// Internal representation of a loaded config layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: ConfigLayer,
    tree: ConfigTree,
}
