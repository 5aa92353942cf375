//! Configuration documents and layered config loading.
//!
//! This crate owns the two supported document formats (YAML and INI-style
//! sections), the `ConfigTree` they parse into, and the layer-merging logic
//! that folds a defaults directory and an explicit override document into one
//! effective tree.

mod document;
mod error;
mod loader;
mod tree;

/// Document formats and sources understood by the loader.
pub use document::{DocumentSource, Format, load_document};
/// Public error type returned by config loading and lookup APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{
    ConfigLayer, ConfigLayerSource, INI_DEFAULTS_DIR_ENV, LayeredConfig, LayeredConfigOptions,
    YAML_DEFAULTS_DIR_ENV,
};
/// Merged configuration tree.
pub use tree::{ConfigTree, DEFAULT_SECTION};
