//! Single-document loading for the supported config formats.
//!
//! A document is either YAML (`.yml`, arbitrary nesting) or INI-style
//! sections (`.ini`, flat keys grouped under `[section]` headers). Both parse
//! into a `ConfigTree`; the two formats are never mixed in one tree.

mod interpolate;
mod sections;
mod structured;

pub(crate) use interpolate::interpolate_value;

use crate::{ConfigError, ConfigTree, INI_DEFAULTS_DIR_ENV, YAML_DEFAULTS_DIR_ENV};
use log::debug;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Supported config document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// YAML documents ending in `.yml`.
    #[default]
    Structured,
    /// INI-style section documents ending in `.ini`.
    Sectioned,
}

impl Format {
    /// File extension (without the dot) recognized in a defaults directory.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Structured => "yml",
            Self::Sectioned => "ini",
        }
    }

    /// Environment variable naming the defaults directory for this format.
    pub const fn defaults_dir_env(self) -> &'static str {
        match self {
            Self::Structured => YAML_DEFAULTS_DIR_ENV,
            Self::Sectioned => INI_DEFAULTS_DIR_ENV,
        }
    }

    /// Whether a file name carries this format's extension.
    pub fn matches(self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(&format!(".{}", self.extension())))
    }

    /// Parse document contents in this format.
    pub fn parse(self, contents: &str, origin: &str) -> Result<ConfigTree, ConfigError> {
        let root = match self {
            Self::Structured => structured::parse_structured(contents, origin)?,
            Self::Sectioned => sections::parse_sections(contents, origin)?,
        };
        Ok(ConfigTree::from_map(self, root))
    }
}

/// Where a single config document comes from.
pub enum DocumentSource {
    /// In-memory contents with a label used in error messages.
    Text { label: String, contents: String },
    /// A file on disk.
    Path(PathBuf),
    /// An already-open stream with a label used in error messages.
    Reader {
        label: String,
        reader: Box<dyn Read + Send>,
    },
}

impl DocumentSource {
    /// Build a source from in-memory contents.
    pub fn text(label: impl Into<String>, contents: impl Into<String>) -> Self {
        Self::Text {
            label: label.into(),
            contents: contents.into(),
        }
    }

    /// Build a source from a file path.
    pub fn path(path: impl AsRef<Path>) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    /// Build a source from an open stream.
    pub fn reader(label: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Self::Reader {
            label: label.into(),
            reader: Box::new(reader),
        }
    }

    /// Identifier used for layer metadata and error messages.
    pub fn label(&self) -> String {
        match self {
            Self::Text { label, .. } | Self::Reader { label, .. } => label.clone(),
            Self::Path(path) => path.display().to_string(),
        }
    }

    /// Consume the source and return its contents.
    pub(crate) fn read_contents(self) -> Result<String, ConfigError> {
        match self {
            Self::Text { contents, .. } => Ok(contents),
            Self::Path(path) => fs::read_to_string(&path)
                .map_err(|err| ConfigError::read(path.display().to_string(), err)),
            Self::Reader { label, mut reader } => {
                let mut contents = String::new();
                reader
                    .read_to_string(&mut contents)
                    .map_err(|err| ConfigError::read(label, err))?;
                Ok(contents)
            }
        }
    }
}

impl fmt::Debug for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { label, contents } => f
                .debug_struct("Text")
                .field("label", label)
                .field("len", &contents.len())
                .finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Reader { label, .. } => f.debug_struct("Reader").field("label", label).finish(),
        }
    }
}

impl From<PathBuf> for DocumentSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for DocumentSource {
    fn from(path: &Path) -> Self {
        Self::path(path)
    }
}

/// Load one document in the given format.
pub fn load_document(format: Format, source: DocumentSource) -> Result<ConfigTree, ConfigError> {
    let origin = source.label();
    debug!("loading {:?} document (origin={})", format, origin);
    let contents = source.read_contents()?;
    format.parse(&contents, &origin)
}
