//! IO helpers for discovering and reading config layers from disk.

use super::{ConfigLayer, ConfigLayerSource, LoadedLayer};
use crate::{ConfigError, DocumentSource, Format, load_document};
use log::debug;
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List every file under `dir` (at any depth) carrying the format's extension.
///
/// Symlinked directories are not descended into, but a symlink that points
/// at a regular file is loaded like the file itself. Files are ordered
/// deepest first, then lexically by path, so merging in this order lets
/// shallower files win collisions with nested ones.
pub(super) fn discover_layer_files(
    dir: &Path,
    format: Format,
) -> Result<Vec<PathBuf>, ConfigError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|err| walk_error(dir, err))?;
        if format.matches(entry.path()) && is_layer_file(&entry) {
            found.push((entry.depth(), entry.into_path()));
        }
    }
    found.sort_by(|(left_depth, left), (right_depth, right)| {
        Reverse(*left_depth)
            .cmp(&Reverse(*right_depth))
            .then_with(|| left.cmp(right))
    });
    debug!(
        "discovered {} {:?} layer file(s) under {}",
        found.len(),
        format,
        dir.display()
    );
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// Load a single layer document.
pub(super) fn load_layer(
    format: Format,
    source: ConfigLayerSource,
    document: DocumentSource,
) -> Result<LoadedLayer, ConfigError> {
    let origin = document.label();
    debug!("loading config layer (source={:?}, origin={})", source, origin);
    let tree = load_document(format, document)?;
    Ok(LoadedLayer {
        meta: ConfigLayer { source, origin },
        tree,
    })
}

fn is_layer_file(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

fn walk_error(dir: &Path, err: walkdir::Error) -> ConfigError {
    let path = err
        .path()
        .unwrap_or(dir)
        .display()
        .to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    ConfigError::read(path, source)
}
