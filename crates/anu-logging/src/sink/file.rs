//! Size-based rotating log file.

use log::LevelFilter;
use parking_lot::Mutex;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Appends lines to `<base>` and rotates it to `<base>.1 .. <base>.N` once
/// the next line would reach `max_bytes`.
///
/// The rotation check, the rename cascade, and the write that follows all
/// happen under one lock: concurrent writers never split a record across
/// files, and a threshold crossing triggers exactly one rotation. Nothing in
/// here may log through the `log` facade while that lock is held.
#[derive(Debug)]
pub struct RotatingFileSink {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    level: LevelFilter,
    state: Mutex<FileState>,
}

#[derive(Debug)]
struct FileState {
    /// `None` after a rotation whose reopen failed; retried on next write.
    file: Option<File>,
    size: u64,
}

impl RotatingFileSink {
    /// Open (or create) `path` in append mode.
    pub fn open(
        path: impl AsRef<Path>,
        max_bytes: u64,
        backup_count: usize,
        level: LevelFilter,
    ) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_append(&path)?;
        let size = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            backup_count,
            level,
            state: Mutex::new(FileState {
                file: Some(file),
                size,
            }),
        })
    }

    /// Path of the active file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Path of the `index`-th rotated file (`<base>.<index>`).
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    /// Append one line (a trailing newline is added).
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');

        let mut state = self.state.lock();
        if self.should_rotate(state.size, bytes.len() as u64) {
            self.rotate(&mut state)?;
        }
        let file = match state.file.take() {
            Some(file) => file,
            None => {
                let file = open_append(&self.path)?;
                state.size = file.metadata()?.len();
                file
            }
        };
        state.file.insert(file).write_all(&bytes)?;
        state.size += bytes.len() as u64;
        Ok(())
    }

    pub fn flush(&self) -> io::Result<()> {
        match self.state.lock().file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    fn should_rotate(&self, size: u64, incoming: u64) -> bool {
        self.max_bytes > 0
            && self.backup_count > 0
            && size > 0
            && size.saturating_add(incoming) >= self.max_bytes
    }

    fn rotate(&self, state: &mut FileState) -> io::Result<()> {
        // Close the active handle before renaming it.
        state.file = None;
        for index in (1..self.backup_count).rev() {
            let source = self.backup_path(index);
            if source.exists() {
                let target = self.backup_path(index + 1);
                remove_if_exists(&target)?;
                fs::rename(&source, &target)?;
            }
        }
        let first = self.backup_path(1);
        remove_if_exists(&first)?;
        if self.path.exists() {
            fs::rename(&self.path, &first)?;
        }
        state.file = Some(open_append(&self.path)?);
        state.size = 0;
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}
