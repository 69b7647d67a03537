use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{validate::Validator, ValidationError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    #[default]
    Any,
    Dir,
    File,
}

/// Converts a token into a filesystem path, optionally checking the entry.
///
/// Only read-only `stat`/`access` calls are made. A path that does not exist
/// passes every check unless `exists` is requested.
#[derive(Debug, Default, Clone)]
pub struct PathValidator {
    kind: EntryKind,
    resolve: bool,
    exists: bool,
    readable: bool,
    writable: bool,
    executable: bool,
}

impl PathValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing entries must be directories.
    pub fn dir() -> Self {
        Self { kind: EntryKind::Dir, ..Self::default() }
    }

    /// Existing entries must be regular files.
    pub fn file() -> Self {
        Self { kind: EntryKind::File, ..Self::default() }
    }

    /// Make the path absolute, following symlinks where it exists.
    pub fn resolve(mut self, yes: bool) -> Self {
        self.resolve = yes;
        self
    }

    pub fn exists(mut self, yes: bool) -> Self {
        self.exists = yes;
        self
    }

    pub fn readable(mut self, yes: bool) -> Self {
        self.readable = yes;
        self
    }

    pub fn writable(mut self, yes: bool) -> Self {
        self.writable = yes;
        self
    }

    pub fn executable(mut self, yes: bool) -> Self {
        self.executable = yes;
        self
    }
}

impl Validator for PathValidator {
    type Output = PathBuf;

    fn validate(&self, token: &str) -> Result<PathBuf, ValidationError> {
        let mut path = PathBuf::from(token);
        if self.resolve {
            path = resolve(&path);
        }

        let meta = match fs::metadata(&path) {
            Ok(it) => it,
            Err(_) if !self.exists => return Ok(path),
            Err(_) => return Err(fail(&path, "does not exist")),
        };

        match self.kind {
            EntryKind::Dir if !meta.is_dir() => return Err(fail(&path, "is not a directory")),
            EntryKind::File if !meta.is_file() => return Err(fail(&path, "is not a file")),
            _ => (),
        }
        if self.readable && !access(&path, Access::Read) {
            return Err(fail(&path, "is not readable"));
        }
        if self.writable && !access(&path, Access::Write) {
            return Err(fail(&path, "is not writable"));
        }
        if self.executable && !access(&path, Access::Execute) {
            return Err(fail(&path, "is not executable"));
        }
        Ok(path)
    }
}

fn fail(path: &Path, what: &str) -> ValidationError {
    ValidationError::new(format!("'{}' {what}.", path.display()))
}

fn resolve(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[derive(Debug, Clone, Copy)]
enum Access {
    Read,
    Write,
    Execute,
}

#[cfg(unix)]
fn access(path: &Path, access: Access) -> bool {
    use std::{ffi::CString, os::unix::ffi::OsStrExt};

    let mode = match access {
        Access::Read => libc::R_OK,
        Access::Write => libc::W_OK,
        Access::Execute => libc::X_OK,
    };
    let Ok(path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `path` is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(path.as_ptr(), mode) == 0 }
}

#[cfg(not(unix))]
fn access(path: &Path, access: Access) -> bool {
    match (access, fs::metadata(path)) {
        (_, Err(_)) => false,
        (Access::Write, Ok(meta)) => !meta.permissions().readonly(),
        (Access::Read | Access::Execute, Ok(_)) => true,
    }
}
