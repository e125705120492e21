//! The executable root: the directory holding the running program.
//!
//! Every bare path handed to the file utilities is resolved against this
//! directory, and every mutating operation must stay underneath it.

use crate::errors::{FsError, FsResult};
use crate::localize::{is_separator, to_native};
use std::ffi::OsStr;
use std::path::MAIN_SEPARATOR;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Directory component of the program's invocation path, with native
/// separators and no trailing separator. The filesystem root is stored as
/// the empty string so that `root + separator + path` never doubles up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableRoot {
    dir: String,
}

impl ExecutableRoot {
    /// Strip the file name from `invocation_path` (conventionally `argv[0]`).
    /// An invocation without any directory component is rooted at `.`.
    pub fn from_invocation(invocation_path: &str) -> FsResult<Self> {
        if invocation_path.is_empty() {
            return Err(FsError::EmptyPath);
        }
        let dir = match invocation_path.rfind(is_separator) {
            Some(idx) => &invocation_path[..idx],
            None => ".",
        };
        Ok(Self::from_dir(dir))
    }

    pub fn from_dir(dir: &str) -> Self {
        let mut dir = to_native(dir);
        while dir.ends_with(MAIN_SEPARATOR) {
            dir.pop();
        }
        Self { dir }
    }

    /// Like [`ExecutableRoot::from_invocation`], but a bare program name is
    /// looked up on `PATH` first, and the result is optionally canonicalized.
    pub fn resolve(invocation_path: &str, canonicalize: bool) -> FsResult<Self> {
        if invocation_path.is_empty() {
            return Err(FsError::EmptyPath);
        }
        let root = if invocation_path.contains(is_separator) {
            Self::from_invocation(invocation_path)?
        } else {
            match which::which(invocation_path) {
                Ok(found) => {
                    debug!(program = invocation_path, found = %found.display(), "resolved program on PATH");
                    Self::from_invocation(&found.to_string_lossy())?
                }
                Err(err) => {
                    debug!(program = invocation_path, error = %err, "program not on PATH, rooting at current directory");
                    Self::from_invocation(invocation_path)?
                }
            }
        };
        if !canonicalize {
            return Ok(root);
        }
        let target = if root.dir.is_empty() { MAIN_SEPARATOR.to_string() } else { root.dir.clone() };
        let canon = dunce::canonicalize(&target).map_err(|e| FsError::io("canonicalize", target, e))?;
        Ok(Self::from_dir(&canon.to_string_lossy()))
    }

    pub fn as_str(&self) -> &str {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.dir.len()
    }

    /// True when the root is the filesystem root itself.
    pub fn is_empty(&self) -> bool {
        self.dir.is_empty()
    }
}

/// A set-once slot for the process-wide root.
pub struct RootRegistry {
    cell: OnceLock<ExecutableRoot>,
}

impl RootRegistry {
    pub const fn new() -> Self {
        Self { cell: OnceLock::new() }
    }

    pub fn initialize(&self, invocation_path: &str) -> FsResult<&ExecutableRoot> {
        self.install(ExecutableRoot::from_invocation(invocation_path)?)
    }

    pub fn install(&self, root: ExecutableRoot) -> FsResult<&ExecutableRoot> {
        let mut installed = false;
        let current = self.cell.get_or_init(|| {
            installed = true;
            root
        });
        if installed {
            info!(root = current.as_str(), "executable root initialized");
            Ok(current)
        } else {
            Err(FsError::RootAlreadyInitialized(current.dir.clone()))
        }
    }

    pub fn get(&self) -> FsResult<&ExecutableRoot> {
        self.cell.get().ok_or(FsError::RootNotInitialized)
    }
}

impl Default for RootRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Text form of `argv[0]`. Invalid UTF-8 is replaced rather than rejected,
/// and a missing argument becomes the empty path.
pub fn invocation_path(arg0: Option<&OsStr>) -> String {
    arg0.map(|arg| arg.to_string_lossy().into_owned()).unwrap_or_default()
}

static GLOBAL_ROOT: RootRegistry = RootRegistry::new();

/// Record the process-wide root from `argv[0]`. Call once, at startup.
pub fn initialize_root(invocation_path: &str) -> FsResult<&'static ExecutableRoot> {
    GLOBAL_ROOT.initialize(invocation_path)
}

pub fn install_root(root: ExecutableRoot) -> FsResult<&'static ExecutableRoot> {
    GLOBAL_ROOT.install(root)
}

pub fn executable_root() -> FsResult<&'static ExecutableRoot> {
    GLOBAL_ROOT.get()
}

pub fn root_path() -> FsResult<&'static str> {
    Ok(executable_root()?.as_str())
}

pub fn root_len() -> FsResult<usize> {
    Ok(executable_root()?.len())
}
