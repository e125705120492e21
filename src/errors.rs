use crate::sandbox::ViolationPolicy;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("executable root has not been initialized")]
    RootNotInitialized,
    #[error("executable root already initialized to '{0}'")]
    RootAlreadyInitialized(String),
    #[error("path must not be empty")]
    EmptyPath,
    #[error("file operation outside the executable root: '{path}'")]
    SandboxViolation { path: String },
    #[error("buffer too small: {required} bytes required, {provided} provided")]
    InsufficientBuffer { required: usize, provided: usize },
    #[error("directory not empty: '{path}'")]
    DirectoryNotEmpty { path: String },
    #[error("{op} '{path}': {source}")]
    Io {
        op: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("internal error: {0}")]
    Internal(String),
}

impl FsError {
    pub fn code(&self) -> &'static str {
        match self {
            FsError::RootNotInitialized => "RootNotInitialized",
            FsError::RootAlreadyInitialized(_) => "RootAlreadyInitialized",
            FsError::EmptyPath => "EmptyPath",
            FsError::SandboxViolation { .. } => "SandboxViolation",
            FsError::InsufficientBuffer { .. } => "InsufficientBuffer",
            FsError::DirectoryNotEmpty { .. } => "DirectoryNotEmpty",
            FsError::Io { .. } => "Io",
            FsError::Internal(_) => "Internal",
        }
    }

    /// Caller bugs and sandbox escapes. These are never retried; under
    /// [`ViolationPolicy::Abort`] they terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FsError::RootNotInitialized
                | FsError::RootAlreadyInitialized(_)
                | FsError::EmptyPath
                | FsError::SandboxViolation { .. }
        )
    }

    pub(crate) fn io(op: &'static str, path: impl Into<String>, source: io::Error) -> Self {
        FsError::Io { op, path: path.into(), source }
    }

    /// Apply `policy` to a fatal error: abort the process, or hand the error
    /// back so the caller (usually a test harness) can observe it.
    pub fn escalate(self, policy: ViolationPolicy) -> Self {
        if self.is_fatal() {
            tracing::error!(code = self.code(), error = %self, "fatal file utility error");
            if policy == ViolationPolicy::Abort {
                std::process::abort();
            }
        }
        self
    }
}

pub type FsResult<T> = Result<T, FsError>;
