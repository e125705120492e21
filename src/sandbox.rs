use crate::errors::{FsError, FsResult};
use crate::root::ExecutableRoot;
use serde::Deserialize;
use std::path::MAIN_SEPARATOR;
use tracing::error;

/// What happens after a fatal error (sandbox escape, missing root, empty
/// path) has been logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationPolicy {
    /// Terminate the process.
    #[default]
    Abort,
    /// Return the fatal error to the caller.
    Error,
}

#[derive(Debug, Clone, Copy)]
pub struct SandboxGuard<'a> {
    root: &'a ExecutableRoot,
}

impl<'a> SandboxGuard<'a> {
    pub fn new(root: &'a ExecutableRoot) -> Self {
        Self { root }
    }

    /// True when `localized` names something strictly below the root.
    ///
    /// The root must match at a directory boundary, so `/srv/app2/x` is not
    /// under `/srv/app`, and the remainder may not climb out with `..`.
    pub fn is_allowed(&self, localized: &str) -> bool {
        let allowed = within_root(self.root.as_str(), localized);
        if !allowed {
            error!(path = localized, root = self.root.as_str(), "illegal file operation outside the executable root");
        }
        allowed
    }

    pub fn enforce(&self, localized: &str, policy: ViolationPolicy) -> FsResult<()> {
        if self.is_allowed(localized) {
            Ok(())
        } else {
            Err(FsError::SandboxViolation { path: localized.to_string() }.escalate(policy))
        }
    }
}

fn within_root(root: &str, path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    let Some(rest) = path.strip_prefix(root) else {
        return false;
    };
    if !rest.starts_with(MAIN_SEPARATOR) {
        return false;
    }
    let mut named = false;
    for part in rest.split(MAIN_SEPARATOR).filter(|p| !p.is_empty() && *p != ".") {
        if part == ".." {
            return false;
        }
        named = true;
    }
    named
}
