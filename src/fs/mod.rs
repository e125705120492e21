pub mod io;
mod mutate;
mod query;

use crate::{
    config::Config,
    errors::FsResult,
    localize::{LocalizedPath, PathLocalizer},
    root::{self, ExecutableRoot},
    sandbox::{SandboxGuard, ViolationPolicy},
};
use tracing::warn;

/// File utilities bound to one executable root.
///
/// Every operation localizes its path argument first. Operations that create
/// or delete filesystem state then pass the localized path through the
/// sandbox guard before touching the disk.
#[derive(Debug, Clone)]
pub struct FilesystemService {
    root: ExecutableRoot,
    policy: ViolationPolicy,
}

impl FilesystemService {
    pub fn new(root: ExecutableRoot, policy: ViolationPolicy) -> Self {
        Self { root, policy }
    }

    /// Bind to the process-wide root set by [`root::initialize_root`].
    pub fn from_registry(policy: ViolationPolicy) -> FsResult<Self> {
        let root = root::executable_root().map_err(|e| e.escalate(policy))?;
        Ok(Self::new(root.clone(), policy))
    }

    pub fn from_config(cfg: &Config) -> FsResult<Self> {
        Self::from_registry(cfg.sandbox.on_violation)
    }

    pub fn root(&self) -> &ExecutableRoot {
        &self.root
    }

    pub fn policy(&self) -> ViolationPolicy {
        self.policy
    }

    pub fn localizer(&self) -> PathLocalizer<'_> {
        PathLocalizer::new(&self.root)
    }

    pub fn guard(&self) -> SandboxGuard<'_> {
        SandboxGuard::new(&self.root)
    }

    pub fn localize(&self, path: &str) -> FsResult<LocalizedPath> {
        self.localizer().localize(path).map_err(|e| e.escalate(self.policy))
    }

    pub fn localize_into(&self, path: &str, output: Option<&mut [u8]>, max_len: &mut usize) -> FsResult<()> {
        self.localizer()
            .localize_into(path, output, max_len)
            .map_err(|e| e.escalate(self.policy))
    }

    pub fn is_allowed(&self, localized: &str) -> bool {
        self.guard().is_allowed(localized)
    }

    // localize, then refuse anything outside the root
    pub(crate) fn localize_guarded(&self, path: &str) -> FsResult<LocalizedPath> {
        let localized = self.localize(path)?;
        self.guard().enforce(localized.as_str(), self.policy)?;
        Ok(localized)
    }

    // for queries that report failure as a sentinel instead of an error
    fn localize_or_warn(&self, path: &str) -> Option<LocalizedPath> {
        match self.localize(path) {
            Ok(localized) => Some(localized),
            Err(err) => {
                warn!(path, error = %err, "failed to localize path");
                None
            }
        }
    }
}
