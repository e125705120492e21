//! Executable-rooted file utilities.
//!
//! Paths are localized against the directory holding the running program,
//! and anything that creates or deletes filesystem state is confined to that
//! directory.

pub mod config;
pub mod errors;
pub mod fs;
pub mod localize;
pub mod logging;
pub mod root;
pub mod sandbox;
pub mod timer;


pub use errors::{FsError, FsResult};
pub use fs::FilesystemService;
pub use localize::{LocalizedPath, PathLocalizer};
pub use root::{initialize_root, ExecutableRoot, RootRegistry};
pub use sandbox::{SandboxGuard, ViolationPolicy};
pub use timer::FunctionTimer;
