use super::FilesystemService;
use std::{fs, io, path::Path, time::UNIX_EPOCH};
use tracing::{debug, warn};

impl FilesystemService {
    /// True when `path` exists and is readable.
    pub fn exists(&self, path: &str) -> bool {
        let Some(path) = self.localize_or_warn(path) else { return false };
        match readable(path.as_path()) {
            Ok(()) => true,
            Err(err) => {
                warn!(path = %path, error = %err, "failed to test for file");
                false
            }
        }
    }

    /// Size in bytes, or 0 when the path cannot be stat'ed.
    pub fn size(&self, path: &str) -> u64 {
        let Some(path) = self.localize_or_warn(path) else { return 0 };
        match fs::metadata(path.as_path()) {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!(path = %path, error = %err, "stat failed");
                0
            }
        }
    }

    /// Modification time in seconds since the Unix epoch, or 0 on failure.
    pub fn modified_time(&self, path: &str) -> u64 {
        let Some(path) = self.localize_or_warn(path) else { return 0 };
        let modified = fs::metadata(path.as_path()).and_then(|meta| meta.modified());
        match modified {
            Ok(time) => match time.duration_since(UNIX_EPOCH) {
                Ok(since) => since.as_secs(),
                Err(err) => {
                    warn!(path = %path, error = %err, "modification time predates the epoch");
                    0
                }
            },
            Err(err) => {
                warn!(path = %path, error = %err, "stat failed");
                0
            }
        }
    }

    /// True when the directory holds no entries, or cannot be read at all.
    pub fn is_directory_empty(&self, path: &str) -> bool {
        let Some(path) = self.localize_or_warn(path) else { return true };
        dir_is_empty(path.as_path())
    }
}

pub(super) fn dir_is_empty(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "directory unreadable, treating as empty");
            true
        }
    }
}

#[cfg(unix)]
fn readable(path: &Path) -> io::Result<()> {
    use rustix::fs::{access, Access};
    access(path, Access::EXISTS | Access::READ_OK).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn readable(path: &Path) -> io::Result<()> {
    fs::metadata(path).map(|_| ())
}
