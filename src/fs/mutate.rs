use super::{query::dir_is_empty, FilesystemService};
use crate::errors::{FsError, FsResult};
use std::{
    fs, io,
    path::{Path, MAIN_SEPARATOR},
};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

impl FilesystemService {
    /// Create `path` and every missing ancestor. Existing directories at any
    /// level count as success.
    pub fn create_folder(&self, path: &str) -> FsResult<()> {
        let localized = self.localize_guarded(path)?;
        let target = localized.as_str().trim_end_matches(MAIN_SEPARATOR);

        for (idx, _) in target.match_indices(MAIN_SEPARATOR).filter(|(idx, _)| *idx > 0) {
            make_dir(&target[..idx])?;
        }
        make_dir(target)?;
        debug!(path = target, "folder ready");
        Ok(())
    }

    /// Sweep the tree leaves-first, removing files and directories that are
    /// empty when visited, then remove `path` itself if nothing is left.
    /// Anything that survives the sweep makes the whole call fail, even
    /// though some entries may already be gone. Symlinks, including `path`
    /// itself, are unlinked and never followed.
    pub fn delete_folder(&self, path: &str) -> FsResult<()> {
        let localized = self.localize_guarded(path)?;
        let target = Path::new(localized.as_str().trim_end_matches(MAIN_SEPARATOR));

        if fs::symlink_metadata(target).is_ok_and(|meta| meta.file_type().is_symlink()) {
            remove_link(target).map_err(|err| {
                warn!(path = %target.display(), error = %err, "failed to unlink folder link");
                FsError::io("delete folder", target.display().to_string(), err)
            })?;
            info!(path = %target.display(), "folder link unlinked");
            return Ok(());
        }

        let walk = WalkDir::new(target).min_depth(1).follow_root_links(false).contents_first(true);
        for entry in walk {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(path = %target.display(), error = %err, "failed to visit entry");
                    continue;
                }
            };
            let removed = if entry.path_is_symlink() {
                remove_link(entry.path())
            } else if entry.file_type().is_dir() {
                if !dir_is_empty(entry.path()) {
                    debug!(path = %entry.path().display(), "keeping non-empty folder");
                    continue;
                }
                fs::remove_dir(entry.path())
            } else {
                fs::remove_file(entry.path())
            };
            if let Err(err) = removed {
                warn!(path = %entry.path().display(), error = %err, "failed to remove entry");
            }
        }

        if !dir_is_empty(target) {
            warn!(path = %target.display(), "folder still has contents after sweep");
            return Err(FsError::DirectoryNotEmpty { path: target.display().to_string() });
        }
        fs::remove_dir(target).map_err(|err| {
            warn!(path = %target.display(), error = %err, "failed to delete folder");
            FsError::io("delete folder", target.display().to_string(), err)
        })?;
        info!(path = %target.display(), "folder deleted");
        Ok(())
    }

    /// Remove a file, or a directory that is already empty. A symlink is
    /// unlinked whatever it points at.
    pub fn delete_file(&self, path: &str) -> FsResult<()> {
        let localized = self.localize_guarded(path)?;
        let target = localized.as_path();

        let meta = fs::symlink_metadata(target).map_err(|err| {
            warn!(path = %localized, error = %err, "stat failed");
            FsError::io("stat", localized.as_str(), err)
        })?;
        let removed = if meta.file_type().is_symlink() {
            remove_link(target)
        } else if meta.is_dir() {
            if !dir_is_empty(target) {
                warn!(path = %localized, "cannot delete a folder that is not empty");
                return Err(FsError::DirectoryNotEmpty { path: localized.as_str().to_string() });
            }
            fs::remove_dir(target)
        } else {
            fs::remove_file(target)
        };
        removed.map_err(|err| {
            warn!(path = %localized, error = %err, "failed to delete file");
            FsError::io("delete file", localized.as_str(), err)
        })?;
        debug!(path = %localized, "file deleted");
        Ok(())
    }
}

// windows directory links only go away through remove_dir
fn remove_link(link: &Path) -> io::Result<()> {
    match fs::remove_file(link) {
        Err(err) if cfg!(windows) => fs::remove_dir(link).map_err(|_| err),
        other => other,
    }
}

fn make_dir(dir: &str) -> FsResult<()> {
    if Path::new(dir).is_dir() {
        return Ok(());
    }
    match fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists && Path::new(dir).is_dir() => Ok(()),
        Err(err) => {
            warn!(path = dir, error = %err, "failed to create folder");
            Err(FsError::io("create folder", dir, err))
        }
    }
}
