//! Whole-file reads and writes on top of the localized, sandboxed paths.

use super::FilesystemService;
use crate::errors::{FsError, FsResult};
use std::{
    fs,
    io::{self, Read},
};
use tracing::{debug, warn};

impl FilesystemService {
    /// Read a file, truncated to `limit` bytes when given.
    pub fn read_binary(&self, path: &str, limit: Option<u64>) -> FsResult<Vec<u8>> {
        let localized = self.localize(path)?;
        let file = fs::File::open(localized.as_path()).map_err(|err| {
            warn!(path = %localized, error = %err, "failed to open file");
            FsError::io("open", localized.as_str(), err)
        })?;

        let mut data = Vec::new();
        let read = match limit {
            Some(limit) => file.take(limit).read_to_end(&mut data),
            None => (&file).read_to_end(&mut data),
        };
        read.map_err(|err| {
            warn!(path = %localized, error = %err, "failed to read file");
            FsError::io("read", localized.as_str(), err)
        })?;
        debug!(path = %localized, bytes = data.len(), "read file");
        Ok(data)
    }

    /// Read a UTF-8 file, truncated to at most `max_len` bytes. A multi-byte
    /// character cut by the limit is dropped; one cut by the end of the file
    /// is an error.
    pub fn read_text(&self, path: &str, max_len: Option<u64>) -> FsResult<String> {
        let data = self.read_binary(path, max_len)?;
        let hit_limit = max_len.is_some_and(|limit| data.len() as u64 == limit);
        match String::from_utf8(data) {
            Ok(text) => Ok(text),
            Err(err) if hit_limit && err.utf8_error().error_len().is_none() => {
                let valid = err.utf8_error().valid_up_to();
                let mut bytes = err.into_bytes();
                bytes.truncate(valid);
                String::from_utf8(bytes).map_err(|e| FsError::Internal(e.to_string()))
            }
            Err(err) => {
                warn!(path, error = %err, "file is not valid UTF-8");
                Err(FsError::io("read text", path, io::Error::new(io::ErrorKind::InvalidData, err)))
            }
        }
    }

    /// Replace the file's contents with `contents`. Parent folders are not
    /// created; use [`FilesystemService::create_folder`] first.
    pub fn write_binary(&self, path: &str, contents: &[u8]) -> FsResult<usize> {
        let localized = self.localize_guarded(path)?;
        fs::write(localized.as_path(), contents).map_err(|err| {
            warn!(path = %localized, error = %err, "failed to write file");
            FsError::io("write", localized.as_str(), err)
        })?;
        debug!(path = %localized, bytes = contents.len(), "wrote file");
        Ok(contents.len())
    }
}
