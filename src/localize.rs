//! Path localization: turn a caller-supplied path into an OS-correct path
//! anchored at the executable root.
//!
//! A path is *already rooted* when it starts with a separator of either
//! convention or with `.`; such paths keep their prefix and are only
//! separator-normalized. Anything else is prefixed with the root.
//!
//! The low-level entry point follows a size-then-fill protocol: call
//! [`PathLocalizer::localize_into`] without a buffer (or with a zero length)
//! to learn the required length, then again with a buffer of that length.

use crate::errors::{FsError, FsResult};
use crate::root::ExecutableRoot;
use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};
use tracing::warn;

/// The separator this host does not use.
pub const FOREIGN_SEPARATOR: char = if MAIN_SEPARATOR == '/' { '\\' } else { '/' };

pub fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Rewrite every foreign separator to the native one.
pub fn to_native(raw: &str) -> String {
    raw.replace(FOREIGN_SEPARATOR, MAIN_SEPARATOR_STR)
}

pub fn is_rooted(raw: &str) -> bool {
    match raw.as_bytes().first() {
        Some(b'/' | b'\\' | b'.') => true,
        _ => cfg!(windows) && has_drive_prefix(raw),
    }
}

// `C:` style prefixes
fn has_drive_prefix(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// An owned, localized path. Always uses the native separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalizedPath(String);

impl LocalizedPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        PathBuf::from(self.0)
    }
}

impl fmt::Display for LocalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for LocalizedPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl AsRef<str> for LocalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PathLocalizer<'a> {
    root: &'a ExecutableRoot,
}

impl<'a> PathLocalizer<'a> {
    pub fn new(root: &'a ExecutableRoot) -> Self {
        Self { root }
    }

    /// Exact byte length of the localized form of `raw`.
    pub fn required_len(&self, raw: &str) -> usize {
        if is_rooted(raw) {
            raw.len()
        } else {
            raw.len() + self.root.len() + 1
        }
    }

    /// Size-then-fill localization.
    ///
    /// With `output == None` or `*max_len == 0`, writes the required length
    /// into `max_len` and touches nothing else. Otherwise `*max_len` (capped
    /// at the buffer's length) must cover the required length, or
    /// [`FsError::InsufficientBuffer`] is returned and the buffer is left
    /// untouched. On success the path occupies the front of the buffer, the
    /// rest of the negotiated length is zeroed, and `max_len` holds the path
    /// length.
    pub fn localize_into(
        &self,
        raw: &str,
        output: Option<&mut [u8]>,
        max_len: &mut usize,
    ) -> FsResult<()> {
        if raw.is_empty() {
            return Err(FsError::EmptyPath);
        }
        let required = self.required_len(raw);
        let buf = match output {
            Some(buf) if *max_len != 0 => buf,
            _ => {
                *max_len = required;
                return Ok(());
            }
        };

        let capacity = (*max_len).min(buf.len());
        if capacity < required {
            warn!(path = raw, required, provided = capacity, "localization buffer too small");
            return Err(FsError::InsufficientBuffer { required, provided: capacity });
        }

        let mut written = 0;
        if !is_rooted(raw) {
            let root = self.root.as_str().as_bytes();
            buf[..root.len()].copy_from_slice(root);
            buf[root.len()] = MAIN_SEPARATOR as u8;
            written = root.len() + 1;
        }
        buf[written..required].copy_from_slice(raw.as_bytes());
        for byte in &mut buf[..required] {
            if *byte == FOREIGN_SEPARATOR as u8 {
                *byte = MAIN_SEPARATOR as u8;
            }
        }
        buf[required..capacity].fill(0);

        *max_len = required;
        Ok(())
    }

    /// Run both phases and return the owned result.
    pub fn localize(&self, raw: &str) -> FsResult<LocalizedPath> {
        let mut len = 0;
        self.localize_into(raw, None, &mut len)?;
        let mut buf = vec![0u8; len];
        self.localize_into(raw, Some(&mut buf), &mut len)?;
        buf.truncate(len);
        String::from_utf8(buf)
            .map(LocalizedPath)
            .map_err(|e| FsError::Internal(e.to_string()))
    }
}
