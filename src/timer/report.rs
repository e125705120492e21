use super::FunctionTimer;
use crate::{errors::FsResult, fs::FilesystemService};
use std::fmt::Write;
use tracing::info;

pub const REPORT_HEADER: &str = "functionName,avgTimeMs,maxTimeMs,minTimeMs";

impl FunctionTimer {
    /// CSV report: a header row, then one row per function sorted by name.
    pub fn report(&self) -> String {
        let mut out = String::with_capacity(64 * (self.entries().len() + 1));
        out.push_str(REPORT_HEADER);
        out.push('\n');
        for (name, stats) in self.entries() {
            // writing into a String cannot fail
            let _ = writeln!(out, "{},{:.6},{:.6},{:.6}", name, stats.avg_ms, stats.max_ms, stats.min_ms);
        }
        out
    }

    /// Rewrite the report at `path` in full.
    pub fn write_report(&self, fs: &FilesystemService, path: &str) -> FsResult<usize> {
        let written = fs.write_binary(path, self.report().as_bytes())?;
        info!(path, functions = self.entries().len(), bytes = written, "function timer report written");
        Ok(written)
    }
}
