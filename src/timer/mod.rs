//! Per-function running timing statistics.

pub mod report;

use std::time::{Duration, Instant};
use tracing::trace;

/// Longest function name kept, in bytes.
pub const MAX_NAME_LEN: usize = 127;

#[derive(Debug, Clone, PartialEq)]
pub struct TimerStats {
    pub count: u64,
    pub total_ms: f64,
    pub avg_ms: f64,
    pub max_ms: f64,
    pub min_ms: f64,
}

impl TimerStats {
    fn first(ms: f64) -> Self {
        Self { count: 1, total_ms: ms, avg_ms: ms, max_ms: ms, min_ms: ms }
    }

    fn add(&mut self, ms: f64) {
        self.count += 1;
        self.total_ms += ms;
        self.avg_ms = self.total_ms / self.count as f64;
        self.max_ms = self.max_ms.max(ms);
        self.min_ms = self.min_ms.min(ms);
    }
}

/// An in-flight measurement, returned by [`FunctionTimer::start`].
#[derive(Debug)]
pub struct TimerSpan {
    name: String,
    started: Instant,
}

impl TimerSpan {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Default)]
pub struct FunctionTimer {
    entries: Vec<(String, TimerStats)>,
}

impl FunctionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, name: &str) -> TimerSpan {
        TimerSpan { name: function_name(name).to_string(), started: Instant::now() }
    }

    pub fn finish(&mut self, span: TimerSpan) -> Duration {
        let elapsed = span.started.elapsed();
        self.record(&span.name, elapsed);
        elapsed
    }

    pub fn record(&mut self, name: &str, elapsed: Duration) {
        let name = function_name(name);
        let ms = elapsed.as_secs_f64() * 1000.0;
        trace!(function = name, ms, "timed call");
        match self.entries.binary_search_by(|(n, _)| n.as_str().cmp(name)) {
            Ok(idx) => self.entries[idx].1.add(ms),
            Err(idx) => self.entries.insert(idx, (name.to_string(), TimerStats::first(ms))),
        }
    }

    /// Time `f` under `name` and return its result.
    pub fn time<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        let span = self.start(name);
        let out = f();
        self.finish(span);
        out
    }

    pub fn get(&self, name: &str) -> Option<&TimerStats> {
        let name = function_name(name);
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn list_names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[(String, TimerStats)] {
        &self.entries
    }
}

/// `"load_mesh(path)"` and `"load_mesh"` share an entry.
pub fn function_name(raw: &str) -> &str {
    let name = raw.split('(').next().unwrap_or(raw).trim();
    if name.len() <= MAX_NAME_LEN {
        return name;
    }
    let mut end = MAX_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
