use crate::sandbox::ViolationPolicy;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub root: Root,
    #[serde(default)]
    pub sandbox: Sandbox,
    #[serde(default)]
    pub timer: Timer,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Root {
    /// Resolve the executable directory to an absolute, symlink-free path.
    #[serde(default)]
    pub canonicalize: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Sandbox {
    #[serde(default)]
    pub on_violation: ViolationPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Timer {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_report_path")]
    pub report_path: String,
}
fn default_report_path() -> String { "function_timer.csv".to_string() }

impl Default for Timer {
    fn default() -> Self {
        Self { enabled: false, report_path: default_report_path() }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Logging {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Ok(serde_json::from_str(&raw)?)
        } else {
            Ok(toml::from_str(&raw)?)
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timer.report_path.trim().is_empty() { anyhow::bail!("timer.report_path must not be empty"); }
        Ok(())
    }
}
