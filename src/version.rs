//! Retrieves the version stamp shown in the generated page's heading: the
//! project's git commit hash and timestamp, plus the UTC build time. Version
//! detection is best-effort; a project that isn't a git checkout still
//! builds, it just shows "unknown".

use chrono::Utc;
use std::path::Path;
use std::process::Command;

/// A version stamp. Opaque to the rest of the pipeline; the assembler only
/// formats it for display.
#[derive(Clone, Debug)]
pub struct Version {
    /// Short commit hash, or "unknown" outside a git checkout.
    pub hash: String,

    /// Commit timestamp (ISO 8601), empty when unknown.
    pub timestamp: String,

    /// UTC build time, `%Y-%m-%dT%H:%M:%SZ`.
    pub generated: String,
}

impl Version {
    /// Detects the version stamp for the project at `dir`.
    pub fn detect(dir: &Path) -> Version {
        let generated = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        match (
            git_output(dir, &["rev-parse", "--short", "HEAD"]),
            git_output(dir, &["log", "-1", "--format=%cI"]),
        ) {
            (Some(hash), Some(timestamp)) => Version {
                hash,
                timestamp,
                generated,
            },
            _ => Version {
                hash: "unknown".to_owned(),
                timestamp: String::new(),
                generated,
            },
        }
    }

    /// Human-readable label for the page heading, e.g. `a1b2c3d (2026-08-27)`.
    pub fn label(&self) -> String {
        let date = self
            .generated
            .get(..10)
            .unwrap_or(self.generated.as_str());
        format!("{} ({})", self.hash, date)
    }
}

fn git_output(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
