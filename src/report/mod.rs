/// Behavioral and PII report data
///
/// Rendering code only ever sees a [`BehaviorReport`]. Where the report comes
/// from is behind [`ReportSource`]; today the only source is the bundled
/// sample, which stands in for a live analytics backend.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Sample report compiled into the binary
const SAMPLE_REPORT: &str = include_str!("sample_report.yaml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "OK"),
            CheckStatus::Warn => write!(f, "WARN"),
            CheckStatus::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub label: String,
    pub status: CheckStatus,
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub metrics: Vec<Metric>,

    #[serde(default)]
    pub checks: Vec<Check>,
}

impl ReportSection {
    /// Worst status among this section's checks
    pub fn worst_status(&self) -> Option<CheckStatus> {
        self.checks.iter().map(|c| c.status).max_by_key(|s| severity(*s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorReport {
    pub title: String,

    /// Where the data came from ("sample" for bundled data)
    #[serde(default)]
    pub source: String,

    /// One-line warnings surfaced before launching the perimeter
    #[serde(default)]
    pub known_issues: Vec<String>,

    #[serde(default)]
    pub sections: Vec<ReportSection>,
}

impl BehaviorReport {
    /// Count checks per status as (ok, warn, fail)
    pub fn status_counts(&self) -> (usize, usize, usize) {
        self.sections
            .iter()
            .flat_map(|s| &s.checks)
            .fold((0, 0, 0), |(ok, warn, fail), check| match check.status {
                CheckStatus::Ok => (ok + 1, warn, fail),
                CheckStatus::Warn => (ok, warn + 1, fail),
                CheckStatus::Fail => (ok, warn, fail + 1),
            })
    }
}

fn severity(status: CheckStatus) -> u8 {
    match status {
        CheckStatus::Ok => 0,
        CheckStatus::Warn => 1,
        CheckStatus::Fail => 2,
    }
}

/// Produces the report shown by `--show-report` and the launch warnings
pub trait ReportSource {
    fn load_report(&self) -> Result<BehaviorReport>;
}

/// Bundled sample data
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleReportSource;

impl ReportSource for SampleReportSource {
    fn load_report(&self) -> Result<BehaviorReport> {
        serde_saphyr::from_str(SAMPLE_REPORT).context("Failed to parse bundled sample report")
    }
}
