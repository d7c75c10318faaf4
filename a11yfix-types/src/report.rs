use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Machine-readable record of one fixer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub scan: ScanInfo,
    pub rule: RuleInfo,

    #[serde(default)]
    pub fixed: Vec<FixedFile>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedFile>,

    pub summary: ReportSummary,
}

impl RunReport {
    pub fn new(tool: ToolInfo, scan: ScanInfo, rule: RuleInfo, dry_run: bool) -> Self {
        Self {
            schema: crate::schema::A11YFIX_REPORT_V1.to_string(),
            tool,
            run: RunInfo {
                started_at: Some(Utc::now()),
                ended_at: None,
                dry_run,
            },
            scan,
            rule,
            fixed: vec![],
            failures: vec![],
            summary: ReportSummary::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    /// True when no file was written.
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanInfo {
    pub root: Utf8PathBuf,
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub tag: String,
    pub attribute: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedFile {
    pub path: Utf8PathBuf,
    pub insertions: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    pub path: Utf8PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub files_scanned: u64,
    pub files_fixed: u64,
    pub files_failed: u64,
    pub total_insertions: u64,
}
