//! Fix engine for a11yfix runs.
//!
//! Responsibilities:
//! - Read every discovered file, apply the attribute rule, and write the file
//!   back only when its content changed.
//! - Keep failures scoped to one file so the rest of the run continues.
//! - Produce unified diff previews and a serializable run report.

mod error;

pub use error::FileError;

use a11yfix_domain::{AttributeFixer, AttributeRule, Discovery, SourceTree};
use a11yfix_types::report::{
    FailedFile, FixedFile, ReportSummary, RuleInfo, RunReport, ScanInfo, ToolInfo,
};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use diffy::PatchFormatter;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct FixOptions {
    /// Compute fixes without writing anything.
    pub dry_run: bool,
    /// Attach a unified diff to every fixed file.
    pub with_patch: bool,
}

/// A file whose content changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFix {
    pub path: Utf8PathBuf,
    pub insertions: usize,
    pub patch: Option<String>,
}

/// Receives per-file results while a run is in progress.
pub trait RunObserver {
    fn file_fixed(&mut self, _fix: &FileFix) {}

    fn file_failed(&mut self, _error: &FileError) {}
}

impl RunObserver for () {}

/// Accumulated result of a run. Owned by the caller; nothing is global.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub fixed: Vec<FileFix>,
    pub failures: Vec<FileError>,
    pub total_insertions: usize,
}

impl RunSummary {
    fn record_fix(&mut self, fix: FileFix) {
        self.total_insertions += fix.insertions;
        self.fixed.push(fix);
    }

    fn record_failure(&mut self, err: FileError, observer: &mut dyn RunObserver) {
        debug!(path = %err.path(), "file failed: {}", err);
        observer.file_failed(&err);
        self.failures.push(err);
    }

    /// Concatenated patches of all fixed files (empty unless patches were requested).
    pub fn patch(&self) -> String {
        self.fixed
            .iter()
            .filter_map(|f| f.patch.as_deref())
            .collect()
    }
}

/// Fix a single file.
///
/// Returns `Ok(None)` when the rule leaves the content unchanged; the file is
/// not touched in that case.
pub fn fix_file(
    tree: &dyn SourceTree,
    fixer: &AttributeFixer,
    path: &Utf8Path,
    opts: &FixOptions,
) -> Result<Option<FileFix>, FileError> {
    let original = tree
        .read_to_string(path)
        .map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let outcome = fixer.apply(&original);
    if !outcome.changed() {
        debug!(path = %path, "no qualifying occurrences");
        return Ok(None);
    }

    let patch = opts
        .with_patch
        .then(|| render_patch(path, &original, &outcome.content));

    if opts.dry_run {
        debug!(path = %path, insertions = outcome.insertions, "dry-run: not writing");
    } else {
        tree.write(path, &outcome.content)
            .map_err(|source| FileError::Write {
                path: path.to_path_buf(),
                source,
            })?;
    }

    Ok(Some(FileFix {
        path: path.to_path_buf(),
        insertions: outcome.insertions,
        patch,
    }))
}

/// Run the fixer over every `*.{extension}` file in `tree`, one file at a time.
///
/// Only discovery failures abort the run. Per-file failures are handed to the
/// observer, collected in the summary, and counted as zero insertions.
/// Entries the walk could not hand out are reported after the regular files.
pub fn run_fixer(
    tree: &dyn SourceTree,
    fixer: &AttributeFixer,
    extension: &str,
    opts: &FixOptions,
    observer: &mut dyn RunObserver,
) -> anyhow::Result<RunSummary> {
    let Discovery { files, skipped } = tree
        .discover(extension)
        .with_context(|| format!("discover *.{} files under {}", extension, tree.root()))?;
    debug!(
        root = %tree.root(),
        count = files.len(),
        skipped = skipped.len(),
        "discovered files"
    );

    let mut summary = RunSummary::default();
    for path in files {
        summary.files_scanned += 1;
        match fix_file(tree, fixer, &path, opts) {
            Ok(Some(fix)) => {
                observer.file_fixed(&fix);
                summary.record_fix(fix);
            }
            Ok(None) => {}
            Err(err) => summary.record_failure(err, observer),
        }
    }
    for entry in skipped {
        summary.files_scanned += 1;
        summary.record_failure(
            FileError::Skipped {
                path: entry.path,
                reason: entry.reason,
            },
            observer,
        );
    }

    info!(
        scanned = summary.files_scanned,
        fixed = summary.fixed.len(),
        failed = summary.failures.len(),
        insertions = summary.total_insertions,
        "run complete"
    );
    Ok(summary)
}

/// Unified diff for one file, with git-style headers.
pub fn render_patch(path: &Utf8Path, before: &str, after: &str) -> String {
    let mut out = String::new();
    if before == after {
        return out;
    }

    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(before, after);
    let body = PatchFormatter::new().fmt_patch(&patch).to_string();
    // diffy emits its own `--- original` / `+++ modified` header.
    for line in body
        .lines()
        .skip_while(|l| l.starts_with("--- ") || l.starts_with("+++ "))
    {
        out.push_str(line);
        out.push('\n');
    }

    out
}

pub fn rule_info(rule: &AttributeRule) -> RuleInfo {
    RuleInfo {
        tag: rule.tag.clone(),
        attribute: rule.attribute.clone(),
        value: rule.value.clone(),
    }
}

/// Build the `a11yfix.report.v1` document for a finished run.
pub fn report_from_summary(
    summary: &RunSummary,
    tool: ToolInfo,
    scan: ScanInfo,
    rule: &AttributeRule,
    dry_run: bool,
) -> RunReport {
    let mut report = RunReport::new(tool, scan, rule_info(rule), dry_run);

    report.fixed = summary
        .fixed
        .iter()
        .map(|f| FixedFile {
            path: f.path.clone(),
            insertions: f.insertions as u64,
        })
        .collect();
    report.failures = summary
        .failures
        .iter()
        .map(|e| FailedFile {
            path: e.path().to_path_buf(),
            message: e.cause(),
        })
        .collect();
    report.summary = ReportSummary {
        files_scanned: summary.files_scanned as u64,
        files_fixed: summary.fixed.len() as u64,
        files_failed: summary.failures.len() as u64,
        total_insertions: summary.total_insertions as u64,
    };
    report.run.ended_at = Some(Utc::now());

    report
}
