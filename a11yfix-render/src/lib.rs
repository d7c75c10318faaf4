//! Rendering helpers for human-readable output.
//!
//! Console lines are rendered one at a time so the CLI can print them while
//! the run is still walking the tree.

use a11yfix_types::report::RunReport;
use camino::Utf8Path;

/// `Fixed src/App.tsx: 2 button(s)`
pub fn render_fixed_line(path: &Utf8Path, insertions: u64, tag: &str, dry_run: bool) -> String {
    let verb = if dry_run { "Would fix" } else { "Fixed" };
    format!("{} {}: {} {}(s)", verb, path, insertions, tag)
}

/// `Total buttons fixed: 3`
pub fn render_total_line(total: u64, tag: &str, dry_run: bool) -> String {
    if dry_run {
        format!("Total {}s that would be fixed: {}", tag, total)
    } else {
        format!("Total {}s fixed: {}", tag, total)
    }
}

/// `Error processing src/Broken.tsx: stream did not contain valid UTF-8`
pub fn render_error_line(path: &Utf8Path, cause: &str) -> String {
    format!("Error processing {}: {}", path, cause)
}

pub fn render_report_md(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str("# a11yfix report\n\n");
    out.push_str(&format!(
        "- Rule: insert `{}=\"{}\"` into `<{}>`\n",
        report.rule.attribute, report.rule.value, report.rule.tag
    ));
    out.push_str(&format!(
        "- Root: `{}` (`*.{}`)\n",
        report.scan.root, report.scan.extension
    ));
    out.push_str(&format!(
        "- Mode: {}\n",
        if report.run.dry_run { "dry-run" } else { "write" }
    ));
    out.push_str(&format!(
        "- Files scanned: {}\n",
        report.summary.files_scanned
    ));
    out.push_str(&format!("- Files fixed: {}\n", report.summary.files_fixed));
    out.push_str(&format!(
        "- Insertions: {}\n",
        report.summary.total_insertions
    ));
    out.push_str(&format!("- Failures: {}\n\n", report.summary.files_failed));

    out.push_str("## Fixed files\n\n");
    if report.fixed.is_empty() {
        out.push_str("_No files needed changes._\n");
    } else {
        out.push_str("| File | Insertions |\n");
        out.push_str("|------|-----------:|\n");
        for f in &report.fixed {
            out.push_str(&format!("| `{}` | {} |\n", f.path, f.insertions));
        }
    }

    if !report.failures.is_empty() {
        out.push_str("\n## Failures\n\n");
        for f in &report.failures {
            out.push_str(&format!("- `{}`: {}\n", f.path, f.message));
        }
    }

    out
}
