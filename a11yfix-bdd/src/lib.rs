//! BDD harness (cucumber-rs).
//!
//! Scenario tests live in `tests/cucumber.rs`; this crate only carries the
//! fixture helpers the steps share.

use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;

/// Expand the escapes feature files use to keep fixtures on one line.
///
/// `\n` becomes a newline, `\t` a tab and `\\` a backslash. Anything else is
/// kept as written.
pub fn unescape_fixture(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_fixture(root: &Utf8Path, rel: &str, contents: impl AsRef<[u8]>) -> anyhow::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent))?;
    }
    fs::write(&path, contents).with_context(|| format!("write fixture {}", path))?;
    Ok(())
}
