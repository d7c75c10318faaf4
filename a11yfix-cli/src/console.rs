//! Live console output while a run walks the tree.

use a11yfix_edit::{FileError, FileFix, RunObserver};
use a11yfix_render::{render_error_line, render_fixed_line};

/// Prints per-file lines as results arrive.
///
/// Fixed files (and their patches, when requested) go to stdout; failures
/// always go to stderr.
#[derive(Debug, Clone)]
pub struct ConsoleObserver {
    tag: String,
    dry_run: bool,
    print_fixes: bool,
    print_patches: bool,
}

impl ConsoleObserver {
    /// Observer for text output.
    pub fn text(tag: &str, dry_run: bool, print_patches: bool) -> Self {
        Self {
            tag: tag.to_string(),
            dry_run,
            print_fixes: true,
            print_patches,
        }
    }

    /// Observer that only reports failures, for structured output formats.
    pub fn errors_only(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            dry_run: false,
            print_fixes: false,
            print_patches: false,
        }
    }

    pub fn fixed_line(&self, fix: &FileFix) -> Option<String> {
        self.print_fixes.then(|| {
            render_fixed_line(&fix.path, fix.insertions as u64, &self.tag, self.dry_run)
        })
    }
}

impl RunObserver for ConsoleObserver {
    fn file_fixed(&mut self, fix: &FileFix) {
        if let Some(line) = self.fixed_line(fix) {
            println!("{}", line);
        }
        if self.print_patches
            && let Some(patch) = &fix.patch
        {
            print!("{}", patch);
        }
    }

    fn file_failed(&mut self, error: &FileError) {
        eprintln!("{}", render_error_line(error.path(), &error.cause()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix() -> FileFix {
        FileFix {
            path: "src/App.tsx".into(),
            insertions: 2,
            patch: None,
        }
    }

    #[test]
    fn text_observer_renders_fixed_line() {
        let console = ConsoleObserver::text("button", false, false);
        assert_eq!(
            console.fixed_line(&fix()).as_deref(),
            Some("Fixed src/App.tsx: 2 button(s)")
        );
    }

    #[test]
    fn dry_run_observer_says_would_fix() {
        let console = ConsoleObserver::text("button", true, false);
        assert_eq!(
            console.fixed_line(&fix()).as_deref(),
            Some("Would fix src/App.tsx: 2 button(s)")
        );
    }

    #[test]
    fn errors_only_observer_suppresses_fixed_lines() {
        let console = ConsoleObserver::errors_only("button");
        assert!(console.fixed_line(&fix()).is_none());
    }
}
