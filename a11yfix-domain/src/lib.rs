//! Domain logic: which text gets rewritten, and where source files come from.
//!
//! This crate owns *what* a fix looks like. Driving a run over a tree and
//! writing results back is the `a11yfix-edit` crate.

mod ports;
mod rule;

pub use ports::{
    Discovery, FsSourceTree, InMemorySourceTree, NON_UTF8_PATH, SkippedEntry, SourceTree,
};
pub use rule::{AttributeFixer, AttributeRule, RuleOutcome};
