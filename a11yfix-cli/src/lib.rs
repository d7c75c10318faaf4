//! Library half of the `a11yfix` binary: config loading and console output.

pub mod config;
pub mod console;
