use a11yfix_cli::config::{self, ConfigMerger};
use a11yfix_cli::console::ConsoleObserver;
use a11yfix_domain::{AttributeFixer, AttributeRule, FsSourceTree};
use a11yfix_edit::{FixOptions, report_from_summary, run_fixer};
use a11yfix_render::{render_report_md, render_total_line};
use a11yfix_types::report::{ScanInfo, ToolInfo};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "a11yfix",
    version,
    about = "Insert type=\"button\" into <button> elements that lack it."
)]
struct Cli {
    /// Directory to scan (default: src, or [scan].root from a11yfix.toml).
    #[arg(long)]
    root: Option<Utf8PathBuf>,

    /// File extension to scan (default: tsx).
    #[arg(long)]
    extension: Option<String>,

    /// Config file (default: ./a11yfix.toml when present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Report what would change without writing any file.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Print a unified diff for every changed file.
    #[arg(long, default_value_t = false)]
    diff: bool,

    /// Output format (text, json, markdown).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::load_or_default(Utf8Path::new("."))
            .context("load a11yfix.toml config")?,
    };
    let merged = ConfigMerger::new(file_config).merge_cli_args(
        cli.root.clone(),
        cli.extension.clone(),
        cli.dry_run,
    )?;

    debug!(
        "merged config: root={}, extension={}, dry_run={}",
        merged.root, merged.extension, merged.dry_run
    );

    let rule = AttributeRule::default();
    let fixer = AttributeFixer::new(rule.clone()).context("build attribute rule")?;
    let tree = FsSourceTree::new(merged.root.clone());
    let opts = FixOptions {
        dry_run: merged.dry_run,
        with_patch: cli.diff,
    };

    if cli.format == OutputFormat::Text {
        let mut console = ConsoleObserver::text(&rule.tag, merged.dry_run, cli.diff);
        let summary = run_fixer(&tree, &fixer, &merged.extension, &opts, &mut console)?;

        println!();
        println!(
            "{}",
            render_total_line(summary.total_insertions as u64, &rule.tag, merged.dry_run)
        );
        return Ok(());
    }

    let mut console = ConsoleObserver::errors_only(&rule.tag);
    let summary = run_fixer(&tree, &fixer, &merged.extension, &opts, &mut console)?;
    let report = report_from_summary(
        &summary,
        tool_info(),
        ScanInfo {
            root: merged.root.clone(),
            extension: merged.extension.clone(),
        },
        &rule,
        merged.dry_run,
    );

    match cli.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serialize report")?
            );
        }
        OutputFormat::Markdown => {
            print!("{}", render_report_md(&report));
            if cli.diff && !summary.fixed.is_empty() {
                println!("\n## Patch\n\n```diff\n{}```", summary.patch());
            }
        }
        OutputFormat::Text => {}
    }

    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "a11yfix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
