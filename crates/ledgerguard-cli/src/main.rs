//! CLI entry point for ledgerguard.
//!
//! This module is thin: it handles argument parsing, I/O, logging setup, and exit codes.
//! All business logic lives in the `ledgerguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser, Subcommand};
use ledgerguard_app::{
    CheckInput, ExplainOutput, SchemaKind, exit_code, format_explanation, format_not_found,
    format_rules, list_rules, parse_report_json, render_markdown, run_check, run_explain,
    schema_json, serialize_report, write_report,
};
use ledgerguard_domain::registry;
use ledgerguard_settings::Overrides;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "ledgerguard.toml";

#[derive(Parser, Debug)]
#[command(
    name = "ledgerguard",
    version,
    about = "Phase-ordered accounting compliance checks over a ledger snapshot"
)]
struct Cli {
    /// Path to ledgerguard config TOML (default: ./ledgerguard.toml if present).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Override profile (standard|strict|lenient).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Log progress to stderr. Repeat for more detail (-v, -vv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate every phase against a context and write the report.
    Check {
        /// Context JSON document (subject, period, ledger, summary, rates).
        #[arg(long)]
        context: Utf8PathBuf,

        /// Where to write the JSON report (`-` for stdout).
        #[arg(long, default_value = "artifacts/ledgerguard/report.json")]
        report_out: Utf8PathBuf,

        /// Override the per-rule timeout in milliseconds.
        #[arg(long)]
        rule_timeout_ms: Option<u64>,

        /// Only run these phases (repeatable).
        #[arg(long = "phase")]
        phases: Vec<String>,

        /// Only run rules in these categories (repeatable).
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Write a Markdown summary alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown summary (if enabled).
        #[arg(long, default_value = "artifacts/ledgerguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/ledgerguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a rule with remediation guidance.
    Explain {
        /// The rule id to explain (e.g., "intake.trial_balance").
        rule_id: String,
    },

    /// List registered rules in execution order.
    Rules,

    /// Print a JSON Schema (config|report|context).
    Schema {
        kind: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Commands::Check {
            ref context,
            ref report_out,
            rule_timeout_ms,
            ref phases,
            ref categories,
            write_markdown,
            ref markdown_out,
        } => {
            let overrides = Overrides {
                profile: cli.profile.clone(),
                rule_timeout_ms,
                phases: phases.clone(),
                categories: categories.clone(),
            };
            let result = cmd_check(
                cli.config.as_deref(),
                context,
                overrides,
                report_out,
                write_markdown.then_some(markdown_out.as_path()),
            );
            match result {
                Ok(0) => Ok(()),
                Ok(code) => std::process::exit(code),
                Err(err) => {
                    eprintln!("ledgerguard error: {err:#}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Md { report, output } => cmd_md(&report, output.as_deref()),
        Commands::Explain { rule_id } => cmd_explain(&rule_id),
        Commands::Rules => {
            print!("{}", format_rules(&list_rules(&registry::global())));
            Ok(())
        }
        Commands::Schema { kind } => {
            println!("{}", schema_json(SchemaKind::parse(&kind)?)?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env("LEDGERGUARD_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_check(
    config: Option<&Utf8Path>,
    context_path: &Utf8Path,
    overrides: Overrides,
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    // An explicit --config must exist; the default path is optional.
    let config_text = match config {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read config: {path}"))?,
        None => std::fs::read_to_string(DEFAULT_CONFIG).unwrap_or_default(),
    };
    let context_json = std::fs::read_to_string(context_path)
        .with_context(|| format!("read context: {context_path}"))?;

    let output = run_check(CheckInput {
        context_json: &context_json,
        config_text: &config_text,
        overrides,
    })?;

    if report_out.as_str() == "-" {
        let data = serialize_report(&output.report)?;
        println!("{}", String::from_utf8_lossy(&data));
    } else {
        write_report(report_out, &output.report).context("write report json")?;
    }
    if let Some(path) = markdown_out {
        write_text_file(path, &render_markdown(&output.report)).context("write markdown")?;
    }

    let result = &output.report.result;
    tracing::info!(
        status = %result.status,
        risk_score = result.risk_score,
        risk_level = %result.risk_level,
        fail_on = %output.resolved_config.fail_on,
        "check finished"
    );
    Ok(exit_code(result, output.resolved_config.fail_on))
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {path}"))?;
    Ok(())
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&report);

    match output {
        Some(out_path) => write_text_file(out_path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }
    Ok(())
}

fn cmd_explain(rule_id: &str) -> anyhow::Result<()> {
    match run_explain(rule_id) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_ids,
        } => {
            eprint!("{}", format_not_found(&identifier, available_rule_ids));
            std::process::exit(1);
        }
    }
}
