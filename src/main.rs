// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! seobot CLI - Static-Content SEO Auditor

use clap::{Parser, Subcommand};
use seobot::config::{self, Config};
use seobot::report::OutputFormat;
use seobot::{audit, scanner, sitemap};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

/// seobot: Static-Content SEO Auditor
///
/// Validates JSON-LD structured data, normalizes page metadata and writes
/// audit reports for a statically built site.
#[derive(Parser)]
#[command(name = "seobot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Report what would change without writing documents
    #[arg(long, global = true)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output format (pretty, json)
    #[arg(long, global = true, default_value = "pretty")]
    format: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Validate JSON-LD in every document and write CSV/JSON reports
    ValidateSchema {
        /// Directory to scan
        #[arg(long)]
        dir: Option<PathBuf>,

        /// File extensions to scan (repeatable)
        #[arg(long = "ext")]
        extensions: Vec<String>,

        /// Report directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit non-zero when schema errors are found
        #[arg(long)]
        strict: bool,
    },

    /// Audit titles, descriptions and URLs of the configured routes
    Audit {
        /// Report directory
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Apply structural fixes to every document
    Fix {
        /// Directory to scan
        #[arg(long)]
        dir: Option<PathBuf>,

        /// File extensions to scan (repeatable)
        #[arg(long = "ext")]
        extensions: Vec<String>,
    },

    /// Write sitemap.xml and robots.txt for the configured routes
    Sitemap {
        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Configuration file format (yaml, toml)
        #[arg(long = "config-format")]
        config_format: Option<String>,
    },

    /// Show current configuration
    Show,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);

    if let Some(Command::Init { config_format }) = &cli.command {
        return handle_init(&config_path, init_format(config_format.as_deref(), &cli.format));
    }

    let format = match cli.format.parse::<OutputFormat>() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut config = match config::load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if cli.dry_run {
        config.dry_run = true;
    }

    match cli.command {
        Some(Command::Init { .. }) | None => handle_validate_schema(&config, format),
        Some(Command::Show) => handle_show(&config),
        Some(Command::ValidateSchema {
            dir,
            extensions,
            output,
            strict,
        }) => {
            apply_scan_overrides(&mut config, dir, extensions);
            if let Some(output) = output {
                config.output.schema_reports = output;
            }
            if strict {
                config.schema.strict = true;
            }
            handle_validate_schema(&config, format)
        }
        Some(Command::Audit { output }) => {
            if let Some(output) = output {
                config.output.audit_reports = output;
            }
            handle_audit(&config, format)
        }
        Some(Command::Fix { dir, extensions }) => {
            apply_scan_overrides(&mut config, dir, extensions);
            handle_fix(&config, format)
        }
        Some(Command::Sitemap { output }) => {
            if let Some(output) = output {
                config.output.sitemap = output;
            }
            handle_sitemap(&config)
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn apply_scan_overrides(config: &mut Config, dir: Option<PathBuf>, extensions: Vec<String>) {
    if let Some(dir) = dir {
        config.schema.dir = dir;
    }
    if !extensions.is_empty() {
        config.schema.extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();
    }
}

/// Format `init` writes: `--config-format`, else a `--format` of toml,
/// else yaml
fn init_format<'a>(config_format: Option<&'a str>, format: &'a str) -> &'a str {
    config_format.unwrap_or(if format == "toml" { "toml" } else { "yaml" })
}

fn handle_init(config_path: &Path, format: &str) -> ExitCode {
    let path = if format == "toml" {
        config_path.with_extension("toml")
    } else {
        config_path.to_path_buf()
    };

    match config::write_default_config(&path) {
        Ok(()) => {
            println!("Created configuration file: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error creating config: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn handle_show(config: &Config) -> ExitCode {
    println!("\nCurrent Configuration:");
    println!("======================\n");

    println!("Site:");
    println!("  Brand: {}", config.site.brand);
    println!("  Domain: {}", config.site.domain);
    println!("  Wrong domains: {}", config.site.wrong_domains.join(", "));
    println!("  Deprecated hosts: {}", config.site.deprecated_hosts.join(", "));
    println!();

    println!("Schema:");
    println!("  Directory: {}", config.schema.dir.display());
    println!("  Extensions: {}", config.schema.extensions.join(", "));
    println!("  Strict: {}", config.schema.strict);
    println!();

    println!("Output:");
    println!("  Schema reports: {}", config.output.schema_reports.display());
    println!("  Audit reports: {}", config.output.audit_reports.display());
    println!("  Sitemap: {}", config.output.sitemap.display());
    println!();

    println!("Routes: {}", config.routes.len());
    for route in &config.routes {
        println!("  {}  {}", route.path, route.title);
    }
    println!();

    println!("General:");
    println!("  Dry run: {}", config.dry_run);

    ExitCode::SUCCESS
}

fn handle_validate_schema(config: &Config, format: OutputFormat) -> ExitCode {
    let report = match scanner::validate_directory(&config.schema.dir, config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Schema validation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let files = match report.write_reports(&config.output.schema_reports) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Report error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    for failure in &files.failures {
        eprintln!("Report error: {}", failure);
    }

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&report.summarize()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Pretty => {
            println!();
            print!("{}", report.console_summary());
            println!();
            for path in &files.written {
                println!("📁 {}", path.display());
            }
        }
    }

    if config.schema.strict && report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn handle_audit(config: &Config, format: OutputFormat) -> ExitCode {
    let result = audit::audit_routes(&config.routes, &config.site);
    let stamp = audit::report_stamp(chrono::Utc::now());

    let written = match audit::write_route_reports(&result, &config.output.audit_reports, &stamp) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Report error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Pretty => {
            println!();
            println!(
                "Audited {} route(s): {} issue(s) ({} high, {} medium, {} low)",
                result.routes_audited,
                result.total_issues(),
                result.summary.high,
                result.summary.medium,
                result.summary.low
            );
            for path in &written {
                println!("📁 {}", path.display());
            }
        }
    }

    ExitCode::SUCCESS
}

fn handle_fix(config: &Config, format: OutputFormat) -> ExitCode {
    let run = match scanner::fix_directory(&config.schema.dir, config, config.dry_run) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Fix error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&run) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Pretty => {
            println!();
            for document in &run.documents {
                if document.issues.is_empty() {
                    continue;
                }
                let icon = if document.changed { "🔧" } else { "✅" };
                println!(
                    "{} {} ({} issue(s), {} fix(es))",
                    icon,
                    document.path.display(),
                    document.issues.len(),
                    document.summary.fixes_applied
                );
                for issue in &document.issues {
                    println!("   [{}] {}", issue.priority, issue.message);
                }
            }
            println!();
            println!(
                "{} {} of {} document(s)",
                if run.dry_run { "Would fix" } else { "Fixed" },
                run.changed_documents(),
                run.documents.len()
            );
        }
    }

    ExitCode::SUCCESS
}

fn handle_sitemap(config: &Config) -> ExitCode {
    let lastmod = chrono::Utc::now().format("%Y-%m-%d").to_string();
    match sitemap::write_sitemap(
        &config.output.sitemap,
        &config.site.base_url(),
        &config.routes,
        &lastmod,
    ) {
        Ok(written) => {
            for path in written {
                println!("📁 {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Sitemap error: {}", e);
            ExitCode::FAILURE
        }
    }
}
