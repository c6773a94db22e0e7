// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Schema validation report.
//!
//! Aggregates per-document results and writes them out as:
//! - `schema-errors.csv`: one row per error (`File,Error,Details`)
//! - `schema-warnings.csv`: one row per warning (`File,Warning,Message`)
//! - `valid-schemas.csv`: one row per clean document (`File,Schema Types`)
//! - `schema-validation-summary.json`: always written
//!
//! The CSV files are skipped when they would have no rows.

pub mod markdown;

use crate::error::{Result, SeobotError};
use crate::issue::Issue;
use crate::schema::DocumentValidation;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const ERRORS_CSV: &str = "schema-errors.csv";
pub const WARNINGS_CSV: &str = "schema-warnings.csv";
pub const VALID_CSV: &str = "valid-schemas.csv";
pub const SUMMARY_JSON: &str = "schema-validation-summary.json";

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Boxed human-readable summary
    #[default]
    Pretty,
    /// Summary JSON on stdout
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// A document whose schemas produced no errors or warnings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidDocument {
    pub file: PathBuf,
    pub types: Vec<String>,
}

/// Counts written to `schema-validation-summary.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub timestamp: String,
    pub total_schemas: usize,
    pub errors: usize,
    pub warnings: usize,
    pub valid: usize,
    /// Percentage with two decimals, or `N/A` when no schemas were seen
    pub error_rate: String,
}

/// Outcome of [`AuditReport::write_reports`]
#[derive(Debug, Default)]
pub struct ReportFiles {
    pub written: Vec<PathBuf>,
    pub failures: Vec<SeobotError>,
}

impl ReportFiles {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct AuditReport {
    errors: Vec<Issue>,
    warnings: Vec<Issue>,
    valid: Vec<ValidDocument>,
    total_schemas: usize,
}

impl AuditReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an issue to the error or warning list by its severity.
    pub fn record_issue(&mut self, issue: Issue) {
        if issue.is_error() {
            self.errors.push(issue);
        } else {
            self.warnings.push(issue);
        }
    }

    pub fn record_valid(&mut self, file: &Path, types: Vec<String>) {
        self.valid.push(ValidDocument {
            file: file.to_path_buf(),
            types,
        });
    }

    pub fn add_schemas(&mut self, count: usize) {
        self.total_schemas += count;
    }

    /// Fold one document's validation into the report.
    pub fn record_document(&mut self, validation: DocumentValidation) {
        self.add_schemas(validation.schemas);
        if validation.is_valid() {
            self.record_valid(&validation.file, validation.types);
            return;
        }
        for issue in validation.issues {
            self.record_issue(issue);
        }
    }

    pub fn errors(&self) -> &[Issue] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Issue] {
        &self.warnings
    }

    pub fn valid(&self) -> &[ValidDocument] {
        &self.valid
    }

    pub fn total_schemas(&self) -> usize {
        self.total_schemas
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_rate(&self) -> String {
        if self.total_schemas == 0 {
            "N/A".to_string()
        } else {
            format!(
                "{:.2}",
                self.errors.len() as f64 / self.total_schemas as f64 * 100.0
            )
        }
    }

    pub fn summarize(&self) -> Summary {
        self.summarize_at(Utc::now())
    }

    pub fn summarize_at(&self, now: DateTime<Utc>) -> Summary {
        Summary {
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            total_schemas: self.total_schemas,
            errors: self.errors.len(),
            warnings: self.warnings.len(),
            valid: self.valid.len(),
            error_rate: self.error_rate(),
        }
    }

    /// Error messages by frequency, most frequent first. Equal counts keep
    /// the order in which the message was first recorded.
    pub fn top_error_categories(&self, limit: usize) -> Vec<(String, usize)> {
        let mut categories: Vec<(String, usize)> = Vec::new();
        for issue in &self.errors {
            match categories.iter_mut().find(|(m, _)| *m == issue.message) {
                Some((_, count)) => *count += 1,
                None => categories.push((issue.message.clone(), 1)),
            }
        }
        categories.sort_by(|a, b| b.1.cmp(&a.1));
        categories.truncate(limit);
        categories
    }

    /// Write every report file into `dir`.
    ///
    /// Only failing to create `dir` itself is an error; a failed file is
    /// recorded in [`ReportFiles::failures`] and the remaining files are
    /// still attempted.
    pub fn write_reports(&self, dir: &Path) -> Result<ReportFiles> {
        std::fs::create_dir_all(dir).map_err(|source| SeobotError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = ReportFiles::default();

        if !self.errors.is_empty() {
            let rows = self
                .errors
                .iter()
                .map(|i| csv_row(&[&i.file.display().to_string(), &i.message, i.details_or_empty()]));
            write_file(&dir.join(ERRORS_CSV), &csv_document("File,Error,Details", rows), &mut files);
        }

        if !self.warnings.is_empty() {
            let rows = self
                .warnings
                .iter()
                .map(|i| csv_row(&[&i.file.display().to_string(), &i.message, i.details_or_empty()]));
            write_file(&dir.join(WARNINGS_CSV), &csv_document("File,Warning,Message", rows), &mut files);
        }

        if !self.valid.is_empty() {
            let rows = self
                .valid
                .iter()
                .map(|v| csv_row(&[&v.file.display().to_string(), &v.types.join(", ")]));
            write_file(&dir.join(VALID_CSV), &csv_document("File,Schema Types", rows), &mut files);
        }

        match serde_json::to_string_pretty(&self.summarize()) {
            Ok(json) => write_file(&dir.join(SUMMARY_JSON), &json, &mut files),
            Err(e) => files.failures.push(e.into()),
        }

        info!(
            "Wrote {} report file(s) to {}",
            files.written.len(),
            dir.display()
        );

        Ok(files)
    }

    pub fn console_summary(&self) -> String {
        let summary = self.summarize();
        let rate = if summary.error_rate == "N/A" {
            summary.error_rate.clone()
        } else {
            format!("{}%", summary.error_rate)
        };

        let mut output = String::new();
        output.push_str("╔══════════════════════════════════════════╗\n");
        output.push_str("║        SCHEMA VALIDATION SUMMARY         ║\n");
        output.push_str("╠══════════════════════════════════════════╣\n");
        output.push_str(&format!("║  Total schemas:   {:<23}║\n", summary.total_schemas));
        output.push_str(&format!("║  Errors:          {:<23}║\n", summary.errors));
        output.push_str(&format!("║  Warnings:        {:<23}║\n", summary.warnings));
        output.push_str(&format!("║  Valid documents: {:<23}║\n", summary.valid));
        output.push_str(&format!("║  Error rate:      {:<23}║\n", rate));
        output.push_str("╚══════════════════════════════════════════╝\n");

        let top = self.top_error_categories(5);
        if !top.is_empty() {
            output.push_str("\nTop error categories:\n");
            for (rank, (message, count)) in top.iter().enumerate() {
                output.push_str(&format!("  {}. {} ({})\n", rank + 1, message, count));
            }
        }

        output
    }
}

fn write_file(path: &Path, content: &str, files: &mut ReportFiles) {
    match std::fs::write(path, content) {
        Ok(()) => files.written.push(path.to_path_buf()),
        Err(source) => {
            warn!("Failed to write {}: {}", path.display(), source);
            files.failures.push(SeobotError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
    }
}

/// Quote a CSV field, doubling embedded quotes.
pub fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn csv_row(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_document(header: &str, rows: impl Iterator<Item = String>) -> String {
    let mut out = String::from(header);
    out.push('\n');
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    out
}
