// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Directory scanner.
//!
//! Walks a content tree in file-name order, so every run visits documents,
//! and records their issues, in the same sequence.

use crate::config::Config;
use crate::error::{Result, SeobotError};
use crate::fixer::{run_comprehensive_seo_fix, FixSummary, SeoData};
use crate::issue::Issue;
use crate::report::AuditReport;
use crate::schema::validate_document;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A file under audit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub raw_content: String,
    /// Invalid UTF-8 was replaced while reading; never written back
    pub lossy: bool,
}

/// Read every file under `dir` whose extension is in `extensions`,
/// skipping directories named in `exclude`.
pub fn collect_documents(
    dir: &Path,
    extensions: &[String],
    exclude: &[String],
) -> Result<Vec<Document>> {
    let mut documents = Vec::new();

    info!("Scanning directory: {}", dir.display());

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() > 0 && e.file_type().is_dir() {
                let name = e.file_name().to_str().unwrap_or("");
                return !exclude.iter().any(|x| x == name);
            }
            true
        })
    {
        let entry = entry.map_err(|e| SeobotError::Walk {
            path: e.path().unwrap_or(dir).to_path_buf(),
            message: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)) {
            continue;
        }

        let bytes = std::fs::read(path).map_err(|source| SeobotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let (raw_content, lossy) = match String::from_utf8(bytes) {
            Ok(text) => (text, false),
            Err(e) => {
                warn!("{} is not valid UTF-8, decoding lossily", path.display());
                (String::from_utf8_lossy(e.as_bytes()).into_owned(), true)
            }
        };

        documents.push(Document {
            path: path.to_path_buf(),
            raw_content,
            lossy,
        });
    }

    info!("Collected {} document(s)", documents.len());
    Ok(documents)
}

/// Validate the JSON-LD of every document under `dir`.
pub fn validate_directory(dir: &Path, config: &Config) -> Result<AuditReport> {
    let documents = collect_documents(dir, &config.schema.extensions, &config.exclude)?;
    let mut report = AuditReport::new();

    for document in &documents {
        let validation = validate_document(&document.path, &document.raw_content, &config.site);
        report.record_document(validation);
    }

    info!(
        "Validated {} schema(s) in {} document(s): {} error(s), {} warning(s)",
        report.total_schemas(),
        documents.len(),
        report.errors().len(),
        report.warnings().len()
    );

    Ok(report)
}

/// Site path a file is served at: `index.html` is `/`, `blog/index.html`
/// and `blog.html` are both `/blog`
pub fn route_path(relative: &Path) -> String {
    let mut parts: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|c| c.as_os_str().to_str().map(str::to_string))
        .collect();
    if parts.last().is_some_and(|p| p == "index") {
        parts.pop();
    }
    format!("/{}", parts.join("/"))
}

/// Expected metadata for a document served at `route`
pub fn seo_data_for(route: &str, config: &Config) -> SeoData {
    let canonical_url = format!("{}{}", config.site.base_url(), route);
    match config.routes.iter().find(|r| r.path == route) {
        Some(known) => SeoData {
            title: known.title.clone(),
            description: known.description.clone(),
            canonical_url,
        },
        None => SeoData {
            canonical_url,
            ..SeoData::default()
        },
    }
}

/// Result of fixing one document
#[derive(Debug, Clone, Serialize)]
pub struct FixedDocument {
    pub path: PathBuf,
    pub route: String,
    pub changed: bool,
    pub issues: Vec<Issue>,
    pub summary: FixSummary,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FixRun {
    pub dry_run: bool,
    pub documents: Vec<FixedDocument>,
}

impl FixRun {
    pub fn total_issues(&self) -> usize {
        self.documents.iter().map(|d| d.issues.len()).sum()
    }

    pub fn changed_documents(&self) -> usize {
        self.documents.iter().filter(|d| d.changed).count()
    }
}

/// Run the comprehensive fix over every document under `dir`, rewriting
/// changed files unless `dry_run` is set.
pub fn fix_directory(dir: &Path, config: &Config, dry_run: bool) -> Result<FixRun> {
    let documents = collect_documents(dir, &config.schema.extensions, &config.exclude)?;
    let mut run = FixRun {
        dry_run,
        documents: Vec::with_capacity(documents.len()),
    };

    for document in documents {
        let relative = document.path.strip_prefix(dir).unwrap_or(document.path.as_path());
        let route = route_path(relative);
        let seo = seo_data_for(&route, config);

        let result = run_comprehensive_seo_fix(&document.raw_content, &seo, &config.site);
        let changed = result.fixed_content != document.raw_content;

        if changed && !dry_run && document.lossy {
            warn!(
                "Not rewriting {}: it is not valid UTF-8",
                document.path.display()
            );
        } else if changed && !dry_run {
            std::fs::write(&document.path, &result.fixed_content).map_err(|source| {
                SeobotError::Write {
                    path: document.path.clone(),
                    source,
                }
            })?;
        }

        debug!(
            "{} ({}): {} issue(s), {} fix(es)",
            document.path.display(),
            route,
            result.summary.total_issues,
            result.summary.fixes_applied
        );

        let issues = result
            .all_issues
            .into_iter()
            .map(|i| i.with_file(&document.path))
            .collect();

        run.documents.push(FixedDocument {
            path: document.path,
            route,
            changed,
            issues,
            summary: result.summary,
        });
    }

    info!(
        "{} {} of {} document(s), {} issue(s)",
        if dry_run { "Would fix" } else { "Fixed" },
        run.changed_documents(),
        run.documents.len(),
        run.total_issues()
    );

    Ok(run)
}
