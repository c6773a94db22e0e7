// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Issues raised by the rule engine, the structural fixer and the schema
//! validator

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Category of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    Canonical,
    MetaDescription,
    H1,
    Image,
    Title,
    Content,
    Body,
    SchemaParse,
    SchemaMissingContext,
    SchemaMissingType,
    SchemaMissingProp,
    SchemaWrongDomain,
    SchemaDynamic,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::Canonical => "canonical",
            IssueKind::MetaDescription => "meta-description",
            IssueKind::H1 => "h1",
            IssueKind::Image => "image",
            IssueKind::Title => "title",
            IssueKind::Content => "content",
            IssueKind::Body => "body",
            IssueKind::SchemaParse => "schema-parse",
            IssueKind::SchemaMissingContext => "schema-missing-context",
            IssueKind::SchemaMissingType => "schema-missing-type",
            IssueKind::SchemaMissingProp => "schema-missing-prop",
            IssueKind::SchemaWrongDomain => "schema-wrong-domain",
            IssueKind::SchemaDynamic => "schema-dynamic",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fix priority. Ordered so that `High < Medium < Low` sorts high first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// Whether an issue counts as an error or a warning in the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue category
    pub kind: IssueKind,
    /// Document the issue was found in
    pub file: PathBuf,
    /// Short headline, also used as the error category in summaries
    pub message: String,
    /// Longer explanation
    pub details: Option<String>,
    pub priority: Priority,
    pub severity: Severity,
}

impl Issue {
    /// Create a new error-severity issue
    pub fn new(kind: IssueKind, priority: Priority, message: &str) -> Self {
        Self {
            kind,
            file: PathBuf::new(),
            message: message.to_string(),
            details: None,
            priority,
            severity: Severity::Error,
        }
    }

    /// Attach the document path
    pub fn with_file(mut self, file: &Path) -> Self {
        self.file = file.to_path_buf();
        self
    }

    /// Add details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Downgrade to a warning
    pub fn as_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Details if present, otherwise the empty string
    pub fn details_or_empty(&self) -> &str {
        self.details.as_deref().unwrap_or("")
    }
}

/// Issue counts per priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn tally<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.priority {
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}
