// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! seobot: Static-Content SEO Auditor
//!
//! This crate audits and normalizes the built HTML of a marketing site:
//!
//! - String rules (title and description length, domain checks)
//! - Structural fixes (exactly one canonical, description and H1; image attributes)
//! - JSON-LD validation against schema.org required properties
//! - CSV/JSON/Markdown reports, sitemap and robots.txt generation
//!
//! Part of the Hyperpolymath Gitbot Fleet.

pub mod audit;
pub mod config;
pub mod error;
pub mod fixer;
pub mod issue;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod schema;
pub mod sitemap;

pub use audit::{audit_routes, write_route_reports, RouteAudit};
pub use config::{Config, RouteConfig, SiteConfig};
pub use error::{Result, SeobotError};
pub use fixer::{run_comprehensive_seo_fix, ComprehensiveFix, SeoData};
pub use issue::{Issue, IssueKind, Priority, Severity};
pub use report::{AuditReport, OutputFormat, Summary};
pub use scanner::{collect_documents, fix_directory, validate_directory, Document};
pub use schema::{extract_schemas, validate_document, validate_schema, SchemaBlock};
