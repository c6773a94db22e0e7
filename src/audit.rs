// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Route audit: title, description and URL rules over the configured routes

use crate::config::{RouteConfig, SiteConfig};
use crate::error::{Result, SeobotError};
use crate::issue::{Issue, IssueKind, PriorityCounts};
use crate::report::markdown::render_markdown;
use crate::rules::{
    check_field, optimize_description, optimize_title, Field, DESCRIPTION_MAX, DESCRIPTION_MIN,
    TITLE_MAX, TITLE_MIN,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An issue found on a route, with the optimized value when one exists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteIssue {
    pub route: String,
    #[serde(flatten)]
    pub issue: Issue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAudit {
    pub generated_at: String,
    pub routes_audited: usize,
    pub summary: PriorityCounts,
    pub issues: Vec<RouteIssue>,
}

impl RouteAudit {
    pub fn total_issues(&self) -> usize {
        self.issues.len()
    }

    /// Issues grouped by kind, groups in first-seen order
    pub fn by_category(&self) -> Vec<(IssueKind, Vec<&RouteIssue>)> {
        let mut groups: Vec<(IssueKind, Vec<&RouteIssue>)> = Vec::new();
        for item in &self.issues {
            match groups.iter_mut().find(|(kind, _)| *kind == item.issue.kind) {
                Some((_, members)) => members.push(item),
                None => groups.push((item.issue.kind, vec![item])),
            }
        }
        groups
    }

    /// Issues ordered high, medium, low; equal priorities keep audit order
    pub fn prioritized(&self) -> Vec<&RouteIssue> {
        let mut ordered: Vec<&RouteIssue> = self.issues.iter().collect();
        ordered.sort_by_key(|item| item.issue.priority);
        ordered
    }
}

fn route_url(route: &RouteConfig, site: &SiteConfig) -> String {
    if route.path.starts_with("http://") || route.path.starts_with("https://") {
        route.path.clone()
    } else if route.path.starts_with('/') {
        format!("{}{}", site.base_url(), route.path)
    } else {
        format!("{}/{}", site.base_url(), route.path)
    }
}

fn audit_route(route: &RouteConfig, site: &SiteConfig) -> Vec<RouteIssue> {
    let file = Path::new(&route.path);
    let mut found = Vec::new();

    if let Some(issue) = check_field(Field::Title, &route.title, site) {
        let optimized = optimize_title(&route.title, &site.brand, TITLE_MIN, TITLE_MAX);
        found.push(RouteIssue {
            route: route.path.clone(),
            issue: issue.with_file(file),
            suggestion: (optimized != route.title).then_some(optimized),
        });
    }

    if let Some(issue) = check_field(Field::Description, &route.description, site) {
        let optimized =
            optimize_description(&route.description, DESCRIPTION_MIN, DESCRIPTION_MAX);
        found.push(RouteIssue {
            route: route.path.clone(),
            issue: issue.with_file(file),
            suggestion: (optimized != route.description).then_some(optimized),
        });
    }

    let url = route_url(route, site);
    if let Some(issue) = check_field(Field::Canonical, &url, site) {
        let normalized = crate::rules::url::normalize_url(&url, site);
        found.push(RouteIssue {
            route: route.path.clone(),
            issue: issue.with_file(file),
            suggestion: normalized.changed.then_some(normalized.url),
        });
    }

    debug!("Route {}: {} issue(s)", route.path, found.len());
    found
}

/// Audit every configured route.
pub fn audit_routes(routes: &[RouteConfig], site: &SiteConfig) -> RouteAudit {
    let issues: Vec<RouteIssue> = routes.iter().flat_map(|r| audit_route(r, site)).collect();

    RouteAudit {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        routes_audited: routes.len(),
        summary: PriorityCounts::tally(issues.iter().map(|i| &i.issue)),
        issues,
    }
}

/// Filesystem-safe stamp used in report file names
pub fn report_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Write `seo-audit-{stamp}.md` and `seo-audit-{stamp}.json` into `dir`.
pub fn write_route_reports(audit: &RouteAudit, dir: &Path, stamp: &str) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|source| SeobotError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let markdown_path = dir.join(format!("seo-audit-{}.md", stamp));
    let json_path = dir.join(format!("seo-audit-{}.json", stamp));

    std::fs::write(&markdown_path, render_markdown(audit)).map_err(|source| {
        SeobotError::Write {
            path: markdown_path.clone(),
            source,
        }
    })?;

    let json = serde_json::to_string_pretty(audit)?;
    std::fs::write(&json_path, json).map_err(|source| SeobotError::Write {
        path: json_path.clone(),
        source,
    })?;

    info!(
        "Route audit: {} route(s), {} issue(s), reports in {}",
        audit.routes_audited,
        audit.total_issues(),
        dir.display()
    );

    Ok(vec![markdown_path, json_path])
}
