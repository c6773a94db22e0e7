// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Markdown rendering of the route audit

use crate::audit::{RouteAudit, RouteIssue};

const TOP_PER_CATEGORY: usize = 3;
const TOP_PRIORITY_FIXES: usize = 10;

fn issue_line(item: &RouteIssue) -> String {
    let mut line = format!(
        "- **[{}]** `{}`: {}",
        item.issue.priority, item.route, item.issue.message
    );
    if let Some(details) = &item.issue.details {
        line.push_str(&format!(" ({})", details));
    }
    if let Some(suggestion) = &item.suggestion {
        line.push_str(&format!("\n  - Suggested: {}", suggestion));
    }
    line.push('\n');
    line
}

pub fn render_markdown(audit: &RouteAudit) -> String {
    let mut output = String::new();

    output.push_str("# SEO Audit Report\n\n");
    output.push_str(&format!("Generated: {}\n\n", audit.generated_at));

    output.push_str("## Executive Summary\n\n");
    output.push_str("| Metric | Count |\n|---|---|\n");
    output.push_str(&format!("| Routes audited | {} |\n", audit.routes_audited));
    output.push_str(&format!("| Total issues | {} |\n", audit.total_issues()));
    output.push_str(&format!("| High priority | {} |\n", audit.summary.high));
    output.push_str(&format!("| Medium priority | {} |\n", audit.summary.medium));
    output.push_str(&format!("| Low priority | {} |\n\n", audit.summary.low));

    if audit.issues.is_empty() {
        output.push_str("No issues found. All routes pass.\n");
        return output;
    }

    output.push_str("## Issues by Category\n\n");
    for (kind, members) in audit.by_category() {
        output.push_str(&format!("### {} ({})\n\n", kind, members.len()));

        let mut ordered = members.clone();
        ordered.sort_by_key(|item| item.issue.priority);
        for item in ordered.iter().take(TOP_PER_CATEGORY) {
            output.push_str(&issue_line(item));
        }
        if members.len() > TOP_PER_CATEGORY {
            output.push_str(&format!(
                "- ...and {} more\n",
                members.len() - TOP_PER_CATEGORY
            ));
        }
        output.push('\n');
    }

    output.push_str("## Priority Fixes\n\n");
    for (rank, item) in audit
        .prioritized()
        .into_iter()
        .take(TOP_PRIORITY_FIXES)
        .enumerate()
    {
        output.push_str(&format!("{}. ", rank + 1));
        output.push_str(issue_line(item).trim_start_matches("- "));
    }

    output
}
