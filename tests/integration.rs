// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the seobot pipeline

use seobot::fixer::{self, canonical_hrefs, count_h1};
use seobot::report::{ERRORS_CSV, SUMMARY_JSON, VALID_CSV, WARNINGS_CSV};
use seobot::rules::{self, url::normalize_url};
use seobot::{
    audit_routes, extract_schemas, fix_directory, run_comprehensive_seo_fix, validate_directory,
    validate_schema, write_route_reports, Config, IssueKind, SeoData, SeobotError, Severity,
    SiteConfig,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FIXTURE_SITE: &str = "tests/fixtures/site";

/// Copy the fixture site into a scratch directory so fixes can write to it
fn scratch_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    for entry in walkdir::WalkDir::new(FIXTURE_SITE) {
        let entry = entry.unwrap();
        let relative = entry.path().strip_prefix(FIXTURE_SITE).unwrap();
        let target = dir.path().join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).unwrap();
        } else {
            std::fs::copy(entry.path(), &target).unwrap();
        }
    }
    dir
}

#[test]
fn test_scenario_a_short_title() {
    let out = rules::optimize_title("SEO", "Digital Frontier", 45, 60);
    let len = out.chars().count();
    assert!((45..=60).contains(&len), "{:?} is {} chars", out, len);
    assert!(out.contains("Digital Frontier"));
}

#[test]
fn test_scenario_b_multiple_h1s() {
    let html = "<body><h1>Main</h1><p>x</p><h1>Second</h1><h1>Third</h1></body>";
    let out = fixer::fix_multiple_h1s(html);

    assert_eq!(count_h1(&out.fixed), 1);
    assert!(out.fixed.contains("<h1>Main</h1>"));
    let second = out.fixed.find("<h2>Second</h2>").unwrap();
    let third = out.fixed.find("<h2>Third</h2>").unwrap();
    assert!(second < third);
    assert_eq!(out.issues.len(), 1);
}

#[test]
fn test_scenario_c_article_missing_properties() {
    let html = r#"<script type="application/ld+json">
        {"@context":"https://schema.org","@type":"Article","headline":"H","author":"A"}
    </script>"#;
    let blocks = extract_schemas(html);
    let issues = validate_schema(&blocks[0], Path::new("post.html"), &SiteConfig::default());

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::SchemaMissingProp);
    assert_eq!(issues[0].severity, Severity::Error);
    assert!(issues[0].details_or_empty().ends_with("image, datePublished"));
}

#[test]
fn test_scenario_d_wrong_domain_image() {
    let fix = normalize_url("https://digitalfrontier.ai/foo.png", &SiteConfig::default());
    assert!(fix.wrong_domain);
    assert_eq!(fix.url, "https://digitalfrontier.app/foo.png");

    let out = fixer::fix_image_optimization(
        r#"<img src="https://digitalfrontier.ai/foo.png" alt="x">"#,
        &SiteConfig::default(),
    );
    assert!(out.fixed.contains(r#"src="https://digitalfrontier.app/foo.png""#));
}

#[test]
fn test_validate_fixture_site() {
    let report = validate_directory(Path::new(FIXTURE_SITE), &Config::default()).unwrap();

    // post (1) + broken (1) + index (1) + services (2)
    assert_eq!(report.total_schemas(), 5);
    assert_eq!(report.warnings().len(), 1);
    assert_eq!(report.valid().len(), 1);
    assert!(report.valid()[0].file.ends_with("index.html"));
    assert_eq!(
        report.valid()[0].types,
        vec!["Organization".to_string(), "WebSite".to_string()]
    );

    let kinds: Vec<IssueKind> = report.errors().iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            IssueKind::SchemaMissingProp,
            IssueKind::SchemaParse,
            IssueKind::SchemaWrongDomain,
        ]
    );

    let summary = report.summarize();
    assert_eq!(summary.errors, 3);
    assert_eq!(summary.error_rate, "60.00");
}

#[test]
fn test_validate_writes_all_reports() {
    let out = TempDir::new().unwrap();
    let report = validate_directory(Path::new(FIXTURE_SITE), &Config::default()).unwrap();
    let files = report.write_reports(out.path()).unwrap();

    assert!(files.is_complete());
    for name in [ERRORS_CSV, WARNINGS_CSV, VALID_CSV, SUMMARY_JSON] {
        assert!(out.path().join(name).exists(), "{} missing", name);
    }

    let summary: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out.path().join(SUMMARY_JSON)).unwrap(),
    )
    .unwrap();
    assert_eq!(summary["totalSchemas"], 5);
    assert_eq!(summary["errorRate"], "60.00");
}

#[test]
fn test_empty_site_rate_is_na() {
    let site = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let report = validate_directory(site.path(), &Config::default()).unwrap();
    let files = report.write_reports(out.path()).unwrap();

    assert_eq!(files.written, vec![out.path().join(SUMMARY_JSON)]);
    assert_eq!(report.summarize().error_rate, "N/A");
    assert!(report.console_summary().contains("N/A"));
}

#[test]
fn test_missing_site_dir_aborts() {
    let result = validate_directory(Path::new("/nonexistent/site"), &Config::default());
    let err = result.unwrap_err();
    assert!(matches!(err, SeobotError::Walk { .. }));
    assert_eq!(err.path(), Some(Path::new("/nonexistent/site")));
}

#[test]
fn test_fix_fixture_post() {
    let site = scratch_site();
    let run = fix_directory(site.path(), &Config::default(), false).unwrap();

    let post_path: PathBuf = site.path().join("blog").join("post.html");
    let post = run
        .documents
        .iter()
        .find(|d| d.path == post_path)
        .unwrap();
    assert_eq!(post.route, "/blog/post");
    assert!(post.changed);

    let fixed = std::fs::read_to_string(&post_path).unwrap();
    assert_eq!(
        canonical_hrefs(&fixed),
        vec!["https://digitalfrontier.app/blog/post".to_string()]
    );
    assert_eq!(count_h1(&fixed), 1);
    assert!(fixed.contains(r#"src="https://digitalfrontier.app/images/aeo.png""#));
    assert!(fixed.contains(r#"loading="lazy""#));

    let kinds: Vec<IssueKind> = post.issues.iter().map(|i| i.kind).collect();
    assert!(kinds.contains(&IssueKind::Canonical));
    assert!(kinds.contains(&IssueKind::H1));
    assert!(kinds.contains(&IssueKind::Title));
    assert!(kinds.contains(&IssueKind::Image));

    // a second pass over fixed documents changes nothing
    let again = fix_directory(site.path(), &Config::default(), false).unwrap();
    let post_again = again.documents.iter().find(|d| d.path == post_path).unwrap();
    assert!(!post_again.changed);
}

#[test]
fn test_comprehensive_fix_on_bare_fragment() {
    let seo = SeoData {
        title: "SEO".to_string(),
        description: "Short description.".to_string(),
        canonical_url: "https://digitalfrontier.ai/landing".to_string(),
    };
    let result =
        run_comprehensive_seo_fix("<h1>Landing</h1><h1>Again</h1>", &seo, &SiteConfig::default());

    assert_eq!(
        canonical_hrefs(&result.fixed_content),
        vec!["https://digitalfrontier.app/landing".to_string()]
    );
    assert_eq!(fixer::meta_descriptions(&result.fixed_content).len(), 1);
    assert_eq!(count_h1(&result.fixed_content), 1);
    assert!(result.fixed_content.contains("<main role=\"main\" id=\"main-content\">"));
    assert_eq!(result.summary.total_issues, result.all_issues.len());
    assert!(result.summary.by_priority.high >= 2);
}

#[test]
fn test_route_audit_reports() {
    let out = TempDir::new().unwrap();
    let config = Config::default();
    let audit = audit_routes(&config.routes, &config.site);

    // /blog and /contact are too short in the defaults
    assert_eq!(audit.total_issues(), 4);

    let written = write_route_reports(&audit, out.path(), "2025-01-01T00-00-00").unwrap();
    let markdown = std::fs::read_to_string(&written[0]).unwrap();
    assert!(markdown.contains("## Executive Summary"));
    assert!(markdown.contains("| Routes audited | 4 |"));
    assert!(markdown.contains("## Priority Fixes"));
}
