// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! HTML structural fixer
//!
//! Enforces the "exactly one" invariants of a page (canonical link, meta
//! description, H1) and fills single-tag attribute gaps on images. Rewrites
//! are pattern based so that every byte outside a rewritten tag is preserved;
//! patterns that do not match are silently left alone.

use crate::config::SiteConfig;
use crate::issue::{Issue, IssueKind, Priority, PriorityCounts};
use crate::rules::{self, url::normalize_url, DESCRIPTION_MAX, DESCRIPTION_MIN, TITLE_MAX, TITLE_MIN};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CANONICAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<link\b[^>]*\brel\s*=\s*["']canonical["'][^>]*>\s*"#).expect("valid regex")
});

static META_DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\b[^>]*\bname\s*=\s*["']description["'][^>]*>\s*"#)
        .expect("valid regex")
});

static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b([^>]*)>(.*?)</h1\s*>").expect("valid regex"));

static IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b([^>]*?)(\s*/?)>").expect("valid regex"));

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("valid regex"));

static HEAD_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head\b[^>]*>").expect("valid regex"));

static HEAD_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").expect("valid regex"));

static HEAD_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>|<body\b|<svg\b").expect("valid regex"));

static BODY_OR_MAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:body|main)\b").expect("valid regex"));

static ALT_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s)alt\s*=").expect("valid regex"));

static LOADING_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s)loading\s*=").expect("valid regex"));

static SRC_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)src\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

static HREF_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)href\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

static CONTENT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)content\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

/// Output of a single fixer stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub fixed: String,
    pub issues: Vec<Issue>,
}

impl FixOutcome {
    fn unchanged(html: &str) -> Self {
        Self {
            fixed: html.to_string(),
            issues: Vec::new(),
        }
    }
}

/// Page metadata the document is expected to carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoData {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixSummary {
    pub total_issues: usize,
    pub by_priority: PriorityCounts,
    /// Number of stages that changed the document
    pub fixes_applied: usize,
}

/// Output of [`run_comprehensive_seo_fix`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComprehensiveFix {
    pub fixed_content: String,
    pub all_issues: Vec<Issue>,
    pub summary: FixSummary,
}

pub(crate) fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// The quoted value of an attribute pattern, whichever quote style matched
fn quoted_value<'t>(caps: &Captures<'t>) -> Option<regex::Match<'t>> {
    caps.get(1).or_else(|| caps.get(2))
}

fn attr_value(re: &Regex, tag: &str) -> Option<String> {
    re.captures(tag)
        .and_then(|c| quoted_value(&c).map(|m| unescape(m.as_str())))
}

/// Unescaped `href` values of every canonical link, in document order
pub fn canonical_hrefs(html: &str) -> Vec<String> {
    CANONICAL_RE
        .find_iter(html)
        .filter_map(|m| attr_value(&HREF_ATTR_RE, m.as_str()))
        .collect()
}

/// Unescaped `content` values of every meta description, in document order
pub fn meta_descriptions(html: &str) -> Vec<String> {
    META_DESCRIPTION_RE
        .find_iter(html)
        .filter_map(|m| attr_value(&CONTENT_ATTR_RE, m.as_str()))
        .collect()
}

/// Number of `<h1>` elements
pub fn count_h1(html: &str) -> usize {
    H1_RE.find_iter(html).count()
}

/// Remove every canonical link.
///
/// More than one canonical is reported; the returned document never contains
/// a canonical link, see [`insert_canonical`].
pub fn fix_multiple_canonicals(html: &str, canonical_url: &str) -> FixOutcome {
    let count = CANONICAL_RE.find_iter(html).count();
    if count == 0 {
        return FixOutcome::unchanged(html);
    }

    let mut issues = Vec::new();
    if count > 1 {
        issues.push(
            Issue::new(IssueKind::Canonical, Priority::High, "Multiple canonical tags").with_details(
                format!("Found {} canonical tags; expected exactly one ({})", count, canonical_url),
            ),
        );
    }

    FixOutcome {
        fixed: CANONICAL_RE.replace_all(html, "").into_owned(),
        issues,
    }
}

/// Remove every meta description; reports duplicates.
pub fn fix_multiple_meta_descriptions(html: &str, description: &str) -> FixOutcome {
    let count = META_DESCRIPTION_RE.find_iter(html).count();
    if count == 0 {
        return FixOutcome::unchanged(html);
    }

    let mut issues = Vec::new();
    if count > 1 {
        issues.push(
            Issue::new(
                IssueKind::MetaDescription,
                Priority::High,
                "Multiple meta descriptions",
            )
            .with_details(format!(
                "Found {} meta description tags; expected exactly one ({} chars)",
                count,
                rules::char_len(description)
            )),
        );
    }

    FixOutcome {
        fixed: META_DESCRIPTION_RE.replace_all(html, "").into_owned(),
        issues,
    }
}

/// Keep the first `<h1>` and demote the rest to `<h2>`.
pub fn fix_multiple_h1s(html: &str) -> FixOutcome {
    let count = count_h1(html);
    if count <= 1 {
        return FixOutcome::unchanged(html);
    }

    let mut seen = 0;
    let fixed = H1_RE.replace_all(html, |caps: &Captures| {
        seen += 1;
        if seen == 1 {
            caps[0].to_string()
        } else {
            format!("<h2{}>{}</h2>", &caps[1], &caps[2])
        }
    });

    FixOutcome {
        fixed: fixed.into_owned(),
        issues: vec![Issue::new(IssueKind::H1, Priority::Medium, "Multiple H1 tags")
            .with_details(format!(
                "Found {} H1 tags; kept the first and demoted {} to H2",
                count,
                count - 1
            ))],
    }
}

/// Fill in missing `alt`/`loading` attributes and rewrite stale image hosts.
///
/// At most one issue per `<img>` tag.
pub fn fix_image_optimization(html: &str, site: &SiteConfig) -> FixOutcome {
    let mut issues = Vec::new();

    let fixed = IMG_RE.replace_all(html, |caps: &Captures| {
        let mut attrs = caps[1].to_string();
        let close = &caps[2];
        let mut applied = Vec::new();
        let mut priority = Priority::Low;

        if let Some(src) = SRC_ATTR_RE.captures(&attrs).and_then(|c| quoted_value(&c)) {
            let fix = normalize_url(src.as_str(), site);
            if fix.changed {
                applied.push(format!("rewrote src {} -> {}", src.as_str(), fix.url));
                attrs = format!(
                    "{}{}{}",
                    &attrs[..src.start()],
                    escape_attr(&fix.url),
                    &attrs[src.end()..]
                );
                priority = Priority::Medium;
            }
        }

        if !ALT_ATTR_RE.is_match(&attrs) {
            attrs.push_str(&format!(" alt=\"{}\"", escape_attr(&site.fallback_alt)));
            applied.push("added fallback alt text".to_string());
        }

        if !LOADING_ATTR_RE.is_match(&attrs) {
            attrs.push_str(" loading=\"lazy\"");
            applied.push("added loading=\"lazy\"".to_string());
        }

        if applied.is_empty() {
            return caps[0].to_string();
        }

        issues.push(
            Issue::new(IssueKind::Image, priority, "Image optimization applied")
                .with_details(applied.join("; ")),
        );
        format!("<img{}{}>", attrs, close)
    });

    FixOutcome {
        fixed: fixed.into_owned(),
        issues,
    }
}

/// Wrap content lacking both `<body>` and `<main>` in a main landmark.
pub fn fix_body_structure(html: &str) -> FixOutcome {
    if html.trim().is_empty() || BODY_OR_MAIN_RE.is_match(html) {
        return FixOutcome::unchanged(html);
    }

    FixOutcome {
        fixed: format!("<main role=\"main\" id=\"main-content\">\n{}\n</main>", html),
        issues: vec![Issue::new(
            IssueKind::Body,
            Priority::High,
            "Missing body or main element",
        )
        .with_details("Wrapped content in <main role=\"main\" id=\"main-content\">")],
    }
}

/// Insert `tag` just before `</head>`, after `<head>` when unclosed, or at the
/// top of the document when there is no head at all.
fn insert_into_head(html: &str, tag: &str) -> String {
    if let Some(m) = HEAD_CLOSE_RE.find(html) {
        return format!("{}{}\n{}", &html[..m.start()], tag, &html[m.start()..]);
    }
    if let Some(m) = HEAD_OPEN_RE.find(html) {
        return format!("{}\n{}{}", &html[..m.end()], tag, &html[m.end()..]);
    }
    format!("{}\n{}", tag, html)
}

/// Insert a single canonical link
pub fn insert_canonical(html: &str, url: &str) -> String {
    insert_into_head(
        html,
        &format!("<link rel=\"canonical\" href=\"{}\">", escape_attr(url)),
    )
}

/// Insert a single meta description
pub fn insert_meta_description(html: &str, description: &str) -> String {
    insert_into_head(
        html,
        &format!(
            "<meta name=\"description\" content=\"{}\">",
            escape_attr(description)
        ),
    )
}

fn canonical_stage(html: &str, seo: &SeoData, site: &SiteConfig) -> FixOutcome {
    let existing = canonical_hrefs(html);
    let wanted = if seo.canonical_url.is_empty() {
        match existing.first() {
            Some(href) => href.clone(),
            None => return FixOutcome::unchanged(html),
        }
    } else {
        seo.canonical_url.clone()
    };

    let mut issues = Vec::new();
    let normalized = normalize_url(&wanted, site);
    if normalized.wrong_domain {
        issues.push(
            Issue::new(IssueKind::Canonical, Priority::High, "Wrong domain in canonical")
                .with_details(format!("{} rewritten to {}", wanted, normalized.url)),
        );
    }
    let url = normalized.url;

    if existing.len() == 1 && existing[0] == url {
        return FixOutcome {
            fixed: html.to_string(),
            issues,
        };
    }

    match existing.len() {
        0 => issues.push(
            Issue::new(IssueKind::Canonical, Priority::High, "Missing canonical tag")
                .with_details(format!("Inserted canonical {}", url)),
        ),
        1 => issues.push(
            Issue::new(IssueKind::Canonical, Priority::Medium, "Canonical URL mismatch")
                .with_details(format!("{} replaced with {}", existing[0], url)),
        ),
        _ => {}
    }

    let stripped = fix_multiple_canonicals(html, &url);
    issues.extend(stripped.issues);

    FixOutcome {
        fixed: insert_canonical(&stripped.fixed, &url),
        issues,
    }
}

fn description_stage(html: &str, seo: &SeoData) -> FixOutcome {
    let existing = meta_descriptions(html);
    let wanted = if seo.description.is_empty() {
        match existing.first() {
            Some(content) => content.clone(),
            None => return FixOutcome::unchanged(html),
        }
    } else {
        seo.description.clone()
    };

    let mut issues = Vec::new();
    let check = rules::check_length(&wanted, DESCRIPTION_MIN, DESCRIPTION_MAX);
    let description = match check.reason {
        Some(reason) => {
            let optimized = rules::optimize_description(&wanted, DESCRIPTION_MIN, DESCRIPTION_MAX);
            issues.push(
                Issue::new(
                    IssueKind::MetaDescription,
                    Priority::Medium,
                    "Invalid description length",
                )
                .with_details(format!("Description is {}", reason)),
            );
            optimized
        }
        None => wanted,
    };

    if existing.len() == 1 && existing[0] == description {
        return FixOutcome {
            fixed: html.to_string(),
            issues,
        };
    }

    if existing.is_empty() {
        issues.push(
            Issue::new(
                IssueKind::MetaDescription,
                Priority::High,
                "Missing meta description",
            )
            .with_details("Inserted meta description"),
        );
    }

    let stripped = fix_multiple_meta_descriptions(html, &description);
    issues.extend(stripped.issues);

    FixOutcome {
        fixed: insert_meta_description(&stripped.fixed, &description),
        issues,
    }
}

/// Byte offset where the document head ends: `</head>`, or the first
/// `<body>`/`<svg>` when the head is not closed
fn head_end(html: &str) -> usize {
    HEAD_END_RE.find(html).map_or(html.len(), |m| m.start())
}

fn title_stage(html: &str, seo: &SeoData, site: &SiteConfig) -> FixOutcome {
    let inner = TITLE_RE
        .captures(&html[..head_end(html)])
        .and_then(|c| c.get(1))
        .map(|m| (m.start(), m.end()));
    let current = inner.map(|(start, end)| unescape(html[start..end].trim()));
    let wanted = if seo.title.is_empty() {
        match &current {
            Some(title) => title.clone(),
            None => return FixOutcome::unchanged(html),
        }
    } else {
        seo.title.clone()
    };

    let mut issues = Vec::new();
    let check = rules::check_length(&wanted, TITLE_MIN, TITLE_MAX);
    let title = match check.reason {
        Some(reason) => {
            let optimized = rules::optimize_title(&wanted, &site.brand, TITLE_MIN, TITLE_MAX);
            issues.push(
                Issue::new(IssueKind::Title, Priority::High, "Invalid title length")
                    .with_details(format!("Title is {}; suggested: {}", reason, optimized)),
            );
            optimized
        }
        None => wanted,
    };

    let fixed = match inner {
        Some(_) if current.as_deref() == Some(title.as_str()) => html.to_string(),
        Some((start, end)) => format!("{}{}{}", &html[..start], escape_text(&title), &html[end..]),
        None => insert_into_head(html, &format!("<title>{}</title>", escape_text(&title))),
    };

    FixOutcome { fixed, issues }
}

/// Run every stage in order, threading the document through:
/// canonical, description, H1, title, image, body.
pub fn run_comprehensive_seo_fix(html: &str, seo: &SeoData, site: &SiteConfig) -> ComprehensiveFix {
    let stages: [&dyn Fn(&str) -> FixOutcome; 6] = [
        &|doc: &str| canonical_stage(doc, seo, site),
        &|doc: &str| description_stage(doc, seo),
        &fix_multiple_h1s,
        &|doc: &str| title_stage(doc, seo, site),
        &|doc: &str| fix_image_optimization(doc, site),
        &fix_body_structure,
    ];

    let mut content = html.to_string();
    let mut all_issues = Vec::new();
    let mut fixes_applied = 0;

    for stage in stages {
        let outcome = stage(&content);
        if outcome.fixed != content {
            fixes_applied += 1;
        }
        content = outcome.fixed;
        all_issues.extend(outcome.issues);
    }

    let summary = FixSummary {
        total_issues: all_issues.len(),
        by_priority: PriorityCounts::tally(&all_issues),
        fixes_applied,
    };

    ComprehensiveFix {
        fixed_content: content,
        all_issues,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig::default()
    }

    const GOOD_TITLE: &str = "AI-Powered Digital Marketing Agency | Digital Frontier";

    fn good_description() -> String {
        "Digital Frontier helps growing brands win search, social and AI answer engines with data-driven SEO, AEO and content strategy today."
            .to_string()
    }

    #[test]
    fn test_canonicals_all_removed() {
        let inputs = [
            "<head></head>",
            r#"<head><link rel="canonical" href="https://a"></head>"#,
            r#"<head><link rel="canonical" href="https://a"><link href="https://b" rel='canonical' /></head>"#,
            "<link rel=\"canonical\"\n  href=\"https://a\">\n<link rel=\"canonical\" href=\"https://b\">",
        ];
        for input in inputs {
            let out = fix_multiple_canonicals(input, "https://a");
            assert!(canonical_hrefs(&out.fixed).is_empty(), "left canonical in {:?}", out.fixed);
            assert_eq!(CANONICAL_RE.find_iter(&out.fixed).count(), 0);
        }
    }

    #[test]
    fn test_multiple_canonicals_one_issue() {
        let html = r#"<link rel="canonical" href="https://a"><link rel="canonical" href="https://b"><link rel="canonical" href="https://c">"#;
        let out = fix_multiple_canonicals(html, "https://a");
        assert_eq!(out.issues.len(), 1);
        assert_eq!(out.issues[0].priority, Priority::High);
        assert!(out.issues[0].details_or_empty().contains("Found 3"));
    }

    #[test]
    fn test_single_canonical_removed_without_issue() {
        let html = r#"<head><link rel="canonical" href="https://a"></head>"#;
        let out = fix_multiple_canonicals(html, "https://a");
        assert!(out.issues.is_empty());
        assert_eq!(out.fixed, "<head></head>");
    }

    #[test]
    fn test_multiple_meta_descriptions() {
        let html = "<head>\n  <meta name=\"description\" content=\"one\">\n  <meta name=\"description\" content=\"two\">\n  <meta property=\"og:description\" content=\"og\">\n</head>";
        let out = fix_multiple_meta_descriptions(html, "one");
        assert_eq!(out.issues.len(), 1);
        assert!(meta_descriptions(&out.fixed).is_empty());
        assert!(out.fixed.contains("og:description"));
    }

    #[test]
    fn test_h1_demotion_keeps_order_and_attributes() {
        let html = "<h1>Main</h1><h1 class=\"x\">Second</h1><h1>Third</h1>";
        let out = fix_multiple_h1s(html);
        assert_eq!(
            out.fixed,
            "<h1>Main</h1><h2 class=\"x\">Second</h2><h2>Third</h2>"
        );
        assert_eq!(out.issues.len(), 1);
        assert_eq!(out.issues[0].priority, Priority::Medium);
        assert!(out.issues[0].details_or_empty().contains("Found 3"));
    }

    #[test]
    fn test_h1_fix_idempotent() {
        let html = "<body><h1>Main</h1>\n<section><h1>Second</h1></section><H1 id=\"t\">Third</H1></body>";
        let once = fix_multiple_h1s(html);
        let twice = fix_multiple_h1s(&once.fixed);
        assert_eq!(count_h1(&once.fixed), 1);
        assert_eq!(twice.fixed, once.fixed);
        assert!(twice.issues.is_empty());
    }

    #[test]
    fn test_single_h1_untouched() {
        let out = fix_multiple_h1s("<h1>Only</h1><h10>not a heading</h10>");
        assert!(out.issues.is_empty());
        assert_eq!(out.fixed, "<h1>Only</h1><h10>not a heading</h10>");
    }

    #[test]
    fn test_image_missing_alt_and_loading() {
        let out = fix_image_optimization(r#"<img src="/a.png">"#, &site());
        assert_eq!(
            out.fixed,
            r#"<img src="/a.png" alt="Digital Frontier marketing illustration" loading="lazy">"#
        );
        assert_eq!(out.issues.len(), 1);
        assert_eq!(out.issues[0].priority, Priority::Low);
    }

    #[test]
    fn test_image_self_closing_and_complete_tag() {
        let html = r#"<img src="/a.png" alt="Team photo" loading="eager" /><img src="/b.png" alt="" />"#;
        let out = fix_image_optimization(html, &site());
        assert_eq!(
            out.fixed,
            r#"<img src="/a.png" alt="Team photo" loading="eager" /><img src="/b.png" alt="" loading="lazy" />"#
        );
        assert_eq!(out.issues.len(), 1);
    }

    #[test]
    fn test_image_wrong_domain_rewritten_one_issue_per_tag() {
        let html = r#"<img src="https://digitalfrontier.ai/foo.png">"#;
        let out = fix_image_optimization(html, &site());
        assert!(out.fixed.contains(r#"src="https://digitalfrontier.app/foo.png""#));
        assert_eq!(out.issues.len(), 1);
        assert_eq!(out.issues[0].priority, Priority::Medium);
        let details = out.issues[0].details_or_empty();
        assert!(details.contains("rewrote src"));
        assert!(details.contains("alt"));
        assert!(details.contains("lazy"));
    }

    #[test]
    fn test_data_alt_is_not_alt() {
        let out = fix_image_optimization(r#"<img data-alt="x" src="/a.png" loading="lazy">"#, &site());
        assert!(out.fixed.contains(" alt=\""));
    }

    #[test]
    fn test_body_structure_wraps_fragment() {
        let out = fix_body_structure("<div>Hello</div>");
        assert_eq!(
            out.fixed,
            "<main role=\"main\" id=\"main-content\">\n<div>Hello</div>\n</main>"
        );
        assert_eq!(out.issues[0].priority, Priority::High);

        let untouched = fix_body_structure("<html><body><p>x</p></body></html>");
        assert!(untouched.issues.is_empty());
        let with_main = fix_body_structure("<main><p>x</p></main>");
        assert!(with_main.issues.is_empty());
    }

    #[test]
    fn test_insert_canonical_positions() {
        assert_eq!(
            insert_canonical("<head><title>t</title></head>", "https://x"),
            "<head><title>t</title><link rel=\"canonical\" href=\"https://x\">\n</head>"
        );
        assert_eq!(
            insert_canonical("<p>x</p>", "https://x"),
            "<link rel=\"canonical\" href=\"https://x\">\n<p>x</p>"
        );
    }

    #[test]
    fn test_comprehensive_fix_end_to_end() {
        let html = "<html><head>\n<title>SEO</title>\n\
            <link rel=\"canonical\" href=\"https://digitalfrontier.app/a\">\n\
            <link rel=\"canonical\" href=\"https://digitalfrontier.app/b\">\n\
            <meta name=\"description\" content=\"short\">\n\
            <meta name=\"description\" content=\"other\">\n\
            </head><body><h1>Main</h1><h1>Second</h1><img src=\"https://cdn.digitalfrontier.io/x.png\"></body></html>";
        let seo = SeoData {
            title: String::new(),
            description: good_description(),
            canonical_url: "https://digitalfrontier.app/a".to_string(),
        };

        let result = run_comprehensive_seo_fix(html, &seo, &site());
        let fixed = &result.fixed_content;

        assert_eq!(canonical_hrefs(fixed), vec!["https://digitalfrontier.app/a".to_string()]);
        assert_eq!(meta_descriptions(fixed), vec![good_description()]);
        assert_eq!(count_h1(fixed), 1);
        assert!(fixed.contains("<h2>Second</h2>"));
        assert!(fixed.contains("https://digitalfrontier.app/x.png"));
        assert!(fixed.contains("<title>Advanced Professional Expert SEO | Digital Frontier</title>"));

        let kinds: Vec<IssueKind> = result.all_issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::Canonical,
                IssueKind::MetaDescription,
                IssueKind::H1,
                IssueKind::Title,
                IssueKind::Image,
            ]
        );
        assert_eq!(result.summary.total_issues, 5);
        assert_eq!(result.summary.fixes_applied, 5);
        assert_eq!(result.summary.by_priority.high, 3);
    }

    #[test]
    fn test_comprehensive_fix_clean_document_is_stable() {
        let html = format!(
            "<html><head><title>{}</title><link rel=\"canonical\" href=\"https://digitalfrontier.app/\">\n<meta name=\"description\" content=\"{}\">\n</head><body><h1>Welcome</h1><img src=\"/a.png\" alt=\"Team\" loading=\"lazy\"></body></html>",
            GOOD_TITLE,
            good_description()
        );
        let seo = SeoData {
            title: GOOD_TITLE.to_string(),
            description: good_description(),
            canonical_url: "https://digitalfrontier.app/".to_string(),
        };

        let result = run_comprehensive_seo_fix(&html, &seo, &site());
        assert_eq!(result.fixed_content, html);
        assert!(result.all_issues.is_empty());
        assert_eq!(result.summary.fixes_applied, 0);
    }

    #[test]
    fn test_attribute_values_keep_other_quote_style() {
        let html = concat!(
            r#"<meta name="description" content="We get you found. We're here for you.">"#,
            r#"<meta name='description' content='Rated "best agency" by clients'>"#,
            r#"<link rel="canonical" href='https://digitalfrontier.app/o"k'>"#,
        );
        assert_eq!(
            meta_descriptions(html),
            vec![
                "We get you found. We're here for you.".to_string(),
                r#"Rated "best agency" by clients"#.to_string(),
            ]
        );
        assert_eq!(
            canonical_hrefs(html),
            vec![r#"https://digitalfrontier.app/o"k"#.to_string()]
        );
    }

    #[test]
    fn test_description_with_apostrophe_survives_fix() {
        let description = "Digital Frontier plans, writes and ships search content that gets growing brands found by customers and AI answer engines. We're here.";
        let html = format!(
            "<html><head><meta name=\"description\" content=\"{}\"></head><body></body></html>",
            description
        );
        let result = run_comprehensive_seo_fix(&html, &SeoData::default(), &site());
        assert_eq!(meta_descriptions(&result.fixed_content), vec![description.to_string()]);
        assert!(result
            .all_issues
            .iter()
            .all(|i| i.kind != IssueKind::MetaDescription));
    }

    #[test]
    fn test_single_quoted_src_rewritten() {
        let out = fix_image_optimization(
            "<img src='https://digitalfrontier.ai/hero.png' alt=\"Hero\" loading=\"lazy\">",
            &site(),
        );
        assert!(out.fixed.contains("src='https://digitalfrontier.app/hero.png'"));
    }

    #[test]
    fn test_svg_title_in_body_is_left_alone() {
        let seo = SeoData {
            title: GOOD_TITLE.to_string(),
            ..SeoData::default()
        };
        let html = "<head></head><body><svg><title>Menu icon</title></svg></body>";
        let out = title_stage(html, &seo, &site());

        assert!(out.fixed.contains("<svg><title>Menu icon</title></svg>"));
        assert!(out
            .fixed
            .starts_with(&format!("<head><title>{}</title>\n</head>", GOOD_TITLE)));
    }

    #[test]
    fn test_title_found_in_unclosed_head() {
        let seo = SeoData {
            title: GOOD_TITLE.to_string(),
            ..SeoData::default()
        };
        let html = "<head><title>Old</title><body><svg><title>Icon</title></svg></body>";
        let out = title_stage(html, &seo, &site());
        assert!(out.fixed.starts_with(&format!("<head><title>{}</title>", GOOD_TITLE)));
        assert!(out.fixed.contains("<svg><title>Icon</title></svg>"));
    }

    #[test]
    fn test_comprehensive_fix_inserts_missing_canonical() {
        let seo = SeoData {
            canonical_url: "https://digitalfrontier.ai/services".to_string(),
            ..SeoData::default()
        };
        let result = run_comprehensive_seo_fix("<head></head><body></body>", &seo, &site());
        assert_eq!(
            canonical_hrefs(&result.fixed_content),
            vec!["https://digitalfrontier.app/services".to_string()]
        );
        let messages: Vec<&str> = result.all_issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(messages, vec!["Wrong domain in canonical", "Missing canonical tag"]);
    }
}
