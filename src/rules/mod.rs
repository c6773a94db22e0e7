// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! String rule engine
//!
//! Pure checks of a single text field against the fixed rule table, plus the
//! corrections that bring an out-of-bounds title or description back within
//! its bounds. All lengths are counted in `char`s, never bytes.
//!
//! | Field         | Min | Max | Domain rule | Forbidden                 |
//! |---------------|-----|-----|-------------|---------------------------|
//! | `title`       | 45  | 60  | -           | `undefined`, `[object`    |
//! | `description` | 120 | 160 | -           | `undefined`, `[object`    |
//! | `h1`          | 20  | 70  | -           | -                         |
//! | `canonical`   | -   | -   | site domain | `localhost`, `127.0.0.1`  |
//! | `image.alt`   | 1   | 125 | -           | -                         |

pub mod url;

use crate::config::SiteConfig;
use crate::issue::{Issue, IssueKind, Priority};

pub const TITLE_MIN: usize = 45;
pub const TITLE_MAX: usize = 60;
pub const DESCRIPTION_MIN: usize = 120;
pub const DESCRIPTION_MAX: usize = 160;

/// Suffix appended by [`truncate_to_max`] by default
pub const ELLIPSIS: &str = "...";

/// Prepended one after another to a title that is still too short
const POWER_WORDS: &[&str] = &["Expert", "Professional", "Advanced", "Complete", "Proven"];

/// Tried first when a description is too short
const CALL_TO_ACTION_SUFFIXES: &[&str] = &[
    " Contact us today.",
    " Get your free consultation today.",
    " Book a free strategy call with our team today.",
    " Discover how our experts can grow your traffic, leads and revenue today.",
];

/// Tried when no call to action fits
const DESCRIPTOR_SUFFIXES: &[&str] = &[
    " Data-driven strategies, transparent reporting and measurable results.",
    " Trusted by growing brands for SEO, answer engine optimization and content marketing that converts.",
];

/// A field covered by the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    H1,
    Canonical,
    ImageAlt,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::H1 => "h1",
            Field::Canonical => "canonical",
            Field::ImageAlt => "image.alt",
        }
    }

    fn issue_kind(&self) -> IssueKind {
        match self {
            Field::Title => IssueKind::Title,
            Field::Description => IssueKind::MetaDescription,
            Field::H1 => IssueKind::H1,
            Field::Canonical => IssueKind::Canonical,
            Field::ImageAlt => IssueKind::Image,
        }
    }
}

/// One row of the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub min: Option<usize>,
    pub max: Option<usize>,
    /// Value must not point at a configured wrong domain
    pub must_match_domain: bool,
    pub forbidden_substrings: &'static [&'static str],
    pub priority: Priority,
}

/// Look up the rule for a field
pub const fn rule_for(field: Field) -> FieldRule {
    match field {
        Field::Title => FieldRule {
            min: Some(TITLE_MIN),
            max: Some(TITLE_MAX),
            must_match_domain: false,
            forbidden_substrings: &["undefined", "[object"],
            priority: Priority::High,
        },
        Field::Description => FieldRule {
            min: Some(DESCRIPTION_MIN),
            max: Some(DESCRIPTION_MAX),
            must_match_domain: false,
            forbidden_substrings: &["undefined", "[object"],
            priority: Priority::Medium,
        },
        Field::H1 => FieldRule {
            min: Some(20),
            max: Some(70),
            must_match_domain: false,
            forbidden_substrings: &[],
            priority: Priority::Medium,
        },
        Field::Canonical => FieldRule {
            min: None,
            max: None,
            must_match_domain: true,
            forbidden_substrings: &["localhost", "127.0.0.1"],
            priority: Priority::High,
        },
        Field::ImageAlt => FieldRule {
            min: Some(1),
            max: Some(125),
            must_match_domain: false,
            forbidden_substrings: &[],
            priority: Priority::Low,
        },
    }
}

/// Outcome of [`check_length`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthCheck {
    pub ok: bool,
    pub reason: Option<String>,
}

pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn in_bounds(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&char_len(value))
}

/// Check that `value` is between `min` and `max` characters long (inclusive)
pub fn check_length(value: &str, min: usize, max: usize) -> LengthCheck {
    let len = char_len(value);
    let reason = if len < min {
        Some(format!("too short: {} characters (minimum {})", len, min))
    } else if len > max {
        Some(format!("too long: {} characters (maximum {})", len, max))
    } else {
        None
    };

    LengthCheck {
        ok: reason.is_none(),
        reason,
    }
}

/// Cut `value` down to exactly `max` characters, the last of which are `suffix`.
///
/// Values already within `max` are returned unchanged. If the suffix alone is
/// longer than `max`, the value is cut without one.
pub fn truncate_to_max(value: &str, max: usize, suffix: &str) -> String {
    if char_len(value) <= max {
        return value.to_string();
    }

    let suffix_len = char_len(suffix);
    if suffix_len > max {
        return value.chars().take(max).collect();
    }

    let mut out: String = value.chars().take(max - suffix_len).collect();
    out.push_str(suffix);
    out
}

/// Append the first candidate suffix that lands the value in `[min, max]`.
///
/// Returns `value` unchanged when no candidate fits; callers must accept
/// under-length output.
pub fn extend_to_min(value: &str, min: usize, max: usize, candidates: &[&str]) -> String {
    candidates
        .iter()
        .map(|suffix| format!("{}{}", value, suffix))
        .find(|candidate| in_bounds(candidate, min, max))
        .unwrap_or_else(|| value.to_string())
}

fn strip_brand_suffix<'a>(title: &'a str, brand: &str) -> &'a str {
    let trimmed = title.trim_end();
    if brand.is_empty() {
        return trimmed;
    }

    trimmed
        .strip_suffix(brand)
        .and_then(|rest| rest.trim_end().strip_suffix('|'))
        .map(str::trim_end)
        .unwrap_or(trimmed)
}

/// Bring a page title within `[min, max]`, keeping the brand suffix.
pub fn optimize_title(title: &str, brand: &str, min: usize, max: usize) -> String {
    if in_bounds(title, min, max) {
        return title.to_string();
    }

    let base = strip_brand_suffix(title, brand);
    let brand_suffix = if brand.is_empty() {
        String::new()
    } else {
        format!(" | {}", brand)
    };

    if char_len(title) > max {
        let suffix_len = char_len(&brand_suffix);
        if suffix_len >= max {
            return truncate_to_max(base, max, ELLIPSIS);
        }
        let candidate = format!("{}{}", base, brand_suffix);
        if char_len(&candidate) <= max {
            return candidate;
        }
        return format!(
            "{}{}",
            truncate_to_max(base, max - suffix_len, ELLIPSIS),
            brand_suffix
        );
    }

    let mut candidate = if !brand.is_empty() && !base.contains(brand) {
        format!("{}{}", base, brand_suffix)
    } else {
        base.to_string()
    };

    for word in POWER_WORDS {
        if in_bounds(&candidate, min, max) {
            return candidate;
        }
        if char_len(&candidate) > max {
            break;
        }
        candidate = format!("{} {}", word, candidate);
    }

    if in_bounds(&candidate, min, max) {
        candidate
    } else {
        title.to_string()
    }
}

/// Bring a meta description within `[min, max]`.
pub fn optimize_description(description: &str, min: usize, max: usize) -> String {
    if in_bounds(description, min, max) {
        return description.to_string();
    }

    if char_len(description) > max {
        return truncate_to_max(description, max, ELLIPSIS);
    }

    let base = description.trim_end();
    for suffixes in [CALL_TO_ACTION_SUFFIXES, DESCRIPTOR_SUFFIXES] {
        let extended = extend_to_min(base, min, max, suffixes);
        if in_bounds(&extended, min, max) {
            return extended;
        }
    }

    description.to_string()
}

/// Check a value against its rule table row.
///
/// Returns the first violation found; the returned issue carries no file.
pub fn check_field(field: Field, value: &str, site: &SiteConfig) -> Option<Issue> {
    let rule = rule_for(field);
    let kind = field.issue_kind();

    if let (Some(min), Some(max)) = (rule.min, rule.max) {
        let check = check_length(value, min, max);
        if let Some(reason) = check.reason {
            return Some(
                Issue::new(kind, rule.priority, &format!("Invalid {} length", field.name()))
                    .with_details(format!("{} is {}", field.name(), reason)),
            );
        }
    }

    let lowered = value.to_lowercase();
    if let Some(bad) = rule
        .forbidden_substrings
        .iter()
        .find(|bad| lowered.contains(&bad.to_lowercase()))
    {
        return Some(
            Issue::new(
                IssueKind::Content,
                rule.priority,
                &format!("Forbidden content in {}", field.name()),
            )
                .with_details(format!("{} contains \"{}\"", field.name(), bad)),
        );
    }

    if rule.must_match_domain && url::contains_wrong_domain(value, site) {
        return Some(
            Issue::new(kind, Priority::High, &format!("Wrong domain in {}", field.name()))
                .with_details(format!("{} should point at {}", value, site.domain)),
        );
    }

    None
}
