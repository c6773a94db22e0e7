// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! JSON-LD structured data validator
//!
//! Extracts every `<script type="application/ld+json">` block with an HTML
//! parser, parses it, and checks each schema.org item against the
//! required-properties table:
//!
//! | `@type`        | Required                                        |
//! |----------------|-------------------------------------------------|
//! | Organization   | `@type`, name, url                              |
//! | WebSite        | `@type`, url, name                              |
//! | Article        | `@type`, headline, image, datePublished, author |
//! | Service        | `@type`, name, description, provider            |
//! | BreadcrumbList | `@type`, itemListElement                        |
//! | FAQPage        | `@type`, mainEntity                             |
//! | LocalBusiness  | `@type`, name, address, telephone               |

use crate::config::SiteConfig;
use crate::issue::{Issue, IssueKind, Priority};
use crate::rules::url::contains_wrong_domain;
use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

const REQUIRED_PROPERTIES: &[(&str, &[&str])] = &[
    ("Organization", &["@type", "name", "url"]),
    ("WebSite", &["@type", "url", "name"]),
    ("Article", &["@type", "headline", "image", "datePublished", "author"]),
    ("Service", &["@type", "name", "description", "provider"]),
    ("BreadcrumbList", &["@type", "itemListElement"]),
    ("FAQPage", &["@type", "mainEntity"]),
    ("LocalBusiness", &["@type", "name", "address", "telephone"]),
];

/// Substrings that mark a block as built at runtime rather than written out
const DYNAMIC_MARKERS: &[&str] = &["JSON.stringify", "${"];

/// Fields scanned for a wrong domain
const URL_FIELDS: &[&str] = &["url", "@id", "image"];

pub const MSG_INVALID_JSON: &str = "Invalid JSON";
pub const MSG_MISSING_CONTEXT: &str = "Missing @context";
pub const MSG_MISSING_TYPE: &str = "Missing @type";
pub const MSG_MISSING_PROPERTIES: &str = "Missing Required Properties";
pub const MSG_WRONG_DOMAIN: &str = "Wrong Domain";
pub const MSG_DYNAMIC: &str = "Dynamic Schema";

/// Required properties for a schema.org type, if the type is in the table
pub fn required_properties(schema_type: &str) -> Option<&'static [&'static str]> {
    REQUIRED_PROPERTIES
        .iter()
        .find(|(name, _)| *name == schema_type)
        .map(|(_, props)| *props)
}

/// One extracted `ld+json` block
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaBlock {
    pub raw: String,
    pub parsed: Option<Value>,
    pub needs_manual_review: bool,
    pub error: Option<String>,
}

/// Validation outcome for one document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentValidation {
    pub file: PathBuf,
    /// Number of `ld+json` blocks found
    pub schemas: usize,
    /// Detected `@type` values, first occurrence order
    pub types: Vec<String>,
    pub issues: Vec<Issue>,
}

impl DocumentValidation {
    /// A document is valid when it has schemas and not a single error or warning
    pub fn is_valid(&self) -> bool {
        self.schemas > 0 && self.issues.is_empty()
    }
}

/// Extract every `application/ld+json` block from a document.
///
/// A self-closing `<script ... />` is not closed by the HTML parser, so its
/// text runs on to the next `</script>` and swallows any block in between.
/// That text is scanned again for the swallowed blocks.
pub fn extract_schemas(document_text: &str) -> Vec<SchemaBlock> {
    let document = Html::parse_document(document_text);
    let selector =
        Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector");

    let mut blocks = Vec::new();
    for element in document.select(&selector) {
        let opening_tag = format!("<script {}>", attribute_text(element.value()));
        let text: String = element.text().collect();
        let swallowed = text.trim_start().starts_with('<');

        if has_dynamic_attribute(&opening_tag) {
            blocks.push(SchemaBlock {
                raw: opening_tag,
                parsed: None,
                needs_manual_review: true,
                error: None,
            });
        } else if swallowed || text.trim().is_empty() {
            blocks.push(classify_block(opening_tag));
        } else {
            blocks.push(classify_block(text.trim().to_string()));
        }

        if swallowed {
            blocks.extend(extract_schemas(&text));
        }
    }
    blocks
}

/// Attributes as `name="value"` pairs; the parser lowercases the names
fn attribute_text(element: &scraper::node::Element) -> String {
    element
        .attrs()
        .map(|(name, value)| {
            if value.is_empty() {
                name.to_string()
            } else {
                format!("{}=\"{}\"", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// JSX fills the block from an attribute (`dangerouslySetInnerHTML`)
fn has_dynamic_attribute(opening_tag: &str) -> bool {
    let lowered = opening_tag.to_lowercase();
    lowered.contains("dangerouslysetinnerhtml")
        || DYNAMIC_MARKERS
            .iter()
            .any(|m| lowered.contains(&m.to_lowercase()))
}

fn classify_block(raw: String) -> SchemaBlock {
    match serde_json::from_str::<Value>(&raw) {
        Ok(parsed) => SchemaBlock {
            raw,
            parsed: Some(parsed),
            needs_manual_review: false,
            error: None,
        },
        Err(_) if DYNAMIC_MARKERS.iter().any(|m| raw.contains(m)) => SchemaBlock {
            raw,
            parsed: None,
            needs_manual_review: true,
            error: None,
        },
        Err(e) => SchemaBlock {
            raw,
            parsed: None,
            needs_manual_review: false,
            error: Some(e.to_string()),
        },
    }
}

/// Top-level objects of a block: the array elements, or the value itself
fn roots(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Items of a root: its `@graph` entries, or the root itself
fn graph_items(root: &Value) -> Vec<&Value> {
    match root.get("@graph") {
        Some(Value::Array(items)) => items.iter().collect(),
        _ => vec![root],
    }
}

fn schema_types(item: &Map<String, Value>) -> Vec<String> {
    match item.get("@type") {
        Some(Value::String(t)) => vec![t.clone()],
        Some(Value::Array(ts)) => ts
            .iter()
            .filter_map(|t| t.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn url_strings(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().flat_map(url_strings).collect(),
        Value::Object(obj) => ["url", "@id"]
            .iter()
            .filter_map(|k| obj.get(*k).and_then(Value::as_str))
            .collect(),
        _ => Vec::new(),
    }
}

fn missing_properties(item: &Map<String, Value>, types: &[String]) -> Vec<&'static str> {
    let mut missing: Vec<&'static str> = Vec::new();
    for props in types.iter().filter_map(|t| required_properties(t)) {
        for prop in props {
            if !item.contains_key(*prop) && !missing.contains(prop) {
                missing.push(*prop);
            }
        }
    }
    missing
}

/// Validate one extracted block.
pub fn validate_schema(block: &SchemaBlock, file: &Path, site: &SiteConfig) -> Vec<Issue> {
    if block.needs_manual_review {
        return vec![Issue::new(IssueKind::SchemaDynamic, Priority::Low, MSG_DYNAMIC)
            .with_file(file)
            .with_details("Dynamic schema construction - needs manual review")
            .as_warning()];
    }

    let Some(parsed) = &block.parsed else {
        let details = block.error.clone().unwrap_or_else(|| "unparseable block".to_string());
        return vec![Issue::new(IssueKind::SchemaParse, Priority::High, MSG_INVALID_JSON)
            .with_file(file)
            .with_details(details)];
    };

    let mut issues = Vec::new();

    for root in roots(parsed) {
        if root.get("@context").is_none() {
            issues.push(
                Issue::new(IssueKind::SchemaMissingContext, Priority::High, MSG_MISSING_CONTEXT)
                    .with_file(file)
                    .with_details("Schema must declare @context (https://schema.org)"),
            );
        }

        for item in graph_items(root) {
            let empty = Map::new();
            let object = item.as_object().unwrap_or(&empty);
            let types = schema_types(object);

            if types.is_empty() {
                issues.push(
                    Issue::new(IssueKind::SchemaMissingType, Priority::High, MSG_MISSING_TYPE)
                        .with_file(file)
                        .with_details("Schema item has no @type"),
                );
                continue;
            }

            let missing = missing_properties(object, &types);
            if !missing.is_empty() {
                issues.push(
                    Issue::new(
                        IssueKind::SchemaMissingProp,
                        Priority::Medium,
                        MSG_MISSING_PROPERTIES,
                    )
                    .with_file(file)
                    .with_details(format!("{}: {}", types.join("/"), missing.join(", "))),
                );
            }

            let offending: Vec<String> = URL_FIELDS
                .iter()
                .filter_map(|field| object.get(*field).map(|v| (field, v)))
                .flat_map(|(field, v)| {
                    url_strings(v)
                        .into_iter()
                        .filter(|s| contains_wrong_domain(s, site))
                        .map(move |s| format!("{}={}", field, s))
                })
                .collect();
            if !offending.is_empty() {
                issues.push(
                    Issue::new(IssueKind::SchemaWrongDomain, Priority::High, MSG_WRONG_DOMAIN)
                        .with_file(file)
                        .with_details(format!(
                            "{} should use {}",
                            offending.join(", "),
                            site.domain
                        )),
                );
            }
        }
    }

    issues
}

/// Extract and validate every block of a document.
pub fn validate_document(file: &Path, content: &str, site: &SiteConfig) -> DocumentValidation {
    let blocks = extract_schemas(content);
    let mut validation = DocumentValidation {
        file: file.to_path_buf(),
        schemas: blocks.len(),
        ..DocumentValidation::default()
    };

    for block in &blocks {
        if let Some(parsed) = &block.parsed {
            for item in roots(parsed).into_iter().flat_map(graph_items) {
                if let Some(object) = item.as_object() {
                    for t in schema_types(object) {
                        if !validation.types.contains(&t) {
                            validation.types.push(t);
                        }
                    }
                }
            }
        }
        validation.issues.extend(validate_schema(block, file, site));
    }

    debug!(
        "{}: {} schema block(s), {} issue(s)",
        file.display(),
        validation.schemas,
        validation.issues.len()
    );

    validation
}
