// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration for seobot

use crate::error::{Result, SeobotError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dry_run: bool,
    pub exclude: Vec<String>,
    pub site: SiteConfig,
    pub schema: SchemaConfig,
    pub output: OutputConfig,
    pub routes: Vec<RouteConfig>,
}

/// Site identity used by the domain and branding rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Brand appended to page titles
    pub brand: String,
    /// The only domain URLs may point at
    pub domain: String,
    /// Domains that must be rewritten to `domain`
    pub wrong_domains: Vec<String>,
    /// URL prefixes of retired asset hosts
    pub deprecated_hosts: Vec<String>,
    /// Replacement prefix for deprecated asset hosts
    pub asset_base: String,
    /// Alt text injected into images that have none
    pub fallback_alt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Directory scanned by `validate-schema` and `fix`
    pub dir: PathBuf,
    /// File extensions considered documents
    pub extensions: Vec<String>,
    /// Fail the run when schema errors are found
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub schema_reports: PathBuf,
    pub audit_reports: PathBuf,
    pub sitemap: PathBuf,
}

/// A statically known page of the site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub path: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<String>,
}

impl RouteConfig {
    pub fn new(path: &str, title: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            priority: None,
            changefreq: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dry_run: false,
            exclude: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                "target".to_string(),
            ],
            site: SiteConfig::default(),
            schema: SchemaConfig::default(),
            output: OutputConfig::default(),
            routes: default_routes(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            brand: "Digital Frontier".to_string(),
            domain: "digitalfrontier.app".to_string(),
            wrong_domains: vec!["digitalfrontier.ai".to_string()],
            deprecated_hosts: vec!["https://cdn.digitalfrontier.io".to_string()],
            asset_base: "https://digitalfrontier.app".to_string(),
            fallback_alt: "Digital Frontier marketing illustration".to_string(),
        }
    }
}

impl SiteConfig {
    /// `https://{domain}` without a trailing slash
    pub fn base_url(&self) -> String {
        format!("https://{}", self.domain.trim_end_matches('/'))
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dist"),
            extensions: vec!["html".to_string()],
            strict: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            schema_reports: PathBuf::from("reports/schema"),
            audit_reports: PathBuf::from("reports/seo"),
            sitemap: PathBuf::from("dist"),
        }
    }
}

fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new(
            "/",
            "AI-Powered Digital Marketing Agency | Digital Frontier",
            "Digital Frontier helps growing brands win search, social and AI answer engines with data-driven SEO, AEO and content strategy. Book a free audit today.",
        ),
        RouteConfig::new(
            "/services",
            "SEO, AEO and Content Marketing Services | Digital Frontier",
            "Explore SEO, answer engine optimization, paid media and content services built to grow qualified traffic and leads for ambitious businesses.",
        ),
        RouteConfig::new(
            "/blog",
            "Blog | Digital Frontier",
            "Marketing insights and guides.",
        ),
        RouteConfig::new(
            "/contact",
            "Contact",
            "Get in touch with our team.",
        ),
    ]
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("seobot")
        .join("config.yml")
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| SeobotError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if path.extension().and_then(|s| s.to_str()) == Some("toml") {
        toml::from_str(&content)
            .map_err(|e| SeobotError::Config(format!("TOML parse error: {}", e)))
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| SeobotError::Config(format!("YAML parse error: {}", e)))
    }
}

pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
        toml::to_string_pretty(&config)
            .map_err(|e| SeobotError::Config(format!("TOML serialize error: {}", e)))?
    } else {
        serde_yaml::to_string(&config)?
    };

    std::fs::write(path, content).map_err(|source| SeobotError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
