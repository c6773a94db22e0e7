// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! `sitemap.xml` and `robots.txt` from the configured routes

use crate::config::RouteConfig;
use crate::error::{Result, SeobotError};
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_PRIORITY: f32 = 0.8;
const DEFAULT_CHANGEFREQ: &str = "weekly";

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Render a sitemap for `routes` under `base_url`. Duplicate paths keep the
/// first route.
pub fn generate_sitemap(base_url: &str, routes: &[RouteConfig], lastmod: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let mut seen: Vec<String> = Vec::new();

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for route in routes {
        let path = normalize_path(&route.path);
        if seen.contains(&path) {
            continue;
        }

        let priority = if path == "/" {
            1.0
        } else {
            route.priority.unwrap_or(DEFAULT_PRIORITY)
        };
        let changefreq = route.changefreq.as_deref().unwrap_or(DEFAULT_CHANGEFREQ);

        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&format!("{}{}", base, path))));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", escape_xml(lastmod)));
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", escape_xml(changefreq)));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", priority));
        xml.push_str("  </url>\n");

        seen.push(path);
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn generate_robots(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}

/// Write `sitemap.xml` and `robots.txt` into `dir`.
pub fn write_sitemap(
    dir: &Path,
    base_url: &str,
    routes: &[RouteConfig],
    lastmod: &str,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|source| SeobotError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let files = [
        (dir.join("sitemap.xml"), generate_sitemap(base_url, routes, lastmod)),
        (dir.join("robots.txt"), generate_robots(base_url)),
    ];

    let mut written = Vec::new();
    for (path, content) in files {
        std::fs::write(&path, content).map_err(|source| SeobotError::Write {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }

    info!("Sitemap with {} route(s) written to {}", routes.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn route(path: &str) -> RouteConfig {
        RouteConfig::new(path, "t", "d")
    }

    #[test]
    fn test_sitemap_entries() {
        let mut blog = route("blog");
        blog.priority = Some(0.5);
        blog.changefreq = Some("daily".to_string());

        let xml = generate_sitemap(
            "https://digitalfrontier.app/",
            &[route("/"), blog, route("/services")],
            "2025-01-01",
        );

        assert!(xml.contains("<loc>https://digitalfrontier.app/</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<loc>https://digitalfrontier.app/blog</loc>"));
        assert!(xml.contains("<priority>0.5</priority>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert_eq!(xml.matches("<lastmod>2025-01-01</lastmod>").count(), 3);
    }

    #[test]
    fn test_duplicates_dropped_first_wins() {
        let mut first = route("/about");
        first.priority = Some(0.3);
        let xml = generate_sitemap("https://x.app", &[first, route("about")], "2025-01-01");
        assert_eq!(xml.matches("<url>").count(), 1);
        assert!(xml.contains("<priority>0.3</priority>"));
    }

    #[test]
    fn test_xml_escaped() {
        let xml = generate_sitemap("https://x.app", &[route("/a?b=1&c=2")], "2025-01-01");
        assert!(xml.contains("<loc>https://x.app/a?b=1&amp;c=2</loc>"));
    }

    #[test]
    fn test_robots() {
        let robots = generate_robots("https://digitalfrontier.app");
        assert!(robots.contains("Sitemap: https://digitalfrontier.app/sitemap.xml"));
    }

    #[test]
    fn test_write_sitemap() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("public");
        let written = write_sitemap(&out, "https://x.app", &[route("/")], "2025-01-01").unwrap();
        assert_eq!(written.len(), 2);
        assert!(out.join("sitemap.xml").exists());
        assert!(out.join("robots.txt").exists());
    }
}
