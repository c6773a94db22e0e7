// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! URL normalization rules
//!
//! Rewrites applied in order:
//! 1. a retired asset host prefix becomes the configured asset base
//! 2. a configured wrong domain (or a subdomain of it) becomes the site domain
//! 3. `http://` on the site's own domain becomes `https://`
//!
//! Relative URLs never change.

use crate::config::SiteConfig;
use url::Url;

/// Result of [`normalize_url`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFix {
    pub url: String,
    pub changed: bool,
    pub wrong_domain: bool,
    pub deprecated_host: bool,
}

/// Apply the rewrite rules to a single URL
pub fn normalize_url(raw: &str, site: &SiteConfig) -> UrlFix {
    let mut current = raw.trim().to_string();
    let mut deprecated_host = false;
    let mut wrong_domain = false;

    if let Some(rewritten) = rewrite_deprecated_host(&current, site) {
        current = rewritten;
        deprecated_host = true;
    }

    if let Ok(mut parsed) = Url::parse(&current) {
        let mut touched = false;

        if let Some(new_host) = parsed.host_str().and_then(|h| substitute_domain(h, site)) {
            if parsed.set_host(Some(&new_host)).is_ok() {
                wrong_domain = true;
                touched = true;
            }
        }

        let own_host = parsed.host_str().is_some_and(|h| is_own_host(h, site));
        if parsed.scheme() == "http" && own_host && parsed.set_scheme("https").is_ok() {
            touched = true;
        }

        if touched {
            current = parsed.to_string();
        }
    }

    UrlFix {
        changed: current != raw,
        url: current,
        wrong_domain,
        deprecated_host,
    }
}

/// Whether `value` mentions any configured wrong domain
pub fn contains_wrong_domain(value: &str, site: &SiteConfig) -> bool {
    let lowered = value.to_ascii_lowercase();
    site.wrong_domains
        .iter()
        .filter(|d| !d.is_empty())
        .any(|d| lowered.contains(&d.to_ascii_lowercase()))
}

fn rewrite_deprecated_host(url: &str, site: &SiteConfig) -> Option<String> {
    let lowered = url.to_ascii_lowercase();
    site.deprecated_hosts
        .iter()
        .map(|h| h.trim_end_matches('/'))
        .filter(|h| !h.is_empty())
        .find(|h| {
            lowered.starts_with(&h.to_ascii_lowercase())
                && url[h.len()..]
                    .chars()
                    .next()
                    .map_or(true, |c| matches!(c, '/' | '?' | '#'))
        })
        .map(|h| format!("{}{}", site.asset_base.trim_end_matches('/'), &url[h.len()..]))
}

fn substitute_domain(host: &str, site: &SiteConfig) -> Option<String> {
    let host = host.to_ascii_lowercase();
    site.wrong_domains.iter().find_map(|wrong| {
        let wrong = wrong.to_ascii_lowercase();
        if wrong.is_empty() {
            None
        } else if host == wrong {
            Some(site.domain.clone())
        } else {
            host.strip_suffix(&wrong)
                .filter(|prefix| prefix.ends_with('.'))
                .map(|prefix| format!("{}{}", prefix, site.domain))
        }
    })
}

fn is_own_host(host: &str, site: &SiteConfig) -> bool {
    let host = host.to_ascii_lowercase();
    let domain = site.domain.to_ascii_lowercase();
    host == domain || host.strip_suffix(&domain).is_some_and(|p| p.ends_with('.'))
}
