//! Locale negotiation
//!
//! The effective locale of a request is picked from, in order: an explicit
//! `?locale=` parameter, the user's persisted locale, the `Accept-Language`
//! header, and finally the configured default. Anything not in the available
//! list is skipped.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    default_locale: String,
    available: Vec<String>,
}

impl LocaleConfig {
    pub fn new(default_locale: String, available: Vec<String>) -> anyhow::Result<Self> {
        if !available.iter().any(|l| l == &default_locale) {
            anyhow::bail!(
                "DEFAULT_LOCALE '{}' is not in AVAILABLE_LOCALES ({})",
                default_locale,
                available.join(",")
            );
        }
        Ok(Self {
            default_locale,
            available,
        })
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    /// Exact (case- and separator-insensitive) membership test.
    pub fn is_available(&self, tag: &str) -> bool {
        self.find_exact(tag).is_some()
    }

    /// Canonical spelling of an available locale matching `tag`, falling
    /// back to its primary language subtag (`fr-CA` → `fr`).
    pub fn negotiate(&self, tag: &str) -> Option<&str> {
        if let Some(found) = self.find_exact(tag) {
            return Some(found);
        }
        let primary = tag.split(|c: char| c == '-' || c == '_').next()?;
        self.find_exact(primary)
    }

    pub fn resolve(
        &self,
        requested: Option<&str>,
        persisted: Option<&str>,
        accept_language: Option<&str>,
    ) -> String {
        if let Some(found) = requested.and_then(|r| self.find_exact(r)) {
            return found.to_string();
        }
        if let Some(found) = persisted.and_then(|p| self.find_exact(p)) {
            return found.to_string();
        }
        if let Some(header) = accept_language {
            for tag in parse_accept_language(header) {
                if let Some(found) = self.negotiate(tag) {
                    return found.to_string();
                }
            }
        }
        self.default_locale.clone()
    }

    fn find_exact(&self, tag: &str) -> Option<&str> {
        let wanted = normalize(tag);
        self.available
            .iter()
            .find(|l| normalize(l) == wanted)
            .map(String::as_str)
    }
}

fn normalize(tag: &str) -> String {
    tag.trim().to_ascii_lowercase().replace('-', "_")
}

/// Language tags from an `Accept-Language` header, highest quality first.
fn parse_accept_language(header: &str) -> Vec<&str> {
    let mut weighted: Vec<(&str, f32)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = pieces
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((tag, quality))
        })
        .collect();
    // stable sort keeps header order among equal weights
    weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    weighted.into_iter().map(|(tag, _)| tag).collect()
}
