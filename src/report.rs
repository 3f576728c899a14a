//! Report model and JSON rendering.
//!
//! A [`Report`] is built once from a [`ScanOutcome`] and feeds both sinks:
//! the console text ([`crate::output`]) and the optional JSON file written
//! here. Both read the same [`ScanSummary`], so every number in the text
//! summary is also in the JSON `summary` object.
//!
//! ## JSON shape
//!
//! ```json
//! {
//!   "summary": {
//!     "total_posts_discovered": 7,
//!     "total_posts_scanned": 5,
//!     "posts_with_missing_translations": 4,
//!     "posts_complete": 1,
//!     "filters_applied": [
//!       { "name": "archived", "config": { "tag": "zArchive" } },
//!       { "name": "date_range", "config": { "min_year": 2025 } }
//!     ],
//!     "filters_counts": { "archived": 1, "date_range": 1 },
//!     "missing_by_language": { "ar": 3, "de": 2, "fr": 4 },
//!     "expected_languages": ["ar", "de", "fr"],
//!     "total_expected_languages": 3,
//!     "all_complete": false,
//!     "base_url": "https://blog.example.com/",
//!     "date_generated": "2026-01-06T10:00:00Z"
//!   },
//!   "posts": [
//!     {
//!       "path": "content/blog/2025/partial-post",
//!       "url": "https://blog.example.com/2025/partial-post/",
//!       "urls": { "en": "…", "ar": "…", "de": "…", "fr": "…" },
//!       "missing_languages": ["ar", "fr"],
//!       "missing_count": 2,
//!       "total_expected": 3
//!     }
//!   ]
//! }
//! ```

use crate::config::ScanConfig;
use crate::detect::MissingLanguageFinding;
use crate::filter::FilterRule;
use crate::scan::ScanOutcome;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A filter as it was applied in this run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedFilter {
    pub name: String,
    pub config: Map<String, Value>,
}

impl From<&FilterRule> for AppliedFilter {
    fn from(rule: &FilterRule) -> Self {
        Self {
            name: rule.name().to_string(),
            config: rule.kind().settings(),
        }
    }
}

/// Per-language tallies, kept in expected-language order. Serializes as a
/// JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageCounts(Vec<(String, usize)>);

impl LanguageCounts {
    fn zeroed(codes: &[String]) -> Self {
        Self(codes.iter().map(|code| (code.clone(), 0)).collect())
    }

    fn increment(&mut self, language: &str) {
        match self.0.iter_mut().find(|(code, _)| code == language) {
            Some((_, count)) => *count += 1,
            None => self.0.push((language.to_string(), 1)),
        }
    }

    pub fn get(&self, language: &str) -> Option<usize> {
        self.0
            .iter()
            .find(|(code, _)| code == language)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(code, count)| (code.as_str(), *count))
    }
}

impl Serialize for LanguageCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, count) in &self.0 {
            map.serialize_entry(code, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanSummary {
    pub total_posts_discovered: usize,
    /// Posts left after filtering.
    pub total_posts_scanned: usize,
    pub posts_with_missing_translations: usize,
    pub posts_complete: usize,
    pub filters_applied: Vec<AppliedFilter>,
    pub filters_counts: BTreeMap<String, usize>,
    /// Number of scanned posts lacking each expected language.
    pub missing_by_language: LanguageCounts,
    pub expected_languages: Vec<String>,
    pub total_expected_languages: usize,
    pub all_complete: bool,
    pub base_url: String,
    pub date_generated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: ScanSummary,
    pub posts: Vec<MissingLanguageFinding>,
}

impl Report {
    /// Aggregate a scan into a report. Never fails; an empty scan gives a
    /// zero-of-zero report with `all_complete` set.
    pub fn build(outcome: ScanOutcome, config: &ScanConfig, generated_at: DateTime<Utc>) -> Self {
        let expected = config.languages.expected().to_vec();

        let mut missing_by_language = LanguageCounts::zeroed(&expected);
        for finding in &outcome.findings {
            for code in &finding.missing_languages {
                missing_by_language.increment(code);
            }
        }

        let incomplete = outcome.findings.len();
        let summary = ScanSummary {
            total_posts_discovered: outcome.total_discovered,
            total_posts_scanned: outcome.total_scanned,
            posts_with_missing_translations: incomplete,
            posts_complete: outcome.total_scanned.saturating_sub(incomplete),
            filters_applied: config
                .pipeline
                .rules()
                .iter()
                .map(AppliedFilter::from)
                .collect(),
            filters_counts: outcome.filter_counts,
            missing_by_language,
            total_expected_languages: expected.len(),
            expected_languages: expected,
            all_complete: incomplete == 0,
            base_url: config.languages.base_url().to_string(),
            date_generated: generated_at,
        };

        Self {
            summary,
            posts: outcome.findings,
        }
    }
}

/// Pretty-printed JSON with a trailing newline.
pub fn to_json(report: &Report) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// Write the JSON rendering to `path`, creating parent directories.
pub fn write_json(report: &Report, path: &Path) -> Result<(), ReportError> {
    let json = to_json(report)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}
