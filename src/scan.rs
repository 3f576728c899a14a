//! The scan itself: discovery → front matter → filters → completeness.
//!
//! A scan is one straight pass over the content tree. Each post is read
//! once, run through the filter pipeline, and, if kept, checked for missing
//! translations. Per-post problems become [`ScanWarning`]s; only an unusable
//! content root stops the scan.

use crate::config::{ConfigError, ScanConfig};
use crate::detect::{self, MissingLanguageFinding};
use crate::discover::{self, Post};
use crate::filter::Decision;
use crate::frontmatter::{self, ScanWarning};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw results of one scan, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    pub total_discovered: usize,
    /// Posts kept after filtering.
    pub total_scanned: usize,
    /// Exclusions per rule name. Every rule in the pipeline has an entry.
    pub filter_counts: BTreeMap<String, usize>,
    pub findings: Vec<MissingLanguageFinding>,
    pub warnings: Vec<ScanWarning>,
}

impl ScanOutcome {
    pub fn total_excluded(&self) -> usize {
        self.filter_counts.values().sum()
    }
}

/// Scan the tree under `content_root`.
pub fn scan(content_root: &Path, config: &ScanConfig) -> Result<ScanOutcome, ConfigError> {
    info!(
        root = %content_root.display(),
        expected = ?config.languages.expected(),
        "scanning for missing translations"
    );
    let posts = discover::discover(content_root)?;
    let outcome = scan_posts(posts, config);
    info!(
        discovered = outcome.total_discovered,
        scanned = outcome.total_scanned,
        incomplete = outcome.findings.len(),
        "scan finished"
    );
    Ok(outcome)
}

/// Run already-discovered posts through filtering and detection.
pub fn scan_posts(posts: impl IntoIterator<Item = Post>, config: &ScanConfig) -> ScanOutcome {
    let mut outcome = ScanOutcome {
        filter_counts: config
            .pipeline
            .rules()
            .iter()
            .map(|rule| (rule.name().to_string(), 0))
            .collect(),
        ..ScanOutcome::default()
    };

    for post in posts {
        outcome.total_discovered += 1;

        let extraction = frontmatter::extract(&post.canonical_file);
        for warning in &extraction.warnings {
            warn!("{warning}");
        }
        outcome.warnings.extend(extraction.warnings);
        let front_matter = extraction.front_matter;

        if let Decision::Exclude(name) = config.pipeline.apply(&post, &front_matter) {
            debug!(post = %post.display_path, filter = name, "excluded");
            *outcome.filter_counts.entry(name.to_string()).or_default() += 1;
            continue;
        }

        outcome.total_scanned += 1;
        if let Some(finding) = detect::detect(&post, &front_matter, &config.languages) {
            debug!(
                post = %finding.path,
                missing = ?finding.missing_languages,
                "missing translations"
            );
            outcome.findings.push(finding);
        }
    }

    outcome
}
