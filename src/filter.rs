//! Exclusion filters.
//!
//! A [`Pipeline`] is an ordered list of named [`FilterRule`]s. A post is
//! dropped from the scan as soon as one rule matches it; that first rule is
//! the one credited in the report. Because every rule is an independent
//! predicate, reordering the pipeline never changes *which* posts are
//! excluded, only which rule gets the credit when several match.
//!
//! ## Rule kinds
//!
//! | Kind | Excludes when |
//! |------|---------------|
//! | `archived` | the post carries the archive tag (default `zArchive`) |
//! | `tag` | the post carries the configured tag |
//! | `date_range` | the publish year is known and outside `[min_year, max_year]` |
//!
//! Tag matching is exact and case-sensitive. A post whose publish date is
//! missing or unreadable is never excluded by `date_range`.

use crate::config::ConfigError;
use crate::discover::Post;
use crate::frontmatter::FrontMatter;
use serde_json::{Map, Value};
use std::collections::HashSet;

pub const ARCHIVE_TAG: &str = "zArchive";
pub const DEFAULT_MIN_YEAR: i32 = 2025;

/// The predicate a rule applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterKind {
    Archived {
        tag: String,
    },
    Tag {
        tag: String,
    },
    DateRange {
        min_year: Option<i32>,
        max_year: Option<i32>,
    },
}

impl FilterKind {
    /// Config-file spelling of the kind, also the default rule name.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FilterKind::Archived { .. } => "archived",
            FilterKind::Tag { .. } => "tag",
            FilterKind::DateRange { .. } => "date_range",
        }
    }

    pub fn excludes(&self, front_matter: &FrontMatter) -> bool {
        match self {
            FilterKind::Archived { tag } | FilterKind::Tag { tag } => {
                front_matter.tags.contains(tag)
            }
            FilterKind::DateRange { min_year, max_year } => {
                let Some(year) = front_matter.date.year() else {
                    return false;
                };
                min_year.is_some_and(|min| year < min) || max_year.is_some_and(|max| year > max)
            }
        }
    }

    /// Configured values, keyed as in the config file. Unset bounds are
    /// omitted.
    pub fn settings(&self) -> Map<String, Value> {
        let mut settings = Map::new();
        match self {
            FilterKind::Archived { tag } | FilterKind::Tag { tag } => {
                settings.insert("tag".into(), Value::from(tag.as_str()));
            }
            FilterKind::DateRange { min_year, max_year } => {
                if let Some(min) = min_year {
                    settings.insert("min_year".into(), Value::from(*min));
                }
                if let Some(max) = max_year {
                    settings.insert("max_year".into(), Value::from(*max));
                }
            }
        }
        settings
    }
}

/// A named predicate. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    name: String,
    kind: FilterKind,
}

impl FilterRule {
    pub fn new(name: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn archived(tag: impl Into<String>) -> Self {
        Self::new("archived", FilterKind::Archived { tag: tag.into() })
    }

    pub fn tag(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::new(name, FilterKind::Tag { tag: tag.into() })
    }

    pub fn date_range(min_year: Option<i32>, max_year: Option<i32>) -> Self {
        Self::new("date_range", FilterKind::DateRange { min_year, max_year })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FilterKind {
        &self.kind
    }

    /// Whether this rule drops `post` from the scan. Built-in kinds only look
    /// at front matter; the post is passed so every rule sees the same input.
    pub fn evaluate(&self, _post: &Post, front_matter: &FrontMatter) -> bool {
        self.kind.excludes(front_matter)
    }
}

/// Outcome of running a post through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    Keep,
    /// Excluded; carries the name of the first matching rule.
    Exclude(&'a str),
}

impl<'a> Decision<'a> {
    pub fn keep(&self) -> bool {
        matches!(self, Decision::Keep)
    }

    pub fn matched_filter_name(&self) -> Option<&'a str> {
        match *self {
            Decision::Keep => None,
            Decision::Exclude(name) => Some(name),
        }
    }
}

/// Ordered, uniquely named rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    rules: Vec<FilterRule>,
}

impl Pipeline {
    /// Build a pipeline. Rule names must be unique since exclusions are
    /// tallied by name.
    pub fn new(rules: Vec<FilterRule>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate filter name {:?}",
                    rule.name()
                )));
            }
        }
        Ok(Self { rules })
    }

    /// A pipeline that keeps every post.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn apply(&self, post: &Post, front_matter: &FrontMatter) -> Decision<'_> {
        self.rules
            .iter()
            .find(|rule| rule.evaluate(post, front_matter))
            .map_or(Decision::Keep, |rule| Decision::Exclude(rule.name()))
    }
}

/// Archived posts and posts published before [`DEFAULT_MIN_YEAR`] are skipped.
impl Default for Pipeline {
    fn default() -> Self {
        Self {
            rules: vec![
                FilterRule::archived(ARCHIVE_TAG),
                FilterRule::date_range(Some(DEFAULT_MIN_YEAR), None),
            ],
        }
    }
}
