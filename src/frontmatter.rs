//! Front-matter extraction.
//!
//! Reads the YAML block at the head of a post file:
//!
//! ```text
//! ---
//! title: Release notes
//! url: /2025/01/06/release-notes/
//! date: Mon, 06 Jan 2025 10:00:00 +0000
//! tags: [Release, zArchive]
//! ---
//! ```
//!
//! Only `url`, `tags`, and `date` are kept. Extraction never fails: a missing
//! or broken block produces an empty [`FrontMatter`] plus a [`ScanWarning`],
//! so one bad post cannot stop the rest of the corpus from being reported.
//!
//! ## Dates
//!
//! Accepted `date` formats, tried in order:
//!
//! - RFC 2822: `Mon, 06 Jan 2025 10:00:00 +0000`
//! - RFC 3339: `2025-01-06T10:00:00Z`
//! - `2025-01-06 10:00:00` (UTC)
//! - `2025-01-06` (UTC midnight)
//!
//! Anything else becomes [`PublishDate::Unparsed`].

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DELIMITER: &str = "---";

/// A per-post anomaly that was recovered from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanWarning {
    #[error("{}: front matter {reason}", path.display())]
    FrontMatter { path: PathBuf, reason: String },
    #[error("{}: unrecognized date {raw:?}, publish year treated as unknown", path.display())]
    Date { path: PathBuf, raw: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PublishDate {
    Known(DateTime<FixedOffset>),
    /// A `date` value was present but in no recognized format.
    Unparsed(String),
    #[default]
    Missing,
}

impl PublishDate {
    pub fn year(&self) -> Option<i32> {
        match self {
            PublishDate::Known(date) => Some(date.year()),
            PublishDate::Unparsed(_) | PublishDate::Missing => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    /// Site-relative (or absolute) URL of the canonical post.
    pub url: Option<String>,
    pub tags: BTreeSet<String>,
    pub date: PublishDate,
}

/// Front matter together with whatever went wrong reading it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub front_matter: FrontMatter,
    pub warnings: Vec<ScanWarning>,
}

impl Extraction {
    fn degraded(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            front_matter: FrontMatter::default(),
            warnings: vec![ScanWarning::FrontMatter {
                path: path.to_path_buf(),
                reason: reason.into(),
            }],
        }
    }
}

/// Read and parse the front matter of the file at `path`.
pub fn extract(path: &Path) -> Extraction {
    match fs::read_to_string(path) {
        Ok(text) => parse(path, &text),
        Err(e) => Extraction::degraded(path, format!("could not be read: {e}")),
    }
}

/// Parse front matter from file contents. `path` is only used for warnings.
pub fn parse(path: &Path, text: &str) -> Extraction {
    let block = match split_block(text) {
        Ok(block) => block,
        Err(reason) => return Extraction::degraded(path, reason),
    };

    let parsed = if block.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_yaml::from_str::<Value>(block)
    };
    let mapping = match parsed {
        Ok(Value::Mapping(mapping)) => mapping,
        Ok(Value::Null) => Mapping::new(),
        Ok(_) => return Extraction::degraded(path, "is not a key/value mapping"),
        Err(e) => return Extraction::degraded(path, format!("is not valid YAML: {e}")),
    };

    let mut warnings = Vec::new();
    let date = match mapping.get("date") {
        None | Some(Value::Null) => PublishDate::Missing,
        Some(value) => {
            let raw = scalar_text(value);
            match raw.as_deref().and_then(parse_date) {
                Some(date) => PublishDate::Known(date),
                None => {
                    let raw = raw.unwrap_or_else(|| format!("{value:?}"));
                    warnings.push(ScanWarning::Date {
                        path: path.to_path_buf(),
                        raw: raw.clone(),
                    });
                    PublishDate::Unparsed(raw)
                }
            }
        }
    };

    let front_matter = FrontMatter {
        url: mapping
            .get("url")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from),
        tags: mapping.get("tags").map(tag_set).unwrap_or_default(),
        date,
    };

    Extraction {
        front_matter,
        warnings,
    }
}

/// Locate the text between the opening and closing `---` lines.
fn split_block(text: &str) -> Result<&str, &'static str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');

    let first = lines.next().ok_or("block is missing")?;
    if first.trim_end() != DELIMITER {
        return Err("block is missing");
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Ok(&text[start..offset]);
        }
        offset += line.len();
    }
    Err("block is not terminated")
}

/// A single tag or a list of tags. Non-string list items are dropped.
fn tag_set(value: &Value) -> BTreeSet<String> {
    match value {
        Value::String(tag) => BTreeSet::from([tag.clone()]),
        Value::Sequence(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => BTreeSet::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.and_utc().fixed_offset())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().fixed_offset())
        })
}
