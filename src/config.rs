//! Scan configuration.
//!
//! Loads the expected-language list, base URL, and filter pipeline from a
//! single config file. The format is chosen by extension: `.toml` files are
//! parsed as TOML, everything else as YAML. A Hugo `config.yml` works as-is:
//!
//! ```yaml
//! baseURL: https://blog.example.com/
//! defaultContentLanguage: en
//! languages:
//!   en: { languageName: English }
//!   ar: { languageName: العربية }
//!   de: { languageName: Deutsch }
//! ```
//!
//! ## Keys
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `baseURL` / `base_url` | Site base URL (required, absolute) |
//! | `defaultContentLanguage` / `default_language` | Language of `index.md` (default `en`) |
//! | `expected_languages` | Explicit ordered list; wins over `languages` |
//! | `languages` | Language table; keys in document order become the expected list |
//! | `filters` | Filter declarations (see below); omit for the default pipeline |
//!
//! Unknown top-level keys are ignored so a full site config can be reused.
//! Filter declarations are strict, unknown keys there are rejected:
//!
//! ```yaml
//! filters:
//!   - kind: archived        # tag defaults to zArchive
//!   - kind: date_range
//!     min_year: 2025
//!   - kind: tag
//!     name: drafts
//!     tag: draft
//!     enabled: false
//! ```

use crate::filter::{FilterKind, FilterRule, Pipeline};
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("content root {} is not usable: {reason}", path.display())]
    ContentRoot { path: PathBuf, reason: String },
}

pub const DEFAULT_LANGUAGE: &str = "en";

/// Fully validated configuration for one scan run.
///
/// Built once, then only borrowed. Nothing in a scan mutates it.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub languages: Languages,
    pub pipeline: Pipeline,
}

/// The language side of the configuration: which code `index.md` is written
/// in, which codes every post must be translated into, and where the site
/// lives.
#[derive(Debug, Clone, PartialEq)]
pub struct Languages {
    default: String,
    expected: Vec<String>,
    base_url: Url,
    origin: String,
}

impl Languages {
    /// Build the language set, deduplicating `expected` (first occurrence
    /// wins) and dropping the default language from it.
    pub fn new(
        default: impl Into<String>,
        expected: impl IntoIterator<Item = impl Into<String>>,
        base_url: &str,
    ) -> Result<Self, ConfigError> {
        let default = default.into().trim().to_string();
        validate_code(&default)?;

        let mut codes: Vec<String> = Vec::new();
        for code in expected {
            let code = code.into().trim().to_string();
            validate_code(&code)?;
            if code != default && !codes.contains(&code) {
                codes.push(code);
            }
        }
        if codes.is_empty() {
            return Err(ConfigError::Validation(
                "no expected languages configured besides the default".into(),
            ));
        }

        let base_url = Url::parse(base_url.trim()).map_err(|e| {
            ConfigError::Validation(format!("base URL {base_url:?} is invalid: {e}"))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") || !base_url.has_host() {
            return Err(ConfigError::Validation(format!(
                "base URL {base_url} must be an absolute http(s) URL"
            )));
        }
        let origin = base_url.origin().ascii_serialization();

        Ok(Self {
            default,
            expected: codes,
            base_url,
            origin,
        })
    }

    /// Code of the canonical (untranslated) file.
    pub fn default_language(&self) -> &str {
        &self.default
    }

    /// Expected translation codes in configured order.
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `scheme://host[:port]` of the base URL, without trailing slash.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

fn validate_code(code: &str) -> Result<(), ConfigError> {
    let valid = !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "invalid language code {code:?}"
        )))
    }
}

// =============================================================================
// Raw file shape
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    #[serde(alias = "baseURL", alias = "baseurl", alias = "baseUrl")]
    base_url: Option<String>,
    #[serde(alias = "defaultContentLanguage", alias = "defaultcontentlanguage")]
    default_language: Option<String>,
    expected_languages: Option<Vec<String>>,
    #[serde(deserialize_with = "language_codes")]
    languages: Vec<String>,
    filters: Option<Vec<FilterSpec>>,
}

/// Accept either a language table (keys taken in document order) or a plain
/// list of codes.
fn language_codes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct CodesVisitor;

    impl<'de> Visitor<'de> for CodesVisitor {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a table keyed by language code or a list of codes")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut codes = Vec::new();
            while let Some((code, _)) = map.next_entry::<String, IgnoredAny>()? {
                codes.push(code);
            }
            Ok(codes)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut codes = Vec::new();
            while let Some(code) = seq.next_element::<String>()? {
                codes.push(code);
            }
            Ok(codes)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(CodesVisitor)
}

fn default_true() -> bool {
    true
}

/// One filter declaration as written in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
enum FilterSpec {
    Archived {
        name: Option<String>,
        #[serde(default = "default_true")]
        enabled: bool,
        tag: Option<String>,
    },
    Tag {
        name: Option<String>,
        #[serde(default = "default_true")]
        enabled: bool,
        tag: Option<String>,
    },
    DateRange {
        name: Option<String>,
        #[serde(default = "default_true")]
        enabled: bool,
        min_year: Option<i32>,
        max_year: Option<i32>,
    },
}

impl FilterSpec {
    /// Turn the declaration into a rule. Disabled declarations yield `None`.
    fn into_rule(self) -> Result<Option<FilterRule>, ConfigError> {
        let (name, enabled, kind) = match self {
            FilterSpec::Archived { name, enabled, tag } => (
                name,
                enabled,
                FilterKind::Archived {
                    tag: tag.unwrap_or_else(|| crate::filter::ARCHIVE_TAG.to_string()),
                },
            ),
            FilterSpec::Tag { name, enabled, tag } => {
                let tag = tag.filter(|t| !t.is_empty()).ok_or_else(|| {
                    ConfigError::Validation("tag filter requires a non-empty `tag`".into())
                })?;
                (name, enabled, FilterKind::Tag { tag })
            }
            FilterSpec::DateRange {
                name,
                enabled,
                min_year,
                max_year,
            } => {
                if min_year.is_none() && max_year.is_none() {
                    return Err(ConfigError::Validation(
                        "date_range filter requires `min_year` and/or `max_year`".into(),
                    ));
                }
                if let (Some(min), Some(max)) = (min_year, max_year)
                    && min > max
                {
                    return Err(ConfigError::Validation(format!(
                        "date_range min_year {min} is after max_year {max}"
                    )));
                }
                (name, enabled, FilterKind::DateRange { min_year, max_year })
            }
        };
        if !enabled {
            return Ok(None);
        }
        let name = name.unwrap_or_else(|| kind.kind_name().to_string());
        Ok(Some(FilterRule::new(name, kind)))
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Which parser a config file goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Parse and validate config text.
pub fn parse_config(text: &str, format: ConfigFormat) -> Result<ScanConfig, ConfigError> {
    let raw: RawConfig = match format {
        ConfigFormat::Yaml if text.trim().is_empty() => RawConfig::default(),
        ConfigFormat::Yaml => serde_yaml::from_str::<Option<RawConfig>>(text)?.unwrap_or_default(),
        ConfigFormat::Toml => toml::from_str(text)?,
    };

    let base_url = raw
        .base_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ConfigError::Validation("`baseURL` is required".into()))?;
    let default = raw
        .default_language
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let expected = raw.expected_languages.unwrap_or(raw.languages);
    let languages = Languages::new(default, expected, &base_url)?;

    let pipeline = match raw.filters {
        None => Pipeline::default(),
        Some(specs) => {
            let mut rules = Vec::new();
            for spec in specs {
                if let Some(rule) = spec.into_rule()? {
                    rules.push(rule);
                }
            }
            Pipeline::new(rules)?
        }
    };

    Ok(ScanConfig {
        languages,
        pipeline,
    })
}

/// Load the config file at `path`.
///
/// A missing or unreadable file, invalid syntax, or values that fail
/// validation are all reported as [`ConfigError`]; none of them are
/// recoverable for the run.
pub fn load_config(path: &Path) -> Result<ScanConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text, ConfigFormat::from_path(path))?;
    debug!(
        config = %path.display(),
        expected = config.languages.expected().len(),
        filters = config.pipeline.rules().len(),
        "loaded config"
    );
    Ok(config)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_yaml() -> &'static str {
    r##"# translation-scan configuration
# ==============================
# A Hugo config.yml can be used directly: only the keys below are read,
# everything else is ignored.

# Base URL of the published site. Localized URLs are built as
#   {scheme}://{host}/{lang}/{path}
baseURL: https://blog.example.com/

# Language of the canonical index.md file.
defaultContentLanguage: en

# Every post should have an index.{lang}.md for each of these codes.
# Keys are read in order; the default language is skipped.
languages:
  en: {}
  ar: {}
  de: {}
  fr: {}

# Alternatively, list the codes directly (takes precedence over `languages`):
# expected_languages: [ar, de, fr]

# ---------------------------------------------------------------------------
# Filters
# ---------------------------------------------------------------------------
# Posts matching any filter are left out of the scan. When several filters
# match, the first one listed gets the credit in the report.
# Omit this section to get the two filters shown here.
filters:
  # Skip posts tagged as archived.
  - kind: archived
    tag: zArchive

  # Skip posts published before 2025. Posts without a readable date are kept.
  - kind: date_range
    min_year: 2025
    # max_year: 2026

  # Skip posts carrying an arbitrary tag.
  # - kind: tag
  #   name: drafts
  #   tag: draft
"##
}
