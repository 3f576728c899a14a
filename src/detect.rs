//! Completeness detection.
//!
//! For a post that survived filtering, compares the translations on disk
//! with the expected languages. The missing list keeps the configured
//! language order, not file-system or alphabetical order.
//!
//! Every finding also carries the post URL in each language:
//!
//! ```text
//! default:  {scheme}://{host}{path}
//! other:    {scheme}://{host}/{lang}{path}
//! ```
//!
//! where `{path}` is the front-matter `url` with any scheme and host of its
//! own stripped. URLs are built for all expected languages, missing or not.

use crate::config::Languages;
use crate::discover::Post;
use crate::frontmatter::FrontMatter;
use serde::ser::{Serialize, SerializeMap, Serializer};
use url::{Position, Url};

/// Language code → URL, in report order (default first, then the
/// expected languages as configured). Serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageUrls(Vec<(String, String)>);

impl LanguageUrls {
    pub fn get(&self, language: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(code, _)| code == language)
            .map(|(_, url)| url.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(code, url)| (code.as_str(), url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for LanguageUrls {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, url) in &self.0 {
            map.serialize_entry(code, url)?;
        }
        map.end()
    }
}

/// A post lacking one or more expected translations.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MissingLanguageFinding {
    pub path: String,
    /// Default-language URL; `None` when the post has no `url` front matter.
    pub url: Option<String>,
    pub urls: LanguageUrls,
    pub missing_languages: Vec<String>,
    pub missing_count: usize,
    pub total_expected: usize,
}

/// Returns `None` when every expected translation exists.
pub fn detect(
    post: &Post,
    front_matter: &FrontMatter,
    languages: &Languages,
) -> Option<MissingLanguageFinding> {
    let missing: Vec<String> = languages
        .expected()
        .iter()
        .filter(|code| !post.has_translation(code))
        .cloned()
        .collect();
    if missing.is_empty() {
        return None;
    }

    let urls = front_matter
        .url
        .as_deref()
        .map(|raw| language_urls(languages, &url_path(raw)))
        .unwrap_or_default();

    Some(MissingLanguageFinding {
        path: post.display_path.clone(),
        url: urls.get(languages.default_language()).map(String::from),
        urls,
        missing_count: missing.len(),
        missing_languages: missing,
        total_expected: languages.expected().len(),
    })
}

fn language_urls(languages: &Languages, path: &str) -> LanguageUrls {
    let default = languages.default_language();
    let mut urls = vec![(default.to_string(), localized_url(languages, default, path))];
    urls.extend(
        languages
            .expected()
            .iter()
            .map(|code| (code.clone(), localized_url(languages, code, path))),
    );
    LanguageUrls(urls)
}

/// URL of `path` in `language`. `path` must start with `/`.
pub fn localized_url(languages: &Languages, language: &str, path: &str) -> String {
    if language == languages.default_language() {
        format!("{}{}", languages.origin(), path)
    } else {
        format!("{}/{}{}", languages.origin(), language, path)
    }
}

/// The site-relative part of a front-matter `url`, always starting with `/`.
fn url_path(raw: &str) -> String {
    if let Ok(absolute) = Url::parse(raw)
        && absolute.has_host()
    {
        return absolute[Position::BeforePath..].to_string();
    }
    if raw.starts_with('/') {
        raw.to_string()
    } else {
        format!("/{raw}")
    }
}
