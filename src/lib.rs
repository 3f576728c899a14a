//! # translation-scan
//!
//! Audits a localized content tree for posts that are missing translations.
//! Each post is a directory with a canonical `index.md`; every translation is
//! a sibling `index.{lang}.md`. Posts are filtered by declarative rules
//! (archived tag, publish-year window, arbitrary tags), the survivors are
//! compared against the configured language list, and the result is reported
//! as console text and, optionally, JSON.
//!
//! # Pipeline
//!
//! ```text
//! discover   content/      →  Post*            (walk the tree, find index.md)
//! extract    index.md      →  FrontMatter      (url, tags, date)
//! filter     Post + FM     →  Keep | Exclude   (first matching rule credited)
//! detect     Post + FM     →  Finding?         (missing languages + URLs)
//! report     findings      →  text + JSON
//! ```
//!
//! A scan is a single synchronous pass. It only reads the content tree and
//! keeps no state between runs, so two scans over the same tree are safe to
//! run side by side and produce the same report apart from its timestamp.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Config file loading and validation (languages, base URL, filters) |
//! | [`discover`] | Deterministic content-tree walk producing [`discover::Post`]s |
//! | [`frontmatter`] | YAML front-matter parsing with graceful degradation |
//! | [`filter`] | Exclusion rules and the ordered [`filter::Pipeline`] |
//! | [`detect`] | Missing-language detection and localized URL construction |
//! | [`scan`] | Runs the stages above over a tree |
//! | [`report`] | Summary aggregation and JSON rendering |
//! | [`output`] | Console text rendering |
//!
//! # Error Policy
//!
//! Only an unusable config file or content root is fatal
//! ([`config::ConfigError`]). Anything wrong with an individual post becomes
//! a [`frontmatter::ScanWarning`] and the post is still reported.

pub mod config;
pub mod detect;
pub mod discover;
pub mod filter;
pub mod frontmatter;
pub mod output;
pub mod report;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
