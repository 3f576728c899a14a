//! Post discovery.
//!
//! Walks the content tree and yields one [`Post`] for every directory that
//! holds a canonical `index.md`, at any depth:
//!
//! ```text
//! content/
//! ├── blog/
//! │   ├── 2025/
//! │   │   └── release-notes/       # Post
//! │   │       ├── index.md         # canonical (default language)
//! │   │       ├── index.de.md      # translation: de
//! │   │       └── index.fr.md      # translation: fr
//! │   └── drafts/                  # no index.md → not a post
//! └── .git/                        # hidden → never entered
//! ```
//!
//! Entries are visited sorted by file name, so the post order (and with it
//! the report) is identical across runs over an unchanged tree.

use crate::config::ConfigError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, FilterEntry, WalkDir};

pub const CANONICAL_FILE: &str = "index.md";
const CANONICAL_STEM: &str = "index";
const EXTENSION: &str = "md";

/// One localized content item.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub dir: PathBuf,
    /// Path shown in reports: the post directory relative to the content
    /// root's parent, e.g. `content/blog/2025/release-notes`.
    pub display_path: String,
    pub canonical_file: PathBuf,
    /// Translation files keyed by language code.
    pub translations: BTreeMap<String, PathBuf>,
}

impl Post {
    pub fn has_translation(&self, language: &str) -> bool {
        self.translations.contains_key(language)
    }
}

/// Name of the translation file for `language`: `index.{language}.md`.
pub fn translation_file_name(language: &str) -> String {
    format!("{CANONICAL_STEM}.{language}.{EXTENSION}")
}

/// Language code embedded in a translation file name, if it is one.
///
/// - `index.de.md` → `Some("de")`
/// - `index.md` → `None`
/// - `index.de.bak.md` → `None`
fn translation_language(file_name: &str) -> Option<&str> {
    let code = file_name
        .strip_prefix(CANONICAL_STEM)?
        .strip_prefix('.')?
        .strip_suffix(EXTENSION)?
        .strip_suffix('.')?;
    (!code.is_empty() && !code.contains('.')).then_some(code)
}

type VisibleEntries = FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>;

/// Lazy, single-pass sequence of posts under a content root.
pub struct Discovery {
    root: PathBuf,
    walker: VisibleEntries,
}

/// Start discovering posts under `root`.
///
/// The root must be a readable directory; anything else is a
/// [`ConfigError::ContentRoot`]. Problems deeper in the tree are logged and
/// skipped.
pub fn discover(root: &Path) -> Result<Discovery, ConfigError> {
    let unusable = |reason: String| ConfigError::ContentRoot {
        path: root.to_path_buf(),
        reason,
    };
    let metadata = fs::metadata(root).map_err(|e| unusable(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(unusable("not a directory".into()));
    }
    fs::read_dir(root).map_err(|e| unusable(e.to_string()))?;

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(is_visible as fn(&DirEntry) -> bool);

    Ok(Discovery {
        root: root.to_path_buf(),
        walker,
    })
}

/// Skip hidden entries below the root. The root itself is always entered,
/// even when its own name starts with a dot.
fn is_visible(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
}

impl Discovery {
    fn read_post(&self, dir: &Path) -> Option<Post> {
        let canonical_file = dir.join(CANONICAL_FILE);
        if !canonical_file.is_file() {
            return None;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot list post directory, skipping");
                return None;
            }
        };

        let mut translations = BTreeMap::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(code) = translation_language(&name.to_string_lossy()) {
                translations.insert(code.to_string(), path);
            }
        }

        let post = Post {
            dir: dir.to_path_buf(),
            display_path: display_path(&self.root, dir),
            canonical_file,
            translations,
        };
        debug!(
            post = %post.display_path,
            translations = post.translations.len(),
            "discovered post"
        );
        Some(post)
    }
}

impl Iterator for Discovery {
    type Item = Post;

    fn next(&mut self) -> Option<Post> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Some(post) = self.read_post(entry.path()) {
                return Some(post);
            }
        }
    }
}

/// `dir` relative to the parent of `root`, with `/` separators.
fn display_path(root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).unwrap_or(dir);
    let labeled = match root.file_name() {
        Some(name) if rel.as_os_str().is_empty() => PathBuf::from(name),
        Some(name) => Path::new(name).join(rel),
        None => rel.to_path_buf(),
    };
    labeled
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{setup_fixtures, write_post};
    use tempfile::TempDir;

    fn paths(root: &Path) -> Vec<String> {
        discover(root).unwrap().map(|p| p.display_path).collect()
    }

    #[test]
    fn translation_language_parsing() {
        assert_eq!(translation_language("index.de.md"), Some("de"));
        assert_eq!(translation_language("index.zh-hant.md"), Some("zh-hant"));
        assert_eq!(translation_language("index.md"), None);
        assert_eq!(translation_language("index..md"), None);
        assert_eq!(translation_language("index.de.bak.md"), None);
        assert_eq!(translation_language("other.de.md"), None);
        assert_eq!(translation_language("index.de.txt"), None);
    }

    #[test]
    fn translation_file_name_matches_parser() {
        let name = translation_file_name("pt-br");
        assert_eq!(name, "index.pt-br.md");
        assert_eq!(translation_language(&name), Some("pt-br"));
    }

    #[test]
    fn finds_posts_at_any_depth_in_sorted_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("content");
        write_post(&root, "zeta", "", &[]);
        write_post(&root, "blog/2025/b-post", "", &[]);
        write_post(&root, "blog/2025/a-post", "", &[]);
        write_post(&root, "alpha/deep/er/still", "", &[]);
        fs::create_dir_all(root.join("blog/empty")).unwrap();

        assert_eq!(
            paths(&root),
            vec![
                "content/alpha/deep/er/still",
                "content/blog/2025/a-post",
                "content/blog/2025/b-post",
                "content/zeta",
            ]
        );
    }

    #[test]
    fn records_translations_by_code() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("content");
        write_post(&root, "post", "", &["fr", "de"]);
        fs::write(root.join("post/index.de.md.orig"), "").unwrap();
        fs::write(root.join("post/notes.ar.md"), "").unwrap();

        let post = discover(&root).unwrap().next().unwrap();
        let codes: Vec<&str> = post.translations.keys().map(String::as_str).collect();
        assert_eq!(codes, vec!["de", "fr"]);
        assert!(post.has_translation("fr"));
        assert!(!post.has_translation("ar"));
        assert_eq!(post.canonical_file, root.join("post/index.md"));
    }

    #[test]
    fn translation_directory_is_not_counted() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("content");
        write_post(&root, "post", "", &[]);
        fs::create_dir_all(root.join("post/index.de.md")).unwrap();

        let post = discover(&root).unwrap().next().unwrap();
        assert!(post.translations.is_empty());
    }

    #[test]
    fn hidden_directories_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("content");
        write_post(&root, ".drafts/secret", "", &[]);
        write_post(&root, "visible", "", &[]);

        assert_eq!(paths(&root), vec!["content/visible"]);
    }

    #[test]
    fn root_with_index_is_a_post() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("content");
        write_post(&root, "", "", &["de"]);

        assert_eq!(paths(&root), vec!["content"]);
    }

    #[test]
    fn hidden_root_is_still_walked() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join(".content");
        write_post(&root, "post", "", &[]);

        assert_eq!(paths(&root), vec![".content/post"]);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(discover(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = discover(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ConfigError::ContentRoot { .. })));
    }

    #[test]
    fn file_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("content");
        fs::write(&file, "not a dir").unwrap();
        assert!(matches!(
            discover(&file),
            Err(ConfigError::ContentRoot { .. })
        ));
    }

    #[test]
    fn fixtures_discovered_in_path_order() {
        let tmp = setup_fixtures();
        let root = tmp.path().join("content");
        assert_eq!(
            paths(&root),
            vec![
                "content/blog/2024/old-post",
                "content/blog/2025/bad-date",
                "content/blog/2025/complete-post",
                "content/blog/2025/no-front-matter",
                "content/blog/2025/partial-post",
                "content/blog/2025/untranslated",
                "content/blog/archive/archived-post",
            ]
        );
    }
}
