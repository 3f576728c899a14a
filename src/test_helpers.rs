//! Shared test utilities.
//!
//! Builders for on-disk post trees and in-memory posts/front matter, plus the
//! fixture tree under `fixtures/`.
//!
//! ```text
//! fixtures/
//! ├── config.yml
//! └── content/blog/...
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{self, Languages, ScanConfig};
use crate::discover::{CANONICAL_FILE, Post, translation_file_name};
use crate::frontmatter::{FrontMatter, PublishDate, parse_date};
use chrono::{DateTime, TimeZone, Utc};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/` to a temp directory and return it.
///
/// The copy holds `config.yml` and `content/`.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load `config.yml` from a fixture copy.
pub fn fixture_config(fixture_root: &Path) -> ScanConfig {
    config::load_config(&fixture_root.join("config.yml")).unwrap()
}

/// Create `root/rel/index.md` with `front_matter` as its contents, plus an
/// empty `index.{lang}.md` for each of `translations`.
pub fn write_post(root: &Path, rel: &str, front_matter: &str, translations: &[&str]) -> PathBuf {
    let dir = root.join(rel);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(CANONICAL_FILE), front_matter).unwrap();
    for lang in translations {
        fs::write(dir.join(translation_file_name(lang)), "").unwrap();
    }
    dir
}

// =========================================================================
// In-memory values
// =========================================================================

/// `en` default, `https://blog.example.com/` base.
pub fn languages(expected: &[&str]) -> Languages {
    Languages::new("en", expected.iter().copied(), "https://blog.example.com/").unwrap()
}

/// A post that exists only in memory.
pub fn post_with(display_path: &str, translations: &[&str]) -> Post {
    let dir = PathBuf::from(display_path);
    Post {
        canonical_file: dir.join(CANONICAL_FILE),
        translations: translations
            .iter()
            .map(|lang| (lang.to_string(), dir.join(translation_file_name(lang))))
            .collect::<BTreeMap<_, _>>(),
        display_path: display_path.to_string(),
        dir,
    }
}

pub fn post_at(display_path: &str) -> Post {
    post_with(display_path, &[])
}

pub fn tagged(tags: &[&str]) -> FrontMatter {
    FrontMatter {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..FrontMatter::default()
    }
}

/// Front matter with a `date` in any format [`parse_date`] accepts.
pub fn dated(date: &str) -> FrontMatter {
    FrontMatter {
        date: PublishDate::Known(parse_date(date).unwrap()),
        ..FrontMatter::default()
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 6, 10, 0, 0).unwrap()
}
