//! Console text rendering of a [`Report`].
//!
//! # Output Format
//!
//! ```text
//! ================================================================================
//! TRANSLATION SCAN REPORT
//! ================================================================================
//!
//! SUMMARY
//! --------------------------------------------------------------------------------
//! Date generated: 2026-01-06 10:00:00 UTC
//! Base URL: https://blog.example.com/
//! Posts discovered: 7
//! Posts scanned: 5
//! Applied filters:
//!   - archived (tag=zArchive)
//!   - date_range (min_year=2025)
//! Posts excluded by filter:
//!   archived: 1
//!   date_range: 1
//! Posts with missing translations: 4
//! Posts with complete translations: 1
//! Missing by language:
//!   ar: 3
//!   de: 2
//!   fr: 4
//! Expected languages: 3 (ar, de, fr)
//!
//! POSTS NEEDING ATTENTION
//! --------------------------------------------------------------------------------
//!
//! Post: content/blog/2025/partial-post
//!   URL: https://blog.example.com/2025/partial-post/
//!   Missing translations: ar, fr
//!   Missing count: 2/3
//!
//! ================================================================================
//! ```
//!
//! When nothing is missing the attention section is replaced by a single
//! "all complete" line.
//!
//! # Architecture
//!
//! [`format_text_report`] is pure and returns lines for testability;
//! [`print_text_report`] writes them to stdout.

use crate::report::{AppliedFilter, Report};
use serde_json::Value;

const WIDTH: usize = 80;

fn rule(c: char) -> String {
    c.to_string().repeat(WIDTH)
}

/// `tag=zArchive`, `min_year=2025, max_year=2026`
fn filter_settings(filter: &AppliedFilter) -> String {
    filter
        .config
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{key}={s}"),
            other => format!("{key}={other}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_text_report(report: &Report) -> Vec<String> {
    let summary = &report.summary;
    let mut lines = vec![
        rule('='),
        "TRANSLATION SCAN REPORT".to_string(),
        rule('='),
        String::new(),
        "SUMMARY".to_string(),
        rule('-'),
        format!(
            "Date generated: {}",
            summary.date_generated.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        format!("Base URL: {}", summary.base_url),
        format!("Posts discovered: {}", summary.total_posts_discovered),
        format!("Posts scanned: {}", summary.total_posts_scanned),
    ];

    if summary.filters_applied.is_empty() {
        lines.push("Applied filters: none".to_string());
    } else {
        lines.push("Applied filters:".to_string());
        for filter in &summary.filters_applied {
            let settings = filter_settings(filter);
            if settings.is_empty() {
                lines.push(format!("  - {}", filter.name));
            } else {
                lines.push(format!("  - {} ({})", filter.name, settings));
            }
        }
        lines.push("Posts excluded by filter:".to_string());
        for (name, count) in &summary.filters_counts {
            lines.push(format!("  {name}: {count}"));
        }
    }

    lines.push(format!(
        "Posts with missing translations: {}",
        summary.posts_with_missing_translations
    ));
    lines.push(format!(
        "Posts with complete translations: {}",
        summary.posts_complete
    ));
    lines.push("Missing by language:".to_string());
    for (code, count) in summary.missing_by_language.iter() {
        lines.push(format!("  {code}: {count}"));
    }
    lines.push(format!(
        "Expected languages: {} ({})",
        summary.total_expected_languages,
        summary.expected_languages.join(", ")
    ));
    lines.push(String::new());

    if report.posts.is_empty() {
        lines.push("All scanned posts have complete translations.".to_string());
    } else {
        lines.push("POSTS NEEDING ATTENTION".to_string());
        lines.push(rule('-'));
        for post in &report.posts {
            lines.push(String::new());
            lines.push(format!("Post: {}", post.path));
            lines.push(format!(
                "  URL: {}",
                post.url.as_deref().unwrap_or("(no url in front matter)")
            ));
            lines.push(format!(
                "  Missing translations: {}",
                post.missing_languages.join(", ")
            ));
            lines.push(format!(
                "  Missing count: {}/{}",
                post.missing_count, post.total_expected
            ));
        }
    }

    lines.push(String::new());
    lines.push(rule('='));
    lines
}

pub fn print_text_report(report: &Report) {
    for line in format_text_report(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use crate::filter::Pipeline;
    use crate::report::{self, Report};
    use crate::scan::{ScanOutcome, scan};
    use crate::test_helpers::{fixed_time, fixture_config, languages, setup_fixtures};
    use chrono::{TimeZone, Utc};

    fn fixture_report() -> Report {
        let tmp = setup_fixtures();
        let config = fixture_config(tmp.path());
        let outcome = scan(&tmp.path().join("content"), &config).unwrap();
        Report::build(outcome, &config, fixed_time())
    }

    /// Value of a `Label: value` summary line.
    fn summary_value<'a>(lines: &'a [String], label: &str) -> &'a str {
        let prefix = format!("{label}: ");
        lines
            .iter()
            .find_map(|l| l.strip_prefix(&prefix))
            .unwrap_or_else(|| panic!("no summary line {label:?}"))
    }

    fn has_line(lines: &[String], line: &str) -> bool {
        lines.iter().any(|l| l == line)
    }

    #[test]
    fn summary_section() {
        let lines = format_text_report(&fixture_report());
        assert_eq!(lines[1], "TRANSLATION SCAN REPORT");
        assert_eq!(
            summary_value(&lines, "Date generated"),
            "2026-01-06 10:00:00 UTC"
        );
        assert_eq!(summary_value(&lines, "Posts discovered"), "7");
        assert_eq!(summary_value(&lines, "Posts scanned"), "5");
        assert_eq!(
            summary_value(&lines, "Posts with missing translations"),
            "4"
        );
        assert_eq!(
            summary_value(&lines, "Posts with complete translations"),
            "1"
        );
        assert_eq!(
            summary_value(&lines, "Expected languages"),
            "3 (ar, de, fr)"
        );
        assert!(has_line(&lines, "  - archived (tag=zArchive)"));
        assert!(has_line(&lines, "  - date_range (min_year=2025)"));
        assert!(has_line(&lines, "  archived: 1"));
        assert!(has_line(&lines, "  fr: 4"));
    }

    #[test]
    fn attention_section_lists_findings_in_order() {
        let lines = format_text_report(&fixture_report());
        let posts: Vec<&str> = lines
            .iter()
            .filter_map(|l| l.strip_prefix("Post: "))
            .collect();
        assert_eq!(
            posts,
            vec![
                "content/blog/2025/bad-date",
                "content/blog/2025/no-front-matter",
                "content/blog/2025/partial-post",
                "content/blog/2025/untranslated",
            ]
        );
        assert!(has_line(&lines, "  URL: (no url in front matter)"));
        let partial_url = "  URL: https://blog.example.com/2025/partial-post/";
        assert!(has_line(&lines, partial_url));
        assert!(has_line(&lines, "  Missing count: 2/3"));
    }

    #[test]
    fn text_summary_recoverable_from_json() {
        let report = fixture_report();
        let lines = format_text_report(&report);
        let text = report::to_json(&report).unwrap();
        let json: Value = serde_json::from_str(&text).unwrap();
        let summary = &json["summary"];

        let pairs = [
            ("Posts discovered", "total_posts_discovered"),
            ("Posts scanned", "total_posts_scanned"),
            ("Posts with missing translations", "posts_with_missing_translations"),
            ("Posts with complete translations", "posts_complete"),
        ];
        for (label, key) in pairs {
            assert_eq!(
                summary_value(&lines, label),
                summary[key].to_string(), "{label}"
            );
        }
        assert_eq!(summary_value(&lines, "Base URL"), summary["base_url"]);
        for (name, count) in summary["filters_counts"].as_object().unwrap() {
            assert!(lines.contains(&format!("  {name}: {count}")));
        }
        for (code, count) in summary["missing_by_language"].as_object().unwrap() {
            assert!(lines.contains(&format!("  {code}: {count}")));
        }
        let codes: Vec<&str> = summary["expected_languages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            summary_value(&lines, "Expected languages"),
            format!(
                "{} ({})",
                summary["total_expected_languages"],
                codes.join(", ")
            )
        );
    }

    #[test]
    fn empty_report_is_well_formed() {
        let config = ScanConfig {
            languages: languages(&["de", "fr"]),
            pipeline: Pipeline::empty(),
        };
        let report = Report::build(ScanOutcome::default(), &config, fixed_time());
        let lines = format_text_report(&report);

        assert_eq!(summary_value(&lines, "Posts scanned"), "0");
        assert_eq!(
            summary_value(&lines, "Posts with complete translations"),
            "0"
        );
        assert_eq!(summary_value(&lines, "Applied filters"), "none");
        let complete = "All scanned posts have complete translations.";
        assert!(has_line(&lines, complete));
        assert!(!lines.iter().any(|l| l == "POSTS NEEDING ATTENTION"));
        assert_eq!(lines.last().unwrap(), &"=".repeat(80));
    }

    #[test]
    fn text_identical_apart_from_timestamp() {
        let tmp = setup_fixtures();
        let config = fixture_config(tmp.path());
        let root = tmp.path().join("content");
        let early = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 6, 1, 12, 30, 0).unwrap();

        let first_report = Report::build(scan(&root, &config).unwrap(), &config, early);
        let second_report = Report::build(scan(&root, &config).unwrap(), &config, late);
        let first = format_text_report(&first_report);
        let second = format_text_report(&second_report);

        assert_eq!(first.len(), second.len());
        let differing: Vec<&String> = first
            .iter()
            .zip(&second)
            .filter(|(a, b)| a != b)
            .map(|(a, _)| a)
            .collect();
        assert_eq!(differing.len(), 1);
        assert!(differing[0].starts_with("Date generated: "));
    }

    #[test]
    fn date_range_settings_listed_together() {
        let filter = AppliedFilter {
            name: "window".into(),
            config: crate::filter::FilterKind::DateRange {
                min_year: Some(2024),
                max_year: Some(2026),
            }
            .settings(),
        };
        assert_eq!(filter_settings(&filter), "max_year=2026, min_year=2024");
    }
}
