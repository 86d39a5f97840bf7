//! Heuristic parser for daily news digests.
//!
//! A digest is a loosely structured markdown file, one per calendar date.
//! Parsing is line oriented: a section classifier driven by `##` headings,
//! then two bullet shapes tried in priority order. Lines that match neither
//! shape are skipped without error.

pub mod import;

use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::NaiveDate;
use modelhub_core::{slugify, NewsCategory, NewsItem};
use regex::Regex;

/// How many leading items per general section get the `top` category.
pub const TOP_ITEM_COUNT: usize = 3;

/// `- **Title** ([SourceName](URL)) _optional-date_`
fn bold_bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^-\s+\*\*(?P<title>.+?)\*\*\s+\(\[(?P<source>[^\]]+)\]\((?P<url>[^)]+)\)\)(?:\s+_(?P<date>[^_]+)_)?\s*$",
        )
        .unwrap()
    })
}

/// `- [Title](URL) _optional-date_ — optional-summary`
fn link_bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^-\s+\[(?P<title>[^\]]+)\]\((?P<url>[^)]+)\)(?:\s+_(?P<date>[^_]+)_)?(?:\s+[—–-]\s+(?P<summary>.+))?\s*$",
        )
        .unwrap()
    })
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<hashes>#+)\s*(?P<text>.*)$").unwrap())
}

/// Boilerplate nav-link text that is never a news item.
const JUNK_TITLES: &[&str] = &[
    "read more",
    "comments",
    "share",
    "subscribe",
    "sign up",
    "view all",
    "advertisement",
];

/// Known non-article URL fragments.
const JUNK_URL_FRAGMENTS: &[&str] = &[
    "/subscribe",
    "/newsletter",
    "/signup",
    "/privacy",
    "/terms",
    "#comments",
];

/// Domains with a nicer display name than the bare host.
const SOURCE_DOMAINS: &[(&str, &str)] = &[
    ("openai.com", "OpenAI"),
    ("anthropic.com", "Anthropic"),
    ("blog.google", "Google"),
    ("deepmind.google", "Google DeepMind"),
    ("mistral.ai", "Mistral"),
    ("huggingface.co", "Hugging Face"),
    ("theverge.com", "The Verge"),
    ("techcrunch.com", "TechCrunch"),
    ("arstechnica.com", "Ars Technica"),
    ("venturebeat.com", "VentureBeat"),
    ("youtube.com", "YouTube"),
    ("youtu.be", "YouTube"),
    ("x.com", "X"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    General,
    Video,
}

fn classify_heading(text: &str) -> Section {
    let lower = text.to_lowercase();
    if lower.contains("youtube") || lower.contains("video") {
        Section::Video
    } else {
        Section::General
    }
}

fn is_junk(title: &str, url: &str) -> bool {
    let title_lower = title.trim().to_lowercase();
    if JUNK_TITLES.contains(&title_lower.as_str()) {
        return true;
    }
    JUNK_URL_FRAGMENTS.iter().any(|frag| url.contains(frag))
}

fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(rest);
    host.strip_prefix("www.").unwrap_or(host)
}

/// Explicit source name if the bullet supplied one, otherwise a display
/// name derived from the URL's domain.
fn resolve_source(explicit: Option<&str>, url: &str) -> String {
    if let Some(name) = explicit {
        return name.trim().to_string();
    }
    let host = host_of(url);
    for (domain, display) in SOURCE_DOMAINS {
        if host == *domain || host.ends_with(&format!(".{domain}")) {
            return (*display).to_string();
        }
    }
    host.to_string()
}

/// Relative dates ("8h ago") resolve to the file date; an ISO prefix is
/// taken verbatim; anything else falls back to the file date.
fn normalize_date(raw: Option<&str>, file_date: NaiveDate) -> NaiveDate {
    let Some(raw) = raw else {
        return file_date;
    };
    let trimmed = raw.trim();
    if trimmed.to_lowercase().ends_with("ago") {
        return file_date;
    }
    if let Some(date) = trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    {
        return date;
    }
    file_date
}

/// Parse one digest file's text into deduplicated news items.
///
/// URL dedup is scoped to this file: the first occurrence wins, and a URL
/// already seen in an earlier file may legitimately reappear here.
pub fn parse_digest(text: &str, file_date: NaiveDate) -> Vec<NewsItem> {
    let lines: Vec<&str> = text.lines().collect();
    let mut items = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut section = Section::General;
    let mut general_rank = 0usize;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if let Some(caps) = heading_re().captures(line) {
            // Only `##` switches sections; sub-headings keep the current one.
            if caps["hashes"].len() == 2 {
                section = classify_heading(&caps["text"]);
            }
            i += 1;
            continue;
        }

        let parsed = if let Some(caps) = bold_bullet_re().captures(line) {
            let mut summary_lines = Vec::new();
            let mut j = i + 1;
            while j < lines.len() {
                let next = lines[j];
                if next.starts_with("  ") && !next.trim().is_empty() {
                    summary_lines.push(next.trim());
                    j += 1;
                } else {
                    break;
                }
            }
            i = j - 1;
            let summary = if summary_lines.is_empty() {
                None
            } else {
                Some(summary_lines.join(" "))
            };
            Some((
                caps["title"].to_string(),
                caps["url"].to_string(),
                Some(caps["source"].to_string()),
                caps.name("date").map(|m| m.as_str().to_string()),
                summary,
            ))
        } else if let Some(caps) = link_bullet_re().captures(line) {
            Some((
                caps["title"].to_string(),
                caps["url"].to_string(),
                None,
                caps.name("date").map(|m| m.as_str().to_string()),
                caps.name("summary").map(|m| m.as_str().to_string()),
            ))
        } else {
            None
        };

        if let Some((title, url, explicit_source, raw_date, summary)) = parsed {
            let title = title.trim().to_string();
            if !is_junk(&title, &url) && seen_urls.insert(url.clone()) {
                // Video bullets never consume a top slot.
                let category = match section {
                    Section::Video => NewsCategory::Video,
                    Section::General => {
                        general_rank += 1;
                        if general_rank <= TOP_ITEM_COUNT {
                            NewsCategory::Top
                        } else {
                            NewsCategory::News
                        }
                    }
                };
                let source = resolve_source(explicit_source.as_deref(), &url);
                items.push(NewsItem {
                    id: format!("{}-{}", file_date.format("%Y-%m-%d"), slugify(&title)),
                    title,
                    url,
                    source,
                    summary,
                    published: normalize_date(raw_date.as_deref(), file_date),
                    category,
                });
            }
        }

        i += 1;
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn both_bullet_shapes_parse() {
        let text = "\
## Top Stories
- **GPT-5 announced** ([OpenAI](https://openai.com/blog/gpt-5)) _2026-08-01_
- [Benchmarks update](https://example.com/bench) _3h ago_ — Fresh numbers across the board.
";
        let items = parse_digest(text, date(2026, 8, 2));
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].title, "GPT-5 announced");
        assert_eq!(items[0].source, "OpenAI");
        assert_eq!(items[0].published, date(2026, 8, 1));
        assert_eq!(items[0].id, "2026-08-02-gpt-5-announced");

        assert_eq!(items[1].title, "Benchmarks update");
        assert_eq!(items[1].source, "example.com");
        assert_eq!(items[1].published, date(2026, 8, 2));
        assert_eq!(items[1].summary.as_deref(), Some("Fresh numbers across the board."));
    }

    #[test]
    fn bold_shape_takes_priority_and_collects_indented_summary() {
        let text = "\
- **Launch day** ([The Verge](https://www.theverge.com/ai/launch)) _8h ago_
  The rollout starts in the US
  and expands next week.
- not an item line
";
        let items = parse_digest(text, date(2026, 8, 2));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "The Verge");
        assert_eq!(items[0].published, date(2026, 8, 2));
        assert_eq!(
            items[0].summary.as_deref(),
            Some("The rollout starts in the US and expands next week.")
        );
    }

    #[test]
    fn duplicate_urls_keep_the_first_occurrence() {
        let text = "\
- [First take](https://example.com/story)
- [Second take](https://example.com/story)
- [Different](https://example.com/other)
";
        let items = parse_digest(text, date(2026, 8, 2));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "First take");
        assert_eq!(items[1].title, "Different");
    }

    #[test]
    fn junk_titles_and_urls_are_dropped() {
        let text = "\
- [Read more](https://example.com/story)
- [Real story](https://example.com/subscribe)
- [Kept](https://example.com/kept)
";
        let items = parse_digest(text, date(2026, 8, 2));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Kept");
    }

    #[test]
    fn video_sections_tag_video_and_subheadings_do_not_switch() {
        let text = "\
## YouTube picks
### Deep dives
- [Model deep dive](https://youtube.com/watch?v=abc)
## News
- [Back to news](https://example.com/a)
";
        let items = parse_digest(text, date(2026, 8, 2));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].category, NewsCategory::Video);
        assert_eq!(items[0].source, "YouTube");
        assert_eq!(items[1].category, NewsCategory::Top);
    }

    #[test]
    fn first_three_general_items_are_top_then_news() {
        let text = "\
## Headlines
- [One](https://example.com/1)
- [Two](https://example.com/2)
- [Three](https://example.com/3)
- [Four](https://example.com/4)
";
        let items = parse_digest(text, date(2026, 8, 2));
        let categories: Vec<NewsCategory> = items.iter().map(|i| i.category).collect();
        assert_eq!(
            categories,
            vec![
                NewsCategory::Top,
                NewsCategory::Top,
                NewsCategory::Top,
                NewsCategory::News
            ]
        );
    }

    #[test]
    fn top_slots_span_general_sections_and_skip_video() {
        let text = "\
## Headlines
- [One](https://example.com/1)
- [Two](https://example.com/2)
## Videos
- [Clip](https://youtube.com/watch?v=x)
## More news
- [Three](https://example.com/3)
- [Four](https://example.com/4)
";
        let items = parse_digest(text, date(2026, 8, 2));
        let categories: Vec<NewsCategory> = items.iter().map(|i| i.category).collect();
        assert_eq!(
            categories,
            vec![
                NewsCategory::Top,
                NewsCategory::Top,
                NewsCategory::Video,
                NewsCategory::Top,
                NewsCategory::News
            ]
        );
    }

    #[test]
    fn long_titles_truncate_in_the_derived_id() {
        let long_title = "word ".repeat(40);
        let text = format!("- [{}](https://example.com/long)\n", long_title.trim());
        let items = parse_digest(&text, date(2026, 8, 2));
        assert_eq!(items.len(), 1);
        // "2026-08-02-" prefix plus an 80-char slug at most.
        assert!(items[0].id.len() <= 11 + 80);
    }

    #[test]
    fn unparseable_dates_fall_back_to_the_file_date() {
        let text = "- [Story](https://example.com/s) _sometime last week_\n";
        let items = parse_digest(text, date(2026, 8, 2));
        assert_eq!(items[0].published, date(2026, 8, 2));
    }

    #[test]
    fn non_ascii_date_fields_fall_back_to_the_file_date() {
        let text = "\
- [Story](https://example.com/s) _8 小时前_
- [Other](https://example.com/o) _vor 2 Tagen veröffentlicht_
";
        let items = parse_digest(text, date(2026, 8, 2));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].published, date(2026, 8, 2));
        assert_eq!(items[1].published, date(2026, 8, 2));
    }
}
