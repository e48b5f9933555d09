//! Line-level patterns shared by the section classifier and the experience grouper.

use once_cell::sync::Lazy;
use regex::Regex;

/// Markers that open a bullet line.
pub const BULLET_MARKERS: &[char] = &['•', '-', '*'];

pub static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").expect("email pattern is valid")
});

/// NANP-style grouping: optional country code and area code, then `ddd-dddd`,
/// or ten bare digits. Separators are required between groups so year ranges
/// such as `2019-2021` are not mistaken for numbers.
pub static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\+\d{1,3}[-.\s]?)?(?:\(\d{3}\)\s?|\b\d{3}[-.\s])?\b\d{3}[-.\s]\d{4}\b|\b\d{10}\b",
    )
    .expect("phone pattern is valid")
});

pub static LINKEDIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[\w-]+/?")
        .expect("linkedin pattern is valid")
});

pub static GITHUB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[\w-]+/?").expect("github pattern is valid")
});

pub static WEBSITE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bhttps?://[^\s|,;]+").expect("website pattern is valid"));

/// `MM/YYYY`, `YYYY - YYYY`, `YYYY - Present`, or a bare four-digit year.
pub static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d{1,2}/\d{4}\b|\b\d{4}\s*[-–—]\s*(?:\d{4}|present|current|now)\b|\b\d{4}\b",
    )
    .expect("date range pattern is valid")
});

pub fn starts_with_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLET_MARKERS)
}

/// Removes one leading bullet marker and the whitespace around it.
pub fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed
        .strip_prefix(BULLET_MARKERS)
        .map(str::trim_start)
        .unwrap_or(trimmed)
}

pub fn is_date_range(line: &str) -> bool {
    DATE_RANGE.is_match(line)
}

/// Lower-cased alphanumeric words of a line.
pub fn words(line: &str) -> impl Iterator<Item = String> + '_ {
    line.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}
