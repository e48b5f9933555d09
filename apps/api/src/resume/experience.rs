//! Experience grouper: clusters experience-section lines into job entries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::resume::patterns::{is_date_range, starts_with_bullet, strip_bullet, words};

const TITLE_KEYWORDS: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "analyst",
    "director",
    "specialist",
    "consultant",
    "coordinator",
    "lead",
    "senior",
    "junior",
];

const COMPANY_KEYWORDS: &[&str] = &[
    "inc",
    "corp",
    "llc",
    "ltd",
    "company",
    "technologies",
    "solutions",
    "systems",
    "services",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub bullets: Vec<String>,
}

impl ExperienceEntry {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            company: None,
            duration: None,
            bullets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceLine {
    Title,
    Company,
    Duration,
    Bullet,
}

/// Tags one line; checks run title → company → duration, first hit wins.
pub fn classify_experience_line(line: &str) -> ExperienceLine {
    let bullet = starts_with_bullet(line);
    if !bullet && has_keyword(line, TITLE_KEYWORDS) {
        ExperienceLine::Title
    } else if !bullet && has_keyword(line, COMPANY_KEYWORDS) {
        ExperienceLine::Company
    } else if !bullet && is_date_range(line) {
        ExperienceLine::Duration
    } else {
        ExperienceLine::Bullet
    }
}

/// Keywords shorter than this must match a whole word ("inc" is not "increased").
const MIN_PREFIX_KEYWORD_CHARS: usize = 4;

/// Case-insensitive keyword test against word starts: "engineer" matches
/// "Engineering", "corp" matches "Corporation", "lead" never matches "misleading".
fn has_keyword(line: &str, keywords: &[&str]) -> bool {
    words(line).any(|w| {
        keywords.iter().any(|k| {
            if k.len() < MIN_PREFIX_KEYWORD_CHARS {
                w == *k
            } else {
                w.starts_with(k)
            }
        })
    })
}

/// Groups experience-section lines into entries. Lines seen before the first
/// title cannot be attributed and are skipped. A second company or duration
/// line for the same entry is kept as a bullet.
pub fn group_experience<S: AsRef<str>>(lines: &[S]) -> Vec<ExperienceEntry> {
    let mut entries = Vec::new();
    let mut open: Option<ExperienceEntry> = None;

    for line in lines.iter().map(|l| l.as_ref().trim()) {
        if line.is_empty() {
            continue;
        }
        let kind = classify_experience_line(line);
        if kind == ExperienceLine::Title {
            entries.extend(open.replace(ExperienceEntry::new(line)));
            continue;
        }

        let Some(entry) = open.as_mut() else {
            debug!("Skipping experience line with no open entry: {line}");
            continue;
        };
        match kind {
            ExperienceLine::Company if entry.company.is_none() => {
                entry.company = Some(line.to_string());
            }
            ExperienceLine::Duration if entry.duration.is_none() => {
                entry.duration = Some(line.to_string());
            }
            _ => {
                let bullet = strip_bullet(line);
                if !bullet.is_empty() {
                    entry.bullets.push(bullet.to_string());
                }
            }
        }
    }

    entries.extend(open);
    entries
}
