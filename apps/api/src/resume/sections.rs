//! Section classifier: flat resume text → personal info + canonical sections.
//!
//! Every line is tagged by a pure pattern match ([`classify_line`]); a small
//! state machine then routes lines into the current section. Headers may carry
//! content after a `:` or `-` separator, and a section that appears twice keeps
//! the lines of both occurrences.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::resume::patterns::{
    is_date_range, starts_with_bullet, EMAIL, GITHUB, LINKEDIN, PHONE, WEBSITE,
};

/// Only the first lines of a resume are searched for contact details.
pub const PERSONAL_INFO_WINDOW: usize = 15;

/// Headers matched only by substring must be at most this much longer than the keyword.
const HEADER_SLACK_CHARS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResumeParseError {
    #[error("Resume text is empty")]
    EmptyInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Projects,
    Achievements,
    Languages,
    Publications,
    Volunteer,
    Other,
}

/// Header keywords (lower-case) and the section each one opens.
const HEADER_KEYWORDS: &[(&str, SectionKey)] = &[
    ("professional summary", SectionKey::Summary),
    ("career objective", SectionKey::Summary),
    ("summary", SectionKey::Summary),
    ("objective", SectionKey::Summary),
    ("profile", SectionKey::Summary),
    ("about me", SectionKey::Summary),
    ("overview", SectionKey::Summary),
    ("professional experience", SectionKey::Experience),
    ("work experience", SectionKey::Experience),
    ("employment history", SectionKey::Experience),
    ("career history", SectionKey::Experience),
    ("work history", SectionKey::Experience),
    ("experience", SectionKey::Experience),
    ("employment", SectionKey::Experience),
    ("education", SectionKey::Education),
    ("academic background", SectionKey::Education),
    ("technical skills", SectionKey::Skills),
    ("core competencies", SectionKey::Skills),
    ("competencies", SectionKey::Skills),
    ("skills", SectionKey::Skills),
    ("expertise", SectionKey::Skills),
    ("proficiencies", SectionKey::Skills),
    ("capabilities", SectionKey::Skills),
    ("strengths", SectionKey::Skills),
    ("certifications", SectionKey::Certifications),
    ("certificates", SectionKey::Certifications),
    ("licenses", SectionKey::Certifications),
    ("projects", SectionKey::Projects),
    ("achievements", SectionKey::Achievements),
    ("accomplishments", SectionKey::Achievements),
    ("awards", SectionKey::Achievements),
    ("honors", SectionKey::Achievements),
    ("highlights", SectionKey::Achievements),
    ("languages", SectionKey::Languages),
    ("publications", SectionKey::Publications),
    ("volunteer experience", SectionKey::Volunteer),
    ("volunteering", SectionKey::Volunteer),
    ("volunteer", SectionKey::Volunteer),
    ("qualifications", SectionKey::Other),
    ("background", SectionKey::Summary),
    ("interests", SectionKey::Other),
    ("hobbies", SectionKey::Other),
    ("references", SectionKey::Other),
];

/// Keywords ordered longest first, so "work experience" is tried before "experience".
static KEYWORDS_BY_LENGTH: Lazy<Vec<(&'static str, SectionKey)>> = Lazy::new(|| {
    let mut keywords = HEADER_KEYWORDS.to_vec();
    keywords.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    keywords
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl PersonalInfo {
    /// Fills any still-empty contact field from `line`. Returns true if a field was set.
    fn absorb(&mut self, line: &str) -> bool {
        let mut filled = false;
        filled |= fill(&mut self.email, EMAIL.find(line).map(|m| m.as_str()));
        filled |= fill(&mut self.phone, PHONE.find(line).map(|m| m.as_str().trim()));
        filled |= fill(&mut self.linkedin, LINKEDIN.find(line).map(|m| m.as_str()));
        filled |= fill(&mut self.github, GITHUB.find(line).map(|m| m.as_str()));
        let website = WEBSITE
            .find_iter(line)
            .map(|m| m.as_str())
            .find(|url| !LINKEDIN.is_match(url) && !GITHUB.is_match(url));
        filled |= fill(&mut self.website, website);
        filled
    }
}

fn fill(slot: &mut Option<String>, found: Option<&str>) -> bool {
    match (slot.is_none(), found) {
        (true, Some(value)) => {
            *slot = Some(value.to_string());
            true
        }
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    pub key: SectionKey,
    /// Text after a `Keyword:` or `Keyword -` separator, if any.
    pub inline: Option<String>,
}

/// What a single trimmed line looks like, independent of its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Header(HeaderMatch),
    Contact,
    DateRange,
    Body,
}

pub fn classify_line(line: &str) -> LineKind {
    if let Some(header) = match_header(line) {
        LineKind::Header(header)
    } else if is_contact_line(line) {
        LineKind::Contact
    } else if is_date_range(line) {
        LineKind::DateRange
    } else {
        LineKind::Body
    }
}

fn is_contact_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    EMAIL.is_match(line)
        || PHONE.is_match(line)
        || LINKEDIN.is_match(line)
        || GITHUB.is_match(line)
        || WEBSITE.is_match(line)
        || lower.contains('@')
        || ["phone", "email", "linkedin", "github", "tel:"]
            .iter()
            .any(|hint| lower.contains(hint))
}

/// Recognizes a section header.
///
/// A line qualifies when, for some keyword, it equals the keyword, starts with
/// it followed by `:` or `-`, or contains it while being at most ten characters
/// longer. Bullet lines never qualify. When several keywords qualify the one
/// appearing earliest wins, then the longest.
pub fn match_header(line: &str) -> Option<HeaderMatch> {
    let trimmed = line.trim();
    if trimmed.is_empty() || starts_with_bullet(trimmed) {
        return None;
    }
    let lower = trimmed.to_lowercase();
    let line_chars = trimmed.chars().count();

    let mut best: Option<(usize, usize, SectionKey, Option<String>)> = None;
    for (keyword, key) in KEYWORDS_BY_LENGTH.iter() {
        let candidate = if lower == *keyword {
            Some((0, None))
        } else if let Some(inline) = separated_remainder(trimmed, keyword) {
            Some((0, Some(inline)))
        } else if line_chars <= keyword.len() + HEADER_SLACK_CHARS {
            lower.find(keyword).map(|pos| (pos, None))
        } else {
            None
        };

        let Some((pos, inline)) = candidate else {
            continue;
        };
        let better = match &best {
            None => true,
            Some((best_pos, best_len, _, _)) => {
                pos < *best_pos || (pos == *best_pos && keyword.len() > *best_len)
            }
        };
        if better {
            best = Some((pos, keyword.len(), *key, inline));
        }
    }

    best.map(|(_, _, key, inline)| HeaderMatch {
        key,
        inline: inline.filter(|s: &String| !s.is_empty()),
    })
}

/// `Keyword: rest` or `Keyword - rest` → `Some("rest")` (possibly empty).
fn separated_remainder(trimmed: &str, keyword: &str) -> Option<String> {
    let head = trimmed.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = trimmed[keyword.len()..].trim_start();
    let after = rest.strip_prefix(':').or_else(|| rest.strip_prefix('-'))?;
    Some(after.trim().to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStats {
    /// Non-empty lines in the input.
    pub total: usize,
    /// Pre-header lines consumed as the name or contact details.
    pub personal_info: usize,
    /// Pre-header lines that were neither personal info nor section content.
    pub dropped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredResumeDocument {
    pub personal_info: PersonalInfo,
    pub sections: BTreeMap<SectionKey, Vec<String>>,
    /// Sections in order of first appearance.
    pub section_order: Vec<SectionKey>,
    pub line_stats: LineStats,
}

impl StructuredResumeDocument {
    pub fn section(&self, key: SectionKey) -> &[String] {
        self.sections.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn content_lines(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassifierState {
    SeekingHeader,
    InSection(SectionKey),
}

/// Splits flat resume text into personal info and canonical sections.
pub fn parse_resume(text: &str) -> Result<StructuredResumeDocument, ResumeParseError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return Err(ResumeParseError::EmptyInput);
    }

    let mut doc = StructuredResumeDocument {
        line_stats: LineStats {
            total: lines.len(),
            ..LineStats::default()
        },
        ..StructuredResumeDocument::default()
    };
    let mut state = ClassifierState::SeekingHeader;

    for (index, line) in lines.iter().enumerate() {
        let kind = classify_line(line);
        let in_window = index < PERSONAL_INFO_WINDOW;

        if let LineKind::Header(header) = &kind {
            state = ClassifierState::InSection(header.key);
            let section = open_section(&mut doc, header.key);
            if let Some(inline) = &header.inline {
                section.push(inline.clone());
            }
            continue;
        }

        let filled = in_window && doc.personal_info.absorb(line);
        match state {
            ClassifierState::InSection(key) => open_section(&mut doc, key).push(line.to_string()),
            ClassifierState::SeekingHeader => {
                let is_name = in_window
                    && !filled
                    && kind != LineKind::Contact
                    && doc.personal_info.name.is_none();
                if is_name {
                    doc.personal_info.name = Some(line.to_string());
                }
                if filled || is_name {
                    doc.line_stats.personal_info += 1;
                } else {
                    debug!("Dropping pre-header line: {line}");
                    doc.line_stats.dropped += 1;
                }
            }
        }
    }

    debug!(
        "Classified {} line(s): {} in {} section(s), {} personal info, {} dropped",
        doc.line_stats.total,
        doc.content_lines(),
        doc.sections.len(),
        doc.line_stats.personal_info,
        doc.line_stats.dropped
    );
    Ok(doc)
}

fn open_section(doc: &mut StructuredResumeDocument, key: SectionKey) -> &mut Vec<String> {
    if !doc.section_order.contains(&key) {
        doc.section_order.push(key);
    }
    doc.sections.entry(key).or_default()
}
