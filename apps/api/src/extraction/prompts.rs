// Prompt constants for job-posting extraction.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::extraction::schema::{FieldKind, JOB_FIELD_SCHEMA};
use crate::llm_client::prompts::{JSON_ONLY_INSTRUCTION, NOT_AVAILABLE_INSTRUCTION};

/// Per-field hints shown to the model, keyed by wire name.
const FIELD_HINTS: &[(&str, &str)] = &[
    ("company", "Company name"),
    ("title", "Exact job title"),
    ("salary", "Salary range/amount (e.g. $50,000-$70,000, $25/hour)"),
    ("location", "Full location (City, State, Country) or Remote"),
    ("type", "Full-time/Part-time/Contract/Internship/Temporary/Freelance"),
    ("description", "Brief 2-3 sentence summary of role responsibilities"),
    ("requirements", "requirement"),
    ("skills", "technical skill"),
    ("experience", "Required years/level (e.g. 3-5 years, Entry level, Senior)"),
    ("education", "Education requirements (e.g. Bachelor's degree, High school)"),
    ("benefits", "benefit"),
    ("keywords", "important keyword"),
    ("department", "Department/Division/Team name"),
    ("reportingTo", "Reports to position title"),
    ("workModel", "Remote/Hybrid/On-site"),
    ("applicationDeadline", "Application deadline date"),
    ("applicationUrl", "Application website URL"),
    ("contactEmail", "Contact email address"),
    ("postedDate", "When job was posted"),
    ("industryType", "Industry/Sector (e.g. Technology, Healthcare)"),
    ("companySize", "Company size (e.g. 50-100 employees, Startup)"),
    ("workSchedule", "Work hours/schedule (e.g. 9-5, Flexible, Shifts)"),
    ("travelRequired", "Travel requirements percentage/description"),
    ("securityClearance", "Security clearance required"),
    ("visaSponsorship", "Visa sponsorship availability (Yes/No)"),
];

const JOB_EXTRACTION_TEMPLATE: &str = r#"You are an expert job posting analyzer for job tracking systems. Extract ALL available information from the job posting below.

{json_only}

Extract these fields with exact key names:
{schema}

Important rules:
- {not_available}
- Extract exact text when possible
- Parse salary formats carefully (annual, hourly, ranges)

Job Posting Text:
{posting}

JSON Response:"#;

/// Builds the extraction prompt for one posting.
pub fn build_job_extraction_prompt(posting: &str) -> String {
    JOB_EXTRACTION_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{schema}", &schema_block())
        .replace("{not_available}", NOT_AVAILABLE_INSTRUCTION)
        .replace("{posting}", posting)
}

fn schema_block() -> String {
    let lines: Vec<String> = JOB_FIELD_SCHEMA
        .iter()
        .map(|(key, kind)| {
            let hint = FIELD_HINTS
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, h)| *h)
                .unwrap_or(*key);
            match kind {
                FieldKind::Text => format!("  \"{key}\": \"{hint} or N/A\""),
                FieldKind::List => format!("  \"{key}\": [\"{hint}1\", \"{hint}2\"] or []"),
            }
        })
        .collect();
    format!("{{\n{}\n}}", lines.join(",\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_every_schema_field() {
        let prompt = build_job_extraction_prompt("We are hiring.");
        for (key, _) in JOB_FIELD_SCHEMA {
            assert!(prompt.contains(&format!("\"{key}\"")), "prompt missing {key}");
        }
        assert!(prompt.contains("We are hiring."));
        assert!(!prompt.contains("{posting}"));
    }

    #[test]
    fn test_every_field_has_a_hint() {
        for (key, _) in JOB_FIELD_SCHEMA {
            assert!(FIELD_HINTS.iter().any(|(k, _)| k == key), "no hint for {key}");
        }
    }
}
