//! Job-field schema enforcement: turns whatever object the model produced into a
//! complete `ExtractedJobFields` record.
//!
//! Enforcement is total: missing, null or mistyped fields are coerced and reported
//! as `SchemaCoercionWarning`s, never raised. Only a total parse failure upstream
//! (see `llm_client::json_recovery`) is fatal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Sentinel for scalar fields the posting does not provide.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    List,
}

/// Wire name and kind of every field in the extraction schema, in prompt order.
pub const JOB_FIELD_SCHEMA: &[(&str, FieldKind)] = &[
    ("company", FieldKind::Text),
    ("title", FieldKind::Text),
    ("salary", FieldKind::Text),
    ("location", FieldKind::Text),
    ("type", FieldKind::Text),
    ("description", FieldKind::Text),
    ("requirements", FieldKind::List),
    ("skills", FieldKind::List),
    ("experience", FieldKind::Text),
    ("education", FieldKind::Text),
    ("benefits", FieldKind::List),
    ("keywords", FieldKind::List),
    ("department", FieldKind::Text),
    ("reportingTo", FieldKind::Text),
    ("workModel", FieldKind::Text),
    ("applicationDeadline", FieldKind::Text),
    ("applicationUrl", FieldKind::Text),
    ("contactEmail", FieldKind::Text),
    ("postedDate", FieldKind::Text),
    ("industryType", FieldKind::Text),
    ("companySize", FieldKind::Text),
    ("workSchedule", FieldKind::Text),
    ("travelRequired", FieldKind::Text),
    ("securityClearance", FieldKind::Text),
    ("visaSponsorship", FieldKind::Text),
];

/// Structured job posting. Every field is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedJobFields {
    pub company: String,
    pub title: String,
    pub salary: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub benefits: Vec<String>,
    pub keywords: Vec<String>,
    pub department: String,
    pub reporting_to: String,
    pub work_model: String,
    pub application_deadline: String,
    pub application_url: String,
    pub contact_email: String,
    pub posted_date: String,
    pub industry_type: String,
    pub company_size: String,
    pub work_schedule: String,
    pub travel_required: String,
    pub security_clearance: String,
    pub visa_sponsorship: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionKind {
    Missing,
    Null,
    Blank,
    /// Value had the wrong JSON type and was converted.
    Converted { found: String },
    /// Value could not be represented and was replaced by the default.
    Discarded { found: String },
}

/// Non-fatal, field-level defect repaired during enforcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaCoercionWarning {
    pub field: String,
    pub kind: CoercionKind,
}

/// Result of enforcing the schema over one model object.
#[derive(Debug, Clone, Serialize)]
pub struct JobFieldsExtraction {
    pub fields: ExtractedJobFields,
    pub warnings: Vec<SchemaCoercionWarning>,
}

/// Builds a complete `ExtractedJobFields` from a parsed model object. Never fails.
pub fn enforce_schema(source: &Map<String, Value>) -> JobFieldsExtraction {
    let mut c = Coercer {
        source,
        warnings: Vec::new(),
    };

    let fields = ExtractedJobFields {
        company: c.text("company"),
        title: c.text("title"),
        salary: c.text("salary"),
        location: c.text("location"),
        job_type: c.text("type"),
        description: c.text("description"),
        requirements: c.list("requirements"),
        skills: c.list("skills"),
        experience: c.text("experience"),
        education: c.text("education"),
        benefits: c.list("benefits"),
        keywords: c.list("keywords"),
        department: c.text("department"),
        reporting_to: c.text("reportingTo"),
        work_model: c.text("workModel"),
        application_deadline: c.text("applicationDeadline"),
        application_url: c.text("applicationUrl"),
        contact_email: c.text("contactEmail"),
        posted_date: c.text("postedDate"),
        industry_type: c.text("industryType"),
        company_size: c.text("companySize"),
        work_schedule: c.text("workSchedule"),
        travel_required: c.text("travelRequired"),
        security_clearance: c.text("securityClearance"),
        visa_sponsorship: c.text("visaSponsorship"),
    };

    if !c.warnings.is_empty() {
        debug!("Job field enforcement repaired {} field(s)", c.warnings.len());
    }

    JobFieldsExtraction {
        fields,
        warnings: c.warnings,
    }
}

impl ExtractedJobFields {
    /// Download name for a resume tailored to this posting:
    /// `<Title>_resume_<YYYY-MM-DD>.pdf`, with non-alphanumerics replaced by `_`.
    pub fn resume_file_name(&self, date: NaiveDate) -> String {
        let title = self.title.trim();
        let stem = if title.is_empty() || title.eq_ignore_ascii_case(NOT_AVAILABLE) {
            "resume".to_string()
        } else {
            title
                .chars()
                .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
                .collect()
        };
        format!("{stem}_resume_{}.pdf", date.format("%Y-%m-%d"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Coercion
// ────────────────────────────────────────────────────────────────────────────

struct Coercer<'a> {
    source: &'a Map<String, Value>,
    warnings: Vec<SchemaCoercionWarning>,
}

impl Coercer<'_> {
    fn warn(&mut self, field: &str, kind: CoercionKind) {
        self.warnings.push(SchemaCoercionWarning {
            field: field.to_string(),
            kind,
        });
    }

    fn text(&mut self, field: &str) -> String {
        let value = match self.source.get(field) {
            None => {
                self.warn(field, CoercionKind::Missing);
                return NOT_AVAILABLE.to_string();
            }
            Some(value) => value,
        };

        match value {
            Value::String(s) if s.trim().is_empty() => {
                self.warn(field, CoercionKind::Blank);
                NOT_AVAILABLE.to_string()
            }
            Value::String(s) => s.trim().to_string(),
            Value::Null => {
                self.warn(field, CoercionKind::Null);
                NOT_AVAILABLE.to_string()
            }
            Value::Number(_) | Value::Bool(_) => {
                self.warn(field, converted(value));
                value.to_string()
            }
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .filter_map(scalar_text)
                    .collect::<Vec<_>>()
                    .join(", ");
                if joined.is_empty() {
                    self.warn(field, discarded(value));
                    NOT_AVAILABLE.to_string()
                } else {
                    self.warn(field, converted(value));
                    joined
                }
            }
            Value::Object(_) => {
                self.warn(field, discarded(value));
                NOT_AVAILABLE.to_string()
            }
        }
    }

    fn list(&mut self, field: &str) -> Vec<String> {
        let value = match self.source.get(field) {
            None => {
                self.warn(field, CoercionKind::Missing);
                return Vec::new();
            }
            Some(value) => value,
        };

        match value {
            Value::Array(items) => {
                let kept: Vec<String> = items.iter().filter_map(scalar_text).collect();
                if kept.len() != items.len() {
                    self.warn(field, converted(value));
                }
                kept
            }
            Value::Null => {
                self.warn(field, CoercionKind::Null);
                Vec::new()
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) => match scalar_text(value) {
                Some(item) => {
                    self.warn(field, converted(value));
                    vec![item]
                }
                None => Vec::new(),
            },
            Value::Object(_) => {
                self.warn(field, discarded(value));
                Vec::new()
            }
        }
    }
}

/// Text form of a scalar JSON value; `None` for blanks, `"N/A"`, and containers.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty() && !s.eq_ignore_ascii_case(NOT_AVAILABLE)).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn type_name(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

fn converted(value: &Value) -> CoercionKind {
    CoercionKind::Converted {
        found: type_name(value),
    }
}

fn discarded(value: &Value) -> CoercionKind {
    CoercionKind::Discarded {
        found: type_name(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_empty_object_yields_all_defaults() {
        let extraction = enforce_schema(&Map::new());
        let fields = extraction.fields;
        assert_eq!(fields.company, "N/A");
        assert_eq!(fields.visa_sponsorship, "N/A");
        assert!(fields.requirements.is_empty());
        assert!(fields.keywords.is_empty());
        assert_eq!(extraction.warnings.len(), JOB_FIELD_SCHEMA.len());
        assert!(extraction
            .warnings
            .iter()
            .all(|w| w.kind == CoercionKind::Missing));
    }

    #[test]
    fn test_every_schema_key_is_serialized() {
        let extraction = enforce_schema(&Map::new());
        let value = serde_json::to_value(&extraction.fields).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), JOB_FIELD_SCHEMA.len());
        for (key, kind) in JOB_FIELD_SCHEMA {
            let field = map.get(*key).unwrap_or_else(|| panic!("missing key {key}"));
            match kind {
                FieldKind::Text => assert_eq!(field, "N/A"),
                FieldKind::List => assert_eq!(field, &json!([])),
            }
        }
    }

    #[test]
    fn test_present_fields_pass_through() {
        let extraction = enforce_schema(&object(json!({
            "company": "Acme",
            "title": "Engineer",
            "type": "Full-time",
            "skills": ["Rust", "SQL"],
            "workModel": "Remote"
        })));
        let fields = extraction.fields;
        assert_eq!(fields.company, "Acme");
        assert_eq!(fields.title, "Engineer");
        assert_eq!(fields.job_type, "Full-time");
        assert_eq!(fields.skills, vec!["Rust", "SQL"]);
        assert_eq!(fields.work_model, "Remote");
        assert_eq!(fields.salary, "N/A");
    }

    #[test]
    fn test_null_scalar_and_null_array_default() {
        let extraction = enforce_schema(&object(json!({"salary": null, "benefits": null})));
        assert_eq!(extraction.fields.salary, "N/A");
        assert!(extraction.fields.benefits.is_empty());
        assert!(extraction.warnings.contains(&SchemaCoercionWarning {
            field: "salary".to_string(),
            kind: CoercionKind::Null,
        }));
    }

    #[test]
    fn test_string_where_array_expected_becomes_single_element() {
        let extraction = enforce_schema(&object(json!({"skills": "Kubernetes"})));
        assert_eq!(extraction.fields.skills, vec!["Kubernetes"]);
        assert!(extraction.warnings.iter().any(|w| w.field == "skills"
            && w.kind
                == CoercionKind::Converted {
                    found: "string".to_string()
                }));
    }

    #[test]
    fn test_not_available_string_where_array_expected_is_empty() {
        let extraction = enforce_schema(&object(json!({"requirements": "N/A"})));
        assert!(extraction.fields.requirements.is_empty());
    }

    #[test]
    fn test_number_where_string_expected_is_stringified() {
        let extraction = enforce_schema(&object(json!({"salary": 85000, "visaSponsorship": true})));
        assert_eq!(extraction.fields.salary, "85000");
        assert_eq!(extraction.fields.visa_sponsorship, "true");
    }

    #[test]
    fn test_array_where_string_expected_is_joined() {
        let extraction = enforce_schema(&object(json!({"location": ["Berlin", "Remote"]})));
        assert_eq!(extraction.fields.location, "Berlin, Remote");
    }

    #[test]
    fn test_object_where_string_expected_is_discarded() {
        let extraction = enforce_schema(&object(json!({"salary": {"min": 1}})));
        assert_eq!(extraction.fields.salary, "N/A");
        assert!(extraction.warnings.iter().any(|w| w.field == "salary"
            && matches!(w.kind, CoercionKind::Discarded { .. })));
    }

    #[test]
    fn test_array_items_are_cleaned() {
        let extraction = enforce_schema(&object(json!({
            "keywords": ["  Rust ", "", null, 5, {"x": 1}, "N/A"]
        })));
        assert_eq!(extraction.fields.keywords, vec!["Rust", "5"]);
    }

    #[test]
    fn test_blank_string_becomes_not_available() {
        let extraction = enforce_schema(&object(json!({"department": "   "})));
        assert_eq!(extraction.fields.department, "N/A");
    }

    #[test]
    fn test_resume_file_name_uses_sanitized_title() {
        let mut fields = enforce_schema(&object(json!({"title": "Sr. Rust/Go Engineer"}))).fields;
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            fields.resume_file_name(date),
            "Sr__Rust_Go_Engineer_resume_2024-03-09.pdf"
        );
        fields.title = NOT_AVAILABLE.to_string();
        assert_eq!(fields.resume_file_name(date), "resume_resume_2024-03-09.pdf");
    }
}
