use serde::Serialize;

use crate::resume::sections::{SectionKey, StructuredResumeDocument};

/// Structural checks an applicant tracking system relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtsCheck {
    pub is_ats_compatible: bool,
    pub has_contact_info: bool,
    pub has_experience: bool,
    pub has_skills: bool,
    /// Human-readable names of the parts that failed.
    pub missing: Vec<String>,
}

pub fn check_ats_compatibility(doc: &StructuredResumeDocument) -> AtsCheck {
    let info = &doc.personal_info;
    let has_contact_info = info.email.is_some() || info.phone.is_some();
    let has_experience = !doc.section(SectionKey::Experience).is_empty();
    let has_skills = !doc.section(SectionKey::Skills).is_empty();

    let missing: Vec<String> = [
        (has_contact_info, "contact information"),
        (has_experience, "experience section"),
        (has_skills, "skills section"),
    ]
    .into_iter()
    .filter(|(present, _)| !present)
    .map(|(_, name)| name.to_string())
    .collect();

    AtsCheck {
        is_ats_compatible: missing.is_empty(),
        has_contact_info,
        has_experience,
        has_skills,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::sections::parse_resume;

    #[test]
    fn test_complete_resume_is_compatible() {
        let doc = parse_resume(
            "Jane Doe\njane@x.com\nEXPERIENCE\nEngineer\nSKILLS\nRust",
        )
        .unwrap();
        let check = check_ats_compatibility(&doc);
        assert!(check.is_ats_compatible);
        assert!(check.missing.is_empty());
    }

    #[test]
    fn test_missing_parts_are_listed() {
        let doc = parse_resume("Jane Doe\nEXPERIENCE\nEngineer\nSKILLS").unwrap();
        let check = check_ats_compatibility(&doc);
        assert!(!check.is_ats_compatible);
        assert!(check.has_experience);
        assert_eq!(check.missing, vec!["contact information", "skills section"]);
    }
}
