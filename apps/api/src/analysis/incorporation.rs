use serde::Serialize;

/// Which previously-missing skills made it into a regenerated resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncorporationReport {
    pub incorporated_skills: Vec<String>,
    pub remaining_missing_skills: Vec<String>,
    /// `round(100 * incorporated / missing)`, 100 when nothing was missing.
    pub incorporation_rate: u8,
}

/// Case-insensitive containment check of each skill against `regenerated_text`.
/// Blank skills are ignored.
pub fn verify_incorporation<S: AsRef<str>>(
    missing_skills: &[S],
    regenerated_text: &str,
) -> IncorporationReport {
    let text_lower = regenerated_text.to_lowercase();
    let (incorporated_skills, remaining_missing_skills): (Vec<String>, Vec<String>) =
        missing_skills
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .partition(|skill| text_lower.contains(&skill.to_lowercase()));

    let total = incorporated_skills.len() + remaining_missing_skills.len();
    let incorporation_rate = if total == 0 {
        100
    } else {
        (100.0 * incorporated_skills.len() as f64 / total as f64).round() as u8
    };

    IncorporationReport {
        incorporated_skills,
        remaining_missing_skills,
        incorporation_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_incorporation() {
        let report = verify_incorporation(
            &["Kubernetes", "GraphQL"],
            "Deployed services on kubernetes clusters.",
        );
        assert_eq!(report.incorporated_skills, vec!["Kubernetes"]);
        assert_eq!(report.remaining_missing_skills, vec!["GraphQL"]);
        assert_eq!(report.incorporation_rate, 50);
    }

    #[test]
    fn test_nothing_missing_is_fully_incorporated() {
        let none: [&str; 0] = [];
        assert_eq!(verify_incorporation(&none, "anything").incorporation_rate, 100);
        assert_eq!(verify_incorporation(&["  "], "anything").incorporation_rate, 100);
    }

    #[test]
    fn test_rate_rounds_and_stays_in_bounds() {
        let report = verify_incorporation(&["a1", "b2", "c3"], "has A1 only");
        assert_eq!(report.incorporation_rate, 33);

        let report = verify_incorporation(&["Rust", "Go"], "Rust and Go");
        assert_eq!(report.incorporation_rate, 100);

        let report = verify_incorporation(&["Elixir"], "");
        assert_eq!(report.incorporation_rate, 0);
    }
}
