// Prompt constants for resume analysis and ATS optimization.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Job descriptions shorter than this (in words) are refused by the model.
pub const MIN_JOB_DESCRIPTION_WORDS: usize = 50;

pub const INSUFFICIENT_JOB_DESCRIPTION: &str = "Job description is missing or insufficient \
for meaningful ATS analysis. Please provide a detailed job description with at least 50 words.";

const COMPARISON_TEMPLATE: &str = r#"You are an expert ATS (Applicant Tracking System) resume analyzer.

Analyze the job description and resume following these steps:

STEP 1: Validate the job description.
If it is missing, empty, or shorter than {min_words} words, return ONLY this JSON and stop:
{"error": "{insufficient}"}

STEP 2: Extract keywords from the job description ONLY.
- Extract only skills, technologies, tools, certifications, frameworks, methodologies and domain terms LITERALLY WRITTEN in the job description
- Never infer generic skills or add skills that only appear in the resume

STEP 3: Compare with the resume.
- matchedSkills: job description keywords found in the resume
- missingSkills: job description keywords NOT found in the resume
- Use exact matching and common synonyms (e.g. "React.js" matches "React")

STEP 4: For each missing skill suggest a resume section and how to add it naturally.

STEP 5: Score experience fit (years, responsibilities, seniority) from 0 to 100.

STEP 6: Scores, each 0-100:
- skillsMatch: share of technical skills from the job description found in the resume
- keywordMatch: share of all job description keywords found in the resume
- overallScore: 40% skillsMatch + 30% keywordMatch + 30% experienceMatch
- atsScore: ATS compatibility based on keyword density and formatting
- matchPercentage: same as overallScore

Every skill in matchedSkills and missingSkills MUST appear in the job description.

{json_only}

Response format:
{
  "matchPercentage": 0,
  "matchedSkills": ["skill found in both"],
  "missingSkills": ["skill from the job description not in the resume"],
  "suggestions": [{"keyword": "missing skill", "section": "resume section", "suggestion": "actionable advice"}],
  "experienceMatch": 0,
  "skillsMatch": 0,
  "keywordMatch": 0,
  "overallScore": 0,
  "atsScore": 0,
  "extractedKeywords": ["every keyword from the job description"],
  "explanation": "brief explanation",
  "error": null
}

JOB DESCRIPTION:
{job_description}

RESUME:
{resume}

JSON Response:"#;

pub fn build_comparison_prompt(resume: &str, job_description: &str) -> String {
    COMPARISON_TEMPLATE
        .replace("{min_words}", &MIN_JOB_DESCRIPTION_WORDS.to_string())
        .replace("{insufficient}", INSUFFICIENT_JOB_DESCRIPTION)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{job_description}", job_description)
        .replace("{resume}", resume)
}

/// How many missing skills each resume section should absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillDistribution {
    pub summary: usize,
    pub skills: usize,
    pub experience: usize,
    pub projects: usize,
}

impl SkillDistribution {
    /// 40% / 30% / 20% / 10% of `missing`, each rounded up.
    pub fn for_missing(missing: usize) -> Self {
        let share = |percent: usize| (missing * percent).div_ceil(100);
        Self {
            summary: share(40),
            skills: share(30),
            experience: share(20),
            projects: share(10),
        }
    }
}

const OPTIMIZATION_TEMPLATE: &str = r#"You are a professional resume writer and ATS optimization expert.

Rewrite the resume below into an ATS-optimized document that naturally integrates the missing keywords while staying truthful and readable.

MISSING SKILLS TO INTEGRATE (include all):
{missing}

ALREADY MATCHED SKILLS (keep these):
{matched}

INTEGRATION STRATEGY:
1. PROFESSIONAL SUMMARY: integrate {summary} missing skill(s) in a compelling narrative.
2. TECHNICAL SKILLS: integrate {skills} missing skill(s), grouping related technologies.
3. PROFESSIONAL EXPERIENCE: integrate {experience} missing skill(s) into achievement bullets with metrics.
4. PROJECTS/ACHIEVEMENTS: integrate the remaining {projects} missing skill(s).

FORMATTING:
- Standard section headers (SUMMARY, SKILLS, EXPERIENCE, EDUCATION, PROJECTS)
- Bullet points for achievements and responsibilities
- Plain text only, no tables or columns

RESUME TO OPTIMIZE:
{resume}

JOB DESCRIPTION FOR CONTEXT:
{job_description}

Return only the optimized resume text."#;

pub fn build_optimization_prompt(
    resume: &str,
    job_description: &str,
    matched: &[String],
    missing: &[String],
) -> String {
    let distribution = SkillDistribution::for_missing(missing.len());
    OPTIMIZATION_TEMPLATE
        .replace("{missing}", &skill_list(missing))
        .replace("{matched}", &skill_list(matched))
        .replace("{summary}", &distribution.summary.to_string())
        .replace("{skills}", &distribution.skills.to_string())
        .replace("{experience}", &distribution.experience.to_string())
        .replace("{projects}", &distribution.projects.to_string())
        .replace("{resume}", resume)
        .replace("{job_description}", job_description)
}

fn skill_list(skills: &[String]) -> String {
    if skills.is_empty() {
        "(none)".to_string()
    } else {
        skills.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_rounds_up() {
        assert_eq!(
            SkillDistribution::for_missing(7),
            SkillDistribution {
                summary: 3,
                skills: 3,
                experience: 2,
                projects: 1,
            }
        );
        assert_eq!(
            SkillDistribution::for_missing(0),
            SkillDistribution {
                summary: 0,
                skills: 0,
                experience: 0,
                projects: 0,
            }
        );
        assert_eq!(SkillDistribution::for_missing(10).summary, 4);
    }

    #[test]
    fn test_comparison_prompt_carries_error_contract() {
        let prompt = build_comparison_prompt("My resume", "The JD");
        assert!(prompt.contains(INSUFFICIENT_JOB_DESCRIPTION));
        assert!(prompt.contains("shorter than 50 words"));
        assert!(prompt.contains("My resume"));
        assert!(prompt.contains("The JD"));
        assert!(!prompt.contains("{resume}"));
    }

    #[test]
    fn test_optimization_prompt_lists_skills() {
        let missing = vec!["Kubernetes".to_string(), "GraphQL".to_string()];
        let prompt = build_optimization_prompt("resume", "jd", &[], &missing);
        assert!(prompt.contains("Kubernetes, GraphQL"));
        assert!(prompt.contains("ALREADY MATCHED SKILLS (keep these):\n(none)"));
        assert!(prompt.contains("integrate 1 missing skill(s) in a compelling"));
    }
}
