//! Shortfall inference: appends deterministic placeholder entries until each list
//! reaches the policy minimum. Existing entries are never removed or reordered.

use serde::{Deserialize, Serialize};

use crate::evaluation::models::{EvaluationRecord, SkillEntry, SkillKind};

/// Ordered fallback names for technical skills.
pub const TECHNICAL_CANDIDATES: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "C++",
    "SQL",
    "HTML",
    "CSS",
    "React",
    "Node.js",
    "Docker",
];

/// Ordered fallback names for soft skills.
pub const SOFT_CANDIDATES: &[&str] = &["Communication", "Teamwork", "Problem Solving", "Adaptability"];

/// Minimum item counts a normalized record must reach.
///
/// The same numbers are quoted to the model in the evaluation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferencePolicy {
    pub min_technical_skills: usize,
    pub min_soft_skills: usize,
    pub min_strengths: usize,
    pub min_areas_for_improvement: usize,
}

impl Default for InferencePolicy {
    fn default() -> Self {
        Self {
            min_technical_skills: 10,
            min_soft_skills: 4,
            min_strengths: 6,
            min_areas_for_improvement: 6,
        }
    }
}

/// Fills every list of `record` up to the minimums in `policy`.
pub fn fill_shortfalls(record: &mut EvaluationRecord, policy: &InferencePolicy) {
    let role = record.role.clone();

    while record.technical_skills.len() < policy.min_technical_skills {
        let skill = infer_skill(&record.technical_skills, SkillKind::Technical, &role);
        record.technical_skills.push(skill);
    }

    while record.soft_skills.len() < policy.min_soft_skills {
        let skill = infer_skill(&record.soft_skills, SkillKind::Soft, &role);
        record.soft_skills.push(skill);
    }

    while record.strengths.len() < policy.min_strengths {
        let n = record.strengths.len() + 1;
        record.strengths.push(inferred_point("Strength", n));
    }

    while record.areas_for_improvement.len() < policy.min_areas_for_improvement {
        let n = record.areas_for_improvement.len() + 1;
        record.areas_for_improvement.push(inferred_point("Area", n));
    }
}

/// Synthesizes one skill whose name does not collide (case-insensitively) with
/// any entry already in `existing`.
pub fn infer_skill(existing: &[SkillEntry], kind: SkillKind, role: &str) -> SkillEntry {
    let used: Vec<String> = existing.iter().map(|s| s.section.to_lowercase()).collect();
    let is_used = |name: &str| used.iter().any(|u| *u == name.to_lowercase());

    let candidates = match kind {
        SkillKind::Technical => TECHNICAL_CANDIDATES,
        SkillKind::Soft => SOFT_CANDIDATES,
    };

    let section = match candidates.iter().find(|c| !is_used(**c)) {
        Some(name) => name.to_string(),
        None => {
            let mut n = existing.len() + 1;
            loop {
                let name = format!("Inferred {} Skill {}", kind.label(), n);
                if !is_used(&name) {
                    break name;
                }
                n += 1;
            }
        }
    };

    let role = if role.trim().is_empty() { "unknown" } else { role };
    let detail = format!("Inferred from context: {section} assumed based on role {role}.");

    SkillEntry {
        section,
        rating: 3,
        detail,
    }
}

fn inferred_point(kind: &str, n: usize) -> String {
    format!("Inferred {kind} {n}: Inferred based on role context.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str) -> SkillEntry {
        SkillEntry {
            section: name.to_string(),
            rating: 4,
            detail: "seen".to_string(),
        }
    }

    fn empty_record() -> EvaluationRecord {
        EvaluationRecord {
            candidate_name: "Candidate".to_string(),
            role: String::new(),
            interview_date: String::new(),
            summary: String::new(),
            strengths: vec![],
            areas_for_improvement: vec![],
            technical_skills: vec![],
            soft_skills: vec![],
        }
    }

    #[test]
    fn test_first_unused_candidate_is_picked() {
        let existing = vec![skill("python"), skill("JAVA")];
        let s = infer_skill(&existing, SkillKind::Technical, "Backend Engineer");
        assert_eq!(s.section, "JavaScript");
        assert_eq!(s.rating, 3);
        assert_eq!(
            s.detail,
            "Inferred from context: JavaScript assumed based on role Backend Engineer."
        );
    }

    #[test]
    fn test_empty_role_reads_unknown() {
        let s = infer_skill(&[], SkillKind::Soft, "  ");
        assert_eq!(s.section, "Communication");
        assert!(s.detail.ends_with("based on role unknown."));
    }

    #[test]
    fn test_exhausted_candidates_use_next_unused_ordinal() {
        let existing: Vec<_> = SOFT_CANDIDATES.iter().map(|n| skill(n)).collect();
        let s = infer_skill(&existing, SkillKind::Soft, "");
        assert_eq!(s.section, "Inferred Soft Skill 5");
    }

    #[test]
    fn test_ordinal_skips_names_already_taken() {
        let mut existing: Vec<_> = SOFT_CANDIDATES.iter().map(|n| skill(n)).collect();
        existing.push(skill("inferred soft skill 6"));
        let s = infer_skill(&existing, SkillKind::Soft, "");
        assert_eq!(s.section, "Inferred Soft Skill 7");
    }

    #[test]
    fn test_fill_reaches_default_minimums() {
        let mut record = empty_record();
        fill_shortfalls(&mut record, &InferencePolicy::default());
        assert_eq!(record.technical_skills.len(), 10);
        assert_eq!(record.soft_skills.len(), 4);
        assert_eq!(record.strengths.len(), 6);
        assert_eq!(record.areas_for_improvement.len(), 6);
        let names: Vec<_> = record.technical_skills.iter().map(|s| s.section.as_str()).collect();
        assert_eq!(names, TECHNICAL_CANDIDATES);
        assert_eq!(
            record.strengths[0],
            "Inferred Strength 1: Inferred based on role context."
        );
        assert_eq!(
            record.areas_for_improvement[5],
            "Inferred Area 6: Inferred based on role context."
        );
    }

    #[test]
    fn test_fill_only_appends() {
        let mut record = empty_record();
        record.technical_skills = vec![skill("Rust"), skill("SQL")];
        record.strengths = vec!["Calm under pressure".to_string()];
        fill_shortfalls(&mut record, &InferencePolicy::default());
        assert_eq!(record.technical_skills[0], skill("Rust"));
        assert_eq!(record.technical_skills[1], skill("SQL"));
        assert_eq!(record.strengths[0], "Calm under pressure");
        assert_eq!(
            record.strengths[1],
            "Inferred Strength 2: Inferred based on role context."
        );
    }

    #[test]
    fn test_synthesized_names_are_unique() {
        let mut record = empty_record();
        record.technical_skills = vec![skill("sql"), skill("React"), skill("Go")];
        fill_shortfalls(&mut record, &InferencePolicy::default());
        let mut lowered: Vec<_> = record
            .technical_skills
            .iter()
            .map(|s| s.section.to_lowercase())
            .collect();
        let total = lowered.len();
        lowered.sort();
        lowered.dedup();
        assert_eq!(lowered.len(), total);
    }

    #[test]
    fn test_policy_above_candidate_count_falls_back_to_ordinals() {
        let mut record = empty_record();
        let policy = InferencePolicy {
            min_soft_skills: 6,
            ..InferencePolicy::default()
        };
        fill_shortfalls(&mut record, &policy);
        assert_eq!(record.soft_skills[4].section, "Inferred Soft Skill 5");
        assert_eq!(record.soft_skills[5].section, "Inferred Soft Skill 6");
    }
}
