use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which of the two skill lists an entry belongs to.
///
/// The kind decides the wire name of the detail slot (`comments` vs `evidence`)
/// and which candidate list the inference step draws names from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Technical,
    Soft,
}

impl SkillKind {
    /// Wire key holding the free-text detail for this kind.
    pub fn detail_key(&self) -> &'static str {
        match self {
            SkillKind::Technical => "comments",
            SkillKind::Soft => "evidence",
        }
    }

    /// The detail key of the other kind, used as a fallback source.
    pub fn other_detail_key(&self) -> &'static str {
        match self {
            SkillKind::Technical => "evidence",
            SkillKind::Soft => "comments",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillKind::Technical => "Technical",
            SkillKind::Soft => "Soft",
        }
    }
}

/// One rated skill. `detail` is serialized as `comments` for technical skills
/// and `evidence` for soft skills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillEntry {
    pub section: String,
    /// Always in 1..=5 after normalization.
    pub rating: u8,
    pub detail: String,
}

/// The canonical evaluation produced from one model reply.
///
/// Serialized with the same keys the model is prompted to emit, so a cached copy
/// can be fed back through the normalizer unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    #[serde(rename = "Candidate Name")]
    pub candidate_name: String,
    #[serde(rename = "Role", default)]
    pub role: String,
    #[serde(rename = "Interview Date", default)]
    pub interview_date: String,
    #[serde(rename = "Summary", default)]
    pub summary: String,
    #[serde(rename = "Strengths", default)]
    pub strengths: Vec<String>,
    #[serde(rename = "Areas for Improvement", default)]
    pub areas_for_improvement: Vec<String>,
    #[serde(rename = "Technical Skills", default, with = "technical_skills")]
    pub technical_skills: Vec<SkillEntry>,
    #[serde(rename = "Soft Skills", default, with = "soft_skills")]
    pub soft_skills: Vec<SkillEntry>,
}

impl EvaluationRecord {
    pub fn skills(&self, kind: SkillKind) -> &[SkillEntry] {
        match kind {
            SkillKind::Technical => &self.technical_skills,
            SkillKind::Soft => &self.soft_skills,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire shapes for the two skill lists
// ────────────────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct TechnicalSkillWire {
    #[serde(rename = "Section")]
    section: String,
    rating: u8,
    comments: String,
}

#[derive(Serialize, Deserialize)]
struct SoftSkillWire {
    #[serde(rename = "Section")]
    section: String,
    rating: u8,
    evidence: String,
}

mod technical_skills {
    use super::*;

    pub fn serialize<S: Serializer>(skills: &[SkillEntry], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(skills.iter().map(|e| TechnicalSkillWire {
            section: e.section.clone(),
            rating: e.rating,
            comments: e.detail.clone(),
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<SkillEntry>, D::Error> {
        let wire = Vec::<TechnicalSkillWire>::deserialize(d)?;
        Ok(wire
            .into_iter()
            .map(|w| SkillEntry {
                section: w.section,
                rating: w.rating,
                detail: w.comments,
            })
            .collect())
    }
}

mod soft_skills {
    use super::*;

    pub fn serialize<S: Serializer>(skills: &[SkillEntry], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(skills.iter().map(|e| SoftSkillWire {
            section: e.section.clone(),
            rating: e.rating,
            evidence: e.detail.clone(),
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<SkillEntry>, D::Error> {
        let wire = Vec::<SoftSkillWire>::deserialize(d)?;
        Ok(wire
            .into_iter()
            .map(|w| SkillEntry {
                section: w.section,
                rating: w.rating,
                detail: w.evidence,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> EvaluationRecord {
        EvaluationRecord {
            candidate_name: "Ana Li".to_string(),
            role: "Data Engineer".to_string(),
            interview_date: "2025-07-23".to_string(),
            summary: String::new(),
            strengths: vec!["Clear thinking".to_string()],
            areas_for_improvement: vec![],
            technical_skills: vec![SkillEntry {
                section: "SQL".to_string(),
                rating: 5,
                detail: "Wrote window functions".to_string(),
            }],
            soft_skills: vec![SkillEntry {
                section: "Communication".to_string(),
                rating: 4,
                detail: "Explained trade-offs".to_string(),
            }],
        }
    }

    #[test]
    fn test_record_uses_prompt_keys_on_the_wire() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["Candidate Name"], json!("Ana Li"));
        assert_eq!(value["Areas for Improvement"], json!([]));
        assert_eq!(
            value["Technical Skills"][0],
            json!({"Section": "SQL", "rating": 5, "comments": "Wrote window functions"})
        );
        assert_eq!(
            value["Soft Skills"][0],
            json!({"Section": "Communication", "rating": 4, "evidence": "Explained trade-offs"})
        );
    }

    #[test]
    fn test_record_reads_back_from_cache_form() {
        let text = serde_json::to_string(&sample()).unwrap();
        let back: EvaluationRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_detail_keys_are_swapped_between_kinds() {
        assert_eq!(SkillKind::Technical.detail_key(), "comments");
        assert_eq!(SkillKind::Technical.other_detail_key(), "evidence");
        assert_eq!(SkillKind::Soft.detail_key(), "evidence");
        assert_eq!(SkillKind::Soft.other_detail_key(), "comments");
    }
}
