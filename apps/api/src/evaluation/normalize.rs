//! Response Normalizer: turns a raw model reply into a complete `EvaluationRecord`.
//!
//! The model's output shape is not guaranteed, so every field is repaired rather
//! than rejected. The only failure is a reply with no recoverable JSON object.
//!
//! Steps: extract JSON → complete fields → coerce types → repair skill entries →
//! append inferred entries for any shortfall.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::evaluation::inference::{fill_shortfalls, InferencePolicy};
use crate::evaluation::models::{EvaluationRecord, SkillEntry, SkillKind};

/// Used when the reply carries no candidate name.
pub const PLACEHOLDER_CANDIDATE_NAME: &str = "Candidate";
pub const UNNAMED_SKILL: &str = "Unnamed Skill";
pub const NO_DETAILS: &str = "No details provided";
pub const DEFAULT_RATING: u8 = 3;

// Ordered lookup keys per field. The first key holding a usable value wins:
// non-empty text for scalar fields, an array for list fields.
const CANDIDATE_NAME_KEYS: &[&str] = &["Candidate Name", "candidateName", "candidate_name", "Name"];
const ROLE_KEYS: &[&str] = &["Role", "role"];
const INTERVIEW_DATE_KEYS: &[&str] = &["Interview Date", "interviewDate", "interview_date"];
const SUMMARY_KEYS: &[&str] = &["Summary", "summary"];
const STRENGTHS_KEYS: &[&str] = &["Strengths", "strengths"];
const AREAS_KEYS: &[&str] = &[
    "Areas for Improvement",
    "areasForImprovement",
    "areas_for_improvement",
];
const TECHNICAL_KEYS: &[&str] = &["Technical Skills", "technicalSkills", "technical_skills"];
const SOFT_KEYS: &[&str] = &["Soft Skills", "softSkills", "soft_skills"];

const SECTION_KEYS: &[&str] = &["Section", "section", "name", "skill"];
const RATING_KEYS: &[&str] = &["rating", "Rating", "score"];

static RE_FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json|JSON)?[ \t]*\r?\n(.*?)\r?\n[ \t]*```").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("model reply is empty")]
    EmptyReply,

    #[error("no JSON object could be recovered from the model reply")]
    NoJsonObject,
}

/// Caller-supplied values used when the reply leaves a field empty.
#[derive(Debug, Clone, Default)]
pub struct NormalizeHints {
    pub fallback_role: Option<String>,
    pub fallback_date: Option<String>,
    pub policy: InferencePolicy,
}

/// Normalizes a raw model reply. Pure and deterministic.
pub fn normalize(raw_reply: &str, hints: &NormalizeHints) -> Result<EvaluationRecord, NormalizeError> {
    let object = extract_json_object(raw_reply)?;
    Ok(normalize_object(&object, hints))
}

/// Locates a JSON object in `raw_reply`.
///
/// Order: fenced code block, whole reply, then the outermost `{ … }` span.
pub fn extract_json_object(raw_reply: &str) -> Result<Map<String, Value>, NormalizeError> {
    let trimmed = raw_reply.trim();
    if trimmed.is_empty() {
        return Err(NormalizeError::EmptyReply);
    }

    let fenced = RE_FENCED_BLOCK
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());

    let braced = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&trimmed[start..=end]),
        _ => None,
    };

    fenced
        .into_iter()
        .chain(std::iter::once(trimmed))
        .chain(braced)
        .find_map(parse_object)
        .ok_or(NormalizeError::NoJsonObject)
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Builds a complete record from an already-parsed JSON object.
pub fn normalize_object(object: &Map<String, Value>, hints: &NormalizeHints) -> EvaluationRecord {
    let mut candidate_name = string_field(object, CANDIDATE_NAME_KEYS);
    if candidate_name.is_empty() {
        candidate_name = PLACEHOLDER_CANDIDATE_NAME.to_string();
    }

    let mut role = string_field(object, ROLE_KEYS);
    if role.is_empty() {
        role = non_empty(hints.fallback_role.as_deref()).unwrap_or_default();
    }

    let mut interview_date = string_field(object, INTERVIEW_DATE_KEYS);
    if interview_date.is_empty() {
        interview_date = non_empty(hints.fallback_date.as_deref()).unwrap_or_default();
    }

    let mut record = EvaluationRecord {
        candidate_name,
        role,
        interview_date,
        summary: string_field(object, SUMMARY_KEYS),
        strengths: string_list(object, STRENGTHS_KEYS),
        areas_for_improvement: string_list(object, AREAS_KEYS),
        technical_skills: skill_list(object, TECHNICAL_KEYS, SkillKind::Technical),
        soft_skills: skill_list(object, SOFT_KEYS, SkillKind::Soft),
    };

    fill_shortfalls(&mut record, &hints.policy);
    record
}

// ────────────────────────────────────────────────────────────────────────────
// Field helpers
// ────────────────────────────────────────────────────────────────────────────

fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| object.get(*k))
}

/// First alias whose value is an array. Null or mistyped aliases are skipped.
fn lookup_array<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter().find_map(|k| object.get(*k).and_then(Value::as_array))
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(String::from)
}

/// Scalar text of a value: strings trimmed, numbers and booleans stringified.
/// Anything else counts as missing.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_field(object: &Map<String, Value>, keys: &[&str]) -> String {
    first_non_empty(object, keys).unwrap_or_default()
}

/// First key among `keys` whose value has non-empty text.
fn first_non_empty(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| object.get(*k))
        .filter_map(scalar_text)
        .find(|s| !s.is_empty())
}

fn string_list(object: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    lookup_array(object, keys)
        .map(|items| items.iter().filter_map(list_item_text).collect())
        .unwrap_or_default()
}

/// Text of a strength/area item. `{"Title": "detail"}` objects read as `"Title: detail"`.
/// Items with no text (null, blank, `{}`) are dropped.
fn list_item_text(item: &Value) -> Option<String> {
    let text = match item {
        Value::Null => None,
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .filter_map(|(k, v)| scalar_text(v).map(|v| format!("{k}: {v}")))
                .collect();
            Some(parts.join("; "))
        }
        Value::Array(_) => Some(item.to_string()),
        other => scalar_text(other),
    };
    text.filter(|t| !t.is_empty())
}

fn skill_list(object: &Map<String, Value>, keys: &[&str], kind: SkillKind) -> Vec<SkillEntry> {
    lookup_array(object, keys)
        .map(|items| items.iter().map(|item| repair_skill(item, kind)).collect())
        .unwrap_or_default()
}

/// Repairs one skill entry.
///
/// A bare string is taken as the skill name; any other non-object is rebuilt
/// from defaults.
pub fn repair_skill(item: &Value, kind: SkillKind) -> SkillEntry {
    let empty = Map::new();
    let (object, bare_name) = match item {
        Value::Object(map) => (map, None),
        Value::String(s) => (&empty, non_empty(Some(s.as_str()))),
        _ => (&empty, None),
    };

    let section = bare_name
        .or_else(|| first_non_empty(object, SECTION_KEYS))
        .unwrap_or_else(|| UNNAMED_SKILL.to_string());

    let rating = lookup(object, RATING_KEYS)
        .map(coerce_rating)
        .unwrap_or(DEFAULT_RATING);

    let detail = first_non_empty(object, &[kind.detail_key(), kind.other_detail_key()])
        .unwrap_or_else(|| NO_DETAILS.to_string());

    SkillEntry {
        section,
        rating,
        detail,
    }
}

/// Coerces a rating to an integer in 1..=5.
///
/// Numbers and numeric strings are rounded then clamped; a rating of 0 clamps to 1.
/// Empty, non-numeric and non-finite input yields the default of 3.
pub fn coerce_rating(value: &Value) -> u8 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(r) if r.is_finite() => r.round().clamp(1.0, 5.0) as u8,
        _ => DEFAULT_RATING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hints() -> NormalizeHints {
        NormalizeHints::default()
    }

    #[test]
    fn test_ana_li_scenario() {
        let reply = r#"{"Candidate Name":"Ana Li","Technical Skills":[{"Section":"SQL","rating":"7"}]}"#;
        let record = normalize(reply, &hints()).unwrap();
        assert_eq!(record.candidate_name, "Ana Li");
        assert_eq!(record.technical_skills.len(), 10);
        let sql = &record.technical_skills[0];
        assert_eq!(sql.section, "SQL");
        assert_eq!(sql.rating, 5);
        assert_eq!(sql.detail, "No details provided");
        let names: Vec<_> = record.technical_skills.iter().map(|s| s.section.as_str()).collect();
        assert!(!names[1..].iter().any(|n| n.eq_ignore_ascii_case("sql")));
        assert!(record.technical_skills[1..].iter().all(|s| s.rating == 3));
    }

    #[test]
    fn test_missing_soft_skills_are_all_synthesized() {
        let reply = r#"{"Candidate Name":"Ana Li","Role":"Analyst"}"#;
        let record = normalize(reply, &hints()).unwrap();
        assert_eq!(record.soft_skills.len(), 4);
        assert!(record.soft_skills.iter().all(|s| s.rating == 3));
        let names: Vec<_> = record.soft_skills.iter().map(|s| s.section.as_str()).collect();
        assert_eq!(names, ["Communication", "Teamwork", "Problem Solving", "Adaptability"]);
        assert!(record.soft_skills[0].detail.contains("role Analyst"));
    }

    #[test]
    fn test_empty_reply_is_parse_error() {
        assert_eq!(normalize("", &hints()), Err(NormalizeError::EmptyReply));
        assert_eq!(normalize("   \n", &hints()), Err(NormalizeError::EmptyReply));
    }

    #[test]
    fn test_non_json_reply_is_parse_error() {
        assert_eq!(
            normalize("not json at all", &hints()),
            Err(NormalizeError::NoJsonObject)
        );
    }

    #[test]
    fn test_non_object_json_is_parse_error() {
        assert_eq!(normalize("[1, 2, 3]", &hints()), Err(NormalizeError::NoJsonObject));
        assert_eq!(normalize("42", &hints()), Err(NormalizeError::NoJsonObject));
    }

    #[test]
    fn test_fenced_reply_matches_unwrapped() {
        let body = r#"{"Candidate Name":"Bo","Strengths":["Focus: stays on task"]}"#;
        let fenced = format!("Here is the evaluation:\n```json\n{body}\n```\nThanks!");
        let plain_fence = format!("```\n{body}\n```");
        let direct = normalize(body, &hints()).unwrap();
        assert_eq!(normalize(&fenced, &hints()).unwrap(), direct);
        assert_eq!(normalize(&plain_fence, &hints()).unwrap(), direct);
    }

    #[test]
    fn test_prose_around_object_is_recovered() {
        let reply = r#"Sure! {"Candidate Name": "Cy"} Let me know if you need more."#;
        let record = normalize(reply, &hints()).unwrap();
        assert_eq!(record.candidate_name, "Cy");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let replies = [
            r#"{"Candidate Name":"Ana Li","Technical Skills":[{"Section":"SQL","rating":"7"}]}"#,
            r#"{"Role":"SRE","Soft Skills":[{"Section":"teamwork","rating":0,"comments":"pairs well"}],"Strengths":"oops"}"#,
            r#"{}"#,
        ];
        for reply in replies {
            let first = normalize(reply, &hints()).unwrap();
            let serialized = serde_json::to_string(&first).unwrap();
            let second = normalize(&serialized, &hints()).unwrap();
            assert_eq!(first, second, "reply: {reply}");
        }
    }

    #[test]
    fn test_missing_fields_default() {
        let record = normalize("{}", &hints()).unwrap();
        assert_eq!(record.candidate_name, PLACEHOLDER_CANDIDATE_NAME);
        assert_eq!(record.role, "");
        assert_eq!(record.interview_date, "");
        assert_eq!(record.summary, "");
        assert_eq!(record.strengths.len(), 6);
        assert_eq!(record.areas_for_improvement.len(), 6);
        assert_eq!(record.technical_skills.len(), 10);
        assert_eq!(record.soft_skills.len(), 4);
    }

    #[test]
    fn test_fallback_date_and_role_fill_empty_fields() {
        let h = NormalizeHints {
            fallback_role: Some("Platform Engineer".to_string()),
            fallback_date: Some("2025-03-14".to_string()),
            ..NormalizeHints::default()
        };
        let record = normalize(r#"{"Interview Date": "  "}"#, &h).unwrap();
        assert_eq!(record.interview_date, "2025-03-14");
        assert_eq!(record.role, "Platform Engineer");

        let record = normalize(r#"{"Interview Date": "2024-01-02", "Role": "QA"}"#, &h).unwrap();
        assert_eq!(record.interview_date, "2024-01-02");
        assert_eq!(record.role, "QA");
    }

    #[test]
    fn test_non_sequence_lists_become_empty_then_filled() {
        let reply = r#"{"Strengths": "great", "Technical Skills": {"Section": "Go"}, "Soft Skills": null}"#;
        let record = normalize(reply, &hints()).unwrap();
        assert!(record.strengths[0].starts_with("Inferred Strength 1"));
        assert_eq!(record.technical_skills[0].section, "Python");
        assert_eq!(record.soft_skills[0].section, "Communication");
    }

    #[test]
    fn test_rating_coercion() {
        assert_eq!(coerce_rating(&json!("7")), 5);
        assert_eq!(coerce_rating(&json!(" 4 ")), 4);
        assert_eq!(coerce_rating(&json!(4.6)), 5);
        assert_eq!(coerce_rating(&json!(2.2)), 2);
        assert_eq!(coerce_rating(&json!(-3)), 1);
        assert_eq!(coerce_rating(&json!(0)), 1);
        assert_eq!(coerce_rating(&json!("")), 3);
        assert_eq!(coerce_rating(&json!("excellent")), 3);
        assert_eq!(coerce_rating(&json!("NaN")), 3);
        assert_eq!(coerce_rating(&json!(null)), 3);
        assert_eq!(coerce_rating(&json!(true)), 3);
        assert_eq!(coerce_rating(&json!(1e300)), 5);
    }

    #[test]
    fn test_every_rating_shape_lands_in_range() {
        let reply = json!({
            "Technical Skills": [
                {"Section": "A", "rating": "3.7"},
                {"Section": "B", "rating": 99},
                {"Section": "C", "rating": -1.5},
                {"Section": "D", "rating": "four"},
                {"Section": "E"}
            ]
        })
        .to_string();
        let record = normalize(&reply, &hints()).unwrap();
        let ratings: Vec<_> = record.technical_skills[..5].iter().map(|s| s.rating).collect();
        assert_eq!(ratings, [4, 5, 1, 3, 3]);
        assert!(record.technical_skills.iter().all(|s| (1..=5).contains(&s.rating)));
    }

    #[test]
    fn test_skill_detail_falls_back_to_other_kind() {
        let tech = repair_skill(&json!({"Section": "Go", "evidence": "built a CLI"}), SkillKind::Technical);
        assert_eq!(tech.detail, "built a CLI");

        let soft = repair_skill(&json!({"Section": "Empathy", "comments": "listened"}), SkillKind::Soft);
        assert_eq!(soft.detail, "listened");

        let both = repair_skill(
            &json!({"Section": "Go", "comments": "", "evidence": "fallback"}),
            SkillKind::Technical,
        );
        assert_eq!(both.detail, "fallback");
    }

    #[test]
    fn test_skill_section_defaults() {
        let unnamed = repair_skill(&json!({"Section": "", "rating": 4}), SkillKind::Technical);
        assert_eq!(unnamed.section, UNNAMED_SKILL);
        assert_eq!(unnamed.rating, 4);
        assert_eq!(unnamed.detail, NO_DETAILS);

        let bare = repair_skill(&json!("Kubernetes"), SkillKind::Technical);
        assert_eq!(bare.section, "Kubernetes");
        assert_eq!(bare.rating, DEFAULT_RATING);

        let junk = repair_skill(&json!(12), SkillKind::Soft);
        assert_eq!(junk.section, UNNAMED_SKILL);
    }

    #[test]
    fn test_list_items_are_coerced_to_text() {
        let reply = json!({
            "Strengths": ["  Curious ", 42, null, {"Ownership": "drove the migration"}]
        })
        .to_string();
        let record = normalize(&reply, &hints()).unwrap();
        assert_eq!(record.strengths[0], "Curious");
        assert_eq!(record.strengths[1], "42");
        assert_eq!(record.strengths[2], "Ownership: drove the migration");
        assert_eq!(record.strengths.len(), 6);
    }

    #[test]
    fn test_camel_case_aliases_are_read() {
        let reply = r#"{"candidateName":"Dee","technicalSkills":[{"section":"Rust","rating":5,"comments":"fluent"}]}"#;
        let record = normalize(reply, &hints()).unwrap();
        assert_eq!(record.candidate_name, "Dee");
        assert_eq!(record.technical_skills[0].section, "Rust");
        assert_eq!(record.technical_skills[0].detail, "fluent");
    }

    #[test]
    fn test_numeric_candidate_name_is_stringified() {
        let record = normalize(r#"{"Candidate Name": 1234}"#, &hints()).unwrap();
        assert_eq!(record.candidate_name, "1234");
    }

    #[test]
    fn test_empty_alias_does_not_hide_populated_one() {
        let record = normalize(r#"{"Candidate Name": "", "candidateName": "Ana Li"}"#, &hints()).unwrap();
        assert_eq!(record.candidate_name, "Ana Li");

        let reply = json!({
            "Role": null,
            "role": "Backend Engineer",
            "Technical Skills": null,
            "technicalSkills": [{"section": "Rust", "rating": 4, "comments": "idiomatic"}]
        })
        .to_string();
        let record = normalize(&reply, &hints()).unwrap();
        assert_eq!(record.role, "Backend Engineer");
        assert_eq!(record.technical_skills[0].section, "Rust");
        assert_eq!(record.technical_skills[0].rating, 4);
        assert_eq!(record.technical_skills.len(), 10);
    }

    #[test]
    fn test_blank_list_items_are_dropped() {
        let reply = json!({
            "Strengths": [{}, "  ", "", "Clear communicator"],
            "Areas for Improvement": [{"Testing": null}, "Write more tests"]
        })
        .to_string();
        let record = normalize(&reply, &hints()).unwrap();
        assert_eq!(record.strengths[0], "Clear communicator");
        assert_eq!(record.areas_for_improvement[0], "Write more tests");
        assert_eq!(record.strengths.len(), 6);
        assert!(record.strengths.iter().all(|s| !s.trim().is_empty()));
        assert!(record.areas_for_improvement.iter().all(|s| !s.trim().is_empty()));
    }
}
