//! Report Renderer: turns a normalized evaluation into a paginated report view.
//!
//! Pure over `&EvaluationRecord`: nothing here mutates the record. The view is
//! served as JSON or rendered to printable Markdown (see `markdown`).

pub mod markdown;

use chrono::NaiveDate;
use serde::Serialize;

use crate::evaluation::models::{EvaluationRecord, SkillEntry, SkillKind};

pub const DEFAULT_SKILLS_PER_PAGE: usize = 8;
pub const MIN_SKILLS_PER_PAGE: usize = 8;
pub const MAX_SKILLS_PER_PAGE: usize = 10;

pub const EXPORT_PAGE_MARGIN: u32 = 10;
const FALLBACK_EXPORT_NAME: &str = "Candidate";

pub const NO_SUMMARY: &str = "No summary provided";
pub const NO_DATE: &str = "N/A";

pub const CORE_COMPETENCIES_TITLE: &str = "Core Competencies";
pub const DEVELOPMENT_AREAS_TITLE: &str = "Potential Development Areas";

pub fn clamp_skills_per_page(n: usize) -> usize {
    n.clamp(MIN_SKILLS_PER_PAGE, MAX_SKILLS_PER_PAGE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RatingBadge {
    pub label: &'static str,
    pub color: &'static str,
}

/// Label and colour for a 1..=5 rating. Anything else renders as `N/A`.
pub fn rating_badge(rating: u8) -> RatingBadge {
    let (label, color) = match rating {
        5 => ("Excellent", "#4FE567"),
        4 => ("Good", "#4FE567"),
        3 => ("Average", "#FF9C2C"),
        2 => ("Below Average", "#FF9C2C"),
        1 => ("Poor", "#FC1E1E"),
        _ => ("N/A", "#9E9E9E"),
    };
    RatingBadge { label, color }
}

/// `2025-07-23` → `July 23, 2025`. Non-ISO strings pass through; empty → `N/A`.
pub fn format_interview_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return NO_DATE.to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Parameters the client-side PDF export is driven with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOptions {
    pub filename: String,
    pub margin: u32,
}

pub fn export_options(candidate_name: &str) -> ExportOptions {
    let name = candidate_name.trim();
    let name = if name.is_empty() {
        FALLBACK_EXPORT_NAME
    } else {
        name
    };
    let safe: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    ExportOptions {
        filename: format!("{safe}_Report.pdf"),
        margin: EXPORT_PAGE_MARGIN,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportHeader {
    pub candidate_name: String,
    pub role: String,
    pub submitted_on: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillCard {
    /// 1-based position within the whole section, not the page.
    pub index: usize,
    pub section: String,
    pub rating: u8,
    pub label: &'static str,
    pub color: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillPage {
    pub title: String,
    pub cards: Vec<SkillCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointList {
    pub title: &'static str,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub header: ReportHeader,
    pub summary: String,
    /// Omitted when the record has no strengths.
    pub core_competencies: Option<PointList>,
    /// Omitted when the record has no areas for improvement.
    pub development_areas: Option<PointList>,
    pub technical_pages: Vec<SkillPage>,
    pub soft_pages: Vec<SkillPage>,
    pub export: ExportOptions,
}

pub fn build_report(record: &EvaluationRecord, skills_per_page: usize) -> ReportView {
    let per_page = clamp_skills_per_page(skills_per_page);

    let summary = if record.summary.trim().is_empty() {
        NO_SUMMARY.to_string()
    } else {
        record.summary.clone()
    };

    ReportView {
        header: ReportHeader {
            candidate_name: record.candidate_name.clone(),
            role: record.role.clone(),
            submitted_on: format_interview_date(&record.interview_date),
        },
        summary,
        core_competencies: point_list(CORE_COMPETENCIES_TITLE, &record.strengths),
        development_areas: point_list(DEVELOPMENT_AREAS_TITLE, &record.areas_for_improvement),
        technical_pages: paginate(record.skills(SkillKind::Technical), SkillKind::Technical, per_page),
        soft_pages: paginate(record.skills(SkillKind::Soft), SkillKind::Soft, per_page),
        export: export_options(&record.candidate_name),
    }
}

fn point_list(title: &'static str, items: &[String]) -> Option<PointList> {
    (!items.is_empty()).then(|| PointList {
        title,
        items: items.to_vec(),
    })
}

/// Splits skills into pages of `per_page`. Titles are numbered only when the
/// section needs more than one page.
fn paginate(skills: &[SkillEntry], kind: SkillKind, per_page: usize) -> Vec<SkillPage> {
    let chunks: Vec<&[SkillEntry]> = skills.chunks(per_page).collect();
    let page_count = chunks.len();

    chunks
        .into_iter()
        .enumerate()
        .map(|(page_index, chunk)| {
            let base = format!("{} Skills Evaluation", kind.label());
            let title = if page_count > 1 {
                format!("{base} ({})", page_index + 1)
            } else {
                base
            };
            let cards = chunk
                .iter()
                .enumerate()
                .map(|(i, skill)| {
                    let badge = rating_badge(skill.rating);
                    SkillCard {
                        index: page_index * per_page + i + 1,
                        section: skill.section.clone(),
                        rating: skill.rating,
                        label: badge.label,
                        color: badge.color,
                        detail: skill.detail.clone(),
                    }
                })
                .collect();
            SkillPage { title, cards }
        })
        .collect()
}
