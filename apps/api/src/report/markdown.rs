//! Printable Markdown rendering of a `ReportView`.
//!
//! Each skill page ends with a horizontal rule so printers can break there.

use std::fmt::Write;

use crate::report::{PointList, ReportView, SkillPage};

pub fn render_markdown(view: &ReportView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}", view.header.candidate_name);
    if !view.header.role.trim().is_empty() {
        let _ = writeln!(out, "\n**Role:** {}", view.header.role);
    }
    let _ = writeln!(out, "\nSubmitted on {}\n", view.header.submitted_on);

    let _ = writeln!(out, "## Summary\n\n{}\n", view.summary);

    for list in [&view.core_competencies, &view.development_areas]
        .into_iter()
        .flatten()
    {
        write_point_list(&mut out, list);
    }

    for page in view.technical_pages.iter().chain(&view.soft_pages) {
        write_skill_page(&mut out, page);
    }

    out
}

fn write_point_list(out: &mut String, list: &PointList) {
    let _ = writeln!(out, "## {}\n", list.title);
    for item in &list.items {
        let _ = writeln!(out, "- {item}");
    }
    out.push('\n');
}

fn write_skill_page(out: &mut String, page: &SkillPage) {
    let _ = writeln!(out, "## {}\n", page.title);
    for card in &page.cards {
        let _ = writeln!(
            out,
            "{}. **{}** ({}/5, {})\n   {}",
            card.index, card.section, card.rating, card.label, card.detail
        );
    }
    out.push_str("\n---\n\n");
}
