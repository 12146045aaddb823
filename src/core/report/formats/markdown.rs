//! Markdown report generator
//!
//! Topics render as GitHub task-list items, so the report doubles as a
//! checklist when viewed in GitHub, GitLab, or VS Code.

use crate::core::models::ResourceKind;
use crate::core::report::{fill_template, ReportContext, ReportGenerator};
use std::error::Error;
use std::fmt::Write;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/report.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        fill_template(MARKDOWN_TEMPLATE, |key| {
            let value = match key {
                "generated" => ctx.generated_label(),
                "done" => ctx.completion.done.to_string(),
                "total" => ctx.completion.total.to_string(),
                "percent" => format!("{:.1}", ctx.completion.percent),
                "subject_count" => ctx.syllabus.subjects.len().to_string(),
                "resource_count" => ctx.resource_count().to_string(),
                "summary_table" => Self::summary_table(ctx),
                "subjects" => Self::subject_sections(ctx),
                "owner" => escape_cell(ctx.owner()),
                "title" => escape_cell(&ctx.title()),
                _ => return None,
            };
            Some(value)
        })
    }

    fn summary_table(ctx: &ReportContext) -> String {
        let mut table = String::new();
        table.push_str("| Section | Subject | Done | Topics | Progress |\n");
        table.push_str("|---|---|---|---|---|\n");

        for subject in &ctx.completion.subjects {
            let _ = writeln!(
                table,
                "| {} | {} | {} | {} | {:.0}% |",
                escape_cell(&subject.section),
                escape_cell(&subject.name),
                subject.done,
                subject.total,
                subject.percent
            );
        }

        if ctx.completion.subjects.is_empty() {
            table.push_str("| - | No subjects | 0 | 0 | 0% |\n");
        }
        table
    }

    fn subject_sections(ctx: &ReportContext) -> String {
        let mut out = String::new();

        for section in ctx.syllabus.sections() {
            let _ = writeln!(out, "### {section}\n");
            for subject in ctx.syllabus.subjects.iter().filter(|s| s.section == section) {
                let _ = writeln!(out, "#### {}\n", subject.name);
                if subject.topics.is_empty() {
                    out.push_str("_No topics listed._\n\n");
                    continue;
                }
                for topic in &subject.topics {
                    let mark = if ctx.progress.is_done(&subject.id, &topic.name) {
                        'x'
                    } else {
                        ' '
                    };
                    let _ = writeln!(out, "- [{mark}] {}", topic.name);
                    for resource in &topic.resources {
                        let _ = writeln!(
                            out,
                            "  - {} [{}]({})",
                            kind_label(resource.kind),
                            resource.title,
                            resource.url
                        );
                    }
                }
                out.push('\n');
            }
        }
        out
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}

const fn kind_label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Video => "Video:",
        ResourceKind::Document => "Notes:",
        ResourceKind::Link => "Link:",
    }
}

/// Pipes would split a table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
