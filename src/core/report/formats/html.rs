//! HTML report generator
//!
//! Produces a single self-contained page with embedded CSS. The page is laid
//! out for printing, which is how PDF copies are made.

use crate::core::report::{fill_template, ReportContext, ReportGenerator};
use std::error::Error;
use std::fmt::Write;

/// Embedded HTML report template
const HTML_TEMPLATE: &str = include_str!("../templates/report.html");

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        fill_template(HTML_TEMPLATE, |key| {
            let value = match key {
                "generated" => ctx.generated_label(),
                "done" => ctx.completion.done.to_string(),
                "total" => ctx.completion.total.to_string(),
                "percent" => format!("{:.1}", ctx.completion.percent),
                "subject_count" => ctx.syllabus.subjects.len().to_string(),
                "resource_count" => ctx.resource_count().to_string(),
                "summary_rows" => Self::summary_rows(ctx),
                "subjects" => Self::subject_cards(ctx),
                "owner" => escape_html(ctx.owner()),
                "title" => escape_html(&ctx.title()),
                _ => return None,
            };
            Some(value)
        })
    }

    fn summary_rows(ctx: &ReportContext) -> String {
        let mut rows = String::new();
        for subject in &ctx.completion.subjects {
            let _ = writeln!(
                rows,
                "        <tr><td>{}</td><td>{}</td><td>{} / {}</td>\
                 <td><div class=\"bar\"><span style=\"width: {:.0}%\"></span></div> {:.0}%</td></tr>",
                escape_html(&subject.section),
                escape_html(&subject.name),
                subject.done,
                subject.total,
                subject.percent,
                subject.percent
            );
        }
        if rows.is_empty() {
            rows.push_str("        <tr><td colspan=\"4\">No subjects</td></tr>\n");
        }
        rows
    }

    fn subject_cards(ctx: &ReportContext) -> String {
        let mut out = String::new();

        for section in ctx.syllabus.sections() {
            let _ = writeln!(out, "    <h3>{}</h3>", escape_html(section));
            for subject in ctx.syllabus.subjects.iter().filter(|s| s.section == section) {
                let _ = writeln!(
                    out,
                    "    <div class=\"subject\">\n      <h4>{}</h4>",
                    escape_html(&subject.name)
                );
                if subject.topics.is_empty() {
                    out.push_str("      <p class=\"muted\">No topics listed.</p>\n    </div>\n");
                    continue;
                }
                out.push_str("      <ul>\n");
                for topic in &subject.topics {
                    let done = ctx.progress.is_done(&subject.id, &topic.name);
                    let _ = write!(
                        out,
                        "        <li class=\"{}\">{} {}",
                        if done { "done" } else { "todo" },
                        if done { "&#9745;" } else { "&#9744;" },
                        escape_html(&topic.name)
                    );
                    for resource in &topic.resources {
                        let _ = write!(
                            out,
                            " <a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
                            escape_html(&resource.url),
                            escape_html(&resource.title)
                        );
                    }
                    out.push_str("</li>\n");
                }
                out.push_str("      </ul>\n    </div>\n");
            }
        }
        out
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
