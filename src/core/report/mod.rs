//! Syllabus progress reports
//!
//! Renders a syllabus, a student's progress, and the computed completion into
//! Markdown or self-contained HTML. PDF output is produced outside this crate
//! from the HTML report.

pub mod formats;

use crate::core::models::{AcademicProgress, Syllabus};
use crate::core::progress::{syllabus_completion, SyllabusCompletion};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};

/// Everything a report template needs
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Syllabus being reported
    pub syllabus: &'a Syllabus,
    /// Student progress
    pub progress: &'a AcademicProgress,
    /// Completion computed from the two above
    pub completion: SyllabusCompletion,
    /// Report timestamp
    pub generated_at: DateTime<Utc>,
}

impl<'a> ReportContext<'a> {
    /// Build a context, computing completion
    #[must_use]
    pub fn new(
        syllabus: &'a Syllabus,
        progress: &'a AcademicProgress,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            syllabus,
            progress,
            completion: syllabus_completion(syllabus, progress),
            generated_at,
        }
    }

    /// Report title
    #[must_use]
    pub fn title(&self) -> String {
        format!("Syllabus progress: {}", self.syllabus.key)
    }

    /// Student the report is for
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.progress.owner
    }

    /// Total resource links across the syllabus
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.syllabus.subjects.iter().map(|s| s.resource_count()).sum()
    }

    /// Timestamp formatted for display
    #[must_use]
    pub fn generated_label(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(ctx)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(output_path, content)?;
        Ok(())
    }

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}

/// Fill `{{key}}` placeholders in a single left-to-right pass
///
/// Substituted values are appended as-is and never scanned again, so text
/// from the syllabus that looks like a placeholder comes out literally.
/// Keys `lookup` does not know are kept unchanged.
pub fn fill_template<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match lookup(key) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render with the generator matching `format`
///
/// # Errors
/// Returns an error if rendering fails
pub fn render(format: ReportFormat, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
    match format {
        ReportFormat::Markdown => MarkdownReporter::new().render(ctx),
        ReportFormat::Html => HtmlReporter::new().render(ctx),
    }
}

/// Write a report with the generator matching `format`
///
/// # Errors
/// Returns an error if rendering or writing fails
pub fn generate(
    format: ReportFormat,
    ctx: &ReportContext,
    output_path: &Path,
) -> Result<(), Box<dyn Error>> {
    match format {
        ReportFormat::Markdown => MarkdownReporter::new().generate(ctx, output_path),
        ReportFormat::Html => HtmlReporter::new().generate(ctx, output_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(key: &str) -> Option<String> {
        match key {
            "name" => Some("{{name}} and {{other}}".to_string()),
            "other" => Some("X".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        assert_eq!(
            fill_template("Hi {{name}}, {{other}}!", lookup),
            "Hi {{name}} and {{other}}, X!"
        );
    }

    #[test]
    fn test_fill_template_keeps_unknown_and_unterminated() {
        assert_eq!(fill_template("{{missing}} {{other}}", lookup), "{{missing}} X");
        assert_eq!(fill_template("tail {{other", lookup), "tail {{other");
    }
}
