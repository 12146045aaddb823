//! Report command handler

use super::{acting_profile, open_store};
use crate::args::SyllabusKeyArgs;
use chrono::Utc;
use std::path::{Path, PathBuf};
use studyhub::config::Config;
use studyhub::core::report::{self, ReportContext, ReportFormat};
use studyhub::{error, info};

/// Generate a progress report for a syllabus
///
/// # Errors
/// Returns an error if the format is unsupported, the syllabus is missing, or
/// the report cannot be written
pub fn run(
    key: &SyllabusKeyArgs,
    format: &str,
    output: Option<&Path>,
    config: &Config,
) -> Result<(), String> {
    let format: ReportFormat = format.parse()?;
    let key = key.to_key()?;
    let store = open_store(config);
    let uid = acting_profile(config)?.uid;

    let syllabus = store
        .load_syllabus(&key)
        .map_err(|e| format!("Failed to load syllabus: {e}"))?
        .ok_or_else(|| format!("No syllabus stored for {key}"))?;
    let progress = store
        .load_progress(&uid)
        .map_err(|e| format!("Failed to load progress: {e}"))?;

    let output_path = output.map_or_else(
        || default_output_path(&config.paths.reports_dir, &syllabus.key.doc_id(), &uid, format),
        Path::to_path_buf,
    );

    let ctx = ReportContext::new(&syllabus, &progress, Utc::now());
    report::generate(format, &ctx, &output_path).map_err(|e| {
        error!("Report generation failed for {key}: {e}");
        format!("Failed to write report {}: {e}", output_path.display())
    })?;

    info!("Report written to {}", output_path.display());
    println!(
        "✓ {format} report generated: {} ({:.1}% complete)",
        output_path.display(),
        ctx.completion.percent
    );
    Ok(())
}

fn default_output_path(reports_dir: &str, doc_id: &str, uid: &str, format: ReportFormat) -> PathBuf {
    PathBuf::from(reports_dir).join(format!("{doc_id}_{uid}.{}", format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let path = default_output_path("/r", "exam_jee", "u1", ReportFormat::Markdown);
        assert_eq!(path, PathBuf::from("/r/exam_jee_u1.md"));
    }
}
