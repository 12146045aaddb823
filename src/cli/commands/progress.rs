//! Progress command handler

use super::{acting_profile, open_store, resolve_subject};
use crate::args::SyllabusKeyArgs;
use studyhub::config::Config;
use studyhub::core::progress::{mark_topic, syllabus_completion, SyllabusCompletion};

const BAR_WIDTH: usize = 20;

/// Optional topic to mark before printing
pub struct MarkRequest {
    /// Subject name or id
    pub subject: String,
    /// Topic name
    pub topic: String,
    /// Target state
    pub done: bool,
}

/// Print syllabus completion for the acting user
///
/// # Errors
/// Returns an error if the syllabus is missing, the topic to mark is unknown,
/// or the store fails
pub fn run(key: &SyllabusKeyArgs, mark: Option<MarkRequest>, config: &Config) -> Result<(), String> {
    let key = key.to_key()?;
    let store = open_store(config);
    let uid = acting_profile(config)?.uid;

    let syllabus = store
        .load_syllabus(&key)
        .map_err(|e| format!("Failed to load syllabus: {e}"))?
        .ok_or_else(|| format!("No syllabus stored for {key}"))?;
    let mut progress = store
        .load_progress(&uid)
        .map_err(|e| format!("Failed to load progress: {e}"))?;

    if let Some(req) = mark {
        let subject = resolve_subject(&syllabus, &req.subject)
            .ok_or_else(|| format!("No subject '{}' in {key}", req.subject))?;
        let changed = mark_topic(&syllabus, &mut progress, &subject.id, &req.topic, req.done)?;
        if changed {
            store
                .save_progress(&progress)
                .map_err(|e| format!("Failed to save progress: {e}"))?;
        }
        let state = if req.done { "done" } else { "not done" };
        println!("✓ {} / {} marked {state}", subject.name, req.topic);
    }

    print_completion(&syllabus.key.to_string(), &syllabus_completion(&syllabus, &progress));
    Ok(())
}

fn print_completion(title: &str, completion: &SyllabusCompletion) {
    println!("\n=== {title} ===\n");
    let mut section = "";
    for subject in &completion.subjects {
        if subject.section != section {
            section = subject.section.as_str();
            println!("{section}");
        }
        println!(
            "  {:<28} {} {:>3}/{:<3} {:>5.1}%",
            subject.name,
            bar(subject.percent),
            subject.done,
            subject.total,
            subject.percent
        );
    }
    println!(
        "\nOverall: {}/{} topics, {:.1}%",
        completion.done, completion.total, completion.percent
    );
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
