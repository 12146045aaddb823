//! Syllabus command handler

use super::{acting_profile, open_store, short_id};
use crate::args::{SyllabusKeyArgs, SyllabusSubcommand};
use std::fs;
use std::path::Path;
use studyhub::config::Config;
use studyhub::core::models::{Subject, Syllabus};
use studyhub::core::syllabus::{merge_subjects, parse_raw_syllabus};
use studyhub::{info, verbose};

/// Dispatch syllabus subcommands
///
/// # Errors
/// Returns an error if a file cannot be read or written, the syllabus is
/// missing, or the acting user may not import
pub fn run(subcommand: SyllabusSubcommand, config: &Config) -> Result<(), String> {
    match subcommand {
        SyllabusSubcommand::Parse { input_file, output } => {
            parse(&input_file, output.as_deref())
        }
        SyllabusSubcommand::Import { input_file, key } => import(&input_file, &key, config),
        SyllabusSubcommand::Show { key } => show(&key, config),
    }
}

fn read_subjects(input_file: &Path) -> Result<Vec<Subject>, String> {
    let text = fs::read_to_string(input_file)
        .map_err(|e| format!("Failed to read {}: {e}", input_file.display()))?;
    let subjects = parse_raw_syllabus(&text);
    info!(
        "Parsed {} subject(s) from {}",
        subjects.len(),
        input_file.display()
    );
    Ok(subjects)
}

fn summary(subjects: &[Subject]) -> String {
    let topics: usize = subjects.iter().map(|s| s.topics.len()).sum();
    let mut sections: Vec<&str> = Vec::new();
    for subject in subjects {
        if !sections.contains(&subject.section.as_str()) {
            sections.push(&subject.section);
        }
    }
    format!(
        "{} subject(s), {topics} topic(s) in {} section(s)",
        subjects.len(),
        sections.len()
    )
}

fn parse(input_file: &Path, output: Option<&Path>) -> Result<(), String> {
    let subjects = read_subjects(input_file)?;
    let json = serde_json::to_string_pretty(&subjects)
        .map_err(|e| format!("Failed to serialize syllabus: {e}"))?;

    match output {
        Some(path) => {
            fs::write(path, json)
                .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            println!("✓ Parsed {} -> {}", summary(&subjects), path.display());
        }
        None => {
            println!("{json}");
            // keep stdout pure JSON
            eprintln!("✓ Parsed {}", summary(&subjects));
        }
    }
    Ok(())
}

fn import(input_file: &Path, key: &SyllabusKeyArgs, config: &Config) -> Result<(), String> {
    let key = key.to_key()?;
    let profile = acting_profile(config)?;
    if !profile.is_admin() {
        return Err(format!(
            "Permission denied: importing a syllabus requires the admin role (acting as '{}')",
            profile.uid
        ));
    }

    let parsed = read_subjects(input_file)?;
    if parsed.is_empty() {
        return Err(format!(
            "No subjects found in {}; expected lines like 'Math: Calculus, Algebra'",
            input_file.display()
        ));
    }

    let store = open_store(config);
    let existing = store
        .load_syllabus(&key)
        .map_err(|e| format!("Failed to load stored syllabus: {e}"))?;
    let existing_subjects = existing.map(|s| s.subjects).unwrap_or_default();

    let outcome = merge_subjects(parsed, &existing_subjects);
    let mut syllabus = Syllabus::new(key, outcome.subjects);
    store
        .save_syllabus(&profile, &mut syllabus)
        .map_err(|e| format!("Failed to save syllabus: {e}"))?;

    println!(
        "✓ Imported {} ({})",
        syllabus.key,
        summary(&syllabus.subjects)
    );
    println!(
        "  {} subject(s) matched, {} topic(s) kept their resources",
        outcome.matched_subjects, outcome.matched_topics
    );
    for name in &outcome.dropped_subjects {
        println!("  - dropped subject: {name}");
    }
    for (subject, topic) in &outcome.dropped_topics {
        println!("  - dropped topic: {subject} / {topic}");
    }
    verbose!("Document id: {}", syllabus.key.doc_id());
    Ok(())
}

fn show(key: &SyllabusKeyArgs, config: &Config) -> Result<(), String> {
    let key = key.to_key()?;
    let syllabus = open_store(config)
        .load_syllabus(&key)
        .map_err(|e| format!("Failed to load syllabus: {e}"))?
        .ok_or_else(|| format!("No syllabus stored for {key}"))?;

    println!("\n=== {} ===", syllabus.key);
    println!("Document id: {}", syllabus.key.doc_id());
    if let Some(editor) = &syllabus.updated_by {
        println!("Last updated by: {editor}");
    }
    println!("{}\n", summary(&syllabus.subjects));

    for section in syllabus.sections() {
        println!("{section}");
        for subject in syllabus.subjects.iter().filter(|s| s.section == section) {
            println!("  {} [{}]", subject.name, short_id(&subject.id));
            for topic in &subject.topics {
                if topic.resources.is_empty() {
                    println!("    - {}", topic.name);
                } else {
                    println!("    - {} ({} resource(s))", topic.name, topic.resources.len());
                }
            }
        }
    }
    Ok(())
}
