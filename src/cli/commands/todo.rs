//! To-do command handler

use super::{acting_profile, find_by_id, open_store, resolve_subject, short_id};
use crate::args::TodoSubcommand;
use chrono::{DateTime, NaiveDate, Utc};
use studyhub::config::Config;
use studyhub::core::models::{Task, TopicRef};
use studyhub::core::progress::toggle_task;
use studyhub::core::store::LocalStore;
use studyhub::info;

/// Dispatch todo subcommands
///
/// # Errors
/// Returns an error for bad input, unknown ids, or store failures
pub fn run(subcommand: TodoSubcommand, config: &Config) -> Result<(), String> {
    let store = open_store(config);
    let uid = acting_profile(config)?.uid;

    match subcommand {
        TodoSubcommand::Add {
            title,
            due,
            syllabus,
            subject,
            topic,
        } => {
            let link = match (syllabus, subject, topic) {
                (Some(doc_id), Some(subject), Some(topic)) => {
                    Some(link_topic(&store, &doc_id, &subject, &topic)?)
                }
                _ => None,
            };
            add(&store, &uid, &title, &due, link)
        }
        TodoSubcommand::List { pending } => list(&store, &uid, pending),
        TodoSubcommand::Done { id } => done(&store, &uid, &id),
        TodoSubcommand::Rm { id } => remove(&store, &uid, &id),
    }
}

/// Parse a due time: RFC 3339, or a bare date meaning the end of that day (UTC)
///
/// # Errors
/// Returns an error if the value matches neither form
pub fn parse_due(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            format!("Invalid due time '{value}'; use 2025-05-01 or 2025-05-01T18:00:00Z")
        })
}

fn link_topic(
    store: &LocalStore,
    doc_id: &str,
    subject: &str,
    topic: &str,
) -> Result<TopicRef, String> {
    let syllabus = store
        .load_syllabus_by_id(doc_id)
        .map_err(|e| format!("Failed to load syllabus: {e}"))?
        .ok_or_else(|| format!("No syllabus with document id '{doc_id}'"))?;
    let subject = resolve_subject(&syllabus, subject)
        .ok_or_else(|| format!("Syllabus '{doc_id}' has no subject '{subject}'"))?;
    let topic = subject
        .topic(topic)
        .ok_or_else(|| format!("Subject '{}' has no topic '{topic}'", subject.name))?;
    Ok(TopicRef {
        syllabus_id: doc_id.to_string(),
        subject_id: subject.id.clone(),
        topic: topic.name.clone(),
    })
}

fn load(store: &LocalStore, uid: &str) -> Result<Vec<Task>, String> {
    store
        .load_tasks(uid)
        .map_err(|e| format!("Failed to load tasks: {e}"))
}

fn save(store: &LocalStore, uid: &str, tasks: &[Task]) -> Result<(), String> {
    store
        .save_tasks(uid, tasks)
        .map_err(|e| format!("Failed to save tasks: {e}"))
}

fn add(
    store: &LocalStore,
    uid: &str,
    title: &str,
    due: &str,
    link: Option<TopicRef>,
) -> Result<(), String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Task title cannot be empty".to_string());
    }
    let mut task = Task::new(uid, title, parse_due(due)?);
    if let Some(link) = link {
        task = task.with_topic(link);
    }

    let mut tasks = load(store, uid)?;
    let id = task.id.clone();
    tasks.push(task);
    save(store, uid, &tasks)?;
    info!("Added task {id} for {uid}");
    println!("✓ Added task [{}] {title}", short_id(&id));
    Ok(())
}

fn list(store: &LocalStore, uid: &str, pending_only: bool) -> Result<(), String> {
    let mut tasks = load(store, uid)?;
    tasks.retain(|t| !pending_only || !t.completed);
    tasks.sort_by(|a, b| a.due.cmp(&b.due));

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    let now = Utc::now();
    for task in &tasks {
        let mark = if task.completed { 'x' } else { ' ' };
        let overdue = if task.is_overdue(now) { "  (overdue)" } else { "" };
        println!(
            "[{mark}] {}  {}  {}{overdue}",
            short_id(&task.id),
            task.due.format("%Y-%m-%d %H:%M"),
            task.title
        );
        if let Some(link) = &task.topic {
            println!("              topic: {} ({})", link.topic, link.syllabus_id);
        }
    }
    Ok(())
}

fn done(store: &LocalStore, uid: &str, id: &str) -> Result<(), String> {
    let mut tasks = load(store, uid)?;
    let idx = find_by_id(&tasks, id, |t| t.id.as_str())?;
    let mut progress = store
        .load_progress(uid)
        .map_err(|e| format!("Failed to load progress: {e}"))?;

    let toggle = toggle_task(&mut tasks[idx], &mut progress, Utc::now());
    if toggle.progress_changed {
        store
            .save_tasks_and_progress(uid, &tasks, &progress)
            .map_err(|e| format!("Failed to save task and progress: {e}"))?;
    } else {
        save(store, uid, &tasks)?;
    }

    let task = &tasks[idx];
    let state = if toggle.completed { "done" } else { "open" };
    println!("✓ Marked [{}] {} as {state}", short_id(&task.id), task.title);
    if toggle.progress_changed {
        if let Some(link) = &task.topic {
            println!("  topic '{}' updated in progress", link.topic);
        }
    }
    Ok(())
}

fn remove(store: &LocalStore, uid: &str, id: &str) -> Result<(), String> {
    let mut tasks = load(store, uid)?;
    let idx = find_by_id(&tasks, id, |t| t.id.as_str())?;
    let task = tasks.remove(idx);
    save(store, uid, &tasks)?;
    println!("✓ Removed [{}] {}", short_id(&task.id), task.title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_due_rfc3339_with_offset() {
        let due = parse_due("2025-05-01T18:00:00+02:00").unwrap();
        assert_eq!(due, Utc.with_ymd_and_hms(2025, 5, 1, 16, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_due_date_is_end_of_day() {
        let due = parse_due("2025-05-01").unwrap();
        assert_eq!(due, Utc.with_ymd_and_hms(2025, 5, 1, 23, 59, 59).unwrap());
    }

    #[test]
    fn test_parse_due_rejects_garbage() {
        assert!(parse_due("tomorrow").is_err());
        assert!(parse_due("2025-13-01").is_err());
    }
}
