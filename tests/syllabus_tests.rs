//! End-to-end syllabus workflow: parse raw text, store it, edit it, re-import

use chrono::Utc;
use studyhub::core::models::{
    AcademicProgress, ResourceKind, Role, Syllabus, SyllabusKey, TopicResource, UserProfile,
};
use studyhub::core::progress::{mark_topic, syllabus_completion};
use studyhub::core::report::{self, ReportContext, ReportFormat, ReportGenerator};
use studyhub::core::store::LocalStore;
use studyhub::core::syllabus::{merge_subjects, parse_raw_syllabus, DEFAULT_SECTION};
use tempfile::TempDir;

const FIXTURE: &str = include_str!("fixtures/cse_sem3.txt");

fn key() -> SyllabusKey {
    SyllabusKey::university("State U", "CSE", 3)
}

#[test]
fn fixture_parses_into_sections() {
    let subjects = parse_raw_syllabus(FIXTURE);
    let names: Vec<&str> = subjects.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Data Structures",
            "Discrete Mathematics",
            "Computer Networks",
            "Database Systems",
            "Technical Writing",
        ]
    );

    assert_eq!(subjects[0].section, DEFAULT_SECTION);
    assert_eq!(subjects[2].section, "Core Electives");
    assert_eq!(subjects[4].section, "SECTION B");

    let topics: Vec<&str> = subjects[0].topics.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(topics, vec!["Arrays", "Linked Lists", "Trees", "Graphs"]);
    assert_eq!(subjects[3].topics[1].name, "Normalization");
    assert_eq!(subjects[4].topics.len(), 2);
}

#[test]
fn reimport_preserves_ids_and_resources() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::new(dir.path());
    let admin = UserProfile::new("admin", Role::Admin);

    let mut first = Syllabus::new(key(), parse_raw_syllabus(FIXTURE));
    first.subjects[2].topics[1].resources.push(TopicResource::new(
        "TCP lecture",
        "https://example.org/tcp",
        ResourceKind::Video,
    ));
    store.save_syllabus(&admin, &mut first).unwrap();

    // admin edits the text: recases a subject, drops a topic and a subject
    let edited = FIXTURE
        .replace("Computer Networks: OSI Model, TCP/IP", "COMPUTER NETWORKS: tcp/ip")
        .replace("Discrete Mathematics: Logic, Sets, Relations\n", "");
    let stored = store.load_syllabus(&key()).unwrap().unwrap();
    let outcome = merge_subjects(parse_raw_syllabus(&edited), &stored.subjects);

    assert_eq!(outcome.dropped_subjects, vec!["Discrete Mathematics".to_string()]);
    assert_eq!(
        outcome.dropped_topics,
        vec![("COMPUTER NETWORKS".to_string(), "OSI Model".to_string())]
    );

    let mut second = Syllabus::new(key(), outcome.subjects);
    store.save_syllabus(&admin, &mut second).unwrap();
    let reloaded = store.load_syllabus(&key()).unwrap().unwrap();

    let networks = reloaded.subject_by_name("computer networks").unwrap();
    assert_eq!(networks.id, first.subjects[2].id);
    assert_eq!(networks.name, "COMPUTER NETWORKS");
    let tcp = networks.topic("TCP/IP").unwrap();
    assert_eq!(tcp.name, "tcp/ip");
    assert_eq!(tcp.resources[0].url, "https://example.org/tcp");
}

#[test]
fn progress_survives_topic_removal() {
    let syllabus = Syllabus::new(key(), parse_raw_syllabus(FIXTURE));
    let ds = syllabus.subject_by_name("Data Structures").unwrap().id.clone();
    let mut progress = AcademicProgress::new("u1");
    mark_topic(&syllabus, &mut progress, &ds, "trees", true).unwrap();
    mark_topic(&syllabus, &mut progress, &ds, "Graphs", true).unwrap();

    let before = syllabus_completion(&syllabus, &progress);
    assert_eq!(before.done, 2);

    let edited = FIXTURE.replace("Trees, Graphs.", "Trees, Heaps");
    let mut stored = syllabus.clone();
    stored.subjects = merge_subjects(parse_raw_syllabus(&edited), &syllabus.subjects).subjects;

    let after = syllabus_completion(&stored, &progress);
    let ds_after = after.subjects.iter().find(|s| s.subject_id == ds).unwrap();
    assert_eq!(ds_after.done, 1);
    assert_eq!(ds_after.total, 4);
    assert!((ds_after.percent - 25.0).abs() < 1e-9);
}

#[test]
fn reports_are_written_in_both_formats() {
    let dir = TempDir::new().unwrap();
    let syllabus = Syllabus::new(key(), parse_raw_syllabus(FIXTURE));
    let mut progress = AcademicProgress::new("u1");
    let db = syllabus.subject_by_name("Database Systems").unwrap().id.clone();
    mark_topic(&syllabus, &mut progress, &db, "SQL", true).unwrap();

    let ctx = ReportContext::new(&syllabus, &progress, Utc::now());
    for format in [ReportFormat::Markdown, ReportFormat::Html] {
        let path = dir
            .path()
            .join("out")
            .join(format!("report.{}", format.extension()));
        report::generate(format, &ctx, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Database Systems"));
        assert!(content.contains("Core Electives"));
        assert!(!content.contains("{{"));
    }

    let md = report::MarkdownReporter::new().render(&ctx).unwrap();
    assert!(md.contains("- [x] SQL"));
    assert!(md.contains("- [ ] Transactions"));
}

#[test]
fn pdf_format_is_rejected() {
    let err = "pdf".parse::<ReportFormat>().unwrap_err();
    assert!(err.contains("PDF"));
}
