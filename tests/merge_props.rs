//! Property tests for syllabus parsing and merging

use proptest::prelude::*;
use studyhub::core::models::{ResourceKind, Subject, Topic, TopicResource};
use studyhub::core::syllabus::{merge_subjects, parse_raw_syllabus, parse_topics};

prop_compose! {
    fn arbitrary_topic()
        (name in "[A-Za-z][A-Za-z ]{0,8}[A-Za-z]", links in prop::collection::vec("[a-z]{1,6}", 0..3))
        -> Topic
    {
        let mut topic = Topic::new(name);
        for link in links {
            topic.resources.push(TopicResource::new(
                link.clone(),
                format!("https://example.org/{link}"),
                ResourceKind::Link,
            ));
        }
        topic
    }
}

prop_compose! {
    fn arbitrary_subject()
        (name in "[A-Za-z]{1,6}", section in "[A-C]", topics in prop::collection::vec(arbitrary_topic(), 0..5))
        -> Subject
    {
        Subject::new(name, section, topics)
    }
}

fn strip_resources(subjects: &[Subject], rename: impl Fn(&str) -> String) -> Vec<Subject> {
    subjects
        .iter()
        .map(|s| {
            Subject::new(
                rename(&s.name),
                s.section.clone(),
                s.topics.iter().map(|t| Topic::new(rename(&t.name))).collect(),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_merge_with_self_is_identity(
        subjects in prop::collection::vec(arbitrary_subject(), 0..8)
    ) {
        let outcome = merge_subjects(subjects.clone(), &subjects);
        prop_assert_eq!(&outcome.subjects, &subjects);
        prop_assert_eq!(outcome.matched_subjects, subjects.len());
        prop_assert!(!outcome.dropped_anything());
    }

    #[test]
    fn prop_reparse_keeps_every_resource(
        subjects in prop::collection::vec(arbitrary_subject(), 0..8)
    ) {
        // a fresh parse has new ids and no resources
        let reparsed = strip_resources(&subjects, str::to_string);
        let outcome = merge_subjects(reparsed, &subjects);

        prop_assert_eq!(outcome.subjects.len(), subjects.len());
        for (merged, stored) in outcome.subjects.iter().zip(&subjects) {
            prop_assert_eq!(&merged.id, &stored.id);
            for (mt, st) in merged.topics.iter().zip(&stored.topics) {
                prop_assert_eq!(&mt.resources, &st.resources);
            }
        }
    }

    #[test]
    fn prop_merge_ignores_case(
        subjects in prop::collection::vec(arbitrary_subject(), 1..8),
        upper in any::<bool>()
    ) {
        let recased = strip_resources(&subjects, |name| {
            if upper { name.to_uppercase() } else { name.to_lowercase() }
        });
        let outcome = merge_subjects(recased, &subjects);

        prop_assert!(!outcome.dropped_anything());
        for (merged, stored) in outcome.subjects.iter().zip(&subjects) {
            prop_assert_eq!(&merged.id, &stored.id);
            prop_assert!(merged.name.eq_ignore_ascii_case(&stored.name));
            let merged_links: usize = merged.topics.iter().map(|t| t.resources.len()).sum();
            let stored_links: usize = stored.topics.iter().map(|t| t.resources.len()).sum();
            prop_assert_eq!(merged_links, stored_links);
        }
    }

    #[test]
    fn prop_parsed_topics_are_clean(text in "[a-z ,.]{0,40}") {
        for topic in parse_topics(&text) {
            prop_assert!(!topic.is_empty());
            prop_assert_eq!(topic.trim(), topic.as_str());
            prop_assert!(!topic.contains(','));
        }
    }

    #[test]
    fn prop_parser_never_keeps_empty_subjects(text in "[A-Za-z:, .\n]{0,120}") {
        for subject in parse_raw_syllabus(&text) {
            prop_assert!(!subject.name.trim().is_empty());
            prop_assert!(!subject.topics.is_empty());
            prop_assert!(!subject.section.is_empty());
        }
    }
}
