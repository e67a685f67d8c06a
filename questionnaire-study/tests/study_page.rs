use std::collections::HashSet;
use std::fs;

use chrono::{Duration, FixedOffset, TimeZone};
use questionnaire_core::{QuestionnaireError, SubmissionForm};
use questionnaire_study::{
    assign, encode_responses, hash_uid, parse_cases, AssignmentPolicy, ResponseSheet, StudyIndex,
    StudyPage, SubmissionRecord, DEMO_UID,
};

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"));
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("cannot read {path}: {err}"))
}

fn fixture_page(uid: &str) -> StudyPage {
    StudyPage::from_sources(
        uid,
        &fixture("cases.jsonl"),
        &fixture("guidelines.jsonl"),
        &fixture("studies.txt"),
        &AssignmentPolicy::default(),
    )
    .expect("fixture page builds")
}

#[test]
fn uid_hash_is_stable() {
    assert_eq!(hash_uid("demo"), 3_209_706);
    assert_eq!(hash_uid("abc"), 17_089_965);
    assert!(hash_uid("anything at all") < 100_000_000);
}

#[test]
fn assignment_is_a_deterministic_permutation() {
    let policy = AssignmentPolicy::default();
    for count in [1, 2, 5, 12] {
        let first = assign("participant-7", count, &policy);
        let again = assign("participant-7", count, &policy);
        assert_eq!(first, again);

        let mut sorted = first.order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..count).collect::<Vec<_>>());

        let guided: HashSet<usize> = first.order.iter().take(count / 2).copied().collect();
        for idx in 0..count {
            assert_eq!(first.with_guidance[idx], guided.contains(&idx));
        }
        assert_eq!(
            first.with_guidance.iter().filter(|flag| **flag).count(),
            count / 2
        );
    }
}

#[test]
fn demo_is_untimed_and_listed_participants_are_timed() {
    let policy = AssignmentPolicy {
        always_timed: vec!["resident-1".to_string()],
    };
    assert!(!assign(DEMO_UID, 4, &policy).timed);
    assert!(assign("resident-1", 4, &policy).timed);
}

#[test]
fn page_is_ordered_by_assignment() {
    let cases = parse_cases(&fixture("cases.jsonl")).expect("cases parse");
    let page = fixture_page("abc");

    assert_eq!(page.question_count(), cases.len());
    assert_eq!(page.config.uid, "abc");
    assert_eq!(page.config.seed, hash_uid("abc"));
    assert_eq!(page.config.with_guidance.len(), cases.len());

    let assignment = assign("abc", cases.len(), &AssignmentPolicy::default());
    assert_eq!(page.config.sort_idxs, assignment.order);
    assert_eq!(page.config.timed, assignment.timed);

    for (position, case_idx) in page.config.sort_idxs.iter().enumerate() {
        let case = &cases[*case_idx];
        assert_eq!(page.questions[position], case.case);
        let topics: Vec<&str> = page.guidance[position]
            .iter()
            .map(|block| block.topic.as_str())
            .collect();
        assert_eq!(topics, case.topics);
        assert_eq!(
            page.config.with_guidance[position],
            assignment.with_guidance[*case_idx]
        );
    }
}

#[test]
fn page_vocabulary_carries_alternates() {
    let page = fixture_page("abc");
    let labels: Vec<&str> = page.vocabulary.labels().collect();
    assert_eq!(labels.len(), 8);
    assert_eq!(labels.last(), Some(&"None"));

    let chest = page
        .vocabulary
        .entries()
        .iter()
        .find(|entry| entry.label == "Radiography chest")
        .expect("study present");
    assert!(chest.value.contains("CXR"));

    let navigator = page.navigator().expect("navigator for fixture page");
    assert_eq!(navigator.total(), 4);
    assert_eq!(navigator.active(), 1);
}

#[test]
fn unknown_topic_fails_page_build() {
    let err = StudyPage::from_sources(
        "abc",
        r#"{"case": "Headache.", "topics": ["Headache"]}"#,
        &fixture("guidelines.jsonl"),
        &fixture("studies.txt"),
        &AssignmentPolicy::default(),
    )
    .expect_err("topic has no guideline");
    assert!(matches!(err, QuestionnaireError::Parse(message) if message.contains("Headache")));
}

#[test]
fn malformed_case_line_reports_position() {
    let err = parse_cases("{\"case\": \"ok\"}\n{not json}\n").expect_err("second line broken");
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn responses_encode_case_answer_and_guidance() {
    // The fixture's blank line keeps its slot: US abdomen is 6 and None is 8.
    let studies = StudyIndex::parse(&fixture("studies.txt")).expect("studies parse");
    let form = SubmissionForm::from_fields([
        ("Q1", "CT chest with IV contrast"),
        ("Q2", "Chest CT"),
        ("Q3", "None"),
        ("name", ""),
        ("uid", "abc"),
        ("sort_idxs", "[2, 0, 1]"),
        ("with_guidance", "101"),
        ("timed", "0"),
        ("duration", ""),
    ]);

    let rows = encode_responses(&form, &studies).expect("human submission");
    assert_eq!(rows, vec!["Q2,A0,1", "Q0,A-1,0", "Q1,A8,1"]);
}

#[test]
fn responses_zip_to_shortest_input() {
    let studies = StudyIndex::parse(&fixture("studies.txt")).expect("studies parse");
    let form = SubmissionForm::from_fields([
        ("Q1", "US abdomen"),
        ("Q2", "None"),
        ("uid", "abc"),
        ("sort_idxs", "3,1,0"),
        ("with_guidance", "0"),
    ]);
    assert_eq!(
        encode_responses(&form, &studies).expect("human submission"),
        vec!["Q3,A6,0"]
    );
}

#[test]
fn demo_and_bot_submissions_are_not_recorded() {
    let studies = StudyIndex::parse(&fixture("studies.txt")).expect("studies parse");
    let demo = SubmissionForm::from_fields([("uid", "demo"), ("Q1", "None")]);
    assert_eq!(encode_responses(&demo, &studies), Ok(Vec::new()));
    assert_eq!(SubmissionRecord::now(&demo, &studies), Ok(None));

    let bot = SubmissionForm::from_fields([("uid", "abc"), ("name", "x"), ("Q1", "None")]);
    assert!(matches!(
        encode_responses(&bot, &studies),
        Err(QuestionnaireError::Rejected(_))
    ));
}

#[test]
fn record_timestamp_has_offset_and_whole_seconds() {
    let studies = StudyIndex::parse(&fixture("studies.txt")).expect("studies parse");
    let form = SubmissionForm::from_fields([
        ("Q1", "MRI head without IV contrast"),
        ("uid", "abc"),
        ("sort_idxs", "0"),
        ("with_guidance", "1"),
        ("timed", "1"),
        ("duration", "754"),
        ("seed", "17089965"),
    ]);
    let offset = FixedOffset::west_opt(5 * 3600).expect("valid offset");
    let at = offset
        .with_ymd_and_hms(2024, 3, 1, 12, 34, 56)
        .single()
        .expect("unambiguous time")
        + Duration::milliseconds(789);

    let record = SubmissionRecord::from_form(&form, &studies, at)
        .expect("human submission")
        .expect("non-demo submission is recorded");

    assert_eq!(record.timestamp(), "2024-03-01T12:34:56-05:00");
    assert_eq!(record.responses, vec!["Q0,A2,1"]);
    assert_eq!(record.responses_json(), r#"["Q0,A2,1"]"#);
    assert_eq!(record.duration, "754");
    assert_eq!(record.timed, "1");
}

#[test]
fn blank_study_lines_keep_response_indices() {
    let studies = StudyIndex::parse("CT head\n\nUS abdomen\n").expect("studies parse");
    let form = SubmissionForm::from_fields([
        ("Q1", "US abdomen"),
        ("Q2", "None"),
        ("uid", "abc"),
        ("sort_idxs", "0,1"),
        ("with_guidance", "01"),
    ]);
    assert_eq!(
        encode_responses(&form, &studies).expect("human submission"),
        vec!["Q0,A2,0", "Q1,A3,1"]
    );
}

#[test]
fn sheet_url_is_form_encoded() {
    let studies = StudyIndex::parse(&fixture("studies.txt")).expect("studies parse");
    let form = SubmissionForm::from_fields([
        ("Q1", "CT chest with IV contrast"),
        ("Q2", "bogus"),
        ("uid", "abc"),
        ("sort_idxs", "2,0"),
        ("with_guidance", "10"),
        ("timed", "1"),
        ("duration", "42"),
    ]);
    let offset = FixedOffset::west_opt(5 * 3600).expect("valid offset");
    let at = offset
        .with_ymd_and_hms(2024, 3, 1, 12, 34, 56)
        .single()
        .expect("unambiguous time");
    let record = SubmissionRecord::from_form(&form, &studies, at)
        .expect("human submission")
        .expect("recorded");

    assert_eq!(record.responses_json(), r#"["Q2,A0,1", "Q0,A-1,0"]"#);

    let url = record.sheet_url(&ResponseSheet::default());
    assert!(url.starts_with("https://docs.google.com/forms/d/e/"));
    assert!(url.contains("/formResponse?&submit=Submit?usp=pp_url&entry.1566494565=abc&"));
    assert!(url.contains(
        "&entry.1604544479=%5B%22Q2%2CA0%2C1%22%2C+%22Q0%2CA-1%2C0%22%5D&"
    ));
    assert!(url.contains("&entry.921671925=2024-03-01T12%3A34%3A56-05%3A00&"));
    assert!(url.ends_with("&entry.2066832372=42&entry.734084621=1"));
}
