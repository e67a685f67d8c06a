use questionnaire_core::submission::{is_answer_key, CONFIRM_PROMPT};
use questionnaire_core::{
    parse_flag, parse_index_list, AccessGate, MatchKey, PageConfig, QuestionnaireError,
    SubmissionForm, UID_LENGTH,
};

#[test]
fn attributes_parse_into_config() {
    let config = PageConfig::from_attributes("abc", "17089965", "[2, 0,1]", "010", "1")
        .expect("valid attributes");

    assert_eq!(config.uid, "abc");
    assert_eq!(config.seed, 17_089_965);
    assert_eq!(config.sort_idxs, vec![2, 0, 1]);
    assert_eq!(config.with_guidance, vec![false, true, false]);
    assert!(config.timed);
    assert_eq!(config.sort_idxs_attr(), "2,0,1");
    assert_eq!(config.with_guidance_attr(), "010");
    assert_eq!(config.timed_attr(), "1");
}

#[test]
fn malformed_attributes_are_parse_errors() {
    assert!(matches!(
        PageConfig::from_attributes("abc", "seed", "", "", "0"),
        Err(QuestionnaireError::Parse(_))
    ));
    assert!(matches!(
        PageConfig::from_attributes("abc", "1", "", "012", "0"),
        Err(QuestionnaireError::Parse(_))
    ));
    assert!(parse_index_list("1,,2").is_err());
    assert_eq!(parse_index_list(" "), Ok(Vec::new()));
    assert_eq!(parse_flag(""), Ok(false));
    assert_eq!(parse_flag("2"), Ok(true));
}

#[test]
fn partial_json_config_keeps_defaults() {
    let config: PageConfig =
        serde_json::from_str(r#"{"uid":"demo","match_key":"label"}"#).expect("valid json");
    assert_eq!(config.uid, "demo");
    assert_eq!(config.match_key, MatchKey::Label);
    assert_eq!(config.time_limit_secs, PageConfig::default().time_limit_secs);
    assert!(!config.timed);
}

#[test]
fn identifier_gate_needs_consent_and_exact_length() {
    let short = "a1".repeat(255) + "b";
    assert_eq!(short.len(), 511);
    assert!(!AccessGate::new(true, short.clone()).is_ready());
    assert_eq!(AccessGate::new(true, short).continue_target(), None);

    let exact = "a1".repeat(256);
    assert_eq!(exact.len(), UID_LENGTH);
    assert!(!AccessGate::new(false, exact.clone()).is_ready());

    let gate = AccessGate::new(true, exact.clone());
    assert!(gate.is_ready());
    assert_eq!(gate.continue_target(), Some(format!("/?uid={exact}")));

    let too_long = exact.clone() + "c";
    assert!(!AccessGate::new(true, too_long).is_ready());
}

#[test]
fn identifier_gate_rejects_symbols() {
    let mut with_dash = "a".repeat(UID_LENGTH - 1);
    with_dash.push('-');
    assert!(!AccessGate::new(true, with_dash).identifier_is_valid());

    let mut non_ascii = "a".repeat(UID_LENGTH - 1);
    non_ascii.push('é');
    assert!(!AccessGate::new(true, non_ascii).identifier_is_valid());
}

#[test]
fn submission_fields_round_out_the_form() {
    let config = PageConfig {
        uid: "abc".to_string(),
        seed: 42,
        sort_idxs: vec![1, 0],
        with_guidance: vec![true, false],
        timed: true,
        ..PageConfig::default()
    };
    let form = SubmissionForm::new(&config, vec!["CT".into(), "None".into()], Some(75));
    let fields = form.fields();

    assert_eq!(fields[0], ("Q1".to_string(), "CT".to_string()));
    assert_eq!(fields[1], ("Q2".to_string(), "None".to_string()));
    assert!(fields.contains(&("duration".to_string(), "75".to_string())));
    assert!(fields.contains(&("with_guidance".to_string(), "10".to_string())));
    assert!(fields.contains(&("name".to_string(), String::new())));

    let parsed = SubmissionForm::from_fields(fields);
    assert_eq!(parsed, form);
    assert!(parsed.ensure_human().is_ok());
    assert!(!CONFIRM_PROMPT.is_empty());
}

#[test]
fn filled_honeypot_is_rejected() {
    let form = SubmissionForm::from_fields([("name", "bot"), ("uid", "abc"), ("Q1", "CT")]);
    assert!(matches!(
        form.ensure_human(),
        Err(QuestionnaireError::Rejected(_))
    ));
    assert_eq!(form.answers, vec!["CT".to_string()]);
}

#[test]
fn answer_keys_are_q_followed_by_digits() {
    assert!(is_answer_key("Q1"));
    assert!(is_answer_key("Q12"));
    assert!(!is_answer_key("Q"));
    assert!(!is_answer_key("Q1a"));
    assert!(!is_answer_key("q1"));
}
