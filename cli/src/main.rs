use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use questionnaire_core::{AccessGate, SubmissionForm, UID_LENGTH};
use questionnaire_study::{
    participant_uid, AssignmentPolicy, ResponseSheet, StudyIndex, StudyPage, SubmissionRecord,
};

#[derive(Parser, Debug)]
#[command(
    name = "questionnaire-cli",
    about = "Prepare imaging-order questionnaire pages and encode submissions."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the page payload for one participant.
    Page {
        /// Patient cases, one JSON object per line.
        #[arg(long)]
        cases: PathBuf,
        /// Guideline topics, one JSON object per line.
        #[arg(long)]
        guidelines: PathBuf,
        /// Imaging study list, one study per line.
        #[arg(long)]
        studies: PathBuf,
        #[arg(long, default_value = "demo")]
        uid: String,
        /// Participant that always gets the countdown; repeatable.
        #[arg(long = "always-timed")]
        always_timed: Vec<String>,
        /// Print the full payload as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Issue the participant identifier for an email address.
    Uid {
        #[arg(short = 'u', long)]
        email: String,
    },
    /// Check a participant identifier against the access rules.
    CheckUid { identifier: String },
    /// Encode a posted form (JSON object of field names to values).
    Encode {
        #[arg(long)]
        form: PathBuf,
        #[arg(long)]
        studies: PathBuf,
        /// Print the prefilled response-sheet URL instead of the record.
        #[arg(long)]
        sheet_url: bool,
    },
}

fn main() -> anyhow::Result<()> {
    match Args::parse().command {
        Command::Page {
            cases,
            guidelines,
            studies,
            uid,
            always_timed,
            json,
        } => {
            let policy = AssignmentPolicy { always_timed };
            let page = StudyPage::from_sources(
                &uid,
                &read(&cases)?,
                &read(&guidelines)?,
                &read(&studies)?,
                &policy,
            )
            .context("Cannot build the questionnaire page")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                let guided = page.config.with_guidance.iter().filter(|flag| **flag).count();
                println!(
                    "Participant: {}\nSeed: {}\nQuestions: {} ({} with guidance)\nOrder: {}\nTimed: {}\nStudies: {}",
                    page.config.uid,
                    page.config.seed,
                    page.question_count(),
                    guided,
                    page.config.sort_idxs_attr(),
                    page.config.timed,
                    page.vocabulary.len()
                );
            }
        }
        Command::Uid { email } => println!("{}", participant_uid(&email)),
        Command::CheckUid { identifier } => {
            let gate = AccessGate::new(true, identifier);
            match gate.continue_target() {
                Some(target) => println!("{target}"),
                None => bail!(
                    "identifier must be exactly {UID_LENGTH} letters or digits (got {} characters)",
                    gate.identifier.chars().count()
                ),
            }
        }
        Command::Encode {
            form,
            studies,
            sheet_url,
        } => {
            let fields: BTreeMap<String, String> = serde_json::from_str(&read(&form)?)
                .with_context(|| format!("Cannot parse form fields in {form:?}"))?;
            let studies = StudyIndex::parse(&read(&studies)?)?;
            let form = SubmissionForm::from_fields(answers_in_order(fields));

            match SubmissionRecord::now(&form, &studies)? {
                Some(record) if sheet_url => {
                    println!("{}", record.sheet_url(&ResponseSheet::default()))
                }
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => println!("Demo submission; nothing recorded."),
            }
        }
    }

    Ok(())
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Cannot read file {path:?}"))
}

/// JSON objects carry no order; answers are sorted by question number.
fn answers_in_order(fields: BTreeMap<String, String>) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = fields.into_iter().collect();
    pairs.sort_by_key(|(key, _)| {
        key.strip_prefix('Q')
            .and_then(|digits| digits.parse::<usize>().ok())
            .unwrap_or(usize::MAX)
    });
    pairs
}
