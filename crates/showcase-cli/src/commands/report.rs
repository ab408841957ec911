use clap::Subcommand;
use showcase_core::store::ActivityFilter;
use showcase_core::{participation, ActivityKind, Config};

use super::open_store;

#[derive(Subcommand)]
pub enum ReportAction {
    /// Participation rows for every student on a subject's roster
    Students {
        /// Subject id
        subject_id: String,
    },
    /// Activity history for one student
    Student {
        /// Student id
        student_id: String,
        /// Restrict to one subject
        #[arg(long)]
        subject_id: Option<String>,
        /// Restrict to an activity kind: "presentation" or "feedback"
        #[arg(long)]
        kind: Option<String>,
    },
}

fn parse_kind(raw: &str) -> Result<ActivityKind, Box<dyn std::error::Error>> {
    match raw {
        "presentation" => Ok(ActivityKind::Presentation),
        "feedback" => Ok(ActivityKind::Feedback),
        other => Err(format!(
            "unknown activity kind '{other}' (expected 'presentation' or 'feedback')"
        )
        .into()),
    }
}

pub fn run(action: ReportAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = open_store(&config)?;

    match action {
        ReportAction::Students { subject_id } => {
            let subject = store.subject(&subject_id)?;
            let activities = store.activities(&ActivityFilter {
                subject_id: Some(subject_id),
                ..ActivityFilter::default()
            })?;
            let rows = participation(&subject, &activities);
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        ReportAction::Student {
            student_id,
            subject_id,
            kind,
        } => {
            let filter = ActivityFilter {
                student_id: Some(student_id),
                subject_id,
                activity_type: kind.as_deref().map(parse_kind).transpose()?,
                ..ActivityFilter::default()
            };
            let activities = store.activities(&filter)?;
            println!("{}", serde_json::to_string_pretty(&activities)?);
        }
    }
    Ok(())
}
