use clap::Subcommand;
use showcase_core::{Config, Subject};

use super::{open_store, require_teacher};

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Create a subject owned by the signed-in teacher
    Add {
        /// Subject name
        name: String,
    },
    /// List subjects owned by the signed-in teacher as JSON
    List,
    /// Delete a subject
    Remove {
        /// Subject id
        subject_id: String,
    },
}

pub fn run(action: SubjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut store = open_store(&config)?;

    match action {
        SubjectAction::Add { name } => {
            require_teacher(&config)?;
            let subject = Subject::new(name, &config.profile.uid);
            store.add_subject(&subject)?;
            println!("Subject created: {}", subject.id);
        }
        SubjectAction::List => {
            let subjects = store.subjects_for_owner(&config.profile.uid)?;
            println!("{}", serde_json::to_string_pretty(&subjects)?);
        }
        SubjectAction::Remove { subject_id } => {
            require_teacher(&config)?;
            store.remove_subject(&subject_id)?;
            println!("Subject removed: {subject_id}");
        }
    }
    Ok(())
}
