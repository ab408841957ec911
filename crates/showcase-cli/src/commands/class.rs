use clap::Subcommand;
use showcase_core::{Class, Config};

use super::{open_store, require_teacher};

#[derive(Subcommand)]
pub enum ClassAction {
    /// Add a class to a subject
    Add {
        /// Subject id
        subject_id: String,
        /// Class name
        name: String,
    },
    /// List a subject's classes as JSON
    List {
        /// Subject id
        subject_id: String,
    },
    /// Remove a class from a subject
    Remove {
        /// Subject id
        subject_id: String,
        /// Class id
        class_id: String,
    },
}

pub fn run(action: ClassAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut store = open_store(&config)?;

    match action {
        ClassAction::Add { subject_id, name } => {
            require_teacher(&config)?;
            let class = Class::new(name);
            store.add_class(&subject_id, &class)?;
            println!("Class created: {}", class.id);
        }
        ClassAction::List { subject_id } => {
            let subject = store.subject(&subject_id)?;
            println!("{}", serde_json::to_string_pretty(&subject.classes)?);
        }
        ClassAction::Remove {
            subject_id,
            class_id,
        } => {
            require_teacher(&config)?;
            store.remove_class(&subject_id, &class_id)?;
            println!("Class removed: {class_id}");
        }
    }
    Ok(())
}
