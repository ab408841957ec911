use clap::Subcommand;
use showcase_core::{Config, Student};

use super::open_store;

#[derive(Subcommand)]
pub enum StudentAction {
    /// Enroll a student in a subject's roster
    Add {
        /// Subject id
        subject_id: String,
        /// Student name
        name: String,
    },
    /// List a subject's roster as JSON
    List {
        /// Subject id
        subject_id: String,
    },
    /// Remove a student from a subject's roster
    Remove {
        /// Subject id
        subject_id: String,
        /// Student id
        student_id: String,
    },
}

pub fn run(action: StudentAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut store = open_store(&config)?;

    match action {
        StudentAction::Add { subject_id, name } => {
            let student = Student::new(name);
            store.add_student_to_subject(&subject_id, &student)?;
            println!("Student enrolled: {}", student.id);
        }
        StudentAction::List { subject_id } => {
            let subject = store.subject(&subject_id)?;
            println!("{}", serde_json::to_string_pretty(&subject.students)?);
        }
        StudentAction::Remove {
            subject_id,
            student_id,
        } => {
            store.remove_student_from_subject(&subject_id, &student_id)?;
            println!("Student removed: {student_id}");
        }
    }
    Ok(())
}
