//! Single-document JSON store.
//!
//! The whole dataset lives in one JSON file that is rewritten after every
//! mutation, the way a browser's local storage holds the same documents.
//! Suits a single teacher driving one class at a time; last write wins.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{data_dir, ActivityFilter, Store};
use crate::error::StoreError;
use crate::model::{Class, PresentationSession, Student, StudentActivity, Subject};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    #[serde(default)]
    subjects: Vec<Subject>,
    #[serde(default)]
    sessions: Vec<PresentationSession>,
    #[serde(default)]
    activities: Vec<StudentActivity>,
    #[serde(default)]
    kv: HashMap<String, String>,
}

/// JSON file store at `~/.config/showcase/showcase.json`.
pub struct JsonStore {
    path: PathBuf,
    doc: Document,
}

impl JsonStore {
    /// Open the store at its default location, creating an empty document
    /// if the file does not exist yet.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()
            .map_err(|e| StoreError::OpenFailed {
                path: "~/.config/showcase".into(),
                message: e.to_string(),
            })?
            .join("showcase.json");
        Self::open_at(path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: PathBuf) -> Result<Self, StoreError> {
        let doc = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Document::default(),
            Err(e) => {
                return Err(StoreError::OpenFailed {
                    path,
                    message: e.to_string(),
                })
            }
        };
        Ok(Self { path, doc })
    }

    fn persist(&self) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&self.doc)?;
        std::fs::write(&self.path, content)
            .map_err(|e| StoreError::OperationFailed(e.to_string()))
    }

    fn subject_mut(&mut self, subject_id: &str) -> Result<&mut Subject, StoreError> {
        self.doc
            .subjects
            .iter_mut()
            .find(|s| s.id == subject_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "subject",
                id: subject_id.to_string(),
            })
    }
}

impl Store for JsonStore {
    fn subjects_for_owner(&self, owner_id: &str) -> Result<Vec<Subject>, StoreError> {
        Ok(self
            .doc
            .subjects
            .iter()
            .filter(|s| s.teacher_id == owner_id)
            .cloned()
            .collect())
    }

    fn subject(&self, subject_id: &str) -> Result<Subject, StoreError> {
        self.doc
            .subjects
            .iter()
            .find(|s| s.id == subject_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "subject",
                id: subject_id.to_string(),
            })
    }

    fn add_subject(&mut self, subject: &Subject) -> Result<(), StoreError> {
        self.doc.subjects.retain(|s| s.id != subject.id);
        self.doc.subjects.push(subject.clone());
        self.persist()
    }

    fn remove_subject(&mut self, subject_id: &str) -> Result<(), StoreError> {
        self.doc.subjects.retain(|s| s.id != subject_id);
        self.persist()
    }

    fn add_class(&mut self, subject_id: &str, class: &Class) -> Result<(), StoreError> {
        let subject = self.subject_mut(subject_id)?;
        if !subject.classes.iter().any(|c| c.id == class.id) {
            subject.classes.push(class.clone());
        }
        self.persist()
    }

    fn remove_class(&mut self, subject_id: &str, class_id: &str) -> Result<(), StoreError> {
        let subject = self.subject_mut(subject_id)?;
        subject.classes.retain(|c| c.id != class_id);
        self.persist()
    }

    fn update_class_timestamp(
        &mut self,
        subject_id: &str,
        class_id: &str,
        timestamp: i64,
    ) -> Result<(), StoreError> {
        let subject = self.subject_mut(subject_id)?;
        let class = subject
            .classes
            .iter_mut()
            .find(|c| c.id == class_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "class",
                id: class_id.to_string(),
            })?;
        class.last_session_timestamp = Some(timestamp);
        self.persist()
    }

    fn add_student_to_subject(
        &mut self,
        subject_id: &str,
        student: &Student,
    ) -> Result<(), StoreError> {
        let subject = self.subject_mut(subject_id)?;
        // Duplicate enrollment is a no-op.
        if !subject.students.iter().any(|s| s.id == student.id) {
            subject.students.push(student.clone());
        }
        self.persist()
    }

    fn remove_student_from_subject(
        &mut self,
        subject_id: &str,
        student_id: &str,
    ) -> Result<(), StoreError> {
        let subject = self.subject_mut(subject_id)?;
        subject.students.retain(|s| s.id != student_id);
        self.persist()
    }

    fn get_session(&self, class_id: &str) -> Result<Option<PresentationSession>, StoreError> {
        Ok(self
            .doc
            .sessions
            .iter()
            .find(|s| s.class_id == class_id)
            .cloned())
    }

    fn save_session(&mut self, session: &PresentationSession) -> Result<(), StoreError> {
        self.doc.sessions.retain(|s| s.class_id != session.class_id);
        self.doc.sessions.push(session.clone());
        self.persist()
    }

    fn clear_session(&mut self, class_id: &str) -> Result<(), StoreError> {
        self.doc.sessions.retain(|s| s.class_id != class_id);
        self.persist()
    }

    fn append_activity(&mut self, activity: &StudentActivity) -> Result<(), StoreError> {
        self.doc.activities.push(activity.clone());
        self.persist()
    }

    fn activities(&self, filter: &ActivityFilter) -> Result<Vec<StudentActivity>, StoreError> {
        Ok(self
            .doc
            .activities
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.doc.kv.get(key).cloned())
    }

    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.doc.kv.insert(key.to_string(), value.to_string());
        self.persist()
    }
}
