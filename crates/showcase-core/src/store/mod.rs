//! Persistence adapters.
//!
//! The workflow and the CLI consume the [`Store`] trait only; the two
//! backends (SQLite and a single JSON document) are interchangeable behind
//! it and selected via configuration.

pub mod json;
pub mod sqlite;

pub use json::JsonStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{ActivityKind, Class, PresentationSession, Student, StudentActivity, Subject};

/// Which backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Sqlite,
    Json,
}

/// Filter for activity-log queries. Empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub student_id: Option<String>,
    pub subject_id: Option<String>,
    pub class_id: Option<String>,
    pub activity_type: Option<ActivityKind>,
}

impl ActivityFilter {
    pub fn matches(&self, activity: &StudentActivity) -> bool {
        self.student_id
            .as_ref()
            .is_none_or(|id| *id == activity.student_id)
            && self
                .subject_id
                .as_ref()
                .is_none_or(|id| *id == activity.subject_id)
            && self
                .class_id
                .as_ref()
                .is_none_or(|id| *id == activity.class_id)
            && self
                .activity_type
                .is_none_or(|kind| kind == activity.activity_type)
    }
}

/// Key-value persistence contract consumed by the workflow.
///
/// Sessions are singletons keyed by class id. Membership writes are no-ops
/// when the member is already present. Activities are append-only. No
/// transactional guarantee spans the several writes of a workflow step.
pub trait Store {
    fn subjects_for_owner(&self, owner_id: &str) -> Result<Vec<Subject>, StoreError>;
    fn subject(&self, subject_id: &str) -> Result<Subject, StoreError>;
    fn add_subject(&mut self, subject: &Subject) -> Result<(), StoreError>;
    fn remove_subject(&mut self, subject_id: &str) -> Result<(), StoreError>;

    fn add_class(&mut self, subject_id: &str, class: &Class) -> Result<(), StoreError>;
    fn remove_class(&mut self, subject_id: &str, class_id: &str) -> Result<(), StoreError>;
    fn update_class_timestamp(
        &mut self,
        subject_id: &str,
        class_id: &str,
        timestamp: i64,
    ) -> Result<(), StoreError>;

    fn add_student_to_subject(
        &mut self,
        subject_id: &str,
        student: &Student,
    ) -> Result<(), StoreError>;
    fn remove_student_from_subject(
        &mut self,
        subject_id: &str,
        student_id: &str,
    ) -> Result<(), StoreError>;

    fn get_session(&self, class_id: &str) -> Result<Option<PresentationSession>, StoreError>;
    fn save_session(&mut self, session: &PresentationSession) -> Result<(), StoreError>;
    fn clear_session(&mut self, class_id: &str) -> Result<(), StoreError>;

    fn append_activity(&mut self, activity: &StudentActivity) -> Result<(), StoreError>;
    fn activities(&self, filter: &ActivityFilter) -> Result<Vec<StudentActivity>, StoreError>;

    /// Small kv store used to resume workflow position between invocations.
    fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Open the configured backend at its default location.
pub fn open_backend(kind: BackendKind) -> Result<Box<dyn Store>, StoreError> {
    match kind {
        BackendKind::Sqlite => Ok(Box::new(SqliteStore::open()?)),
        BackendKind::Json => Ok(Box::new(JsonStore::open()?)),
    }
}

/// Returns `~/.config/showcase[-dev]/` based on SHOWCASE_ENV.
///
/// Set SHOWCASE_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SHOWCASE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("showcase-dev")
    } else {
        base_dir.join("showcase")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
