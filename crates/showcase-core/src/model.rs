//! Domain records for Weekly Showcase.
//!
//! All records serialize with camelCase field names -- the document schema
//! the stores persist. Optional fields are omitted entirely when absent;
//! the stores reject explicit nulls for them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student eligible for presentation and feedback selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
}

impl Student {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
        }
    }
}

/// A class within a subject. Sessions are keyed by class id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    /// Epoch milliseconds of the last completed reflection step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_session_timestamp: Option<i64>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            last_session_timestamp: None,
        }
    }
}

/// Root aggregate: owns its classes and the student roster shared across
/// them. Enrollment is membership in `students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub teacher_id: String,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub students: Vec<Student>,
}

impl Subject {
    pub fn new(name: impl Into<String>, teacher_id: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            teacher_id: teacher_id.into(),
            classes: Vec::new(),
            students: Vec::new(),
        }
    }

    pub fn class(&self, class_id: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.id == class_id)
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }
}

/// Mutable per-class record tracking progress through one presentation
/// cycle. Singleton keyed by `class_id`.
///
/// Invariant: `presented_student_ids` is duplicate-free and only grows
/// until an explicit reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationSession {
    pub class_id: String,
    #[serde(default)]
    pub presented_student_ids: Vec<String>,
    #[serde(default)]
    pub feedback_given_student_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_presenter: Option<Student>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_feedback_giver: Option<Student>,
}

impl PresentationSession {
    pub fn new(class_id: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            presented_student_ids: Vec::new(),
            feedback_given_student_ids: Vec::new(),
            current_presenter: None,
            current_feedback_giver: None,
        }
    }

    /// Number of roster members who have not presented yet.
    pub fn remaining_presenters(&self, roster: &[Student]) -> usize {
        roster
            .iter()
            .filter(|s| !self.presented_student_ids.contains(&s.id))
            .count()
    }

    /// True once every roster member has presented (empty rosters never
    /// count as exhausted).
    pub fn roster_exhausted(&self, roster: &[Student]) -> bool {
        !roster.is_empty() && self.presented_student_ids.len() >= roster.len()
    }
}

/// Kind of activity recorded in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Presentation,
    Feedback,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Presentation => "presentation",
            ActivityKind::Feedback => "feedback",
        }
    }
}

/// Append-only history record of a completed presentation or feedback
/// event. Never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentActivity {
    pub id: String,
    pub student_id: String,
    pub class_id: String,
    pub subject_id: String,
    pub activity_type: ActivityKind,
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Denormalized for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
}

/// Account role. The core reads this only to gate teacher-only operations;
/// authorization proper belongs to the auth collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

/// Minimal view of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    pub role: Role,
}

/// The four timed slots of a presentation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerSlot {
    Presentation,
    StudentFeedback,
    LecturerFeedback,
    Reflection,
}

impl TimerSlot {
    pub fn default_duration_secs(self) -> u64 {
        match self {
            TimerSlot::Presentation => 180,
            TimerSlot::StudentFeedback => 30,
            TimerSlot::LecturerFeedback => 30,
            TimerSlot::Reflection => 45,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimerSlot::Presentation => "Presentation",
            TimerSlot::StudentFeedback => "Student Feedback",
            TimerSlot::LecturerFeedback => "Lecturer Feedback",
            TimerSlot::Reflection => "Reflection",
        }
    }
}

/// Generate a fresh record id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time as epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_serializes_without_absent_selections() {
        let session = PresentationSession::new("class-1");
        let json = serde_json::to_value(&session).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("classId"));
        assert!(obj.contains_key("presentedStudentIds"));
        assert!(!obj.contains_key("currentPresenter"));
        assert!(!obj.contains_key("currentFeedbackGiver"));
    }

    #[test]
    fn session_roundtrips_with_selections() {
        let mut session = PresentationSession::new("class-1");
        session.current_presenter = Some(Student::new("Ada"));
        let json = serde_json::to_string(&session).unwrap();
        let parsed: PresentationSession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }

    #[test]
    fn roster_exhaustion() {
        let roster = vec![Student::new("A"), Student::new("B")];
        let mut session = PresentationSession::new("c");
        assert!(!session.roster_exhausted(&roster));
        assert_eq!(session.remaining_presenters(&roster), 2);

        session.presented_student_ids.push(roster[0].id.clone());
        session.presented_student_ids.push(roster[1].id.clone());
        assert!(session.roster_exhausted(&roster));
        assert_eq!(session.remaining_presenters(&roster), 0);

        // Empty roster is never exhausted.
        assert!(!PresentationSession::new("c").roster_exhausted(&[]));
    }

    #[test]
    fn activity_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ActivityKind::Presentation).unwrap(),
            serde_json::json!("presentation")
        );
    }
}
