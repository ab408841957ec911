//! Participation reports over the activity log.
//!
//! Pure aggregation; the CLI queries the store and hands the records here.

use serde::{Deserialize, Serialize};

use crate::model::{ActivityKind, StudentActivity, Subject};

/// Per-student participation counts for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationRow {
    pub student_id: String,
    pub student_name: String,
    pub presentations: u64,
    pub feedbacks: u64,
    /// Epoch milliseconds of the most recent activity, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<i64>,
}

/// Aggregate activities into one row per roster member, including members
/// with no activity yet. Rows are sorted by student name.
pub fn participation(subject: &Subject, activities: &[StudentActivity]) -> Vec<ParticipationRow> {
    let mut rows: Vec<ParticipationRow> = subject
        .students
        .iter()
        .map(|student| {
            let mut row = ParticipationRow {
                student_id: student.id.clone(),
                student_name: student.name.clone(),
                presentations: 0,
                feedbacks: 0,
                last_activity: None,
            };
            for activity in activities.iter().filter(|a| a.student_id == student.id) {
                match activity.activity_type {
                    ActivityKind::Presentation => row.presentations += 1,
                    ActivityKind::Feedback => row.feedbacks += 1,
                }
                row.last_activity = Some(
                    row.last_activity
                        .map_or(activity.timestamp, |t| t.max(activity.timestamp)),
                );
            }
            row
        })
        .collect();

    rows.sort_by(|a, b| a.student_name.cmp(&b.student_name));
    rows
}
