use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Student, TimerSlot};
use crate::timer::TimerState;
use crate::workflow::WorkflowState;

/// Every state change in the system produces an Event.
/// The CLI prints them; a GUI layer would subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        slot: TimerSlot,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        slot: TimerSlot,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        slot: TimerSlot,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerSkipped {
        slot: TimerSlot,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        slot: TimerSlot,
        at: DateTime<Utc>,
    },
    PresenterSelected {
        student: Student,
        at: DateTime<Utc>,
    },
    FeedbackGiverSelected {
        student: Student,
        at: DateTime<Utc>,
    },
    /// No eligible feedback giver; the round skips straight to lecturer
    /// feedback.
    FeedbackGiverUnavailable {
        at: DateTime<Utc>,
    },
    /// A full round was recorded: activities written, presenter marked.
    RoundRecorded {
        presenter_id: String,
        feedback_giver_id: Option<String>,
        presented_count: usize,
        at: DateTime<Utc>,
    },
    SessionReset {
        class_id: String,
        at: DateTime<Utc>,
    },
    WorkflowAdvanced {
        from: WorkflowState,
        to: WorkflowState,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        state: TimerState,
        slot: TimerSlot,
        remaining_secs: u64,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
}
