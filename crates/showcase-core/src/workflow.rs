//! Presentation-session workflow.
//!
//! One [`SessionWorkflow`] instance owns the `PresentationSession` for a
//! class for the lifetime of a view. Every transition that mutates the
//! session persists through the store *before* the visible state advances;
//! when a store write fails the in-memory state is left untouched so the
//! caller can retry. Transitions are legal only from their expected state
//! -- anything else is an `InvalidTransition` error, enforced here and
//! nowhere else.
//!
//! ## States
//!
//! ```text
//! Start -> SelectingPresenter -> Presentation -> SelectingFeedbackGiver
//!       -> StudentFeedback -> LecturerFeedback -> Reflection -> Start
//! ```
//!
//! with `Summary` reached from `Start`/`SelectingPresenter` when the
//! roster is exhausted and from `Reflection` when the last student has
//! presented. `SelectingFeedbackGiver` skips straight to
//! `LecturerFeedback` when nobody is eligible.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError, WorkflowError};
use crate::events::Event;
use crate::model::{
    generate_id, now_millis, ActivityKind, Class, PresentationSession, Student, StudentActivity,
    Subject, TimerSlot,
};
use crate::selection::select_random;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Start,
    SelectingPresenter,
    Presentation,
    SelectingFeedbackGiver,
    StudentFeedback,
    LecturerFeedback,
    Reflection,
    Summary,
}

impl WorkflowState {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowState::Start => "start",
            WorkflowState::SelectingPresenter => "selecting_presenter",
            WorkflowState::Presentation => "presentation",
            WorkflowState::SelectingFeedbackGiver => "selecting_feedback_giver",
            WorkflowState::StudentFeedback => "student_feedback",
            WorkflowState::LecturerFeedback => "lecturer_feedback",
            WorkflowState::Reflection => "reflection",
            WorkflowState::Summary => "summary",
        }
    }

    /// The timed slot shown in this state, if any.
    pub fn timer_slot(self) -> Option<TimerSlot> {
        match self {
            WorkflowState::Presentation => Some(TimerSlot::Presentation),
            WorkflowState::StudentFeedback => Some(TimerSlot::StudentFeedback),
            WorkflowState::LecturerFeedback => Some(TimerSlot::LecturerFeedback),
            WorkflowState::Reflection => Some(TimerSlot::Reflection),
            _ => None,
        }
    }
}

/// Workflow controller for one class session.
///
/// Serializable so a CLI invocation can park it in the store's kv table
/// and resume where the previous invocation left off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionWorkflow {
    subject: Subject,
    class: Class,
    session: PresentationSession,
    state: WorkflowState,
}

impl SessionWorkflow {
    /// Load or create the session for a class and position the workflow.
    ///
    /// A roster already fully presented lands directly in `Summary`, not
    /// `Start`.
    pub fn resume(store: &mut dyn Store, subject_id: &str, class_id: &str) -> Result<Self> {
        let subject = store.subject(subject_id)?;
        let class = subject
            .class(class_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: "class",
                id: class_id.to_string(),
            })?;

        let session = match store.get_session(class_id)? {
            Some(existing) => existing,
            None => {
                let fresh = PresentationSession::new(class_id);
                store.save_session(&fresh)?;
                fresh
            }
        };

        let state = if session.roster_exhausted(&subject.students) {
            WorkflowState::Summary
        } else {
            WorkflowState::Start
        };

        Ok(Self {
            subject,
            class,
            session,
            state,
        })
    }

    /// Re-read the subject and class from the store so roster edits made
    /// outside this controller become visible. Mid-round state is kept;
    /// between rounds the Start/Summary position is recomputed against the
    /// fresh roster.
    pub fn refresh(&mut self, store: &mut dyn Store) -> Result<()> {
        let subject = store.subject(&self.subject.id)?;
        let class = subject
            .class(&self.class.id)
            .cloned()
            .ok_or(StoreError::NotFound {
                kind: "class",
                id: self.class.id.clone(),
            })?;

        self.subject = subject;
        self.class = class;
        if matches!(self.state, WorkflowState::Start | WorkflowState::Summary) {
            self.state = if self.session.roster_exhausted(&self.subject.students) {
                WorkflowState::Summary
            } else {
                WorkflowState::Start
            };
        }
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn session(&self) -> &PresentationSession {
        &self.session
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn roster(&self) -> &[Student] {
        &self.subject.students
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// "Start/next presentation" from the start screen or the summary.
    pub fn start_next(&mut self) -> Result<Event> {
        self.expect_state(
            &[WorkflowState::Start, WorkflowState::Summary],
            "start next presentation",
        )?;

        if self.subject.students.is_empty() {
            return Err(WorkflowError::NoStudents.into());
        }

        if self.session.roster_exhausted(&self.subject.students) {
            return Ok(self.advance(WorkflowState::Summary));
        }

        Ok(self.advance(WorkflowState::SelectingPresenter))
    }

    /// Pick the presenter for this round and persist it before advancing.
    pub fn select_presenter<R: Rng>(
        &mut self,
        store: &mut dyn Store,
        rng: &mut R,
    ) -> Result<Event> {
        self.expect_state(&[WorkflowState::SelectingPresenter], "select presenter")?;

        let Some(presenter) = select_random(
            &self.subject.students,
            &self.session.presented_student_ids,
            rng,
        )
        .cloned() else {
            return Ok(self.advance(WorkflowState::Summary));
        };

        let mut updated = self.session.clone();
        updated.current_presenter = Some(presenter.clone());
        store.save_session(&updated)?;

        self.session = updated;
        self.state = WorkflowState::Presentation;
        Ok(Event::PresenterSelected {
            student: presenter,
            at: Utc::now(),
        })
    }

    /// The presentation timer finished.
    pub fn complete_presentation(&mut self) -> Result<Event> {
        self.expect_state(&[WorkflowState::Presentation], "complete presentation")?;
        self.current_presenter()?;
        Ok(self.advance(WorkflowState::SelectingFeedbackGiver))
    }

    /// Pick a feedback giver, or skip to lecturer feedback when nobody is
    /// eligible (the presenter is excluded by construction).
    pub fn select_feedback_giver<R: Rng>(
        &mut self,
        store: &mut dyn Store,
        rng: &mut R,
    ) -> Result<Event> {
        self.expect_state(
            &[WorkflowState::SelectingFeedbackGiver],
            "select feedback giver",
        )?;
        let presenter = self.current_presenter()?.clone();

        let mut exclude = self.session.feedback_given_student_ids.clone();
        exclude.push(presenter.id);

        let Some(giver) = select_random(&self.subject.students, &exclude, rng).cloned() else {
            self.state = WorkflowState::LecturerFeedback;
            return Ok(Event::FeedbackGiverUnavailable { at: Utc::now() });
        };

        let mut updated = self.session.clone();
        updated.current_feedback_giver = Some(giver.clone());
        store.save_session(&updated)?;

        self.session = updated;
        self.state = WorkflowState::StudentFeedback;
        Ok(Event::FeedbackGiverSelected {
            student: giver,
            at: Utc::now(),
        })
    }

    /// The student-feedback timer finished; the giver is marked as having
    /// given feedback for this session.
    pub fn complete_student_feedback(&mut self, store: &mut dyn Store) -> Result<Event> {
        self.expect_state(&[WorkflowState::StudentFeedback], "complete student feedback")?;
        let giver = self
            .session
            .current_feedback_giver
            .clone()
            .ok_or(WorkflowError::MissingSelection {
                role: "feedback giver",
            })?;

        let mut updated = self.session.clone();
        if !updated.feedback_given_student_ids.contains(&giver.id) {
            updated.feedback_given_student_ids.push(giver.id);
        }
        store.save_session(&updated)?;

        self.session = updated;
        Ok(self.advance(WorkflowState::LecturerFeedback))
    }

    /// The lecturer-feedback timer finished. No persistence here.
    pub fn complete_lecturer_feedback(&mut self) -> Result<Event> {
        self.expect_state(&[WorkflowState::LecturerFeedback], "complete lecturer feedback")?;
        Ok(self.advance(WorkflowState::Reflection))
    }

    /// The reflection timer finished: record the round.
    ///
    /// Activity records are written first; they are append-only and a
    /// duplicate from a retried round is harmless, whereas losing the
    /// session update would not be.
    pub fn complete_reflection(&mut self, store: &mut dyn Store) -> Result<Event> {
        self.expect_state(&[WorkflowState::Reflection], "complete reflection")?;
        let presenter = self.current_presenter()?.clone();
        let giver = self.session.current_feedback_giver.clone();
        let timestamp = now_millis();

        store.append_activity(&self.activity(
            &presenter.id,
            ActivityKind::Presentation,
            timestamp,
        ))?;
        if let Some(ref giver) = giver {
            store.append_activity(&self.activity(&giver.id, ActivityKind::Feedback, timestamp))?;
        }

        let mut updated = self.session.clone();
        if !updated.presented_student_ids.contains(&presenter.id) {
            updated.presented_student_ids.push(presenter.id.clone());
        }
        updated.current_presenter = None;
        updated.current_feedback_giver = None;

        store.save_session(&updated)?;
        store.update_class_timestamp(&self.subject.id, &self.class.id, timestamp)?;

        self.session = updated;
        self.class.last_session_timestamp = Some(timestamp);
        self.state = if self.session.roster_exhausted(&self.subject.students) {
            WorkflowState::Summary
        } else {
            WorkflowState::Start
        };

        Ok(Event::RoundRecorded {
            presenter_id: presenter.id,
            feedback_giver_id: giver.map(|g| g.id),
            presented_count: self.session.presented_student_ids.len(),
            at: Utc::now(),
        })
    }

    /// Clear the session and start over from an empty state. Available
    /// from any state; a teacher may abandon a round.
    pub fn reset(&mut self, store: &mut dyn Store) -> Result<Event> {
        store.clear_session(&self.class.id)?;
        let fresh = PresentationSession::new(&self.class.id);
        store.save_session(&fresh)?;

        self.session = fresh;
        self.state = WorkflowState::Start;
        Ok(Event::SessionReset {
            class_id: self.class.id.clone(),
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn expect_state(
        &self,
        allowed: &[WorkflowState],
        action: &'static str,
    ) -> Result<(), WorkflowError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition {
                state: self.state.as_str(),
                action,
            })
        }
    }

    fn current_presenter(&self) -> Result<&Student, WorkflowError> {
        self.session
            .current_presenter
            .as_ref()
            .ok_or(WorkflowError::MissingSelection { role: "presenter" })
    }

    fn advance(&mut self, to: WorkflowState) -> Event {
        let from = self.state;
        self.state = to;
        Event::WorkflowAdvanced {
            from,
            to,
            at: Utc::now(),
        }
    }

    fn activity(&self, student_id: &str, kind: ActivityKind, timestamp: i64) -> StudentActivity {
        StudentActivity {
            id: generate_id(),
            student_id: student_id.to_string(),
            class_id: self.class.id.clone(),
            subject_id: self.subject.id.clone(),
            activity_type: kind,
            timestamp,
            class_name: Some(self.class.name.clone()),
            subject_name: Some(self.subject.name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::store::sqlite::SqliteStore;
    use crate::store::ActivityFilter;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn seeded() -> Mcg128Xsl64 {
        Mcg128Xsl64::seed_from_u64(7)
    }

    fn setup(names: &[&str]) -> (SqliteStore, String, String) {
        let mut store = SqliteStore::open_memory().unwrap();
        let mut subject = Subject::new("Rhetoric", "teacher-1");
        for name in names {
            subject.students.push(Student::new(*name));
        }
        subject.classes.push(Class::new("Group A"));
        let class_id = subject.classes[0].id.clone();
        let subject_id = subject.id.clone();
        store.add_subject(&subject).unwrap();
        (store, subject_id, class_id)
    }

    /// Drive one full round: selection, all four timer completions.
    fn run_round(flow: &mut SessionWorkflow, store: &mut SqliteStore, rng: &mut Mcg128Xsl64) {
        flow.start_next().unwrap();
        flow.select_presenter(store, rng).unwrap();
        if flow.state() == WorkflowState::Summary {
            return;
        }
        flow.complete_presentation().unwrap();
        flow.select_feedback_giver(store, rng).unwrap();
        if flow.state() == WorkflowState::StudentFeedback {
            flow.complete_student_feedback(store).unwrap();
        }
        flow.complete_lecturer_feedback().unwrap();
        flow.complete_reflection(store).unwrap();
    }

    #[test]
    fn empty_roster_blocks_start() {
        let (mut store, subject_id, class_id) = setup(&[]);
        let mut flow = SessionWorkflow::resume(&mut store, &subject_id, &class_id).unwrap();

        assert_eq!(flow.state(), WorkflowState::Start);
        let err = flow.start_next().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Workflow(WorkflowError::NoStudents)
        ));
        assert_eq!(flow.state(), WorkflowState::Start);
    }

    #[test]
    fn full_round_with_two_students() {
        let (mut store, subject_id, class_id) = setup(&["A", "B"]);
        let mut flow = SessionWorkflow::resume(&mut store, &subject_id, &class_id).unwrap();
        let mut rng = seeded();

        flow.start_next().unwrap();
        assert_eq!(flow.state(), WorkflowState::SelectingPresenter);

        let event = flow.select_presenter(&mut store, &mut rng).unwrap();
        let presenter = match event {
            Event::PresenterSelected { student, .. } => student,
            other => panic!("expected PresenterSelected, got {other:?}"),
        };
        assert_eq!(flow.state(), WorkflowState::Presentation);

        flow.complete_presentation().unwrap();
        assert_eq!(flow.state(), WorkflowState::SelectingFeedbackGiver);

        let event = flow.select_feedback_giver(&mut store, &mut rng).unwrap();
        let giver = match event {
            Event::FeedbackGiverSelected { student, .. } => student,
            other => panic!("expected FeedbackGiverSelected, got {other:?}"),
        };
        assert_ne!(giver.id, presenter.id, "presenter excluded by construction");
        assert_eq!(flow.state(), WorkflowState::StudentFeedback);

        flow.complete_student_feedback(&mut store).unwrap();
        assert_eq!(flow.state(), WorkflowState::LecturerFeedback);
        assert_eq!(flow.session().feedback_given_student_ids, vec![giver.id.clone()]);

        flow.complete_lecturer_feedback().unwrap();
        assert_eq!(flow.state(), WorkflowState::Reflection);

        flow.complete_reflection(&mut store).unwrap();
        assert_eq!(flow.state(), WorkflowState::Start, "one student left");
        assert_eq!(flow.session().presented_student_ids, vec![presenter.id.clone()]);
        assert!(flow.session().current_presenter.is_none());
        assert!(flow.session().current_feedback_giver.is_none());
        assert!(flow.class().last_session_timestamp.is_some());

        // Two activities: one presentation, one feedback.
        let activities = store.activities(&ActivityFilter::default()).unwrap();
        assert_eq!(activities.len(), 2);
        assert!(activities.iter().any(|a| {
            a.student_id == presenter.id && a.activity_type == ActivityKind::Presentation
        }));
        assert!(activities
            .iter()
            .any(|a| a.student_id == giver.id && a.activity_type == ActivityKind::Feedback));

        // The persisted session matches the in-memory one.
        let stored = store.get_session(&class_id).unwrap().unwrap();
        assert_eq!(&stored, flow.session());
    }

    #[test]
    fn single_student_round_ends_in_summary_without_feedback() {
        let (mut store, subject_id, class_id) = setup(&["A"]);
        let mut flow = SessionWorkflow::resume(&mut store, &subject_id, &class_id).unwrap();
        let mut rng = seeded();

        flow.start_next().unwrap();
        flow.select_presenter(&mut store, &mut rng).unwrap();
        flow.complete_presentation().unwrap();

        // Sole candidate equals the presenter: no eligible giver.
        let event = flow.select_feedback_giver(&mut store, &mut rng).unwrap();
        assert!(matches!(event, Event::FeedbackGiverUnavailable { .. }));
        assert_eq!(flow.state(), WorkflowState::LecturerFeedback);

        flow.complete_lecturer_feedback().unwrap();
        flow.complete_reflection(&mut store).unwrap();
        assert_eq!(flow.state(), WorkflowState::Summary);

        let activities = store.activities(&ActivityFilter::default()).unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].activity_type, ActivityKind::Presentation);
    }

    #[test]
    fn presented_ids_grow_without_duplicates_until_summary() {
        let (mut store, subject_id, class_id) = setup(&["A", "B", "C"]);
        let mut flow = SessionWorkflow::resume(&mut store, &subject_id, &class_id).unwrap();
        let mut rng = seeded();

        let mut last_len = 0;
        while flow.state() != WorkflowState::Summary {
            run_round(&mut flow, &mut store, &mut rng);
            let ids = &flow.session().presented_student_ids;
            assert!(ids.len() >= last_len, "presented ids must not shrink");
            let mut unique = ids.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), ids.len(), "no duplicate presenter ids");
            last_len = ids.len();
        }
        assert_eq!(flow.session().presented_student_ids.len(), 3);
    }

    #[test]
    fn exhausted_roster_resumes_into_summary() {
        let (mut store, subject_id, class_id) = setup(&["A"]);
        let roster_id = {
            let subject = store.subject(&subject_id).unwrap();
            subject.students[0].id.clone()
        };
        let mut session = PresentationSession::new(&class_id);
        session.presented_student_ids.push(roster_id);
        store.save_session(&session).unwrap();

        let flow = SessionWorkflow::resume(&mut store, &subject_id, &class_id).unwrap();
        assert_eq!(flow.state(), WorkflowState::Summary);
    }

    #[test]
    fn reset_clears_session() {
        let (mut store, subject_id, class_id) = setup(&["A", "B"]);
        let mut flow = SessionWorkflow::resume(&mut store, &subject_id, &class_id).unwrap();
        let mut rng = seeded();
        run_round(&mut flow, &mut store, &mut rng);
        assert!(!flow.session().presented_student_ids.is_empty());

        flow.reset(&mut store).unwrap();
        assert_eq!(flow.state(), WorkflowState::Start);
        assert!(flow.session().presented_student_ids.is_empty());
        assert!(flow.session().feedback_given_student_ids.is_empty());
        assert!(flow.session().current_presenter.is_none());
        assert!(flow.session().current_feedback_giver.is_none());

        let stored = store.get_session(&class_id).unwrap().unwrap();
        assert!(stored.presented_student_ids.is_empty());
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        let (mut store, subject_id, class_id) = setup(&["A", "B"]);
        let mut flow = SessionWorkflow::resume(&mut store, &subject_id, &class_id).unwrap();
        let mut rng = seeded();

        assert!(flow.complete_presentation().is_err());
        assert!(flow.complete_lecturer_feedback().is_err());
        assert!(flow.complete_reflection(&mut store).is_err());
        assert!(flow.select_feedback_giver(&mut store, &mut rng).is_err());
        assert_eq!(flow.state(), WorkflowState::Start);
    }

    #[test]
    fn failed_save_leaves_state_unchanged() {
        struct FailingStore;
        impl Store for FailingStore {
            fn subjects_for_owner(&self, _: &str) -> Result<Vec<Subject>, StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn subject(&self, _: &str) -> Result<Subject, StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn add_subject(&mut self, _: &Subject) -> Result<(), StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn remove_subject(&mut self, _: &str) -> Result<(), StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn add_class(&mut self, _: &str, _: &Class) -> Result<(), StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn remove_class(&mut self, _: &str, _: &str) -> Result<(), StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn update_class_timestamp(&mut self, _: &str, _: &str, _: i64) -> Result<(), StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn add_student_to_subject(&mut self, _: &str, _: &Student) -> Result<(), StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn remove_student_from_subject(&mut self, _: &str, _: &str) -> Result<(), StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn get_session(&self, _: &str) -> Result<Option<PresentationSession>, StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn save_session(&mut self, _: &PresentationSession) -> Result<(), StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn clear_session(&mut self, _: &str) -> Result<(), StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn append_activity(&mut self, _: &StudentActivity) -> Result<(), StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn activities(
                &self,
                _: &ActivityFilter,
            ) -> Result<Vec<StudentActivity>, StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn kv_get(&self, _: &str) -> Result<Option<String>, StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
            fn kv_set(&mut self, _: &str, _: &str) -> Result<(), StoreError> {
                Err(StoreError::OperationFailed("down".into()))
            }
        }

        let (mut store, subject_id, class_id) = setup(&["A", "B"]);
        let mut flow = SessionWorkflow::resume(&mut store, &subject_id, &class_id).unwrap();
        let mut rng = seeded();
        flow.start_next().unwrap();

        let mut failing = FailingStore;
        assert!(flow.select_presenter(&mut failing, &mut rng).is_err());
        // Not advanced, nothing selected; the user can retry.
        assert_eq!(flow.state(), WorkflowState::SelectingPresenter);
        assert!(flow.session().current_presenter.is_none());

        // Retry against the healthy store succeeds.
        flow.select_presenter(&mut store, &mut rng).unwrap();
        assert_eq!(flow.state(), WorkflowState::Presentation);
    }

    #[test]
    fn roster_changes_reach_a_parked_workflow() {
        let (mut store, subject_id, class_id) = setup(&["A"]);
        let mut flow = SessionWorkflow::resume(&mut store, &subject_id, &class_id).unwrap();
        let mut rng = seeded();
        run_round(&mut flow, &mut store, &mut rng);
        assert_eq!(flow.state(), WorkflowState::Summary);

        // Park and restore the controller the way the CLI does between
        // invocations, enrolling a new student in the meantime.
        let parked = serde_json::to_string(&flow).unwrap();
        store
            .add_student_to_subject(&subject_id, &Student::new("B"))
            .unwrap();
        let mut flow: SessionWorkflow = serde_json::from_str(&parked).unwrap();
        flow.refresh(&mut store).unwrap();

        assert_eq!(
            flow.state(),
            WorkflowState::Start,
            "roster is no longer exhausted"
        );
        assert_eq!(flow.roster().len(), 2);

        flow.start_next().unwrap();
        let event = flow.select_presenter(&mut store, &mut rng).unwrap();
        let presenter = match event {
            Event::PresenterSelected { student, .. } => student,
            other => panic!("expected PresenterSelected, got {other:?}"),
        };
        assert_eq!(presenter.name, "B", "only the new student has not presented");
    }

    #[test]
    fn refresh_keeps_mid_round_state() {
        let (mut store, subject_id, class_id) = setup(&["A", "B"]);
        let mut flow = SessionWorkflow::resume(&mut store, &subject_id, &class_id).unwrap();
        let mut rng = seeded();

        flow.start_next().unwrap();
        flow.select_presenter(&mut store, &mut rng).unwrap();
        assert_eq!(flow.state(), WorkflowState::Presentation);

        store
            .add_student_to_subject(&subject_id, &Student::new("C"))
            .unwrap();
        flow.refresh(&mut store).unwrap();

        // The round in progress is untouched, the roster is current.
        assert_eq!(flow.state(), WorkflowState::Presentation);
        assert!(flow.session().current_presenter.is_some());
        assert_eq!(flow.roster().len(), 3);
    }

    #[test]
    fn timer_slots_follow_states() {
        assert_eq!(
            WorkflowState::Presentation.timer_slot(),
            Some(TimerSlot::Presentation)
        );
        assert_eq!(
            WorkflowState::Reflection.timer_slot(),
            Some(TimerSlot::Reflection)
        );
        assert_eq!(WorkflowState::Start.timer_slot(), None);
        assert_eq!(WorkflowState::Summary.timer_slot(), None);
    }
}
