//! # Weekly Showcase Core Library
//!
//! Core business logic for Weekly Showcase, a tool for running randomized
//! student-presentation sessions: pick a presenter, time the presentation
//! and feedback slots, record history, report participation. All
//! operations are available through the standalone CLI binary; any GUI
//! would be a thin layer over this same library.
//!
//! ## Architecture
//!
//! - **Workflow**: the per-class session state machine; persists through
//!   the store before each visible transition
//! - **Timer**: a caller-driven countdown state machine with tap
//!   (pause/resume) and double-tap (skip) input
//! - **Store**: two interchangeable persistence backends (SQLite and a
//!   single JSON document) behind one trait
//! - **Reports**: participation aggregation over the append-only
//!   activity log
//!
//! ## Key Components
//!
//! - [`SessionWorkflow`]: the session state machine
//! - [`CountdownTimer`]: countdown for one timed slot
//! - [`Store`]: persistence contract both backends implement
//! - [`Config`]: application configuration management

pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod reports;
pub mod selection;
pub mod store;
pub mod timer;
pub mod workflow;

pub use config::Config;
pub use error::{ConfigError, CoreError, StoreError, WorkflowError};
pub use events::Event;
pub use model::{
    ActivityKind, Class, PresentationSession, Role, Student, StudentActivity, Subject, TimerSlot,
    UserProfile,
};
pub use reports::{participation, ParticipationRow};
pub use selection::select_random;
pub use store::{ActivityFilter, BackendKind, JsonStore, SqliteStore, Store};
pub use timer::{CountdownTimer, TimerState};
pub use workflow::{SessionWorkflow, WorkflowState};
