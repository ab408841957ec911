//! Drives one class's presentation session.
//!
//! The workflow controller and the timer for the current slot are parked
//! as JSON in the store's kv table between invocations, so `session tick`
//! can be called from a shell loop (or a wrapper) once per second and the
//! machine resumes exactly where it stopped.

use clap::Subcommand;
use serde::{Deserialize, Serialize};
use showcase_core::{
    Config, CountdownTimer, Event, SessionWorkflow, Store, TimerSlot, WorkflowState,
};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Print the workflow state, session, and timer snapshot
    Status {
        subject_id: String,
        class_id: String,
    },
    /// Start the next presentation round (runs the random selections)
    Next {
        subject_id: String,
        class_id: String,
    },
    /// One second elapses on the active timer
    Tick {
        subject_id: String,
        class_id: String,
    },
    /// Tap the timer: pause/resume, or skip on a double tap within 300ms
    Tap {
        subject_id: String,
        class_id: String,
    },
    /// Skip the active timer outright
    Skip {
        subject_id: String,
        class_id: String,
    },
    /// Clear the session and start over
    Reset {
        subject_id: String,
        class_id: String,
    },
}

/// Workflow plus the timer for the current slot.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassRun {
    workflow: SessionWorkflow,
    timer: Option<CountdownTimer>,
}

fn run_key(class_id: &str) -> String {
    format!("class_run:{class_id}")
}

fn load_run(
    store: &mut dyn Store,
    subject_id: &str,
    class_id: &str,
) -> Result<ClassRun, Box<dyn std::error::Error>> {
    if let Some(json) = store.kv_get(&run_key(class_id))? {
        if let Ok(mut run) = serde_json::from_str::<ClassRun>(&json) {
            // Roster edits made between invocations must reach the parked
            // workflow.
            run.workflow.refresh(store)?;
            return Ok(run);
        }
    }
    let workflow = SessionWorkflow::resume(store, subject_id, class_id)?;
    Ok(ClassRun {
        workflow,
        timer: None,
    })
}

fn save_run(store: &mut dyn Store, run: &ClassRun) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(run)?;
    store.kv_set(&run_key(&run.workflow.class().id), &json)?;
    Ok(())
}

/// Run any pending selection states, then arm the timer for the state the
/// workflow lands in.
fn settle(
    run: &mut ClassRun,
    store: &mut dyn Store,
    config: &Config,
    events: &mut Vec<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::thread_rng();
    loop {
        match run.workflow.state() {
            WorkflowState::SelectingPresenter => {
                events.push(run.workflow.select_presenter(store, &mut rng)?);
            }
            WorkflowState::SelectingFeedbackGiver => {
                events.push(run.workflow.select_feedback_giver(store, &mut rng)?);
            }
            _ => break,
        }
    }

    run.timer = run.workflow.state().timer_slot().map(|slot| {
        let mut timer = CountdownTimer::new(slot, config.duration_for(slot));
        if let Some(event) = timer.start() {
            events.push(event);
        }
        timer
    });
    Ok(())
}

/// Advance the workflow after the active timer completed its slot.
fn on_timer_complete(
    run: &mut ClassRun,
    store: &mut dyn Store,
    config: &Config,
    events: &mut Vec<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    let slot = run.timer.as_ref().map(CountdownTimer::slot);
    match slot {
        Some(TimerSlot::Presentation) => {
            events.push(run.workflow.complete_presentation()?);
        }
        Some(TimerSlot::StudentFeedback) => {
            events.push(run.workflow.complete_student_feedback(store)?);
        }
        Some(TimerSlot::LecturerFeedback) => {
            events.push(run.workflow.complete_lecturer_feedback()?);
        }
        Some(TimerSlot::Reflection) => {
            events.push(run.workflow.complete_reflection(store)?);
        }
        None => {}
    }
    settle(run, store, config, events)
}

fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut store = super::open_store(&config)?;
    let store = store.as_mut();

    match action {
        SessionAction::Status {
            subject_id,
            class_id,
        } => {
            let run = load_run(store, &subject_id, &class_id)?;
            println!("State: {}", run.workflow.state().as_str());
            println!(
                "{}",
                serde_json::to_string_pretty(run.workflow.session())?
            );
            if let Some(ref timer) = run.timer {
                println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
            }
            save_run(store, &run)?;
        }
        SessionAction::Next {
            subject_id,
            class_id,
        } => {
            let mut run = load_run(store, &subject_id, &class_id)?;
            let mut events = vec![run.workflow.start_next()?];
            settle(&mut run, store, &config, &mut events)?;
            save_run(store, &run)?;
            print_events(&events)?;
        }
        SessionAction::Tick {
            subject_id,
            class_id,
        } => {
            let mut run = load_run(store, &subject_id, &class_id)?;
            let mut events = Vec::new();
            let Some(timer) = run.timer.as_mut() else {
                println!("No timer running in the {} state", run.workflow.state().as_str());
                return Ok(());
            };
            if let Some(event) = timer.tick() {
                let completed = matches!(event, Event::TimerCompleted { .. });
                events.push(event);
                if completed {
                    on_timer_complete(&mut run, store, &config, &mut events)?;
                }
            }
            save_run(store, &run)?;
            print_events(&events)?;
        }
        SessionAction::Tap {
            subject_id,
            class_id,
        } => {
            let mut run = load_run(store, &subject_id, &class_id)?;
            let mut events = Vec::new();
            let Some(timer) = run.timer.as_mut() else {
                println!("No timer running in the {} state", run.workflow.state().as_str());
                return Ok(());
            };
            match timer.tap() {
                Some(event) => {
                    let completed = matches!(event, Event::TimerCompleted { .. });
                    events.push(event);
                    if completed {
                        on_timer_complete(&mut run, store, &config, &mut events)?;
                    }
                }
                // Single tap held for the double-tap window; show where the
                // timer stands so the tap is visibly registered.
                None => events.push(timer.snapshot()),
            }
            save_run(store, &run)?;
            print_events(&events)?;
        }
        SessionAction::Skip {
            subject_id,
            class_id,
        } => {
            let mut run = load_run(store, &subject_id, &class_id)?;
            let mut events = Vec::new();
            let Some(timer) = run.timer.as_mut() else {
                println!("No timer running in the {} state", run.workflow.state().as_str());
                return Ok(());
            };
            if let Some(event) = timer.skip() {
                let completed = matches!(event, Event::TimerCompleted { .. });
                events.push(event);
                if completed {
                    on_timer_complete(&mut run, store, &config, &mut events)?;
                }
            }
            save_run(store, &run)?;
            print_events(&events)?;
        }
        SessionAction::Reset {
            subject_id,
            class_id,
        } => {
            let mut run = load_run(store, &subject_id, &class_id)?;
            let event = run.workflow.reset(store)?;
            run.timer = None;
            save_run(store, &run)?;
            print_events(&[event])?;
        }
    }
    Ok(())
}
