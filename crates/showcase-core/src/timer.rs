//! Countdown timer for the timed slots of a presentation round.
//!
//! The timer is a caller-driven state machine. It does not use internal
//! threads -- the driver calls `tick()` once per second while the timer is
//! running, and `poll()` between ticks to resolve a pending tap.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            \         /
//!             v       v
//!             Completed   (countdown reaches zero, or skip)
//! ```
//!
//! A single tap toggles Running/Paused; two taps within 300 ms are a
//! double-tap and skip the timer instead. The single-tap action is
//! therefore debounced for 300 ms before it is applied.
//!
//! Completion is emitted at most once per countdown lifecycle: an explicit
//! emission flag is checked before the event is produced, so a skip racing
//! a final tick can never double-fire.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::model::TimerSlot;

/// Two taps within this window count as a double-tap (skip).
const DOUBLE_TAP_WINDOW_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

impl TimerState {
    pub fn as_str(self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Completed => "completed",
        }
    }
}

/// Countdown timer for one slot.
///
/// Second-granularity, no drift correction; the cadence of `tick()` calls
/// is the clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownTimer {
    slot: TimerSlot,
    duration_secs: u64,
    remaining_secs: u64,
    state: TimerState,
    /// Epoch ms of an unresolved single tap awaiting the double-tap window.
    #[serde(default)]
    pending_tap_ms: Option<u64>,
    /// At-most-once guard for the completion event.
    #[serde(default)]
    completion_emitted: bool,
}

impl CountdownTimer {
    pub fn new(slot: TimerSlot, duration_secs: u64) -> Self {
        Self {
            slot,
            duration_secs,
            remaining_secs: duration_secs,
            state: TimerState::Idle,
            pending_tap_ms: None,
            completion_emitted: false,
        }
    }

    /// Timer for a slot at its configured default duration.
    pub fn for_slot(slot: TimerSlot) -> Self {
        Self::new(slot, slot.default_duration_secs())
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn slot(&self) -> TimerSlot {
        self.slot
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn snapshot(&self) -> Event {
        Event::TimerSnapshot {
            state: self.state,
            slot: self.slot,
            remaining_secs: self.remaining_secs,
            duration_secs: self.duration_secs,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                Some(Event::TimerStarted {
                    slot: self.slot,
                    duration_secs: self.duration_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// A tap on the timer. The first tap is held back for the double-tap
    /// window; a second tap inside the window skips instead of toggling.
    pub fn tap(&mut self) -> Option<Event> {
        self.tap_at(now_ms())
    }

    pub fn tap_at(&mut self, now_ms: u64) -> Option<Event> {
        if !matches!(self.state, TimerState::Running | TimerState::Paused) {
            return None;
        }

        match self.pending_tap_ms.take() {
            Some(first) if now_ms.saturating_sub(first) <= DOUBLE_TAP_WINDOW_MS => {
                self.skip()
            }
            Some(_) => {
                // The earlier tap outlived its window without being polled;
                // apply it, then hold the new one.
                let event = self.toggle();
                self.pending_tap_ms = Some(now_ms);
                event
            }
            None => {
                self.pending_tap_ms = Some(now_ms);
                None
            }
        }
    }

    /// Resolve a pending single tap once its double-tap window has lapsed.
    pub fn poll(&mut self) -> Option<Event> {
        self.poll_at(now_ms())
    }

    pub fn poll_at(&mut self, now_ms: u64) -> Option<Event> {
        match self.pending_tap_ms {
            Some(first) if now_ms.saturating_sub(first) > DOUBLE_TAP_WINDOW_MS => {
                self.pending_tap_ms = None;
                self.toggle()
            }
            _ => None,
        }
    }

    /// Force the countdown to zero and complete immediately.
    pub fn skip(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                self.pending_tap_ms = None;
                self.remaining_secs = 0;
                self.state = TimerState::Completed;
                let skipped = Event::TimerSkipped {
                    slot: self.slot,
                    at: Utc::now(),
                };
                // The completion event matters more to the driver than the
                // skip marker; emit completion if it has not fired yet.
                self.emit_completion().or(Some(skipped))
            }
            _ => None,
        }
    }

    /// One whole second elapses. Call once per second while running.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    pub fn tick_at(&mut self, now_ms: u64) -> Option<Event> {
        // A lapsed pending tap resolves first; if the timer is (still or
        // again) running afterwards, this tick's second counts as well.
        let resolved = self.poll_at(now_ms);

        if self.state != TimerState::Running {
            return resolved;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = TimerState::Completed;
            self.pending_tap_ms = None;
            return self.emit_completion().or(resolved);
        }
        resolved
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn toggle(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    slot: self.slot,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Paused => {
                self.state = TimerState::Running;
                Some(Event::TimerResumed {
                    slot: self.slot,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    fn emit_completion(&mut self) -> Option<Event> {
        if self.completion_emitted {
            return None;
        }
        self.completion_emitted = true;
        Some(Event::TimerCompleted {
            slot: self.slot,
            at: Utc::now(),
        })
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
