//! The pixel state indicator.
//!
//! A four-state machine reflecting the companion's conversational phase.
//! Transitions are triggered externally by the conversation and ritual
//! engines; each one emits a fixed haptic cue and broadcasts a
//! state-change notification. The indicator owns no timers — every
//! return-to-idle delay belongs to the caller that left idle.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::bus::{AppEvent, EventBus};
use crate::haptics::{HapticCue, HapticSink};

/// Conversational phase of the companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelState {
    Idle,
    Listening,
    Thinking,
    Speaking,
}

impl PixelState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Thinking => "thinking",
            Self::Speaking => "speaking",
        }
    }

    /// The cue emitted when entering this state, if any.
    fn entry_cue(&self) -> Option<HapticCue> {
        match self {
            Self::Idle => None,
            Self::Listening => Some(HapticCue::Short),
            Self::Thinking => Some(HapticCue::Medium),
            Self::Speaking => Some(HapticCue::Pattern),
        }
    }
}

impl std::fmt::Display for PixelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PixelState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "listening" => Ok(Self::Listening),
            "thinking" => Ok(Self::Thinking),
            "speaking" => Ok(Self::Speaking),
            _ => Err(format!("unknown pixel state: {s}")),
        }
    }
}

/// The indicator itself. One per application.
pub struct PixelIndicator {
    state: Mutex<PixelState>,
    bus: Arc<EventBus>,
    haptics: Arc<dyn HapticSink>,
}

impl PixelIndicator {
    pub fn new(bus: Arc<EventBus>, haptics: Arc<dyn HapticSink>) -> Self {
        Self {
            state: Mutex::new(PixelState::Idle),
            bus,
            haptics,
        }
    }

    pub fn state(&self) -> PixelState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Transition to `next`, emit its entry cue, and broadcast the change.
    pub fn set_state(&self, next: PixelState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;

        if let Some(cue) = next.entry_cue() {
            self.haptics.cue(cue);
        }
        self.bus
            .publish(&AppEvent::PixelStateChanged { state: next });
    }

    /// Return to idle only if still in `expected`.
    ///
    /// Callers that left idle use this for their bounded-delay return so a
    /// state set by a newer user action is not stomped.
    pub fn settle(&self, expected: PixelState) {
        {
            let current = self.state.lock().unwrap_or_else(|e| e.into_inner());
            if *current != expected {
                return;
            }
        }
        self.set_state(PixelState::Idle);
    }

    /// User tap: move to listening and announce the activation.
    pub fn activate(&self) {
        self.set_state(PixelState::Listening);
        self.bus.publish(&AppEvent::PixelActivated);
    }

    /// Attention pulse — a short cue with no state change.
    pub fn pulse(&self) {
        self.haptics.cue(HapticCue::Short);
    }
}
