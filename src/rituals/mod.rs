//! Ritual flow engine.
//!
//! A linear step-sequencer over the catalog: `Closed -> Active(step) ->
//! Closed`. Sessions are ephemeral — nothing here is persisted, so a
//! restart always comes back closed.

pub mod catalog;

use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration};

use crate::bus::{AppEvent, EventBus};
use crate::haptics::{HapticCue, HapticSink};
use crate::pixel::{PixelIndicator, PixelState};
use catalog::{RitualDefinition, RitualStep};

/// How long the pixel dwells in thinking after a ritual opens.
const OPEN_THINKING_MS: u64 = 1500;

struct ActiveSession {
    ritual: &'static RitualDefinition,
    step_index: usize,
}

/// What the navigation controls should offer at the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavAffordances {
    pub prev_enabled: bool,
    pub next_label: &'static str,
}

/// A snapshot of the open session for rendering.
#[derive(Debug, Clone, Copy)]
pub struct SessionView {
    pub ritual_id: &'static str,
    pub ritual_title: &'static str,
    pub step_index: usize,
    pub step_count: usize,
    pub step: &'static RitualStep,
}

pub struct RitualFlowEngine {
    session: Mutex<Option<ActiveSession>>,
    bus: Arc<EventBus>,
    pixel: Arc<PixelIndicator>,
    haptics: Arc<dyn HapticSink>,
}

impl RitualFlowEngine {
    pub fn new(
        bus: Arc<EventBus>,
        pixel: Arc<PixelIndicator>,
        haptics: Arc<dyn HapticSink>,
    ) -> Self {
        Self {
            session: Mutex::new(None),
            bus,
            pixel,
            haptics,
        }
    }

    /// Open a ritual at step 0. Unknown ids are a silent no-op.
    pub fn start(&self, ritual_id: &str) {
        let Some(ritual) = catalog::find(ritual_id) else {
            tracing::debug!(ritual_id, "ignoring unknown ritual id");
            return;
        };

        *self.lock_session() = Some(ActiveSession {
            ritual,
            step_index: 0,
        });
        self.haptics.cue(HapticCue::Medium);

        // A beat of thinking while the practice opens, then settle back.
        self.pixel.set_state(PixelState::Thinking);
        let pixel = Arc::clone(&self.pixel);
        tokio::spawn(async move {
            sleep(Duration::from_millis(OPEN_THINKING_MS)).await;
            pixel.settle(PixelState::Thinking);
        });

        tracing::info!(ritual = ritual.id, "ritual started");
    }

    /// Step forward (+1) or back (-1). Moves that would leave the step
    /// range are no-ops; valid moves cue a short pulse.
    pub fn navigate(&self, direction: i32) {
        let mut session = self.lock_session();
        let Some(active) = session.as_mut() else {
            return;
        };

        let next = active.step_index as i64 + i64::from(direction);
        if next < 0 || next >= active.ritual.steps.len() as i64 {
            return;
        }

        active.step_index = next as usize;
        drop(session);
        self.haptics.cue(HapticCue::Short);
    }

    /// Confirm the final step: broadcast completion and close.
    ///
    /// A no-op unless the session is open at its last step.
    pub fn complete(&self) {
        let ritual_title = {
            let session = self.lock_session();
            match session.as_ref() {
                Some(active) if active.step_index == active.ritual.steps.len() - 1 => {
                    active.ritual.title
                }
                _ => return,
            }
        };

        self.bus.publish(&AppEvent::RitualCompleted {
            ritual: ritual_title.to_string(),
        });
        tracing::info!(ritual = ritual_title, "ritual completed");
        self.close();
    }

    /// Discard the session and return to closed.
    pub fn close(&self) {
        *self.lock_session() = None;
        self.pixel.pulse();
    }

    /// Snapshot of the open session, if any.
    pub fn current(&self) -> Option<SessionView> {
        let session = self.lock_session();
        session.as_ref().map(|active| SessionView {
            ritual_id: active.ritual.id,
            ritual_title: active.ritual.title,
            step_index: active.step_index,
            step_count: active.ritual.steps.len(),
            step: &active.ritual.steps[active.step_index],
        })
    }

    /// Navigation control state for the open session, if any.
    pub fn affordances(&self) -> Option<NavAffordances> {
        let session = self.lock_session();
        session.as_ref().map(|active| NavAffordances {
            prev_enabled: active.step_index > 0,
            next_label: if active.step_index == active.ritual.steps.len() - 1 {
                "Complete"
            } else {
                "Next"
            },
        })
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<ActiveSession>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}
