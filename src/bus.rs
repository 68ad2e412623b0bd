//! In-process notification surface.
//!
//! Every cross-component signal in the prototype travels over [`EventBus`]
//! as an [`AppEvent`]. Any component may publish; any component may
//! subscribe. Delivery is synchronous and follows registration order —
//! nothing beyond that order is guaranteed across subscribers.

use std::sync::{Arc, Mutex};

use crate::pixel::PixelState;
use crate::settings::Settings;
use crate::shell::Section;

/// The application event set.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The user tapped the pixel.
    PixelActivated,
    /// The pixel indicator changed state.
    PixelStateChanged { state: PixelState },
    /// A conversation turn was committed to the history.
    ConversationAdded { text: String },
    /// A guided ritual reached and confirmed its final step.
    RitualCompleted { ritual: String },
    /// A ritual was chosen from outside the rituals panel.
    RitualSelected { ritual_id: String },
    /// The settings record changed; carries the full snapshot.
    SettingsUpdated { settings: Settings },
    /// The shell switched visible sections.
    SectionChanged { section: Section },
}

type Subscriber = Arc<dyn Fn(&AppEvent) + Send + Sync>;

/// Synchronous publish/subscribe bus.
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Subscribers are invoked in registration order.
    pub fn subscribe(&self, subscriber: impl Fn(&AppEvent) + Send + Sync + 'static) {
        self.lock_subscribers().push(Arc::new(subscriber));
    }

    /// Deliver `event` to every subscriber, in registration order.
    ///
    /// The subscriber list is snapshotted before dispatch, so a subscriber
    /// may publish further events from inside its callback.
    pub fn publish(&self, event: &AppEvent) {
        let snapshot: Vec<Subscriber> = self.lock_subscribers().clone();
        for subscriber in snapshot {
            subscriber(event);
        }
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }
}
