//! Application shell.
//!
//! Builds every component, wires them together over the event bus, and
//! routes visibility between the top-level sections. All wiring is explicit
//! construction-time dependency injection — components never reach for each
//! other directly, only through the bus.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, Weak};

use crate::bus::{AppEvent, EventBus};
use crate::config::KindredConfig;
use crate::conversation::ConversationEngine;
use crate::haptics::{HapticPrefs, HapticSink, LogHapticSink};
use crate::memory::MemoryGraphBuilder;
use crate::pixel::PixelIndicator;
use crate::rituals::RitualFlowEngine;
use crate::settings::SettingsStore;
use crate::storage::Store;

/// The navigable panels. Fragments match the prototype's section ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "main-interface")]
    MainInterface,
    #[serde(rename = "rituals-section")]
    Rituals,
    #[serde(rename = "memory-section")]
    Memory,
    #[serde(rename = "settings-section")]
    Settings,
}

impl Section {
    pub fn as_fragment(&self) -> &'static str {
        match self {
            Self::MainInterface => "main-interface",
            Self::Rituals => "rituals-section",
            Self::Memory => "memory-section",
            Self::Settings => "settings-section",
        }
    }

    /// Resolve a URL fragment against the allow-list.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        match fragment {
            "main-interface" => Some(Self::MainInterface),
            "rituals-section" => Some(Self::Rituals),
            "memory-section" => Some(Self::Memory),
            "settings-section" => Some(Self::Settings),
            _ => None,
        }
    }
}

pub struct Shell {
    pub bus: Arc<EventBus>,
    pub store: Arc<Store>,
    pub pixel: Arc<PixelIndicator>,
    pub settings: Arc<SettingsStore>,
    pub memory: Arc<MemoryGraphBuilder>,
    pub conversation: Arc<ConversationEngine>,
    pub rituals: Arc<RitualFlowEngine>,
    section: Mutex<Section>,
}

impl Shell {
    /// Construct and wire the full component cluster.
    pub fn build(config: &KindredConfig, store: Arc<Store>) -> Arc<Self> {
        let bus = Arc::new(EventBus::new());
        let haptics: Arc<dyn HapticSink> = Arc::new(LogHapticSink::new());
        let pixel = Arc::new(PixelIndicator::new(Arc::clone(&bus), Arc::clone(&haptics)));

        let settings = Arc::new(SettingsStore::load(Arc::clone(&store), Arc::clone(&bus)));
        let snapshot = settings.snapshot();
        haptics.set_prefs(HapticPrefs {
            enabled: snapshot.haptic_enabled,
            intensity: snapshot.haptic_intensity,
        });

        let memory = Arc::new(MemoryGraphBuilder::load(Arc::clone(&store)));
        if config.memory.seed_sample {
            memory.seed_sample();
        }

        let conversation = ConversationEngine::new(
            Arc::clone(&store),
            Arc::clone(&bus),
            Arc::clone(&pixel),
            config.conversation,
        );

        let rituals = Arc::new(RitualFlowEngine::new(
            Arc::clone(&bus),
            Arc::clone(&pixel),
            Arc::clone(&haptics),
        ));

        let shell = Arc::new(Self {
            bus: Arc::clone(&bus),
            store,
            pixel,
            settings,
            memory,
            conversation,
            rituals,
            section: Mutex::new(Section::MainInterface),
        });

        shell.wire(&haptics);
        shell
    }

    /// Subscribe the cross-component reactions.
    fn wire(self: &Arc<Self>, haptics: &Arc<dyn HapticSink>) {
        let memory = Arc::clone(&self.memory);
        let conversation = Arc::clone(&self.conversation);
        let haptics = Arc::clone(haptics);
        let weak: Weak<Shell> = Arc::downgrade(self);

        self.bus.subscribe(move |event| match event {
            AppEvent::ConversationAdded { text } => {
                memory.add_node("conversation", text, Utc::now());
            }
            AppEvent::RitualCompleted { ritual } => {
                memory.add_node("ritual", &format!("Completed {ritual} ritual"), Utc::now());
            }
            AppEvent::RitualSelected { ritual_id } => {
                if let Some(shell) = weak.upgrade() {
                    shell.switch_section("rituals-section");
                    shell.rituals.start(ritual_id);
                }
            }
            AppEvent::SettingsUpdated { settings } => {
                haptics.set_prefs(HapticPrefs {
                    enabled: settings.haptic_enabled,
                    intensity: settings.haptic_intensity,
                });
            }
            AppEvent::PixelActivated => {
                // A tap with no pending turn invites the companion to speak.
                conversation.initiate();
            }
            _ => {}
        });
    }

    /// Switch visible sections by URL fragment. Unknown fragments are ignored.
    pub fn switch_section(&self, fragment: &str) {
        let Some(section) = Section::from_fragment(fragment) else {
            tracing::debug!(fragment, "ignoring unknown section fragment");
            return;
        };

        {
            let mut current = self.section.lock().unwrap_or_else(|e| e.into_inner());
            if *current == section {
                return;
            }
            *current = section;
        }

        self.bus.publish(&AppEvent::SectionChanged { section });
        self.pixel.pulse();
    }

    pub fn section(&self) -> Section {
        *self.section.lock().unwrap_or_else(|e| e.into_inner())
    }
}
