//! Persisted user settings.
//!
//! A flat record controlling the pixel's appearance, the companion's voice
//! tone, and haptic behavior. Updates are keyed like the original control
//! surface (`pixelColor`, `hapticIntensity`, …), coerced but otherwise
//! unvalidated, persisted immediately, and broadcast with the full
//! snapshot so other components can re-apply themselves.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::bus::{AppEvent, EventBus};
use crate::storage::{Store, SETTINGS_KEY};

/// Language register used for the companion's responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceTone {
    Gentle,
    Balanced,
    Direct,
}

impl std::str::FromStr for VoiceTone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gentle" => Ok(Self::Gentle),
            "balanced" => Ok(Self::Balanced),
            "direct" => Ok(Self::Direct),
            _ => Err(format!("unknown voice tone: {s}")),
        }
    }
}

/// The settings record. Persisted camelCase, matching the control surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub pixel_color: String,
    pub pixel_size: u32,
    pub voice_tone: VoiceTone,
    pub haptic_intensity: u8,
    pub haptic_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pixel_color: "#3498db".into(),
            pixel_size: 30,
            voice_tone: VoiceTone::Balanced,
            haptic_intensity: 5,
            haptic_enabled: true,
        }
    }
}

pub struct SettingsStore {
    settings: Mutex<Settings>,
    store: Arc<Store>,
    bus: Arc<EventBus>,
}

impl SettingsStore {
    /// Load persisted settings, or install and persist the defaults.
    pub fn load(store: Arc<Store>, bus: Arc<EventBus>) -> Self {
        let settings = match store.get_json::<Settings>(SETTINGS_KEY) {
            Some(settings) => settings,
            None => {
                let defaults = Settings::default();
                if let Err(e) = store.put_json(SETTINGS_KEY, &defaults) {
                    tracing::warn!(error = %e, "failed to persist default settings");
                }
                defaults
            }
        };

        Self {
            settings: Mutex::new(settings),
            store,
            bus,
        }
    }

    pub fn snapshot(&self) -> Settings {
        self.lock_settings().clone()
    }

    /// Apply a single keyed update.
    ///
    /// Numeric fields accept numbers or numeric strings and are clamped to
    /// their ranges; anything unrecognized — key or value — is a silent
    /// no-op. Successful updates persist and broadcast immediately.
    pub fn update(&self, key: &str, value: &serde_json::Value) {
        let changed = {
            let mut settings = self.lock_settings();
            match key {
                "pixelColor" => match value.as_str() {
                    Some(color) => {
                        settings.pixel_color = color.to_string();
                        true
                    }
                    None => false,
                },
                "pixelSize" => match coerce_int(value) {
                    Some(size) => {
                        settings.pixel_size = size.max(0) as u32;
                        true
                    }
                    None => false,
                },
                "voiceTone" => match value.as_str().and_then(|s| s.parse().ok()) {
                    Some(tone) => {
                        settings.voice_tone = tone;
                        true
                    }
                    None => false,
                },
                "hapticIntensity" => match coerce_int(value) {
                    Some(intensity) => {
                        settings.haptic_intensity = intensity.clamp(1, 10) as u8;
                        true
                    }
                    None => false,
                },
                "hapticEnabled" => match value.as_bool() {
                    Some(enabled) => {
                        settings.haptic_enabled = enabled;
                        true
                    }
                    None => false,
                },
                _ => {
                    tracing::debug!(key, "ignoring unknown settings key");
                    false
                }
            }
        };

        if changed {
            self.persist_and_broadcast();
        }
    }

    /// Restore the default snapshot, persist, and broadcast.
    pub fn reset(&self) {
        *self.lock_settings() = Settings::default();
        self.persist_and_broadcast();
    }

    /// The applied visual effect: a `:root` block of CSS custom properties.
    pub fn css_custom_properties(&self) -> String {
        let settings = self.lock_settings();
        format!(
            ":root {{\n  --pixel-color: {};\n  --pixel-size: {}px;\n}}\n",
            settings.pixel_color, settings.pixel_size
        )
    }

    fn persist_and_broadcast(&self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.store.put_json(SETTINGS_KEY, &snapshot) {
            tracing::warn!(error = %e, "failed to persist settings");
        }
        self.bus.publish(&AppEvent::SettingsUpdated { settings: snapshot });
    }

    fn lock_settings(&self) -> std::sync::MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Integer coercion: JSON numbers are truncated, strings are parsed.
fn coerce_int(value: &serde_json::Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if let Some(f) = value.as_f64() {
        return Some(f as i64);
    }
    value.as_str()?.trim().parse().ok()
}
