//! Haptic cue sink.
//!
//! Provides the [`HapticSink`] trait at the seam between the engines and
//! whatever the host platform does with vibration, plus [`LogHapticSink`],
//! which computes the prototype's vibration patterns and emits them as
//! structured log events. Tests substitute a recording sink.

use std::sync::Mutex;

/// The four cue shapes used across the prototype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticCue {
    Short,
    Medium,
    Long,
    /// Three pulses — the "speaking" signature.
    Pattern,
}

impl HapticCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
            Self::Pattern => "pattern",
        }
    }
}

impl std::fmt::Display for HapticCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User preferences applied to every cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapticPrefs {
    pub enabled: bool,
    /// Scales pulse durations; valid range 1..=10, 5 is neutral.
    pub intensity: u8,
}

impl Default for HapticPrefs {
    fn default() -> Self {
        Self {
            enabled: true,
            intensity: 5,
        }
    }
}

/// Sink for haptic cues.
///
/// Implementations decide what a cue physically means. All methods are
/// synchronous and must not block.
pub trait HapticSink: Send + Sync {
    /// Emit a cue, honoring the current preferences.
    fn cue(&self, cue: HapticCue);

    /// Replace the active preferences.
    fn set_prefs(&self, prefs: HapticPrefs);
}

/// Vibration timeline for a cue at the given intensity: alternating
/// pulse/gap durations in milliseconds, starting with a pulse.
pub fn vibration_pattern(cue: HapticCue, intensity: u8) -> Vec<u64> {
    let i = u64::from(intensity);
    match cue {
        HapticCue::Short => vec![50 * i / 5],
        HapticCue::Medium => vec![100 * i / 5],
        HapticCue::Long => vec![200 * i / 5],
        HapticCue::Pattern => {
            let pulse = 30 * i / 5;
            let gap = 50u64.saturating_sub(3 * i);
            vec![pulse, gap, pulse, gap, pulse]
        }
    }
}

/// Default sink: logs the computed vibration timeline.
#[derive(Default)]
pub struct LogHapticSink {
    prefs: Mutex<HapticPrefs>,
}

impl LogHapticSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HapticSink for LogHapticSink {
    fn cue(&self, cue: HapticCue) {
        let prefs = *self.prefs.lock().unwrap_or_else(|e| e.into_inner());
        if !prefs.enabled {
            return;
        }
        let timeline = vibration_pattern(cue, prefs.intensity);
        tracing::debug!(cue = %cue, timeline = ?timeline, "haptic cue");
    }

    fn set_prefs(&self, prefs: HapticPrefs) {
        *self.prefs.lock().unwrap_or_else(|e| e.into_inner()) = prefs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_intensity_matches_base_durations() {
        assert_eq!(vibration_pattern(HapticCue::Short, 5), vec![50]);
        assert_eq!(vibration_pattern(HapticCue::Medium, 5), vec![100]);
        assert_eq!(vibration_pattern(HapticCue::Long, 5), vec![200]);
        assert_eq!(
            vibration_pattern(HapticCue::Pattern, 5),
            vec![30, 35, 30, 35, 30]
        );
    }

    #[test]
    fn intensity_scales_durations() {
        assert_eq!(vibration_pattern(HapticCue::Short, 10), vec![100]);
        assert_eq!(vibration_pattern(HapticCue::Short, 1), vec![10]);
        // Max intensity narrows the pattern gaps
        assert_eq!(
            vibration_pattern(HapticCue::Pattern, 10),
            vec![60, 20, 60, 20, 60]
        );
    }

    #[test]
    fn pattern_is_three_pulses() {
        for intensity in 1..=10 {
            let timeline = vibration_pattern(HapticCue::Pattern, intensity);
            assert_eq!(timeline.len(), 5, "pulse-gap-pulse-gap-pulse");
        }
    }
}
