//! Farbzustand (Color State Store)
//!
//! Hält die fünf Helligkeitswerte (0-255). Wird nur von der HTTP-Schicht
//! geschrieben, die Hardware wird separat über den PWM-Treiber gesetzt.

use crate::channel::{CHANNEL_COUNT, Channel};

/// Aktuelle Helligkeit pro Kanal
///
/// Die Werte sind `u8`, liegen also immer im Bereich 0-255.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorState {
    values: [u8; CHANNEL_COUNT],
}

/// Unveränderliche Kopie des Farbzustands für Reporting (HTML/JSON)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorSnapshot {
    values: [u8; CHANNEL_COUNT],
}

impl ColorState {
    /// Alle Kanäle auf 0 (Zustand nach dem Booten)
    pub const fn new() -> Self {
        Self {
            values: [0; CHANNEL_COUNT],
        }
    }

    /// Setzt die Helligkeit eines Kanals
    ///
    /// Werte außerhalb von 0-255 werden geklemmt, nicht abgelehnt.
    pub fn set_intensity(&mut self, channel: Channel, raw: i32) {
        self.values[channel.index()] = clamp_intensity(raw);
    }

    /// Helligkeit eines Kanals
    pub fn get(&self, channel: Channel) -> u8 {
        self.values[channel.index()]
    }

    pub fn snapshot(&self) -> ColorSnapshot {
        ColorSnapshot {
            values: self.values,
        }
    }
}

impl ColorSnapshot {
    pub fn get(&self, channel: Channel) -> u8 {
        self.values[channel.index()]
    }

    /// Werte in Kanal-Reihenfolge (cold, warm, red, green, blue)
    pub fn values(&self) -> [u8; CHANNEL_COUNT] {
        self.values
    }
}

/// Klemmt einen beliebigen Integer auf den PWM-Bereich 0-255
pub fn clamp_intensity(raw: i32) -> u8 {
    raw.clamp(0, u8::MAX as i32) as u8
}

#[cfg(feature = "defmt")]
impl defmt::Format for ColorSnapshot {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "ColorSnapshot {{ cold: {}, warm: {}, red: {}, green: {}, blue: {} }}",
            self.get(Channel::Cold),
            self.get(Channel::Warm),
            self.get(Channel::Red),
            self.get(Channel::Green),
            self.get(Channel::Blue)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_all_zero() {
        let state = ColorState::new();
        assert_eq!(state.snapshot().values(), [0; CHANNEL_COUNT]);
    }

    #[test]
    fn test_set_intensity_in_range() {
        let mut state = ColorState::new();
        state.set_intensity(Channel::Green, 128);
        assert_eq!(state.get(Channel::Green), 128);
        assert_eq!(state.get(Channel::Red), 0);
    }

    #[test]
    fn test_set_intensity_clamps() {
        let mut state = ColorState::new();
        state.set_intensity(Channel::Red, 999);
        state.set_intensity(Channel::Blue, -5);
        state.set_intensity(Channel::Cold, i32::MAX);
        state.set_intensity(Channel::Warm, i32::MIN);
        assert_eq!(state.get(Channel::Red), 255);
        assert_eq!(state.get(Channel::Blue), 0);
        assert_eq!(state.get(Channel::Cold), 255);
        assert_eq!(state.get(Channel::Warm), 0);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut state = ColorState::new();
        state.set_intensity(Channel::Warm, 10);
        let snapshot = state.snapshot();
        state.set_intensity(Channel::Warm, 20);
        assert_eq!(snapshot.get(Channel::Warm), 10);
        assert_eq!(state.get(Channel::Warm), 20);
    }

    #[test]
    fn test_clamp_boundaries() {
        assert_eq!(clamp_intensity(0), 0);
        assert_eq!(clamp_intensity(255), 255);
        assert_eq!(clamp_intensity(256), 255);
        assert_eq!(clamp_intensity(-1), 0);
    }
}
