//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use crate::channel::Channel;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

/// Trait für PWM-Ausgänge
///
/// Abstrahiert die fünf physikalischen LED-Ausgänge.
///
/// # Implementierungen
/// - **Production:** LedcPwmWriter (ESP32 LEDC Peripheral)
/// - **Testing:** MockPwmOutput (in-memory Mock)
pub trait PwmOutput {
    /// Schreibt einen Duty-Wert (0-255) auf den Ausgang eines Kanals
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn set_duty(&mut self, channel: Channel, duty: u8) -> Result<(), LedError>;
}

/// Trait für den Taster
///
/// Liefert den aktuellen Pegel, entprellt wird in der State Machine.
pub trait ButtonInput {
    /// `true` solange der Taster gedrückt ist (active-low Pin liegt auf LOW)
    fn is_pressed(&mut self) -> bool;
}
