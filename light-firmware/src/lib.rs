// Library-Root: Firmware-Module des PWM-Licht-Controllers
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod net;
pub mod tasks;

// Re-exports von light-core
pub use light_core::{ButtonInput, Channel, LedError, LightController, PwmOutput};

// ============================================================================
// Aufteilung Firmware / Core
// ============================================================================
//
// Alles was ohne Hardware testbar ist (Farbzustand, Override-State-Machine,
// Quittierungs-Sequenz, HTTP-Routing und Rendering) liegt in light-core und
// wird auf dem Host getestet (cargo test -p light-core -p light-tests).
//
// Hier bleibt nur was esp-hal, esp-radio oder embassy-net braucht:
//   hal/   → LEDC-Writer und Taster (implementieren die Core-Traits)
//   net/   → Socket-I/O für eine HTTP-Verbindung
//   tasks/ → WiFi-Tasks und die Hauptschleife
