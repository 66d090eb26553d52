//! Light Core - Plattformunabhängige Logik des PWM-Licht-Controllers
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Hardware wird über die Traits in [`traits`] angesprochen, damit die
//! gesamte Logik auf dem Host testbar ist.

#![no_std]

pub mod button;
pub mod channel;
pub mod controller;
pub mod driver;
pub mod feedback;
pub mod http;
pub mod listener;
pub mod render;
pub mod state;
pub mod traits;

// Re-exports für einfachen Zugriff
pub use button::{DEBOUNCE_MS, OverridePhase, OverrideTransition, WARM_HOLD_DUTY};
pub use channel::{CHANNEL_COUNT, Channel};
pub use controller::{Feedback, LightController};
pub use feedback::FeedbackStep;
pub use http::{HttpError, HttpRequest, Response};
pub use listener::{ListenerAction, SocketPhase, listener_action};
pub use render::LedStatus;
pub use state::{ColorSnapshot, ColorState};
pub use traits::{ButtonInput, LedError, PwmOutput};
