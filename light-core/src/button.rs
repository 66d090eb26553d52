//! Button Override State Machine
//!
//! Ein Tastendruck schaltet zyklisch durch drei Phasen:
//!
//! ```text
//! Idle(0) ──▶ Phase1(1) ──▶ Phase2(2) ──▶ Idle(0) ...
//! ```
//!
//! Außerhalb von `Idle` ist die Steuerung über HTTP ausgesetzt.

use crate::channel::Channel;

/// Minimaler Abstand zwischen zwei akzeptierten Tastendrücken in ms
pub const DEBOUNCE_MS: u64 = 200;

/// Duty-Wert mit dem Warmweiß in Phase 2 gehalten wird
pub const WARM_HOLD_DUTY: u8 = 200;

/// Entprellung über fallende Flanke + Mindestabstand
///
/// Eine Flanke (losgelassen → gedrückt) zählt nur, wenn seit der letzten
/// akzeptierten Flanke mindestens `DEBOUNCE_MS` vergangen sind. Der
/// Startzeitpunkt gilt als erste akzeptierte Flanke.
#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    last_accepted_ms: u64,
    was_pressed: bool,
}

impl ButtonDebouncer {
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_accepted_ms: now_ms,
            was_pressed: false,
        }
    }

    /// Verarbeitet einen Pegel-Sample, `true` bei akzeptiertem Tastendruck
    pub fn sample(&mut self, pressed: bool, now_ms: u64) -> bool {
        let falling_edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;

        if falling_edge && now_ms.saturating_sub(self.last_accepted_ms) >= DEBOUNCE_MS {
            self.last_accepted_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Zeitpunkt der letzten akzeptierten Flanke
    pub fn last_accepted_ms(&self) -> u64 {
        self.last_accepted_ms
    }
}

/// Override-Phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverridePhase {
    /// Netzwerk-Steuerung aktiv
    #[default]
    Idle,
    /// Rot quittiert, danach bleiben alle Ausgänge aus
    Phase1,
    /// Warmweiß fest auf `WARM_HOLD_DUTY`
    Phase2,
}

impl OverridePhase {
    /// Override-Zähler (0 = Netzwerk-Steuerung)
    pub fn counter(self) -> u8 {
        match self {
            OverridePhase::Idle => 0,
            OverridePhase::Phase1 => 1,
            OverridePhase::Phase2 => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            OverridePhase::Idle => OverridePhase::Phase1,
            OverridePhase::Phase1 => OverridePhase::Phase2,
            OverridePhase::Phase2 => OverridePhase::Idle,
        }
    }
}

/// Was nach dem Blinken mit den Ausgängen passiert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Completion {
    /// Ausgänge bleiben wie nach dem Blinken
    Nothing,
    /// Warmweiß auf festen Wert
    HoldWarm,
    /// Farbzustand wieder auf alle Kanäle schreiben
    RestoreColors,
}

/// Übergang zwischen zwei Phasen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OverrideTransition {
    pub from: OverridePhase,
    pub to: OverridePhase,
}

impl OverrideTransition {
    /// Kanal der zur Quittierung zweimal blinkt
    pub fn feedback_channel(self) -> Channel {
        match self.to {
            OverridePhase::Phase1 => Channel::Red,
            OverridePhase::Phase2 => Channel::Warm,
            OverridePhase::Idle => Channel::Green,
        }
    }

    pub fn completion(self) -> Completion {
        match self.to {
            OverridePhase::Phase1 => Completion::Nothing,
            OverridePhase::Phase2 => Completion::HoldWarm,
            OverridePhase::Idle => Completion::RestoreColors,
        }
    }
}

/// Override-State-Machine mit Entprellung
#[derive(Debug, Clone)]
pub struct OverrideMachine {
    phase: OverridePhase,
    debouncer: ButtonDebouncer,
}

impl OverrideMachine {
    pub fn new(now_ms: u64) -> Self {
        Self {
            phase: OverridePhase::Idle,
            debouncer: ButtonDebouncer::new(now_ms),
        }
    }

    pub fn phase(&self) -> OverridePhase {
        self.phase
    }

    /// Verarbeitet einen Taster-Sample und schaltet bei Bedarf weiter
    pub fn on_sample(&mut self, pressed: bool, now_ms: u64) -> Option<OverrideTransition> {
        if !self.debouncer.sample(pressed, now_ms) {
            return None;
        }

        let transition = OverrideTransition {
            from: self.phase,
            to: self.phase.next(),
        };
        self.phase = transition.to;
        Some(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drücken und wieder loslassen zum Zeitpunkt `at_ms`
    fn click(machine: &mut OverrideMachine, at_ms: u64) -> Option<OverrideTransition> {
        let transition = machine.on_sample(true, at_ms);
        machine.on_sample(false, at_ms + 1);
        transition
    }

    #[test]
    fn test_press_right_after_boot_is_ignored() {
        let mut debouncer = ButtonDebouncer::new(1_000);
        assert!(!debouncer.sample(true, 1_100));
    }

    #[test]
    fn test_held_button_counts_once() {
        let mut debouncer = ButtonDebouncer::new(0);
        assert!(debouncer.sample(true, 500));
        assert!(!debouncer.sample(true, 800));
        assert!(!debouncer.sample(true, 1_500));
    }

    #[test]
    fn test_bounce_within_debounce_is_filtered() {
        let mut debouncer = ButtonDebouncer::new(0);
        assert!(debouncer.sample(true, 300));
        assert!(!debouncer.sample(false, 305));
        assert!(!debouncer.sample(true, 310));
        assert!(!debouncer.sample(false, 320));
        assert!(debouncer.sample(true, 500));
        assert_eq!(debouncer.last_accepted_ms(), 500);
    }

    #[test]
    fn test_full_cycle() {
        let mut machine = OverrideMachine::new(0);

        let t1 = click(&mut machine, 200).unwrap();
        assert_eq!(t1.to, OverridePhase::Phase1);
        assert_eq!(t1.feedback_channel(), Channel::Red);
        assert_eq!(t1.completion(), Completion::Nothing);

        let t2 = click(&mut machine, 400).unwrap();
        assert_eq!(t2.to, OverridePhase::Phase2);
        assert_eq!(t2.feedback_channel(), Channel::Warm);
        assert_eq!(t2.completion(), Completion::HoldWarm);

        let t3 = click(&mut machine, 600).unwrap();
        assert_eq!(t3.from, OverridePhase::Phase2);
        assert_eq!(t3.to, OverridePhase::Idle);
        assert_eq!(t3.feedback_channel(), Channel::Green);
        assert_eq!(t3.completion(), Completion::RestoreColors);
        assert_eq!(machine.phase().counter(), 0);
    }

    #[test]
    fn test_fast_clicks_do_not_advance() {
        let mut machine = OverrideMachine::new(0);
        assert!(click(&mut machine, 250).is_some());
        assert!(click(&mut machine, 300).is_none());
        assert!(click(&mut machine, 449).is_none());
        assert_eq!(machine.phase(), OverridePhase::Phase1);
    }
}
