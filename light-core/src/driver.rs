//! PWM Output Driver
//!
//! Schreibt Helligkeitswerte auf die physikalischen Ausgänge. Jeder Schreib-
//! vorgang geht sofort an die Hardware (kein Buffering).

use crate::channel::{CHANNEL_COUNT, Channel};
use crate::state::ColorState;
use crate::traits::{LedError, PwmOutput};

/// PWM-Treiber über einer `PwmOutput`-Implementierung
///
/// Merkt sich den zuletzt geschriebenen Duty-Wert pro Ausgang. Schreibfehler
/// werden nicht weitergereicht (Hardware gilt als zuverlässig), sondern bis
/// zum nächsten `take_fault()` gespeichert.
pub struct PwmDriver<P: PwmOutput> {
    output: P,
    outputs: [u8; CHANNEL_COUNT],
    fault: Option<LedError>,
}

impl<P: PwmOutput> PwmDriver<P> {
    pub fn new(output: P) -> Self {
        Self {
            output,
            outputs: [0; CHANNEL_COUNT],
            fault: None,
        }
    }

    /// Schreibt den gespeicherten Wert eines Kanals auf seinen Ausgang
    pub fn apply_channel(&mut self, state: &ColorState, channel: Channel) {
        self.write_raw(channel, state.get(channel));
    }

    /// Schreibt alle Kanäle in fester Reihenfolge (cold, warm, red, green, blue)
    pub fn apply_all(&mut self, state: &ColorState) {
        for channel in Channel::ALL {
            self.apply_channel(state, channel);
        }
    }

    /// Schaltet alle Ausgänge aus, ohne den Farbzustand zu verändern
    pub fn all_off(&mut self) {
        for channel in Channel::ALL {
            self.write_raw(channel, 0);
        }
    }

    /// Schreibt einen Duty-Wert direkt (am Farbzustand vorbei)
    pub fn write_raw(&mut self, channel: Channel, duty: u8) {
        match self.output.set_duty(channel, duty) {
            Ok(()) => self.outputs[channel.index()] = duty,
            Err(e) => self.fault = Some(e),
        }
    }

    /// Zuletzt erfolgreich geschriebene Duty-Werte in Kanal-Reihenfolge
    pub fn outputs(&self) -> [u8; CHANNEL_COUNT] {
        self.outputs
    }

    /// Liefert und löscht den letzten Schreibfehler
    pub fn take_fault(&mut self) -> Option<LedError> {
        self.fault.take()
    }

    pub fn output(&self) -> &P {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut P {
        &mut self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Zeichnet alle Schreibvorgänge auf
    struct RecordingOutput {
        writes: heapless::Vec<(Channel, u8), 32>,
        fail_channel: Option<Channel>,
    }

    impl RecordingOutput {
        fn new() -> Self {
            Self {
                writes: heapless::Vec::new(),
                fail_channel: None,
            }
        }
    }

    impl PwmOutput for RecordingOutput {
        fn set_duty(&mut self, channel: Channel, duty: u8) -> Result<(), LedError> {
            if self.fail_channel == Some(channel) {
                return Err(LedError::WriteFailed);
            }
            self.writes.push((channel, duty)).unwrap();
            Ok(())
        }
    }

    #[test]
    fn test_apply_all_writes_in_channel_order() {
        let mut state = ColorState::new();
        state.set_intensity(Channel::Red, 10);
        state.set_intensity(Channel::Blue, 20);

        let mut driver = PwmDriver::new(RecordingOutput::new());
        driver.apply_all(&state);

        let order: heapless::Vec<Channel, 5> =
            driver.output().writes.iter().map(|(c, _)| *c).collect();
        assert_eq!(order.as_slice(), &Channel::ALL);
        assert_eq!(driver.outputs(), [0, 0, 10, 0, 20]);
    }

    #[test]
    fn test_all_off_leaves_state_untouched() {
        let mut state = ColorState::new();
        state.set_intensity(Channel::Warm, 200);

        let mut driver = PwmDriver::new(RecordingOutput::new());
        driver.apply_all(&state);
        driver.all_off();

        assert_eq!(driver.outputs(), [0; CHANNEL_COUNT]);
        assert_eq!(state.get(Channel::Warm), 200);
    }

    #[test]
    fn test_write_failure_is_recorded_and_others_continue() {
        let mut output = RecordingOutput::new();
        output.fail_channel = Some(Channel::Green);

        let mut state = ColorState::new();
        state.set_intensity(Channel::Green, 50);
        state.set_intensity(Channel::Blue, 60);

        let mut driver = PwmDriver::new(output);
        driver.apply_all(&state);

        assert_eq!(driver.take_fault(), Some(LedError::WriteFailed));
        assert_eq!(driver.take_fault(), None);
        assert_eq!(driver.outputs(), [0, 0, 0, 0, 60]);
    }
}
