// Taster - GPIO Implementierung des ButtonInput Traits
//
// Der Taster zieht den Pin gegen GND (active-low), der interne
// Pull-Up hält ihn im Ruhezustand auf HIGH.

use esp_hal::gpio::{Input, InputConfig, InputPin, Pull};
use light_core::ButtonInput;

/// Active-low Taster mit internem Pull-Up
pub struct PushButton<'a> {
    input: Input<'a>,
}

impl<'a> PushButton<'a> {
    pub fn new(pin: impl InputPin + 'a) -> Self {
        let config = InputConfig::default().with_pull(Pull::Up);
        Self {
            input: Input::new(pin, config),
        }
    }
}

impl ButtonInput for PushButton<'_> {
    fn is_pressed(&mut self) -> bool {
        self.input.is_low()
    }
}
