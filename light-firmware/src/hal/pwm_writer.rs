// PWM Writer - LEDC Implementierung des PwmOutput Traits
//
// Jeder der fünf Kanäle hängt an einem eigenen LEDC-Channel,
// alle teilen sich einen Low-Speed-Timer mit 8 Bit Auflösung.
// Damit entspricht der Duty-Wert direkt der Helligkeit (0-255).

use esp_hal::ledc::LowSpeed;
use esp_hal::ledc::channel::{Channel as LedcChannel, ChannelHW};
use light_core::{CHANNEL_COUNT, Channel, LedError, PwmOutput};

/// Real Hardware PWM Writer
///
/// Die LEDC-Channels müssen in Kanal-Reihenfolge übergeben werden
/// (cold, warm, red, green, blue), siehe `Channel::ALL`.
pub struct LedcPwmWriter<'a> {
    channels: [LedcChannel<'a, LowSpeed>; CHANNEL_COUNT],
}

impl<'a> LedcPwmWriter<'a> {
    /// Erstellt einen neuen LedcPwmWriter
    ///
    /// # Parameter
    /// - `channels`: fertig konfigurierte LEDC-Channels, Index = `Channel::index()`
    pub fn new(channels: [LedcChannel<'a, LowSpeed>; CHANNEL_COUNT]) -> Self {
        Self { channels }
    }
}

impl PwmOutput for LedcPwmWriter<'_> {
    fn set_duty(&mut self, channel: Channel, duty: u8) -> Result<(), LedError> {
        // Duty-Register schreiben, bei 8 Bit Timer-Auflösung 1:1
        self.channels[channel.index()].set_duty_hw(u32::from(duty));
        Ok(())
    }
}
