//! Visuelle Quittierung ("zweimal blinken")
//!
//! Statt einer blockierenden Schleife wird das Blinken als endliche Folge
//! von Schritten beschrieben. Die Firmware führt die Schreibschritte direkt
//! aus und wartet die Pausen asynchron ab.

use core::ops::Range;

use crate::channel::Channel;

/// Duty-Rampe pro Blink (Start inklusive, Ende exklusive)
pub const BLINK_RAMP: Range<u8> = 25..60;

/// Pause nach dem Einschalten und nach dem Ausschalten in ms
pub const BLINK_PAUSE_MS: u32 = 100;

/// Anzahl Blinks pro Quittierung
pub const BLINK_COUNT: u8 = 2;

/// Ein Schritt der Quittierung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeedbackStep {
    /// Alle Ausgänge auf 0
    AllOff,
    /// Duty-Wert auf einen Kanal schreiben
    Duty { channel: Channel, duty: u8 },
    /// Warten
    Pause { ms: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    Ramp(u8),
    HoldOn,
    Off,
    HoldOff,
    Done,
}

/// Schrittfolge: alles aus, dann `BLINK_COUNT` mal Rampe → Pause → aus → Pause
#[derive(Debug, Clone)]
pub struct BlinkTwice {
    channel: Channel,
    blinks_left: u8,
    stage: Stage,
}

impl BlinkTwice {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            blinks_left: BLINK_COUNT,
            stage: Stage::Start,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }
}

impl Iterator for BlinkTwice {
    type Item = FeedbackStep;

    fn next(&mut self) -> Option<FeedbackStep> {
        let (step, next_stage) = match self.stage {
            Stage::Start => (FeedbackStep::AllOff, Stage::Ramp(BLINK_RAMP.start)),
            Stage::Ramp(duty) => {
                let next = if duty + 1 < BLINK_RAMP.end {
                    Stage::Ramp(duty + 1)
                } else {
                    Stage::HoldOn
                };
                let step = FeedbackStep::Duty {
                    channel: self.channel,
                    duty,
                };
                (step, next)
            }
            Stage::HoldOn => (FeedbackStep::Pause { ms: BLINK_PAUSE_MS }, Stage::Off),
            Stage::Off => (
                FeedbackStep::Duty {
                    channel: self.channel,
                    duty: 0,
                },
                Stage::HoldOff,
            ),
            Stage::HoldOff => {
                self.blinks_left -= 1;
                let next = if self.blinks_left > 0 {
                    Stage::Ramp(BLINK_RAMP.start)
                } else {
                    Stage::Done
                };
                (FeedbackStep::Pause { ms: BLINK_PAUSE_MS }, next)
            }
            Stage::Done => return None,
        };

        self.stage = next_stage;
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_shape() {
        let steps: heapless::Vec<FeedbackStep, 128> = BlinkTwice::new(Channel::Red).collect();

        // 1x AllOff + 2x (35 Rampenschritte + Pause + Aus + Pause)
        let ramp_len = BLINK_RAMP.len();
        assert_eq!(steps.len(), 1 + 2 * (ramp_len + 3));
        assert_eq!(steps[0], FeedbackStep::AllOff);
        assert_eq!(
            steps[1],
            FeedbackStep::Duty {
                channel: Channel::Red,
                duty: 25
            }
        );
        assert_eq!(
            steps[ramp_len],
            FeedbackStep::Duty {
                channel: Channel::Red,
                duty: 59
            }
        );
        assert_eq!(steps[ramp_len + 1], FeedbackStep::Pause { ms: 100 });
        assert_eq!(
            steps[ramp_len + 2],
            FeedbackStep::Duty {
                channel: Channel::Red,
                duty: 0
            }
        );
        assert_eq!(steps.last(), Some(&FeedbackStep::Pause { ms: 100 }));
    }

    #[test]
    fn test_total_pause_time() {
        let total: u32 = BlinkTwice::new(Channel::Green)
            .filter_map(|step| match step {
                FeedbackStep::Pause { ms } => Some(ms),
                _ => None,
            })
            .sum();
        assert_eq!(total, 4 * BLINK_PAUSE_MS);
    }

    #[test]
    fn test_only_target_channel_is_driven() {
        assert!(BlinkTwice::new(Channel::Warm).all(|step| match step {
            FeedbackStep::Duty { channel, .. } => channel == Channel::Warm,
            _ => true,
        }));
    }
}
