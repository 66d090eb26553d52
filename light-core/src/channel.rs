//! LED-Kanäle
//!
//! Die fünf unabhängig steuerbaren PWM-Ausgänge des Controllers.

/// Ein PWM-Kanal
///
/// Die Reihenfolge ist fest und bestimmt den Index im Farbzustand
/// (cold = 0 … blue = 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Kaltweiß
    Cold,
    /// Warmweiß
    Warm,
    Red,
    Green,
    Blue,
}

/// Anzahl der Kanäle
pub const CHANNEL_COUNT: usize = 5;

impl Channel {
    /// Alle Kanäle in Index-Reihenfolge
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Cold,
        Channel::Warm,
        Channel::Red,
        Channel::Green,
        Channel::Blue,
    ];

    /// Position im Farbzustand
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name wie er in Query-Parametern und JSON verwendet wird
    pub const fn name(self) -> &'static str {
        match self {
            Channel::Cold => "cold",
            Channel::Warm => "warm",
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }

    /// Sucht den Kanal zu einem Parameternamen (exakt, case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|channel| channel.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }

    #[test]
    fn test_from_name_roundtrip() {
        for channel in Channel::ALL {
            assert_eq!(Channel::from_name(channel.name()), Some(channel));
        }
    }

    #[test]
    fn test_from_name_is_case_sensitive() {
        assert_eq!(Channel::from_name("Red"), None);
        assert_eq!(Channel::from_name("RED"), None);
        assert_eq!(Channel::from_name("yellow"), None);
        assert_eq!(Channel::from_name(""), None);
    }
}
