//! Listener-Entscheidung für den HTTP-Socket
//!
//! Die Hauptschleife wartet pro Durchlauf nur kurz auf einen Client und
//! bricht das Warten danach ab. Der Socket bleibt dabei bestehen und kann
//! inzwischen mitten im Verbindungsaufbau stecken. Ein erneutes `listen`
//! ist dann nicht erlaubt, der Client muss auf demselben Socket zu Ende
//! verbunden werden.

/// Vereinfachter TCP-Zustand des Listener-Sockets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocketPhase {
    Closed,
    Listen,
    /// SYN empfangen bzw. gesendet, Handshake läuft
    Handshake,
    /// Verbindung steht (auch wenn der Client schon FIN geschickt hat)
    Connected,
    /// Verbindung wird abgebaut
    Closing,
}

/// Was die Hauptschleife mit dem Socket tun soll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ListenerAction {
    /// `accept` (startet bzw. setzt das Lauschen fort)
    Accept,
    /// Auf das Ende des Handshakes warten, nicht erneut lauschen
    AwaitHandshake,
    /// Client ist da, Request bedienen
    Serve,
    /// Socket verwerfen und neu anlegen
    Recycle,
}

pub fn listener_action(phase: SocketPhase) -> ListenerAction {
    match phase {
        SocketPhase::Closed | SocketPhase::Listen => ListenerAction::Accept,
        SocketPhase::Handshake => ListenerAction::AwaitHandshake,
        SocketPhase::Connected => ListenerAction::Serve,
        SocketPhase::Closing => ListenerAction::Recycle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_again_only_when_idle() {
        assert_eq!(listener_action(SocketPhase::Closed), ListenerAction::Accept);
        assert_eq!(listener_action(SocketPhase::Listen), ListenerAction::Accept);
    }

    #[test]
    fn test_half_open_client_is_kept() {
        // Timeout der Schleife fiel zwischen SYN und ACK
        assert_eq!(
            listener_action(SocketPhase::Handshake),
            ListenerAction::AwaitHandshake
        );
    }

    #[test]
    fn test_connected_between_passes_is_served() {
        assert_eq!(listener_action(SocketPhase::Connected), ListenerAction::Serve);
        assert_eq!(listener_action(SocketPhase::Closing), ListenerAction::Recycle);
    }
}
