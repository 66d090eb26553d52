// Hauptschleife - Taster, Quittierung und HTTP in einem Besitzer
//
// Pro Durchlauf:
//   1. Taster abfragen, ggf. Quittierung abspielen
//   2. Netzwerk-Steuerung aktiv → kurz auf eine Verbindung warten
//      sonst → kurze Pause
//
// Es wird höchstens ein Request pro Durchlauf bearbeitet. Während eines
// Overrides bleibt der Listener unbedient, Clients warten im Backlog.

use defmt::{Debug2Format, error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_net::tcp::{AcceptError, State, TcpSocket};
use embassy_time::{Duration, Instant, Timer};
use light_core::{
    ButtonInput, LightController, ListenerAction, PwmOutput, SocketPhase, listener_action,
};

use crate::config::{
    BUTTON_POLL_INTERVAL_MS, HTTP_PORT, HTTP_SOCKET_TIMEOUT_SECS, NETWORK_POLL_INTERVAL_MS,
    TCP_RX_BUFFER_SIZE, TCP_TX_BUFFER_SIZE,
};
use crate::net::{log_connection_error, serve_connection};

/// Ergebnis des Wartens auf einen Client
enum Listener {
    Connected,
    /// Socket ist unbrauchbar und wird neu angelegt
    Recycle,
}

/// Läuft für immer
pub async fn run_control_loop<P: PwmOutput, B: ButtonInput>(
    stack: Stack<'static>,
    mut controller: LightController<P>,
    mut button: B,
) -> ! {
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    info!("HTTP: Listening on port {}", HTTP_PORT);

    loop {
        // Neuer Socket pro Verbindung
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(HTTP_SOCKET_TIMEOUT_SECS)));

        match wait_for_client(&mut socket, &mut controller, &mut button).await {
            Listener::Connected => {
                match serve_connection(&mut socket, &mut controller).await {
                    Ok(()) => {
                        socket.close();
                        if let Err(e) = socket.flush().await {
                            warn!("HTTP: Flush on close failed: {}", Debug2Format(&e));
                        }
                    }
                    Err(e) => {
                        log_connection_error(&e);
                        socket.abort();
                    }
                }
                report_fault(&mut controller);
            }
            Listener::Recycle => {
                socket.abort();
                Timer::after_millis(NETWORK_POLL_INTERVAL_MS).await;
            }
        }
    }
}

fn socket_phase(state: State) -> SocketPhase {
    match state {
        State::Closed => SocketPhase::Closed,
        State::Listen => SocketPhase::Listen,
        State::SynSent | State::SynReceived => SocketPhase::Handshake,
        State::Established | State::CloseWait => SocketPhase::Connected,
        _ => SocketPhase::Closing,
    }
}

/// Dreht Schleifen-Durchläufe bis ein Client verbunden ist
///
/// Das Warten wird jeden Durchlauf abgebrochen, der Socket bleibt aber
/// bestehen. Ein Client im Handshake wird auf demselben Socket fertig
/// verbunden statt neu zu lauschen.
async fn wait_for_client<P: PwmOutput, B: ButtonInput>(
    socket: &mut TcpSocket<'_>,
    controller: &mut LightController<P>,
    button: &mut B,
) -> Listener {
    loop {
        poll_button(controller, button).await;
        report_fault(controller);

        if !controller.network_enabled() {
            Timer::after_millis(BUTTON_POLL_INTERVAL_MS).await;
            continue;
        }

        let poll_window = Timer::after_millis(NETWORK_POLL_INTERVAL_MS);
        match listener_action(socket_phase(socket.state())) {
            ListenerAction::Serve => return Listener::Connected,
            ListenerAction::Recycle => return Listener::Recycle,
            ListenerAction::AwaitHandshake => {
                // Zustand wird im nächsten Durchlauf neu bewertet
                select(socket.wait_write_ready(), poll_window).await;
            }
            ListenerAction::Accept => match select(socket.accept(HTTP_PORT), poll_window).await {
                Either::First(Ok(())) => return Listener::Connected,
                // Zustand hat sich zwischen Prüfung und accept geändert
                Either::First(Err(AcceptError::InvalidState)) => {}
                Either::First(Err(e)) => {
                    warn!("HTTP: Accept failed: {}", Debug2Format(&e));
                    return Listener::Recycle;
                }
                Either::Second(()) => {}
            },
        }
    }
}

/// Taster-Sample verarbeiten und ggf. Quittierung abspielen
async fn poll_button<P: PwmOutput, B: ButtonInput>(
    controller: &mut LightController<P>,
    button: &mut B,
) {
    let now_ms = Instant::now().as_millis();
    let Some(feedback) = controller.poll_button(button.is_pressed(), now_ms) else {
        return;
    };

    info!(
        "Button: Override {} -> {}",
        feedback.transition.from, feedback.transition.to
    );

    let finished = controller
        .run_feedback(feedback, |ms| Timer::after_millis(u64::from(ms)))
        .await;
    if let Some(transition) = finished {
        info!("Button: Phase {} active", transition.to);
    }
}

fn report_fault<P: PwmOutput>(controller: &mut LightController<P>) {
    if let Some(e) = controller.take_fault() {
        error!("PWM: Failed to write duty: {}", e);
    }
}
