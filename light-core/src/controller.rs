//! LightController - expliziter Kontext statt globaler Variablen
//!
//! Besitzt Farbzustand, PWM-Treiber und Override-State-Machine. Genau ein
//! Besitzer (die Hauptschleife der Firmware) ruft die Methoden auf, daher
//! ist keine Synchronisation nötig.

use crate::button::{Completion, OverrideMachine, OverridePhase, OverrideTransition, WARM_HOLD_DUTY};
use crate::channel::{CHANNEL_COUNT, Channel};
use crate::driver::PwmDriver;
use crate::feedback::{BlinkTwice, FeedbackStep};
use crate::http::{ContentType, HttpRequest, Response, Route, StatusCode, apply_led_query};
use crate::render::{render_status_html, render_status_json};
use crate::state::{ColorSnapshot, ColorState};
use crate::traits::{LedError, PwmOutput};

/// Laufende Quittierung eines Phasenwechsels
#[derive(Debug, Clone)]
pub struct Feedback {
    pub transition: OverrideTransition,
    pub steps: BlinkTwice,
}

pub struct LightController<P: PwmOutput> {
    colors: ColorState,
    driver: PwmDriver<P>,
    overrides: OverrideMachine,
    active_transition: Option<OverrideTransition>,
}

impl<P: PwmOutput> LightController<P> {
    /// Erstellt den Controller mit Farbzustand 0 auf allen Kanälen
    ///
    /// `now_ms` ist der Startzeitpunkt für die Entprellung.
    pub fn new(output: P, now_ms: u64) -> Self {
        Self {
            colors: ColorState::new(),
            driver: PwmDriver::new(output),
            overrides: OverrideMachine::new(now_ms),
            active_transition: None,
        }
    }

    /// Schreibt den Farbzustand einmal auf alle Ausgänge (Boot)
    pub fn start(&mut self) {
        self.driver.apply_all(&self.colors);
    }

    pub fn snapshot(&self) -> ColorSnapshot {
        self.colors.snapshot()
    }

    /// Duty-Werte die zuletzt tatsächlich auf die Hardware geschrieben wurden
    pub fn hardware_outputs(&self) -> [u8; CHANNEL_COUNT] {
        self.driver.outputs()
    }

    pub fn override_phase(&self) -> OverridePhase {
        self.overrides.phase()
    }

    /// Darf die Hauptschleife HTTP-Requests annehmen?
    ///
    /// Nur in `Idle` und wenn keine Quittierung mehr läuft.
    pub fn network_enabled(&self) -> bool {
        self.overrides.phase() == OverridePhase::Idle && self.active_transition.is_none()
    }

    pub fn take_fault(&mut self) -> Option<LedError> {
        self.driver.take_fault()
    }

    pub fn output(&self) -> &P {
        self.driver.output()
    }

    pub fn output_mut(&mut self) -> &mut P {
        self.driver.output_mut()
    }

    // ========================================================================
    // HTTP
    // ========================================================================

    /// Bearbeitet einen HTTP-Request
    ///
    /// - `/`       → HTML-Statusseite
    /// - `/led`    → Parameter (Query, Formular-Body) anwenden, alle Kanäle schreiben, JSON
    /// - `/ledoff` → alle Ausgänge aus (Farbzustand bleibt), JSON
    /// - sonst     → 404
    pub fn handle_request(&mut self, request: &HttpRequest<'_>) -> Response {
        let body = match Route::resolve(request.path) {
            Route::Index => {
                render_status_html(self.colors.snapshot()).map(|body| (ContentType::Html, body))
            }
            Route::Led => {
                // Query zuerst, danach Formular-Body (spätere Werte gewinnen)
                apply_led_query(&mut self.colors, request.query);
                apply_led_query(&mut self.colors, request.form);
                self.driver.apply_all(&self.colors);
                render_status_json(self.colors.snapshot())
                    .map(|body| (ContentType::PlainText, body))
            }
            Route::LedOff => {
                self.driver.all_off();
                render_status_json(self.colors.snapshot())
                    .map(|body| (ContentType::PlainText, body))
            }
            Route::NotFound => return Response::not_found(),
        };

        match body {
            Ok((content_type, body)) => Response::new(StatusCode::Ok, content_type, body),
            Err(_) => Response::text(StatusCode::InternalServerError, "Render error"),
        }
    }

    /// Wie `handle_request`, aber nur wenn Netzwerk-Steuerung aktiv ist
    ///
    /// Während eines Overrides wird nichts bearbeitet (`None`).
    pub fn service(&mut self, request: &HttpRequest<'_>) -> Option<Response> {
        self.network_enabled()
            .then(|| self.handle_request(request))
    }

    // ========================================================================
    // Button
    // ========================================================================

    /// Verarbeitet einen Taster-Sample
    ///
    /// Bei akzeptiertem Tastendruck beginnt ein Phasenwechsel: die zurück-
    /// gegebenen Schritte müssen mit `apply_feedback_step` abgespielt und
    /// danach mit `finish_feedback` abgeschlossen werden.
    pub fn poll_button(&mut self, pressed: bool, now_ms: u64) -> Option<Feedback> {
        if self.active_transition.is_some() {
            return None;
        }

        let transition = self.overrides.on_sample(pressed, now_ms)?;
        self.active_transition = Some(transition);
        Some(Feedback {
            transition,
            steps: BlinkTwice::new(transition.feedback_channel()),
        })
    }

    /// Führt einen Schritt aus; bei `Pause` wird die Dauer in ms zurückgegeben
    pub fn apply_feedback_step(&mut self, step: FeedbackStep) -> Option<u32> {
        match step {
            FeedbackStep::AllOff => self.driver.all_off(),
            FeedbackStep::Duty { channel, duty } => self.driver.write_raw(channel, duty),
            FeedbackStep::Pause { ms } => return Some(ms),
        }
        None
    }

    /// Schließt den laufenden Phasenwechsel ab
    pub fn finish_feedback(&mut self) -> Option<OverrideTransition> {
        let transition = self.active_transition.take()?;
        match transition.completion() {
            Completion::Nothing => {}
            Completion::HoldWarm => self.driver.write_raw(Channel::Warm, WARM_HOLD_DUTY),
            Completion::RestoreColors => self.driver.apply_all(&self.colors),
        }
        Some(transition)
    }

    /// Spielt eine Quittierung komplett ab und schließt sie ab
    ///
    /// Für jede Pause wird `pause(ms)` erzeugt und abgewartet (in der
    /// Firmware ein `embassy_time::Timer`).
    pub async fn run_feedback<F, Fut>(
        &mut self,
        feedback: Feedback,
        mut pause: F,
    ) -> Option<OverrideTransition>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ()>,
    {
        for step in feedback.steps {
            if let Some(ms) = self.apply_feedback_step(step) {
                pause(ms).await;
            }
        }
        self.finish_feedback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[derive(Default)]
    struct NullOutput;

    impl PwmOutput for NullOutput {
        fn set_duty(&mut self, _channel: Channel, _duty: u8) -> Result<(), LedError> {
            Ok(())
        }
    }

    fn get<'a>(path: &'a str, query: Option<&'a str>) -> HttpRequest<'a> {
        HttpRequest {
            method: crate::http::Method::Get,
            path,
            query,
            form: None,
        }
    }

    /// Quittierung ohne echte Pausen abspielen
    fn run_instantly(controller: &mut LightController<NullOutput>, feedback: Feedback) {
        block_on(controller.run_feedback(feedback, |_| core::future::ready(())));
    }

    #[test]
    fn test_network_disabled_while_feedback_runs() {
        let mut controller = LightController::new(NullOutput, 0);
        controller.start();
        assert!(controller.network_enabled());

        let feedback = controller.poll_button(true, 300).unwrap();
        assert!(!controller.network_enabled());
        assert!(controller.service(&get("/", None)).is_none());

        run_instantly(&mut controller, feedback);
        assert_eq!(controller.override_phase(), OverridePhase::Phase1);
        assert!(!controller.network_enabled());
    }

    #[test]
    fn test_returning_to_idle_restores_colors() {
        let mut controller = LightController::new(NullOutput, 0);
        controller.handle_request(&get("/led", Some("red=40&cold=7")));

        for at in [300, 600, 900] {
            controller.poll_button(false, at - 1);
            let feedback = controller.poll_button(true, at).unwrap();
            run_instantly(&mut controller, feedback);
        }

        assert_eq!(controller.override_phase(), OverridePhase::Idle);
        assert!(controller.network_enabled());
        assert_eq!(controller.hardware_outputs(), [7, 0, 40, 0, 0]);
    }

    #[test]
    fn test_warm_hold_after_second_press() {
        let mut controller = LightController::new(NullOutput, 0);
        controller.handle_request(&get("/led", Some("warm=10&blue=90")));

        for at in [300, 600] {
            controller.poll_button(false, at - 1);
            let feedback = controller.poll_button(true, at).unwrap();
            run_instantly(&mut controller, feedback);
        }

        assert_eq!(controller.override_phase(), OverridePhase::Phase2);
        assert_eq!(controller.hardware_outputs(), [0, WARM_HOLD_DUTY, 0, 0, 0]);
        assert_eq!(controller.snapshot().get(Channel::Warm), 10);
    }
}
