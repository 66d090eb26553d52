//! Darstellung des Farbzustands als JSON und HTML

use core::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::http::{HttpError, ResponseBody};
use crate::state::ColorSnapshot;

// HTML-Rahmen zur Compile-Zeit einbinden
const STATUS_HTML_HEAD: &str = include_str!("web/status_head.html");
const STATUS_HTML_TAIL: &str = include_str!("web/status_tail.html");

/// JSON Serialisierungs-Buffer für den Status
/// Für {"success":1,"red":255,"green":255,"blue":255,"warm":255,"cold":255}
pub const JSON_STATUS_BUFFER_SIZE: usize = 96;

/// JSON-Antwort von `/led` und `/ledoff`
///
/// Die Feld-Reihenfolge ist Teil des Protokolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedStatus {
    pub success: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub warm: u8,
    pub cold: u8,
}

impl From<ColorSnapshot> for LedStatus {
    fn from(snapshot: ColorSnapshot) -> Self {
        Self {
            success: 1,
            red: snapshot.get(Channel::Red),
            green: snapshot.get(Channel::Green),
            blue: snapshot.get(Channel::Blue),
            warm: snapshot.get(Channel::Warm),
            cold: snapshot.get(Channel::Cold),
        }
    }
}

/// Serialisiert den Snapshot als JSON-Body
pub fn render_status_json(snapshot: ColorSnapshot) -> Result<ResponseBody, HttpError> {
    let mut json_buffer = [0u8; JSON_STATUS_BUFFER_SIZE];
    let n = serde_json_core::to_slice(&LedStatus::from(snapshot), &mut json_buffer)
        .map_err(|_| HttpError::Capacity)?;
    let json_str = core::str::from_utf8(&json_buffer[..n]).map_err(|_| HttpError::Malformed)?;

    let mut body = ResponseBody::new();
    body.push_str(json_str).map_err(|_| HttpError::Capacity)?;
    Ok(body)
}

/// Rendert die statische HTML-Statusseite
pub fn render_status_html(snapshot: ColorSnapshot) -> Result<ResponseBody, HttpError> {
    // Anzeige-Reihenfolge der Seite (weicht von der Kanal-Reihenfolge ab)
    const ROWS: [(&str, Channel); 5] = [
        ("RED", Channel::Red),
        ("GREEN", Channel::Green),
        ("BLUE", Channel::Blue),
        ("WARM", Channel::Warm),
        ("COLD", Channel::Cold),
    ];

    let mut body = ResponseBody::new();
    body.push_str(STATUS_HTML_HEAD)
        .map_err(|_| HttpError::Capacity)?;
    for (label, channel) in ROWS {
        writeln!(body, "<p>{} Status: {} </p>", label, snapshot.get(channel))?;
    }
    body.push_str(STATUS_HTML_TAIL)
        .map_err(|_| HttpError::Capacity)?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ColorState;

    fn sample_snapshot() -> ColorSnapshot {
        let mut state = ColorState::new();
        state.set_intensity(Channel::Cold, 1);
        state.set_intensity(Channel::Warm, 2);
        state.set_intensity(Channel::Red, 3);
        state.set_intensity(Channel::Green, 4);
        state.set_intensity(Channel::Blue, 5);
        state.snapshot()
    }

    #[test]
    fn test_json_key_order() {
        let body = render_status_json(sample_snapshot()).unwrap();
        assert_eq!(
            body.as_str(),
            r#"{"success":1,"red":3,"green":4,"blue":5,"warm":2,"cold":1}"#
        );
    }

    #[test]
    fn test_json_max_values_fit() {
        let mut state = ColorState::new();
        for channel in Channel::ALL {
            state.set_intensity(channel, 255);
        }
        let body = render_status_json(state.snapshot()).unwrap();
        assert_eq!(
            body.as_str(),
            r#"{"success":1,"red":255,"green":255,"blue":255,"warm":255,"cold":255}"#
        );
    }

    #[test]
    fn test_html_contains_all_rows_in_order() {
        let body = render_status_html(sample_snapshot()).unwrap();
        let html = body.as_str();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>\n"));

        let red = html.find("<p>RED Status: 3 </p>").unwrap();
        let green = html.find("<p>GREEN Status: 4 </p>").unwrap();
        let blue = html.find("<p>BLUE Status: 5 </p>").unwrap();
        let warm = html.find("<p>WARM Status: 2 </p>").unwrap();
        let cold = html.find("<p>COLD Status: 1 </p>").unwrap();
        assert!(red < green && green < blue && blue < warm && warm < cold);
    }
}
