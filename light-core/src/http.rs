//! HTTP Control Surface - Parsing und Antwort-Typen
//!
//! Plattformunabhängiger Teil des HTTP-Servers: Request parsen,
//! Route bestimmen, `/led`-Parameter anwenden und Antwort-Header formatieren.
//! Die Socket-I/O liegt in der Firmware.

use core::fmt;

use crate::channel::Channel;
use crate::state::ColorState;

/// Kapazität des Antwort-Bodys (HTML-Statusseite ist der größte Body)
pub const RESPONSE_BODY_CAPACITY: usize = 2048;

/// Antwort-Body ohne Heap
pub type ResponseBody = heapless::String<RESPONSE_BODY_CAPACITY>;

/// Fehler der HTTP-Schicht
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HttpError {
    /// Request-Line nicht lesbar
    Malformed,
    /// Buffer zu klein für Request oder Antwort
    Capacity,
}

impl From<fmt::Error> for HttpError {
    fn from(_: fmt::Error) -> Self {
        HttpError::Capacity
    }
}

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Post,
    Head,
    Put,
    Delete,
    Options,
    Other,
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "HEAD" => Method::Head,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            "OPTIONS" => Method::Options,
            _ => Method::Other,
        }
    }
}

/// Content-Type dessen Body wie ein Query-String ausgewertet wird
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Geparster Request
///
/// Von den Headern werden nur `Content-Length` und `Content-Type`
/// ausgewertet. Ein formular-kodierter Body liefert dieselben Parameter wie
/// ein Query-String.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpRequest<'a> {
    pub method: Method,
    pub path: &'a str,
    pub query: Option<&'a str>,
    /// Body bei `application/x-www-form-urlencoded`, sonst `None`
    pub form: Option<&'a str>,
}

impl<'a> HttpRequest<'a> {
    /// Parst Request-Head und (optional) Body
    ///
    /// ```
    /// # use light_core::http::{HttpRequest, Method};
    /// let request = HttpRequest::parse("GET /led?red=10 HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(request.method, Method::Get);
    /// assert_eq!(request.path, "/led");
    /// assert_eq!(request.query, Some("red=10"));
    /// ```
    pub fn parse(raw: &'a str) -> Result<Self, HttpError> {
        let (head, body) = match raw.find("\r\n\r\n") {
            Some(pos) => (&raw[..pos], &raw[pos + 4..]),
            None => (raw, ""),
        };

        let line = head.lines().next().ok_or(HttpError::Malformed)?;
        let mut parts = line.split_ascii_whitespace();

        let method = parts.next().ok_or(HttpError::Malformed)?;
        let target = parts.next().ok_or(HttpError::Malformed)?;
        let version = parts.next().ok_or(HttpError::Malformed)?;

        if !version.starts_with("HTTP/") || !target.starts_with('/') || parts.next().is_some() {
            return Err(HttpError::Malformed);
        }

        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        // Ohne Content-Length gibt es keinen Body
        let body_len = content_length(head)?;
        let body = body.get(..body_len).unwrap_or(body);
        let form = header_value(head, "Content-Type")
            .filter(|value| is_form_urlencoded(value))
            .map(|_| body)
            .filter(|body| !body.is_empty());

        Ok(Self {
            method: Method::parse(method),
            path,
            query,
            form,
        })
    }
}

/// Wert des ersten Headers mit diesem Namen (Groß-/Kleinschreibung egal)
fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

fn is_form_urlencoded(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}

/// Länge des Bodys laut `Content-Length` (0 wenn der Header fehlt)
pub fn content_length(head: &str) -> Result<usize, HttpError> {
    match header_value(head, "Content-Length") {
        Some(value) => value.parse().map_err(|_| HttpError::Malformed),
        None => Ok(0),
    }
}

/// Sucht das Ende des Request-Heads (`\r\n\r\n`)
///
/// Gibt die Länge inklusive Leerzeile zurück.
pub fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

// ============================================================================
// Routing
// ============================================================================

/// Bekannte Endpunkte (exakter Pfadvergleich, jede Methode)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    /// `/` - HTML-Statusseite
    Index,
    /// `/led` - Helligkeiten setzen
    Led,
    /// `/ledoff` - alle Ausgänge aus
    LedOff,
    NotFound,
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        match path {
            "/" => Route::Index,
            "/led" => Route::Led,
            "/ledoff" => Route::LedOff,
            _ => Route::NotFound,
        }
    }
}

// ============================================================================
// Query-Parameter
// ============================================================================

/// Iterator über `name=value` Paare eines Query-Strings (roh, nicht dekodiert)
///
/// Leere Segmente (`a=1&&b=2`) werden übersprungen, ein Parameter ohne `=`
/// hat einen leeren Wert.
pub struct QueryParams<'a> {
    rest: Option<&'a str>,
}

impl<'a> QueryParams<'a> {
    pub fn new(query: &'a str) -> Self {
        Self { rest: Some(query) }
    }
}

impl<'a> Iterator for QueryParams<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = self.rest?;
            let (segment, tail) = match rest.split_once('&') {
                Some((segment, tail)) => (segment, Some(tail)),
                None => (rest, None),
            };
            self.rest = tail;

            if segment.is_empty() {
                continue;
            }
            return Some(segment.split_once('=').unwrap_or((segment, "")));
        }
    }
}

/// Dekodiert eine URL-kodierte Komponente Byte für Byte (`%XX`, `+`)
///
/// Ungültige Escape-Sequenzen bleiben unverändert stehen.
pub struct UrlDecoded<'a> {
    bytes: &'a [u8],
}

impl<'a> UrlDecoded<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            bytes: raw.as_bytes(),
        }
    }
}

impl Iterator for UrlDecoded<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let (&first, rest) = self.bytes.split_first()?;
        match first {
            b'+' => {
                self.bytes = rest;
                Some(b' ')
            }
            b'%' => match rest {
                [hi, lo, tail @ ..] => match (hex_value(*hi), hex_value(*lo)) {
                    (Some(hi), Some(lo)) => {
                        self.bytes = tail;
                        Some(hi << 4 | lo)
                    }
                    _ => {
                        self.bytes = rest;
                        Some(b'%')
                    }
                },
                _ => {
                    self.bytes = rest;
                    Some(b'%')
                }
            },
            other => {
                self.bytes = rest;
                Some(other)
            }
        }
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Parst einen Integer tolerant
///
/// Führende Leerzeichen werden übersprungen, dann optionales Vorzeichen und
/// so viele Ziffern wie vorhanden. Alles andere ergibt 0, Überlauf sättigt.
pub fn parse_int_lenient(bytes: impl IntoIterator<Item = u8>) -> i32 {
    let mut bytes = bytes.into_iter().skip_while(u8::is_ascii_whitespace).peekable();

    let negative = match bytes.peek() {
        Some(b'-') => {
            bytes.next();
            true
        }
        Some(b'+') => {
            bytes.next();
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    for byte in bytes {
        if !byte.is_ascii_digit() {
            break;
        }
        value = (value * 10 + i64::from(byte - b'0')).min(i64::from(i32::MAX) + 1);
    }

    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Kanal zu einem URL-kodierten Parameternamen
pub fn channel_for_param(raw_name: &str) -> Option<Channel> {
    Channel::ALL
        .into_iter()
        .find(|channel| UrlDecoded::new(raw_name).eq(channel.name().bytes()))
}

/// Wendet alle `<kanal>=<wert>` Parameter in Reihenfolge auf den Farbzustand an
///
/// Unbekannte Namen werden ignoriert. Gibt die Anzahl angewendeter Parameter
/// zurück.
pub fn apply_led_query(state: &mut ColorState, query: Option<&str>) -> usize {
    let Some(query) = query else {
        return 0;
    };

    let mut applied = 0;
    for (name, value) in QueryParams::new(query) {
        if let Some(channel) = channel_for_param(name) {
            state.set_intensity(channel, parse_int_lenient(UrlDecoded::new(value)));
            applied += 1;
        }
    }
    applied
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
    InternalServerError,
}

impl StatusCode {
    pub fn code(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContentType {
    Html,
    PlainText,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Html => "text/html",
            ContentType::PlainText => "text/plain",
        }
    }
}

/// Vollständige Antwort (Status, Content-Type, Body)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: ContentType,
    pub body: ResponseBody,
}

impl Response {
    pub fn new(status: StatusCode, content_type: ContentType, body: ResponseBody) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// Kurze Text-Antwort (404, 400, 500)
    pub fn text(status: StatusCode, text: &str) -> Self {
        let mut body = ResponseBody::new();
        // Die festen Texte sind deutlich kürzer als die Body-Kapazität
        let pushed = body.push_str(text);
        debug_assert!(pushed.is_ok(), "text response exceeds body capacity");
        Self::new(status, ContentType::PlainText, body)
    }

    pub fn not_found() -> Self {
        Self::text(StatusCode::NotFound, "Not found")
    }

    /// Schreibt Status-Line und Header inklusive Leerzeile
    ///
    /// CORS ist für alle Origins freigegeben.
    pub fn write_head<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        write!(
            w,
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Access-Control-Allow-Origin: *\r\n\
             Connection: close\r\n\
             \r\n",
            self.status.code(),
            self.status.reason(),
            self.content_type.as_str(),
            self.body.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_without_query() {
        let request = HttpRequest::parse("POST /ledoff HTTP/1.0\r\nHost: x\r\n\r\n").unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/ledoff");
        assert_eq!(request.query, None);
    }

    #[test]
    fn test_parse_request_rejects_garbage() {
        assert_eq!(HttpRequest::parse(""), Err(HttpError::Malformed));
        assert_eq!(HttpRequest::parse("GET /"), Err(HttpError::Malformed));
        assert_eq!(
            HttpRequest::parse("GET led HTTP/1.1\r\n"),
            Err(HttpError::Malformed)
        );
        assert_eq!(
            HttpRequest::parse("GET / FTP/1.0\r\n"),
            Err(HttpError::Malformed)
        );
    }

    #[test]
    fn test_parse_form_body() {
        let raw = "POST /led?warm=1 HTTP/1.1\r\n\
                   content-type: application/x-www-form-urlencoded; charset=UTF-8\r\n\
                   Content-Length: 6\r\n\
                   \r\n\
                   red=10&ignored";
        let request = HttpRequest::parse(raw).unwrap();
        assert_eq!(request.query, Some("warm=1"));
        assert_eq!(request.form, Some("red=10"));
    }

    #[test]
    fn test_parse_body_needs_form_content_type() {
        let raw = "POST /led HTTP/1.1\r\nContent-Type: text/plain\r\nContent-Length: 6\r\n\r\nred=10";
        assert_eq!(HttpRequest::parse(raw).unwrap().form, None);

        let raw = "POST /led HTTP/1.1\r\nContent-Type: application/x-www-form-urlencoded\r\n\r\nred=10";
        assert_eq!(HttpRequest::parse(raw).unwrap().form, None);
    }

    #[test]
    fn test_content_length() {
        assert_eq!(content_length("GET / HTTP/1.1\r\nHost: x"), Ok(0));
        assert_eq!(content_length("POST / HTTP/1.1\r\ncontent-length:  12 "), Ok(12));
        assert_eq!(
            content_length("POST / HTTP/1.1\r\nContent-Length: zwölf"),
            Err(HttpError::Malformed)
        );
    }

    #[test]
    fn test_find_head_end() {
        assert_eq!(find_head_end(b"GET / HTTP/1.1\r\n\r\nbody"), Some(18));
        assert_eq!(find_head_end(b"GET / HTTP/1.1\r\n"), None);
    }

    #[test]
    fn test_route_resolve() {
        assert_eq!(Route::resolve("/"), Route::Index);
        assert_eq!(Route::resolve("/led"), Route::Led);
        assert_eq!(Route::resolve("/ledoff"), Route::LedOff);
        assert_eq!(Route::resolve("/led/"), Route::NotFound);
        assert_eq!(Route::resolve("/foo"), Route::NotFound);
    }

    #[test]
    fn test_query_params_split() {
        let mut params = QueryParams::new("red=1&&blue&green=");
        assert_eq!(params.next(), Some(("red", "1")));
        assert_eq!(params.next(), Some(("blue", "")));
        assert_eq!(params.next(), Some(("green", "")));
        assert_eq!(params.next(), None);
    }

    #[test]
    fn test_url_decoding() {
        let decoded: heapless::Vec<u8, 16> = UrlDecoded::new("%2D5+a%zz%4").collect();
        assert_eq!(decoded.as_slice(), b"-5 a%zz%4");
    }

    #[test]
    fn test_parse_int_lenient() {
        assert_eq!(parse_int_lenient(*b"42"), 42);
        assert_eq!(parse_int_lenient(*b"  -17"), -17);
        assert_eq!(parse_int_lenient(*b"+8"), 8);
        assert_eq!(parse_int_lenient(*b"12abc"), 12);
        assert_eq!(parse_int_lenient(*b"abc"), 0);
        assert_eq!(parse_int_lenient(*b""), 0);
        assert_eq!(parse_int_lenient(*b"-"), 0);
        assert_eq!(parse_int_lenient(*b"99999999999999999999"), i32::MAX);
        assert_eq!(parse_int_lenient(*b"-99999999999999999999"), i32::MIN);
    }

    #[test]
    fn test_apply_led_query_last_duplicate_wins() {
        let mut state = ColorState::new();
        let applied = apply_led_query(&mut state, Some("red=10&foo=3&red=20&%62lue=7"));
        assert_eq!(applied, 3);
        assert_eq!(state.get(Channel::Red), 20);
        assert_eq!(state.get(Channel::Blue), 7);
    }

    #[test]
    fn test_write_head_has_cors_and_length() {
        let response = Response::not_found();
        let mut head: heapless::String<256> = heapless::String::new();
        response.write_head(&mut head).unwrap();
        assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(head.contains("Content-Type: text/plain\r\n"));
        assert!(head.contains("Content-Length: 9\r\n"));
        assert!(head.contains("Access-Control-Allow-Origin: *\r\n"));
        assert!(head.ends_with("\r\n\r\n"));
    }
}
