// HTTP Connection - bedient genau eine TCP-Verbindung
//
// Request-Head und Body (bis Content-Length) lesen, an den LightController
// geben, Antwort schreiben. Kein Keep-Alive, nach jeder Antwort wird die
// Verbindung geschlossen.

use defmt::{Debug2Format, info, warn};
use embassy_net::tcp::TcpSocket;
use embedded_io_async::Write as _;
use light_core::http::{
    HttpError, HttpRequest, Method, Response, StatusCode, content_length, find_head_end,
};
use light_core::{LightController, PwmOutput};

use crate::config::{HTTP_HEAD_BUFFER_SIZE, HTTP_REQUEST_BUFFER_SIZE};

/// Fehler beim Bedienen einer Verbindung
#[derive(Debug)]
pub enum ConnectionError {
    /// Socket-Fehler (Reset, Timeout)
    Tcp(embassy_net::tcp::Error),
    /// Client hat geschlossen bevor der Request vollständig war
    Closed,
    Http(HttpError),
}

impl From<embassy_net::tcp::Error> for ConnectionError {
    fn from(err: embassy_net::tcp::Error) -> Self {
        ConnectionError::Tcp(err)
    }
}

impl From<HttpError> for ConnectionError {
    fn from(err: HttpError) -> Self {
        ConnectionError::Http(err)
    }
}

/// Bedient einen verbundenen Client: ein Request, eine Antwort
pub async fn serve_connection<P: PwmOutput>(
    socket: &mut TcpSocket<'_>,
    controller: &mut LightController<P>,
) -> Result<(), ConnectionError> {
    let mut request_buffer = [0u8; HTTP_REQUEST_BUFFER_SIZE];

    // HTTP-Fehler beim Lesen bekommen eine 400, Socket-Fehler nicht
    let parsed = match read_request(socket, &mut request_buffer).await {
        Ok(len) => core::str::from_utf8(&request_buffer[..len])
            .map_err(|_| HttpError::Malformed)
            .and_then(HttpRequest::parse),
        Err(ConnectionError::Http(e)) => Err(e),
        Err(e) => return Err(e),
    };

    let (response, method) = match parsed {
        Ok(request) => {
            info!("HTTP: {} {}", request.method, request.path);
            (controller.handle_request(&request), request.method)
        }
        Err(e) => {
            warn!("HTTP: Invalid request: {}", e);
            (
                Response::text(StatusCode::BadRequest, "Bad Request"),
                Method::Other,
            )
        }
    };

    write_response(socket, &response, method != Method::Head).await?;
    info!(
        "HTTP: Responded {} ({} bytes)",
        response.status.code(),
        response.body.len()
    );
    Ok(())
}

/// Liest Head und Body in den Buffer
///
/// Gibt die Gesamtlänge (Head + `Content-Length`) zurück.
async fn read_request(socket: &mut TcpSocket<'_>, buf: &mut [u8]) -> Result<usize, ConnectionError> {
    let mut len = 0;
    let head_end = loop {
        if len == buf.len() {
            return Err(HttpError::Capacity.into());
        }

        len += read_some(socket, &mut buf[len..]).await?;

        if let Some(end) = find_head_end(&buf[..len]) {
            break end;
        }
    };

    let head = core::str::from_utf8(&buf[..head_end]).map_err(|_| HttpError::Malformed)?;
    let total = head_end + content_length(head)?;
    if total > buf.len() {
        return Err(HttpError::Capacity.into());
    }

    while len < total {
        len += read_some(socket, &mut buf[len..total]).await?;
    }
    Ok(total)
}

async fn read_some(socket: &mut TcpSocket<'_>, buf: &mut [u8]) -> Result<usize, ConnectionError> {
    match socket.read(buf).await? {
        0 => Err(ConnectionError::Closed),
        n => Ok(n),
    }
}

/// Schreibt Header und (optional) Body
async fn write_response(
    socket: &mut TcpSocket<'_>,
    response: &Response,
    include_body: bool,
) -> Result<(), ConnectionError> {
    let mut head: heapless::String<HTTP_HEAD_BUFFER_SIZE> = heapless::String::new();
    response.write_head(&mut head).map_err(HttpError::from)?;

    socket.write_all(head.as_bytes()).await?;
    if include_body {
        socket.write_all(response.body.as_bytes()).await?;
    }
    socket.flush().await?;
    Ok(())
}

/// Loggt einen Verbindungsfehler (Verbindung wird danach verworfen)
pub fn log_connection_error(err: &ConnectionError) {
    match err {
        ConnectionError::Closed => info!("HTTP: Client closed connection early"),
        ConnectionError::Tcp(e) => warn!("HTTP: Socket error: {}", Debug2Format(e)),
        ConnectionError::Http(e) => warn!("HTTP: Request error: {}", e),
    }
}
