// Netzwerk-Modul: HTTP Verbindungs-Handling
//
// Routing und Rendering liegen in light-core, hier nur Socket-I/O.

pub mod http_server;

pub use http_server::{ConnectionError, log_connection_error, serve_connection};
