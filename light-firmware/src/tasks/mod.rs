// Task-Modul: Embassy Tasks und die Hauptschleife
//
// WiFi und Netzwerk-Stack laufen als eigene Tasks, Taster und HTTP
// teilen sich die Hauptschleife (ein Besitzer für den LightController).

pub mod control_loop;
pub mod wifi;

// Re-export für einfachen Import
pub use control_loop::run_control_loop;
pub use wifi::{connection_task, net_task, wait_for_network};
