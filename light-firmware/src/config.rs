// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

// Verhaltens-Konstanten der Core-Logik (Entprellung, Warmweiß-Haltewert)
pub use light_core::{DEBOUNCE_MS, WARM_HOLD_DUTY};

// ============================================================================
// PWM / LED Konfiguration
// ============================================================================
//
// Pin-Belegung (ESP32-C6 DevKit), die Zuordnung passiert in main.rs:
//
//   Kanal   GPIO   LEDC-Channel
//   cold    18     Channel0
//   warm    19     Channel1
//   red     20     Channel2
//   green   21     Channel3
//   blue    22     Channel4

/// PWM-Frequenz in kHz
/// 1 kHz ist flimmerfrei und erlaubt 8 Bit Auflösung am APB-Takt
pub const PWM_FREQUENCY_KHZ: u32 = 1;

// ============================================================================
// Taster Konfiguration
// ============================================================================

/// GPIO-Pin des Tasters (BOOT-Taster des DevKits, active-low, interner Pull-Up)
pub const BUTTON_GPIO_PIN: u8 = 9;

/// Pause der Hauptschleife wenn das Netzwerk nicht gepollt wird (ms)
pub const BUTTON_POLL_INTERVAL_MS: u64 = 10;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit zwischen zwei Verbindungsversuchen (ms)
/// Beim Booten wird unbegrenzt wiederholt
pub const WIFI_RETRY_DELAY_MS: u64 = 250;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// Gesamt-Heap: ~100 KB für WiFi-Stack

/// Anzahl Sockets für embassy-net
/// HTTP-Listener (1) + DHCP (1) + Reserve
pub const NET_SOCKET_COUNT: usize = 4;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// HTTP Port
pub const HTTP_PORT: u16 = 80;

/// Wie lange die Hauptschleife pro Durchlauf auf eine Verbindung wartet (ms)
/// Danach wird wieder der Taster abgefragt
pub const NETWORK_POLL_INTERVAL_MS: u64 = 20;

/// Socket-Timeout in Sekunden
/// Begrenzt wie lange ein hängender Client die Hauptschleife aufhält
pub const HTTP_SOCKET_TIMEOUT_SECS: u64 = 5;

/// Buffer für den Request-Head (Request-Line + Header)
pub const HTTP_REQUEST_BUFFER_SIZE: usize = 1024;

/// Buffer für die Antwort-Header
pub const HTTP_HEAD_BUFFER_SIZE: usize = 256;

/// TCP RX Buffer-Größe in Bytes
/// Für eingehende TCP-Daten vom Client
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
/// Für ausgehende TCP-Daten zum Client
pub const TCP_TX_BUFFER_SIZE: usize = 2048;
