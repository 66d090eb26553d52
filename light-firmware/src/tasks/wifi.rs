// WiFi Tasks - Station-Verbindung und Netzwerk-Stack
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::Timer;
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};

use crate::config::{WIFI_PASSWORD, WIFI_RETRY_DELAY_MS, WIFI_SSID};

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung im Station-Modus:
/// - Konfiguriert und startet den Controller
/// - Verbindet mit dem Access Point, bei Fehlern alle 250 ms erneut
/// - Reconnected nach einem Disconnect
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(WIFI_SSID.into())
                    .with_password(WIFI_PASSWORD.into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after_millis(WIFI_RETRY_DELAY_MS).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after_millis(WIFI_RETRY_DELAY_MS).await;
                continue;
            }

            info!("WiFi: Started in station mode");
        }

        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        if let Err(e) = controller.connect_async().await {
            warn!("WiFi: Connection failed: {}", Debug2Format(&e));
            Timer::after_millis(WIFI_RETRY_DELAY_MS).await;
            continue;
        }
        info!("WiFi: Connected");

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected from AP, will retry...");
        Timer::after_millis(WIFI_RETRY_DELAY_MS).await;
    }
}

/// Network Task
///
/// Prozessiert Netzwerk-Pakete für den embassy-net Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Blockiert bis Link und DHCP-Adresse da sind
///
/// Läuft im Boot-Pfad vor der Hauptschleife. Solange keine Adresse
/// vorliegt wird regelmäßig ein Fortschritts-Log ausgegeben.
pub async fn wait_for_network(stack: Stack<'static>) {
    while !stack.is_link_up() {
        info!("WiFi: Connecting...");
        Timer::after_millis(WIFI_RETRY_DELAY_MS).await;
    }

    info!("WiFi: Link is up, waiting for IP address...");

    loop {
        if let Some(config) = stack.config_v4() {
            info!("WiFi: Got IP address!");
            info!("  IP:      {}", Debug2Format(&config.address.address()));
            info!("  Gateway: {}", Debug2Format(&config.gateway));
            return;
        }
        Timer::after_millis(WIFI_RETRY_DELAY_MS).await;
    }
}
