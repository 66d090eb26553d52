// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use defmt::info;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, StackResources};
use embassy_time::Instant;

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::DriveMode;
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::rng::Rng;
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_pwm_light::LightController;
use esp_pwm_light::config::{EXTRA_HEAP_SIZE, NET_SOCKET_COUNT, PWM_FREQUENCY_KHZ, WIFI_HEAP_SIZE};
use esp_pwm_light::hal::{LedcPwmWriter, PushButton};
use esp_pwm_light::tasks::{connection_task, net_task, run_control_loop, wait_for_network};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Boot-Reihenfolge:
/// 1. Hardware, Heap und Embassy Runtime
/// 2. LEDC-Kanäle und Taster, Ausgänge auf 0
/// 3. WiFi verbinden (blockiert bis eine IP-Adresse da ist)
/// 4. Hauptschleife (kehrt nie zurück)
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // ========================================================================
    // PWM (LEDC): ein Low-Speed-Timer, fünf Kanäle
    // ========================================================================

    let mut ledc = Ledc::new(peripherals.LEDC);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    let mut pwm_timer = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    pwm_timer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty8Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_khz(PWM_FREQUENCY_KHZ),
        })
        .expect("Failed to configure LEDC timer");

    // Reihenfolge = Channel::ALL (cold, warm, red, green, blue)
    let mut channels = [
        ledc.channel::<LowSpeed>(channel::Number::Channel0, peripherals.GPIO18),
        ledc.channel::<LowSpeed>(channel::Number::Channel1, peripherals.GPIO19),
        ledc.channel::<LowSpeed>(channel::Number::Channel2, peripherals.GPIO20),
        ledc.channel::<LowSpeed>(channel::Number::Channel3, peripherals.GPIO21),
        ledc.channel::<LowSpeed>(channel::Number::Channel4, peripherals.GPIO22),
    ];
    for pwm_channel in channels.iter_mut() {
        pwm_channel
            .configure(channel::config::Config {
                timer: &pwm_timer,
                duty_pct: 0,
                drive_mode: DriveMode::PushPull,
            })
            .expect("Failed to configure LEDC channel");
    }

    let button = PushButton::new(peripherals.GPIO9);

    let mut controller =
        LightController::new(LedcPwmWriter::new(channels), Instant::now().as_millis());
    controller.start();
    info!("PWM: 5 channels at {} kHz, all off", PWM_FREQUENCY_KHZ);

    // ========================================================================
    // WiFi (Station-Modus)
    // ========================================================================

    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    static RESOURCES: static_cell::StaticCell<StackResources<NET_SOCKET_COUNT>> =
        static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();

    // Ohne Netzwerk startet die Hauptschleife nicht (auch der Taster nicht)
    wait_for_network(stack).await;

    run_control_loop(stack, controller, button).await
}
