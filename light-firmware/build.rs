// Build-Script: Wird vor dem Kompilieren ausgeführt
// Backt die WiFi-Zugangsdaten ein und konfiguriert den Linker für ESP32-C6

fn main() {
    // Lade .env file für WiFi-Credentials
    // Fehler ignorieren wenn .env nicht existiert (dann müssen ENV vars gesetzt sein)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  .env file nicht gefunden: {}", e);
        eprintln!("   Setze WIFI_SSID und WIFI_PASSWORD als Environment-Variablen");
    }

    // Gebe WiFi-Credentials an Rust-Compiler weiter
    // Die Werte werden zur Compile-Zeit in den Code eingebacken
    if let Ok(ssid) = std::env::var("WIFI_SSID") {
        println!("cargo:rustc-env=WIFI_SSID={}", ssid);
    }
    if let Ok(password) = std::env::var("WIFI_PASSWORD") {
        println!("cargo:rustc-env=WIFI_PASSWORD={}", password);
    }

    // Neu bauen wenn sich die Zugangsdaten ändern
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASSWORD");

    // Linker ruft dieses Build-Script bei Fehlern erneut auf (siehe unten)
    register_linker_hints();

    // Reihenfolge wichtig: linkall.x (Memory-Layout) muss als letztes kommen
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

// Linker-Fehler mit Hinweisen versehen
//
// Das Build-Script registriert sich selbst als "--error-handling-script".
// Der Linker ruft es dann mit <fehler-typ> <symbol> auf.
fn register_linker_hints() {
    let args: Vec<String> = std::env::args().collect();

    if let [_, kind, symbol, ..] = args.as_slice() {
        if kind != "undefined-symbol" {
            std::process::exit(1);
        }
        if let Some(hint) = linker_hint(symbol) {
            eprintln!();
            eprintln!("💡 {}", hint);
            eprintln!();
        }
        std::process::exit(0);
    }

    let script = std::env::current_exe().expect("Build-Script Pfad nicht ermittelbar");
    println!(
        "cargo:rustc-link-arg=--error-handling-script={}",
        script.display()
    );
}

// Hinweis zu einem undefinierten Symbol
fn linker_hint(symbol: &str) -> Option<&'static str> {
    const ALLOC_SYMBOLS: [&str; 8] = [
        "free",
        "malloc",
        "calloc",
        "get_free_internal_heap_size",
        "malloc_internal",
        "realloc_internal",
        "calloc_internal",
        "free_internal",
    ];

    if symbol.starts_with("_defmt_") {
        Some("`defmt` Symbole fehlen: ist `defmt.x` gelinkt und `esp-println` mit `defmt-espflash` eingebunden?")
    } else if symbol == "_stack_start" {
        Some("Linker-Skript `linkall.x` fehlt?")
    } else if symbol.starts_with("esp_rtos_") {
        Some("`esp-radio` findet keinen Scheduler: wurde `esp_rtos::start` aufgerufen?")
    } else if ALLOC_SYMBOLS.contains(&symbol) {
        Some("Heap-Symbole fehlen: `esp-alloc` als Dependency vorhanden?")
    } else {
        None
    }
}
