//! Interactive command-line front end.
//!
//! A thin stand-in for the UI/voice layers: reads one command per line,
//! runs it through the pipeline and prints the outcome. Schedule data and
//! transport settings persist as JSON blobs in the data directory
//! (`QUADRA_DATA_DIR`, defaulting to the platform data dir).

use std::io::{BufRead, Write};
use std::path::PathBuf;

use quadra::describe::describe;
use quadra::storage::JsonFileStore;
use quadra::{process_command, EventStore, HttpChatTransport, OutcomeStatus, TransportConfig};

fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("QUADRA_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quadra")
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let dir = data_dir();
    let events_storage = match JsonFileStore::open(&dir) {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("cannot open data directory {}: {e}", dir.display());
            std::process::exit(1);
        }
    };
    // Second handle over the same directory for the settings blob; the event
    // store owns the first.
    let settings_storage = match JsonFileStore::open(&dir) {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("cannot open data directory {}: {e}", dir.display());
            std::process::exit(1);
        }
    };

    let config = TransportConfig::load(&settings_storage);
    if config.api_key.is_empty() {
        // Persist the defaults so there's a file to edit.
        if let Err(e) = config.save(&settings_storage) {
            log::warn!("could not write default settings: {e}");
        }
        eprintln!(
            "no API key configured; set \"apiKey\" in {}",
            dir.join("app_settings.json").display()
        );
    }
    let transport = HttpChatTransport::new(config);

    let mut store = EventStore::new(Box::new(events_storage));
    store.refresh_urgencies(chrono::Local::now().naive_local());

    println!("quadra — type a command, \"list\" for the schedule, \"quit\" to exit");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("input error: {e}");
                break;
            }
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "quit" | "exit" => break,
            "list" => {
                store.refresh_urgencies(chrono::Local::now().naive_local());
                println!("{}", describe(&store.list_all()));
            }
            "reload-config" => {
                transport.refresh_config(TransportConfig::load(&settings_storage));
                println!("settings reloaded");
            }
            command => {
                let schedule = describe(&store.list_all());
                let outcome = process_command(&transport, &mut store, command, &schedule).await;
                match outcome.status {
                    OutcomeStatus::Success => println!("{}", outcome.message),
                    OutcomeStatus::NeedMoreInfo => {
                        println!("{}", outcome.message);
                        println!("(add the missing detail to your command and try again)");
                    }
                    OutcomeStatus::Error => eprintln!("error: {}", outcome.message),
                }
            }
        }
    }
}
