use tracing::{error, info};

use fileforge::web::WebServer;
use fileforge::{Config, Database};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = fileforge::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        fileforge::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("FileForge - document management backend");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config, &db) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to initialize web server: {}", e);
            std::process::exit(1);
        }
    };

    info!("Server configured on {}", server.addr());

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
