use tracing::{error, info};

use clouddrive::{Config, DriveSession};

fn main() {
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
    if let Err(e) = clouddrive::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        clouddrive::logging::init_console_only(&config.logging.level);
    }

    info!("clouddrive - personal cloud drive");

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let store = match clouddrive::store::open(&config.store) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open store: {e}");
            std::process::exit(1);
        }
    };

    let mut session = DriveSession::new(store, &config);
    match session.bootstrap() {
        Ok(true) => {
            let usage = session.storage_usage();
            if let Some(user) = session.user() {
                info!(
                    email = %user.email,
                    files = session.drive().files().len(),
                    folders = session.drive().folders().len(),
                    "Signed in"
                );
            }
            info!(
                "Storage: {:.2} GB of {} GB ({:.1}%)",
                usage.used_gb(),
                usage.quota_gb,
                usage.percent()
            );
        }
        Ok(false) => info!("No account signed in"),
        Err(e) => error!("Failed to restore session: {e}"),
    }
}
