use crate::app::App;
use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::domain::clock::SystemClock;
use crate::router::respond;
use astra::Server;
use std::sync::Arc;
use tracing::{error, info};

mod app;
mod config;
mod db;
mod domain;
mod errors;
mod logging;
mod responses;
mod router;


fn main() {
    // 1️⃣ Configuration and logging
    let config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(2);
        }
    };
    logging::init_logging(&config);

    // 2️⃣ Create the database handle and apply the schema
    let db = Database::new(&config.db_path).with_busy_timeout(config.busy_timeout);
    if let Err(e) = init_db(&db) {
        error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    if config.seed_demo_data {
        match app::seed(&db, &SystemClock) {
            Ok(summary) => info!(?summary, "demo data checked"),
            Err(e) => error!(error = %e, "seeding demo data failed"),
        }
    }

    // 3️⃣ Start the server
    let app = App::new(db, Arc::new(SystemClock), config.cors_origins.clone());
    info!(addr = %config.bind_addr, workers = config.max_workers, "starting server");

    let server = Server::bind(&config.bind_addr).max_workers(config.max_workers);

    // 4️⃣ Serve requests; every worker shares the same services
    let result = server.serve(move |req, _info| respond(req, &app));

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
    }

    info!("server shut down cleanly");
}
