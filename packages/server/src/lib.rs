#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the interactive Lisbon road accidents dashboard.
//!
//! Loads the accident CSV once at startup into an immutable table shared by
//! every request. The embedded browser page re-queries `/api/dashboard`
//! and `/api/markers` whenever a filter control changes; each request
//! filters the table into a fresh selection of row indices and aggregates
//! it synchronously. Nothing is cached or written back.

mod assets;
pub mod config;
mod handlers;
pub mod markers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use lisbon_accidents_dataset::{AccidentTable, CsvLoader};

use crate::config::ServerConfig;

/// Outcome of the startup load.
#[derive(Debug)]
pub enum Dataset {
    /// The table, ready to be filtered.
    Loaded(AccidentTable),
    /// The load failed; the message is shown to the user as-is.
    Unavailable(String),
}

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// The dataset loaded at startup.
    pub dataset: Dataset,
}

impl AppState {
    /// Loads the dataset described by `config`.
    ///
    /// A load failure is logged and kept as [`Dataset::Unavailable`] so the
    /// view can report it; it is never retried.
    #[must_use]
    pub fn load(config: &ServerConfig) -> Self {
        let dataset = match CsvLoader::new()
            .with_delimiter(config.delimiter)
            .load_path(&config.data_path)
        {
            Ok(table) => Dataset::Loaded(table),
            Err(e) => {
                log::error!("Dataset unavailable: {e}");
                Dataset::Unavailable(e.to_string())
            }
        };
        Self { dataset }
    }
}

/// Registers the API routes and the embedded page.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::QueryConfig::default().error_handler(handlers::query_error))
            .route("/health", web::get().to(handlers::health))
            .route("/options", web::get().to(handlers::options))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/markers", web::get().to(handlers::markers)),
    )
    .route("/", web::get().to(assets::serve))
    .route("/{path:.*}", web::get().to(assets::serve));
}

/// Starts the dashboard server.
///
/// Reads [`ServerConfig`] from the environment, loads the dataset, and
/// serves until the process is stopped. The caller provides the async
/// runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env();
    log::debug!("Configuration: {config:?}");

    let state = web::Data::new(AppState::load(&config));

    log::info!(
        "Starting server on http://{}:{}",
        config.bind_addr,
        config.port
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
