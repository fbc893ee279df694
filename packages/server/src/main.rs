#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Entry point for the Lisbon road accidents dashboard.
//!
//! Serves the dashboard at `http://127.0.0.1:8501` by default. See
//! [`lisbon_accidents_server::config`] for the environment variables.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    lisbon_accidents_server::run_server().await
}
