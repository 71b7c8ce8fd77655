mod config;
mod error;
mod model;
mod web;

#[cfg(test)]
mod test_support;

use actix_web::{web::Data, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};

use config::{RelayConfig, PLACEHOLDER_API_URL};
use web::routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting chat relay");

    let config = RelayConfig::from_env();
    if config.api_url == PLACEHOLDER_API_URL {
        warn!("GENERATION_API_URL is not set; using placeholder {}", PLACEHOLDER_API_URL);
    }
    info!("Relaying to generation server at: {}", config.api_url);

    let bind_addr = (config.host.clone(), config.port);
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr.clone())
    .with_context(|| format!("failed to bind {}:{}", bind_addr.0, bind_addr.1))?
    .run()
    .await
    .context("server terminated with an error")
}
