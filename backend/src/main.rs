mod codec;
mod config;
mod error;
mod job_controller;
mod review;
mod services;
mod storage;
mod store;

use crate::config::AppConfig;
use crate::job_controller::state::{AppState, SharedStore};
use crate::storage::{KeyValueStore, SqliteStore};
use crate::store::JobStore;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let store = open_store(&config).map_err(io::Error::other)?;
    let state = AppState::new(store);
    let body_limit = config.body_limit;

    info!(
        "Job store '{}' opened at {}",
        config.namespace,
        config.database_path.display()
    );
    info!("Server running at {}", config.url());

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(body_limit))
            .app_data(web::PayloadConfig::new(body_limit))
            .app_data(web::Data::new(state.clone()))
            .configure(services::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn open_store(config: &AppConfig) -> Result<SharedStore, error::StoreError> {
    let kv: Box<dyn KeyValueStore + Send> = Box::new(SqliteStore::open(&config.database_path)?);
    let mut store = JobStore::new(kv, &config.namespace);
    store.initialize()?;
    Ok(store)
}
