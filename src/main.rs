mod config;
mod db;
mod handlers;
mod middlewares;
mod models;
mod payload;
mod render;
mod routes;
mod state;
mod structs;
mod tracking;
mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::state::app_state::AppState;
use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use db::mongodb::get_database;
use dotenv::dotenv;
use env_logger::Env;
use routes::init_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize the database connection
    let store = match get_database(&config.mongodb_uri, &config.database_name).await {
        Ok(store) => store,
        Err(e) => {
            log::error!("Error connecting to the database: {:#}", e);
            std::process::exit(1);
        }
    };

    let bind = (config.bind_addr.clone(), config.port);
    let jwt_secret = config.jwt_secret.clone();
    let jwt_audience = config.jwt_audience.clone();
    let cors_origins = config.cors_origins.clone();

    // Create shared state
    let app_state = web::Data::new(AppState {
        store: Arc::new(store),
        config,
    });

    log::info!("Listening on {}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
            .allowed_headers(vec![http::header::AUTHORIZATION, http::header::ACCEPT])
            .allowed_header(http::header::CONTENT_TYPE)
            .expose_headers(vec![http::header::CONTENT_DISPOSITION])
            .max_age(3600);
        let jwt_secret = jwt_secret.clone();
        let jwt_audience = jwt_audience.clone();
        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(move |cfg| init_routes(cfg, &jwt_secret, jwt_audience.as_deref()))
    })
    .bind(bind)?
    .run()
    .await
}
