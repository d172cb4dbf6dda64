#![deny(missing_docs)]
//! langrank server executable.
//!
//! Serves the ranked language badge for the configured GitHub viewer.

mod config;
mod github;
mod openapi;
mod routes;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;
#[cfg(not(test))]
use std::sync::Arc;

#[cfg(not(test))]
use crate::config::ServerConfig;
#[cfg(not(test))]
use crate::github::GitHubGraphqlClient;
#[cfg(not(test))]
use crate::routes::{AppState, openapi_json, rankings, stats};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = ServerConfig::from_env().expect("invalid langrank configuration");
    if config.github.token.is_none() {
        log::warn!("GITHUB_TOKEN is not set; /stats will report upstream auth errors");
    }

    // The blocking reqwest client panics if built inside the Actix runtime.
    let source = GitHubGraphqlClient::new(config.github.clone());

    let state = web::Data::new(AppState {
        source: Arc::new(source),
        options: config.options.clone(),
        badge: langrank_core::BadgeStyle::default(),
        cache_seconds: config.cache_seconds,
    });

    let allowed_origins = config.ui_origins.clone();
    let listen_addr = config.host.clone();
    let listen_port = config.port;
    let err_msg = format!("Can't bind {}:{}", &listen_addr, listen_port);
    log::info!("listening on {listen_addr}:{listen_port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .service(stats)
                .service(rankings)
                .service(openapi_json)
        })
        .bind((listen_addr, listen_port))
        .expect(&err_msg)
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
