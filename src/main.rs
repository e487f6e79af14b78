use crate::config::AppConfig;
use crate::db::{init_db, Database, RestaurantStore, SqliteKv};
use crate::fetch::HttpFetcher;
use crate::responses::error_to_response;
use crate::router::{handle, App};
use astra::Server;
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod domain;
mod errors;
mod fetch;
mod inspections;
mod lookup;
mod places;
mod responses;
mod router;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rat_inspect=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = AppConfig::from_env();
    if cfg.feed.app_token.is_empty() {
        info!("NYC_APP_TOKEN not set, feed requests will be throttled");
    }

    let db = Database::new(cfg.db_path.clone());
    if let Err(e) = init_db(&db) {
        error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    let fetcher = match HttpFetcher::new(cfg.http_timeout) {
        Ok(f) => f,
        Err(e) => {
            error!(error = %e, "http client setup failed");
            std::process::exit(1);
        }
    };

    let addr: SocketAddr = match cfg.bind_addr.parse() {
        Ok(a) => a,
        Err(e) => {
            error!(addr = %cfg.bind_addr, error = %e, "bad bind address");
            std::process::exit(1);
        }
    };
    let workers = cfg.workers;

    let app = App::new(cfg, fetcher, RestaurantStore::new(SqliteKv::new(db)));

    info!(%addr, workers, "starting server");
    let server = Server::bind(&addr).max_workers(workers);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
    }

    info!("server shut down");
}
