use std::sync::Arc;

use server::config::Config;
use server::routes;
use server::state::{AppState, Storage};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("invalid configuration {}", err);

            std::process::exit(1);
        }
    };

    let storage = Storage::bootstrap(&config).await;
    let state = Arc::new(AppState::new(storage, &config));
    let app = routes::router(state);

    log::info!("starting registration server on {}", config.bind_addr);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            log::error!("failed to bind to {} {:?}", config.bind_addr, err);

            std::process::exit(1);
        }
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal());

    if let Err(err) = server.await {
        log::error!("server error {:?}", err);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c {:?}", err);

        std::future::pending::<()>().await;
    }

    log::info!("shutting down");
}
