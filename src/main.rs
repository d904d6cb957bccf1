use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use colonyops::api_router::build_app;
use colonyops::core::config::AppConfig;
use colonyops::core::events::{drain_changes, Collection};
use colonyops::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .write_style(env_logger::WriteStyle::Always)
        .init();

    let config = AppConfig::load()?;
    let addr = config.bind_address();
    let state = Arc::new(AppState::from_config(config));

    {
        let store = state.store.read().await;
        info!(
            "Loaded {} agent(s) and {} building(s)",
            store.agents.len(),
            store.buildings.len()
        );
    }

    tokio::spawn(drain_changes(state.notifier.subscribe(), |change| {
        if change.collection == Collection::Settings {
            info!("Settings changed at {}", change.at);
        }
    }));

    let app = build_app(state).layer(CorsLayer::permissive());

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {addr}: {e} - is another instance running?");
            return Err(e.into());
        }
    };
    info!("Listening on http://{addr}");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
