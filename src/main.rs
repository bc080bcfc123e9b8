use std::sync::Arc;

use mini_shop_rust::config::ShopConfig;
use mini_shop_rust::router::create_app_router;
use mini_shop_rust::shop::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ShopConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "configuration rejected");
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(config.mode, config.auto_approve));
    let app = create_app_router(state);

    tracing::info!(
        addr = %config.bind,
        mode = config.mode.as_str(),
        "mini shop listening"
    );

    let listener = tokio::net::TcpListener::bind(config.bind).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
