use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use arxiv_search_gateway::{
    config::Config, create_router, search::ArxivClient, utils::init_logger, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_logger();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);
    info!(
        api_url = %config.arxiv.api_url,
        page_size = config.arxiv.page_size,
        page_delay_ms = config.arxiv.page_delay.as_millis() as u64,
        "arXiv provider configured"
    );

    let provider = ArxivClient::new(config.arxiv.clone())
        .map_err(|e| anyhow::anyhow!("Failed to create arXiv client: {}", e))?;

    // Create shared state
    let state = AppState::new(config.clone(), Arc::new(provider));

    // Create router
    let app = create_router(state)?;

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
