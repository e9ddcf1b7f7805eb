use onboarding_coach::config::ProxyConfig;
use onboarding_coach::logging;
use onboarding_coach::proxy::{ProxyState, proxy_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ProxyConfig::from_env()?;
    let _log_guard = logging::init_tracing(config.log_dir.as_deref(), "console-proxy");

    let state = ProxyState::new(&config)?;

    eprintln!("🔀 Console Proxy v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Upstream: {}", state.upstream());
    eprintln!("   Cookie domain: {}", config.cookie_domain);
    eprintln!("   Listening: http://0.0.0.0:{}\n", config.port);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, upstream = state.upstream(), "Proxy server started");

    axum::serve(listener, proxy_routes(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
