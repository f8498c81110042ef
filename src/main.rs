use fitness_kpi_dashboard::config::log_filter;
use fitness_kpi_dashboard::{load_dataset, router, AppState, Config};
use std::{env, net::SocketAddr};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(log_filter(env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .init();

    let config = Config::from_env()?;
    info!(
        data_path = %config.data_path.display(),
        downtime_policy = config.downtime_policy.as_str(),
        "starting KPI dashboard"
    );

    let dataset = match load_dataset(&config.data_path).await {
        Ok(dataset) => dataset,
        Err(err) => {
            error!("{err}");
            return Err(err.into());
        }
    };

    let app = router(AppState::new(dataset, config.downtime_policy));
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
