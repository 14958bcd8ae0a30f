use anyhow::Context;
use clap::Parser;
use commodity_forecast::core::ConfigProvider;
use commodity_forecast::utils::{logger, validation::Validate};
use commodity_forecast::{
    router, AppConfig, ArimaForecaster, CliConfig, ForecastService, LocalStorage,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在時忽略
    dotenvy::dotenv().ok();

    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, cli.json_logs);

    tracing::info!("🚀 Starting commodity-forecast v{}", env!("CARGO_PKG_VERSION"));
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    display_config_summary(&config);

    if !std::path::Path::new(config.data_directory()).is_dir() {
        tracing::warn!(
            "⚠️ Data directory '{}' does not exist; every prediction will fail until it does",
            config.data_directory()
        );
    }

    let forecaster = ArimaForecaster::new(config.model_order())?;
    let storage = LocalStorage::new(config.data_directory().to_string());
    let service = ForecastService::from_config(storage, forecaster, &config);
    let app = router(Arc::new(service), config.server.permissive_cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("📡 Listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

fn load_config(cli: &CliConfig) -> commodity_forecast::Result<AppConfig> {
    let config = cli.resolve()?;
    config.validate()?;
    Ok(config)
}

fn display_config_summary(config: &AppConfig) {
    tracing::info!("📋 Configuration Summary:");
    tracing::info!("  Bind: {}", config.bind_address());
    tracing::info!("  Data directory: {}", config.data.directory);
    tracing::info!("  Date column: {}", config.data.date_column);
    tracing::info!("  Model: {}", config.model);
    tracing::info!("  Max horizon: {} days", config.data.max_horizon_days);
    tracing::info!("  Permissive CORS: {}", config.server.permissive_cors);
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
