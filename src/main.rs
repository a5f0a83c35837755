use available_dates::config::HttpConfig;
use available_dates::utils::{logger, validation::Validate};
use available_dates::{AvailableDatesAggregator, CliConfig, HttpTextFetcher, ServersConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(cli.verbose, logger::LogFormat::from_flag(cli.json_logs));

    tracing::info!("Starting available-dates");
    tracing::debug!("CLI config: {:?}", cli);

    let mut config = match ServersConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Some(timeout) = cli.timeout {
        let http = config.http.get_or_insert(HttpConfig {
            timeout_seconds: None,
            user_agent: None,
        });
        http.timeout_seconds = Some(timeout);
        tracing::info!("🔧 Request timeout overridden to {}s", timeout);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    tracing::info!(
        "✅ Configuration loaded: {} servers from {}",
        config.server_count(),
        cli.config
    );

    let fetcher = HttpTextFetcher::from_config(&config)?;
    let aggregator = AvailableDatesAggregator::new(fetcher, config);
    let dates = aggregator.get_layers_available_dates().await;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&dates)?
    } else {
        serde_json::to_string(&dates)?
    };

    match &cli.output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            tracing::info!("📁 Output saved to: {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}
