use clap::Parser;
use manifest_etl::config::api_key_from_env;
use manifest_etl::utils::{logger, validation::Validate};
use manifest_etl::{CliConfig, EtlEngine, GeminiClient, LocalStorage, ManifestPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting manifest-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let api_key = match api_key_from_env() {
        Ok(key) => key,
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let generator = GeminiClient::new(config.api_endpoint.clone(), config.model.clone(), api_key);
    let storage = LocalStorage::new(".");
    let pipeline = ManifestPipeline::new(storage, config, generator);

    let engine = EtlEngine::new(pipeline);
    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Manifest ETL completed successfully!");
            println!("✅ Manifest ETL completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ Manifest ETL failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
