use clap::Parser;
use manifest_etl::config::api_key_from_env;
use manifest_etl::config::toml_config::TomlConfig;
use manifest_etl::core::ConfigProvider;
use manifest_etl::utils::{logger, validation::Validate};
use manifest_etl::{EtlEngine, GeminiClient, LocalStorage, ManifestPipeline};

#[derive(Parser)]
#[command(name = "toml-manifest")]
#[command(about = "Manifest ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "manifest-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based manifest ETL");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    tracing::info!(
        "📋 Pipeline '{}' v{}: {} -> {}",
        config.pipeline.name,
        config.pipeline.version,
        config.input_file(),
        config.output_path()
    );

    let api_key = match api_key_from_env() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let generator = GeminiClient::new(
        config.endpoint().to_string(),
        config.model().to_string(),
        api_key,
    );
    let storage = LocalStorage::new(".");
    let pipeline = ManifestPipeline::new(storage, config, generator);

    let engine = EtlEngine::new(pipeline);
    match engine.run().await {
        Ok(output_path) => {
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
