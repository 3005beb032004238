//! willow - Sustainability-aware LLM chat
//!
//! Answers chat queries through a hosted completion API and reports the
//! estimated energy, carbon and water saved by routing each query to the
//! most efficient provider in its catalog.

use std::path::Path;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use willow::config::{Config, ConfigError, KeySource};
use willow::{QueryAnalyzer, Selector};

#[derive(Parser)]
#[command(name = "willow")]
#[command(about = "Sustainability-aware LLM chat with per-query resource estimates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: String,

        /// Override listen address
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Validate configuration file
    Check {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: String,
    },

    /// Show the provider catalog and base scores
    Providers {
        /// Path to configuration file (built-in catalog if missing)
        #[arg(short, long, default_value = "config.toml")]
        config: String,
    },

    /// Analyze a query and print its resource estimate
    Estimate {
        /// Path to configuration file (built-in catalog if missing)
        #[arg(short, long, default_value = "config.toml")]
        config: String,

        /// Query text
        query: String,
    },
}

/// Load `path`, or fall back to defaults when it does not exist.
fn load_or_default(path: &str) -> Result<(Config, KeySource), ConfigError> {
    if Path::new(path).exists() {
        Config::from_file_with_env(path)
    } else {
        Ok((Config::default(), KeySource::None))
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("willow={},tower_http=info", level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config_path, loaded) = match &cli.command {
        Commands::Serve { config, .. } | Commands::Check { config } => {
            (config.clone(), Config::from_file_with_env(config))
        }
        Commands::Providers { config } | Commands::Estimate { config, .. } => {
            (config.clone(), load_or_default(config))
        }
    };

    let level = loaded
        .as_ref()
        .map(|(c, _)| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(&level);

    let (mut config, key_source) = loaded?;
    tracing::debug!(config = %config_path, key_source = %key_source, "Loaded configuration");

    match cli.command {
        Commands::Serve { listen, .. } => {
            if let Some(addr) = listen {
                tracing::info!(listen = %addr, "Override listen address");
                config.server.listen = addr;
            }
            if key_source == KeySource::None {
                tracing::warn!("No upstream API key configured - chat requests may be rejected");
            }

            willow::proxy::run_server(config).await
        }

        Commands::Check { .. } => {
            let catalog = config.catalog()?;
            let available = catalog.available().count();

            println!("Configuration OK: {}", config_path);
            println!("  listen:        {}", config.server.listen);
            println!("  upstream:      {} ({})", config.upstream.url, config.upstream.model);
            println!("  api key:       {}", key_source);
            println!(
                "  providers:     {} ({} available)",
                catalog.providers().len(),
                available
            );

            if available == 0 {
                anyhow::bail!("No available providers - every estimate would fail");
            }
            Ok(())
        }

        Commands::Providers { .. } => {
            let selector = Selector::new(config.catalog()?);
            let catalog = selector.catalog();

            println!(
                "{:<12} {:<16} {:<10} {:>8} {:>8} {:>8} {:>7} {:>6}",
                "NAME", "MODEL", "REGION", "WH/1K", "CO2/1K", "ML/1K", "SCORE", "AVAIL"
            );
            for p in catalog.providers() {
                println!(
                    "{:<12} {:<16} {:<10} {:>8.1} {:>8.2} {:>8.1} {:>7.3} {:>6}",
                    p.name,
                    p.model,
                    p.region,
                    p.energy_wh_per_1k,
                    catalog.adjusted_co2_per_1k(p),
                    p.water_ml_per_1k,
                    selector.score(p, 0.0),
                    if p.available { "yes" } else { "no" }
                );
            }
            Ok(())
        }

        Commands::Estimate { query, .. } => {
            let selector = Selector::new(config.catalog()?);
            let analysis = QueryAnalyzer::new().analyze(&query);
            let estimate = selector.evaluate(&query, &analysis)?;

            println!("Category:     {}", analysis.category);
            println!("Complexity:   {:.3}", analysis.complexity);
            println!("Impact:       {:.3}", analysis.sustainability_impact());
            println!("Tokens:       {}", estimate.token_count);
            println!(
                "Provider:     {} ({}) in {}",
                estimate.provider.name, estimate.provider.model, estimate.provider.region
            );
            println!("Energy saved: {:.3} Wh", estimate.energy_saved);
            println!("CO2 saved:    {:.3} g", estimate.co2_saved);
            println!("Water saved:  {:.3} mL", estimate.water_saved);
            Ok(())
        }
    }
}
