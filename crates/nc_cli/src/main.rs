use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use nc_core::{is_valid_date, today_utc};
use nc_feed::FeedFetcher;
use nc_inference::Summarizer;
use nc_speech::SpeechPublisher;
use nc_storage::{CacheLookup, DailyCache};
use nc_web::{create_app, AppState, PodcastPipeline};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily tech news podcast service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve GET /news (default)
    Serve {
        /// Port to listen on, overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the pipeline once for today and print the record
    Generate,
    /// Print the stored podcast for a date
    Show {
        /// Date as YYYY-MM-DD, defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,
    },
}

async fn build_pipeline(config: &AppConfig) -> anyhow::Result<PodcastPipeline> {
    let source = Arc::new(FeedFetcher::new(config.feed.clone()));
    info!("📡 Feed source: {} ({} stories)", config.feed.url, config.feed.news_count);

    let model = nc_inference::create_model(Some(config.inference.clone()))?;
    let summarizer = Arc::new(Summarizer::new(model));
    info!("🤖 Summarizing with {}", summarizer.model_name());

    info!("🔊 Speech backend: {}", config.speech.backend_name());
    let (synthesizer, objects) = nc_speech::create_backends(&config.speech).await?;
    let publisher = Arc::new(SpeechPublisher::new(synthesizer, objects));

    info!("💾 Storage backend: {}", config.storage.backend_name());
    let store = nc_storage::create_storage(&config.storage).await?;

    Ok(PodcastPipeline::new(source, summarizer, publisher, DailyCache::new(store))
        .with_read_failure_policy(config.read_failure_policy))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("👋 Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let pipeline = Arc::new(build_pipeline(&config).await?);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let addr = SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.port)));
            let app = create_app(AppState::new(pipeline));
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            info!("🚀 Server running on port {}", addr.port());
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        Commands::Generate => {
            let record = pipeline.get_or_create(&today_utc()).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Show { date } => {
            let date = date.unwrap_or_else(today_utc);
            if !is_valid_date(&date) {
                anyhow::bail!("Invalid date '{}', expected YYYY-MM-DD", date);
            }
            match pipeline.cache().get(&date).await {
                CacheLookup::Found(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                CacheLookup::NotFound => println!("No podcast stored for {}", date),
                CacheLookup::ReadFailed(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
