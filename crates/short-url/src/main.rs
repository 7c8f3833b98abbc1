//! Short URL redirect server.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "short-url")]
#[command(about = "Redirects short paths to the URLs listed in a JSON file", long_about = None)]
struct Cli {
    /// Mapping file of the form {"paths": {"/short": "https://long"}}
    #[arg(short = 'f', long = "file", default_value = "data/urlMap.json")]
    file: PathBuf,

    /// Listen port
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mapping = match short_url::load_mapping(&cli.file) {
        Ok(mapping) => mapping,
        Err(err) => {
            tracing::error!(error = %err, "url mapping error");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(paths = mapping.paths.len(), file = %cli.file.display(), "loaded url mapping");

    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "failed to bind address");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%addr, "starting redirect server");
    if let Err(err) = axum::serve(listener, short_url::create_app(mapping)).await {
        tracing::error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
