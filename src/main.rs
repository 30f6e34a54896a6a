use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use html2rss_web::config::Config;
use html2rss_web::server::{self, AppState};

/// html2rss-web - serve RSS feeds generated from arbitrary web pages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Shared secret required in the `code` query parameter
    #[arg(long, default_value = "test")]
    verification_code: String,

    /// Directory served for all non-feed paths
    #[arg(long, default_value = "webroot")]
    webroot: PathBuf,
}

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config {
        port: args.port,
        verification_code: args.verification_code,
        webroot: args.webroot,
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .build()?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, webroot = %config.webroot.display(), "listening");

    let state = Arc::new(AppState { config, client });
    axum::serve(listener, server::router(state)).await?;
    Ok(())
}
