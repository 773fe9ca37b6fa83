use anyhow::Result;
use clap::Parser;
use engine::corpus::DEFAULT_BASE_URL;
use engine::{Category, Corpus};
use server::{build_app, ServerConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "server", about = "Serve single-term search over a category corpus")]
struct Args {
    /// Corpus category as NAME=DIR; repeat for more categories
    #[arg(long = "corpus", required = true)]
    categories: Vec<Category>,
    /// Prefix prepended to file names to form document urls
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Reload the corpus on every query instead of caching the index
    #[arg(long, default_value_t = false)]
    rebuild_per_request: bool,
    /// Comma-separated origins allowed by CORS (any origin when unset)
    #[arg(long, env = "CORS_ALLOW_ORIGIN")]
    cors_allow_origin: Option<String>,
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

impl Args {
    fn server_config(self) -> ServerConfig {
        ServerConfig {
            corpus: Corpus::new(self.categories).with_base_url(self.base_url),
            rebuild_per_request: self.rebuild_per_request,
            cors_allow_origin: self.cors_allow_origin,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    let config = args.server_config();
    tracing::info!(
        categories = config.corpus.categories.len(),
        cached = !config.rebuild_per_request,
        "building search app"
    );
    let app = build_app(config)?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
