//! gnolend-activity CLI: serve the activity API or print one market's feed.

use clap::{Args, Parser, Subcommand};
use gnolend_activity::api::{router, MARKET_ACTIVITY_PATH};
use gnolend_activity::chain::{
    BlockTimeCache, FetchConfig, IndexerClient, RpcBlockTimes, DEFAULT_INDEXER_URL,
    DEFAULT_RPC_URL, MAX_RETRIES, RATE_LIMIT_MS, RETRY_BACKOFF_MS, TIMEOUT_SECS,
};
use gnolend_activity::ActivityService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

type Service = ActivityService<IndexerClient, RpcBlockTimes>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(args) => run_serve(args),
        Command::Activity(args) => run_activity(args),
    }
}

#[derive(Parser)]
#[command(name = "gnolend-activity")]
#[command(about = "Activity feed (deposits, withdrawals, borrows, repays) for gno.land lending markets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the activity feed over HTTP.
    Serve(ServeArgs),
    /// Print one market's activity as JSON.
    Activity(ActivityArgs),
}

#[derive(Args)]
struct ClientArgs {
    #[arg(long, default_value = DEFAULT_INDEXER_URL)]
    indexer_url: String,
    #[arg(long, default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
    #[arg(long, default_value_t = RATE_LIMIT_MS)]
    rate_limit_ms: u64,
    #[arg(long, default_value_t = MAX_RETRIES)]
    max_retries: u32,
    #[arg(long, default_value_t = RETRY_BACKOFF_MS)]
    retry_backoff_ms: u64,
    #[arg(long, default_value_t = TIMEOUT_SECS)]
    timeout_secs: u64,
    /// SQLite file remembering resolved block times.
    #[arg(long)]
    block_cache: Option<PathBuf>,
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: String,
    #[command(flatten)]
    client: ClientArgs,
}

#[derive(Args)]
struct ActivityArgs {
    #[arg(long)]
    market_id: String,
    #[command(flatten)]
    client: ClientArgs,
}

impl ClientArgs {
    fn fetch_config(&self, base_url: &str) -> FetchConfig {
        FetchConfig {
            base_url: base_url.to_string(),
            rate_limit_ms: self.rate_limit_ms,
            max_retries: self.max_retries,
            retry_backoff_ms: self.retry_backoff_ms,
            timeout_secs: self.timeout_secs,
        }
    }

    fn service(&self) -> Result<Service, Box<dyn std::error::Error>> {
        let cache = self
            .block_cache
            .as_ref()
            .map(BlockTimeCache::open)
            .transpose()?;
        let indexer = IndexerClient::new(self.fetch_config(&self.indexer_url))?;
        let blocks = RpcBlockTimes::new(self.fetch_config(&self.rpc_url), cache)?;
        info!(indexer = %self.indexer_url, rpc = %self.rpc_url, "clients ready");
        Ok(ActivityService::new(indexer, blocks))
    }
}

fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let service = Arc::new(args.client.service()?);
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(async {
        let listener = tokio::net::TcpListener::bind(&args.listen).await?;
        info!(addr = %listener.local_addr()?, path = MARKET_ACTIVITY_PATH, "serving");
        axum::serve(listener, router(service)).await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn run_activity(args: ActivityArgs) -> Result<(), Box<dyn std::error::Error>> {
    let service = args.client.service()?;
    let rt = tokio::runtime::Runtime::new()?;
    let activity = rt.block_on(service.market_activity(&args.market_id))?;
    info!(
        market_id = %args.market_id,
        count = activity.len(),
        requests = service.source().request_count(),
        "activity complete"
    );
    println!("{}", serde_json::to_string_pretty(&activity)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_defaults() {
        let cli = Cli::try_parse_from(["gnolend-activity", "activity", "--market-id", "m1"]).unwrap();
        let Command::Activity(args) = cli.command else {
            panic!("expected activity");
        };
        assert_eq!(args.market_id, "m1");
        assert_eq!(args.client.indexer_url, DEFAULT_INDEXER_URL);
        assert_eq!(args.client.rpc_url, DEFAULT_RPC_URL);
        assert!(args.client.block_cache.is_none());
        let c = args.client.fetch_config(&args.client.rpc_url);
        assert_eq!(c.max_retries, MAX_RETRIES);
    }

    #[test]
    fn serve_overrides() {
        let cli = Cli::try_parse_from([
            "gnolend-activity",
            "serve",
            "--listen",
            "127.0.0.1:9000",
            "--indexer-url",
            "https://indexer.test6.testnets.gno.land",
            "--max-retries",
            "0",
        ])
        .unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.listen, "127.0.0.1:9000");
        assert_eq!(args.client.max_retries, 0);
        assert!(args.client.service().is_ok());
    }

    #[test]
    fn market_id_is_required() {
        assert!(Cli::try_parse_from(["gnolend-activity", "activity"]).is_err());
    }
}
