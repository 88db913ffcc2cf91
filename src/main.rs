use anyhow::Result;
use chspeedscope::clickhouse::ClickHouseClient;
use chspeedscope::config::{ClickHouseConfig, ProxyConfig};
use chspeedscope::{server, speedscope};
use clap::Parser;
use std::sync::Arc;
use tracing::debug;

/// Speedscope flame-graph proxy for ClickHouse query profiles
#[derive(Parser)]
#[command(name = "chspeedscope")]
#[command(about = "Serve ClickHouse trace_log samples as speedscope-ready collapsed stacks", long_about = None)]
struct Cli {
    /// ClickHouse host
    #[arg(long, value_name = "CLICKHOUSE_HOST", default_value = "localhost")]
    ch_host: String,

    /// ClickHouse HTTP port
    #[arg(long, value_name = "CLICKHOUSE_PORT", default_value = "8123")]
    ch_port: u16,

    /// Host for proxy endpoints
    #[arg(long, value_name = "PROXY_HOST", default_value = "localhost")]
    proxy_host: String,

    /// Proxy port
    #[arg(long, value_name = "PROXY_PORT", default_value = "8080")]
    proxy_port: u16,

    /// Print the speedscope URL for this query id and exit
    #[arg(long, value_name = "QUERY_ID")]
    query_id: Option<String>,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .init();

    let proxy = ProxyConfig::new(cli.proxy_host, cli.proxy_port);

    if let Some(query_id) = cli.query_id {
        println!("{}", speedscope::speedscope_url(&proxy, &query_id));
        return Ok(());
    }

    let clickhouse = ClickHouseConfig::new(cli.ch_host, cli.ch_port);
    debug!(
        "Proxying {} from {}",
        clickhouse.url(),
        proxy.bind_addr()
    );

    let store = Arc::new(ClickHouseClient::new(&clickhouse)?);
    server::serve(&proxy, store).await?;

    Ok(())
}
