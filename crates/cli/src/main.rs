use bucketwire_application::ports::{empty_body, RoundTrip};
use bucketwire_infrastructure::FanoutTransport;
use clap::Parser;
use http::Request;
use http_body_util::BodyExt;
use tracing::{error, info};

mod bootstrap;

#[derive(Parser)]
#[command(name = "bucketwire")]
#[command(version)]
#[command(about = "Fetch URLs through per-host connection pools spread across every resolved IP")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// GET requests issued per URL
    #[arg(short = 'n', long, default_value_t = 1)]
    requests: usize,

    #[arg(required = true, value_name = "URL")]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.log_level.as_deref())?;
    bootstrap::init_logging(&config.logging);
    bootstrap::log_config(&config);

    let transport = FanoutTransport::builder()
        .config(config.transport.clone())
        .build()?;

    let mut failed = 0usize;
    for url in &cli.urls {
        for _ in 0..cli.requests {
            let request = Request::get(url.as_str()).body(empty_body())?;
            match transport.round_trip(request).await {
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .into_body()
                        .collect()
                        .await
                        .map_err(|e| anyhow::anyhow!(e))?
                        .to_bytes();
                    println!("{} {} {}", status.as_u16(), body.len(), url);
                }
                Err(e) => {
                    error!(url = %url, error = %e, "Request failed");
                    failed += 1;
                }
            }
        }
    }

    info!(
        cached_hosts = transport.cached_hosts(),
        pooled_hosts = transport.pooled_hosts(),
        failed,
        "Done"
    );
    transport.shutdown();

    if failed > 0 {
        anyhow::bail!("{failed} request(s) failed");
    }
    Ok(())
}
