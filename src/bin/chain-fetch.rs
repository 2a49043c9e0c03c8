use std::time::Duration;

use chain_relay::loadgen::{secret_of, Stats};
use clap::Parser;
use url::Url;

#[derive(Parser)]
#[command(name = "chain-fetch")]
#[command(about = "Hammer a relay chain and tally which secret answers", long_about = None)]
struct Cli {
    /// Chain URL, e.g. localhost:8080/svc-b/svc-c
    url: String,

    /// Print a snapshot every N requests
    #[arg(short, long, default_value_t = 50)]
    every: u64,

    /// Stop after this many requests
    #[arg(short, long)]
    limit: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,
}

fn normalize(raw: &str) -> Result<Url, url::ParseError> {
    if raw.starts_with("http") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("http://{raw}"))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let url = normalize(&cli.url)?;
    let every = cli.every.max(1);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .build()?;

    let mut stats = Stats::new();
    let run = async {
        loop {
            if cli.limit.is_some_and(|limit| stats.total() >= limit) {
                break;
            }
            let (status, secret) = match client
                .get(url.clone())
                .header("X-Chain-Fmt", "json")
                .send()
                .await
            {
                Ok(res) => {
                    let status = res.status().as_u16();
                    let body = res.bytes().await.unwrap_or_default();
                    (status, secret_of(&body))
                }
                Err(e) => {
                    eprintln!("Request failed: {e}");
                    (0, secret_of(b""))
                }
            };
            stats.record(status, &secret);
            if stats.total() % every == 0 {
                // Clear the terminal before each snapshot.
                print!("\x1B[2J\x1B[H");
                println!("{}", stats.checkpoint());
            }
        }
    };

    tokio::select! {
        _ = run => {}
        _ = tokio::signal::ctrl_c() => {}
    }

    println!("{}", stats.checkpoint());
    Ok(())
}
