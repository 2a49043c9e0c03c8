//! Chain relay service.
//!
//! ```text
//!   user ──▶ svc-a ──▶ svc-b ──▶ svc-c
//!             │ X-Svc-Log: [a(200), b(…)]
//!             │          X-Svc-Log: [a(200), b(200), c(…)]
//!             ◀────────── {"service_secret": "c", "service_log": [...]}
//! ```
//!
//! The request path lists the hops still to visit. Each instance forwards
//! to the next one, carrying the hop log in a header, and the last one
//! answers with its secret. The instance the user called renders the chain
//! as a diagram unless JSON is requested.

use std::path::PathBuf;

use chain_relay::config::load_config;
use chain_relay::lifecycle::startup;
use clap::Parser;

#[derive(Parser)]
#[command(name = "chain-relay")]
#[command(about = "Self-chaining HTTP relay", long_about = None)]
struct Args {
    /// Optional TOML config file; FC_SVC_* environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    startup::run(config).await
}
