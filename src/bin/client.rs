//! Terminal playback client with unique user ID and reconnection support.
//!
//! Connects to the session coordinator, sends invitations and playback
//! commands, and keeps a simulated local transport in sync with the host.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval). Duplicate user_id connections are rejected by the server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client -- --user-id alice
//! cargo run --bin client -- -u bob
//! ```

use clap::Parser;

use duet::common::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Collaborative playback client with a unique user ID", long_about = None)]
struct Args {
    /// User ID identifying this participant (must be unique)
    #[arg(short = 'u', long)]
    user_id: String,

    /// WebSocket server URL
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = duet::client::run_client(args.url, args.user_id).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
