mod chat;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use huddle::client::RtcConfig;
use huddle::server::{DEFAULT_PORT, ServerConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huddle", version, about = "Ad-hoc peer-to-peer chat rooms over WebRTC")]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling server.
    Serve {
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Directory with a browser client to serve next to the WebSocket endpoint.
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Join a room and chat from the terminal.
    Join {
        #[arg(long, env = "HUDDLE_URL", default_value = "ws://127.0.0.1:3000/ws")]
        url: String,

        /// Room to join. Prompted for when omitted.
        #[arg(short, long)]
        room: Option<String>,

        /// How many times to reconnect after the signaling connection drops.
        #[arg(long, default_value_t = 5)]
        reconnect: u32,

        /// Use host candidates only, without the public STUN servers.
        #[arg(long)]
        no_stun: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, static_dir } => {
            init_tracing(cli.log_level.as_deref().unwrap_or("info"));
            huddle::server::serve(ServerConfig { port, static_dir }).await
        }

        Commands::Join {
            url,
            room,
            reconnect,
            no_stun,
        } => {
            // Chat output shares the terminal, keep logs quiet by default.
            init_tracing(cli.log_level.as_deref().unwrap_or("warn"));
            let rtc = if no_stun {
                RtcConfig::loopback()
            } else {
                RtcConfig::default()
            };
            chat::run(chat::JoinOptions {
                url,
                room,
                reconnect,
                rtc,
            })
            .await
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
