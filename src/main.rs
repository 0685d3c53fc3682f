//! CLI for meshchat
//!
//! Starts one relay node: binds the peer listener, optionally dials an
//! initial peer, then reads commands from stdin:
//!
//! - `/subscribe <topic>` / `/unsubscribe <topic>`: change and persist the
//!   node's topic subscriptions
//! - `/topic <topic> <text>`: broadcast a topic-scoped chat message
//! - `/exit`: quit
//! - any other non-empty line: broadcast it as plain chat

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use meshchat::config::load_config;
use meshchat::persistence::{MessageStore, SledStore};
use meshchat::protocol::Message;
use meshchat::relay::Relay;
use meshchat::utils::logging;

#[derive(Parser)]
#[command(name = "meshchat")]
struct Args {
    /// Port to listen on for peer links (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Peer to dial at startup (host:port)
    #[arg(long)]
    connect: Option<String>,

    /// Display name for this node (overrides config)
    #[arg(long)]
    name: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(&args.log_level);

    if let Err(e) = run(args).await {
        error!("node failed to start: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(name) = args.name {
        config.node.name = name;
    }

    let store: Arc<dyn MessageStore> = Arc::new(SledStore::open(&config.storage.path)?);
    let relay = Relay::new(&config.node.name, Arc::clone(&store));

    // Restore the topics this node was subscribed to before the restart.
    match store.subscriptions(&config.node.name) {
        Ok(topics) => {
            for topic in topics {
                relay.subscribe(&topic);
            }
        }
        Err(e) => error!("failed to load subscriptions: {e}"),
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    relay.listen(&addr).await?;
    if let Some(remote) = &args.connect {
        relay.connect(remote).await?;
    }

    info!("type a message, or /subscribe <topic>, /unsubscribe <topic>, /topic <topic> <text>, /exit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                let line = line.trim();
                if line == "/exit" {
                    info!("goodbye {}", relay.name());
                    break;
                }
                handle_command(&relay, store.as_ref(), &config.node.name, line);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received, exiting");
                break;
            }
        }
    }
    Ok(())
}

fn handle_command(relay: &Relay, store: &dyn MessageStore, user: &str, line: &str) {
    if line.is_empty() {
        return;
    }
    if let Some(topic) = line.strip_prefix("/subscribe ") {
        relay.subscribe(topic);
        if let Err(e) = store.save_subscription(user, topic) {
            error!("failed to persist subscription: {e}");
        }
        info!("subscribed to {topic}");
    } else if let Some(topic) = line.strip_prefix("/unsubscribe ") {
        relay.unsubscribe(topic);
        if let Err(e) = store.remove_subscription(user, topic) {
            error!("failed to remove subscription: {e}");
        }
        info!("unsubscribed from {topic}");
    } else if let Some(rest) = line.strip_prefix("/topic ") {
        match rest.split_once(' ') {
            Some((topic, text)) => {
                let mut msg = Message::chat("", text);
                msg.topic = topic.to_string();
                relay.broadcast(msg);
            }
            None => info!("usage: /topic <topic> <text>"),
        }
    } else {
        relay.broadcast_text(line);
    }
}
