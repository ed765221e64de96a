use crate::render;
use anyhow::{Context, Result};
use huddle::RoomId;
use huddle::client::{Coordinator, CoordinatorConfig, RtcConfig, RtcConnector, WsSignaling};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

const RECONNECT_DELAY: Duration = Duration::from_secs(2);

pub struct JoinOptions {
    pub url: String,
    pub room: Option<String>,
    pub reconnect: u32,
    pub rtc: RtcConfig,
}

enum SessionEnd {
    Quit,
    Disconnected,
}

pub async fn run(options: JoinOptions) -> Result<()> {
    let room = match options.room {
        Some(room) => room,
        None => tokio::task::spawn_blocking(prompt_room).await??,
    };
    let room = RoomId::from(room);
    if room.is_empty() {
        anyhow::bail!("room name cannot be empty");
    }

    let mut lines = spawn_stdin_reader();
    let mut attempts = 0;

    loop {
        match chat_session(&options.url, &room, &options.rtc, &mut lines).await {
            Ok(SessionEnd::Quit) => return Ok(()),
            Ok(SessionEnd::Disconnected) => {
                attempts = 0;
                render::system("Connection to the signaling server was lost.");
            }
            Err(e) => render::error(&format!("{:#}", e)),
        }

        attempts += 1;
        if attempts > options.reconnect {
            anyhow::bail!("giving up after {} reconnect attempt(s)", options.reconnect);
        }
        render::system(&format!(
            "Reconnecting ({}/{})...",
            attempts, options.reconnect
        ));
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

async fn chat_session(
    url: &str,
    room: &RoomId,
    rtc: &RtcConfig,
    lines: &mut mpsc::UnboundedReceiver<String>,
) -> Result<SessionEnd> {
    let (signaling, mut incoming) = WsSignaling::connect(url).await?;
    let (message_tx, mut messages) = mpsc::unbounded_channel();

    let coordinator = Coordinator::new(
        Arc::new(RtcConnector::new(rtc.clone())),
        Arc::new(signaling),
        Arc::new(message_tx),
        CoordinatorConfig::default(),
    );

    let welcome = incoming
        .recv()
        .await
        .context("server closed the connection before welcome")?;
    coordinator.handle_signal(welcome).await?;
    let local_id = coordinator
        .local_id()
        .context("server did not send a welcome frame")?;

    coordinator.join_room(room.clone()).await?;
    render::banner(room.as_str(), &local_id);

    loop {
        tokio::select! {
            signal = incoming.recv() => match signal {
                Some(signal) => {
                    if let Err(e) = coordinator.handle_signal(signal).await {
                        warn!("Failed to apply server signal: {:#}", e);
                    }
                }
                None => {
                    coordinator.reset();
                    return Ok(SessionEnd::Disconnected);
                }
            },

            Some((from, message)) = messages.recv() => {
                render::peer_message(&from, &message);
            }

            line = lines.recv() => {
                let Some(line) = line else {
                    debug!("stdin closed");
                    coordinator.leave_room().await?;
                    return Ok(SessionEnd::Quit);
                };

                match line.trim() {
                    "" => {}
                    "/quit" => {
                        coordinator.leave_room().await?;
                        return Ok(SessionEnd::Quit);
                    }
                    "/peers" => render::peers(&coordinator.peers()),
                    text => {
                        render::own_message(text);
                        if !coordinator.broadcast_message(text).await {
                            render::local_only();
                        }
                    }
                }
            }
        }
    }
}

fn prompt_room() -> Result<String> {
    let room = dialoguer::Input::<String>::new()
        .with_prompt("Room")
        .interact_text()
        .context("failed to read room name")?;
    Ok(room)
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
