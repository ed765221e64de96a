use crate::signaling::SignalingSink;
use anyhow::Context;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use huddle_core::{ClientSignal, ServerSignal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// WebSocket connection to the signaling server.
///
/// Inbound frames are decoded into [`ServerSignal`]s on a reader task; the
/// receiver returned by [`WsSignaling::connect`] ends when the socket closes.
pub struct WsSignaling {
    outgoing: mpsc::UnboundedSender<ClientSignal>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl WsSignaling {
    pub async fn connect(
        url: &str,
    ) -> anyhow::Result<(Self, mpsc::UnboundedReceiver<ServerSignal>)> {
        let (socket, _) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;
        info!("Connected to signaling server at {}", url);

        let (mut sink, mut stream) = socket.split();
        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel::<ClientSignal>();
        let (incoming_tx, incoming) = mpsc::unbounded_channel();

        let writer = tokio::spawn(async move {
            while let Some(signal) = outgoing_rx.recv().await {
                let json = match serde_json::to_string(&signal) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!("Failed to serialize client signal: {}", e);
                        continue;
                    }
                };
                if sink.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let reader = tokio::spawn(async move {
            while let Some(Ok(msg)) = stream.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ServerSignal>(&text) {
                        Ok(signal) => {
                            if incoming_tx.send(signal).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid server signal: {}", e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            debug!("Signaling socket closed");
        });

        Ok((
            Self {
                outgoing,
                reader,
                writer,
            },
            incoming,
        ))
    }

    /// Drops the connection without flushing queued frames.
    pub fn close(&self) {
        self.reader.abort();
        self.writer.abort();
    }
}

impl Drop for WsSignaling {
    // The writer exits on its own once `outgoing` is dropped, after flushing.
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait]
impl SignalingSink for WsSignaling {
    async fn send(&self, signal: ClientSignal) -> anyhow::Result<()> {
        self.outgoing
            .send(signal)
            .map_err(|_| anyhow::anyhow!("signaling connection closed"))
    }
}
