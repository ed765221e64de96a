use crate::config::RtcConfig;
use crate::peer::{PeerConnector, PeerSession, SessionEvent};
use anyhow::{Context, Result};
use async_trait::async_trait;
use huddle_core::MemberId;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// [`PeerConnector`] backed by webrtc-rs.
pub struct RtcConnector {
    config: RtcConfig,
}

impl RtcConnector {
    pub fn new(config: RtcConfig) -> Self {
        Self { config }
    }

    fn ice_servers(&self) -> Vec<RTCIceServer> {
        self.config
            .ice_servers
            .iter()
            .map(|server| RTCIceServer {
                urls: server.urls.clone(),
                username: server.username.clone().unwrap_or_default(),
                credential: server.credential.clone().unwrap_or_default(),
                ..Default::default()
            })
            .collect()
    }
}

impl Default for RtcConnector {
    fn default() -> Self {
        Self::new(RtcConfig::default())
    }
}

#[async_trait]
impl PeerConnector for RtcConnector {
    async fn connect(
        &self,
        remote: MemberId,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Result<Arc<dyn PeerSession>> {
        // Data channels only, but webrtc-rs still expects a populated media engine.
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: self.ice_servers(),
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let session = RtcSession {
            remote,
            peer_connection,
            data_channel: Arc::new(Mutex::new(None)),
            events,
        };
        session.install_callbacks();

        Ok(Arc::new(session))
    }
}

pub struct RtcSession {
    remote: MemberId,
    peer_connection: Arc<RTCPeerConnection>,
    data_channel: Arc<Mutex<Option<Arc<RTCDataChannel>>>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl RtcSession {
    fn install_callbacks(&self) {
        let state_tx = self.events.clone();
        let remote = self.remote;
        self.peer_connection
            .on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    debug!("Peer connection state for {}: {:?}", remote, s);
                    if s == RTCPeerConnectionState::Failed {
                        let _ = tx.send(SessionEvent::ConnectionFailed);
                    }
                })
            }));

        let ice_tx = self.events.clone();
        self.peer_connection
            .on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
                let tx = ice_tx.clone();
                Box::pin(async move {
                    let Some(candidate) = c else { return };
                    let Ok(init) = candidate.to_json() else {
                        return;
                    };
                    match serde_json::to_value(&init) {
                        Ok(value) => {
                            let _ = tx.send(SessionEvent::LocalCandidate(value));
                        }
                        Err(e) => warn!("Failed to encode local ICE candidate: {}", e),
                    }
                })
            }));

        let dc_tx = self.events.clone();
        let dc_slot = Arc::clone(&self.data_channel);
        self.peer_connection
            .on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
                let tx = dc_tx.clone();
                let slot = Arc::clone(&dc_slot);
                Box::pin(async move {
                    info!("Remote opened data channel '{}' from {}", dc.label(), remote);
                    // Stored before wiring so ChannelOpen never precedes a usable channel.
                    *slot.lock().await = Some(Arc::clone(&dc));
                    wire_channel(&dc, tx.clone());
                    // on_open may already have fired before the handler was attached.
                    if dc.ready_state() == RTCDataChannelState::Open {
                        let _ = tx.send(SessionEvent::ChannelOpen);
                    }
                })
            }));
    }

    async fn set_local(&self, description: RTCSessionDescription) -> Result<Value> {
        self.peer_connection
            .set_local_description(description.clone())
            .await
            .context("Failed to set local description")?;
        Ok(serde_json::to_value(&description)?)
    }
}

fn wire_channel(dc: &Arc<RTCDataChannel>, events: mpsc::UnboundedSender<SessionEvent>) {
    let open_tx = events.clone();
    dc.on_open(Box::new(move || {
        Box::pin(async move {
            let _ = open_tx.send(SessionEvent::ChannelOpen);
        })
    }));

    let msg_tx = events.clone();
    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let tx = msg_tx.clone();
        Box::pin(async move {
            let _ = tx.send(SessionEvent::ChannelMessage(msg.data));
        })
    }));

    dc.on_close(Box::new(move || {
        let tx = events.clone();
        Box::pin(async move {
            let _ = tx.send(SessionEvent::ChannelClosed);
        })
    }));
}

#[async_trait]
impl PeerSession for RtcSession {
    async fn create_data_channel(&self, label: &str) -> Result<()> {
        let init = RTCDataChannelInit {
            ordered: Some(true),
            ..Default::default()
        };
        let dc = self
            .peer_connection
            .create_data_channel(label, Some(init))
            .await
            .context("Failed to create data channel")?;

        *self.data_channel.lock().await = Some(Arc::clone(&dc));
        wire_channel(&dc, self.events.clone());
        Ok(())
    }

    async fn create_offer(&self) -> Result<Value> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.set_local(offer).await
    }

    async fn create_answer(&self) -> Result<Value> {
        let answer = self.peer_connection.create_answer(None).await?;
        self.set_local(answer).await
    }

    async fn set_remote_description(&self, description: Value) -> Result<()> {
        let description: RTCSessionDescription =
            serde_json::from_value(description).context("Failed to parse session description")?;
        self.peer_connection
            .set_remote_description(description)
            .await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: Value) -> Result<()> {
        let candidate: RTCIceCandidateInit =
            serde_json::from_value(candidate).context("Failed to parse ICE candidate JSON")?;
        self.peer_connection.add_ice_candidate(candidate).await?;
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        let Some(dc) = self.data_channel.lock().await.clone() else {
            anyhow::bail!("No data channel for {}", self.remote);
        };
        dc.send_text(text.to_owned()).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}
