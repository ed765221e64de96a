use huddle_client::{NegotiationState, PeerConnector, RtcConfig, RtcConnector, SessionEvent};
use huddle_core::{MemberId, RoomId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::integration::init_tracing;
use crate::utils::Hub;

/// Timeout for real ICE + DTLS + SCTP setup over loopback (ms).
const RTC_TIMEOUT_MS: u64 = 20000;

fn loopback_connector(_: MemberId) -> Arc<dyn PeerConnector> {
    Arc::new(RtcConnector::new(RtcConfig::loopback()))
}

#[tokio::test]
async fn test_real_peer_connections_exchange_message() {
    init_tracing();

    let hub = Hub::new();
    let room = RoomId::from("loopback");
    let a = hub.connect(loopback_connector).await;
    let mut b = hub.connect(loopback_connector).await;

    a.coordinator.join_room(room.clone()).await.unwrap();
    assert!(hub.wait_for_members(&room, 1).await);
    b.coordinator.join_room(room).await.unwrap();

    let timeout = Duration::from_millis(RTC_TIMEOUT_MS);
    assert!(
        b.coordinator
            .wait_for_state(&a.id, NegotiationState::ChannelOpen, timeout)
            .await,
        "initiator channel did not open"
    );
    assert!(
        a.coordinator
            .wait_for_state(&b.id, NegotiationState::ChannelOpen, timeout)
            .await,
        "responder channel did not open"
    );

    assert!(a.coordinator.broadcast_message("hi").await);
    let (from, message) = b.next_message(5000).await.expect("B received nothing");
    assert_eq!(from, a.id);
    assert_eq!(message.content, "hi");
    assert_eq!(message.sender, a.id);

    a.coordinator.leave_room().await.unwrap();
    b.coordinator.leave_room().await.unwrap();
}

#[tokio::test]
async fn test_answering_session_can_send_once_channel_opens() {
    init_tracing();

    let connector = RtcConnector::new(RtcConfig::loopback());
    let (a_tx, mut a_rx) = mpsc::unbounded_channel();
    let (b_tx, mut b_rx) = mpsc::unbounded_channel();
    let a = connector.connect(MemberId::new(), a_tx).await.unwrap();
    let b = connector.connect(MemberId::new(), b_tx).await.unwrap();

    a.create_data_channel("messages").await.unwrap();
    let offer = a.create_offer().await.unwrap();
    b.set_remote_description(offer).await.unwrap();
    let answer = b.create_answer().await.unwrap();
    a.set_remote_description(answer).await.unwrap();

    let exchange = async {
        loop {
            tokio::select! {
                Some(event) = a_rx.recv() => match event {
                    SessionEvent::LocalCandidate(c) => b.add_ice_candidate(c).await.unwrap(),
                    SessionEvent::ChannelMessage(data) => return data,
                    _ => {}
                },
                Some(event) = b_rx.recv() => match event {
                    SessionEvent::LocalCandidate(c) => a.add_ice_candidate(c).await.unwrap(),
                    SessionEvent::ChannelOpen => b.send_text("ping").await.unwrap(),
                    _ => {}
                },
            }
        }
    };

    let data = tokio::time::timeout(Duration::from_millis(RTC_TIMEOUT_MS), exchange)
        .await
        .expect("no message over the answering side's channel");
    assert_eq!(&data[..], b"ping");

    a.close().await.unwrap();
    b.close().await.unwrap();
}
