use huddle_core::{ClientSignal, RoomId, ServerSignal};
use serde_json::json;

use crate::integration::{create_test_registry, init_tracing};
use crate::utils::wait_for_signal;

#[tokio::test]
async fn test_offer_is_delivered_with_sender() {
    init_tracing();

    let (registry, signaling, mut signal_rx) = create_test_registry();
    let room = RoomId::from("lobby");
    let a = signaling.connect().await;
    let b = signaling.connect().await;
    registry.join(a, room.clone()).await.unwrap();
    registry.join(b, room).await.unwrap();

    let offer = json!({ "type": "offer", "sdp": "v=0 from b" });
    registry
        .handle_signal(
            b,
            ClientSignal::Offer {
                target: a,
                offer: offer.clone(),
            },
        )
        .await
        .unwrap();

    let sent = wait_for_signal(&mut signal_rx, |s| {
        matches!(s.signal, ServerSignal::Offer { .. })
    })
    .await
    .unwrap();

    assert_eq!(sent.to, a);
    assert_eq!(sent.signal, ServerSignal::Offer { offer, sender: b });
}

#[tokio::test]
async fn test_answer_and_candidate_keep_payload_opaque() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();
    let a = signaling.connect().await;
    let b = signaling.connect().await;

    let answer = json!({ "type": "answer", "sdp": "v=0", "extra": [1, 2, 3] });
    let candidate = json!({ "candidate": "candidate:1 1 udp 1 10.0.0.1 9 typ host", "sdpMid": "0", "sdpMLineIndex": 0 });

    registry
        .handle_signal(
            a,
            ClientSignal::Answer {
                target: b,
                answer: answer.clone(),
            },
        )
        .await
        .unwrap();
    registry
        .handle_signal(
            a,
            ClientSignal::IceCandidate {
                target: b,
                candidate: candidate.clone(),
            },
        )
        .await
        .unwrap();

    assert_eq!(
        signaling.signals_for(&b).await,
        vec![
            ServerSignal::Answer { answer, sender: a },
            ServerSignal::IceCandidate {
                candidate,
                sender: a
            },
        ]
    );
}

#[tokio::test]
async fn test_null_payload_is_rejected() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();
    let a = signaling.connect().await;
    let b = signaling.connect().await;

    let result = registry
        .handle_signal(
            a,
            ClientSignal::Offer {
                target: b,
                offer: serde_json::Value::Null,
            },
        )
        .await;

    assert!(result.is_err());
    assert_eq!(signaling.total().await, 0);
}
