use huddle_core::{ClientSignal, RoomId};

use crate::integration::{create_test_registry, init_tracing};

#[tokio::test]
async fn test_user_left_is_sent_at_most_once() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();
    let room = RoomId::from("lobby");
    let a = signaling.connect().await;
    let b = signaling.connect().await;
    registry.join(a, room.clone()).await.unwrap();
    registry.join(b, room.clone()).await.unwrap();

    // Explicit leave followed by the socket closing.
    registry
        .handle_signal(b, ClientSignal::LeaveRoom)
        .await
        .unwrap();
    let second = registry.leave(b).await.unwrap();

    assert!(!second);
    assert_eq!(signaling.left_seen_by(&a).await, vec![b]);
    assert_eq!(registry.members(room).await.unwrap(), vec![a]);
}

#[tokio::test]
async fn test_leave_without_room_is_a_no_op() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();
    let a = signaling.connect().await;

    assert!(!registry.leave(a).await.unwrap());
    assert_eq!(signaling.total().await, 0);
}
