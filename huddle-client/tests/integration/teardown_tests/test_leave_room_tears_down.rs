use huddle_client::NegotiationState;
use huddle_core::RoomId;

use crate::integration::{LINK_TIMEOUT_MS, init_tracing, link_timeout, wait_until};
use crate::utils::{Hub, MemoryNetwork};

#[tokio::test]
async fn test_leave_room_closes_links_on_both_sides() {
    init_tracing();

    let hub = Hub::new();
    let network = MemoryNetwork::new();
    let room = RoomId::from("r1");
    let a = hub.connect(|id| network.connector(id)).await;
    let b = hub.connect(|id| network.connector(id)).await;

    a.coordinator.join_room(room.clone()).await.unwrap();
    assert!(hub.wait_for_members(&room, 1).await);
    b.coordinator.join_room(room.clone()).await.unwrap();
    assert!(
        b.coordinator
            .wait_for_state(&a.id, NegotiationState::ChannelOpen, link_timeout())
            .await
    );

    b.coordinator.leave_room().await.unwrap();

    assert!(b.coordinator.peers().is_empty());
    assert!(b.coordinator.current_room().is_none());
    assert!(wait_until(LINK_TIMEOUT_MS, || a.coordinator.link_state(&b.id).is_none()).await);
    assert!(hub.wait_for_members(&room, 1).await);

    // Leaving again is harmless.
    b.coordinator.leave_room().await.unwrap();
}

#[tokio::test]
async fn test_switching_rooms_drops_old_links() {
    init_tracing();

    let hub = Hub::new();
    let network = MemoryNetwork::new();
    let red = RoomId::from("red");
    let blue = RoomId::from("blue");
    let a = hub.connect(|id| network.connector(id)).await;
    let b = hub.connect(|id| network.connector(id)).await;
    let c = hub.connect(|id| network.connector(id)).await;

    a.coordinator.join_room(red.clone()).await.unwrap();
    assert!(hub.wait_for_members(&red, 1).await);
    b.coordinator.join_room(red.clone()).await.unwrap();
    c.coordinator.join_room(blue.clone()).await.unwrap();
    assert!(
        b.coordinator
            .wait_for_state(&a.id, NegotiationState::ChannelOpen, link_timeout())
            .await
    );
    assert!(hub.wait_for_members(&blue, 1).await);

    b.coordinator.join_room(blue.clone()).await.unwrap();

    assert!(
        b.coordinator
            .wait_for_state(&c.id, NegotiationState::ChannelOpen, link_timeout())
            .await
    );
    assert!(b.coordinator.link_state(&a.id).is_none());
    assert!(wait_until(LINK_TIMEOUT_MS, || a.coordinator.link_state(&b.id).is_none()).await);
}
