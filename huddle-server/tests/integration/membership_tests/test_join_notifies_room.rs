use huddle_core::{RoomId, ServerSignal};

use crate::integration::{create_test_registry, init_tracing};

#[tokio::test]
async fn test_first_member_gets_empty_snapshot() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();
    let alice = signaling.connect().await;

    let existing = registry.join(alice, RoomId::from("lobby")).await.unwrap();

    assert!(existing.is_empty());
    assert_eq!(
        signaling.signals_for(&alice).await,
        vec![ServerSignal::UsersInRoom(vec![])]
    );
    assert_eq!(registry.room_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_third_member_sees_both_and_both_see_them() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();
    let room = RoomId::from("lobby");
    let a = signaling.connect().await;
    let b = signaling.connect().await;
    let c = signaling.connect().await;

    registry.join(a, room.clone()).await.unwrap();
    registry.join(b, room.clone()).await.unwrap();
    let existing = registry.join(c, room.clone()).await.unwrap();

    assert_eq!(existing.len(), 2);
    assert!(existing.contains(&a) && existing.contains(&b));
    assert!(!existing.contains(&c), "snapshot never contains the joiner");

    assert_eq!(signaling.joined_seen_by(&a).await, vec![b, c]);
    assert_eq!(signaling.joined_seen_by(&b).await, vec![c]);
    assert!(signaling.joined_seen_by(&c).await.is_empty());

    let members = registry.members(room).await.unwrap();
    assert_eq!(members.len(), 3);
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();
    let a = signaling.connect().await;
    let b = signaling.connect().await;

    registry.join(a, RoomId::from("red")).await.unwrap();
    let existing = registry.join(b, RoomId::from("blue")).await.unwrap();

    assert!(existing.is_empty());
    assert!(signaling.joined_seen_by(&a).await.is_empty());
    assert_eq!(registry.room_count().await.unwrap(), 2);
}
