use huddle_core::{RoomId, ServerSignal};

use crate::integration::{create_test_registry, init_tracing};

#[tokio::test]
async fn test_rejoin_same_room_does_not_duplicate() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();
    let room = RoomId::from("lobby");
    let a = signaling.connect().await;
    let b = signaling.connect().await;

    registry.join(a, room.clone()).await.unwrap();
    registry.join(b, room.clone()).await.unwrap();
    let again = registry.join(b, room.clone()).await.unwrap();

    assert_eq!(again, vec![a]);
    assert_eq!(registry.members(room).await.unwrap().len(), 2);
    assert_eq!(
        signaling.joined_seen_by(&a).await,
        vec![b],
        "a repeated join is not announced twice"
    );
    assert_eq!(signaling.snapshots_for(&b).await, vec![vec![a], vec![a]]);
}

#[tokio::test]
async fn test_joining_another_room_leaves_the_first() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();
    let a = signaling.connect().await;
    let b = signaling.connect().await;
    let c = signaling.connect().await;

    registry.join(a, RoomId::from("red")).await.unwrap();
    registry.join(b, RoomId::from("red")).await.unwrap();
    registry.join(c, RoomId::from("blue")).await.unwrap();

    let existing = registry.join(b, RoomId::from("blue")).await.unwrap();

    assert_eq!(existing, vec![c]);
    assert_eq!(signaling.left_seen_by(&a).await, vec![b]);
    assert_eq!(signaling.joined_seen_by(&c).await, vec![b]);
    assert_eq!(registry.members(RoomId::from("red")).await.unwrap(), vec![a]);

    let b_frames = signaling.signals_for(&b).await;
    assert_eq!(
        b_frames.last(),
        Some(&ServerSignal::UsersInRoom(vec![c]))
    );
}

#[tokio::test]
async fn test_switching_out_of_a_solo_room_closes_it() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();
    let a = signaling.connect().await;

    registry.join(a, RoomId::from("red")).await.unwrap();
    registry.join(a, RoomId::from("blue")).await.unwrap();

    assert_eq!(registry.room_count().await.unwrap(), 1);
    assert!(registry.members(RoomId::from("red")).await.unwrap().is_empty());
}
