use huddle_core::{MemberId, RoomId};
use huddle_server::RegistryError;
use uuid::Uuid;

use crate::integration::{create_test_registry, init_tracing};

#[tokio::test]
async fn test_empty_room_id_is_rejected_without_side_effects() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();
    let a = signaling.connect().await;

    let result = registry.join(a, RoomId::from("   ")).await;

    assert!(matches!(result, Err(RegistryError::EmptyRoomId)));
    assert_eq!(registry.room_count().await.unwrap(), 0);
    assert_eq!(signaling.total().await, 0);
}

#[tokio::test]
async fn test_nil_member_id_is_rejected() {
    init_tracing();

    let (registry, signaling, _rx) = create_test_registry();

    let result = registry
        .join(MemberId(Uuid::nil()), RoomId::from("lobby"))
        .await;

    assert!(matches!(result, Err(RegistryError::MissingMemberId)));
    assert_eq!(registry.room_count().await.unwrap(), 0);
    assert_eq!(signaling.total().await, 0);
}
