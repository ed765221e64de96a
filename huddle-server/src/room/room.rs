use huddle_core::{MemberId, RoomId};
use std::collections::HashMap;

/// One room and its members, kept in join order.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    members: Vec<MemberId>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn contains(&self, member_id: &MemberId) -> bool {
        self.members.contains(member_id)
    }

    /// Returns `false` if the member was already present.
    fn insert(&mut self, member_id: MemberId) -> bool {
        if self.contains(&member_id) {
            return false;
        }
        self.members.push(member_id);
        true
    }

    fn remove(&mut self, member_id: &MemberId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != member_id);
        before != self.members.len()
    }

    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    pub fn others(&self, member_id: &MemberId) -> Vec<MemberId> {
        self.members
            .iter()
            .filter(|m| *m != member_id)
            .copied()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// Members of the room other than the joiner.
    pub existing: Vec<MemberId>,
    /// `false` when the member was already in this room.
    pub newly_joined: bool,
    /// Set when the join moved the member out of a different room.
    pub left: Option<LeaveOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    pub remaining: Vec<MemberId>,
    pub room_closed: bool,
}

/// Room membership state. Owned by the registry worker and never shared.
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: HashMap<RoomId, Room>,
    memberships: HashMap<MemberId, RoomId>,
}

impl RoomTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, member_id: MemberId, room_id: RoomId) -> JoinOutcome {
        let moving = self
            .memberships
            .get(&member_id)
            .is_some_and(|current| *current != room_id);
        let left = if moving { self.leave(&member_id) } else { None };

        let room = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone()));
        let newly_joined = room.insert(member_id);
        let existing = room.others(&member_id);
        self.memberships.insert(member_id, room_id);

        JoinOutcome {
            existing,
            newly_joined,
            left,
        }
    }

    /// Removes the member from its room. `None` for unknown members.
    pub fn leave(&mut self, member_id: &MemberId) -> Option<LeaveOutcome> {
        let room_id = self.memberships.remove(member_id)?;
        let room = self.rooms.get_mut(&room_id)?;
        room.remove(member_id);

        let remaining = room.members().to_vec();
        let room_closed = room.is_empty();
        if room_closed {
            self.rooms.remove(&room_id);
        }

        Some(LeaveOutcome {
            room_id,
            remaining,
            room_closed,
        })
    }

    pub fn members(&self, room_id: &RoomId) -> Vec<MemberId> {
        self.rooms
            .get(room_id)
            .map(|room| room.members().to_vec())
            .unwrap_or_default()
    }

    pub fn room_of(&self, member_id: &MemberId) -> Option<&RoomId> {
        self.memberships.get(member_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
