use crate::Coordinator;
use crate::error::CoordinatorError;
use huddle_core::{ClientSignal, RoomId};
use tracing::info;

impl Coordinator {
    /// Asks the server to put us in `room`.
    ///
    /// Links belonging to a previous room are torn down first: the server moves
    /// us out of it, but only the members left behind are told.
    pub async fn join_room(&self, room: RoomId) -> Result<(), CoordinatorError> {
        if room.is_empty() {
            return Err(CoordinatorError::EmptyRoomId);
        }

        let previous = self.current_room();
        if previous.as_ref().is_some_and(|current| *current != room) {
            self.teardown();
        }

        info!("Joining room '{}'", room);
        self.inner.room.send_replace(Some(room.clone()));
        self.inner
            .ctx
            .sink
            .send(ClientSignal::JoinRoom(room))
            .await
            .map_err(CoordinatorError::Signaling)
    }

    /// Leaves the current room and closes every link.
    pub async fn leave_room(&self) -> Result<(), CoordinatorError> {
        let Some(room) = self.inner.room.send_replace(None) else {
            self.teardown();
            return Ok(());
        };

        info!("Leaving room '{}'", room);
        self.teardown();
        self.inner
            .ctx
            .sink
            .send(ClientSignal::LeaveRoom)
            .await
            .map_err(CoordinatorError::Signaling)
    }

    /// Forgets everything tied to the signaling connection after it dropped.
    ///
    /// The server has already treated the disconnect as a leave, so nothing is sent.
    pub fn reset(&self) {
        info!("Signaling connection lost, dropping {} link(s)", self.inner.links.len());
        self.teardown();
        self.inner.room.send_replace(None);
        self.inner.local_id.send_replace(None);
    }
}
