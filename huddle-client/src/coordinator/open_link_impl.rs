use crate::Coordinator;
use crate::error::CoordinatorError;
use crate::link::{LinkStep, PeerLink, Role};
use huddle_core::MemberId;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

impl Coordinator {
    /// Creates the link to `remote`, replacing a closed one. An existing live link is kept.
    ///
    /// Early candidates buffered for `remote` are handed to the new link, which
    /// holds them until a remote description is applied.
    pub(crate) async fn open_link(&self, remote: MemberId, role: Role) -> Result<bool, CoordinatorError> {
        if let Some(link) = self.inner.links.get(&remote) {
            if !link.state().is_closed() {
                return Ok(false);
            }
        }
        self.close_link(&remote);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let session = self
            .inner
            .connector
            .connect(remote, events_tx)
            .await
            .map_err(|source| CoordinatorError::Connect { remote, source })?;

        info!("Opened link to {} as {:?}", remote, role);
        let link = PeerLink::spawn(remote, role, session, events_rx, self.inner.ctx.clone());

        let buffered = self.take_buffered(&remote);
        if !buffered.is_empty() {
            debug!("Replaying {} early candidate(s) from {}", buffered.len(), remote);
        }
        for candidate in buffered {
            link.push(LinkStep::AddCandidate(candidate));
        }

        self.inner.links.insert(remote, link);
        Ok(true)
    }

    pub(crate) fn push_step(&self, remote: &MemberId, step: LinkStep) -> bool {
        match self.inner.links.get(remote) {
            Some(link) if !link.state().is_closed() => link.push(step),
            _ => false,
        }
    }

    pub(crate) fn close_link(&self, remote: &MemberId) {
        if let Some((_, link)) = self.inner.links.remove(remote) {
            debug!("Closing link to {}", remote);
            link.close();
        }
    }

    pub(crate) fn teardown(&self) {
        let remotes: Vec<MemberId> = self.inner.links.iter().map(|entry| *entry.key()).collect();
        for remote in remotes {
            self.close_link(&remote);
        }
        self.inner.early_candidates.clear();
    }

    pub(crate) fn buffer_candidate(&self, remote: MemberId, candidate: Value) {
        let limit = self.inner.config.early_candidate_limit;
        let mut buffered = self.inner.early_candidates.entry(remote).or_default();
        if buffered.len() >= limit {
            warn!("Early candidate buffer for {} is full, dropping candidate", remote);
            return;
        }
        debug!("Buffering early ICE candidate from {}", remote);
        buffered.push(candidate);
    }

    pub(crate) fn take_buffered(&self, remote: &MemberId) -> Vec<Value> {
        self.inner
            .early_candidates
            .remove(remote)
            .map(|(_, candidates)| candidates)
            .unwrap_or_default()
    }
}
