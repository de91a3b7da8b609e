use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::domain::{
    RequestId, RequestStatus, Sponsorship, SponsorshipId, SponsorshipRequest, SponsorshipStatus,
};
use super::repository::{SponsorshipStore, StoreError};

/// The closed transition table for sponsorship requests. `Pending` is the
/// initial state; every other state is terminal.
pub const fn transition_permitted(from: RequestStatus, to: RequestStatus) -> bool {
    matches!(
        (from, to),
        (RequestStatus::Pending, RequestStatus::Matched)
            | (RequestStatus::Pending, RequestStatus::Expired)
            | (RequestStatus::Pending, RequestStatus::Cancelled)
    )
}

/// The transition table for committed sponsorships: `Active` is the only
/// state with outgoing edges, and nothing returns to `Active`.
pub const fn sponsorship_transition_permitted(
    from: SponsorshipStatus,
    to: SponsorshipStatus,
) -> bool {
    matches!(from, SponsorshipStatus::Active) && !matches!(to, SponsorshipStatus::Active)
}

/// Error raised by lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("sponsorship request not found")]
    NotFound,
    #[error("transition from {} to {} is not permitted", .from.label(), .to.label())]
    InvalidState {
        from: RequestStatus,
        to: RequestStatus,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the expired/cancelled edges of the request state machine. The matched
/// edge belongs to the allocator's commit step and is not reachable from here.
pub struct RequestLifecycle<S> {
    store: Arc<S>,
}

impl<S> RequestLifecycle<S>
where
    S: SponsorshipStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Cancel a pending request on requester or operator action.
    pub fn cancel(&self, id: &RequestId) -> Result<SponsorshipRequest, LifecycleError> {
        self.transition(id, RequestStatus::Cancelled)
    }

    /// Expire a pending request that outlived its TTL. Scheduling is the
    /// caller's concern; the guard here is the same as for any transition.
    pub fn expire(&self, id: &RequestId) -> Result<SponsorshipRequest, LifecycleError> {
        self.transition(id, RequestStatus::Expired)
    }

    /// Sweep every pending request older than `ttl` to expired, returning the
    /// ids that actually transitioned. Requests matched or cancelled while
    /// the sweep runs are skipped by the per-request guard.
    pub fn expire_overdue(
        &self,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<RequestId>, LifecycleError> {
        let cutoff = now - ttl;
        let mut expired = Vec::new();

        for request in self.store.pending_requests()? {
            if request.created_at > cutoff {
                continue;
            }
            if self
                .store
                .transition_request(&request.id, RequestStatus::Expired, now)?
            {
                expired.push(request.id);
            }
        }

        if !expired.is_empty() {
            info!(count = expired.len(), "expired overdue sponsorship requests");
        }
        Ok(expired)
    }

    fn transition(
        &self,
        id: &RequestId,
        to: RequestStatus,
    ) -> Result<SponsorshipRequest, LifecycleError> {
        let current = self
            .store
            .fetch_request(id)?
            .ok_or(LifecycleError::NotFound)?;

        if !transition_permitted(current.status, to) {
            return Err(LifecycleError::InvalidState {
                from: current.status,
                to,
            });
        }

        if !self.store.transition_request(id, to, Utc::now())? {
            // Lost a race between the fetch and the conditional write; report
            // the state that actually won.
            let latest = self
                .store
                .fetch_request(id)?
                .ok_or(LifecycleError::NotFound)?;
            return Err(LifecycleError::InvalidState {
                from: latest.status,
                to,
            });
        }

        self.store
            .fetch_request(id)?
            .ok_or(LifecycleError::NotFound)
    }
}

/// Error raised by sponsorship lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum SponsorshipLifecycleError {
    #[error("sponsorship not found")]
    NotFound,
    #[error("sponsorship transition from {} to {} is not permitted", .from.label(), .to.label())]
    InvalidState {
        from: SponsorshipStatus,
        to: SponsorshipStatus,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the terminal edges of a committed sponsorship: expiry when the funded
/// term lapses, cancellation on sponsor or operator action, completion when
/// the term is served in full. Creation belongs to the allocator alone.
pub struct SponsorshipLifecycle<S> {
    store: Arc<S>,
}

impl<S> SponsorshipLifecycle<S>
where
    S: SponsorshipStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn expire(&self, id: &SponsorshipId) -> Result<Sponsorship, SponsorshipLifecycleError> {
        self.transition(id, SponsorshipStatus::Expired)
    }

    pub fn cancel(&self, id: &SponsorshipId) -> Result<Sponsorship, SponsorshipLifecycleError> {
        self.transition(id, SponsorshipStatus::Cancelled)
    }

    pub fn complete(&self, id: &SponsorshipId) -> Result<Sponsorship, SponsorshipLifecycleError> {
        self.transition(id, SponsorshipStatus::Completed)
    }

    fn transition(
        &self,
        id: &SponsorshipId,
        to: SponsorshipStatus,
    ) -> Result<Sponsorship, SponsorshipLifecycleError> {
        let current = self
            .store
            .fetch_sponsorship(id)?
            .ok_or(SponsorshipLifecycleError::NotFound)?;

        if !sponsorship_transition_permitted(current.status, to) {
            return Err(SponsorshipLifecycleError::InvalidState {
                from: current.status,
                to,
            });
        }

        if !self.store.transition_sponsorship(id, to)? {
            let latest = self
                .store
                .fetch_sponsorship(id)?
                .ok_or(SponsorshipLifecycleError::NotFound)?;
            return Err(SponsorshipLifecycleError::InvalidState {
                from: latest.status,
                to,
            });
        }

        self.store
            .fetch_sponsorship(id)?
            .ok_or(SponsorshipLifecycleError::NotFound)
    }
}
