use chrono::{DateTime, Utc};

use super::domain::{
    CouponState, RequestId, RequestStatus, Sponsor, SponsorId, Sponsorship, SponsorshipId,
    SponsorshipRequest, SponsorshipStatus, UserId,
};

/// Storage abstraction over requests, sponsors, and committed sponsorships.
///
/// Reads return point-in-time snapshots. The two conditional primitives,
/// [`transition_request`](SponsorshipStore::transition_request) and
/// [`reserve_sponsor_slot`](SponsorshipStore::reserve_sponsor_slot), are the
/// only operations the allocator's commit step relies on for correctness:
/// both must apply their check and write atomically with respect to other
/// callers of the same record.
pub trait SponsorshipStore: Send + Sync {
    fn insert_request(&self, request: SponsorshipRequest) -> Result<(), StoreError>;
    fn fetch_request(&self, id: &RequestId) -> Result<Option<SponsorshipRequest>, StoreError>;
    /// Apply `to` iff the stored status permits the transition. Returns
    /// `Ok(false)` when another caller won the race or the request already
    /// left `pending`; sets `matched_at` exactly once on the matched edge.
    fn transition_request(
        &self,
        id: &RequestId,
        to: RequestStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
    fn pending_requests(&self) -> Result<Vec<SponsorshipRequest>, StoreError>;
    fn requests_snapshot(&self) -> Result<Vec<SponsorshipRequest>, StoreError>;

    fn insert_sponsor(&self, sponsor: Sponsor) -> Result<(), StoreError>;
    fn fetch_sponsor(&self, id: &SponsorId) -> Result<Option<Sponsor>, StoreError>;
    fn sponsors_snapshot(&self) -> Result<Vec<Sponsor>, StoreError>;
    /// Atomic `sponsorship_count < max_sponsorships` check-and-increment.
    /// `Ok(false)` means the sponsor is already at capacity.
    fn reserve_sponsor_slot(&self, id: &SponsorId) -> Result<bool, StoreError>;
    /// Return a slot taken by [`reserve_sponsor_slot`](SponsorshipStore::reserve_sponsor_slot)
    /// whose allocation did not commit.
    fn release_sponsor_slot(&self, id: &SponsorId) -> Result<(), StoreError>;

    fn insert_sponsorship(&self, sponsorship: Sponsorship) -> Result<(), StoreError>;
    fn fetch_sponsorship(&self, id: &SponsorshipId) -> Result<Option<Sponsorship>, StoreError>;
    fn sponsorships_snapshot(&self) -> Result<Vec<Sponsorship>, StoreError>;
    fn record_coupon_state(
        &self,
        id: &SponsorshipId,
        state: CouponState,
    ) -> Result<(), StoreError>;
    /// Move an active sponsorship to a terminal state; `Ok(false)` if it
    /// already left `active`.
    fn transition_sponsorship(
        &self,
        id: &SponsorshipId,
        to: SponsorshipStatus,
    ) -> Result<bool, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Billing-side collaborator issuing the sponsored user's discount coupon
/// after an allocation commits.
pub trait CouponIssuer: Send + Sync {
    fn issue_sponsorship_coupon(
        &self,
        sponsorship_id: &SponsorshipId,
        sponsored_user_id: &UserId,
    ) -> Result<String, CouponError>;
}

/// Coupon issuance failure. Recorded against the sponsorship, never unwinds
/// the committed allocation.
#[derive(Debug, thiserror::Error)]
pub enum CouponError {
    #[error("billing provider unavailable: {0}")]
    Transport(String),
    #[error("billing provider rejected the coupon request: {0}")]
    Rejected(String),
}
