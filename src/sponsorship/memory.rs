use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{
    CouponState, RequestId, RequestStatus, Sponsor, SponsorId, Sponsorship, SponsorshipId,
    SponsorshipRequest, SponsorshipStatus,
};
use super::lifecycle::{sponsorship_transition_permitted, transition_permitted};
use super::repository::{SponsorshipStore, StoreError};

/// Reference store backed by per-collection mutexes. Conditional updates run
/// under the owning lock, which makes them atomic with respect to every other
/// caller touching the same collection; snapshots are taken under the same
/// lock and therefore never observe a half-applied write.
#[derive(Default)]
pub struct InMemorySponsorshipStore {
    requests: Mutex<HashMap<RequestId, SponsorshipRequest>>,
    sponsors: Mutex<HashMap<SponsorId, Sponsor>>,
    sponsorships: Mutex<HashMap<SponsorshipId, Sponsorship>>,
}

impl InMemorySponsorshipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("poisoned lock".to_string()))
}

impl SponsorshipStore for InMemorySponsorshipStore {
    fn insert_request(&self, request: SponsorshipRequest) -> Result<(), StoreError> {
        let mut requests = lock(&self.requests)?;
        if requests.contains_key(&request.id) {
            return Err(StoreError::Conflict);
        }
        requests.insert(request.id.clone(), request);
        Ok(())
    }

    fn fetch_request(&self, id: &RequestId) -> Result<Option<SponsorshipRequest>, StoreError> {
        Ok(lock(&self.requests)?.get(id).cloned())
    }

    fn transition_request(
        &self,
        id: &RequestId,
        to: RequestStatus,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut requests = lock(&self.requests)?;
        let request = requests.get_mut(id).ok_or(StoreError::NotFound)?;

        if !transition_permitted(request.status, to) {
            return Ok(false);
        }

        request.status = to;
        request.updated_at = at;
        if to == RequestStatus::Matched && request.matched_at.is_none() {
            request.matched_at = Some(at);
        }
        Ok(true)
    }

    fn pending_requests(&self) -> Result<Vec<SponsorshipRequest>, StoreError> {
        Ok(lock(&self.requests)?
            .values()
            .filter(|request| request.status == RequestStatus::Pending)
            .cloned()
            .collect())
    }

    fn requests_snapshot(&self) -> Result<Vec<SponsorshipRequest>, StoreError> {
        Ok(lock(&self.requests)?.values().cloned().collect())
    }

    fn insert_sponsor(&self, sponsor: Sponsor) -> Result<(), StoreError> {
        let mut sponsors = lock(&self.sponsors)?;
        if sponsors.contains_key(&sponsor.id) {
            return Err(StoreError::Conflict);
        }
        sponsors.insert(sponsor.id.clone(), sponsor);
        Ok(())
    }

    fn fetch_sponsor(&self, id: &SponsorId) -> Result<Option<Sponsor>, StoreError> {
        Ok(lock(&self.sponsors)?.get(id).cloned())
    }

    fn sponsors_snapshot(&self) -> Result<Vec<Sponsor>, StoreError> {
        Ok(lock(&self.sponsors)?.values().cloned().collect())
    }

    fn reserve_sponsor_slot(&self, id: &SponsorId) -> Result<bool, StoreError> {
        let mut sponsors = lock(&self.sponsors)?;
        let sponsor = sponsors.get_mut(id).ok_or(StoreError::NotFound)?;

        if sponsor.sponsorship_count >= sponsor.max_sponsorships {
            return Ok(false);
        }
        sponsor.sponsorship_count += 1;
        Ok(true)
    }

    fn release_sponsor_slot(&self, id: &SponsorId) -> Result<(), StoreError> {
        let mut sponsors = lock(&self.sponsors)?;
        let sponsor = sponsors.get_mut(id).ok_or(StoreError::NotFound)?;
        sponsor.sponsorship_count = sponsor.sponsorship_count.saturating_sub(1);
        Ok(())
    }

    fn insert_sponsorship(&self, sponsorship: Sponsorship) -> Result<(), StoreError> {
        let mut sponsorships = lock(&self.sponsorships)?;
        if sponsorships.contains_key(&sponsorship.id) {
            return Err(StoreError::Conflict);
        }
        sponsorships.insert(sponsorship.id.clone(), sponsorship);
        Ok(())
    }

    fn fetch_sponsorship(&self, id: &SponsorshipId) -> Result<Option<Sponsorship>, StoreError> {
        Ok(lock(&self.sponsorships)?.get(id).cloned())
    }

    fn sponsorships_snapshot(&self) -> Result<Vec<Sponsorship>, StoreError> {
        Ok(lock(&self.sponsorships)?.values().cloned().collect())
    }

    fn record_coupon_state(
        &self,
        id: &SponsorshipId,
        state: CouponState,
    ) -> Result<(), StoreError> {
        let mut sponsorships = lock(&self.sponsorships)?;
        let sponsorship = sponsorships.get_mut(id).ok_or(StoreError::NotFound)?;
        sponsorship.coupon = state;
        Ok(())
    }

    fn transition_sponsorship(
        &self,
        id: &SponsorshipId,
        to: SponsorshipStatus,
    ) -> Result<bool, StoreError> {
        let mut sponsorships = lock(&self.sponsorships)?;
        let sponsorship = sponsorships.get_mut(id).ok_or(StoreError::NotFound)?;

        if !sponsorship_transition_permitted(sponsorship.status, to) {
            return Ok(false);
        }
        sponsorship.status = to;
        Ok(true)
    }
}
