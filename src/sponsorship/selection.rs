use std::sync::Arc;

use super::domain::{Sponsor, SponsorshipRequest, SubscriptionStatus};
use super::repository::{SponsorshipStore, StoreError};
use super::scoring::MatchPolicy;

/// Read-only query over the sponsor pool. Returns the least-loaded eligible
/// sponsors first, capped at the policy's candidate limit so scoring cost
/// stays bounded; the allocator accepts that cap as an approximation of the
/// full pool.
pub struct CandidateSelector<S> {
    store: Arc<S>,
    policy: MatchPolicy,
}

impl<S> CandidateSelector<S>
where
    S: SponsorshipStore + 'static,
{
    pub fn new(store: Arc<S>, policy: MatchPolicy) -> Self {
        Self { store, policy }
    }

    pub fn select(&self, request: &SponsorshipRequest) -> Result<Vec<Sponsor>, StoreError> {
        let mut pool = self.store.sponsors_snapshot()?;
        pool.retain(|sponsor| is_eligible(sponsor, request, &self.policy));
        pool.sort_by(|a, b| {
            a.sponsorship_count
                .cmp(&b.sponsorship_count)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        pool.truncate(self.policy.candidate_limit);
        Ok(pool)
    }
}

fn is_eligible(sponsor: &Sponsor, request: &SponsorshipRequest, policy: &MatchPolicy) -> bool {
    if sponsor.subscription_status != SubscriptionStatus::Active {
        return false;
    }
    if !sponsor.sponsorship_enabled {
        return false;
    }
    if !sponsor.has_capacity() {
        return false;
    }
    // Same-country pairing is restricted to the designated affinity country.
    if sponsor.country == request.country && request.country != policy.affinity_country {
        return false;
    }
    true
}
