use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{
    CouponState, RequestId, RequestStatus, Sponsorship, SponsorshipId, SponsorshipStatus,
};
use super::repository::{CouponIssuer, SponsorshipStore, StoreError};
use super::scoring::{MatchEngine, MatchPolicy, MatchResult};
use super::selection::CandidateSelector;

static SPONSORSHIP_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_sponsorship_id() -> SponsorshipId {
    let id = SPONSORSHIP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SponsorshipId(format!("spn-{id:06}"))
}

/// Monetary terms applied to every committed sponsorship. The matching core
/// carries no price table, so the terms are policy input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantPolicy {
    pub amount_minor: u32,
    pub currency: String,
    pub duration_months: u32,
}

impl Default for GrantPolicy {
    fn default() -> Self {
        Self {
            amount_minor: 999,
            currency: "USD".to_string(),
            duration_months: 12,
        }
    }
}

/// Routine non-allocation outcomes. Callers treat every reason identically;
/// the distinction exists for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchReason {
    RequestNotPending,
    NoEligibleSponsors,
    LostRace,
}

/// Result of one `find_and_allocate` call. `NoMatch` is a first-class value,
/// not an error: it covers empty candidate pools, already-settled requests,
/// and lost commit races alike.
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationOutcome {
    Allocated(AllocatedSponsorship),
    NoMatch(NoMatchReason),
}

/// The committed record plus the scoring trail that selected it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedSponsorship {
    pub sponsorship: Sponsorship,
    pub result: MatchResult,
}

/// Error raised by the allocator. Lost races and empty pools are not errors;
/// see [`AllocationOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("sponsorship request not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates select → score → commit. The only component permitted to move
/// a request onto the matched edge and to consume sponsor capacity, and it
/// does both through the store's conditional primitives so concurrent callers
/// settle each race in the store, not here.
pub struct SponsorshipAllocator<S, C> {
    store: Arc<S>,
    coupons: Arc<C>,
    selector: CandidateSelector<S>,
    engine: MatchEngine,
    grants: GrantPolicy,
}

impl<S, C> SponsorshipAllocator<S, C>
where
    S: SponsorshipStore + 'static,
    C: CouponIssuer + 'static,
{
    pub fn new(store: Arc<S>, coupons: Arc<C>, policy: MatchPolicy, grants: GrantPolicy) -> Self {
        let selector = CandidateSelector::new(store.clone(), policy.clone());
        let engine = MatchEngine::new(policy);

        Self {
            store,
            coupons,
            selector,
            engine,
            grants,
        }
    }

    /// Find the best eligible sponsor for `request_id` and commit the match.
    ///
    /// Safe to re-invoke: a request that already left `pending` yields
    /// `NoMatch` without side effects. A commit race lost to a concurrent
    /// allocation or cancellation also yields `NoMatch`; re-enqueueing is the
    /// caller's decision.
    pub fn find_and_allocate(
        &self,
        request_id: &RequestId,
    ) -> Result<AllocationOutcome, AllocationError> {
        let request = self
            .store
            .fetch_request(request_id)?
            .ok_or(AllocationError::NotFound)?;

        if request.status.is_terminal() {
            debug!(
                request = %request_id.0,
                status = request.status.label(),
                "allocation skipped, request already settled"
            );
            return Ok(AllocationOutcome::NoMatch(NoMatchReason::RequestNotPending));
        }

        let candidates = self.selector.select(&request)?;
        if candidates.is_empty() {
            debug!(request = %request_id.0, "no eligible sponsors");
            return Ok(AllocationOutcome::NoMatch(NoMatchReason::NoEligibleSponsors));
        }

        // Strictly-greater comparison keeps the earliest candidate on ties,
        // and candidates arrive least-loaded first.
        let mut best: Option<MatchResult> = None;
        for sponsor in &candidates {
            let result = self.engine.score(&request, sponsor);
            if best.as_ref().map_or(true, |b| result.score > b.score) {
                best = Some(result);
            }
        }
        let Some(best) = best else {
            return Ok(AllocationOutcome::NoMatch(NoMatchReason::NoEligibleSponsors));
        };

        if !self.store.reserve_sponsor_slot(&best.sponsor_id)? {
            debug!(
                request = %request_id.0,
                sponsor = %best.sponsor_id.0,
                "sponsor capacity taken by concurrent allocation"
            );
            return Ok(AllocationOutcome::NoMatch(NoMatchReason::LostRace));
        }

        let now = Utc::now();
        if !self
            .store
            .transition_request(request_id, RequestStatus::Matched, now)?
        {
            self.store.release_sponsor_slot(&best.sponsor_id)?;
            debug!(
                request = %request_id.0,
                "request settled concurrently, reservation released"
            );
            return Ok(AllocationOutcome::NoMatch(NoMatchReason::LostRace));
        }

        let sponsorship = Sponsorship {
            id: next_sponsorship_id(),
            sponsor_id: best.sponsor_id.clone(),
            sponsored_user_id: best.sponsored_user_id.clone(),
            request_id: request_id.clone(),
            amount_minor: self.grants.amount_minor,
            currency: self.grants.currency.clone(),
            duration_months: self.grants.duration_months,
            status: SponsorshipStatus::Active,
            start_date: now,
            end_date: now
                .checked_add_months(Months::new(self.grants.duration_months))
                .unwrap_or(now),
            coupon: CouponState::Pending,
        };
        self.store.insert_sponsorship(sponsorship.clone())?;

        info!(
            request = %request_id.0,
            sponsor = %best.sponsor_id.0,
            sponsorship = %sponsorship.id.0,
            score = best.score,
            "sponsorship allocated"
        );

        let coupon = match self
            .coupons
            .issue_sponsorship_coupon(&sponsorship.id, &sponsorship.sponsored_user_id)
        {
            Ok(reference) => CouponState::Issued { reference },
            Err(err) => {
                warn!(
                    sponsorship = %sponsorship.id.0,
                    error = %err,
                    "coupon issuance failed, allocation stands"
                );
                CouponState::Failed {
                    error: err.to_string(),
                }
            }
        };
        self.store.record_coupon_state(&sponsorship.id, coupon)?;

        let sponsorship = self
            .store
            .fetch_sponsorship(&sponsorship.id)?
            .ok_or(StoreError::NotFound)?;

        Ok(AllocationOutcome::Allocated(AllocatedSponsorship {
            sponsorship,
            result: best,
        }))
    }
}
