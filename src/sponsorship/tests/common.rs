use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::sponsorship::allocation::{GrantPolicy, SponsorshipAllocator};
use crate::sponsorship::domain::{
    RequestId, Sponsor, SponsorId, SponsorshipId, SponsorshipRequest, SubscriptionStatus,
    SubscriptionTier, Urgency, UserId,
};
use crate::sponsorship::memory::InMemorySponsorshipStore;
use crate::sponsorship::repository::{CouponError, CouponIssuer};
use crate::sponsorship::scoring::MatchPolicy;

pub(super) fn match_policy() -> MatchPolicy {
    MatchPolicy {
        affinity_country: "CA".to_string(),
        candidate_limit: 10,
        request_ttl_hours: 72,
    }
}

pub(super) fn request(id: &str, country: &str, urgency: Urgency) -> SponsorshipRequest {
    SponsorshipRequest::new(
        RequestId(id.to_string()),
        UserId(format!("user-{id}")),
        country,
        "provider blocked in my region",
        urgency,
        Utc::now(),
    )
}

pub(super) fn sponsor(
    id: &str,
    country: &str,
    tier: SubscriptionTier,
    sponsorship_count: u32,
    max_sponsorships: u32,
) -> Sponsor {
    Sponsor {
        id: SponsorId(id.to_string()),
        country: country.to_string(),
        subscription_status: SubscriptionStatus::Active,
        subscription_tier: tier,
        sponsorship_enabled: true,
        sponsorship_count,
        max_sponsorships,
    }
}

/// Coupon issuer fake recording every issuance, optionally failing on demand.
pub(super) struct RecordingCoupons {
    issued: Mutex<Vec<(SponsorshipId, UserId)>>,
    fail: bool,
}

impl RecordingCoupons {
    pub(super) fn new() -> Self {
        Self {
            issued: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub(super) fn failing() -> Self {
        Self {
            issued: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub(super) fn issued(&self) -> Vec<(SponsorshipId, UserId)> {
        self.issued.lock().expect("coupon log poisoned").clone()
    }
}

impl CouponIssuer for RecordingCoupons {
    fn issue_sponsorship_coupon(
        &self,
        sponsorship_id: &SponsorshipId,
        sponsored_user_id: &UserId,
    ) -> Result<String, CouponError> {
        if self.fail {
            return Err(CouponError::Transport("billing timeout".to_string()));
        }
        self.issued
            .lock()
            .expect("coupon log poisoned")
            .push((sponsorship_id.clone(), sponsored_user_id.clone()));
        Ok(format!("coupon-{}", sponsorship_id.0))
    }
}

pub(super) fn allocator(
    store: Arc<InMemorySponsorshipStore>,
    coupons: Arc<RecordingCoupons>,
) -> SponsorshipAllocator<InMemorySponsorshipStore, RecordingCoupons> {
    SponsorshipAllocator::new(store, coupons, match_policy(), GrantPolicy::default())
}
