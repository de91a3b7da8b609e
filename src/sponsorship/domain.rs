use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requests longer than this are truncated at intake.
pub const MAX_REASON_LEN: usize = 500;

/// Identifier wrapper for sponsorship requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

/// Identifier wrapper for sponsors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SponsorId(pub String);

/// Identifier wrapper for end users (requesters / sponsored users).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for committed sponsorships.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SponsorshipId(pub String);

/// Requester-declared urgency, one of the fixed scoring inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Lifecycle state of a sponsorship request. `Pending` is the only state with
/// outgoing transitions; see [`crate::sponsorship::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Matched,
    Expired,
    Cancelled,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Matched => "matched",
            RequestStatus::Expired => "expired",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// Billing-provider subscription state for a sponsor account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    PastDue,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Basic,
    Premium,
    Enterprise,
}

/// A user requesting sponsored access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorshipRequest {
    pub id: RequestId,
    pub requester_id: UserId,
    pub country: String,
    pub reason: String,
    pub urgency: Urgency,
    pub status: RequestStatus,
    pub matched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SponsorshipRequest {
    /// Build a pending request with normalized country code and bounded reason.
    pub fn new(
        id: RequestId,
        requester_id: UserId,
        country: &str,
        reason: &str,
        urgency: Urgency,
        now: DateTime<Utc>,
    ) -> Self {
        let mut reason = reason.trim().to_string();
        if reason.len() > MAX_REASON_LEN {
            let mut cut = MAX_REASON_LEN;
            while !reason.is_char_boundary(cut) {
                cut -= 1;
            }
            reason.truncate(cut);
        }

        Self {
            id,
            requester_id,
            country: country.trim().to_ascii_uppercase(),
            reason,
            urgency,
            status: RequestStatus::Pending,
            matched_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A subscriber offering to fund free access for other users, bounded by
/// `max_sponsorships`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    pub id: SponsorId,
    pub country: String,
    pub subscription_status: SubscriptionStatus,
    pub subscription_tier: SubscriptionTier,
    pub sponsorship_enabled: bool,
    pub sponsorship_count: u32,
    pub max_sponsorships: u32,
}

impl Sponsor {
    pub fn has_capacity(&self) -> bool {
        self.sponsorship_count < self.max_sponsorships
    }
}

/// Lifecycle state of a committed sponsorship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SponsorshipStatus {
    Active,
    Expired,
    Cancelled,
    Completed,
}

impl SponsorshipStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SponsorshipStatus::Active => "active",
            SponsorshipStatus::Expired => "expired",
            SponsorshipStatus::Cancelled => "cancelled",
            SponsorshipStatus::Completed => "completed",
        }
    }
}

/// Outcome of the post-commit coupon hand-off to the billing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state")]
pub enum CouponState {
    Pending,
    Issued { reference: String },
    Failed { error: String },
}

/// Durable record produced exactly once per matched request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sponsorship {
    pub id: SponsorshipId,
    pub sponsor_id: SponsorId,
    pub sponsored_user_id: UserId,
    pub request_id: RequestId,
    pub amount_minor: u32,
    pub currency: String,
    pub duration_months: u32,
    pub status: SponsorshipStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub coupon: CouponState,
}
