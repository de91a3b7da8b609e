//! Sponsorship request intake, matching, and allocation.
//!
//! The allocator is the only path that converts a pending request into a
//! durable sponsorship; it settles races through the store's conditional
//! primitives so a request matches at most once and a sponsor's capacity is
//! never oversold, no matter how many allocations run concurrently.

pub mod allocation;
pub mod domain;
pub mod lifecycle;
pub mod memory;
pub mod region;
pub mod repository;
pub mod scoring;
pub mod selection;
pub mod stats;

#[cfg(test)]
mod tests;

pub use allocation::{
    AllocatedSponsorship, AllocationError, AllocationOutcome, GrantPolicy, NoMatchReason,
    SponsorshipAllocator,
};
pub use domain::{
    CouponState, RequestId, RequestStatus, Sponsor, SponsorId, Sponsorship, SponsorshipId,
    SponsorshipRequest, SponsorshipStatus, SubscriptionStatus, SubscriptionTier, Urgency, UserId,
};
pub use lifecycle::{
    LifecycleError, RequestLifecycle, SponsorshipLifecycle, SponsorshipLifecycleError,
};
pub use memory::InMemorySponsorshipStore;
pub use region::{is_different_region, region_of, Region};
pub use repository::{CouponError, CouponIssuer, SponsorshipStore, StoreError};
pub use scoring::{MatchEngine, MatchPolicy, MatchResult, ScoreComponent, ScoreFactor};
pub use selection::CandidateSelector;
pub use stats::{SponsorshipStats, StatsSnapshot};
