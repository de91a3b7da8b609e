mod config;
mod rules;

pub use config::MatchPolicy;

use serde::{Deserialize, Serialize};

use super::domain::{Sponsor, SponsorId, SponsorshipRequest, UserId};

/// Stateless scorer applying the fixed weight table to a (request, sponsor)
/// pair. Pure: identical inputs always yield identical results.
pub struct MatchEngine {
    policy: MatchPolicy,
}

impl MatchEngine {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn score(&self, request: &SponsorshipRequest, sponsor: &Sponsor) -> MatchResult {
        let (reasons, total) = rules::score_pair(request, sponsor, &self.policy);

        MatchResult {
            sponsor_id: sponsor.id.clone(),
            sponsored_user_id: request.requester_id.clone(),
            score: total.clamp(0, rules::MAX_SCORE) as u8,
            reasons,
        }
    }
}

/// Scoring factors surfaced in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Base,
    Capacity,
    Urgency,
    RegionDiversity,
    CountryAffinity,
    SubscriptionTier,
}

/// Discrete contribution to a match score, kept for audits and debugging,
/// never consulted by allocation logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub score: i16,
    pub notes: String,
}

/// Transient scoring output for one (request, sponsor) pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub sponsor_id: SponsorId,
    pub sponsored_user_id: UserId,
    pub score: u8,
    pub reasons: Vec<ScoreComponent>,
}
