use serde::{Deserialize, Serialize};

/// Policy dials shared by candidate selection and match scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// Single country code for which same-country pairing is both permitted
    /// and rewarded with the affinity bonus.
    pub affinity_country: String,
    /// Cap on how many least-loaded sponsors are scored per request.
    pub candidate_limit: usize,
    /// Age after which an unmatched pending request may be swept to expired.
    pub request_ttl_hours: i64,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            affinity_country: "IR".to_string(),
            candidate_limit: 10,
            request_ttl_hours: 72,
        }
    }
}
