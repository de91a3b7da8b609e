use super::super::domain::{Sponsor, SponsorshipRequest, SubscriptionTier, Urgency};
use super::super::region::is_different_region;
use super::config::MatchPolicy;
use super::{ScoreComponent, ScoreFactor};

pub(crate) const BASE_SCORE: i16 = 50;
pub(crate) const CAPACITY_WEIGHT: f64 = 30.0;
pub(crate) const REGION_DIVERSITY_BONUS: i16 = 15;
pub(crate) const COUNTRY_AFFINITY_BONUS: i16 = 25;
pub(crate) const MAX_SCORE: i16 = 100;

pub(crate) fn score_pair(
    request: &SponsorshipRequest,
    sponsor: &Sponsor,
    policy: &MatchPolicy,
) -> (Vec<ScoreComponent>, i16) {
    let mut components = Vec::new();
    let mut total: i16 = 0;

    components.push(ScoreComponent {
        factor: ScoreFactor::Base,
        score: BASE_SCORE,
        notes: "active subscriber in candidate pool".to_string(),
    });
    total += BASE_SCORE;

    // max_sponsorships == 0 sponsors never pass selection; score the term as
    // zero rather than dividing by zero if one is handed in directly.
    let capacity_bonus = if sponsor.max_sponsorships == 0 {
        0
    } else {
        let used = sponsor.sponsorship_count as f64 / sponsor.max_sponsorships as f64;
        (CAPACITY_WEIGHT * (1.0 - used)).round() as i16
    };
    components.push(ScoreComponent {
        factor: ScoreFactor::Capacity,
        score: capacity_bonus,
        notes: format!(
            "{} of {} sponsorship slots in use",
            sponsor.sponsorship_count, sponsor.max_sponsorships
        ),
    });
    total += capacity_bonus;

    let urgency_bonus = match request.urgency {
        Urgency::High => 20,
        Urgency::Medium => 10,
        Urgency::Low => 5,
    };
    components.push(ScoreComponent {
        factor: ScoreFactor::Urgency,
        score: urgency_bonus,
        notes: format!("request urgency {:?}", request.urgency).to_ascii_lowercase(),
    });
    total += urgency_bonus;

    if is_different_region(&request.country, &sponsor.country) {
        components.push(ScoreComponent {
            factor: ScoreFactor::RegionDiversity,
            score: REGION_DIVERSITY_BONUS,
            notes: format!(
                "sponsor in {} reaches requester in {}",
                sponsor.country, request.country
            ),
        });
        total += REGION_DIVERSITY_BONUS;
    }

    if request.country == sponsor.country && request.country == policy.affinity_country {
        components.push(ScoreComponent {
            factor: ScoreFactor::CountryAffinity,
            score: COUNTRY_AFFINITY_BONUS,
            notes: format!("in-country pairing for designated {}", policy.affinity_country),
        });
        total += COUNTRY_AFFINITY_BONUS;
    }

    let tier_bonus = match sponsor.subscription_tier {
        SubscriptionTier::Enterprise => 20,
        SubscriptionTier::Premium => 10,
        SubscriptionTier::Free | SubscriptionTier::Basic => 0,
    };
    if tier_bonus > 0 {
        components.push(ScoreComponent {
            factor: ScoreFactor::SubscriptionTier,
            score: tier_bonus,
            notes: format!("{:?} tier subscriber", sponsor.subscription_tier).to_ascii_lowercase(),
        });
        total += tier_bonus;
    }

    (components, total.min(MAX_SCORE))
}
