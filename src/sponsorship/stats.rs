use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{RequestId, RequestStatus, SponsorshipStatus, Urgency};
use super::repository::{SponsorshipStore, StoreError};

/// Read-only rollups over requests and sponsorships. Each collection is read
/// as one snapshot, so a rollup may miss a commit that lands mid-query but
/// never observes a partially-applied one.
pub struct SponsorshipStats<S> {
    store: Arc<S>,
}

/// Request volume for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryVolume {
    pub country: String,
    pub requests: usize,
}

/// Per-urgency request counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyBreakdown {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Compact request view for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSummary {
    pub id: RequestId,
    pub country: String,
    pub urgency: Urgency,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_sponsorships: usize,
    pub active_sponsorships: usize,
    pub distinct_sponsored_users: usize,
    pub distinct_matched_countries: usize,
    pub amount_minor_by_currency: BTreeMap<String, u64>,
    pub top_request_countries: Vec<CountryVolume>,
    pub urgency_breakdown: UrgencyBreakdown,
    pub recent_requests: Vec<RequestSummary>,
}

impl<S> SponsorshipStats<S>
where
    S: SponsorshipStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn snapshot(
        &self,
        top_countries: usize,
        recent_requests: usize,
    ) -> Result<StatsSnapshot, StoreError> {
        let sponsorships = self.store.sponsorships_snapshot()?;
        let requests = self.store.requests_snapshot()?;

        let total_sponsorships = sponsorships.len();
        let active_sponsorships = sponsorships
            .iter()
            .filter(|s| s.status == SponsorshipStatus::Active)
            .count();
        let distinct_sponsored_users = sponsorships
            .iter()
            .map(|s| &s.sponsored_user_id)
            .collect::<BTreeSet<_>>()
            .len();

        let mut amount_minor_by_currency: BTreeMap<String, u64> = BTreeMap::new();
        for sponsorship in &sponsorships {
            *amount_minor_by_currency
                .entry(sponsorship.currency.clone())
                .or_default() += u64::from(sponsorship.amount_minor);
        }

        let distinct_matched_countries = requests
            .iter()
            .filter(|r| r.status == RequestStatus::Matched)
            .map(|r| r.country.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        let mut by_country: BTreeMap<&str, usize> = BTreeMap::new();
        let mut urgency_breakdown = UrgencyBreakdown::default();
        for request in &requests {
            *by_country.entry(request.country.as_str()).or_default() += 1;
            match request.urgency {
                Urgency::Low => urgency_breakdown.low += 1,
                Urgency::Medium => urgency_breakdown.medium += 1,
                Urgency::High => urgency_breakdown.high += 1,
            }
        }
        let mut top_request_countries: Vec<CountryVolume> = by_country
            .into_iter()
            .map(|(country, count)| CountryVolume {
                country: country.to_string(),
                requests: count,
            })
            .collect();
        top_request_countries.sort_by(|a, b| {
            b.requests
                .cmp(&a.requests)
                .then_with(|| a.country.cmp(&b.country))
        });
        top_request_countries.truncate(top_countries);

        let mut recent: Vec<_> = requests;
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(recent_requests);
        let recent_requests = recent
            .into_iter()
            .map(|request| RequestSummary {
                id: request.id,
                country: request.country,
                urgency: request.urgency,
                status: request.status.label(),
                created_at: request.created_at,
            })
            .collect();

        Ok(StatsSnapshot {
            total_sponsorships,
            active_sponsorships,
            distinct_sponsored_users,
            distinct_matched_countries,
            amount_minor_by_currency,
            top_request_countries,
            urgency_breakdown,
            recent_requests,
        })
    }
}
