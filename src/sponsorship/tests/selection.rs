use std::sync::Arc;

use super::common::*;
use crate::sponsorship::domain::{SubscriptionStatus, SubscriptionTier, Urgency};
use crate::sponsorship::memory::InMemorySponsorshipStore;
use crate::sponsorship::repository::SponsorshipStore;
use crate::sponsorship::selection::CandidateSelector;

fn selector(store: Arc<InMemorySponsorshipStore>) -> CandidateSelector<InMemorySponsorshipStore> {
    CandidateSelector::new(store, match_policy())
}

#[test]
fn filters_inactive_opted_out_and_full_sponsors() {
    let store = Arc::new(InMemorySponsorshipStore::new());

    let mut inactive = sponsor("spo-inactive", "GB", SubscriptionTier::Premium, 0, 5);
    inactive.subscription_status = SubscriptionStatus::Inactive;
    store.insert_sponsor(inactive).expect("insert");

    let mut opted_out = sponsor("spo-optout", "DE", SubscriptionTier::Premium, 0, 5);
    opted_out.sponsorship_enabled = false;
    store.insert_sponsor(opted_out).expect("insert");

    // At capacity, including the max_sponsorships == 0 account.
    store
        .insert_sponsor(sponsor("spo-full", "FR", SubscriptionTier::Premium, 5, 5))
        .expect("insert");
    store
        .insert_sponsor(sponsor("spo-zero", "NL", SubscriptionTier::Premium, 0, 0))
        .expect("insert");

    store
        .insert_sponsor(sponsor("spo-ok", "JP", SubscriptionTier::Basic, 1, 3))
        .expect("insert");

    let candidates = selector(store)
        .select(&request("req-1", "US", Urgency::Medium))
        .expect("select");

    let ids: Vec<_> = candidates.iter().map(|s| s.id.0.as_str()).collect();
    assert_eq!(ids, vec!["spo-ok"]);
}

#[test]
fn same_country_pairing_requires_designated_code() {
    let store = Arc::new(InMemorySponsorshipStore::new());
    store
        .insert_sponsor(sponsor("spo-us", "US", SubscriptionTier::Premium, 0, 5))
        .expect("insert");
    store
        .insert_sponsor(sponsor("spo-ca", "CA", SubscriptionTier::Premium, 0, 5))
        .expect("insert");

    let selector = selector(store);

    // US requester never pairs with a US sponsor.
    let from_us = selector
        .select(&request("req-us", "US", Urgency::Low))
        .expect("select");
    assert!(from_us.iter().all(|s| s.id.0 != "spo-us"));

    // CA is the designated code, so CA-CA pairing is allowed.
    let from_ca = selector
        .select(&request("req-ca", "CA", Urgency::Low))
        .expect("select");
    assert!(from_ca.iter().any(|s| s.id.0 == "spo-ca"));
}

#[test]
fn orders_least_loaded_first_and_caps_the_pool() {
    let store = Arc::new(InMemorySponsorshipStore::new());
    for i in 0..15u32 {
        store
            .insert_sponsor(sponsor(
                &format!("spo-{i:02}"),
                "GB",
                SubscriptionTier::Basic,
                i % 4,
                10,
            ))
            .expect("insert");
    }

    let candidates = selector(store)
        .select(&request("req-1", "US", Urgency::High))
        .expect("select");

    assert_eq!(candidates.len(), 10);
    let counts: Vec<_> = candidates.iter().map(|s| s.sponsorship_count).collect();
    let mut sorted = counts.clone();
    sorted.sort_unstable();
    assert_eq!(counts, sorted, "candidates ascend by load");
    assert_eq!(candidates[0].sponsorship_count, 0);
}
