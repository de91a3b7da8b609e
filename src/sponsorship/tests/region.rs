use crate::sponsorship::region::{is_different_region, region_of, Region};

#[test]
fn maps_known_codes_to_buckets() {
    assert_eq!(region_of("US"), Region::NorthAmerica);
    assert_eq!(region_of("GB"), Region::Europe);
    assert_eq!(region_of("IR"), Region::MiddleEast);
    assert_eq!(region_of("NG"), Region::Africa);
    assert_eq!(region_of("JP"), Region::Asia);
    assert_eq!(region_of("NZ"), Region::Oceania);
    assert_eq!(region_of("BR"), Region::SouthAmerica);
    assert_eq!(region_of("CR"), Region::CentralAmerica);
}

#[test]
fn classification_is_case_insensitive() {
    assert_eq!(region_of("us"), region_of("US"));
    assert_eq!(region_of(" de "), Region::Europe);
}

#[test]
fn unknown_codes_keep_their_own_bucket() {
    assert_eq!(region_of("ZZ"), Region::Unknown("ZZ".to_string()));
    assert_ne!(region_of("ZZ"), region_of("XY"));
    assert!(is_different_region("ZZ", "XY"));
    // An unknown code never collides with a named bucket.
    assert!(is_different_region("ZZ", "US"));
}

#[test]
fn different_region_tracks_bucket_identity() {
    assert!(is_different_region("US", "GB"));
    assert!(!is_different_region("US", "CA"));
    assert!(!is_different_region("DE", "FR"));
}
