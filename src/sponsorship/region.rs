use serde::{Deserialize, Serialize};

/// Region bucket used by the diversity bonus. A country code outside the
/// partition lands in `Unknown` carrying its own code, so two distinct unknown
/// codes never share a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    NorthAmerica,
    CentralAmerica,
    SouthAmerica,
    Europe,
    MiddleEast,
    Africa,
    Asia,
    Oceania,
    Unknown(String),
}

/// Map an ISO-3166 alpha-2 code to its region bucket. Case-insensitive.
pub fn region_of(country: &str) -> Region {
    let code = country.trim().to_ascii_uppercase();
    match code.as_str() {
        "US" | "CA" | "MX" => Region::NorthAmerica,
        "BZ" | "CR" | "CU" | "DO" | "GT" | "HN" | "HT" | "JM" | "NI" | "PA" | "SV" | "TT" => {
            Region::CentralAmerica
        }
        "AR" | "BO" | "BR" | "CL" | "CO" | "EC" | "GY" | "PE" | "PY" | "SR" | "UY" | "VE" => {
            Region::SouthAmerica
        }
        "AD" | "AL" | "AT" | "BA" | "BE" | "BG" | "BY" | "CH" | "CY" | "CZ" | "DE" | "DK"
        | "EE" | "ES" | "FI" | "FR" | "GB" | "GR" | "HR" | "HU" | "IE" | "IS" | "IT" | "LI"
        | "LT" | "LU" | "LV" | "MC" | "MD" | "ME" | "MK" | "MT" | "NL" | "NO" | "PL" | "PT"
        | "RO" | "RS" | "RU" | "SE" | "SI" | "SK" | "SM" | "UA" => Region::Europe,
        "AE" | "BH" | "IL" | "IQ" | "IR" | "JO" | "KW" | "LB" | "OM" | "PS" | "QA" | "SA"
        | "SY" | "TR" | "YE" => Region::MiddleEast,
        "AO" | "BF" | "BI" | "BJ" | "BW" | "CD" | "CF" | "CG" | "CI" | "CM" | "CV" | "DJ"
        | "DZ" | "EG" | "ER" | "ET" | "GA" | "GH" | "GM" | "GN" | "GQ" | "GW" | "KE" | "LR"
        | "LS" | "LY" | "MA" | "MG" | "ML" | "MR" | "MU" | "MW" | "MZ" | "NA" | "NE" | "NG"
        | "RW" | "SD" | "SL" | "SN" | "SO" | "SS" | "TD" | "TG" | "TN" | "TZ" | "UG" | "ZA"
        | "ZM" | "ZW" => Region::Africa,
        "AF" | "AM" | "AZ" | "BD" | "BN" | "BT" | "CN" | "GE" | "HK" | "ID" | "IN" | "JP"
        | "KG" | "KH" | "KP" | "KR" | "KZ" | "LA" | "LK" | "MM" | "MN" | "MO" | "MV" | "MY"
        | "NP" | "PH" | "PK" | "SG" | "TH" | "TJ" | "TM" | "TW" | "UZ" | "VN" => Region::Asia,
        "AU" | "FJ" | "FM" | "KI" | "MH" | "NR" | "NZ" | "PG" | "PW" | "SB" | "TO" | "TV"
        | "VU" | "WS" => Region::Oceania,
        _ => Region::Unknown(code),
    }
}

pub fn is_different_region(a: &str, b: &str) -> bool {
    region_of(a) != region_of(b)
}
