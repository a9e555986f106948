//! # Jurisdictions
//!
//! The fixed table of Indian states and union territories.
//!
//! Each entry carries two identifiers:
//! - `code`: the two-letter code the storefront stores on addresses (`KA`)
//! - `gst_code`: the two-digit GST state code printed on invoices (`29`)
//!
//! The table is a versioned constant. A new state or union territory means a
//! code change here, not configuration.

use serde::Serialize;
use ts_rs::TS;

/// GST state code printed when a buyer's state cannot be resolved.
pub const UNKNOWN_GST_CODE: &str = "99";

/// The seller's registered state when nothing else is configured.
pub const HOME_JURISDICTION: &str = "KA";

/// Whether an entry is a state or a union territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum JurisdictionKind {
    State,
    UnionTerritory,
}

/// A state or union territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Jurisdiction {
    pub code: &'static str,
    pub name: &'static str,
    pub gst_code: &'static str,
    pub kind: JurisdictionKind,
}

const fn state(code: &'static str, name: &'static str, gst_code: &'static str) -> Jurisdiction {
    Jurisdiction {
        code,
        name,
        gst_code,
        kind: JurisdictionKind::State,
    }
}

const fn territory(code: &'static str, name: &'static str, gst_code: &'static str) -> Jurisdiction {
    Jurisdiction {
        code,
        name,
        gst_code,
        kind: JurisdictionKind::UnionTerritory,
    }
}

/// All jurisdictions, states first, in display order.
pub static ALL: &[Jurisdiction] = &[
    state("AP", "Andhra Pradesh", "37"),
    state("AR", "Arunachal Pradesh", "12"),
    state("AS", "Assam", "18"),
    state("BR", "Bihar", "10"),
    state("CG", "Chhattisgarh", "22"),
    state("GA", "Goa", "30"),
    state("GJ", "Gujarat", "24"),
    state("HR", "Haryana", "06"),
    state("HP", "Himachal Pradesh", "02"),
    state("JH", "Jharkhand", "20"),
    state("KA", "Karnataka", "29"),
    state("KL", "Kerala", "32"),
    state("MP", "Madhya Pradesh", "23"),
    state("MH", "Maharashtra", "27"),
    state("MN", "Manipur", "14"),
    state("ML", "Meghalaya", "17"),
    state("MZ", "Mizoram", "15"),
    state("NL", "Nagaland", "13"),
    state("OD", "Odisha", "21"),
    state("PB", "Punjab", "03"),
    state("RJ", "Rajasthan", "08"),
    state("SK", "Sikkim", "11"),
    state("TN", "Tamil Nadu", "33"),
    state("TG", "Telangana", "36"),
    state("TR", "Tripura", "16"),
    state("UK", "Uttarakhand", "05"),
    state("UP", "Uttar Pradesh", "09"),
    state("WB", "West Bengal", "19"),
    territory("AN", "Andaman and Nicobar Islands", "35"),
    territory("CH", "Chandigarh", "04"),
    territory("DH", "Dadra and Nagar Haveli and Daman and Diu", "26"),
    territory("DL", "Delhi", "07"),
    territory("JK", "Jammu and Kashmir", "01"),
    territory("LA", "Ladakh", "38"),
    territory("LD", "Lakshadweep", "31"),
    territory("PY", "Puducherry", "34"),
];

/// Looks up a jurisdiction by its two-letter code (trimmed, any case).
///
/// ## Example
/// ```rust
/// use tripund_core::jurisdiction;
///
/// assert_eq!(jurisdiction::find("ka").unwrap().name, "Karnataka");
/// assert!(jurisdiction::find("ZZ").is_none());
/// ```
pub fn find(code: &str) -> Option<&'static Jurisdiction> {
    let code = code.trim();
    ALL.iter().find(|j| j.code.eq_ignore_ascii_case(code))
}

/// Display name for a code, if the code is known.
pub fn state_name(code: &str) -> Option<&'static str> {
    find(code).map(|j| j.name)
}

/// Looks up a jurisdiction by display name (trimmed, any case).
///
/// Shipping addresses store the state as free text, so this is how an
/// invoice resolves the buyer's GST code.
pub fn find_by_name(name: &str) -> Option<&'static Jurisdiction> {
    let name = name.trim();
    ALL.iter().find(|j| j.name.eq_ignore_ascii_case(name))
}

/// GST state code for a state name, or [`UNKNOWN_GST_CODE`].
///
/// ```rust
/// use tripund_core::jurisdiction::gst_state_code;
///
/// assert_eq!(gst_state_code("Maharashtra"), "27");
/// assert_eq!(gst_state_code("Atlantis"), "99");
/// ```
pub fn gst_state_code(name: &str) -> &'static str {
    find_by_name(name).map_or(UNKNOWN_GST_CODE, |j| j.gst_code)
}

/// True if `code` names a known state or union territory.
pub fn is_known(code: &str) -> bool {
    find(code).is_some()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_size_and_kinds() {
        assert_eq!(ALL.len(), 36);
        let territories = ALL
            .iter()
            .filter(|j| j.kind == JurisdictionKind::UnionTerritory)
            .count();
        assert_eq!(territories, 8);
    }

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = ALL.iter().map(|j| j.code).collect();
        let gst_codes: HashSet<_> = ALL.iter().map(|j| j.gst_code).collect();
        assert_eq!(codes.len(), ALL.len());
        assert_eq!(gst_codes.len(), ALL.len());
        assert!(!gst_codes.contains(UNKNOWN_GST_CODE));
    }

    #[test]
    fn test_codes_are_short_and_uppercase() {
        for j in ALL {
            assert!((2..=3).contains(&j.code.len()), "{}", j.code);
            assert_eq!(j.code, j.code.to_ascii_uppercase());
            assert_eq!(j.gst_code.len(), 2);
        }
    }

    #[test]
    fn test_lookups() {
        assert_eq!(state_name("MH"), Some("Maharashtra"));
        assert_eq!(state_name(" dl "), Some("Delhi"));
        assert_eq!(state_name(""), None);
        assert_eq!(find_by_name("tamil nadu").map(|j| j.code), Some("TN"));
        assert!(is_known(HOME_JURISDICTION));
        assert!(!is_known("XX"));
    }

    #[test]
    fn test_gst_state_code() {
        assert_eq!(gst_state_code("Karnataka"), "29");
        assert_eq!(gst_state_code("Jammu and Kashmir"), "01");
        assert_eq!(gst_state_code(""), UNKNOWN_GST_CODE);
    }
}
