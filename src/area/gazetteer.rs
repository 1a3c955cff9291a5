//! Built-in gazetteer: lowercase place-name substrings mapped to service areas.
//!
//! Two tiers, scanned in order. Within a tier the first key contained in the
//! text wins, so table order is part of the behaviour. No longest-match or
//! word-boundary preference is applied.

use super::types::ServiceArea;
use ServiceArea::*;

/// A gazetteer hit: the key that matched and the area it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GazetteerMatch {
    pub key: &'static str,
    pub area: ServiceArea,
}

// ─── Tier 1: landmarks, terminals, districts ────────────────────

const DIRECT_LOCATIONS: &[(&str, ServiceArea)] = &[
    // Penang
    ("komtar", Penang),
    ("penang sentral", Penang),
    ("george town", Penang),
    ("georgetown", Penang),
    ("butterworth", Penang),
    ("bayan lepas", Penang),
    ("batu ferringhi", Penang),
    ("gurney", Penang),
    ("air itam", Penang),
    ("bukit mertajam", Penang),
    // Klang Valley
    ("klcc", KlangValley),
    ("kl sentral", KlangValley),
    ("kuala lumpur", KlangValley),
    ("bukit bintang", KlangValley),
    ("mid valley", KlangValley),
    ("pasar seni", KlangValley),
    ("petaling jaya", KlangValley),
    ("shah alam", KlangValley),
    ("subang", KlangValley),
    ("putrajaya", KlangValley),
    ("cyberjaya", KlangValley),
    ("bangsar", KlangValley),
    ("ampang", KlangValley),
    ("cheras", KlangValley),
    ("puchong", KlangValley),
    ("klang", KlangValley),
    // Ipoh
    ("medan kidd", Ipoh),
    ("amanjaya", Ipoh),
    ("ipoh", Ipoh),
    // Melaka
    ("melaka sentral", Melaka),
    ("jonker", Melaka),
    ("a famosa", Melaka),
    // Johor
    ("larkin", Johor),
    ("jb sentral", Johor),
    ("johor bahru", Johor),
    // Kuantan
    ("terminal sentral kuantan", Kuantan),
    ("teluk cempedak", Kuantan),
    // Kuala Terengganu
    ("mbkt", KualaTerengganu),
    ("kuala terengganu", KualaTerengganu),
    // Kota Bharu
    ("kota bharu", KotaBharu),
    // Alor Setar
    ("shahab perdana", AlorSetar),
    ("menara alor setar", AlorSetar),
    // Kuching
    ("kuching sentral", Kuching),
    ("kuching waterfront", Kuching),
];

// ─── Tier 2: states and major towns ─────────────────────────────

const STATE_REGIONS: &[(&str, ServiceArea)] = &[
    ("pulau pinang", Penang),
    ("penang", Penang),
    // Labuan is also a federal territory; only KL and Putrajaya belong here.
    ("wilayah persekutuan kuala lumpur", KlangValley),
    ("wilayah persekutuan putrajaya", KlangValley),
    ("federal territory of kuala lumpur", KlangValley),
    ("federal territory of putrajaya", KlangValley),
    ("kuala lumpur", KlangValley),
    ("putrajaya", KlangValley),
    ("selangor", KlangValley),
    ("perak", Ipoh),
    ("taiping", Ipoh),
    ("teluk intan", Ipoh),
    ("negeri sembilan", Seremban),
    ("seremban", Seremban),
    ("port dickson", Seremban),
    ("melaka", Melaka),
    ("malacca", Melaka),
    ("johor", Johor),
    ("pahang", Kuantan),
    ("kuantan", Kuantan),
    ("terengganu", KualaTerengganu),
    ("kelantan", KotaBharu),
    ("kota bharu", KotaBharu),
    ("kedah", AlorSetar),
    ("alor setar", AlorSetar),
    ("alor star", AlorSetar),
    ("sungai petani", AlorSetar),
    ("langkawi", AlorSetar),
    ("perlis", Kangar),
    ("kangar", Kangar),
    ("sarawak", Kuching),
    ("kuching", Kuching),
];

/// Lower-case and trim a query for matching.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn first_match(table: &'static [(&'static str, ServiceArea)], text: &str) -> Option<GazetteerMatch> {
    table
        .iter()
        .find(|(key, _)| text.contains(key))
        .map(|&(key, area)| GazetteerMatch { key, area })
}

/// Scan the landmark tier. `text` must already be normalized.
pub fn direct_match(text: &str) -> Option<GazetteerMatch> {
    first_match(DIRECT_LOCATIONS, text)
}

/// Scan the state/town tier. `text` must already be normalized.
pub fn state_match(text: &str) -> Option<GazetteerMatch> {
    first_match(STATE_REGIONS, text)
}
