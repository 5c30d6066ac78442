use super::normalizer::normalize_header;
use std::collections::HashMap;
use std::sync::OnceLock;

pub(crate) const DISTRICT: &str = "district";
pub(crate) const WARD: &str = "ward";
pub(crate) const STREET: &str = "street";

/// Grouping columns every export must carry.
pub(crate) const REQUIRED_COLUMNS: [&str; 3] = [DISTRICT, WARD, STREET];

static HEADER_MAP: OnceLock<HashMap<String, &'static str>> = OnceLock::new();

/// Canonical field name for an export header, if the header is recognized.
pub(crate) fn canonical_header(raw: &str) -> Option<&'static str> {
    header_map().get(&normalize_header(raw)).copied()
}

fn header_map() -> &'static HashMap<String, &'static str> {
    HEADER_MAP.get_or_init(|| {
        const ALIASES: &[(&str, &str)] = &[
            // Location
            ("District", DISTRICT),
            ("Ward", WARD),
            ("Street", STREET),
            ("Latitude", "latitude"),
            ("Lat", "latitude"),
            ("Longitude", "longitude"),
            ("Lon", "longitude"),
            ("Lng", "longitude"),
            // Government price
            (
                "Government Unit Price 2026 (million VND/m²)",
                "government_price",
            ),
            ("Government Unit Price (million VND/m²)", "government_price"),
            ("Gov Price 2026", "government_price"),
            ("Government Price", "government_price"),
            (
                "Gov Price 2026 Corrected (million VND/m²)",
                "government_price_corrected",
            ),
            ("Gov Price 2026 Corrected", "government_price_corrected"),
            ("Government Price Corrected", "government_price_corrected"),
            // Market reference and gap
            (
                "Market Reference Unit Price (median, million VND/m²)",
                "market_reference_price",
            ),
            ("Market Reference Price", "market_reference_price"),
            ("Market Reference", "market_reference_price"),
            ("Price Gap (MarketRef / GovPrice)", "price_gap"),
            ("Price Gap", "price_gap"),
            ("Price Gap Corrected", "price_gap_corrected"),
            // Scoring
            ("Fake Probability (data quality)", "fake_probability"),
            ("Fake Probability", "fake_probability"),
            ("Risk Score", "risk_score"),
            // Listing details
            ("Area (m²)", "area"),
            ("Area (m2)", "area"),
            ("Area", "area"),
            ("Price (million VND)", "price"),
            ("Price", "price"),
            ("Unit Price (million VND/m²)", "unit_price"),
            ("Unit Price", "unit_price"),
            ("Source", "source"),
            ("URL", "url"),
            ("House Type", "house_type"),
            ("Road/Alley Width (m)", "road_width"),
            ("Road Width", "road_width"),
            ("Floors", "floors"),
            ("Gov Price Match Type", "match_type"),
            ("Match Type", "match_type"),
            ("Listing Text", "listing_text"),
        ];

        const CANONICAL: &[&str] = &[
            DISTRICT,
            WARD,
            STREET,
            "latitude",
            "longitude",
            "government_price",
            "government_price_corrected",
            "market_reference_price",
            "price_gap",
            "price_gap_corrected",
            "fake_probability",
            "risk_score",
            "area",
            "price",
            "unit_price",
            "source",
            "url",
            "house_type",
            "road_width",
            "floors",
            "match_type",
            "listing_text",
        ];

        let mut map = HashMap::with_capacity(ALIASES.len() + CANONICAL.len());
        for canonical in CANONICAL {
            map.insert(normalize_header(canonical), *canonical);
        }
        for (alias, canonical) in ALIASES {
            map.insert(normalize_header(alias), *canonical);
        }
        map
    })
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(header: &str) -> Option<&'static str> {
    canonical_header(header)
}
