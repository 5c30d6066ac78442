use serde::{Deserialize, Serialize};

/// One row of the enriched listings export.
///
/// Every field is optional: cells that are blank, `N/A` or otherwise
/// non-numeric are coerced to `None` at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingRecord {
    pub district: Option<String>,
    pub ward: Option<String>,
    pub street: Option<String>,
    /// Government unit price, million VND/m².
    pub government_price: Option<f64>,
    pub government_price_corrected: Option<f64>,
    /// Median asking unit price of comparable listings, million VND/m².
    pub market_reference_price: Option<f64>,
    pub price_gap: Option<f64>,
    pub price_gap_corrected: Option<f64>,
    pub fake_probability: Option<f64>,
    pub risk_score: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Land area, m².
    pub area: Option<f64>,
    /// Asking price, million VND.
    pub price: Option<f64>,
    /// Asking unit price, million VND/m².
    pub unit_price: Option<f64>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub house_type: Option<String>,
    pub road_width: Option<f64>,
    pub floors: Option<f64>,
    pub match_type: Option<String>,
    pub listing_text: Option<String>,
}

impl ListingRecord {
    /// Returns the grouping key when district, ward and street are all present.
    pub fn street_key(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.district.as_deref()?,
            self.ward.as_deref()?,
            self.street.as_deref()?,
        ))
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// A manually or algorithmically corrected column.
    Corrected,
    /// The raw column as exported.
    Raw,
    /// Recomputed locally from other fields.
    Derived,
}

impl ValueSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Corrected => "corrected",
            Self::Raw => "raw",
            Self::Derived => "derived",
        }
    }
}

/// A value together with the column it was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolved {
    pub value: Option<f64>,
    pub source: ValueSource,
}

impl Resolved {
    pub const fn new(value: Option<f64>, source: ValueSource) -> Self {
        Self { value, source }
    }

    pub fn is_corrected(&self) -> bool {
        self.source == ValueSource::Corrected && self.value.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// The score was undefined.
    Unavailable,
}

impl RiskLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Unavailable => "N/A",
        }
    }
}

/// Signal used to weight map points and order ranking tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingSignal {
    #[default]
    RiskScore,
    PriceGap,
}

impl RankingSignal {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RiskScore => "Risk Score",
            Self::PriceGap => "Price Gap",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value
            .trim()
            .to_ascii_lowercase()
            .replace(['-', ' '], "_")
            .as_str()
        {
            "risk" | "risk_score" => Some(Self::RiskScore),
            "gap" | "price_gap" => Some(Self::PriceGap),
            _ => None,
        }
    }
}
