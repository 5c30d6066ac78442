use super::domain::{ListingRecord, RankingSignal};
use super::scoring::RiskWeight;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

pub const DEFAULT_TOP_N: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("a district must be selected")]
    DistrictRequired,
    #[error("a ward must be selected")]
    WardRequired,
    #[error("a street must be selected")]
    StreetRequired,
    #[error("top_n must be greater than zero")]
    InvalidTopN,
}

/// District selector, either every district or one district code.
///
/// A code matches a district label when it appears there as a whole token,
/// so `1` matches `District 1` and `Quận 1` but not `District 10`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DistrictFilter {
    #[default]
    All,
    Code(String),
}

impl DistrictFilter {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Code(trimmed.to_string())
        }
    }

    pub fn matches(&self, district: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Code(code) => district.is_some_and(|label| {
                label.trim().eq_ignore_ascii_case(code)
                    || label
                        .split(|ch: char| !ch.is_alphanumeric())
                        .any(|token| token.eq_ignore_ascii_case(code))
            }),
        }
    }
}

impl From<String> for DistrictFilter {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<DistrictFilter> for String {
    fn from(filter: DistrictFilter) -> Self {
        match filter {
            DistrictFilter::All => "All".to_string(),
            DistrictFilter::Code(code) => code,
        }
    }
}

/// Everything a caller selects before running the analytics.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardQuery {
    pub district: DistrictFilter,
    pub ward: Option<String>,
    pub street: Option<String>,
    pub weight_fake: RiskWeight,
    pub ranking_signal: RankingSignal,
    pub top_n: usize,
}

impl Default for DashboardQuery {
    fn default() -> Self {
        Self {
            district: DistrictFilter::All,
            ward: None,
            street: None,
            weight_fake: RiskWeight::default(),
            ranking_signal: RankingSignal::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl DashboardQuery {
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.top_n == 0 {
            return Err(QueryError::InvalidTopN);
        }
        Ok(())
    }

    /// The single street a lookup or tax estimate runs against.
    pub fn street_selection(&self) -> Result<StreetSelection, QueryError> {
        let district = match &self.district {
            DistrictFilter::All => return Err(QueryError::DistrictRequired),
            DistrictFilter::Code(code) => code.clone(),
        };
        let ward = non_blank(self.ward.as_deref()).ok_or(QueryError::WardRequired)?;
        let street = non_blank(self.street.as_deref()).ok_or(QueryError::StreetRequired)?;

        Ok(StreetSelection {
            district,
            ward,
            street,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetSelection {
    pub district: String,
    pub ward: String,
    pub street: String,
}

impl StreetSelection {
    pub fn matches(&self, record: &ListingRecord) -> bool {
        DistrictFilter::Code(self.district.clone()).matches(record.district.as_deref())
            && same_label(record.ward.as_deref(), &self.ward)
            && same_label(record.street.as_deref(), &self.street)
    }
}

fn same_label(value: Option<&str>, expected: &str) -> bool {
    value.is_some_and(|value| value.trim() == expected.trim())
}

pub fn filter_district<'a>(
    records: &'a [ListingRecord],
    district: &DistrictFilter,
) -> Vec<&'a ListingRecord> {
    records
        .iter()
        .filter(|record| district.matches(record.district.as_deref()))
        .collect()
}

pub fn select_street<'a>(
    records: &'a [ListingRecord],
    selection: &StreetSelection,
) -> Vec<&'a ListingRecord> {
    records
        .iter()
        .filter(|record| selection.matches(record))
        .collect()
}

/// Sorted distinct wards within the district.
pub fn wards_in(records: &[ListingRecord], district: &DistrictFilter) -> Vec<String> {
    distinct(
        filter_district(records, district)
            .into_iter()
            .filter_map(|record| record.ward.as_deref()),
    )
}

/// Sorted distinct streets within one ward of the district.
pub fn streets_in(records: &[ListingRecord], district: &DistrictFilter, ward: &str) -> Vec<String> {
    distinct(
        filter_district(records, district)
            .into_iter()
            .filter(|record| same_label(record.ward.as_deref(), ward))
            .filter_map(|record| record.street.as_deref()),
    )
}

fn distinct<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    labels
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
