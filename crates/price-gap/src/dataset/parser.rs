use super::mapping::{canonical_header, REQUIRED_COLUMNS};
use super::normalizer::{normalize_header, normalize_text};
use crate::analytics::metrics::coerce_numeric;
use crate::analytics::ListingRecord;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::io::Read;

#[derive(Debug)]
pub(crate) struct ParsedListings {
    pub(crate) records: Vec<ListingRecord>,
    pub(crate) unrecognized_headers: Vec<String>,
    pub(crate) missing_columns: Vec<&'static str>,
}

pub(crate) fn parse_listings<R: Read>(reader: R) -> Result<ParsedListings, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let raw_headers = csv_reader.headers()?.clone();
    let mut seen: HashSet<&'static str> = HashSet::new();
    let mut unrecognized_headers = Vec::new();
    let canonical: csv::StringRecord = raw_headers
        .iter()
        .map(|header| match canonical_header(header) {
            Some(name) if seen.insert(name) => name.to_string(),
            Some(_) => format!("duplicate:{}", normalize_header(header)),
            None => {
                unrecognized_headers.push(header.to_string());
                format!("unmapped:{}", normalize_header(header))
            }
        })
        .collect();

    let missing_columns = REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| !seen.contains(column))
        .collect();

    csv_reader.set_headers(canonical);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<ListingRow>() {
        records.push(row?.into_record());
    }

    Ok(ParsedListings {
        records,
        unrecognized_headers,
        missing_columns,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListingRow {
    #[serde(deserialize_with = "lenient_text")]
    district: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    ward: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    street: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    government_price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    government_price_corrected: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    market_reference_price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    price_gap: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    price_gap_corrected: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    fake_probability: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    risk_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    longitude: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    area: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    price: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    unit_price: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    source: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    url: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    house_type: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    road_width: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    floors: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    match_type: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    listing_text: Option<String>,
}

impl ListingRow {
    fn into_record(self) -> ListingRecord {
        ListingRecord {
            district: self.district,
            ward: self.ward,
            street: self.street,
            government_price: self.government_price,
            government_price_corrected: self.government_price_corrected,
            market_reference_price: self.market_reference_price,
            price_gap: self.price_gap,
            price_gap_corrected: self.price_gap_corrected,
            fake_probability: self.fake_probability,
            risk_score: self.risk_score,
            latitude: self.latitude,
            longitude: self.longitude,
            area: self.area,
            price: self.price,
            unit_price: self.unit_price,
            source: self.source,
            url: self.url,
            house_type: self.house_type,
            road_width: self.road_width,
            floors: self.floors,
            match_type: self.match_type,
            listing_text: self.listing_text,
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(coerce_numeric))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.as_deref().and_then(normalize_text))
}
