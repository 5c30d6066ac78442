//! Loading the enriched listings export into an immutable [`Dataset`].

mod mapping;
mod normalizer;
mod parser;

use crate::analytics::ListingRecord;
use chrono::{DateTime, Utc};
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumns(Vec<&'static str>),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Io(err) => write!(f, "failed to read listings export: {}", err),
            DatasetError::Csv(err) => write!(f, "invalid listings CSV data: {}", err),
            DatasetError::MissingColumns(columns) => write!(
                f,
                "listings export is missing required column(s): {}",
                columns.join(", ")
            ),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(err) => Some(err),
            DatasetError::Csv(err) => Some(err),
            DatasetError::MissingColumns(_) => None,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Read-only listings table, loaded once and shared by reference.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: String,
    loaded_at: DateTime<Utc>,
    listings: Vec<ListingRecord>,
}

impl Dataset {
    pub fn from_records(source: impl Into<String>, listings: Vec<ListingRecord>) -> Self {
        Self {
            source: source.into(),
            loaded_at: Utc::now(),
            listings,
        }
    }

    pub fn listings(&self) -> &[ListingRecord] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

pub struct DatasetLoader;

impl DatasetLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, path.display().to_string())
    }

    pub fn from_reader<R: Read>(
        reader: R,
        source: impl Into<String>,
    ) -> Result<Dataset, DatasetError> {
        let source = source.into();
        let parsed = parser::parse_listings(reader)?;

        if !parsed.missing_columns.is_empty() {
            return Err(DatasetError::MissingColumns(parsed.missing_columns));
        }

        if !parsed.unrecognized_headers.is_empty() {
            debug!(
                headers = ?parsed.unrecognized_headers,
                "ignoring unrecognized listing columns"
            );
        }

        let dataset = Dataset::from_records(source, parsed.records);
        if dataset.is_empty() {
            warn!(source = %dataset.source(), "listings export contains no rows");
        }
        info!(
            source = %dataset.source(),
            listings = dataset.len(),
            loaded_at = %dataset.loaded_at().to_rfc3339(),
            "listings dataset loaded"
        );

        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "District,Ward,Street,Government Unit Price 2026 (million VND/m²),\
Gov Price 2026 Corrected (million VND/m²),\"Market Reference Unit Price (median, million VND/m²)\",\
Price Gap Corrected,Fake Probability (data quality),Latitude,Longitude,Notes";

    #[test]
    fn normalize_header_folds_case_and_whitespace() {
        let normalized = normalizer::normalize_header("\u{feff}Price  Gap   Corrected");
        assert_eq!(normalized, "price gap corrected");
    }

    #[test]
    fn mapping_recognizes_long_and_short_titles() {
        assert_eq!(
            mapping::lookup_for_tests("Government Unit Price 2026 (million VND/m²)"),
            Some("government_price")
        );
        assert_eq!(
            mapping::lookup_for_tests("gov price 2026 corrected"),
            Some("government_price_corrected")
        );
        assert_eq!(
            mapping::lookup_for_tests("Price Gap (MarketRef / GovPrice)"),
            Some("price_gap")
        );
        assert_eq!(mapping::lookup_for_tests("fake_probability"), Some("fake_probability"));
        assert_eq!(mapping::lookup_for_tests("Notes"), None);
    }

    #[test]
    fn loader_coerces_non_numeric_cells_to_missing() {
        let csv = format!(
            "{HEADER}\n\
District 1,Ben Nghe,Le Loi,N/A,,250.5,1.8,0.2,10.7731,106.7012,ok\n\
District 1,Ben Nghe,Le Loi,120,130,abc,,,,,\n"
        );

        let dataset = DatasetLoader::from_reader(Cursor::new(csv), "inline").expect("loads");
        let rows = dataset.listings();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].government_price, None);
        assert_eq!(rows[0].government_price_corrected, None);
        assert_eq!(rows[0].market_reference_price, Some(250.5));
        assert_eq!(rows[0].price_gap_corrected, Some(1.8));
        assert_eq!(rows[0].coordinates(), Some((10.7731, 106.7012)));
        assert_eq!(rows[1].government_price, Some(120.0));
        assert_eq!(rows[1].government_price_corrected, Some(130.0));
        assert_eq!(rows[1].market_reference_price, None);
        assert_eq!(rows[1].fake_probability, None);
    }

    #[test]
    fn loader_rejects_exports_without_grouping_columns() {
        let csv = "District,Street,Risk Score\nDistrict 1,Le Loi,0.4\n";
        let error = DatasetLoader::from_reader(Cursor::new(csv), "inline").expect_err("rejected");

        match error {
            DatasetError::MissingColumns(columns) => assert_eq!(columns, vec!["ward"]),
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn short_rows_leave_trailing_cells_missing() {
        let csv = "District,Ward,Street,Risk Score,Latitude\n\
District 1,Ben Nghe,Le Loi\n\
District 1,Ben Nghe,Dong Khoi,0.4,10.77\n";

        let dataset = DatasetLoader::from_reader(Cursor::new(csv), "inline").expect("loads");
        let rows = dataset.listings();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].street.as_deref(), Some("Le Loi"));
        assert_eq!(rows[0].risk_score, None);
        assert_eq!(rows[0].latitude, None);
        assert_eq!(rows[1].risk_score, Some(0.4));
    }

    #[test]
    fn duplicate_aliases_keep_the_first_column() {
        let csv = "District,Ward,Street,Price Gap,Price Gap (MarketRef / GovPrice)\nD1,W,S,1.5,9.9\n";
        let dataset = DatasetLoader::from_reader(Cursor::new(csv), "inline").expect("loads");
        assert_eq!(dataset.listings()[0].price_gap, Some(1.5));
    }

    #[test]
    fn loader_from_path_propagates_io_errors() {
        let error = DatasetLoader::from_path("./does-not-exist.csv").expect_err("io error");

        match error {
            DatasetError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
