use price_gap::analytics::query::{streets_in, wards_in};
use price_gap::analytics::DistrictFilter;
use price_gap::dataset::{DatasetError, DatasetLoader};
use std::io::Write;
use tempfile::NamedTempFile;

const EXPORT: &str = "\u{feff}District,Ward,Street,Government Unit Price 2026 (million VND/m²),\
\"Market Reference Unit Price (median, million VND/m²)\",Price Gap (MarketRef / GovPrice),\
Fake Probability (data quality),Risk Score,Latitude,Longitude,Source,URL\n\
District 1,Ben Nghe,Le Loi,120,300,2.5,0.2,0.45,10.7731,106.7012,batdongsan,https://example.test/1\n\
District 1,Ben Nghe,Dong Khoi,150,N/A,,,,10.7765,106.7030,,\n\
District 1,Ben Thanh,Le Thanh Ton,,180,,0.9,,,,chotot,\n\
District 10,Ward 12,3 Thang 2,80,160,2.0,0.1,0.3,10.7680,106.6660,,\n";

fn write_export(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file created");
    file.write_all(contents.as_bytes()).expect("export written");
    file
}

#[test]
fn export_with_original_titles_loads_every_row() {
    let file = write_export(EXPORT);

    let dataset = DatasetLoader::from_path(file.path()).expect("dataset loads");

    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.source(), file.path().display().to_string());

    let le_loi = &dataset.listings()[0];
    assert_eq!(le_loi.district.as_deref(), Some("District 1"));
    assert_eq!(le_loi.government_price, Some(120.0));
    assert_eq!(le_loi.market_reference_price, Some(300.0));
    assert_eq!(le_loi.price_gap, Some(2.5));
    assert_eq!(le_loi.risk_score, Some(0.45));
    assert_eq!(le_loi.url.as_deref(), Some("https://example.test/1"));

    let dong_khoi = &dataset.listings()[1];
    assert_eq!(dong_khoi.market_reference_price, None);
    assert_eq!(dong_khoi.fake_probability, None);
    assert_eq!(dong_khoi.source, None);
}

#[test]
fn loaded_rows_drive_the_cascading_selectors() {
    let file = write_export(EXPORT);
    let dataset = DatasetLoader::from_path(file.path()).expect("dataset loads");
    let district = DistrictFilter::parse("1");

    assert_eq!(
        wards_in(dataset.listings(), &district),
        vec!["Ben Nghe", "Ben Thanh"]
    );
    assert_eq!(
        streets_in(dataset.listings(), &district, "Ben Nghe"),
        vec!["Dong Khoi", "Le Loi"]
    );
    assert_eq!(
        wards_in(dataset.listings(), &DistrictFilter::All).len(),
        3,
        "all districts expose every ward"
    );
}

#[test]
fn export_missing_street_column_is_rejected() {
    let file = write_export("District,Ward,Risk Score\nDistrict 1,Ben Nghe,0.4\n");

    let error = DatasetLoader::from_path(file.path()).expect_err("street column required");

    match error {
        DatasetError::MissingColumns(columns) => assert_eq!(columns, vec!["street"]),
        other => panic!("expected missing columns, got {other:?}"),
    }
}

#[test]
fn header_only_export_yields_empty_dataset() {
    let file = write_export("District,Ward,Street\n");

    let dataset = DatasetLoader::from_path(file.path()).expect("dataset loads");

    assert!(dataset.is_empty());
}
