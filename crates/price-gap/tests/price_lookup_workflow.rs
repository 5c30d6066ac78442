use price_gap::analytics::report::views::AdvisorySeverity;
use price_gap::analytics::{
    price_lookup, tax_report, DashboardQuery, DistrictFilter, ListingRecord, QueryError,
    RiskLevel, RiskWeight, StreetSelection, TaxInputs, TaxRates, TransferTax, ValueSource,
};

fn listing(
    government: Option<f64>,
    corrected: Option<f64>,
    market_reference: Option<f64>,
    fake: Option<f64>,
    unit_price: Option<f64>,
) -> ListingRecord {
    ListingRecord {
        district: Some("District 1".to_string()),
        ward: Some("Ben Nghe".to_string()),
        street: Some("Le Loi".to_string()),
        government_price: government,
        government_price_corrected: corrected,
        market_reference_price: market_reference,
        fake_probability: fake,
        unit_price,
        ..ListingRecord::default()
    }
}

fn le_loi() -> Vec<ListingRecord> {
    let mut elsewhere = listing(Some(40.0), None, Some(400.0), Some(0.9), Some(500.0));
    elsewhere.street = Some("Pasteur".to_string());

    vec![
        listing(Some(100.0), None, Some(250.0), Some(0.4), Some(260.0)),
        listing(Some(100.0), Some(120.0), Some(300.0), Some(0.6), Some(310.0)),
        listing(None, None, Some(200.0), None, Some(190.0)),
        elsewhere,
    ]
}

fn selection() -> StreetSelection {
    StreetSelection {
        district: "1".to_string(),
        ward: "Ben Nghe".to_string(),
        street: "Le Loi".to_string(),
    }
}

fn close(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|value| (value - expected).abs() < 1e-6)
}

#[test]
fn lookup_combines_corrected_and_raw_government_prices() {
    let records = le_loi();

    let report = price_lookup(&records, &selection(), RiskWeight::default());

    assert_eq!(report.metrics.listings, 3);
    assert_eq!(report.metrics.government_price, Some(110.0));
    assert_eq!(report.metrics.corrected_government_rows, 1);
    assert_eq!(report.metrics.market_reference_price, Some(250.0));
    assert!(close(report.metrics.computed_gap, 250.0 / 110.0));
    assert_eq!(report.metrics.gap.source, ValueSource::Derived);
    assert_eq!(report.metrics.fake_probability, Some(0.5));

    let expected_normalized = (250.0_f64 / 110.0).ln() / 4.0_f64.ln();
    assert!(close(report.normalized_gap, expected_normalized));
    assert!(close(report.risk_score, 0.5 * 0.5 + 0.5 * expected_normalized));
    assert_eq!(report.risk_level, RiskLevel::Medium);
    assert_eq!(report.risk_level_label, "Medium");

    let unit_prices: Vec<Option<f64>> = report
        .reference_listings
        .iter()
        .map(|listing| listing.unit_price)
        .collect();
    assert_eq!(unit_prices, vec![Some(310.0), Some(260.0), Some(190.0)]);

    assert!(report
        .advisories
        .iter()
        .any(|advisory| advisory.topic == "Corrected government price"
            && advisory.severity == AdvisorySeverity::Info));
}

#[test]
fn market_below_government_price_is_flagged() {
    let records = vec![listing(Some(200.0), None, Some(150.0), Some(0.1), None)];

    let report = price_lookup(&records, &selection(), RiskWeight::default());

    assert_eq!(report.metrics.computed_gap, Some(0.75));
    assert!(report
        .advisories
        .iter()
        .any(|advisory| advisory.topic == "Market reference below government price"));
}

#[test]
fn negative_government_price_is_not_reported_as_a_gap() {
    let records = vec![listing(Some(-50.0), None, Some(100.0), Some(0.3), None)];

    let report = price_lookup(&records, &selection(), RiskWeight::default());

    assert_eq!(report.metrics.gap.value, None);
    assert_eq!(report.risk_score, None);
    assert!(report
        .advisories
        .iter()
        .all(|advisory| advisory.topic != "Market reference below government price"));
}

#[test]
fn missing_government_price_leaves_everything_undefined() {
    let records = vec![listing(None, None, Some(150.0), Some(0.3), None)];

    let report = price_lookup(&records, &selection(), RiskWeight::default());

    assert_eq!(report.metrics.government_price, None);
    assert_eq!(report.metrics.computed_gap, None);
    assert_eq!(report.normalized_gap, None);
    assert_eq!(report.risk_score, None);
    assert_eq!(report.risk_level, RiskLevel::Unavailable);
    assert_eq!(report.risk_level_label, "N/A");
    assert!(report
        .advisories
        .iter()
        .any(|advisory| advisory.topic == "Government price missing"));
}

#[test]
fn tax_report_uses_street_median_government_price() {
    let records = le_loi();
    let inputs = TaxInputs {
        area_m2: 80.0,
        transfer_price_billion: Some(2.0),
    };

    let report = tax_report(&records, &selection(), inputs, &TaxRates::default());

    assert_eq!(report.government_price, Some(110.0));
    assert!(close(report.estimate.registration_fee, 44.0));
    assert!(close(report.estimate.annual_land_use_tax, 2.64));
    assert!(close(report.estimate.transfer_tax.amount(), 40.0));
    assert!(report
        .advisories
        .iter()
        .any(|advisory| advisory.topic == "Illustrative estimate"));
}

#[test]
fn tax_report_without_transfer_price_marks_it_not_provided() {
    let records = le_loi();

    let report = tax_report(&records, &selection(), TaxInputs::default(), &TaxRates::default());

    assert_eq!(report.area_m2, 80.0);
    assert_eq!(report.estimate.transfer_tax, TransferTax::NotProvided);
}

#[test]
fn query_must_name_a_street_before_lookup() {
    let query = DashboardQuery {
        district: DistrictFilter::parse("1"),
        ward: Some("Ben Nghe".to_string()),
        ..DashboardQuery::default()
    };

    assert_eq!(query.street_selection(), Err(QueryError::StreetRequired));
}

#[test]
fn lookup_is_repeatable() {
    let records = le_loi();
    let weight = RiskWeight::new(0.3).expect("valid weight");

    let first = price_lookup(&records, &selection(), weight);
    let second = price_lookup(&records, &selection(), weight);

    assert_eq!(first, second);
}
