use super::super::metrics::StreetMetrics;
use super::views::{Advisory, AdvisorySeverity};

pub(crate) fn lookup_advisories(metrics: &StreetMetrics) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if metrics.listings == 0 {
        advisories.push(Advisory::new(
            AdvisorySeverity::Warning,
            "No listings",
            "No listings match the selected district, ward and street".to_string(),
        ));
        return advisories;
    }

    if metrics.government_price.is_none() {
        advisories.push(Advisory::new(
            AdvisorySeverity::Warning,
            "Government price missing",
            "No government price found for the selected street (mapping missing); \
             price gap and risk score are unavailable"
                .to_string(),
        ));
    }

    if let Some(gap) = metrics.gap.value.filter(|gap| *gap < 1.0) {
        advisories.push(Advisory::new(
            AdvisorySeverity::Warning,
            "Market reference below government price",
            format!(
                "Price gap {gap:.2} is below 1; this can indicate a mapping or position \
                 mismatch, or listings not comparable to the land price. Review the match \
                 type and listing details"
            ),
        ));
    }

    if metrics.fake_probability.is_none() {
        advisories.push(Advisory::new(
            AdvisorySeverity::Info,
            "Data quality signal missing",
            "No fake probability recorded for these listings; risk score is unavailable"
                .to_string(),
        ));
    }

    if metrics.corrected_government_rows > 0 {
        advisories.push(Advisory::new(
            AdvisorySeverity::Info,
            "Corrected government price",
            format!(
                "{} of {} listing(s) use the corrected government price",
                metrics.corrected_government_rows, metrics.listings
            ),
        ));
    }

    advisories
}

pub(crate) fn tax_advisories(government_price: Option<f64>, area_m2: f64) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if government_price.is_none() {
        advisories.push(Advisory::new(
            AdvisorySeverity::Warning,
            "Government price missing",
            "No government price found for the selected ward/street (mapping missing); \
             choose another street or review unmatched listings"
                .to_string(),
        ));
    }

    if !(area_m2.is_finite() && area_m2 > 0.0) {
        advisories.push(Advisory::new(
            AdvisorySeverity::Warning,
            "Invalid land area",
            format!("Land area must be positive, got {area_m2}"),
        ));
    }

    advisories.push(Advisory::new(
        AdvisorySeverity::Info,
        "Illustrative estimate",
        "Real assessments depend on local thresholds, progressive rates, exemptions and \
         the tax authority's rules"
            .to_string(),
    ));

    advisories
}
