use crate::infra::{parse_signal, parse_weight, AnalysisDefaults};
use clap::Args;
use price_gap::analytics::map::DEFAULT_JITTER_SEED;
use price_gap::analytics::query::{streets_in, wards_in};
use price_gap::analytics::report::views::{Advisory, DashboardReport, PriceLookupReport, TaxReport};
use price_gap::analytics::report::DEFAULT_AREA_M2;
use price_gap::analytics::{
    dashboard, price_lookup, tax_report, DashboardQuery, DistrictFilter, RankingSignal,
    RiskWeight, StreetSelection, TaxInputs, TransferTax,
};
use price_gap::dataset::Dataset;
use price_gap::error::AppError;
use serde::Serialize;

#[derive(Args, Debug)]
pub(crate) struct StreetArgs {
    /// District code, e.g. "1" or "Binh Thanh"
    #[arg(long)]
    pub(crate) district: String,
    #[arg(long)]
    pub(crate) ward: String,
    #[arg(long)]
    pub(crate) street: String,
}

impl StreetArgs {
    fn selection(&self) -> Result<StreetSelection, AppError> {
        let query = DashboardQuery {
            district: DistrictFilter::parse(&self.district),
            ward: Some(self.ward.clone()),
            street: Some(self.street.clone()),
            ..DashboardQuery::default()
        };
        Ok(query.street_selection()?)
    }
}

#[derive(Args, Debug)]
pub(crate) struct LookupArgs {
    #[command(flatten)]
    pub(crate) street: StreetArgs,
    /// Weight on fake probability in the risk score, within [0, 1]
    #[arg(long, value_parser = parse_weight)]
    pub(crate) weight_fake: Option<RiskWeight>,
    /// Print the reference listings behind the medians
    #[arg(long)]
    pub(crate) listings: bool,
    /// Emit the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TaxArgs {
    #[command(flatten)]
    pub(crate) street: StreetArgs,
    /// Land area in m²
    #[arg(long, default_value_t = DEFAULT_AREA_M2)]
    pub(crate) area: f64,
    /// Transfer price in billion VND
    #[arg(long)]
    pub(crate) transfer_price: Option<f64>,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// District code, or "All"
    #[arg(long, default_value = "All")]
    pub(crate) district: String,
    /// Signal for map weights and ranking: "risk" or "gap"
    #[arg(long, value_parser = parse_signal)]
    pub(crate) signal: Option<RankingSignal>,
    #[arg(long, value_parser = parse_weight)]
    pub(crate) weight_fake: Option<RiskWeight>,
    /// Number of streets in the ranking table
    #[arg(long)]
    pub(crate) top_n: Option<usize>,
    /// Spread overlapping map points with seeded noise
    #[arg(long)]
    pub(crate) jitter: bool,
    #[arg(long, default_value_t = DEFAULT_JITTER_SEED)]
    pub(crate) seed: u64,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct WardsArgs {
    #[arg(long, default_value = "All")]
    pub(crate) district: String,
}

#[derive(Args, Debug)]
pub(crate) struct StreetsArgs {
    #[arg(long, default_value = "All")]
    pub(crate) district: String,
    #[arg(long)]
    pub(crate) ward: String,
}

pub(crate) fn run_lookup(
    dataset: &Dataset,
    defaults: &AnalysisDefaults,
    args: LookupArgs,
) -> Result<(), AppError> {
    let selection = args.street.selection()?;
    let weight = args
        .weight_fake
        .unwrap_or(defaults.scoring.default_weight_fake);
    let report = price_lookup(dataset.listings(), &selection, weight);

    if args.json {
        return print_json(&report);
    }
    render_lookup(&report, args.listings);
    Ok(())
}

pub(crate) fn run_tax(
    dataset: &Dataset,
    defaults: &AnalysisDefaults,
    args: TaxArgs,
) -> Result<(), AppError> {
    let selection = args.street.selection()?;
    let inputs = TaxInputs {
        area_m2: args.area,
        transfer_price_billion: args.transfer_price,
    };
    let report = tax_report(dataset.listings(), &selection, inputs, &defaults.tax);

    if args.json {
        return print_json(&report);
    }
    render_tax(&report);
    Ok(())
}

pub(crate) fn run_dashboard(
    dataset: &Dataset,
    defaults: &AnalysisDefaults,
    args: DashboardArgs,
) -> Result<(), AppError> {
    let query = DashboardQuery {
        district: DistrictFilter::parse(&args.district),
        weight_fake: args
            .weight_fake
            .unwrap_or(defaults.scoring.default_weight_fake),
        ranking_signal: args.signal.unwrap_or_default(),
        top_n: args.top_n.unwrap_or(defaults.scoring.ranking_top_n),
        ..DashboardQuery::default()
    };
    let seed = args.jitter.then_some(args.seed);
    let report = dashboard(dataset.listings(), &query, seed)?;

    if args.json {
        return print_json(&report);
    }
    render_dashboard(&report);
    Ok(())
}

pub(crate) fn run_wards(dataset: &Dataset, args: WardsArgs) -> Result<(), AppError> {
    let district = DistrictFilter::parse(&args.district);
    for ward in wards_in(dataset.listings(), &district) {
        println!("{ward}");
    }
    Ok(())
}

pub(crate) fn run_streets(dataset: &Dataset, args: StreetsArgs) -> Result<(), AppError> {
    let district = DistrictFilter::parse(&args.district);
    for street in streets_in(dataset.listings(), &district, &args.ward) {
        println!("{street}");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let body = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{body}");
    Ok(())
}

fn fmt_value(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(value) => format!("{value:.precision$}"),
        None => "N/A".to_string(),
    }
}

fn render_advisories(advisories: &[Advisory]) {
    if advisories.is_empty() {
        return;
    }
    println!("Advisories:");
    for advisory in advisories {
        println!(
            "  - [{}] {}: {}",
            advisory.severity_label, advisory.topic, advisory.detail
        );
    }
}

fn render_lookup(report: &PriceLookupReport, show_listings: bool) {
    let selection = &report.selection;
    let metrics = &report.metrics;
    println!(
        "Price lookup: {} / {} / {}",
        selection.district, selection.ward, selection.street
    );
    println!("- Listings: {}", metrics.listings);
    println!(
        "- Government unit price: {} million VND/m² ({} corrected row(s))",
        fmt_value(metrics.government_price, 2),
        metrics.corrected_government_rows
    );
    println!(
        "- Market reference unit price: {} million VND/m²",
        fmt_value(metrics.market_reference_price, 2)
    );
    println!(
        "- Price gap: {} ({}) | recomputed {} | corrected {}",
        fmt_value(metrics.gap.value, 2),
        metrics.gap.source.label(),
        fmt_value(metrics.computed_gap, 2),
        fmt_value(metrics.corrected_gap, 2)
    );
    println!(
        "- Fake probability: {} | normalized gap: {}",
        fmt_value(metrics.fake_probability, 2),
        fmt_value(report.normalized_gap, 2)
    );
    println!(
        "- Risk score: {} ({}) with weight_fake {:.2}",
        fmt_value(report.risk_score, 2),
        report.risk_level_label,
        report.weight_fake
    );
    render_advisories(&report.advisories);

    if show_listings {
        println!("Reference listings:");
        for listing in &report.reference_listings {
            println!(
                "  - {} | unit {} | area {} | gap {} | risk {} ({})",
                listing.source.as_deref().unwrap_or("unknown source"),
                fmt_value(listing.unit_price, 1),
                fmt_value(listing.area, 1),
                fmt_value(listing.price_gap, 2),
                fmt_value(listing.risk_score, 2),
                listing.risk_level_label
            );
        }
    }
}

fn render_tax(report: &TaxReport) {
    let selection = &report.selection;
    println!(
        "Tax estimate: {} / {} / {}",
        selection.district, selection.ward, selection.street
    );
    println!(
        "- Government unit price: {} million VND/m² | area {:.1} m²",
        fmt_value(report.government_price, 2),
        report.area_m2
    );
    println!(
        "- Registration fee ({:.2}%): {} million VND",
        report.rates.registration * 100.0,
        fmt_value(report.estimate.registration_fee, 2)
    );
    println!(
        "- Annual land use tax ({:.2}%): {} million VND",
        report.rates.land_use * 100.0,
        fmt_value(report.estimate.annual_land_use_tax, 2)
    );
    match report.estimate.transfer_tax {
        TransferTax::Estimated(amount) => println!(
            "- Transfer income tax ({:.0}%): {amount:.2} million VND",
            report.rates.transfer * 100.0
        ),
        TransferTax::NotProvided => println!("- Transfer income tax: transfer price not provided"),
    }
    render_advisories(&report.advisories);
}

fn render_dashboard(report: &DashboardReport) {
    println!(
        "Dashboard for district '{}' by {} (weight_fake {:.2})",
        String::from(report.district.clone()),
        report.signal_label,
        report.weight_fake
    );
    println!(
        "- {} listing(s) with coordinates | map centre {}, {}",
        report.listings_with_coordinates,
        fmt_value(report.map.center_latitude, 5),
        fmt_value(report.map.center_longitude, 5)
    );
    println!("Risk levels:");
    for entry in &report.risk_levels {
        println!("  - {}: {}", entry.level_label, entry.listings);
    }
    println!("Street ranking:");
    for (index, row) in report.ranking.iter().enumerate() {
        println!(
            "  {:>2}. {} / {} / {} | {} listing(s) | median gap {} | mean risk {}",
            index + 1,
            row.district,
            row.ward,
            row.street,
            row.listings,
            fmt_value(row.median_price_gap, 2),
            fmt_value(row.mean_risk_score, 2)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_render_as_not_available() {
        assert_eq!(fmt_value(None, 2), "N/A");
        assert_eq!(fmt_value(Some(2.3456), 2), "2.35");
    }

    #[test]
    fn blank_ward_is_rejected_before_lookup() {
        let args = StreetArgs {
            district: "1".to_string(),
            ward: " ".to_string(),
            street: "Le Loi".to_string(),
        };

        assert!(matches!(
            args.selection(),
            Err(AppError::Query(price_gap::analytics::QueryError::WardRequired))
        ));
    }
}
