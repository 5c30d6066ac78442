use crate::commands::{
    run_dashboard, run_lookup, run_streets, run_tax, run_wards, DashboardArgs, LookupArgs,
    StreetsArgs, TaxArgs, WardsArgs,
};
use crate::infra::{load_dataset, AnalysisDefaults};
use crate::server;
use clap::{Args, Parser, Subcommand};
use price_gap::config::AppConfig;
use price_gap::dataset::Dataset;
use price_gap::error::AppError;
use price_gap::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "price-gap",
    about = "Compare government land prices with market references and score the divergence",
    version
)]
struct Cli {
    /// Listings export (CSV) to load instead of the configured dataset
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Median prices, price gap and risk score for one street
    Lookup(LookupArgs),
    /// Illustrative registration, land use and transfer tax estimates
    Tax(TaxArgs),
    /// Street ranking, risk level counts and map summary for a district
    Dashboard(DashboardArgs),
    /// List the wards of a district
    Wards(WardsArgs),
    /// List the streets of a ward
    Streets(StreetsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let dataset = cli.dataset;
    match command {
        Command::Serve(args) => server::run(config, args, dataset).await,
        Command::Lookup(args) => with_dataset(&config, dataset, |listings, defaults| {
            run_lookup(listings, defaults, args)
        }),
        Command::Tax(args) => with_dataset(&config, dataset, |listings, defaults| {
            run_tax(listings, defaults, args)
        }),
        Command::Dashboard(args) => with_dataset(&config, dataset, |listings, defaults| {
            run_dashboard(listings, defaults, args)
        }),
        Command::Wards(args) => {
            with_dataset(&config, dataset, |listings, _| run_wards(listings, args))
        }
        Command::Streets(args) => {
            with_dataset(&config, dataset, |listings, _| run_streets(listings, args))
        }
    }
}

fn with_dataset<F>(
    config: &AppConfig,
    dataset_override: Option<PathBuf>,
    report: F,
) -> Result<(), AppError>
where
    F: FnOnce(&Dataset, &AnalysisDefaults) -> Result<(), AppError>,
{
    let dataset = load_dataset(config, dataset_override)?;
    report(dataset.as_ref(), &AnalysisDefaults::from_config(config))
}
