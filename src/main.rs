use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fare_estimator::InvalidInput;
use fare_estimator::estimator::{DistanceSource, Estimator, EstimatorConfig, TripRequest};
use fare_estimator::fare::{FareContext, compute_fare_lookup};
use fare_estimator::haversine::StraightLineRouter;
use fare_estimator::map::RouteMap;
use fare_estimator::model::ModelConfig;
use fare_estimator::nominatim::{NominatimClient, NominatimConfig};
use fare_estimator::osrm::{OsrmClient, OsrmConfig};
use fare_estimator::render::{render_fare_cards, render_trip_summary};
use fare_estimator::ride::{RideRequest, parse_date, parse_time};
use fare_estimator::traits::{Geocoder, RouteProvider};

#[derive(Debug, Parser)]
#[command(author, version, about = "Estimate ride fares per vehicle tier")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List address candidates for a free-text query
    Suggest {
        query: String,
        #[command(flatten)]
        services: ServiceArgs,
    },
    /// Geocode, route and price a trip
    Estimate(EstimateArgs),
    /// Price a ride from a known distance, without any network calls
    Price(PriceArgs),
}

#[derive(Debug, Args)]
struct ServiceArgs {
    #[arg(long, env = "NOMINATIM_URL", default_value = "https://nominatim.openstreetmap.org")]
    nominatim_url: String,
    #[arg(long, env = "NOMINATIM_USER_AGENT", default_value = "location_app")]
    user_agent: String,
    #[arg(long, env = "OSRM_URL", default_value = "http://router.project-osrm.org")]
    osrm_url: String,
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
    /// Maximum number of address candidates
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

#[derive(Debug, Args)]
struct ModelArgs {
    /// Path to the JSON model artifact
    #[arg(long, env = "FARE_MODEL", default_value = "UBER_model.json")]
    model: PathBuf,
    /// Report negative predictions as $0.00
    #[arg(long)]
    clamp_negative: bool,
}

impl ModelArgs {
    fn context(&self) -> FareContext {
        FareContext::load(&ModelConfig {
            artifact_path: self.model.clone(),
            clamp_negative: self.clamp_negative,
        })
    }
}

#[derive(Debug, Args)]
struct RideArgs {
    /// Pickup date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<String>,
    /// Pickup time (HH:MM), defaults to now
    #[arg(long)]
    time: Option<String>,
    #[arg(long, default_value_t = 1)]
    passengers: u32,
}

impl RideArgs {
    fn when(&self) -> Result<(NaiveDate, NaiveTime), InvalidInput> {
        let now = Local::now();
        let date = match &self.date {
            Some(raw) => parse_date(raw)?,
            None => now.date_naive(),
        };
        let time = match &self.time {
            Some(raw) => parse_time(raw)?,
            None => NaiveTime::from_hms_opt(now.hour(), now.minute(), 0)
                .ok_or_else(|| InvalidInput::Time(now.format("%H:%M").to_string()))?,
        };
        Ok((date, time))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DistanceArg {
    Geodesic,
    Road,
}

#[derive(Debug, Args)]
struct EstimateArgs {
    #[arg(long)]
    pickup: String,
    #[arg(long)]
    dropoff: String,
    /// Which pickup suggestion to use (0 = best match)
    #[arg(long, default_value_t = 0)]
    pickup_choice: usize,
    #[arg(long, default_value_t = 0)]
    dropoff_choice: usize,
    #[arg(long, value_enum, default_value_t = DistanceArg::Geodesic)]
    distance: DistanceArg,
    /// Draw a straight line instead of asking OSRM for a route
    #[arg(long)]
    offline_route: bool,
    /// Write the route map as GeoJSON
    #[arg(long)]
    map_out: Option<PathBuf>,
    #[command(flatten)]
    ride: RideArgs,
    #[command(flatten)]
    model: ModelArgs,
    #[command(flatten)]
    services: ServiceArgs,
}

#[derive(Debug, Args)]
struct PriceArgs {
    #[arg(long)]
    distance_km: f64,
    /// Print the fares as JSON
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    ride: RideArgs,
    #[command(flatten)]
    model: ModelArgs,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Suggest { query, services } => suggest(&query, &services),
        Command::Estimate(args) => estimate(&args),
        Command::Price(args) => price(&args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn geocoder(services: &ServiceArgs) -> Result<NominatimClient, reqwest::Error> {
    NominatimClient::new(NominatimConfig {
        base_url: services.nominatim_url.clone(),
        user_agent: services.user_agent.clone(),
        timeout_secs: services.timeout_secs,
    })
}

fn estimator_config(services: &ServiceArgs, distance: DistanceArg) -> EstimatorConfig {
    EstimatorConfig {
        suggestion_limit: services.limit,
        distance_source: match distance {
            DistanceArg::Geodesic => DistanceSource::Geodesic,
            DistanceArg::Road => DistanceSource::Road,
        },
    }
}

fn suggest(query: &str, services: &ServiceArgs) -> CliResult {
    let places = geocoder(services)?.search(query, services.limit)?;
    if places.is_empty() {
        println!("No suggestions found for {:?}", query);
    }
    for (index, place) in places.iter().enumerate() {
        println!("[{}] {} ({:.6},{:.6})", index, place.address, place.lat, place.lng);
    }
    Ok(())
}

fn estimate(args: &EstimateArgs) -> CliResult {
    let geocoder = geocoder(&args.services)?;
    let fares = args.model.context();
    let config = estimator_config(&args.services, args.distance);

    if args.offline_route {
        run_estimate(Estimator::new(geocoder, StraightLineRouter::default(), fares, config), args)
    } else {
        let router = OsrmClient::new(OsrmConfig {
            base_url: args.services.osrm_url.clone(),
            timeout_secs: args.services.timeout_secs,
            ..OsrmConfig::default()
        })?;
        run_estimate(Estimator::new(geocoder, router, fares, config), args)
    }
}

fn run_estimate<R: RouteProvider>(estimator: Estimator<NominatimClient, R>, args: &EstimateArgs) -> CliResult {
    let (pickup_date, pickup_time) = args.ride.when()?;
    let trip = TripRequest {
        pickup: estimator.resolve("pickup", &args.pickup, args.pickup_choice)?,
        dropoff: estimator.resolve("dropoff", &args.dropoff, args.dropoff_choice)?,
        pickup_date,
        pickup_time,
        passenger_count: args.ride.passengers,
    };

    let estimate = estimator.estimate(&trip)?;
    print!("{}", render_trip_summary(&estimate));
    println!();
    print!("{}", render_fare_cards(&estimate.fares));

    if let Some(path) = &args.map_out {
        let map = RouteMap::from_estimate(&estimate);
        fs::write(path, serde_json::to_string_pretty(&map.to_geojson())?)?;
        tracing::info!("wrote route map to {}", path.display());
    }
    Ok(())
}

fn price(args: &PriceArgs) -> CliResult {
    let (pickup_date, pickup_time) = args.ride.when()?;
    let request = RideRequest::new(args.ride.passengers, pickup_date, pickup_time, args.distance_km)?;
    let fares = compute_fare_lookup(&args.model.context(), &request);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&fares)?);
    } else {
        print!("{}", render_fare_cards(&fares));
    }
    Ok(())
}
