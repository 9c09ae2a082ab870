//! nearby - geospatial proximity tools
//!
//! Distances, bounding boxes, proximity search over JSON entity files,
//! straight-line routes, ETAs and isochrone radii from the command line.

use clap::{Parser, Subcommand};
use nearby_cli::output::{print_error, print_json, Status};
use nearby_core::config::Config;
use nearby_telemetry::TelemetryConfig;
use std::path::PathBuf;
use std::process::ExitCode;

mod args;
mod commands;
mod context;

use args::LatLng;
use commands::{bbox, distance, eta, isochrone, route, search};
use context::Context;

/// Geospatial proximity tools
#[derive(Parser)]
#[command(name = "nearby")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Emit JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file (defaults to .nearby.toml and friends)
    #[arg(short, long, global = true, env = "NEARBY_CONFIG")]
    config: Option<PathBuf>,

    /// Print collected metrics after the command
    #[arg(long, global = true)]
    stats: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Great-circle distance and bearing between two points
    Distance {
        /// Start as LAT,LNG
        #[arg(allow_hyphen_values = true)]
        from: LatLng,

        /// End as LAT,LNG
        #[arg(allow_hyphen_values = true)]
        to: LatLng,

        /// Also show the equirectangular approximation
        #[arg(long)]
        approximate: bool,
    },

    /// Bounding box covering a radius around a point
    Bbox {
        /// Center as LAT,LNG
        #[arg(allow_hyphen_values = true)]
        center: LatLng,

        /// Radius in kilometers
        #[arg(short, long)]
        radius: f64,
    },

    /// Search a JSON array of entities around a point
    Search(search::SearchArgs),

    /// Travel time and arrival estimate between two points
    Eta {
        /// Start as LAT,LNG
        #[arg(allow_hyphen_values = true)]
        from: LatLng,

        /// End as LAT,LNG
        #[arg(allow_hyphen_values = true)]
        to: LatLng,

        /// walking, cycling, driving or transit
        #[arg(short, long)]
        mode: Option<nearby_travel::TravelMode>,

        /// Departure time (RFC 3339); defaults to now
        #[arg(short, long)]
        depart: Option<String>,
    },

    /// Straight-line route with turn-by-turn directions
    Route(route::RouteArgs),

    /// Reachable radius for one or more time budgets
    Isochrone {
        /// Center as LAT,LNG
        #[arg(allow_hyphen_values = true)]
        center: LatLng,

        /// Time budgets in minutes, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        minutes: Vec<u32>,

        /// walking, cycling, driving or transit
        #[arg(short, long)]
        mode: Option<nearby_travel::TravelMode>,

        /// Hour of day (0-23); defaults to the configured or current hour
        #[arg(long)]
        hour: Option<u8>,

        /// Also emit a closed polygon with this many sides per budget
        #[arg(long)]
        ring: Option<usize>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e, cli.json);
            return exit_code(e.exit_code());
        }
    };

    let telemetry = &config.schema.telemetry;
    let log_level = if cli.verbose { "debug".to_string() } else { telemetry.log_level.clone() };
    if let Err(e) = nearby_telemetry::init_with_config(TelemetryConfig {
        log_level,
        json: telemetry.json,
        ..TelemetryConfig::default()
    }) {
        Status::warning(&format!("Logging disabled: {}", e));
    }
    if let Some(path) = &config.path {
        tracing::debug!(path = %path.display(), "Loaded configuration");
    }

    let ctx = Context::new(config, cli.json);
    let result = match cli.command {
        Commands::Distance { from, to, approximate } => distance::run(&ctx, from.0, to.0, approximate),
        Commands::Bbox { center, radius } => bbox::run(&ctx, center.0, radius),
        Commands::Search(args) => search::run(&ctx, args),
        Commands::Eta { from, to, mode, depart } => eta::run(&ctx, from.0, to.0, mode, depart.as_deref()),
        Commands::Route(args) => route::run(&ctx, args),
        Commands::Isochrone { center, minutes, mode, hour, ring } => {
            isochrone::run(&ctx, center.0, &minutes, mode, hour, ring)
        }
    };

    if cli.stats {
        if let Err(e) = print_stats(cli.json) {
            Status::warning(&format!("Could not print metrics: {}", e));
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let error = commands::into_core_error(e);
            print_error(&error, cli.json);
            exit_code(error.exit_code())
        }
    }
}

fn print_stats(json: bool) -> std::io::Result<()> {
    let metrics = nearby_telemetry::metrics().export_json();
    if json {
        print_json(&serde_json::json!({ "metrics": metrics }))
    } else {
        Status::header("Metrics");
        print_json(&metrics)
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
