//! Command-line driver for the wildfire spread engine
//!
//! Reads grid points, stations and weather observations from JSON files
//! and prints results as JSON on stdout. Logs go to stderr and follow
//! `RUST_LOG` (default `info`).

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wildfire_spread_core::{
    compute_fuel_ratings, load_stations, ConfigError, FireSpreadService, FuelRating, GeoCoord, GridPoint,
    InMemoryGridProvider, InMemoryWeatherProvider, PointId, ProviderError, SimulationError, SimulationResult,
    SpreadConfig, Station, WeatherObservation,
};

/// Wildfire spread prediction over a terrain point grid
#[derive(Parser, Debug)]
#[command(name = "demo-headless")]
#[command(about = "Wildfire spread simulation driver", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict spread from one ignition point
    Simulate {
        /// Grid point records (JSON array)
        #[arg(short, long)]
        grid: PathBuf,

        /// Ignition point id
        #[arg(short, long)]
        ignition: PointId,

        /// Weather station records (JSON array)
        #[arg(short, long)]
        stations: Option<PathBuf>,

        /// Latest observation per station id (JSON object)
        #[arg(short, long)]
        weather: Option<PathBuf>,

        /// Engine configuration (JSON object, missing fields use defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List grid points, with fuel scores when ratings are given
    Grid {
        /// Grid point records (JSON array)
        #[arg(short, long)]
        grid: PathBuf,

        /// Fuel ratings produced by `rate-fuel`
        #[arg(short, long)]
        ratings: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Compute the fuel rating of every grid point
    RateFuel {
        /// Grid point records (JSON array)
        #[arg(short, long)]
        grid: PathBuf,

        /// Write the ratings here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a rectangular grid and simulate from its center
    Synthetic {
        /// Grid rows (south to north)
        #[arg(long, default_value_t = 41)]
        rows: usize,

        /// Grid columns (west to east)
        #[arg(long, default_value_t = 41)]
        cols: usize,

        /// Point spacing in km
        #[arg(long, default_value_t = 0.5)]
        spacing_km: f64,

        /// Fraction of points on non-combustible land (0-1)
        #[arg(long, default_value_t = 0.1)]
        non_combustible: f64,

        /// Random seed for fuel and soil assignment
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Relative humidity in %
        #[arg(long, default_value_t = 45.0)]
        humidity: f64,

        /// Wind speed in m/s
        #[arg(long, default_value_t = 4.0)]
        wind_speed: f64,

        /// Wind direction in degrees (0=North, 90=East)
        #[arg(long, default_value_t = 0.0)]
        wind_direction: f64,

        /// Print the full result JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot write output: {0}")]
    Write(#[from] io::Error),

    #[error("invalid config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Simulate {
            grid,
            ignition,
            stations,
            weather,
            config,
            output,
            pretty,
        } => {
            let grid = InMemoryGridProvider::from_json_reader(open(&grid)?)?;
            let stations = match stations {
                Some(path) => load_stations(open(&path)?)?,
                None => Vec::new(),
            };
            let weather = match weather {
                Some(path) => InMemoryWeatherProvider::from_json_reader(open(&path)?)?,
                None => InMemoryWeatherProvider::new(),
            };
            let config = match config {
                Some(path) => load_config(&path)?,
                None => SpreadConfig::default(),
            };

            let service = FireSpreadService::new(Arc::new(grid), Arc::new(weather), stations, config)?;
            let result = service.run_simulation(ignition)?;
            write_json(output.as_deref(), &*result, pretty)?;
            service.shutdown();
            Ok(())
        }

        Command::Grid { grid, ratings, pretty } => {
            let mut provider = InMemoryGridProvider::from_json_reader(open(&grid)?)?;
            if let Some(path) = ratings {
                let ratings: Vec<FuelRating> = serde_json::from_reader(open(&path)?).map_err(ProviderError::from)?;
                provider = provider.with_fuel_ratings(&ratings);
            }
            let service = FireSpreadService::new(
                Arc::new(provider),
                Arc::new(InMemoryWeatherProvider::new()),
                Vec::<Station>::new(),
                SpreadConfig::default(),
            )?;
            write_json(None, &service.grid_listing()?, pretty)
        }

        Command::RateFuel { grid, output } => {
            let points: Vec<GridPoint> = serde_json::from_reader(open(&grid)?).map_err(ProviderError::from)?;
            let ratings = compute_fuel_ratings(&points);
            info!(points = points.len(), "fuel ratings computed");
            write_json(output.as_deref(), &ratings, false)
        }

        Command::Synthetic {
            rows,
            cols,
            spacing_km,
            non_combustible,
            seed,
            humidity,
            wind_speed,
            wind_direction,
            json,
        } => {
            let points = synthetic_grid(rows, cols, spacing_km, non_combustible, seed);
            let center = (rows / 2 * cols + cols / 2) as PointId;
            let origin = points
                .get(center as usize)
                .map(|p| p.coordinates)
                .ok_or(SimulationError::NotFound(center))?;
            info!(points = points.len(), ignition = center, "synthetic grid generated");

            let station = Station::new("SYN-1", "Synthetic Station", origin);
            let weather = InMemoryWeatherProvider::new().with_observation(
                "SYN-1",
                WeatherObservation {
                    humidity: Some(humidity),
                    wind_speed: Some(wind_speed),
                    wind_direction: Some(wind_direction),
                },
            );
            let service = FireSpreadService::new(
                Arc::new(InMemoryGridProvider::new(points)),
                Arc::new(weather),
                vec![station],
                SpreadConfig::default(),
            )?;

            let result = service.run_simulation(center)?;
            if json {
                write_json(None, &*result, true)
            } else {
                print_summary(&result, rows * cols);
                Ok(())
            }
        }
    }
}

/// Rectangular grid around (127.5°E, 36.5°N) with random fuel and soil
fn synthetic_grid(rows: usize, cols: usize, spacing_km: f64, non_combustible: f64, seed: u64) -> Vec<GridPoint> {
    const FUEL_CLASSES: [&str; 4] = ["1", "2", "3", "4"];
    const SLOPE_CODES: [&str; 4] = ["01", "04", "10", "99"];

    let mut rng = StdRng::seed_from_u64(seed);
    let step = (spacing_km / wildfire_spread_core::core_types::geodesy::EARTH_RADIUS_KM).to_degrees();
    let non_combustible = non_combustible.clamp(0.0, 1.0);

    let mut points = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let id = (row * cols + col) as PointId;
            let coord = GeoCoord::new(127.5 + col as f64 * step, 36.5 + row as f64 * step);
            let soil = if rng.random_bool(non_combustible) { "91" } else { "01" };
            points.push(
                GridPoint::new(id, coord)
                    .with_fuel_class(FUEL_CLASSES[rng.random_range(0..FUEL_CLASSES.len())])
                    .with_slope_code(SLOPE_CODES[rng.random_range(0..SLOPE_CODES.len())])
                    .with_soil_code(soil),
            );
        }
    }
    points
}

fn print_summary(result: &SimulationResult, total: usize) {
    println!("=== Wildfire Spread Simulation ===\n");
    println!(
        "Weather: humidity {}, wind {} from {} ({:?})",
        result.weather.snapshot.humidity,
        result.weather.snapshot.wind_speed,
        result.weather.snapshot.wind_direction,
        result.weather.source
    );
    println!("Ignited {} of {} points\n", result.features.len(), total);

    println!("{:>8}  {:>8}  {:>12}", "Hour", "Burning", "Area (deg²)");
    for boundary in result.time_boundaries.iter().step_by(6) {
        let burning = result
            .features
            .iter()
            .filter(|f| f.ignition_time <= boundary.time)
            .count();
        println!(
            "{:>8.1}  {:>8}  {:>12.6}",
            boundary.time.to_hours(),
            burning,
            boundary.polygon.area_deg2()
        );
    }

    let stats = &result.stats;
    println!("\nExpanded: {}, beyond horizon: {}", stats.expanded, stats.beyond_horizon);
    println!(
        "Skipped: {} no fuel, {} firebreak, {} weak spread",
        stats.no_fuel, stats.firebreak, stats.weak_spread
    );
    println!("Spotting jumps: {}", stats.spotting_jumps);
}

fn open(path: &Path) -> Result<BufReader<File>, CliError> {
    File::open(path).map(BufReader::new).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(path: &Path) -> Result<SpreadConfig, CliError> {
    serde_json::from_reader(open(path)?).map_err(|source| CliError::ConfigFile {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: serde::Serialize + ?Sized>(output: Option<&Path>, value: &T, pretty: bool) -> Result<(), CliError> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
