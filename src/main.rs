mod config;
mod feed;
mod geo;
mod kml;
mod sync;
mod viewer;
mod web;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, BufReader};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::geo::{DistanceUnit, GeographicPoint, WkidProjector};
use crate::kml::LookAtDescriptor;
use crate::sync::{SyncController, ViewPipeline, ViewportSample};

#[derive(Parser)]
#[command(name = "globe-sync")]
#[command(about = "Keep a globe viewer's camera in step with a map viewport")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the viewer poll interval, e.g. "300ms" or "1s"
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    refresh_interval: Option<Duration>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Activate sync and read viewport samples (JSON lines) from stdin
    Run,
    /// Accept viewport samples over HTTP
    Serve,
    /// Print the descriptor for a single viewport sample
    LookAt {
        /// Sample as JSON; read from stdin when omitted
        sample: Option<String>,
    },
    /// Show the descriptor the globe viewer currently sees
    Show,
    /// Great-circle distance between two lon/lat points
    Distance {
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(long, value_enum, default_value_t = UnitArg::Km)]
        unit: UnitArg,
    },
    /// Validate and print the effective configuration
    CheckConfig,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum UnitArg {
    Km,
    Mi,
    Nmi,
}

impl From<UnitArg> for DistanceUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Km => DistanceUnit::Kilometers,
            UnitArg::Mi => DistanceUnit::StatuteMiles,
            UnitArg::Nmi => DistanceUnit::NauticalMiles,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.refresh_interval) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Run => run(config).await,
        Commands::Serve => serve(config).await,
        Commands::LookAt { sample } => look_at(&config, sample).await,
        Commands::Show => show(&config).await,
        Commands::Distance {
            lon1,
            lat1,
            lon2,
            lat2,
            unit,
        } => distance(lon1, lat1, lon2, lat2, unit.into()),
        Commands::CheckConfig => check_config(&config),
    }
}

fn load_config(
    path: Option<&Path>,
    refresh_interval: Option<Duration>,
) -> Result<Config, config::ConfigError> {
    let mut config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(interval) = refresh_interval {
        config.set_refresh_interval(interval);
        config.validate()?;
    }
    Ok(config)
}

async fn run(config: Arc<Config>) -> ExitCode {
    let mut controller = SyncController::new(config, Arc::new(WkidProjector));
    if let Err(e) = controller.activate(None).await {
        eprintln!("Activation failed: {}", e);
        return ExitCode::FAILURE;
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let result = tokio::select! {
        result = feed::run_feed(stdin, &controller) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match result {
        Some(Ok(stats)) => log::info!(
            "Viewport feed closed ({} accepted, {} rejected)",
            stats.accepted,
            stats.rejected
        ),
        Some(Err(e)) => log::error!("Viewport feed stopped: {}", e),
        None => log::info!("Interrupted"),
    }

    match controller.deactivate().await {
        Ok(status) => {
            println!(
                "Sync stopped: {} written, {} failed, {} superseded",
                status.cycles_written, status.cycles_failed, status.cycles_superseded
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Deactivation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: Arc<Config>) -> ExitCode {
    let controller = Arc::new(Mutex::new(SyncController::new(
        config.clone(),
        Arc::new(WkidProjector),
    )));
    let state = web::AppState {
        config,
        controller: controller.clone(),
    };

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        log::info!("Shutting down");
    };

    let served = web::run_server(state, shutdown).await;

    let mut controller = controller.lock().await;
    if controller.is_active() {
        log::info!("Deactivating sync before exit");
    }
    let deactivated = controller.deactivate().await;

    match (served, deactivated) {
        (Ok(()), Ok(_)) => ExitCode::SUCCESS,
        (Err(e), _) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
        (_, Err(e)) => {
            eprintln!("Deactivation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn look_at(config: &Config, sample: Option<String>) -> ExitCode {
    let json = match sample {
        Some(s) => s,
        None => {
            let mut buf = String::new();
            if let Err(e) = tokio::io::stdin().read_to_string(&mut buf).await {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            buf
        }
    };

    let sample: ViewportSample = match serde_json::from_str(&json) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid viewport sample: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = ViewPipeline::new(Arc::new(WkidProjector), config.range_model());
    match pipeline.compute(&sample) {
        Ok(view) => match view.to_kml() {
            Ok(kml) => {
                println!("{}", kml);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Rendering failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("Projection failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn show(config: &Config) -> ExitCode {
    let store = config.store();
    let content = match store.read_view().await {
        Ok(Some(content)) => content,
        Ok(None) => {
            println!("No view descriptor at {} (sync inactive)", store.view_path().display());
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match LookAtDescriptor::from_kml(&content) {
        Ok(view) => {
            println!("{}", store.view_path().display());
            println!("  longitude: {}", view.longitude);
            println!("  latitude:  {}", view.latitude);
            println!("  range:     {} m", view.range);
            println!("  heading:   {}", view.heading);
            println!("  tilt:      {}", view.tilt);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Malformed view descriptor: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64, unit: DistanceUnit) -> ExitCode {
    let d = geo::great_circle_distance(
        GeographicPoint::new(lon1, lat1),
        GeographicPoint::new(lon2, lat2),
        unit,
    );
    println!("{:.3} {}", d, unit);
    ExitCode::SUCCESS
}

fn check_config(config: &Config) -> ExitCode {
    match serde_yaml::to_string(config) {
        Ok(yaml) => {
            println!("Configuration is valid");
            print!("{}", yaml);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error rendering configuration: {}", e);
            ExitCode::FAILURE
        }
    }
}
