use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rocket_cli::SourceArgs;
use rocket_cli::logger::{self, LogLevel};
use rocket_simulation::export::{mission, trajectory, writer_for_path};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Simulate a Hohmann transfer from Earth and print mission metrics"
)]
struct Cli {
    /// Target planet name (case-insensitive)
    #[arg(long, default_value = "mars")]
    target: String,

    /// Samples along the transfer (clamped to the configured range)
    #[arg(long)]
    steps: Option<i64>,

    #[command(flatten)]
    sources: SourceArgs,

    /// Write mission positions as JSON (`-` for stdout)
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Write the per-step trajectory as CSV (`-` for stdout)
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Also print gravity-assist routes and launch windows for the target
    #[arg(long, default_value_t = false)]
    extras: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_level)?;

    let simulator = cli.sources.simulator()?;
    let profile = simulator.simulate(&cli.target, cli.steps)?;
    let traj = &profile.trajectory;

    println!("=== Mission Metrics: Earth to {} ===", profile.target);
    println!("Transfer time  : {:.0} days", traj.transfer_time_days);
    println!("Max distance   : {:.2} AU", traj.max_distance_au);
    println!(
        "Transfer orbit : a = {:.3} AU, e = {:.4}",
        traj.orbit.semi_major_axis_au, traj.orbit.eccentricity
    );
    println!("Samples        : {}", traj.len());
    if let Some(fuel) = &profile.fuel {
        println!(
            "Delta-v        : {:.3} km/s departure + {:.3} km/s arrival = {:.3} km/s",
            fuel.departure_dv_km_s, fuel.arrival_dv_km_s, fuel.total_dv_km_s
        );
        println!(
            "Fuel           : {:.1} kg (total {:.1} kg, ratio {:.3})",
            fuel.fuel_mass_kg, fuel.total_mass_kg, fuel.fuel_ratio
        );
    }
    println!("Efficiency     : {:.1}/100", profile.efficiency);
    if let Some(historical) = &profile.historical {
        println!("Historical comparison:");
        for cmp in historical {
            println!(
                "  - {:<16} actual {:>7.0} d, accuracy {:5.1}%",
                cmp.mission_name, cmp.actual_duration, cmp.accuracy
            );
        }
    }

    if cli.extras {
        match simulator.gravity_assist(&profile.target) {
            Ok(routes) => {
                println!("Gravity-assist routes:");
                for route in routes {
                    println!(
                        "  - {:<32} Δv {:6.2} km/s, efficiency {:5.1}",
                        route.route.join(" -> "),
                        route.total_dv_km_s,
                        route.efficiency
                    );
                }
            }
            Err(err) => log::warn!("gravity assist skipped: {err}"),
        }
        match simulator.launch_windows(&profile.target) {
            Ok(windows) => {
                println!("Launch windows:");
                for w in windows {
                    println!(
                        "  #{} launch {} arrive {} ({} days)",
                        w.window_number, w.launch_date, w.arrival_date, w.transfer_days
                    );
                }
            }
            Err(err) => log::warn!("launch windows skipped: {err}"),
        }
    }

    if let Some(path) = &cli.export_json {
        let mut writer = writer_for_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        mission::write_json(&mut writer, &profile.target, traj)?;
        eprintln!("Data exported to {}", path.display());
    }
    if let Some(path) = &cli.export_csv {
        let mut writer = writer_for_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        trajectory::write_csv(&mut writer, traj)?;
        eprintln!("Trajectory exported to {}", path.display());
    }

    Ok(())
}
