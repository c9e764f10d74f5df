//! Export helpers for JSON mission data and CSV trajectories.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod mission {
    use serde::Serialize;
    use std::io::Write;

    use rocket_core::vector::Point2;
    use rocket_orbits::Trajectory;

    use super::ExportError;

    #[derive(Debug, Serialize)]
    pub struct Positions<'a> {
        pub earth: &'a [Point2],
        pub target: &'a [Point2],
        pub rocket: &'a [Point2],
    }

    /// Mission data document consumed by visualisation clients.
    #[derive(Debug, Serialize)]
    pub struct MissionData<'a> {
        pub mission: String,
        pub transfer_time_days: f64,
        pub max_distance: f64,
        pub positions: Positions<'a>,
    }

    impl<'a> MissionData<'a> {
        pub fn new(target: &str, trajectory: &'a Trajectory) -> Self {
            Self {
                mission: format!("Earth to {target}"),
                transfer_time_days: trajectory.transfer_time_days,
                max_distance: trajectory.max_distance_au,
                positions: Positions {
                    earth: &trajectory.departure,
                    target: &trajectory.target,
                    rocket: &trajectory.rocket,
                },
            }
        }
    }

    /// Write the pretty-printed mission document.
    pub fn write_json(
        writer: &mut dyn Write,
        target: &str,
        trajectory: &Trajectory,
    ) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(&mut *writer, &MissionData::new(target, trajectory))?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

pub mod trajectory {
    use std::io::{self, Write};

    use rocket_core::vector;
    use rocket_orbits::Trajectory;

    const HEADER: &str =
        "step,time_days,earth_x_au,earth_y_au,target_x_au,target_y_au,rocket_x_au,rocket_y_au,rocket_r_au";

    /// Write the standard trajectory CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{HEADER}")
    }

    /// One row per sample, times spread uniformly over the transfer.
    pub fn write_csv(writer: &mut dyn Write, trajectory: &Trajectory) -> io::Result<()> {
        write_header(writer)?;
        let last = trajectory.len().saturating_sub(1).max(1) as f64;
        let samples = trajectory
            .departure
            .iter()
            .zip(&trajectory.target)
            .zip(&trajectory.rocket)
            .enumerate();
        for (i, ((earth, target), rocket)) in samples {
            writeln!(
                writer,
                "{},{:.6},{:.9},{:.9},{:.9},{:.9},{:.9},{:.9},{:.9}",
                i,
                trajectory.transfer_time_days * i as f64 / last,
                earth[0],
                earth[1],
                target[0],
                target[1],
                rocket[0],
                rocket[1],
                vector::norm(rocket),
            )?;
        }
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mars() -> rocket_orbits::Trajectory {
        rocket_orbits::trajectory(1.0, 1.524, 50).unwrap()
    }

    #[test]
    fn mission_json_has_three_position_tracks() {
        let traj = mars();
        let mut buf = Vec::new();
        mission::write_json(&mut buf, "mars", &traj).unwrap();

        let doc: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(doc["mission"], "Earth to mars");
        for body in ["earth", "target", "rocket"] {
            assert_eq!(doc["positions"][body].as_array().unwrap().len(), 50);
        }
        assert_eq!(doc["positions"]["rocket"][0][0], traj.rocket[0][0]);
        assert!((doc["transfer_time_days"].as_f64().unwrap() - 259.0).abs() < 1.0);
    }

    #[test]
    fn trajectory_csv_spans_transfer() {
        let traj = mars();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/mars.csv");
        {
            let mut writer = writer_for_path(&path).unwrap();
            trajectory::write_csv(&mut writer, &traj).unwrap();
        }

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(&reader.headers().unwrap()[8], "rocket_r_au");
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 50);

        let first_time: f64 = rows[0][1].parse().unwrap();
        let last_time: f64 = rows[49][1].parse().unwrap();
        let last_r: f64 = rows[49][8].parse().unwrap();
        assert_eq!(first_time, 0.0);
        assert!((last_time - traj.transfer_time_days).abs() < 1e-5);
        assert!((last_r - 1.524).abs() < 1e-6);
    }
}
