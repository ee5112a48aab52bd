//! homestay CLI - infer home locations from GPX traces.
//!
//! Usage:
//!   homestay-cli <input> [--output results.csv] [--grid-size 20] ...
//!
//! `<input>` is a single GPX file (one user) or a folder of GPX files (one
//! user per file, file stem = user id). Results are printed as a summary
//! and optionally written to CSV or JSON.

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::Parser;
use gpx::{read, Gpx, Waypoint};
use log::{debug, info};

use homestay::{DetectorConfig, GpsFix, UserFix, UserHomeRow};

#[derive(Parser)]
#[command(name = "homestay-cli")]
#[command(about = "Grid-based home location inference from GPX traces", long_about = None)]
struct Cli {
    /// GPX file or folder of GPX files (one user per file)
    input: PathBuf,

    /// Output CSV path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print results as JSON instead of a summary table
    #[arg(long)]
    json: bool,

    /// Grid cell size in meters
    #[arg(long, default_value_t = 20.0)]
    grid_size: f64,

    /// Night window start hour (22 = 10pm)
    #[arg(long, default_value_t = 22)]
    night_start: u32,

    /// Night window end hour (6 = 6am)
    #[arg(long, default_value_t = 6)]
    night_end: u32,

    /// Coordinate reference system of the input fixes
    #[arg(long, default_value = "EPSG:4326")]
    input_crs: String,

    /// Planar metric reference system used for gridding
    #[arg(long, default_value = "EPSG:32617")]
    output_crs: String,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();

    let records = match load_records(&cli.input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            return ExitCode::FAILURE;
        }
    };
    if records.is_empty() {
        eprintln!("No GPS fixes found in {}", cli.input.display());
        return ExitCode::FAILURE;
    }

    let config = DetectorConfig {
        grid_size: cli.grid_size,
        night_start: cli.night_start,
        night_end: cli.night_end,
        input_crs: cli.input_crs.clone(),
        output_crs: cli.output_crs.clone(),
    };

    #[cfg(feature = "parallel")]
    let rows = homestay::infer_homes_batch_parallel(&records, &config);
    #[cfg(not(feature = "parallel"))]
    let rows = homestay::infer_homes_batch(&records, &config);

    let rows = match rows {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing results: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_summary(&rows);
    }

    if let Some(path) = &cli.output {
        if let Err(e) = write_csv(path, &rows) {
            eprintln!("Error writing {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
        info!("Saved {} result rows to {}", rows.len(), path.display());
    }

    ExitCode::SUCCESS
}

/// Load user-tagged fixes from a GPX file or a folder of GPX files.
fn load_records(input: &Path) -> Result<Vec<UserFix>, String> {
    let mut records = Vec::new();

    if input.is_dir() {
        let entries = fs::read_dir(input).map_err(|e| e.to_string())?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "gpx") {
                let user_id = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown")
                    .to_string();
                let fixes = parse_gpx_file(&path)?;
                info!("[OK] {} - {} fixes", user_id, fixes.len());
                records.extend(fixes.into_iter().map(|fix| UserFix::new(&user_id, fix)));
            }
        }
    } else {
        let user_id = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        let fixes = parse_gpx_file(input)?;
        info!("[OK] {} - {} fixes", user_id, fixes.len());
        records.extend(fixes.into_iter().map(|fix| UserFix::new(&user_id, fix)));
    }

    Ok(records)
}

/// Parse a single GPX file into fixes. Waypoints, track points and route
/// points are all ingested.
fn parse_gpx_file(path: &Path) -> Result<Vec<GpsFix>, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let reader = BufReader::new(file);
    let gpx: Gpx = read(reader).map_err(|e| e.to_string())?;

    let mut fixes = Vec::new();
    for wpt in &gpx.waypoints {
        fixes.push(waypoint_to_fix(wpt));
    }
    for track in &gpx.tracks {
        for segment in &track.segments {
            for pt in &segment.points {
                fixes.push(waypoint_to_fix(pt));
            }
        }
    }
    for route in &gpx.routes {
        for pt in &route.points {
            fixes.push(waypoint_to_fix(pt));
        }
    }

    debug!("Parsed {} fixes from {}", fixes.len(), path.display());
    Ok(fixes)
}

fn waypoint_to_fix(wpt: &Waypoint) -> GpsFix {
    let point = wpt.point();
    GpsFix {
        timestamp: convert_time(wpt.time.clone()),
        lat: Some(point.y()),
        lon: Some(point.x()),
        elevation: wpt.elevation,
    }
}

/// Convert a GPX timestamp to chrono UTC; unparseable times degrade to `None`.
fn convert_time(time: Option<gpx::Time>) -> Option<DateTime<Utc>> {
    let odt: time::OffsetDateTime = time?.into();
    DateTime::from_timestamp(odt.unix_timestamp(), odt.nanosecond())
}

fn print_summary(rows: &[UserHomeRow]) {
    println!("{}", "=".repeat(60));
    println!("Processed {} users", rows.len());
    println!("{}", "=".repeat(60));
    for row in rows {
        if let Some(err) = &row.error {
            println!("  {} - error: {err}", row.user_id);
        } else if row.result.is_resolved() {
            let source = row
                .result
                .inferred_from
                .map(|s| s.to_string())
                .unwrap_or_default();
            println!(
                "  {} - home {:.5}, {:.5} ({}; {:.0}s stay, {} days, {} points)",
                row.user_id,
                row.result.home_lat,
                row.result.home_lon,
                source,
                row.result.stay_time_seconds,
                row.result.num_distinct_days,
                row.result.num_points,
            );
        } else {
            let reason = row.result.reason.as_deref().unwrap_or("unknown");
            println!("  {} - unresolved: {reason}", row.user_id);
        }
    }
}

fn write_csv(path: &Path, rows: &[UserHomeRow]) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| e.to_string())?;
    writer
        .write_record([
            "user_id",
            "home_lat",
            "home_lon",
            "inferred_from",
            "stay_time_seconds",
            "num_distinct_days",
            "num_points",
            "proj_y",
            "proj_x",
            "reason",
            "error",
        ])
        .map_err(|e| e.to_string())?;

    for row in rows {
        writer
            .write_record([
                row.user_id.clone(),
                row.result.home_lat.to_string(),
                row.result.home_lon.to_string(),
                row.result
                    .inferred_from
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                row.result.stay_time_seconds.to_string(),
                row.result.num_distinct_days.to_string(),
                row.result.num_points.to_string(),
                row.result.proj_y.to_string(),
                row.result.proj_x.to_string(),
                row.result.reason.clone().unwrap_or_default(),
                row.error.clone().unwrap_or_default(),
            ])
            .map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())
}
