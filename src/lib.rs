//! # Homestay
//!
//! Grid-based home location inference from GPS traces.
//!
//! The core heuristic: home is the place where a device spends the most
//! continuous time overnight. Each user's fixes are projected to a planar
//! metric system, snapped onto a square grid, and the grid cell with the
//! longest nighttime stay-time wins. When a trace has no nighttime data at
//! all, a weekend-daytime fallback window is evaluated instead.
//!
//! This library provides:
//! - Coordinate projection between geographic and planar reference systems
//! - Hour-of-day / day-of-week feature extraction
//! - Spatial quantization onto a configurable grid
//! - Stay-time aggregation with deterministic tie-breaking
//! - A single-user inference engine with night/weekend fallback
//! - A batch runner over multi-user datasets
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel batch processing with rayon
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::{TimeZone, Utc};
//! use homestay::{DetectorConfig, GpsFix, HomeDetector};
//!
//! let trace = vec![
//!     GpsFix::new(43.6500, -79.3800, Utc.with_ymd_and_hms(2024, 7, 1, 23, 30, 0).unwrap()),
//!     GpsFix::new(43.6500, -79.3800, Utc.with_ymd_and_hms(2024, 7, 2, 1, 0, 0).unwrap()),
//!     GpsFix::new(43.6500, -79.3800, Utc.with_ymd_and_hms(2024, 7, 2, 2, 0, 0).unwrap()),
//! ];
//!
//! let detector = HomeDetector::new(DetectorConfig::default());
//! let home = detector.infer(&trace).unwrap();
//! if home.is_resolved() {
//!     println!("home: {:.5}, {:.5}", home.home_lat, home.home_lon);
//! }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{HomeInferError, Result};

// Coordinate projection (geographic <-> planar)
pub mod projection;
pub use projection::Projector;

// Hour-of-day and day-of-week extraction
pub mod time_features;
pub use time_features::extract_time_features;

// Spatial quantization onto a fixed-size grid
pub mod grid;
pub use grid::{quantize, GridCell};

// Stay-time aggregation and cell selection
pub mod stay_time;
pub use stay_time::{select_home_cell, CellPoint, CellStats};

// Single-user inference engine (night window + weekend fallback)
pub mod detector;
pub use detector::HomeDetector;

// Batch execution over multi-user datasets
pub mod batch;
#[cfg(feature = "parallel")]
pub use batch::infer_homes_batch_parallel;
pub use batch::{infer_homes_batch, UserFix, UserHomeRow};

// ============================================================================
// Core Types
// ============================================================================

/// A single GPS observation.
///
/// Latitude and longitude are optional: a fix missing either never enters
/// the grid, but its timestamp can still contribute to feature extraction.
/// Unparseable timestamps arrive here as `None`.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use homestay::GpsFix;
/// let fix = GpsFix::new(43.65, -79.38, Utc.with_ymd_and_hms(2024, 7, 1, 23, 30, 0).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    /// Observation time (UTC), `None` when missing or unparseable
    pub timestamp: Option<DateTime<Utc>>,
    /// Latitude in degrees
    pub lat: Option<f64>,
    /// Longitude in degrees
    pub lon: Option<f64>,
    /// Elevation in meters (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl GpsFix {
    /// Create a fully populated fix without elevation.
    pub fn new(lat: f64, lon: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
            lat: Some(lat),
            lon: Some(lon),
            elevation: None,
        }
    }

    /// Create a fully populated fix with elevation.
    pub fn with_elevation(lat: f64, lon: f64, timestamp: DateTime<Utc>, elevation: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            lat: Some(lat),
            lon: Some(lon),
            elevation: Some(elevation),
        }
    }
}

/// Configuration for the home inference engine.
///
/// Immutable once constructed; pass by reference into the engine and the
/// batch runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Grid cell size in meters (must be > 0).
    /// Default: 20.0
    pub grid_size: f64,

    /// First hour of the night window (24h clock, 22 = 10pm).
    /// Default: 22
    pub night_start: u32,

    /// First hour past the night window (24h clock, 6 = 6am).
    /// The window wraps around midnight: `hour >= night_start || hour < night_end`.
    /// Default: 6
    pub night_end: u32,

    /// Coordinate reference system of the input fixes.
    /// Default: "EPSG:4326" (WGS84)
    pub input_crs: String,

    /// Planar metric reference system used for gridding.
    /// Default: "EPSG:32617" (UTM zone 17N)
    pub output_crs: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            night_start: 22,
            night_end: 6,
            input_crs: "EPSG:4326".to_string(),
            output_crs: "EPSG:32617".to_string(),
        }
    }
}

/// Which candidate window produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferredFrom {
    /// Nighttime window (primary)
    Night,
    /// Weekend daytime window (fallback)
    Weekend,
}

impl fmt::Display for InferredFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferredFrom::Night => write!(f, "night"),
            InferredFrom::Weekend => write!(f, "weekend"),
        }
    }
}

/// One user's inferred home location with diagnostic statistics.
///
/// An undeterminable home is an expected outcome, not an error: the result
/// then carries NaN coordinates, zeroed counters and a human-readable
/// `reason`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeResult {
    /// Home latitude in the input reference system (NaN when unresolved)
    pub home_lat: f64,
    /// Home longitude in the input reference system (NaN when unresolved)
    pub home_lon: f64,
    /// Window that produced the answer, `None` when unresolved
    pub inferred_from: Option<InferredFrom>,
    /// Elapsed seconds between first and last fix in the winning cell
    pub stay_time_seconds: f64,
    /// Distinct calendar dates observed in the winning cell
    pub num_distinct_days: u32,
    /// Fix count in the winning cell
    pub num_points: u32,
    /// Planar northing of the winning cell center (NaN when unresolved)
    pub proj_y: f64,
    /// Planar easting of the winning cell center (NaN when unresolved)
    pub proj_x: f64,
    /// Why no home could be determined, `None` when resolved
    pub reason: Option<String>,
}

impl HomeResult {
    /// Construct the sentinel result for a trace with no determinable home.
    pub fn unresolved(reason: &str) -> Self {
        Self {
            home_lat: f64::NAN,
            home_lon: f64::NAN,
            inferred_from: None,
            stay_time_seconds: 0.0,
            num_distinct_days: 0,
            num_points: 0,
            proj_y: f64::NAN,
            proj_x: f64::NAN,
            reason: Some(reason.to_string()),
        }
    }

    /// Whether a home location was determined.
    pub fn is_resolved(&self) -> bool {
        self.inferred_from.is_some()
    }
}
