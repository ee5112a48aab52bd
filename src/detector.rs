//! The home inference engine: night-window stay-time with weekend fallback.
//!
//! Policy, evaluated in order and stopping at the first resolution:
//! 1. Empty trace -> unresolved ("missing required fields").
//! 2. Project, extract time features, quantize. No usable hour at all ->
//!    unresolved ("time extraction failed").
//! 3. Nighttime fixes (wrap-around window) -> best cell by stay-time.
//! 4. Weekend daytime fixes (Sat/Sun, 08:00-20:00), only when the night set
//!    is empty -> best cell by stay-time.
//! 5. Neither window has data -> unresolved ("no nighttime or weekend points").

use crate::error::Result;
use crate::grid::GridCell;
use crate::projection::Projector;
use crate::stay_time::{select_home_cell, CellPoint, CellStats};
use crate::time_features::extract_time_features;
use crate::{DetectorConfig, GpsFix, HomeResult, InferredFrom};

/// Weekend fallback window: Saturday/Sunday daytime.
const WEEKEND_DAY_START_HOUR: u32 = 8;
const WEEKEND_DAY_END_HOUR: u32 = 20;
const SATURDAY: u32 = 5;
const SUNDAY: u32 = 6;

/// A candidate fix with the temporal features the window filters need.
#[derive(Debug, Clone, Copy)]
struct WindowPoint {
    point: CellPoint,
    hour: u32,
    dayofweek: u32,
}

/// Infers one user's home location from their GPS trace.
///
/// Stateless across calls: the same trace and configuration always produce
/// a bit-identical [`HomeResult`].
pub struct HomeDetector {
    config: DetectorConfig,
}

impl HomeDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// The detector's configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Infer the home location for a single user's trace.
    ///
    /// Returns `Err` only for configuration-level failures (unresolvable
    /// CRS, reverse projection). A trace with no determinable home yields
    /// `Ok` with an unresolved [`HomeResult`].
    pub fn infer(&self, trace: &[GpsFix]) -> Result<HomeResult> {
        if trace.is_empty() {
            return Ok(HomeResult::unresolved("missing required fields"));
        }

        let projector = Projector::new(&self.config.input_crs, &self.config.output_crs)?;

        let lats: Vec<Option<f64>> = trace.iter().map(|f| f.lat).collect();
        let lons: Vec<Option<f64>> = trace.iter().map(|f| f.lon).collect();
        let (ys, xs) = projector.project(&lats, &lons);

        let stamps: Vec<_> = trace.iter().map(|f| f.timestamp).collect();
        let (hours, days) = extract_time_features(&stamps);
        if hours.iter().all(|h| h.is_none()) {
            return Ok(HomeResult::unresolved("time extraction failed"));
        }

        // A fix becomes a candidate only with a complete projected position
        // and a usable timestamp.
        let mut candidates = Vec::with_capacity(trace.len());
        for i in 0..trace.len() {
            let (Some(y), Some(x), Some(timestamp), Some(hour), Some(dayofweek)) =
                (ys[i], xs[i], stamps[i], hours[i], days[i])
            else {
                continue;
            };
            candidates.push(WindowPoint {
                point: CellPoint {
                    cell: GridCell::from_projected(y, x, self.config.grid_size),
                    timestamp,
                },
                hour,
                dayofweek,
            });
        }

        // 1. Nighttime window (wraps around midnight)
        let night: Vec<CellPoint> = candidates
            .iter()
            .filter(|c| c.hour >= self.config.night_start || c.hour < self.config.night_end)
            .map(|c| c.point)
            .collect();
        if let Some((cell, stats)) = select_home_cell(&night) {
            return self.resolve(&projector, cell, stats, InferredFrom::Night);
        }

        // 2. Weekend daytime fallback
        let weekend: Vec<CellPoint> = candidates
            .iter()
            .filter(|c| {
                (c.dayofweek == SATURDAY || c.dayofweek == SUNDAY)
                    && c.hour >= WEEKEND_DAY_START_HOUR
                    && c.hour < WEEKEND_DAY_END_HOUR
            })
            .map(|c| c.point)
            .collect();
        if let Some((cell, stats)) = select_home_cell(&weekend) {
            return self.resolve(&projector, cell, stats, InferredFrom::Weekend);
        }

        // 3. No data in either window
        Ok(HomeResult::unresolved("no nighttime or weekend points"))
    }

    /// Reverse-project the winning cell and assemble the resolved result.
    fn resolve(
        &self,
        projector: &Projector,
        cell: GridCell,
        stats: CellStats,
        source: InferredFrom,
    ) -> Result<HomeResult> {
        let (proj_y, proj_x) = cell.center(self.config.grid_size);
        let (home_lat, home_lon) = projector.unproject(proj_y, proj_x)?;

        Ok(HomeResult {
            home_lat,
            home_lon,
            inferred_from: Some(source),
            stay_time_seconds: stats.stay_time_seconds,
            num_distinct_days: stats.num_distinct_days,
            num_points: stats.num_points,
            proj_y,
            proj_x,
            reason: None,
        })
    }
}
