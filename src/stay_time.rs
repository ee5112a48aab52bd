//! Stay-time aggregation over grid cells.
//!
//! Groups candidate fixes by grid cell, scores each cell by elapsed time
//! between its first and last fix, and selects the best cell under a
//! deterministic total order. Grouping uses a `BTreeMap` keyed by cell so
//! iteration order is the cells' natural order, never hash order — the same
//! input produces the same winner on every run regardless of fix order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::GridCell;

/// A candidate fix after projection, feature extraction and quantization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPoint {
    pub cell: GridCell,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate statistics for one grid cell within a candidate subset.
///
/// Recomputed per call, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellStats {
    /// Elapsed seconds between the cell's first and last fix (0.0 for a
    /// singleton cell). A proxy for dwell time, not a duty-cycle integral.
    pub stay_time_seconds: f64,
    /// Count of distinct calendar dates among the cell's fixes
    pub num_distinct_days: u32,
    /// Fix count for the cell
    pub num_points: u32,
}

/// Group candidate points by cell and return the winning cell with its
/// statistics, or `None` if the subset is empty.
///
/// Selection order, descending: `stay_time_seconds`, then
/// `num_distinct_days`, then `num_points`. Remaining ties go to the
/// smallest `(cell_y, cell_x)`. A singleton cell scores 0.0 stay-time but
/// stays eligible through the tie-break keys: a single very early-morning
/// ping still signals presence.
pub fn select_home_cell(points: &[CellPoint]) -> Option<(GridCell, CellStats)> {
    let mut cells: BTreeMap<GridCell, Vec<DateTime<Utc>>> = BTreeMap::new();
    for point in points {
        cells.entry(point.cell).or_default().push(point.timestamp);
    }

    let mut best: Option<(GridCell, CellStats)> = None;
    for (cell, mut stamps) in cells {
        stamps.sort_unstable();
        let stats = cell_stats(&stamps);
        // Strict improvement only: scanning in ascending cell order makes
        // the smallest cell win full ties.
        match &best {
            Some((_, incumbent)) if rank(&stats, incumbent) != Ordering::Greater => {}
            _ => best = Some((cell, stats)),
        }
    }
    best
}

/// Compute stay-time, distinct-day and point counts for one cell's
/// timestamps (must be sorted ascending).
fn cell_stats(stamps: &[DateTime<Utc>]) -> CellStats {
    let stay_time_seconds = match (stamps.first(), stamps.last()) {
        (Some(first), Some(last)) if stamps.len() > 1 => {
            last.signed_duration_since(*first).num_milliseconds() as f64 / 1000.0
        }
        _ => 0.0,
    };
    let num_distinct_days = stamps
        .iter()
        .map(|t| t.date_naive())
        .collect::<BTreeSet<_>>()
        .len() as u32;

    CellStats {
        stay_time_seconds,
        num_distinct_days,
        num_points: stamps.len() as u32,
    }
}

/// Total order over cell statistics: stay-time, then distinct days, then
/// point count. `total_cmp` keeps the float key a total order.
fn rank(a: &CellStats, b: &CellStats) -> Ordering {
    a.stay_time_seconds
        .total_cmp(&b.stay_time_seconds)
        .then_with(|| a.num_distinct_days.cmp(&b.num_distinct_days))
        .then_with(|| a.num_points.cmp(&b.num_points))
}
