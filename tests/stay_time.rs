//! Tests for stay-time aggregation and cell selection

use chrono::{DateTime, TimeZone, Utc};
use homestay::{select_home_cell, CellPoint, GridCell};

fn ts(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, day, hour, min, 0).unwrap()
}

fn cell(y: i64, x: i64) -> GridCell {
    GridCell {
        y_index: y,
        x_index: x,
    }
}

fn point(c: GridCell, t: DateTime<Utc>) -> CellPoint {
    CellPoint {
        cell: c,
        timestamp: t,
    }
}

#[test]
fn test_empty_subset_has_no_winner() {
    assert!(select_home_cell(&[]).is_none());
}

#[test]
fn test_single_cell_stats() {
    let c = cell(10, 20);
    let points = vec![
        point(c, ts(1, 23, 30)),
        point(c, ts(2, 1, 0)),
        point(c, ts(2, 2, 0)),
    ];

    let (winner, stats) = select_home_cell(&points).unwrap();
    assert_eq!(winner, c);
    // 23:30 -> 02:00 next day = 2.5 hours
    assert_eq!(stats.stay_time_seconds, 9000.0);
    assert_eq!(stats.num_distinct_days, 2);
    assert_eq!(stats.num_points, 3);
}

#[test]
fn test_longest_stay_time_wins() {
    let short = cell(0, 0);
    let long = cell(5, 5);
    let points = vec![
        // 1 hour in `short`, but 5 points
        point(short, ts(1, 22, 0)),
        point(short, ts(1, 22, 15)),
        point(short, ts(1, 22, 30)),
        point(short, ts(1, 22, 45)),
        point(short, ts(1, 23, 0)),
        // 4 hours in `long`, 2 points
        point(long, ts(2, 22, 0)),
        point(long, ts(3, 2, 0)),
    ];

    let (winner, stats) = select_home_cell(&points).unwrap();
    assert_eq!(winner, long);
    assert_eq!(stats.stay_time_seconds, 4.0 * 3600.0);
}

#[test]
fn test_distinct_days_break_stay_time_ties() {
    let one_day = cell(0, 0);
    let two_days = cell(9, 9);
    // Both cells span exactly 1 hour. `one_day` sits inside one calendar
    // date with more points; `two_days` straddles midnight.
    let points = vec![
        point(one_day, ts(1, 1, 0)),
        point(one_day, ts(1, 1, 30)),
        point(one_day, ts(1, 2, 0)),
        point(two_days, ts(3, 23, 30)),
        point(two_days, ts(4, 0, 30)),
    ];

    let (winner, stats) = select_home_cell(&points).unwrap();
    // Equal stay-time (3600s); two distinct dates beat three points
    assert_eq!(winner, two_days);
    assert_eq!(stats.stay_time_seconds, 3600.0);
    assert_eq!(stats.num_distinct_days, 2);
    assert_eq!(stats.num_points, 2);
}

#[test]
fn test_point_count_breaks_remaining_ties() {
    let sparse = cell(0, 0);
    let dense = cell(9, 9);
    let points = vec![
        // Same stay-time (1h), same single date, different point counts
        point(sparse, ts(1, 1, 0)),
        point(sparse, ts(1, 2, 0)),
        point(dense, ts(1, 1, 0)),
        point(dense, ts(1, 1, 30)),
        point(dense, ts(1, 2, 0)),
    ];

    let (winner, stats) = select_home_cell(&points).unwrap();
    assert_eq!(winner, dense);
    assert_eq!(stats.num_points, 3);
}

#[test]
fn test_full_tie_goes_to_smallest_cell() {
    let small = cell(1, 2);
    let large = cell(1, 3);
    // Identical timestamp patterns in both cells
    let points = vec![
        point(large, ts(1, 1, 0)),
        point(large, ts(1, 2, 0)),
        point(small, ts(1, 1, 0)),
        point(small, ts(1, 2, 0)),
    ];

    let (winner, _) = select_home_cell(&points).unwrap();
    assert_eq!(winner, small);
}

#[test]
fn test_singleton_cell_is_eligible() {
    let lone = cell(7, 7);
    let points = vec![point(lone, ts(1, 4, 0))];

    let (winner, stats) = select_home_cell(&points).unwrap();
    assert_eq!(winner, lone);
    assert_eq!(stats.stay_time_seconds, 0.0);
    assert_eq!(stats.num_distinct_days, 1);
    assert_eq!(stats.num_points, 1);
}

#[test]
fn test_input_order_does_not_matter() {
    let a = cell(0, 0);
    let b = cell(1, 1);
    let points = vec![
        point(a, ts(1, 23, 0)),
        point(b, ts(2, 23, 0)),
        point(a, ts(2, 1, 0)),
        point(b, ts(3, 1, 0)),
    ];
    let mut reversed = points.clone();
    reversed.reverse();

    assert_eq!(select_home_cell(&points), select_home_cell(&reversed));
}
