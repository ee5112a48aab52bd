//! Batch execution of home inference across many users.
//!
//! Partitions a multi-user dataset by identity and runs the engine once per
//! user. Per-user failures become an error row instead of aborting the
//! batch; only configuration-level failures (an unresolvable CRS) abort the
//! whole run, since they would fail every user identically.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::detector::HomeDetector;
use crate::error::Result;
use crate::projection::Projector;
use crate::{DetectorConfig, GpsFix, HomeResult};

/// One fix tagged with the identity of the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFix {
    pub user_id: String,
    #[serde(flatten)]
    pub fix: GpsFix,
}

impl UserFix {
    pub fn new(user_id: &str, fix: GpsFix) -> Self {
        Self {
            user_id: user_id.to_string(),
            fix,
        }
    }
}

/// One output row of a batch run: the user identity plus their result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHomeRow {
    pub user_id: String,
    #[serde(flatten)]
    pub result: HomeResult,
    /// Set when this user's inference failed outright; the result then
    /// carries the unresolved sentinel values.
    pub error: Option<String>,
}

/// Run home inference for every distinct user identity in `records`.
///
/// Returns one row per user, in first-seen order. Fails only if the
/// configured reference systems cannot be resolved.
pub fn infer_homes_batch(
    records: &[UserFix],
    config: &DetectorConfig,
) -> Result<Vec<UserHomeRow>> {
    // Validate the CRS pair once up front; retrying it per-user would fail
    // every user identically.
    Projector::new(&config.input_crs, &config.output_crs)?;

    let detector = HomeDetector::new(config.clone());
    let rows = partition_by_user(records)
        .into_iter()
        .map(|(user_id, trace)| run_user(&detector, user_id, &trace))
        .collect();
    Ok(rows)
}

/// Parallel variant of [`infer_homes_batch`] using rayon.
///
/// Each user's pipeline reads only that user's fixes and writes only that
/// user's row, so results are identical to the sequential variant, in the
/// same first-seen order.
#[cfg(feature = "parallel")]
pub fn infer_homes_batch_parallel(
    records: &[UserFix],
    config: &DetectorConfig,
) -> Result<Vec<UserHomeRow>> {
    use rayon::prelude::*;

    Projector::new(&config.input_crs, &config.output_crs)?;

    let detector = HomeDetector::new(config.clone());
    let partitions = partition_by_user(records);
    let rows = partitions
        .par_iter()
        .map(|(user_id, trace)| run_user(&detector, user_id.clone(), trace))
        .collect();
    Ok(rows)
}

/// Stable partition of fixes by user identity, preserving first-seen order
/// of identities and input order of each user's fixes.
fn partition_by_user(records: &[UserFix]) -> Vec<(String, Vec<GpsFix>)> {
    let mut order: Vec<String> = Vec::new();
    let mut traces: HashMap<String, Vec<GpsFix>> = HashMap::new();
    for record in records {
        if !traces.contains_key(&record.user_id) {
            order.push(record.user_id.clone());
        }
        traces
            .entry(record.user_id.clone())
            .or_default()
            .push(record.fix);
    }
    order
        .into_iter()
        .map(|user_id| {
            let trace = traces.remove(&user_id).unwrap_or_default();
            (user_id, trace)
        })
        .collect()
}

/// Run one user's inference, capturing failure into the row rather than
/// propagating it.
fn run_user(detector: &HomeDetector, user_id: String, trace: &[GpsFix]) -> UserHomeRow {
    match detector.infer(trace) {
        Ok(result) => UserHomeRow {
            user_id,
            result,
            error: None,
        },
        Err(e) => UserHomeRow {
            user_id,
            result: HomeResult::unresolved("inference failed"),
            error: Some(e.to_string()),
        },
    }
}
