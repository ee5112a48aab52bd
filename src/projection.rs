//! Coordinate projection between geographic and planar reference systems.
//!
//! Wraps a pair of [`proj`] transformations: forward (input CRS to the
//! planar gridding CRS) and inverse (planar back to input). Transformations
//! between known CRS are axis-normalized, so coordinates always pass through
//! as (longitude/easting, latitude/northing).

use proj::Proj;

use crate::error::{HomeInferError, Result};

/// Projects fix coordinates into a planar metric system and back.
pub struct Projector {
    forward: Proj,
    inverse: Proj,
}

impl Projector {
    /// Build a projector between two CRS identifiers (e.g. "EPSG:4326").
    ///
    /// Fails with [`HomeInferError::UnsupportedReferenceSystem`] if either
    /// identifier cannot be resolved.
    pub fn new(input_crs: &str, output_crs: &str) -> Result<Self> {
        let forward = Proj::new_known_crs(input_crs, output_crs, None).map_err(|e| {
            HomeInferError::UnsupportedReferenceSystem {
                crs: format!("{input_crs} -> {output_crs}"),
                detail: e.to_string(),
            }
        })?;
        let inverse = Proj::new_known_crs(output_crs, input_crs, None).map_err(|e| {
            HomeInferError::UnsupportedReferenceSystem {
                crs: format!("{output_crs} -> {input_crs}"),
                detail: e.to_string(),
            }
        })?;
        Ok(Self { forward, inverse })
    }

    /// Project parallel latitude/longitude sequences to planar (y, x) meters.
    ///
    /// Output sequences preserve input order and length. A position with a
    /// missing or non-finite coordinate yields `None` in both outputs;
    /// projection is never attempted for incomplete pairs.
    pub fn project(
        &self,
        lats: &[Option<f64>],
        lons: &[Option<f64>],
    ) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
        debug_assert_eq!(lats.len(), lons.len());

        let mut ys = Vec::with_capacity(lats.len());
        let mut xs = Vec::with_capacity(lats.len());
        for (lat, lon) in lats.iter().zip(lons.iter()) {
            match (lat, lon) {
                (Some(lat), Some(lon)) => {
                    let planar = self.project_point(*lat, *lon);
                    ys.push(planar.map(|(y, _)| y));
                    xs.push(planar.map(|(_, x)| x));
                }
                _ => {
                    ys.push(None);
                    xs.push(None);
                }
            }
        }
        (ys, xs)
    }

    /// Project a single (lat, lon) pair to planar (y, x) meters.
    ///
    /// Returns `None` when the pair is non-finite or the transformation
    /// rejects it; such fixes are inert downstream.
    pub fn project_point(&self, lat: f64, lon: f64) -> Option<(f64, f64)> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        self.forward.convert((lon, lat)).ok().map(|(x, y)| (y, x))
    }

    /// Map a planar (y, x) point back to (lat, lon) in the input system.
    pub fn unproject(&self, y: f64, x: f64) -> Result<(f64, f64)> {
        let (lon, lat) =
            self.inverse
                .convert((x, y))
                .map_err(|e| HomeInferError::ReverseProjection {
                    y,
                    x,
                    detail: e.to_string(),
                })?;
        Ok((lat, lon))
    }
}
