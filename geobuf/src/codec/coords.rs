//! Coordinate quantization and delta coding.
//!
//! A coordinate is stored as `round(v * 10^precision)` per axis. Sequences store the first
//! point absolutely and every following point as the per-axis difference to its predecessor.
//! Every sequence (line or ring) starts its own running sum.

use super::{EncodingConfig, GeobufError};
use crate::geo::Coordinates;
use anyhow::{Result, ensure};

// 2^63: smallest magnitude that no longer fits an i64.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Scales `coord` to integers, one per axis of the configured dimension.
///
/// Missing axes are filled with 0, surplus axes are dropped.
pub fn quantize(coord: &Coordinates, config: &EncodingConfig) -> Result<Vec<i64>> {
	(0..config.dimension())
		.map(|axis| {
			let value = coord.get(axis).unwrap_or(0.0);
			ensure!(
				value.is_finite(),
				GeobufError::unsupported(format!("coordinate {coord:?} is not finite"))
			);
			let scaled = (value * config.factor()).round();
			ensure!(
				(-I64_LIMIT..I64_LIMIT).contains(&scaled),
				GeobufError::unsupported(format!(
					"coordinate {coord:?} is too large for precision {}",
					config.precision()
				))
			);
			Ok(scaled as i64)
		})
		.collect()
}

/// Turns one point's worth of integers back into a coordinate.
pub fn dequantize(values: &[i64], config: &EncodingConfig) -> Coordinates {
	let factor = config.factor();
	let axis = |i: usize| values.get(i).map_or(0.0, |&v| v as f64 / factor);
	if config.dimension() == 3 {
		Coordinates::new_3d(axis(0), axis(1), axis(2))
	} else {
		Coordinates::new(axis(0), axis(1))
	}
}

/// Delta-encodes a sequence of points into a flat list, axis-major within each point.
///
/// With `closed`, the final point (which repeats the first) is not stored.
pub fn encode_sequence(points: &[Coordinates], closed: bool, config: &EncodingConfig) -> Result<Vec<i64>> {
	let points = match points.split_last() {
		Some((_, rest)) if closed => rest,
		_ => points,
	};

	let dimension = config.dimension();
	let mut previous = vec![0i64; dimension];
	let mut flat = Vec::with_capacity(points.len() * dimension);
	for point in points {
		let values = quantize(point, config)?;
		for (last, value) in previous.iter_mut().zip(values) {
			let delta = value.checked_sub(*last).ok_or_else(|| {
				GeobufError::unsupported(format!("coordinate delta at {point:?} overflows a 64-bit integer"))
			})?;
			flat.push(delta);
			*last = value;
		}
	}
	Ok(flat)
}

/// Reverses [`encode_sequence`]. With `closed`, the first point is appended again.
pub fn decode_sequence(flat: &[i64], closed: bool, config: &EncodingConfig) -> Result<Vec<Coordinates>> {
	let dimension = config.dimension();
	ensure!(
		flat.len() % dimension == 0,
		GeobufError::malformed(format!(
			"{} coordinate values are not a multiple of dimension {dimension}",
			flat.len()
		))
	);

	let mut running = vec![0i64; dimension];
	let mut points = Vec::with_capacity(flat.len() / dimension + usize::from(closed));
	for chunk in flat.chunks_exact(dimension) {
		for (sum, delta) in running.iter_mut().zip(chunk) {
			*sum = sum
				.checked_add(*delta)
				.ok_or_else(|| GeobufError::malformed("coordinate sum overflows a 64-bit integer"))?;
		}
		points.push(dequantize(&running, config));
	}

	if closed {
		if let Some(first) = points.first().copied() {
			points.push(first);
		}
	}
	Ok(points)
}
