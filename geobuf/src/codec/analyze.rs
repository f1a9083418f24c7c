//! Single pass over the input that determines how it will be encoded.

use super::KeyTable;
use crate::geo::{GeoCollection, GeoFeature, GeoObject, Geometry};
use log::debug;

// 2^62: scaled coordinates stay below this so that deltas between them fit an i64.
const SCALED_LIMIT: f64 = 4_611_686_018_427_387_904.0;

/// What [`analyze`] learned about an input.
#[derive(Clone, Debug, PartialEq)]
pub struct PrecisionAnalysis {
	/// Smallest number of decimal digits that represents every coordinate exactly,
	/// capped at the requested maximum and lowered until the largest scaled coordinate
	/// fits a 64-bit integer.
	pub precision: u8,
	/// Widest coordinate found, at least 2.
	pub dimension: usize,
	/// Property keys in order of first appearance.
	pub keys: KeyTable,
	/// `true` if at least one coordinate needs more digits than `precision` and will be rounded.
	pub clamped: bool,
}

struct Analyzer {
	max_precision: u8,
	precision: u8,
	dimension: usize,
	keys: KeyTable,
	clamped: bool,
	max_magnitude: f64,
}

impl Analyzer {
	fn new(max_precision: u8) -> Self {
		Analyzer {
			max_precision,
			precision: 0,
			dimension: 2,
			keys: KeyTable::default(),
			clamped: false,
			max_magnitude: 0.0,
		}
	}

	fn visit_collection(&mut self, collection: &GeoCollection) {
		for feature in &collection.features {
			self.visit_feature(feature);
		}
	}

	fn visit_feature(&mut self, feature: &GeoFeature) {
		for key in feature.properties.keys() {
			self.keys.add(key);
		}
		self.visit_geometry(&feature.geometry);
	}

	fn visit_geometry(&mut self, geometry: &Geometry) {
		for coord in geometry.iter_coords() {
			self.dimension = self.dimension.max(coord.dimension());
			for value in coord.iter() {
				self.visit_value(value);
			}
		}
	}

	fn visit_value(&mut self, value: f64) {
		// Non-finite values are rejected by the encoder.
		if !value.is_finite() {
			return;
		}
		self.max_magnitude = self.max_magnitude.max(value.abs());
		if self.clamped {
			return;
		}
		match digits_needed(value, self.max_precision) {
			Some(digits) => self.precision = self.precision.max(digits),
			None => {
				self.precision = self.max_precision;
				self.clamped = true;
			}
		}
	}

	/// Lowers the precision until the largest coordinate can be scaled without overflow.
	fn fit_magnitude(&mut self) {
		while self.precision > 0 && self.max_magnitude * 10f64.powi(i32::from(self.precision)) >= SCALED_LIMIT {
			self.precision -= 1;
			self.clamped = true;
		}
	}
}

/// Returns the smallest `k <= max` with `round(value * 10^k) / 10^k == value`.
fn digits_needed(value: f64, max: u8) -> Option<u8> {
	(0..=max).find(|&k| {
		let factor = 10f64.powi(i32::from(k));
		(value * factor).round() / factor == value
	})
}

/// Scans every coordinate and every feature's property keys of `object`.
///
/// Keys are collected in a pre-order walk: features in collection order, and within a
/// feature in property insertion order.
#[must_use]
pub fn analyze(object: &GeoObject, max_precision: u8) -> PrecisionAnalysis {
	let mut analyzer = Analyzer::new(max_precision);
	match object {
		GeoObject::Geometry(geometry) => analyzer.visit_geometry(geometry),
		GeoObject::Feature(feature) => analyzer.visit_feature(feature),
		GeoObject::FeatureCollection(collection) => analyzer.visit_collection(collection),
	}
	analyzer.fit_magnitude();

	debug!(
		"analyzed {}: precision {}, dimension {}, {} keys",
		object.type_name(),
		analyzer.precision,
		analyzer.dimension,
		analyzer.keys.len()
	);

	PrecisionAnalysis {
		precision: analyzer.precision,
		dimension: analyzer.dimension,
		keys: analyzer.keys,
		clamped: analyzer.clamped,
	}
}
