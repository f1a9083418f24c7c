//! Entry points: encode a [`GeoObject`] into a [`GeobufData`] envelope and back.

use super::{
	EncodingConfig, EncodingOptions, GeobufError, KeyTable, MAX_PRECISION_LIMIT,
	analyze::{PrecisionAnalysis, analyze},
	data::{GeobufData, GeobufDataType, GeobufFeatureCollection},
	feature::GeobufFeature,
	geometry::GeobufGeometry,
};
use crate::geo::{GeoCollection, GeoObject};
use anyhow::{Context, Result, bail, ensure};
use geobuf_core::Blob;
use log::{trace, warn};

/// Encodes `object` with inferred precision and dimension.
///
/// ```rust
/// use geobuf::{codec::{decode, encode}, geo::{GeoObject, Geometry}};
///
/// let object = GeoObject::from(Geometry::new_line_string(vec![[1.5, 2.0], [3.25, 4.0]]));
/// let data = encode(&object).unwrap();
/// assert_eq!(data.precision, 2);
/// assert_eq!(decode(&data).unwrap(), object);
/// ```
pub fn encode(object: &GeoObject) -> Result<GeobufData> {
	encode_with_options(object, &EncodingOptions::default())
}

/// Encodes `object`, applying the overrides in `options`.
pub fn encode_with_options(object: &GeoObject, options: &EncodingOptions) -> Result<GeobufData> {
	options.validate()?;

	let analysis = analyze(object, options.max_precision);
	let precision = options.precision.unwrap_or(analysis.precision);
	if let Some(message) = rounding_warning(options.precision, &analysis) {
		warn!("{message}");
	}
	let dimension = options.dimension.map_or(analysis.dimension, usize::from);
	let config = EncodingConfig::new(dimension, u32::from(precision), analysis.keys)?;

	trace!(
		"encoding {} with precision {precision} and dimension {dimension}",
		object.type_name()
	);

	let data_type = match object {
		GeoObject::Geometry(geometry) => GeobufDataType::Geometry(
			GeobufGeometry::from_geometry(geometry, &config).context("Failed to encode geometry")?,
		),
		GeoObject::Feature(feature) => {
			GeobufDataType::Feature(GeobufFeature::from_feature(feature, &config).context("Failed to encode feature")?)
		}
		GeoObject::FeatureCollection(collection) => GeobufDataType::FeatureCollection(GeobufFeatureCollection {
			features: collection
				.features
				.iter()
				.enumerate()
				.map(|(index, feature)| {
					GeobufFeature::from_feature(feature, &config).with_context(|| format!("Failed to encode feature {index}"))
				})
				.collect::<Result<Vec<_>>>()?,
		}),
	};

	Ok(GeobufData {
		dimensions: dimension as u32,
		precision: u32::from(precision),
		keys: config.into_keys().into_vec(),
		data_type: Some(data_type),
	})
}

/// Describes the coordinate rounding an encode will do, if any.
fn rounding_warning(requested: Option<u8>, analysis: &PrecisionAnalysis) -> Option<String> {
	match requested {
		Some(precision) if precision < analysis.precision => Some(format!(
			"precision {precision} is below the {} digits the coordinates need; coordinates will be rounded",
			analysis.precision
		)),
		Some(_) => None,
		None if analysis.clamped => Some(format!(
			"coordinates need more decimal digits than can be stored; they will be rounded to {} digits",
			analysis.precision
		)),
		None => None,
	}
}

/// Decodes an envelope back into a [`GeoObject`].
pub fn decode(data: &GeobufData) -> Result<GeoObject> {
	ensure!(
		data.dimensions == 2 || data.dimensions == 3,
		GeobufError::malformed(format!("dimensions must be 2 or 3, got {}", data.dimensions))
	);
	ensure!(
		data.precision <= u32::from(MAX_PRECISION_LIMIT),
		GeobufError::malformed(format!(
			"precision must not exceed {MAX_PRECISION_LIMIT}, got {}",
			data.precision
		))
	);
	let config = EncodingConfig::new(
		data.dimensions as usize,
		data.precision,
		KeyTable::new(data.keys.clone()),
	)?;

	Ok(match &data.data_type {
		Some(GeobufDataType::Geometry(geometry)) => {
			GeoObject::Geometry(geometry.to_geometry(&config).context("Failed to decode geometry")?)
		}
		Some(GeobufDataType::Feature(feature)) => {
			GeoObject::Feature(feature.to_feature(&config).context("Failed to decode feature")?)
		}
		Some(GeobufDataType::FeatureCollection(collection)) => GeoObject::FeatureCollection(
			collection
				.features
				.iter()
				.enumerate()
				.map(|(index, feature)| {
					feature
						.to_feature(&config)
						.with_context(|| format!("Failed to decode feature {index}"))
				})
				.collect::<Result<GeoCollection>>()?,
		),
		None => bail!(GeobufError::malformed(
			"envelope contains no geometry, feature or feature collection"
		)),
	})
}

/// Encodes `object` straight to bytes.
pub fn encode_to_blob(object: &GeoObject) -> Result<Blob> {
	encode(object)?.to_blob()
}

/// Decodes bytes produced by [`encode_to_blob`].
pub fn decode_blob(blob: &Blob) -> Result<GeoObject> {
	decode(&GeobufData::from_blob(blob)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		codec::error_kind,
		geo::{GeoFeature, GeoProperties, GeoValue, Geometry},
	};
	use pretty_assertions::assert_eq;

	fn feature(properties: Vec<(&str, GeoValue)>) -> GeoFeature {
		let mut feature = GeoFeature::new(Geometry::new_point([1.1, 2.25]));
		feature.set_properties(GeoProperties::from(properties));
		feature
	}

	#[test]
	fn infers_precision_and_keys() -> Result<()> {
		let collection = GeoCollection::from(vec![
			feature(vec![("a", GeoValue::from(1)), ("b", GeoValue::from(2))]),
			feature(vec![("b", GeoValue::from(3)), ("c", GeoValue::from(4))]),
		]);
		let object = GeoObject::from(collection);
		let data = encode(&object)?;
		assert_eq!(data.precision, 2);
		assert_eq!(data.dimensions, 2);
		assert_eq!(data.keys, vec!["a", "b", "c"]);
		assert_eq!(decode(&data)?, object);
		Ok(())
	}

	#[test]
	fn precision_override() -> Result<()> {
		let object = GeoObject::from(Geometry::new_point([1.26, 2.0]));
		let data = encode_with_options(&object, &EncodingOptions::default().with_precision(1))?;
		assert_eq!(data.precision, 1);
		assert_eq!(decode(&data)?, GeoObject::from(Geometry::new_point([1.3, 2.0])));
		Ok(())
	}

	#[test]
	fn rounding_warning_names_effective_precision() {
		let object = GeoObject::from(Geometry::new_point([0.123456789, 1.0]));
		let analysis = analyze(&object, 8);
		assert!(analysis.clamped);

		let message = rounding_warning(None, &analysis).unwrap();
		assert!(message.contains("rounded to 8 digits"), "{message}");

		let message = rounding_warning(Some(3), &analysis).unwrap();
		assert!(message.starts_with("precision 3 "), "{message}");

		assert_eq!(rounding_warning(Some(10), &analysis), None);
		assert_eq!(rounding_warning(None, &analyze(&GeoObject::from(Geometry::new_point([1.5, 2.0])), 8)), None);
	}

	#[test]
	fn large_and_fine_coordinates_encode() -> Result<()> {
		let object = GeoObject::from(Geometry::new_multi_point(vec![[1e11, 0.0], [0.12345678, 0.0]]));
		let data = encode(&object)?;
		assert_eq!(data.precision, 7);
		assert_eq!(
			decode(&data)?,
			GeoObject::from(Geometry::new_multi_point(vec![[1e11, 0.0], [0.1234568, 0.0]]))
		);
		Ok(())
	}

	#[test]
	fn dimension_override_pads_with_zero() -> Result<()> {
		let object = GeoObject::from(Geometry::new_point([1, 2]));
		let data = encode_with_options(&object, &EncodingOptions::default().with_dimension(3))?;
		assert_eq!(data.dimensions, 3);
		assert_eq!(decode(&data)?, GeoObject::from(Geometry::new_point([1, 2, 0])));
		Ok(())
	}

	#[test]
	fn invalid_options_are_unsupported() {
		let object = GeoObject::from(Geometry::new_point([1, 2]));
		for options in [
			EncodingOptions::default().with_dimension(4),
			EncodingOptions::default().with_precision(16),
		] {
			let err = encode_with_options(&object, &options).unwrap_err();
			assert!(matches!(error_kind(&err), Some(GeobufError::UnsupportedType(_))));
		}
	}

	#[test]
	fn decode_validates_envelope() {
		let mut data = encode(&GeoObject::from(Geometry::new_point([1, 2]))).unwrap();
		data.dimensions = 4;
		assert!(matches!(error_kind(&decode(&data).unwrap_err()), Some(GeobufError::MalformedWire(_))));

		data.dimensions = 2;
		data.precision = 16;
		assert!(matches!(error_kind(&decode(&data).unwrap_err()), Some(GeobufError::MalformedWire(_))));

		data.precision = 0;
		data.data_type = None;
		assert!(matches!(error_kind(&decode(&data).unwrap_err()), Some(GeobufError::MalformedWire(_))));
	}

	#[test]
	fn blob_round_trip() -> Result<()> {
		let object = GeoObject::from(GeoFeature::new_example());
		let blob = encode_to_blob(&object)?;
		assert_eq!(decode_blob(&blob)?, object);
		Ok(())
	}

	#[test]
	fn non_finite_coordinate_is_unsupported() {
		let object = GeoObject::from(Geometry::new_line_string(vec![[0.0, 0.0], [f64::NAN, 1.0]]));
		let err = encode(&object).unwrap_err();
		assert!(matches!(error_kind(&err), Some(GeobufError::UnsupportedType(_))));
	}
}
