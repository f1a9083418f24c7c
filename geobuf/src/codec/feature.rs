//! Feature transcoding.
//!
//! Properties are stored as a flat list of `(key index, value index)` pairs. Key indices
//! point into the key table shared by the whole envelope, value indices into the feature's
//! own `values` list.
//!
//! Field layout of the `Feature` message:
//!  * field 1: `geometry` (embedded message, required)
//!  * field 11: `id` (string)
//!  * field 12: `int_id` (sint64)
//!  * field 13: repeated `values` (embedded message)
//!  * field 14: `properties` (packed uint32)

use super::{EncodingConfig, GeobufError, geometry::GeobufGeometry, value::GeobufValue};
use crate::geo::{GeoFeature, GeoId, GeoProperties};
use anyhow::{Context, Result, ensure};
use byteorder::LE;
use geobuf_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};
use log::trace;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeobufFeature {
	pub geometry: GeobufGeometry,
	pub id: Option<GeoId>,
	pub values: Vec<GeobufValue>,
	pub properties: Vec<u32>,
}

impl GeobufFeature {
	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<GeobufFeature> {
		let mut geometry = None;
		let mut feature = GeobufFeature::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => {
					let mut sub_reader = reader.get_pbf_sub_reader().context("Failed to get PBF sub-reader")?;
					geometry = Some(GeobufGeometry::read(sub_reader.as_mut(), 0).context("Failed to read feature geometry")?);
				}
				(11, 2) => {
					feature.id = Some(GeoId::String(
						reader.read_pbf_string().context("Failed to read feature ID")?,
					));
				}
				(12, 0) => {
					feature.id = Some(GeoId::Int(
						reader.read_svarint().context("Failed to read integer feature ID")?,
					));
				}
				(13, 2) => {
					let mut sub_reader = reader.get_pbf_sub_reader().context("Failed to get PBF sub-reader")?;
					feature
						.values
						.push(GeobufValue::read(sub_reader.as_mut()).context("Failed to read property value")?);
				}
				(14, 2) => feature
					.properties
					.extend(reader.read_pbf_packed_uint32().context("Failed to read property indices")?),
				(14, 0) => {
					let index = reader.read_varint().context("Failed to read property index")?;
					feature.properties.push(
						u32::try_from(index)
							.map_err(|_| GeobufError::malformed(format!("property index {index} exceeds 32 bits")))?,
					);
				}
				(f, w) => {
					trace!("skipping feature field {f} with wire type {w}");
					reader.skip_pbf_field(w).context("Failed to skip unknown feature field")?;
				}
			}
		}

		feature.geometry = geometry.ok_or_else(|| anyhow::Error::from(GeobufError::malformed("feature without geometry")))?;
		Ok(feature)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		writer
			.write_pbf_key(1, 2)
			.context("Failed to write PBF key for geometry")?;
		writer
			.write_pbf_blob(&self.geometry.to_blob().context("Failed to encode geometry")?)
			.context("Failed to write geometry")?;

		match &self.id {
			Some(GeoId::String(id)) => {
				writer
					.write_pbf_key(11, 2)
					.context("Failed to write PBF key for feature ID")?;
				writer.write_pbf_string(id).context("Failed to write feature ID")?;
			}
			Some(GeoId::Int(id)) => {
				writer
					.write_pbf_key(12, 0)
					.context("Failed to write PBF key for integer feature ID")?;
				writer.write_svarint(*id).context("Failed to write integer feature ID")?;
			}
			None => {}
		}

		for value in &self.values {
			writer
				.write_pbf_key(13, 2)
				.context("Failed to write PBF key for property value")?;
			writer
				.write_pbf_blob(&value.to_blob().context("Failed to encode property value")?)
				.context("Failed to write property value")?;
		}

		if !self.properties.is_empty() {
			writer
				.write_pbf_key(14, 2)
				.context("Failed to write PBF key for property indices")?;
			writer
				.write_pbf_packed_uint32(&self.properties)
				.context("Failed to write property indices")?;
		}

		Ok(writer.into_blob())
	}

	pub fn from_feature(feature: &GeoFeature, config: &EncodingConfig) -> Result<GeobufFeature> {
		let geometry = GeobufGeometry::from_geometry(&feature.geometry, config).context("Failed to encode geometry")?;

		let mut values = Vec::with_capacity(feature.properties.len());
		let mut properties = Vec::with_capacity(feature.properties.len() * 2);
		for (key, value) in &feature.properties {
			properties.push(config.keys().find(key)?);
			properties.push(values.len() as u32);
			values.push(GeobufValue::from_value(value).with_context(|| format!("Failed to encode property '{key}'"))?);
		}

		Ok(GeobufFeature {
			geometry,
			id: feature.id.clone(),
			values,
			properties,
		})
	}

	pub fn to_feature(&self, config: &EncodingConfig) -> Result<GeoFeature> {
		ensure!(
			self.properties.len() % 2 == 0,
			GeobufError::malformed(format!(
				"property index list has odd length {}",
				self.properties.len()
			))
		);

		let mut properties = GeoProperties::new();
		for pair in self.properties.chunks_exact(2) {
			let key = config.keys().get(pair[0])?;
			let value = self.values.get(pair[1] as usize).ok_or_else(|| {
				GeobufError::malformed(format!(
					"value index {} is out of range for {} values",
					pair[1],
					self.values.len()
				))
			})?;
			properties.insert(
				key.clone(),
				value.to_value().with_context(|| format!("Failed to decode property '{key}'"))?,
			);
		}

		Ok(GeoFeature {
			id: self.id.clone(),
			geometry: self.geometry.to_geometry(config).context("Failed to decode geometry")?,
			properties,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		codec::{KeyTable, error_kind},
		geo::{GeoValue, Geometry},
	};
	use geobuf_core::io::ValueReaderSlice;
	use pretty_assertions::assert_eq;

	fn config(keys: &[&str]) -> EncodingConfig {
		EncodingConfig::new(2, 1, KeyTable::from(keys)).unwrap()
	}

	#[test]
	fn round_trip() -> Result<()> {
		let config = config(&["is_nice", "name", "population"]);
		let feature = GeoFeature::new_example();

		let encoded = GeobufFeature::from_feature(&feature, &config)?;
		assert_eq!(encoded.properties, vec![1, 0, 2, 1, 0, 2]);
		assert_eq!(
			encoded.values,
			vec![
				GeobufValue::String("Nice".to_string()),
				GeobufValue::PosInt(348085),
				GeobufValue::Bool(true),
			]
		);

		let blob = encoded.to_blob()?;
		let read = GeobufFeature::read(&mut ValueReaderSlice::new_le(blob.as_slice()))?;
		assert_eq!(read, encoded);
		assert_eq!(read.to_feature(&config)?, feature);
		Ok(())
	}

	#[test]
	fn string_and_missing_ids() -> Result<()> {
		let config = config(&[]);
		let mut feature = GeoFeature::new(Geometry::new_point([1, 2]));
		let blob = GeobufFeature::from_feature(&feature, &config)?.to_blob()?;
		let read = GeobufFeature::read(&mut ValueReaderSlice::new_le(blob.as_slice()))?;
		assert_eq!(read.id, None);

		feature.set_id("node/42");
		let blob = GeobufFeature::from_feature(&feature, &config)?.to_blob()?;
		let read = GeobufFeature::read(&mut ValueReaderSlice::new_le(blob.as_slice()))?;
		assert_eq!(read.to_feature(&config)?, feature);
		Ok(())
	}

	#[test]
	fn negative_int_id() -> Result<()> {
		let config = config(&[]);
		let mut feature = GeoFeature::new(Geometry::new_point([1, 2]));
		feature.set_id(-3i64);
		let blob = GeobufFeature::from_feature(&feature, &config)?.to_blob()?;
		let read = GeobufFeature::read(&mut ValueReaderSlice::new_le(blob.as_slice()))?;
		assert_eq!(read.id, Some(GeoId::Int(-3)));
		Ok(())
	}

	#[test]
	fn embedded_collection_decodes_as_collection() -> Result<()> {
		let config = config(&[]);
		let feature = GeoFeature::new(Geometry::new_collection(vec![Geometry::new_point([1, 2])]));
		let decoded = GeobufFeature::from_feature(&feature, &config)?.to_feature(&config)?;
		assert_eq!(decoded.geometry, feature.geometry);
		Ok(())
	}

	fn with_properties(properties: Vec<u32>, values: Vec<GeobufValue>) -> GeobufFeature {
		GeobufFeature {
			geometry: GeobufGeometry::from_geometry(&Geometry::new_point([0, 0]), &config(&[])).unwrap(),
			id: None,
			values,
			properties,
		}
	}

	#[test]
	fn out_of_range_value_index_is_malformed() {
		let feature = with_properties(vec![0, 1], vec![GeobufValue::Bool(true)]);
		let err = feature.to_feature(&config(&["a"])).unwrap_err();
		assert!(matches!(error_kind(&err), Some(GeobufError::MalformedWire(_))));
	}

	#[test]
	fn out_of_range_key_index_is_malformed() {
		let feature = with_properties(vec![3, 0], vec![GeobufValue::Bool(true)]);
		let err = feature.to_feature(&config(&["a"])).unwrap_err();
		assert!(matches!(error_kind(&err), Some(GeobufError::MalformedWire(_))));
	}

	#[test]
	fn odd_property_list_is_malformed() {
		let feature = with_properties(vec![0], vec![GeobufValue::Bool(true)]);
		let err = feature.to_feature(&config(&["a"])).unwrap_err();
		assert!(matches!(error_kind(&err), Some(GeobufError::MalformedWire(_))));
	}

	#[test]
	fn values_are_not_shared() -> Result<()> {
		let config = config(&["a", "b"]);
		let mut feature = GeoFeature::new(Geometry::new_point([0, 0]));
		feature.set_property("a".to_string(), GeoValue::from(1));
		feature.set_property("b".to_string(), GeoValue::from(1));
		let encoded = GeobufFeature::from_feature(&feature, &config)?;
		assert_eq!(encoded.values.len(), 2);
		assert_eq!(encoded.properties, vec![0, 0, 1, 1]);
		Ok(())
	}

	#[test]
	fn read_requires_geometry() {
		// only an integer id
		let data = [0x60, 0x02];
		let err = GeobufFeature::read(&mut ValueReaderSlice::new_le(&data)).unwrap_err();
		assert!(matches!(error_kind(&err), Some(GeobufError::MalformedWire(_))));
	}
}
