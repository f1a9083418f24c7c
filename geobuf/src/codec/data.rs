//! The top-level geobuf envelope.
//!
//! Field layout of the `Data` message:
//!  * field 1: repeated `keys` (string)
//!  * field 2: `dimensions` (uint32, default 2)
//!  * field 3: `precision` (uint32, decimal digits, default 6)
//!  * field 4: `feature_collection` (embedded message)
//!  * field 5: `feature` (embedded message)
//!  * field 6: `geometry` (embedded message)
//!
//! Exactly one of fields 4 to 6 carries the payload.

use super::{
	DEFAULT_DIMENSION, DEFAULT_PRECISION, GeobufError, feature::GeobufFeature, geometry::GeobufGeometry,
};
use anyhow::{Context, Result};
use byteorder::LE;
use geobuf_core::{
	Blob,
	io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob},
};
use log::trace;

/// A list of encoded features (`FeatureCollection` message, field 1: repeated `features`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeobufFeatureCollection {
	pub features: Vec<GeobufFeature>,
}

impl GeobufFeatureCollection {
	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<GeobufFeatureCollection> {
		let mut features = Vec::new();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => {
					let mut sub_reader = reader.get_pbf_sub_reader().context("Failed to get PBF sub-reader")?;
					features.push(
						GeobufFeature::read(sub_reader.as_mut())
							.with_context(|| format!("Failed to read feature {}", features.len()))?,
					);
				}
				(f, w) => {
					trace!("skipping feature collection field {f} with wire type {w}");
					reader
						.skip_pbf_field(w)
						.context("Failed to skip unknown feature collection field")?;
				}
			}
		}

		Ok(GeobufFeatureCollection { features })
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();
		for feature in &self.features {
			writer
				.write_pbf_key(1, 2)
				.context("Failed to write PBF key for feature")?;
			writer
				.write_pbf_blob(&feature.to_blob().context("Failed to encode feature")?)
				.context("Failed to write feature")?;
		}
		Ok(writer.into_blob())
	}
}

/// The payload of an envelope.
#[derive(Clone, Debug, PartialEq)]
pub enum GeobufDataType {
	FeatureCollection(GeobufFeatureCollection),
	Feature(GeobufFeature),
	Geometry(GeobufGeometry),
}

/// The geobuf envelope: key table, coordinate parameters and payload.
#[derive(Clone, Debug, PartialEq)]
pub struct GeobufData {
	pub keys: Vec<String>,
	pub dimensions: u32,
	pub precision: u32,
	pub data_type: Option<GeobufDataType>,
}

impl Default for GeobufData {
	fn default() -> Self {
		GeobufData {
			keys: Vec::new(),
			dimensions: DEFAULT_DIMENSION,
			precision: DEFAULT_PRECISION,
			data_type: None,
		}
	}
}

impl GeobufData {
	/// Parses an encoded envelope.
	///
	/// Any failure that is not already categorized is reported as
	/// [`GeobufError::MalformedWire`].
	pub fn from_blob(blob: &Blob) -> Result<GeobufData> {
		let mut reader = ValueReaderSlice::new_le(blob.as_slice());
		GeobufData::read(&mut reader).map_err(|err| {
			if err.downcast_ref::<GeobufError>().is_some() {
				err
			} else {
				let message = format!("{err:#}");
				err.context(GeobufError::MalformedWire(message))
			}
		})
	}

	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<GeobufData> {
		let mut data = GeobufData::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => data.keys.push(reader.read_pbf_string().context("Failed to read key")?),
				(2, 0) => data.dimensions = read_u32(reader).context("Failed to read dimensions")?,
				(3, 0) => data.precision = read_u32(reader).context("Failed to read precision")?,
				(4, 2) => {
					let mut sub_reader = reader.get_pbf_sub_reader().context("Failed to get PBF sub-reader")?;
					data.data_type = Some(GeobufDataType::FeatureCollection(
						GeobufFeatureCollection::read(sub_reader.as_mut()).context("Failed to read feature collection")?,
					));
				}
				(5, 2) => {
					let mut sub_reader = reader.get_pbf_sub_reader().context("Failed to get PBF sub-reader")?;
					data.data_type = Some(GeobufDataType::Feature(
						GeobufFeature::read(sub_reader.as_mut()).context("Failed to read feature")?,
					));
				}
				(6, 2) => {
					let mut sub_reader = reader.get_pbf_sub_reader().context("Failed to get PBF sub-reader")?;
					data.data_type = Some(GeobufDataType::Geometry(
						GeobufGeometry::read(sub_reader.as_mut(), 0).context("Failed to read geometry")?,
					));
				}
				(f, w) => {
					trace!("skipping data field {f} with wire type {w}");
					reader.skip_pbf_field(w).context("Failed to skip unknown data field")?;
				}
			}
		}

		Ok(data)
	}

	/// Encodes the envelope. Default `dimensions` and `precision` are left out.
	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		for key in &self.keys {
			writer.write_pbf_key(1, 2).context("Failed to write PBF key for key")?;
			writer.write_pbf_string(key).context("Failed to write key")?;
		}

		if self.dimensions != DEFAULT_DIMENSION {
			writer
				.write_pbf_key(2, 0)
				.context("Failed to write PBF key for dimensions")?;
			writer
				.write_varint(u64::from(self.dimensions))
				.context("Failed to write dimensions")?;
		}

		if self.precision != DEFAULT_PRECISION {
			writer
				.write_pbf_key(3, 0)
				.context("Failed to write PBF key for precision")?;
			writer
				.write_varint(u64::from(self.precision))
				.context("Failed to write precision")?;
		}

		let (field, blob) = match &self.data_type {
			Some(GeobufDataType::FeatureCollection(collection)) => (4, collection.to_blob()?),
			Some(GeobufDataType::Feature(feature)) => (5, feature.to_blob()?),
			Some(GeobufDataType::Geometry(geometry)) => (6, geometry.to_blob()?),
			None => return Ok(writer.into_blob()),
		};
		writer
			.write_pbf_key(field, 2)
			.context("Failed to write PBF key for payload")?;
		writer.write_pbf_blob(&blob).context("Failed to write payload")?;

		Ok(writer.into_blob())
	}
}

fn read_u32(reader: &mut dyn ValueReader<'_, LE>) -> Result<u32> {
	let value = reader.read_varint()?;
	u32::try_from(value).map_err(|_| GeobufError::malformed(format!("value {value} exceeds 32 bits")).into())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::codec::{error_kind, geometry_type::GeomType};
	use pretty_assertions::assert_eq;

	fn point_data() -> GeobufData {
		GeobufData {
			data_type: Some(GeobufDataType::Geometry(GeobufGeometry {
				geom_type: GeomType::Point,
				coords: vec![1, 2],
				..Default::default()
			})),
			..Default::default()
		}
	}

	#[test]
	fn defaults_are_elided() -> Result<()> {
		let blob = point_data().to_blob()?;
		// field 6 containing: type POINT, packed coords [1, 2]
		assert_eq!(blob.as_slice(), &[0x32, 0x06, 0x08, 0x00, 0x1A, 0x02, 0x02, 0x04]);
		assert_eq!(GeobufData::from_blob(&blob)?, point_data());
		Ok(())
	}

	#[test]
	fn explicit_parameters_round_trip() -> Result<()> {
		let data = GeobufData {
			keys: vec!["a".to_string(), "b".to_string()],
			dimensions: 3,
			precision: 0,
			..point_data()
		};
		let blob = data.to_blob()?;
		assert_eq!(&blob.as_slice()[..10], &[0x0A, 0x01, b'a', 0x0A, 0x01, b'b', 0x10, 0x03, 0x18, 0x00]);
		assert_eq!(GeobufData::from_blob(&blob)?, data);
		Ok(())
	}

	#[test]
	fn feature_collection_round_trip() -> Result<()> {
		let data = GeobufData {
			data_type: Some(GeobufDataType::FeatureCollection(GeobufFeatureCollection {
				features: vec![
					GeobufFeature {
						geometry: GeobufGeometry {
							geom_type: GeomType::Point,
							coords: vec![0, 0],
							..Default::default()
						},
						..Default::default()
					};
					3
				],
			})),
			..Default::default()
		};
		assert_eq!(GeobufData::from_blob(&data.to_blob()?)?, data);
		Ok(())
	}

	#[test]
	fn empty_blob_has_no_payload() -> Result<()> {
		let data = GeobufData::from_blob(&Blob::new_empty())?;
		assert_eq!(data, GeobufData::default());
		Ok(())
	}

	#[test]
	fn unknown_fields_are_skipped() -> Result<()> {
		let mut bytes = vec![0x78, 0x01, 0x3A, 0x01, 0xFF]; // field 15 varint, field 7 bytes
		bytes.extend_from_slice(point_data().to_blob()?.as_slice());
		assert_eq!(GeobufData::from_blob(&Blob::from(bytes))?, point_data());
		Ok(())
	}

	#[test]
	fn truncated_bytes_are_malformed() -> Result<()> {
		let blob = point_data().to_blob()?;
		for end in 1..blob.len() as usize {
			let truncated = Blob::from(&blob.as_slice()[..end]);
			let err = GeobufData::from_blob(&truncated).unwrap_err();
			assert!(
				matches!(error_kind(&err), Some(GeobufError::MalformedWire(_))),
				"cut at {end}: {err:#}"
			);
		}
		Ok(())
	}

	#[test]
	fn invalid_utf8_key_is_malformed() {
		let blob = Blob::from(vec![0x0A, 0x02, 0xC3, 0x28]);
		let err = GeobufData::from_blob(&blob).unwrap_err();
		assert!(matches!(error_kind(&err), Some(GeobufError::MalformedWire(_))));
	}
}
