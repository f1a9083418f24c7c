//! Tagged property values as they appear on the wire.
//!
//! Field layout of the `Value` message:
//!  * field 1: `string_value` (string)
//!  * field 2: `double_value` (double)
//!  * field 3: `pos_int_value` (uint64)
//!  * field 4: `neg_int_value` (uint64, magnitude of a negative integer)
//!  * field 5: `bool_value` (bool)
//!  * field 6: `json_value` (string, anything without a scalar representation)

use super::GeobufError;
use crate::geo::GeoValue;
use anyhow::{Context, Result, bail};
use byteorder::LE;
use geobuf_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};
use log::trace;

#[derive(Clone, Debug, PartialEq)]
pub enum GeobufValue {
	String(String),
	Double(f64),
	PosInt(u64),
	NegInt(u64),
	Bool(bool),
	Json(String),
}

impl GeobufValue {
	/// Tags a property value.
	///
	/// `Float` widens to `Double`. `Null` and `Json` are stored as JSON text.
	pub fn from_value(value: &GeoValue) -> Result<GeobufValue> {
		Ok(match value {
			GeoValue::Bool(v) => GeobufValue::Bool(*v),
			GeoValue::Int(v) if *v < 0 => GeobufValue::NegInt(v.unsigned_abs()),
			GeoValue::Int(v) => GeobufValue::PosInt(v.unsigned_abs()),
			GeoValue::UInt(v) => GeobufValue::PosInt(*v),
			GeoValue::Float(v) => GeobufValue::Double(f64::from(*v)),
			GeoValue::Double(v) => GeobufValue::Double(*v),
			GeoValue::String(v) => GeobufValue::String(v.clone()),
			GeoValue::Null => GeobufValue::Json(json_text(&serde_json::Value::Null)?),
			GeoValue::Json(v) => GeobufValue::Json(json_text(v)?),
		})
	}

	/// Reverses [`GeobufValue::from_value`], normalizing on the way:
	/// positive integers come back as `UInt`, a `Float` comes back as `Double`, and
	/// `Json(null)` comes back as `Null`.
	pub fn to_value(&self) -> Result<GeoValue> {
		Ok(match self {
			GeobufValue::String(v) => GeoValue::String(v.clone()),
			GeobufValue::Double(v) => GeoValue::Double(*v),
			GeobufValue::PosInt(v) => GeoValue::UInt(*v),
			GeobufValue::NegInt(magnitude) => GeoValue::Int(0i64.checked_sub_unsigned(*magnitude).ok_or_else(|| {
				GeobufError::malformed(format!("negative integer magnitude {magnitude} does not fit 64 bits"))
			})?),
			GeobufValue::Bool(v) => GeoValue::Bool(*v),
			GeobufValue::Json(text) => GeoValue::from(
				serde_json::from_str::<serde_json::Value>(text)
					.map_err(|e| GeobufError::malformed(format!("invalid JSON property value: {e}")))?,
			),
		})
	}

	/// Decodes a `Value` message. If several value fields are present, the last one wins.
	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<GeobufValue> {
		let mut value: Option<GeobufValue> = None;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => {
					value = Some(GeobufValue::String(
						reader.read_pbf_string().context("Failed to read string value")?,
					));
				}
				(2, 1) => value = Some(GeobufValue::Double(reader.read_f64().context("Failed to read double value")?)),
				(3, 0) => {
					value = Some(GeobufValue::PosInt(
						reader.read_varint().context("Failed to read positive integer value")?,
					));
				}
				(4, 0) => {
					value = Some(GeobufValue::NegInt(
						reader.read_varint().context("Failed to read negative integer value")?,
					));
				}
				(5, 0) => value = Some(GeobufValue::Bool(reader.read_varint().context("Failed to read bool value")? != 0)),
				(6, 2) => {
					value = Some(GeobufValue::Json(
						reader.read_pbf_string().context("Failed to read JSON value")?,
					));
				}
				(f, w) => {
					trace!("skipping value field {f} with wire type {w}");
					reader.skip_pbf_field(w).context("Failed to skip unknown value field")?;
				}
			}
		}

		match value {
			Some(value) => Ok(value),
			None => bail!(GeobufError::malformed("value message without content")),
		}
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		match self {
			GeobufValue::String(s) => {
				writer.write_pbf_key(1, 2).context("Failed to write PBF key for string value")?;
				writer.write_pbf_string(s).context("Failed to write string value")?;
			}
			GeobufValue::Double(f) => {
				writer.write_pbf_key(2, 1).context("Failed to write PBF key for double value")?;
				writer.write_f64(*f).context("Failed to write double value")?;
			}
			GeobufValue::PosInt(u) => {
				writer
					.write_pbf_key(3, 0)
					.context("Failed to write PBF key for positive integer value")?;
				writer.write_varint(*u).context("Failed to write positive integer value")?;
			}
			GeobufValue::NegInt(u) => {
				writer
					.write_pbf_key(4, 0)
					.context("Failed to write PBF key for negative integer value")?;
				writer.write_varint(*u).context("Failed to write negative integer value")?;
			}
			GeobufValue::Bool(b) => {
				writer.write_pbf_key(5, 0).context("Failed to write PBF key for bool value")?;
				writer.write_varint(u64::from(*b)).context("Failed to write bool value")?;
			}
			GeobufValue::Json(s) => {
				writer.write_pbf_key(6, 2).context("Failed to write PBF key for JSON value")?;
				writer.write_pbf_string(s).context("Failed to write JSON value")?;
			}
		}

		Ok(writer.into_blob())
	}
}

fn json_text(value: &serde_json::Value) -> Result<String> {
	serde_json::to_string(value).map_err(|e| GeobufError::FallbackSerialization(e.to_string()).into())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::codec::error_kind;
	use geobuf_core::io::ValueReaderSlice;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(GeoValue::from(true), GeobufValue::Bool(true))]
	#[case(GeoValue::Int(-5), GeobufValue::NegInt(5))]
	#[case(GeoValue::Int(5), GeobufValue::PosInt(5))]
	#[case(GeoValue::Int(i64::MIN), GeobufValue::NegInt(1 << 63))]
	#[case(GeoValue::UInt(u64::MAX), GeobufValue::PosInt(u64::MAX))]
	#[case(GeoValue::Float(1.5), GeobufValue::Double(1.5))]
	#[case(GeoValue::Double(-0.25), GeobufValue::Double(-0.25))]
	#[case(GeoValue::from("Nice"), GeobufValue::String("Nice".to_string()))]
	#[case(GeoValue::Null, GeobufValue::Json("null".to_string()))]
	#[case(GeoValue::Json(json!({"a": [1, 2]})), GeobufValue::Json(r#"{"a":[1,2]}"#.to_string()))]
	fn tagging(#[case] value: GeoValue, #[case] expected: GeobufValue) -> Result<()> {
		assert_eq!(GeobufValue::from_value(&value)?, expected);
		Ok(())
	}

	#[test]
	fn negative_integer_round_trip() -> Result<()> {
		let tagged = GeobufValue::from_value(&GeoValue::Int(-5))?;
		assert_eq!(tagged.to_value()?, GeoValue::Int(-5));
		assert_eq!(GeobufValue::NegInt(1 << 63).to_value()?, GeoValue::Int(i64::MIN));
		Ok(())
	}

	#[test]
	fn non_negative_integers_become_unsigned() -> Result<()> {
		let tagged = GeobufValue::from_value(&GeoValue::Int(5))?;
		assert_eq!(tagged.to_value()?, GeoValue::UInt(5));
		Ok(())
	}

	#[test]
	fn float_and_json_null_are_normalized() -> Result<()> {
		let tagged = GeobufValue::from_value(&GeoValue::Float(1.5))?;
		assert_eq!(tagged.to_value()?, GeoValue::Double(1.5));
		let tagged = GeobufValue::from_value(&GeoValue::Json(serde_json::Value::Null))?;
		assert_eq!(tagged.to_value()?, GeoValue::Null);
		Ok(())
	}

	#[test]
	fn json_values_come_back_structured() -> Result<()> {
		assert_eq!(GeobufValue::Json("null".to_string()).to_value()?, GeoValue::Null);
		assert_eq!(
			GeobufValue::Json("[1,\"x\"]".to_string()).to_value()?,
			GeoValue::Json(json!([1, "x"]))
		);
		Ok(())
	}

	#[test]
	fn invalid_values_are_malformed() {
		for value in [GeobufValue::NegInt(u64::MAX), GeobufValue::Json("{not json".to_string())] {
			let err = value.to_value().unwrap_err();
			assert!(matches!(error_kind(&err), Some(GeobufError::MalformedWire(_))));
		}
	}

	#[test]
	fn neg_int_wire_format() -> Result<()> {
		let blob = GeobufValue::NegInt(5).to_blob()?;
		assert_eq!(blob.as_slice(), &[0x20, 0x05]);
		let mut reader = ValueReaderSlice::new_le(blob.as_slice());
		assert_eq!(GeobufValue::read(&mut reader)?, GeobufValue::NegInt(5));
		Ok(())
	}

	#[test]
	fn read_string() -> Result<()> {
		let data = vec![
			0x0A, // PBF key (field number 1, wire type 2)
			0x05, // Length of the string
			b'h', b'e', b'l', b'l', b'o',
		];
		let mut reader = ValueReaderSlice::new_le(&data);
		assert_eq!(GeobufValue::read(&mut reader)?, GeobufValue::String("hello".to_string()));
		Ok(())
	}

	#[test]
	fn read_skips_unknown_fields() -> Result<()> {
		// field 9 varint 1, then field 5 (bool) true
		let data = vec![0x48, 0x01, 0x28, 0x01];
		let mut reader = ValueReaderSlice::new_le(&data);
		assert_eq!(GeobufValue::read(&mut reader)?, GeobufValue::Bool(true));
		Ok(())
	}

	#[test]
	fn read_empty_message_fails() {
		let mut reader = ValueReaderSlice::new_le(&[]);
		let err = GeobufValue::read(&mut reader).unwrap_err();
		assert!(matches!(error_kind(&err), Some(GeobufError::MalformedWire(_))));
	}

	#[test]
	fn double_wire_format() -> Result<()> {
		let blob = GeobufValue::Double(1.0).to_blob()?;
		assert_eq!(blob.as_slice(), &[0x11, 0, 0, 0, 0, 0, 0, 0xF0, 0x3F]);
		Ok(())
	}
}
