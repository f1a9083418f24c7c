//! Geobuf transcoding.
//!
//! This module converts [`crate::geo::GeoObject`] values to and from the geobuf envelope
//! ([`GeobufData`]) and its protobuf encoding. It is organized into several submodules:
//!
//! - `analyze`: one pass over the input that infers precision, dimension and the key table.
//! - `config`: caller overrides, the key table and the per-call configuration.
//! - `coords`: quantization and delta coding of coordinate sequences.
//! - `value`: tagged property values.
//! - `geometry` / `geometry_type`: recursive geometry mapping.
//! - `feature`: geometry, identifier and properties of one feature.
//! - `data`: the envelope and its protobuf framing.
//! - `collection`: the `encode`/`decode` entry points.
//!
//! ```rust
//! use geobuf::{codec::{decode_blob, encode_to_blob}, geo::{GeoFeature, GeoObject}};
//!
//! let object = GeoObject::from(GeoFeature::new_example());
//! let blob = encode_to_blob(&object).unwrap();
//! assert_eq!(decode_blob(&blob).unwrap(), object);
//! ```

mod analyze;
mod collection;
mod config;
mod coords;
mod data;
mod error;
mod feature;
mod geometry;
mod geometry_type;
mod value;

pub use analyze::{PrecisionAnalysis, analyze};
pub use collection::{decode, decode_blob, encode, encode_to_blob, encode_with_options};
pub use config::*;
pub use coords::{decode_sequence, dequantize, encode_sequence, quantize};
pub use data::{GeobufData, GeobufDataType, GeobufFeatureCollection};
pub use error::{GeobufError, error_kind};
pub use feature::GeobufFeature;
pub use geometry::GeobufGeometry;
pub use geometry_type::GeomType;
pub use value::GeobufValue;
