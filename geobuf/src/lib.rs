//! Compact binary encoding of geographic features ("geobuf").
//!
//! The [`geo`] module holds the in-memory model (geometries, features, property values), the
//! [`codec`] module converts it to and from the geobuf envelope with adaptive decimal
//! precision and delta-compressed coordinates.

pub mod codec;
pub mod geo;

pub use codec::{GeobufData, GeobufError, decode, decode_blob, encode, encode_to_blob, encode_with_options};
pub use geobuf_core::Blob;
