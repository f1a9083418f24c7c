//! In-memory model of geographic features: coordinates, geometries, property values,
//! features and collections.
//!
//! Everything here is plain owned data. The [`crate::codec`] module converts between this
//! model and the geobuf envelope.

#![allow(clippy::module_inception)]

mod collection;
mod feature;
mod geometry;
mod object;
mod properties;
mod types;
mod value;

pub use collection::*;
pub use feature::*;
pub use geometry::*;
pub use object::*;
pub use properties::*;
pub use types::*;
pub use value::*;
