use super::{GeoCollection, GeoFeature, Geometry};

/// The top-level value that can be encoded: a bare geometry, a single feature or a
/// feature collection.
#[derive(Clone, Debug, PartialEq)]
pub enum GeoObject {
	Geometry(Geometry),
	Feature(GeoFeature),
	FeatureCollection(GeoCollection),
}

impl GeoObject {
	#[must_use]
	pub fn type_name(&self) -> &'static str {
		match self {
			GeoObject::Geometry(g) => g.type_name(),
			GeoObject::Feature(_) => "Feature",
			GeoObject::FeatureCollection(_) => "FeatureCollection",
		}
	}
}

impl From<Geometry> for GeoObject {
	fn from(value: Geometry) -> Self {
		GeoObject::Geometry(value)
	}
}

impl From<GeoFeature> for GeoObject {
	fn from(value: GeoFeature) -> Self {
		GeoObject::Feature(value)
	}
}

impl From<GeoCollection> for GeoObject {
	fn from(value: GeoCollection) -> Self {
		GeoObject::FeatureCollection(value)
	}
}
