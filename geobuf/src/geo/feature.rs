use super::*;
use std::fmt::{Debug, Display};

/// A feature identifier: either a string or an integer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeoId {
	Int(i64),
	String(String),
}

impl Display for GeoId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			GeoId::Int(v) => write!(f, "{v}"),
			GeoId::String(v) => f.write_str(v),
		}
	}
}

impl From<i64> for GeoId {
	fn from(value: i64) -> Self {
		GeoId::Int(value)
	}
}

impl From<&str> for GeoId {
	fn from(value: &str) -> Self {
		GeoId::String(value.to_string())
	}
}

impl From<String> for GeoId {
	fn from(value: String) -> Self {
		GeoId::String(value)
	}
}

/// A geometry with an optional identifier and ordered properties.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoFeature {
	pub id: Option<GeoId>,
	pub geometry: Geometry,
	pub properties: GeoProperties,
}

impl GeoFeature {
	#[must_use]
	pub fn new(geometry: Geometry) -> Self {
		Self {
			id: None,
			geometry,
			properties: GeoProperties::new(),
		}
	}

	pub fn set_id<T>(&mut self, id: T)
	where
		GeoId: From<T>,
	{
		self.id = Some(GeoId::from(id));
	}

	pub fn set_properties(&mut self, properties: GeoProperties) {
		self.properties = properties;
	}

	pub fn set_property<T>(&mut self, key: String, value: T)
	where
		GeoValue: From<T>,
	{
		self.properties.insert(key, GeoValue::from(value));
	}

	pub fn new_example() -> Self {
		Self {
			id: Some(GeoId::Int(13)),
			geometry: Geometry::new_example(),
			properties: GeoProperties::from(vec![
				("name", GeoValue::from("Nice")),
				("population", GeoValue::from(348085)),
				("is_nice", GeoValue::from(true)),
			]),
		}
	}
}
