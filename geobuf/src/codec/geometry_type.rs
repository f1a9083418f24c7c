use super::GeobufError;
use crate::geo::Geometry;
use anyhow::{Result, bail};

/// Wire-level geometry type (`Geometry.type`, field 1).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GeomType {
	#[default]
	Point = 0,
	MultiPoint = 1,
	LineString = 2,
	MultiLineString = 3,
	Polygon = 4,
	MultiPolygon = 5,
	GeometryCollection = 6,
}

impl GeomType {
	pub fn as_u64(&self) -> u64 {
		*self as u64
	}
}

impl TryFrom<u64> for GeomType {
	type Error = anyhow::Error;

	fn try_from(value: u64) -> Result<Self> {
		Ok(match value {
			0 => GeomType::Point,
			1 => GeomType::MultiPoint,
			2 => GeomType::LineString,
			3 => GeomType::MultiLineString,
			4 => GeomType::Polygon,
			5 => GeomType::MultiPolygon,
			6 => GeomType::GeometryCollection,
			_ => bail!(GeobufError::malformed(format!("unknown geometry type {value}"))),
		})
	}
}

impl From<&Geometry> for GeomType {
	fn from(geometry: &Geometry) -> Self {
		match geometry {
			Geometry::Point(_) => GeomType::Point,
			Geometry::MultiPoint(_) => GeomType::MultiPoint,
			Geometry::LineString(_) => GeomType::LineString,
			Geometry::MultiLineString(_) => GeomType::MultiLineString,
			Geometry::Polygon(_) => GeomType::Polygon,
			Geometry::MultiPolygon(_) => GeomType::MultiPolygon,
			Geometry::GeometryCollection(_) => GeomType::GeometryCollection,
		}
	}
}
