use super::{Coordinates, GeometryTrait, MultiPointGeometry, SingleGeometryTrait};
use std::fmt::Debug;

/// A single position. The simplest geometry and the building block of `MultiPointGeometry`.
#[derive(Clone, PartialEq)]
pub struct PointGeometry(pub Coordinates);

impl PointGeometry {
	#[must_use]
	pub fn new(c: Coordinates) -> Self {
		Self(c)
	}
	#[must_use]
	pub fn x(&self) -> f64 {
		self.0.x()
	}
	#[must_use]
	pub fn y(&self) -> f64 {
		self.0.y()
	}
	#[must_use]
	pub fn as_coord(&self) -> &Coordinates {
		&self.0
	}
}

impl GeometryTrait for PointGeometry {
	fn iter_coords(&self) -> impl Iterator<Item = &Coordinates> {
		std::iter::once(&self.0)
	}
}

impl SingleGeometryTrait<MultiPointGeometry> for PointGeometry {
	fn into_multi(self) -> MultiPointGeometry {
		MultiPointGeometry(vec![self])
	}
}

impl Debug for PointGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

impl<T> From<T> for PointGeometry
where
	Coordinates: From<T>,
{
	fn from(value: T) -> Self {
		Self(Coordinates::from(value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geo::CompositeGeometryTrait;

	#[test]
	fn new_and_accessors() {
		let point = PointGeometry::new(Coordinates::new(1.0, 2.0));
		assert_eq!(point.x(), 1.0);
		assert_eq!(point.y(), 2.0);
		assert_eq!(point.as_coord(), &Coordinates::new(1.0, 2.0));
	}

	#[test]
	fn debug_format() {
		assert_eq!(format!("{:?}", PointGeometry::from(&[1, 2])), "[1.0, 2.0]");
	}

	#[test]
	fn dimension_follows_coordinate() {
		assert_eq!(PointGeometry::from([1, 2]).dimension(), 2);
		assert_eq!(PointGeometry::from([1, 2, 3]).dimension(), 3);
	}

	#[test]
	fn into_multi() {
		let p = PointGeometry::from(&[1, 2]);
		let multi = p.clone().into_multi();
		assert_eq!(multi.len(), 1);
		assert_eq!(multi.first(), Some(&p));
	}
}
