use super::*;
use std::fmt::Debug;

/// Any supported geometry. `GeometryCollection` owns its children, so the tree has no cycles.
#[derive(Clone, PartialEq)]
pub enum Geometry {
	Point(PointGeometry),
	LineString(LineStringGeometry),
	Polygon(PolygonGeometry),
	MultiPoint(MultiPointGeometry),
	MultiLineString(MultiLineStringGeometry),
	MultiPolygon(MultiPolygonGeometry),
	GeometryCollection(Vec<Geometry>),
}

impl Geometry {
	pub fn new_point<T>(value: T) -> Self
	where
		PointGeometry: From<T>,
	{
		Self::Point(PointGeometry::from(value))
	}
	pub fn new_line_string<T>(value: Vec<T>) -> Self
	where
		LineStringGeometry: From<Vec<T>>,
	{
		Self::LineString(LineStringGeometry::from(value))
	}
	pub fn new_polygon<T>(value: Vec<T>) -> Self
	where
		PolygonGeometry: From<Vec<T>>,
	{
		Self::Polygon(PolygonGeometry::from(value))
	}
	pub fn new_multi_point<T>(value: Vec<T>) -> Self
	where
		MultiPointGeometry: From<Vec<T>>,
	{
		Self::MultiPoint(MultiPointGeometry::from(value))
	}
	pub fn new_multi_line_string<T>(value: Vec<T>) -> Self
	where
		MultiLineStringGeometry: From<Vec<T>>,
	{
		Self::MultiLineString(MultiLineStringGeometry::from(value))
	}
	pub fn new_multi_polygon<T>(value: Vec<T>) -> Self
	where
		MultiPolygonGeometry: From<Vec<T>>,
	{
		Self::MultiPolygon(MultiPolygonGeometry::from(value))
	}
	pub fn new_collection(children: Vec<Geometry>) -> Self {
		Self::GeometryCollection(children)
	}

	#[must_use]
	pub fn type_name(&self) -> &'static str {
		match self {
			Geometry::Point(_) => "Point",
			Geometry::LineString(_) => "LineString",
			Geometry::Polygon(_) => "Polygon",
			Geometry::MultiPoint(_) => "MultiPoint",
			Geometry::MultiLineString(_) => "MultiLineString",
			Geometry::MultiPolygon(_) => "MultiPolygon",
			Geometry::GeometryCollection(_) => "GeometryCollection",
		}
	}

	/// Wraps single geometries into their multi counterpart. Multi geometries and
	/// collections are returned unchanged.
	pub fn into_multi(self) -> Self {
		match self {
			Geometry::Point(g) => Geometry::MultiPoint(g.into_multi()),
			Geometry::LineString(g) => Geometry::MultiLineString(g.into_multi()),
			Geometry::Polygon(g) => Geometry::MultiPolygon(g.into_multi()),
			Geometry::MultiPoint(_)
			| Geometry::MultiLineString(_)
			| Geometry::MultiPolygon(_)
			| Geometry::GeometryCollection(_) => self,
		}
	}

	/// Iterates over every coordinate, descending into collections.
	pub fn iter_coords(&self) -> Box<dyn Iterator<Item = &Coordinates> + '_> {
		match self {
			Geometry::Point(g) => Box::new(g.iter_coords()),
			Geometry::LineString(g) => Box::new(g.iter_coords()),
			Geometry::Polygon(g) => Box::new(g.iter_coords()),
			Geometry::MultiPoint(g) => Box::new(g.iter_coords()),
			Geometry::MultiLineString(g) => Box::new(g.iter_coords()),
			Geometry::MultiPolygon(g) => Box::new(g.iter_coords()),
			Geometry::GeometryCollection(children) => Box::new(children.iter().flat_map(Geometry::iter_coords)),
		}
	}

	pub fn new_example() -> Self {
		Self::new_multi_polygon(vec![
			vec![
				vec![[0.0, 0.0], [5.0, 0.0], [2.5, 4.0], [0.0, 0.0]],
				vec![[2.0, 1.0], [2.5, 2.0], [3.0, 1.0], [2.0, 1.0]],
			],
			vec![
				vec![[6.0, 0.0], [9.0, 0.0], [9.0, 4.0], [6.0, 4.0], [6.0, 0.0]],
				vec![[7.0, 1.0], [7.0, 3.0], [8.0, 3.0], [8.0, 1.0], [7.0, 1.0]],
			],
		])
	}
}

impl Debug for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner: &dyn Debug = match self {
			Geometry::Point(g) => g,
			Geometry::LineString(g) => g,
			Geometry::Polygon(g) => g,
			Geometry::MultiPoint(g) => g,
			Geometry::MultiLineString(g) => g,
			Geometry::MultiPolygon(g) => g,
			Geometry::GeometryCollection(g) => g,
		};
		f.debug_tuple(self.type_name()).field(inner).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn into_multi_wraps_singles() {
		assert_eq!(
			Geometry::new_point([1, 2]).into_multi(),
			Geometry::new_multi_point(vec![[1, 2]])
		);
		assert_eq!(
			Geometry::new_line_string(vec![[1, 2], [3, 4]]).into_multi(),
			Geometry::new_multi_line_string(vec![vec![[1, 2], [3, 4]]])
		);
		let collection = Geometry::new_collection(vec![]);
		assert_eq!(collection.clone().into_multi(), collection);
	}

	#[test]
	fn iter_coords_descends_into_collections() {
		let geometry = Geometry::new_collection(vec![
			Geometry::new_point([1, 2]),
			Geometry::new_collection(vec![Geometry::new_line_string(vec![[3, 4], [5, 6]])]),
		]);
		let xs: Vec<f64> = geometry.iter_coords().map(Coordinates::x).collect();
		assert_eq!(xs, vec![1.0, 3.0, 5.0]);
	}

	#[test]
	fn debug_format() {
		assert_eq!(format!("{:?}", Geometry::new_point([1, 2])), "Point([1.0, 2.0])");
		assert_eq!(
			format!("{:?}", Geometry::new_collection(vec![Geometry::new_point([1, 2])])),
			"GeometryCollection([Point([1.0, 2.0])])"
		);
	}

	#[test]
	fn example_has_two_polygons() {
		let Geometry::MultiPolygon(multi) = Geometry::new_example() else {
			panic!("expected a MultiPolygon");
		};
		assert_eq!(multi.len(), 2);
	}
}
