use super::{CompositeGeometryTrait, Coordinates, GeometryTrait, MultiLineStringGeometry, SingleGeometryTrait};
use std::fmt::Debug;

/// An ordered, open sequence of positions.
#[derive(Clone, PartialEq)]
pub struct LineStringGeometry(pub Vec<Coordinates>);

impl GeometryTrait for LineStringGeometry {
	fn iter_coords(&self) -> impl Iterator<Item = &Coordinates> {
		self.0.iter()
	}
}

impl SingleGeometryTrait<MultiLineStringGeometry> for LineStringGeometry {
	fn into_multi(self) -> MultiLineStringGeometry {
		MultiLineStringGeometry(vec![self])
	}
}

impl CompositeGeometryTrait<Coordinates> for LineStringGeometry {
	fn new() -> Self {
		Self(Vec::new())
	}
	fn as_vec(&self) -> &Vec<Coordinates> {
		&self.0
	}
	fn as_mut_vec(&mut self) -> &mut Vec<Coordinates> {
		&mut self.0
	}
	fn into_inner(self) -> Vec<Coordinates> {
		self.0
	}
}

impl Debug for LineStringGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(LineStringGeometry, Coordinates);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn from_vec_and_iter_coords() {
		let line = LineStringGeometry::from(vec![[1, 1], [2, 2], [3, 3]]);
		assert_eq!(line.len(), 3);
		let xs: Vec<f64> = line.iter_coords().map(Coordinates::x).collect();
		assert_eq!(xs, vec![1.0, 2.0, 3.0]);
	}

	#[test]
	fn empty_line_has_dimension_2() {
		assert_eq!(LineStringGeometry::new().dimension(), 2);
	}

	#[test]
	fn mixed_dimensions_report_widest() {
		let mut line = LineStringGeometry::from(&[[0, 0]]);
		line.push(Coordinates::new_3d(1.0, 1.0, 5.0));
		assert_eq!(line.dimension(), 3);
	}

	#[test]
	fn debug_format() {
		let line = LineStringGeometry::from(&[[1, 2], [3, 4]]);
		assert_eq!(format!("{line:?}"), "[[1.0, 2.0], [3.0, 4.0]]");
	}
}
