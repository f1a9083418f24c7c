use super::{CompositeGeometryTrait, Coordinates, GeometryTrait};
use std::fmt::Debug;

/// A closed loop of positions, the building block of polygons.
/// The first and last positions are expected to be identical.
#[derive(Clone, PartialEq)]
pub struct RingGeometry(pub Vec<Coordinates>);

impl RingGeometry {
	/// Returns `true` if the ring is empty or its last position repeats the first one.
	///
	/// A ring with a single position is not considered closed.
	#[must_use]
	pub fn is_closed(&self) -> bool {
		match self.0.as_slice() {
			[] => true,
			[_] => false,
			[first, .., last] => first == last,
		}
	}
}

impl GeometryTrait for RingGeometry {
	fn iter_coords(&self) -> impl Iterator<Item = &Coordinates> {
		self.0.iter()
	}
}

impl CompositeGeometryTrait<Coordinates> for RingGeometry {
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

impl Debug for RingGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(RingGeometry, Coordinates);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn closed_ring() {
		let ring = RingGeometry::from(&[[0, 0], [1, 0], [1, 1], [0, 0]]);
		assert!(ring.is_closed());
	}

	#[test]
	fn open_ring() {
		let ring = RingGeometry::from(&[[0, 0], [1, 0], [1, 1]]);
		assert!(!ring.is_closed());
	}

	#[test]
	fn degenerate_rings() {
		assert!(RingGeometry::new().is_closed());
		assert!(!RingGeometry::from(&[[0, 0]]).is_closed());
		assert!(RingGeometry::from(&[[0, 0], [0, 0]]).is_closed());
	}

	#[test]
	fn composite_push_and_last() {
		let mut ring = RingGeometry::new();
		ring.push(Coordinates::new(1.0, 2.0));
		ring.push(Coordinates::new(3.0, 4.0));
		assert_eq!(ring.len(), 2);
		assert_eq!(ring.last().map(Coordinates::x), Some(3.0));
	}
}
