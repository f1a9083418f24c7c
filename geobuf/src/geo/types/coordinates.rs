use std::fmt::Debug;

/// A position with two axes (x, y) and an optional third axis (z).
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinates {
	xy: [f64; 2],
	z: Option<f64>,
}

impl Coordinates {
	#[must_use]
	pub fn new(x: f64, y: f64) -> Self {
		Self { xy: [x, y], z: None }
	}

	#[must_use]
	pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
		Self { xy: [x, y], z: Some(z) }
	}

	#[must_use]
	pub fn x(&self) -> f64 {
		self.xy[0]
	}

	#[must_use]
	pub fn y(&self) -> f64 {
		self.xy[1]
	}

	#[must_use]
	pub fn z(&self) -> Option<f64> {
		self.z
	}

	/// Number of axes: 2 or 3.
	#[must_use]
	pub fn dimension(&self) -> usize {
		if self.z.is_some() { 3 } else { 2 }
	}

	/// Returns the value of axis `axis` (0 = x, 1 = y, 2 = z), or `None` if the axis is not present.
	#[must_use]
	pub fn get(&self, axis: usize) -> Option<f64> {
		match axis {
			0 | 1 => Some(self.xy[axis]),
			2 => self.z,
			_ => None,
		}
	}

	/// Iterates over the present axis values.
	pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
		self.xy.iter().copied().chain(self.z)
	}
}

impl<T> From<[T; 2]> for Coordinates
where
	T: Copy + Into<f64>,
{
	fn from(value: [T; 2]) -> Self {
		Coordinates::new(value[0].into(), value[1].into())
	}
}

impl<'a, T> From<&'a [T; 2]> for Coordinates
where
	T: Copy + Into<f64>,
{
	fn from(value: &'a [T; 2]) -> Self {
		Coordinates::new(value[0].into(), value[1].into())
	}
}

impl<T> From<[T; 3]> for Coordinates
where
	T: Copy + Into<f64>,
{
	fn from(value: [T; 3]) -> Self {
		Coordinates::new_3d(value[0].into(), value[1].into(), value[2].into())
	}
}

impl<'a, T> From<&'a [T; 3]> for Coordinates
where
	T: Copy + Into<f64>,
{
	fn from(value: &'a [T; 3]) -> Self {
		Coordinates::new_3d(value[0].into(), value[1].into(), value[2].into())
	}
}

impl From<(f64, f64)> for Coordinates {
	fn from(value: (f64, f64)) -> Self {
		Coordinates::new(value.0, value.1)
	}
}

impl From<&(f64, f64)> for Coordinates {
	fn from(value: &(f64, f64)) -> Self {
		Coordinates::new(value.0, value.1)
	}
}

impl From<(f64, f64, f64)> for Coordinates {
	fn from(value: (f64, f64, f64)) -> Self {
		Coordinates::new_3d(value.0, value.1, value.2)
	}
}

impl Debug for Coordinates {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}
