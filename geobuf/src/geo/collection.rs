use super::GeoFeature;

/// An ordered list of features.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeoCollection {
	pub features: Vec<GeoFeature>,
}

impl GeoCollection {
	#[must_use]
	pub fn new() -> Self {
		Self { features: Vec::new() }
	}

	pub fn push(&mut self, feature: GeoFeature) {
		self.features.push(feature);
	}
}

impl From<Vec<GeoFeature>> for GeoCollection {
	fn from(features: Vec<GeoFeature>) -> Self {
		Self { features }
	}
}

impl FromIterator<GeoFeature> for GeoCollection {
	fn from_iter<T: IntoIterator<Item = GeoFeature>>(iter: T) -> Self {
		Self {
			features: iter.into_iter().collect(),
		}
	}
}
