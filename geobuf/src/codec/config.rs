//! Encoding parameters: caller overrides ([`EncodingOptions`]), the shared property key
//! table ([`KeyTable`]) and the per-call [`EncodingConfig`].

use super::GeobufError;
use anyhow::{Result, ensure};
use std::{collections::HashMap, fmt::Debug};

/// Default upper bound for inferred precision, in decimal digits.
pub const DEFAULT_MAX_PRECISION: u8 = 8;
/// Largest precision accepted anywhere; `10^15` still fits an `f64` mantissa exactly.
pub const MAX_PRECISION_LIMIT: u8 = 15;
/// Maximum nesting of geometry collections.
pub const MAX_GEOMETRY_DEPTH: usize = 32;
/// Precision assumed when the envelope does not carry one.
pub const DEFAULT_PRECISION: u32 = 6;
/// Dimension assumed when the envelope does not carry one.
pub const DEFAULT_DIMENSION: u32 = 2;

/// Caller overrides for [`crate::codec::encode_with_options`].
///
/// ```rust
/// use geobuf::codec::EncodingOptions;
///
/// let options = EncodingOptions::default().with_precision(2).with_dimension(3);
/// assert_eq!(options.precision, Some(2));
/// assert_eq!(options.max_precision, 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodingOptions {
	/// Fixed precision in decimal digits. Skips precision inference when set.
	pub precision: Option<u8>,
	/// Fixed coordinate dimension (2 or 3). Inferred from the input when unset.
	pub dimension: Option<u8>,
	/// Upper bound for inferred precision. Coordinates needing more digits are rounded.
	pub max_precision: u8,
}

impl Default for EncodingOptions {
	fn default() -> Self {
		EncodingOptions {
			precision: None,
			dimension: None,
			max_precision: DEFAULT_MAX_PRECISION,
		}
	}
}

impl EncodingOptions {
	#[must_use]
	pub fn with_precision(mut self, precision: u8) -> Self {
		self.precision = Some(precision);
		self
	}

	#[must_use]
	pub fn with_dimension(mut self, dimension: u8) -> Self {
		self.dimension = Some(dimension);
		self
	}

	#[must_use]
	pub fn with_max_precision(mut self, max_precision: u8) -> Self {
		self.max_precision = max_precision;
		self
	}

	/// Checks that every override is within the supported range.
	pub fn validate(&self) -> Result<()> {
		if let Some(dimension) = self.dimension {
			ensure!(
				dimension == 2 || dimension == 3,
				GeobufError::unsupported(format!("dimension must be 2 or 3, got {dimension}"))
			);
		}
		if let Some(precision) = self.precision {
			ensure!(
				precision <= MAX_PRECISION_LIMIT,
				GeobufError::unsupported(format!(
					"precision must not exceed {MAX_PRECISION_LIMIT}, got {precision}"
				))
			);
		}
		ensure!(
			self.max_precision <= MAX_PRECISION_LIMIT,
			GeobufError::unsupported(format!(
				"max precision must not exceed {MAX_PRECISION_LIMIT}, got {}",
				self.max_precision
			))
		);
		Ok(())
	}
}

/// Ordered, deduplicated list of property keys. Features refer to keys by index.
#[derive(Clone, Default, PartialEq)]
pub struct KeyTable {
	list: Vec<String>,
	map: HashMap<String, u32>,
}

impl KeyTable {
	/// Builds a table from an existing key list. For duplicate keys, lookups by name return
	/// the first index.
	#[must_use]
	pub fn new(list: Vec<String>) -> KeyTable {
		let mut map = HashMap::with_capacity(list.len());
		for (index, key) in list.iter().enumerate() {
			map.entry(key.clone()).or_insert(index as u32);
		}
		KeyTable { list, map }
	}

	/// Adds `key` if it is not present yet and returns its index.
	pub fn add(&mut self, key: &str) -> u32 {
		if let Some(index) = self.map.get(key) {
			return *index;
		}
		let index = self.list.len() as u32;
		self.map.insert(key.to_string(), index);
		self.list.push(key.to_string());
		index
	}

	/// Returns the index of `key`.
	pub fn find(&self, key: &str) -> Result<u32> {
		self
			.map
			.get(key)
			.copied()
			.ok_or_else(|| GeobufError::unsupported(format!("property key '{key}' is missing from the key table")).into())
	}

	/// Returns the key at `index`.
	pub fn get(&self, index: u32) -> Result<&String> {
		self.list.get(index as usize).ok_or_else(|| {
			GeobufError::malformed(format!(
				"key index {index} is out of range for {} keys",
				self.list.len()
			))
			.into()
		})
	}

	pub fn iter(&self) -> impl Iterator<Item = &String> + '_ {
		self.list.iter()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.list.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.list.is_empty()
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<String> {
		self.list
	}
}

impl From<&[&str]> for KeyTable {
	fn from(value: &[&str]) -> Self {
		KeyTable::new(value.iter().map(|v| (*v).to_string()).collect())
	}
}

impl Debug for KeyTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.list).finish()
	}
}

/// Parameters shared read-only by every step of a single encode or decode call.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodingConfig {
	dimension: usize,
	precision: u32,
	factor: f64,
	keys: KeyTable,
}

impl EncodingConfig {
	pub fn new(dimension: usize, precision: u32, keys: KeyTable) -> Result<EncodingConfig> {
		ensure!(
			dimension == 2 || dimension == 3,
			GeobufError::unsupported(format!("dimension must be 2 or 3, got {dimension}"))
		);
		ensure!(
			precision <= u32::from(MAX_PRECISION_LIMIT),
			GeobufError::unsupported(format!(
				"precision must not exceed {MAX_PRECISION_LIMIT}, got {precision}"
			))
		);
		Ok(EncodingConfig {
			dimension,
			precision,
			factor: 10f64.powi(precision as i32),
			keys,
		})
	}

	#[must_use]
	pub fn dimension(&self) -> usize {
		self.dimension
	}

	#[must_use]
	pub fn precision(&self) -> u32 {
		self.precision
	}

	/// `10^precision`, the scale between coordinates and stored integers.
	#[must_use]
	pub fn factor(&self) -> f64 {
		self.factor
	}

	#[must_use]
	pub fn keys(&self) -> &KeyTable {
		&self.keys
	}

	#[must_use]
	pub fn into_keys(self) -> KeyTable {
		self.keys
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::codec::error_kind;
	use rstest::rstest;

	#[test]
	fn key_table_add_deduplicates() {
		let mut keys = KeyTable::default();
		assert_eq!(keys.add("a"), 0);
		assert_eq!(keys.add("b"), 1);
		assert_eq!(keys.add("a"), 0);
		assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["a", "b"]);
		assert_eq!(format!("{keys:?}"), r#"["a", "b"]"#);
	}

	#[test]
	fn key_table_lookups() -> Result<()> {
		let keys = KeyTable::from(&["name", "height"][..]);
		assert_eq!(keys.find("height")?, 1);
		assert_eq!(keys.get(0)?, "name");

		let err = keys.get(2).unwrap_err();
		assert!(matches!(error_kind(&err), Some(GeobufError::MalformedWire(_))));
		let err = keys.find("width").unwrap_err();
		assert!(matches!(error_kind(&err), Some(GeobufError::UnsupportedType(_))));
		Ok(())
	}

	#[test]
	fn key_table_duplicates_resolve_to_first() -> Result<()> {
		let keys = KeyTable::new(vec!["a".to_string(), "a".to_string()]);
		assert_eq!(keys.find("a")?, 0);
		assert_eq!(keys.len(), 2);
		Ok(())
	}

	#[rstest]
	#[case(EncodingOptions::default(), true)]
	#[case(EncodingOptions::default().with_dimension(3), true)]
	#[case(EncodingOptions::default().with_dimension(4), false)]
	#[case(EncodingOptions::default().with_dimension(1), false)]
	#[case(EncodingOptions::default().with_precision(15), true)]
	#[case(EncodingOptions::default().with_precision(16), false)]
	#[case(EncodingOptions::default().with_max_precision(20), false)]
	fn options_validation(#[case] options: EncodingOptions, #[case] valid: bool) {
		let result = options.validate();
		assert_eq!(result.is_ok(), valid);
		if let Err(err) = result {
			assert!(matches!(error_kind(&err), Some(GeobufError::UnsupportedType(_))));
		}
	}

	#[test]
	fn config_factor() -> Result<()> {
		let config = EncodingConfig::new(2, 3, KeyTable::default())?;
		assert_eq!(config.factor(), 1000.0);
		assert_eq!(config.precision(), 3);
		assert_eq!(config.dimension(), 2);
		assert!(EncodingConfig::new(4, 3, KeyTable::default()).is_err());
		assert!(EncodingConfig::new(2, 16, KeyTable::default()).is_err());
		Ok(())
	}
}
