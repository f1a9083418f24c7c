//! This module provides the [`Blob`] struct, a thin wrapper around [`Vec<u8>`] used for encoded
//! geobuf messages and their length-delimited sub-messages.
//!
//! # Examples
//!
//! ```rust
//! use geobuf_core::Blob;
//!
//! let blob = Blob::from(vec![0x0A, 0x01, b'a']);
//! assert_eq!(blob.len(), 3);
//! assert_eq!(blob.as_slice(), &[0x0A, 0x01, b'a']);
//! ```

use std::fmt::Debug;

/// A simple wrapper around [`Vec<u8>`] that carries encoded bytes between the readers and writers.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Creates a `Blob` of `length` zero bytes, ready to be filled by a reader.
	#[must_use]
	pub fn new_sized(length: usize) -> Blob {
		Blob(vec![0u8; length])
	}

	/// Returns the contents as a byte slice.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_slice()
	}

	/// Returns the contents as a mutable byte slice.
	pub fn as_mut_slice(&mut self) -> &mut [u8] {
		self.0.as_mut_slice()
	}

	/// Consumes the `Blob` and returns the underlying vector.
	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the number of bytes.
	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	/// Returns `true` if the `Blob` holds no bytes.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(value: Vec<u8>) -> Self {
		Blob(value)
	}
}

impl From<&Vec<u8>> for Blob {
	fn from(value: &Vec<u8>) -> Self {
		Blob(value.clone())
	}
}

impl From<&[u8]> for Blob {
	fn from(value: &[u8]) -> Self {
		Blob(value.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(value: &[u8; N]) -> Self {
		Blob(value.to_vec())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({}): ", self.0.len())?;
		let preview: Vec<String> = self.0.iter().take(32).map(|b| format!("{b:02x}")).collect();
		write!(f, "{}", preview.join(" "))?;
		if self.0.len() > 32 {
			write!(f, " …")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_empty_and_sized() {
		assert!(Blob::new_empty().is_empty());
		let blob = Blob::new_sized(4);
		assert_eq!(blob.len(), 4);
		assert_eq!(blob.as_slice(), &[0, 0, 0, 0]);
	}

	#[test]
	fn conversions() {
		let vec = vec![1u8, 2, 3];
		assert_eq!(Blob::from(&vec).into_vec(), vec);
		assert_eq!(Blob::from(vec.as_slice()).len(), 3);
		assert_eq!(Blob::from(&[4u8, 5]).as_slice(), &[4, 5]);
	}

	#[test]
	fn mutate_slice() {
		let mut blob = Blob::new_sized(2);
		blob.as_mut_slice()[1] = 7;
		assert_eq!(blob.into_vec(), vec![0, 7]);
	}

	#[test]
	fn debug_preview() {
		assert_eq!(format!("{:?}", Blob::from(&[0x0a, 0xff])), "Blob(2): 0a ff");
		let long = Blob::new_sized(40);
		assert!(format!("{long:?}").ends_with(" …"));
	}
}
