//! This module provides the `ValueReaderSlice` struct for reading values from a byte slice.
//!
//! # Examples
//!
//! ```rust
//! use geobuf_core::io::{ValueReader, ValueReaderSlice};
//!
//! let mut reader = ValueReaderSlice::new_le(&[0x0A, 0x02, b'h', b'i']);
//! assert_eq!(reader.read_pbf_key().unwrap(), (1, 2));
//! assert_eq!(reader.read_pbf_string().unwrap(), "hi");
//! assert!(!reader.has_remaining());
//! ```

use super::{SeekRead, ValueReader};
use anyhow::{Result, anyhow, ensure};
use byteorder::{ByteOrder, LittleEndian};
use std::{io::Cursor, marker::PhantomData};

/// Reads values from a borrowed byte slice using a specified byte order.
pub struct ValueReaderSlice<'a, E: ByteOrder> {
	_phantom: PhantomData<E>,
	cursor: Cursor<&'a [u8]>,
	len: u64,
}

impl<'a, E: ByteOrder> ValueReaderSlice<'a, E> {
	/// Creates a new `ValueReaderSlice` over `slice`.
	#[must_use]
	pub fn new(slice: &'a [u8]) -> ValueReaderSlice<'a, E> {
		ValueReaderSlice {
			_phantom: PhantomData,
			len: slice.len() as u64,
			cursor: Cursor::new(slice),
		}
	}
}

impl<'a> ValueReaderSlice<'a, LittleEndian> {
	/// Creates a new little-endian `ValueReaderSlice`, the byte order protobuf uses for fixed-width fields.
	#[must_use]
	pub fn new_le(slice: &'a [u8]) -> ValueReaderSlice<'a, LittleEndian> {
		ValueReaderSlice::new(slice)
	}
}

impl SeekRead for Cursor<&[u8]> {}

impl<'a, E: ByteOrder + 'a> ValueReader<'a, E> for ValueReaderSlice<'a, E> {
	fn get_reader(&mut self) -> &mut dyn SeekRead {
		&mut self.cursor
	}

	fn len(&self) -> u64 {
		self.len
	}

	fn position(&mut self) -> u64 {
		self.cursor.position()
	}

	fn get_sub_reader<'b>(&'b mut self, length: u64) -> Result<Box<dyn ValueReader<'b, E> + 'b>>
	where
		E: 'b,
	{
		let start = self.cursor.position();
		let end = start
			.checked_add(length)
			.ok_or(anyhow!("sub-reader length overflows"))?;
		ensure!(end <= self.len, "Requested sub-reader length exceeds remaining data");

		self.cursor.set_position(end);
		Ok(Box::new(ValueReaderSlice {
			_phantom: PhantomData,
			len: length,
			cursor: Cursor::new(
				self
					.cursor
					.get_ref()
					.get(start as usize..end as usize)
					.ok_or(anyhow!("out of bounds"))?,
			),
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_len() {
		let reader = ValueReaderSlice::new_le(&[0x80; 42]);
		assert_eq!(reader.len(), 42);
	}

	#[test]
	fn test_position_and_remaining() -> Result<()> {
		let mut reader = ValueReaderSlice::new_le(&[0x01, 0x96, 0x01]);
		assert_eq!(reader.read_varint()?, 1);
		assert_eq!(reader.position(), 1);
		assert_eq!(reader.remaining(), 2);
		assert_eq!(reader.read_varint()?, 150);
		assert!(!reader.has_remaining());
		Ok(())
	}

	#[test]
	fn test_get_sub_reader() -> Result<()> {
		let buf = vec![0x01, 0x02, 0x03, 0x04, 0x05];
		let mut reader = ValueReaderSlice::new_le(&buf);
		reader.skip(1)?;
		{
			let mut sub_reader = reader.get_sub_reader(3)?;
			assert_eq!(sub_reader.read_varint()?, 0x02);
			assert_eq!(sub_reader.read_varint()?, 0x03);
			assert_eq!(sub_reader.read_varint()?, 0x04);
			assert!(sub_reader.read_varint().is_err());
		}
		assert_eq!(reader.read_varint()?, 0x05);
		Ok(())
	}

	#[test]
	fn test_sub_reader_out_of_bounds() {
		let buf = vec![0x01, 0x02, 0x03];
		let mut reader = ValueReaderSlice::new_le(&buf);
		assert!(reader.get_sub_reader(5).is_err());
		assert!(reader.get_sub_reader(u64::MAX).is_err());
	}

	#[test]
	fn test_nested_pbf_sub_reader() -> Result<()> {
		// field 1 (length-delimited) containing field 2 (varint 7)
		let buf = vec![0x0A, 0x02, 0x10, 0x07];
		let mut reader = ValueReaderSlice::new_le(&buf);
		assert_eq!(reader.read_pbf_key()?, (1, 2));
		let mut sub = reader.get_pbf_sub_reader()?;
		assert_eq!(sub.read_pbf_key()?, (2, 0));
		assert_eq!(sub.read_varint()?, 7);
		assert!(!sub.has_remaining());
		Ok(())
	}
}
