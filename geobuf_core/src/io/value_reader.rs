// This module defines the `ValueReader` trait for reading protobuf values.
//
// # Overview
//
// The `ValueReader` trait provides varints, zigzag varints, fixed-width floats, strings and
// Protocol Buffers helpers (field keys, packed repeated fields, length-delimited sub-messages,
// skipping of unknown fields). Every length taken from the input is checked against the
// remaining bytes before anything is allocated, so truncated or hostile input fails with an
// error instead of aborting.
//
// # Examples
//
// ```rust
// use geobuf_core::io::{ValueReader, ValueReaderSlice};
//
// let mut reader = ValueReaderSlice::new_le(&[0xAC, 0x02]);
// assert_eq!(reader.read_varint().unwrap(), 300);
// ```

use crate::Blob;
use anyhow::{Context, Result, bail, ensure};
use byteorder::{ByteOrder, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

/// A simple alias for types implementing both `Seek` and `Read`, used for convenience.
pub trait SeekRead: Seek + Read {}

/// A trait for reading protobuf values from a bounded source.
pub trait ValueReader<'a, E: ByteOrder + 'a> {
	/// Returns the underlying reader to access raw bytes.
	fn get_reader(&mut self) -> &mut dyn SeekRead;

	/// Returns the total length of the readable data.
	fn len(&self) -> u64;

	/// Returns the current position within the readable data.
	fn position(&mut self) -> u64;

	/// Checks if there is no data to read.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of bytes remaining to be read.
	fn remaining(&mut self) -> u64 {
		self.len().saturating_sub(self.position())
	}

	/// Checks if there are any bytes remaining to be read.
	fn has_remaining(&mut self) -> bool {
		self.remaining() > 0
	}

	/// Reads a variable-length unsigned integer (varint).
	///
	/// # Errors
	/// Returns an error if reading fails or the varint is longer than ten bytes.
	fn read_varint(&mut self) -> Result<u64> {
		let mut value = 0;
		let mut shift = 0;
		loop {
			let byte = self.get_reader().read_u8()?;
			value |= (u64::from(byte) & 0x7F) << shift;
			if byte & 0x80 == 0 {
				break;
			}
			shift += 7;
			if shift >= 70 {
				bail!("Varint too long");
			}
		}
		Ok(value)
	}

	/// Reads a zigzag-encoded signed varint.
	fn read_svarint(&mut self) -> Result<i64> {
		let value = self.read_varint()?;
		Ok((value >> 1) as i64 ^ -((value & 1) as i64))
	}

	/// Reads a 64-bit floating point number.
	fn read_f64(&mut self) -> Result<f64> {
		Ok(self.get_reader().read_f64::<E>()?)
	}

	/// Advances the position by `length` bytes without reading them.
	///
	/// # Errors
	/// Returns an error if fewer than `length` bytes remain.
	fn skip(&mut self, length: u64) -> Result<()> {
		ensure!(
			length <= self.remaining(),
			"Cannot skip {length} bytes, only {} remaining",
			self.remaining()
		);
		self.get_reader().seek(SeekFrom::Current(length as i64))?;
		Ok(())
	}

	/// Reads a binary blob of the specified length.
	///
	/// # Errors
	/// Returns an error if fewer than `length` bytes remain.
	fn read_blob(&mut self, length: u64) -> Result<Blob> {
		ensure!(
			length <= self.remaining(),
			"Blob length {length} exceeds remaining {} bytes",
			self.remaining()
		);
		let mut blob = Blob::new_sized(length as usize);
		self.get_reader().read_exact(blob.as_mut_slice())?;
		Ok(blob)
	}

	/// Reads a UTF-8 encoded string of the specified length.
	///
	/// # Errors
	/// Returns an error if fewer than `length` bytes remain or the bytes are not valid UTF-8.
	fn read_string(&mut self, length: u64) -> Result<String> {
		let blob = self.read_blob(length)?;
		Ok(String::from_utf8(blob.into_vec())?)
	}

	/// Reads a Protocol Buffers key and returns `(field_number, wire_type)`.
	fn read_pbf_key(&mut self) -> Result<(u32, u8)> {
		let value = self.read_varint().context("Failed to read varint for PBF key")?;
		let field = u32::try_from(value >> 3).context("PBF field number out of range")?;
		Ok((field, (value & 0x07) as u8))
	}

	/// Skips the value of a field whose key has already been read.
	///
	/// # Errors
	/// Returns an error for group wire types (3, 4) and unknown wire types, or if the value is truncated.
	fn skip_pbf_field(&mut self, wire_type: u8) -> Result<()> {
		match wire_type {
			0 => {
				self.read_varint().context("Failed to skip varint field")?;
			}
			1 => self.skip(8).context("Failed to skip 64-bit field")?,
			2 => {
				let length = self.read_varint().context("Failed to read length of skipped field")?;
				self.skip(length).context("Failed to skip length-delimited field")?;
			}
			5 => self.skip(4).context("Failed to skip 32-bit field")?,
			w => bail!("Cannot skip field with wire type {w}"),
		}
		Ok(())
	}

	/// Returns a sub-reader limited to the next `length` bytes and advances past them.
	fn get_sub_reader<'b>(&'b mut self, length: u64) -> Result<Box<dyn ValueReader<'b, E> + 'b>>
	where
		E: 'b;

	/// Returns a sub-reader for a length-delimited Protocol Buffers field.
	fn get_pbf_sub_reader<'b>(&'b mut self) -> Result<Box<dyn ValueReader<'b, E> + 'b>>
	where
		E: 'b,
	{
		let length = self
			.read_varint()
			.context("Failed to read varint for sub-reader length")?;
		self.get_sub_reader(length).context("Failed to get sub-reader")
	}

	/// Reads a packed repeated field of unsigned 32-bit integers.
	fn read_pbf_packed_uint32(&mut self) -> Result<Vec<u32>> {
		let mut reader = self
			.get_pbf_sub_reader()
			.context("Failed to get PBF sub-reader for packed uint32")?;
		let mut values = Vec::new();
		while reader.has_remaining() {
			let value = reader
				.read_varint()
				.context("Failed to read varint for packed uint32")?;
			values.push(u32::try_from(value).context("Packed uint32 value out of range")?);
		}
		drop(reader);
		Ok(values)
	}

	/// Reads a packed repeated field of zigzag-encoded signed 64-bit integers.
	fn read_pbf_packed_sint64(&mut self) -> Result<Vec<i64>> {
		let mut reader = self
			.get_pbf_sub_reader()
			.context("Failed to get PBF sub-reader for packed sint64")?;
		let mut values = Vec::new();
		while reader.has_remaining() {
			values.push(
				reader
					.read_svarint()
					.context("Failed to read svarint for packed sint64")?,
			);
		}
		drop(reader);
		Ok(values)
	}

	/// Reads a length-delimited UTF-8 string field.
	fn read_pbf_string(&mut self) -> Result<String> {
		let length = self.read_varint().context("Failed to read varint for string length")?;
		self.read_string(length).context("Failed to read PBF string")
	}
}
