//! Value readers and writers for protobuf-encoded data.
//!
//! # Overview
//!
//! [`ValueReader`] and [`ValueWriter`] provide varints, zigzag varints, fixed-width numbers,
//! field keys, packed repeated fields and length-delimited sub-messages. [`ValueReaderSlice`]
//! reads from a borrowed byte slice; [`ValueWriterBlob`] collects output into a [`crate::Blob`].
//!
//! # Examples
//!
//! ```rust
//! use geobuf_core::io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob};
//!
//! let mut writer = ValueWriterBlob::new_le();
//! writer.write_pbf_key(3, 2).unwrap();
//! writer.write_pbf_packed_sint64(&[1, -1]).unwrap();
//! let blob = writer.into_blob();
//!
//! let mut reader = ValueReaderSlice::new_le(blob.as_slice());
//! assert_eq!(reader.read_pbf_key().unwrap(), (3, 2));
//! assert_eq!(reader.read_pbf_packed_sint64().unwrap(), vec![1, -1]);
//! ```

mod value_reader;
mod value_reader_slice;
mod value_writer;
mod value_writer_blob;

pub use value_reader::*;
pub use value_reader_slice::*;
pub use value_writer::*;
pub use value_writer_blob::*;
