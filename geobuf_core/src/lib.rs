//! Byte-level building blocks shared by the geobuf crates: the [`Blob`] byte container and the
//! protobuf-aware value readers and writers in [`io`].

pub mod io;

pub mod types;

pub use types::Blob;
