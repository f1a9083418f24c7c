mod blob;

pub use blob::Blob;
