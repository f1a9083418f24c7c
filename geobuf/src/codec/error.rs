//! Error categories of the transcoder.
//!
//! Every failure is an [`anyhow::Error`]; its root cause is one of the [`GeobufError`]
//! variants, so callers can tell categories apart with `err.downcast_ref::<GeobufError>()`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeobufError {
	/// The input contains something the format cannot represent.
	#[error("unsupported input: {0}")]
	UnsupportedType(String),

	/// The encoded data is inconsistent or truncated.
	#[error("malformed geobuf data: {0}")]
	MalformedWire(String),

	/// Geometry collections are nested deeper than allowed.
	#[error("geometry collections are nested deeper than {0} levels")]
	DepthExceeded(usize),

	/// A property value could not be serialized as JSON text.
	#[error("failed to serialize property value as JSON: {0}")]
	FallbackSerialization(String),
}

impl GeobufError {
	pub(crate) fn unsupported(message: impl Into<String>) -> Self {
		GeobufError::UnsupportedType(message.into())
	}

	pub(crate) fn malformed(message: impl Into<String>) -> Self {
		GeobufError::MalformedWire(message.into())
	}
}

/// Returns the [`GeobufError`] at the root of `err`, if there is one.
#[must_use]
pub fn error_kind(err: &anyhow::Error) -> Option<&GeobufError> {
	err.downcast_ref::<GeobufError>()
}
