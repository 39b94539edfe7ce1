//! Error types for the hvlink runtime.

use hvlink_protocol::FailureCause;
use thiserror::Error;

use crate::transport::TransportFailure;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can end a connect call or a configuration load.
#[derive(Debug, Error)]
pub enum Error {
	/// Input rejected before any transport call was made.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// Every connect attempt failed; `cause` is the classified root cause.
	#[error("Failed to connect to {url} after {attempts} attempts: {cause}")]
	ConnectionFailure {
		cause: FailureCause,
		url: String,
		attempts: u32,
		/// Failure raised by the last attempt
		#[source]
		source: TransportFailure,
	},

	/// The transport connected but the endpoint speaks another API version.
	#[error("Incompatible API version at {url}: required {required}, found {actual}")]
	IncompatibleVersion { url: String, required: String, actual: String },

	/// The transport connected but the session handle or its version could not be read.
	#[error("Session handshake failed at {url}: {source}")]
	Handshake {
		url: String,
		#[source]
		source: TransportFailure,
	},

	/// Configuration is structurally valid JSON but semantically unusable.
	#[error("Configuration error: {0}")]
	Config(String),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Returns the classified cause if this is a connection failure.
	pub fn failure_cause(&self) -> Option<FailureCause> {
		match self {
			Error::ConnectionFailure { cause, .. } => Some(*cause),
			_ => None,
		}
	}

	/// Returns true if every connect attempt failed.
	pub fn is_connection_failure(&self) -> bool {
		matches!(self, Error::ConnectionFailure { .. })
	}

	/// Returns true if the endpoint answered with an unsupported API version.
	pub fn is_incompatible_version(&self) -> bool {
		matches!(self, Error::IncompatibleVersion { .. })
	}

	/// Returns true if the call was rejected before reaching the transport.
	pub fn is_invalid_argument(&self) -> bool {
		matches!(self, Error::InvalidArgument(_))
	}
}
