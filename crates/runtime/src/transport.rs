//! Transport seam between the connection core and a hypervisor SDK.
//!
//! The core never speaks the hypervisor protocol itself. A [`TransportGateway`]
//! performs the network connect and hands back a [`SessionHandle`]; the core only
//! decides how often to call it and what a failure means.

use std::sync::Arc;

use thiserror::Error;

/// Boxed error raised by an underlying SDK.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Undifferentiated failure of a single transport call.
///
/// SDKs raise the same failure for a dead host, a wrong username and a wrong
/// password, so this type deliberately carries no cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportFailure {
	message: String,
	#[source]
	source: Option<BoxError>,
}

impl TransportFailure {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			source: None,
		}
	}

	/// Wraps an SDK error, keeping it reachable through [`std::error::Error::source`].
	pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
		Self {
			message: message.into(),
			source: Some(source.into()),
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

/// An established session with a hypervisor endpoint.
pub trait SessionHandle {
	/// Reads the API version string reported by the remote endpoint.
	fn api_version(&self) -> Result<String, TransportFailure>;
}

/// Opaque collaborator performing the remote connect.
///
/// Implementations use interior mutability for whatever state the SDK keeps
/// between `connect` and `handle`.
pub trait TransportGateway: Send + Sync {
	type Handle: SessionHandle;

	/// Opens a session at `url`; any error is a failed attempt.
	fn connect(&self, url: &str, username: &str, password: &str) -> Result<(), TransportFailure>;

	/// Returns the handle of the session opened by the last successful `connect`.
	fn handle(&self) -> Result<Self::Handle, TransportFailure>;
}

impl<T: TransportGateway + ?Sized> TransportGateway for &T {
	type Handle = T::Handle;

	fn connect(&self, url: &str, username: &str, password: &str) -> Result<(), TransportFailure> {
		(**self).connect(url, username, password)
	}

	fn handle(&self) -> Result<Self::Handle, TransportFailure> {
		(**self).handle()
	}
}

impl<T: TransportGateway + ?Sized> TransportGateway for Box<T> {
	type Handle = T::Handle;

	fn connect(&self, url: &str, username: &str, password: &str) -> Result<(), TransportFailure> {
		(**self).connect(url, username, password)
	}

	fn handle(&self) -> Result<Self::Handle, TransportFailure> {
		(**self).handle()
	}
}

impl<T: TransportGateway + ?Sized> TransportGateway for Arc<T> {
	type Handle = T::Handle;

	fn connect(&self, url: &str, username: &str, password: &str) -> Result<(), TransportFailure> {
		(**self).connect(url, username, password)
	}

	fn handle(&self) -> Result<Self::Handle, TransportFailure> {
		(**self).handle()
	}
}
