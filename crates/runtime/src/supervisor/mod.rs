//! Bounded-retry session establishment.
//!
//! # Call Flow
//!
//! ```text
//! connect_to(descriptor)
//!   ├─ absent/blank descriptor ──────────────► InvalidArgument (no transport call)
//!   ├─ connect attempt 1..=3 ─┬─ ok ─► handle() ─► VersionGate ─┬─► Session
//!   │                         │                                 └─► IncompatibleVersion
//!   │                         └─ fail, attempts left ─► next attempt
//!   └─ third failure ─► FailureClassifier ─► ConnectionFailure { cause }
//! ```
//!
//! Each call is self-contained: no session cache, no backoff between attempts.
//! Failed attempts are absorbed; only the terminal outcome reaches the caller.
//! Status echo is left to callers, see [`crate::status::StatusEcho`].
//!
//! Gateways hand out "the session of the last successful connect", so the
//! connect, handle and version steps of one call hold a per-supervisor lock.
//! Concurrent callers sharing a supervisor are served one after another.

#[cfg(test)]
mod tests;

use hvlink_protocol::EndpointDescriptor;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::classifier::FailureClassifier;
use crate::error::{Error, Result};
use crate::transport::TransportGateway;
use crate::version_gate::VersionGate;

/// Connect attempts made per [`ConnectionSupervisor::connect_to`] call.
pub const MAX_CONNECT_ATTEMPTS: u32 = 3;

/// A connected, version-checked session.
#[derive(Debug)]
pub struct Session<H> {
	handle: H,
	url: String,
	api_version: String,
	attempts: u32,
}

impl<H> Session<H> {
	pub fn handle(&self) -> &H {
		&self.handle
	}

	pub fn into_handle(self) -> H {
		self.handle
	}

	/// URL the session was opened against.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// API version reported by the endpoint, equal to the gate's requirement.
	pub fn api_version(&self) -> &str {
		&self.api_version
	}

	/// Number of the connect attempt that succeeded (1-based).
	pub fn attempts(&self) -> u32 {
		self.attempts
	}
}

/// Turns a [`TransportGateway`] into validated, version-checked sessions.
#[derive(Debug)]
pub struct ConnectionSupervisor<T> {
	transport: T,
	classifier: FailureClassifier,
	version_gate: VersionGate,
	/// Held from the first connect attempt until the version check returns.
	in_flight: Mutex<()>,
}

impl<T: TransportGateway> ConnectionSupervisor<T> {
	/// Supervisor with no failure reference and the default version gate.
	pub fn new(transport: T) -> Self {
		Self {
			transport,
			classifier: FailureClassifier::default(),
			version_gate: VersionGate::default(),
			in_flight: Mutex::new(()),
		}
	}

	pub fn with_classifier(mut self, classifier: FailureClassifier) -> Self {
		self.classifier = classifier;
		self
	}

	pub fn with_version_gate(mut self, version_gate: VersionGate) -> Self {
		self.version_gate = version_gate;
		self
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Opens a session to `descriptor`, retrying the transport connect up to
	/// [`MAX_CONNECT_ATTEMPTS`] times.
	///
	/// # Errors
	///
	/// - [`Error::InvalidArgument`] if `descriptor` is absent or has a blank field
	/// - [`Error::ConnectionFailure`] if every attempt failed, with the classified cause
	/// - [`Error::Handshake`] if the transport connected but yielded no usable handle
	/// - [`Error::IncompatibleVersion`] if the endpoint's API version differs from the gate's
	pub fn connect_to(&self, descriptor: Option<&EndpointDescriptor>) -> Result<Session<T::Handle>> {
		let descriptor = descriptor.ok_or_else(|| Error::InvalidArgument("endpoint descriptor is required".to_string()))?;
		if let Some(field) = descriptor.missing_field() {
			return Err(Error::InvalidArgument(format!("endpoint descriptor is missing {field}")));
		}

		let url = descriptor.connection_url();
		let _in_flight = self.in_flight.lock();
		let attempts = self.connect_with_retries(descriptor, &url)?;

		let handle = self.transport.handle().map_err(|source| {
			warn!(target: "hvlink", url = %url, error = %source, "connected but no session handle");
			Error::Handshake { url: url.clone(), source }
		})?;

		let (handle, api_version) = self.version_gate.check(handle, &url).inspect_err(|err| {
			warn!(target: "hvlink", url = %url, error = %err, "session rejected by version gate");
		})?;

		info!(target: "hvlink", url = %url, attempts, api_version = %api_version, "session ready");

		Ok(Session {
			handle,
			url,
			api_version,
			attempts,
		})
	}

	/// Returns the number of the attempt that connected.
	fn connect_with_retries(&self, descriptor: &EndpointDescriptor, url: &str) -> Result<u32> {
		let mut attempt = 1;
		loop {
			debug!(target: "hvlink", url, attempt, max_attempts = MAX_CONNECT_ATTEMPTS, "connect attempt");

			match self.transport.connect(url, descriptor.username(), descriptor.password()) {
				Ok(()) => return Ok(attempt),
				Err(failure) if attempt < MAX_CONNECT_ATTEMPTS => {
					warn!(
						target: "hvlink",
						url,
						attempt,
						max_attempts = MAX_CONNECT_ATTEMPTS,
						error = %failure,
						"connect attempt failed; retrying"
					);
					attempt += 1;
				}
				Err(failure) => {
					let cause = self.classifier.classify(&failure, descriptor);
					warn!(target: "hvlink", url, attempts = attempt, %cause, error = %failure, "connect attempts exhausted");
					return Err(Error::ConnectionFailure {
						cause,
						url: url.to_string(),
						attempts: attempt,
						source: failure,
					});
				}
			}
		}
	}
}
