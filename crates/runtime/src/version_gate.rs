//! Post-connect API version check.

use hvlink_protocol::REQUIRED_API_VERSION;
use tracing::debug;

use crate::error::{Error, Result};
use crate::transport::SessionHandle;

/// Accepts a session only when its API version equals the required one exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGate {
	required: String,
}

impl Default for VersionGate {
	fn default() -> Self {
		Self::new(REQUIRED_API_VERSION)
	}
}

impl VersionGate {
	pub fn new(required: impl Into<String>) -> Self {
		Self { required: required.into() }
	}

	pub fn required(&self) -> &str {
		&self.required
	}

	/// Reads the remote version once and returns the handle with it on a match.
	///
	/// # Errors
	///
	/// Returns [`Error::IncompatibleVersion`] on any difference, including adjacent
	/// versions, and [`Error::Handshake`] if the version cannot be read.
	pub fn check<H: SessionHandle>(&self, handle: H, url: &str) -> Result<(H, String)> {
		let actual = handle.api_version().map_err(|source| Error::Handshake {
			url: url.to_string(),
			source,
		})?;

		debug!(target: "hvlink", url, required = %self.required, %actual, "checking API version");

		if actual != self.required {
			return Err(Error::IncompatibleVersion {
				url: url.to_string(),
				required: self.required.clone(),
				actual,
			});
		}

		Ok((handle, actual))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transport::TransportFailure;

	#[derive(Debug)]
	struct FixedVersion(&'static str);

	impl SessionHandle for FixedVersion {
		fn api_version(&self) -> std::result::Result<String, TransportFailure> {
			Ok(self.0.to_string())
		}
	}

	#[derive(Debug)]
	struct BrokenHandle;

	impl SessionHandle for BrokenHandle {
		fn api_version(&self) -> std::result::Result<String, TransportFailure> {
			Err(TransportFailure::new("session dropped"))
		}
	}

	const URL: &str = "http://10.0.0.12:8080";

	#[test]
	fn default_gate_requires_4_3() {
		assert_eq!(VersionGate::default().required(), "4_3");
	}

	#[test]
	fn exact_match_passes_handle_through() {
		let (handle, version) = VersionGate::default().check(FixedVersion("4_3"), URL).unwrap();
		assert_eq!(handle.0, "4_3");
		assert_eq!(version, "4_3");
	}

	#[test]
	fn adjacent_versions_are_rejected() {
		for actual in ["4_2", "4_4", "4_3_1", "4.3", " 4_3"] {
			let err = VersionGate::default().check(FixedVersion(actual), URL).unwrap_err();
			match err {
				Error::IncompatibleVersion {
					url,
					required,
					actual: observed,
				} => {
					assert_eq!(url, URL);
					assert_eq!(required, "4_3");
					assert_eq!(observed, actual);
				}
				other => panic!("expected IncompatibleVersion for {actual:?}, got {other:?}"),
			}
		}
	}

	#[test]
	fn unreadable_version_is_handshake_error() {
		let err = VersionGate::default().check(BrokenHandle, URL).unwrap_err();
		assert!(matches!(err, Error::Handshake { .. }), "got {err:?}");
	}
}
