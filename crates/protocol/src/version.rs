//! API version and failure-cause vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The only hypervisor API version this client was built against.
///
/// Compared by exact string equality; `"4_2"` and `"4_3_1"` are both incompatible.
pub const REQUIRED_API_VERSION: &str = "4_3";

/// Root cause attached to a connection failure once all attempts are spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureCause {
	/// The username was rejected by the endpoint.
	BadUsername,
	/// The username was accepted but the password was not.
	BadPassword,
	/// No service answered at the address and port.
	Unreachable,
}

impl fmt::Display for FailureCause {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = match self {
			FailureCause::BadUsername => "bad username",
			FailureCause::BadPassword => "bad password",
			FailureCause::Unreachable => "endpoint unreachable",
		};
		f.write_str(text)
	}
}
