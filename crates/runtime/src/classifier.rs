//! Root-cause classification of exhausted connect attempts.
//!
//! Transports raise one failure type whatever went wrong, so the cause cannot
//! be read off the failure. Instead the descriptor that failed is compared
//! against a known-good reference: an endpoint whose address and credentials
//! are known to work. Whatever differs from the reference is what broke.

use hvlink_protocol::{EndpointDescriptor, FailureCause};
use tracing::debug;

use crate::transport::TransportFailure;

/// Maps an exhausted connect sequence to a [`FailureCause`].
#[derive(Debug, Clone, Default)]
pub struct FailureClassifier {
	reference: Option<EndpointDescriptor>,
}

impl FailureClassifier {
	/// Classifier without a reference; every failure is reported as unreachable.
	pub fn new() -> Self {
		Self::default()
	}

	/// Classifier comparing failures against a known-good endpoint.
	pub fn with_reference(reference: EndpointDescriptor) -> Self {
		Self { reference: Some(reference) }
	}

	pub fn reference(&self) -> Option<&EndpointDescriptor> {
		self.reference.as_ref()
	}

	/// Classifies the last failure of a descriptor whose attempts are all spent.
	///
	/// Order matters: a foreign address makes credentials irrelevant, and the
	/// username is checked before the password because a wrong username makes
	/// the password unverifiable.
	pub fn classify(&self, failure: &TransportFailure, used: &EndpointDescriptor) -> FailureCause {
		let cause = match &self.reference {
			None => FailureCause::Unreachable,
			Some(reference) if !reference.same_address(used) => FailureCause::Unreachable,
			Some(reference) if reference.username() != used.username() => FailureCause::BadUsername,
			Some(reference) if reference.password() != used.password() => FailureCause::BadPassword,
			// Known-good address and credentials still failed: the service is down.
			Some(_) => FailureCause::Unreachable,
		};

		debug!(
			target: "hvlink",
			url = %used.connection_url(),
			has_reference = self.reference.is_some(),
			failure = %failure,
			%cause,
			"classified connection failure"
		);

		cause
	}
}
