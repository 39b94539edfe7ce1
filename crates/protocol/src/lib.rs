//! Shared value types for hvlink.
//!
//! These types carry no behavior beyond derivation and comparison, so both the
//! connection runtime and callers that only build configuration can depend on
//! them without pulling in the runtime:
//!
//! - [`EndpointDescriptor`] - Address, service port and credentials of a hypervisor host
//! - [`FailureCause`] - Root cause attached to a classified connection failure
//! - [`REQUIRED_API_VERSION`] - The API version this client speaks

pub mod endpoint;
pub mod version;

pub use endpoint::EndpointDescriptor;
pub use version::{FailureCause, REQUIRED_API_VERSION};
