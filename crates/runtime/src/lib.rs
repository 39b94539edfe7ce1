//! hvlink Runtime - session establishment with hypervisor web-services
//!
//! This crate turns an unreliable remote connect call into a bounded,
//! classified, version-checked operation:
//!
//! - **Supervisor**: Up to three immediate connect attempts per call
//! - **Classifier**: Maps exhausted attempts to bad username, bad password or unreachable
//! - **Version gate**: Rejects endpoints whose API version is not exactly `4_3`
//! - **Status**: Optional caller-side echo of every terminal outcome
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │       caller         │  EndpointDescriptor
//! └──────────┬───────────┘
//!            │ connect_to
//! ┌──────────▼───────────┐
//! │ ConnectionSupervisor │  retry loop
//! │  ┌────────────────┐  │
//! │  │ Classifier     │  │  cause of exhausted attempts
//! │  └────────────────┘  │
//! │  ┌────────────────┐  │
//! │  │ VersionGate    │  │  exact API version match
//! │  └────────────────┘  │
//! └──────────┬───────────┘
//!            │ implements TransportGateway
//! ┌──────────▼───────────┐
//! │   hypervisor SDK     │  connect / handle / api_version
//! └──────────────────────┘
//! ```
//!
//! # Decoupling via TransportGateway
//!
//! The supervisor is generic over a [`TransportGateway`], so the SDK that
//! actually speaks to the host can be swapped, or replaced by
//! [`testing::ScriptedTransport`] in tests.
//!
//! Everything is synchronous: a call blocks on the caller's thread for as long
//! as the transport blocks, and there is no timeout or backoff layered on top.

pub mod classifier;
pub mod config;
pub mod error;
pub mod logging;
pub mod status;
pub mod supervisor;
pub mod testing;
pub mod transport;
pub mod version_gate;

// Re-export key types at crate root
pub use classifier::FailureClassifier;
pub use config::{CONFIG_ENV, ConnectorConfig, StatusConfig};
pub use error::{Error, Result};
pub use hvlink_protocol::{EndpointDescriptor, FailureCause, REQUIRED_API_VERSION};
pub use logging::init_logging;
pub use status::{Sink, StatusEcho, StatusSinks};
pub use supervisor::{ConnectionSupervisor, MAX_CONNECT_ATTEMPTS, Session};
pub use transport::{BoxError, SessionHandle, TransportFailure, TransportGateway};
pub use version_gate::VersionGate;
