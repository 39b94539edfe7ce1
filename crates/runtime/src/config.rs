//! JSON configuration for embedding the connection core.
//!
//! ```json
//! {
//!   "endpoint":  { "ip": "10.0.0.12", "port": "8080", "username": "admin", "password": "..." },
//!   "reference": { "ip": "10.0.0.12", "port": 8080, "username": "admin", "password": "..." },
//!   "status": { "stdout": true, "stderr": false },
//!   "logVerbosity": 1
//! }
//! ```
//!
//! Every key is optional. `reference` is the known-good endpoint used to
//! classify failures; without it every exhausted connect is reported as
//! unreachable.

use std::fs;
use std::path::{Path, PathBuf};

use hvlink_protocol::EndpointDescriptor;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::FailureClassifier;
use crate::error::{Error, Result};
use crate::status::{StatusEcho, StatusSinks, sink};
use crate::supervisor::ConnectionSupervisor;
use crate::transport::TransportGateway;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "HVLINK_CONFIG";

/// Which standard streams receive status lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusConfig {
	#[serde(default)]
	pub stdout: bool,
	#[serde(default)]
	pub stderr: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
	/// Endpoint to connect to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub endpoint: Option<EndpointDescriptor>,
	/// Known-good endpoint for failure classification.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reference: Option<EndpointDescriptor>,
	#[serde(default)]
	pub status: StatusConfig,
	/// Verbosity passed to [`crate::logging::init_logging`].
	#[serde(default)]
	pub log_verbosity: u8,
}

impl ConnectorConfig {
	/// Loads configuration from a JSON file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = fs::read_to_string(path)?;
		let config = Self::from_json(&content)?;
		debug!(target: "hvlink", path = %path.display(), has_endpoint = config.endpoint.is_some(), "loaded connector config");
		Ok(config)
	}

	/// Loads the file named by [`CONFIG_ENV`], or `None` when the variable is unset.
	pub fn from_env() -> Result<Option<Self>> {
		match std::env::var_os(CONFIG_ENV) {
			Some(path) if !path.is_empty() => Self::load(&PathBuf::from(path)).map(Some),
			_ => Ok(None),
		}
	}

	pub fn from_json(content: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(content)?;
		if let Some(field) = config.reference.as_ref().and_then(EndpointDescriptor::missing_field) {
			return Err(Error::Config(format!("reference endpoint is missing {field}")));
		}
		Ok(config)
	}

	/// Status sinks selected by the `status` section.
	pub fn status_sinks(&self) -> StatusSinks {
		let mut sinks = StatusSinks::none();
		if self.status.stdout {
			sinks = sinks.with_primary(sink(std::io::stdout()));
		}
		if self.status.stderr {
			sinks = sinks.with_secondary(sink(std::io::stderr()));
		}
		sinks
	}

	pub fn classifier(&self) -> FailureClassifier {
		match &self.reference {
			Some(reference) => FailureClassifier::with_reference(reference.clone()),
			None => FailureClassifier::new(),
		}
	}

	/// Supervisor over `transport` wired with this configuration's classifier.
	pub fn supervisor<T: TransportGateway>(&self, transport: T) -> ConnectionSupervisor<T> {
		ConnectionSupervisor::new(transport).with_classifier(self.classifier())
	}

	/// Like [`Self::supervisor`], echoing outcomes to the configured status sinks.
	pub fn echoing_supervisor<T: TransportGateway>(&self, transport: T) -> StatusEcho<T> {
		StatusEcho::new(self.supervisor(transport), self.status_sinks())
	}

	/// Installs the stderr subscriber at `logVerbosity`; `false` if one was already installed.
	pub fn init_logging(&self) -> bool {
		crate::logging::init_logging(self.log_verbosity)
	}
}
