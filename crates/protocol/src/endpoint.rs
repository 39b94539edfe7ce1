//! Endpoint descriptor for a hypervisor web-service.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de};

/// Address, web-service port and credentials of one hypervisor host.
///
/// Immutable once built. The connection layer borrows a descriptor for the
/// duration of a single connect call and never keeps it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
	ip: String,
	#[serde(deserialize_with = "deserialize_port")]
	port: u16,
	username: String,
	password: String,
}

impl EndpointDescriptor {
	pub fn new(ip: impl Into<String>, port: u16, username: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			ip: ip.into(),
			port,
			username: username.into(),
			password: password.into(),
		}
	}

	pub fn ip(&self) -> &str {
		&self.ip
	}

	pub fn port(&self) -> u16 {
		self.port
	}

	pub fn username(&self) -> &str {
		&self.username
	}

	pub fn password(&self) -> &str {
		&self.password
	}

	/// Web-service URL of this endpoint, always `http://<ip>:<port>`.
	pub fn connection_url(&self) -> String {
		format!("http://{}:{}", self.ip, self.port)
	}

	/// Returns the name of the first required field left blank, if any.
	///
	/// A port of `0` never addresses a service and counts as missing.
	pub fn missing_field(&self) -> Option<&'static str> {
		if self.ip.trim().is_empty() {
			Some("ip")
		} else if self.port == 0 {
			Some("port")
		} else if self.username.trim().is_empty() {
			Some("username")
		} else if self.password.is_empty() {
			Some("password")
		} else {
			None
		}
	}

	/// Returns `true` when both descriptors point at the same ip and port.
	pub fn same_address(&self, other: &EndpointDescriptor) -> bool {
		self.ip == other.ip && self.port == other.port
	}

	/// Returns `true` when both descriptors carry the same username and password.
	pub fn same_credentials(&self, other: &EndpointDescriptor) -> bool {
		self.username == other.username && self.password == other.password
	}
}

impl fmt::Debug for EndpointDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EndpointDescriptor")
			.field("ip", &self.ip)
			.field("port", &self.port)
			.field("username", &self.username)
			.field("password", &"***")
			.finish()
	}
}

/// Accepts the port as a JSON number or as a numeric string.
fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum PortRepr {
		Number(u16),
		Text(String),
	}

	match PortRepr::deserialize(deserializer)? {
		PortRepr::Number(port) => Ok(port),
		PortRepr::Text(text) => text
			.trim()
			.parse()
			.map_err(|_| de::Error::custom(format!("invalid web-service port {text:?}"))),
	}
}
