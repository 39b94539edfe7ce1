//! Supervisors assembled from on-disk configuration.

use std::fs;

use hvlink_runtime::testing::ScriptedTransport;
use hvlink_runtime::{ConnectorConfig, FailureCause};
use tempfile::TempDir;

const CONFIG: &str = r#"{
	"endpoint": {"ip": "172.16.0.40", "port": "8000", "username": "svc-admin", "password": "wrong"},
	"reference": {"ip": "172.16.0.40", "port": 8000, "username": "svc-admin", "password": "right"}
}"#;

#[test]
fn configured_reference_drives_classification() -> anyhow::Result<()> {
	let tmp = TempDir::new()?;
	let path = tmp.path().join("hvlink.json");
	fs::write(&path, CONFIG)?;

	let config = ConnectorConfig::load(&path)?;
	let reference = config.reference.clone().expect("reference configured");
	let transport = ScriptedTransport::accepting(reference.clone());
	let supervisor = config.supervisor(&transport);

	let err = supervisor.connect_to(config.endpoint.as_ref()).unwrap_err();
	assert_eq!(err.failure_cause(), Some(FailureCause::BadPassword));

	let session = supervisor.connect_to(Some(&reference))?;
	assert_eq!(session.url(), "http://172.16.0.40:8000");
	Ok(())
}

#[test]
fn config_without_endpoint_connects_to_nothing() -> anyhow::Result<()> {
	let config = ConnectorConfig::from_json("{}")?;
	let transport = ScriptedTransport::always_succeeding();

	let err = config.supervisor(&transport).connect_to(config.endpoint.as_ref()).unwrap_err();

	assert!(err.is_invalid_argument());
	assert_eq!(transport.connect_calls(), 0);
	Ok(())
}
