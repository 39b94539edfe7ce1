use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hvlink_protocol::{EndpointDescriptor, FailureCause};

use super::*;
use crate::testing::{ConnectCall, ScriptedTransport};
use crate::transport::{SessionHandle, TransportFailure};

fn descriptor() -> EndpointDescriptor {
	EndpointDescriptor::new("10.0.0.12", 8080, "admin", "s3cret")
}

#[test]
fn connect_receives_derived_url_and_credentials() {
	let transport = ScriptedTransport::always_succeeding();
	let supervisor = ConnectionSupervisor::new(&transport);

	supervisor.connect_to(Some(&descriptor())).unwrap();

	assert_eq!(
		transport.calls(),
		vec![ConnectCall {
			url: "http://10.0.0.12:8080".into(),
			username: "admin".into(),
			password: "s3cret".into(),
		}]
	);
}

#[test]
fn session_reports_url_version_and_winning_attempt() {
	let transport = ScriptedTransport::failing_times(1);
	let supervisor = ConnectionSupervisor::new(&transport);

	let session = supervisor.connect_to(Some(&descriptor())).unwrap();

	assert_eq!(session.url(), "http://10.0.0.12:8080");
	assert_eq!(session.api_version(), "4_3");
	assert_eq!(session.attempts(), 2);
	assert_eq!(session.handle().id(), 1);
}

#[test]
fn blank_descriptor_field_is_rejected_without_transport_calls() {
	let transport = ScriptedTransport::always_succeeding();
	let supervisor = ConnectionSupervisor::new(&transport);
	let blank_user = EndpointDescriptor::new("10.0.0.12", 8080, " ", "s3cret");

	let err = supervisor.connect_to(Some(&blank_user)).unwrap_err();

	assert!(err.is_invalid_argument(), "got {err:?}");
	assert!(err.to_string().contains("username"));
	assert_eq!(transport.connect_calls(), 0);
}

#[test]
fn handle_failure_is_a_handshake_error_without_retry() {
	let transport = ScriptedTransport::always_succeeding().with_failing_handle();
	let supervisor = ConnectionSupervisor::new(&transport);

	let err = supervisor.connect_to(Some(&descriptor())).unwrap_err();

	assert!(matches!(err, Error::Handshake { ref url, .. } if url == "http://10.0.0.12:8080"), "got {err:?}");
	assert_eq!(transport.connect_calls(), 1);
	assert_eq!(transport.version_reads(), 0);
}

#[test]
fn exhausted_attempts_carry_last_failure_as_source() {
	let transport = ScriptedTransport::always_failing();
	let supervisor = ConnectionSupervisor::new(&transport);

	let err = supervisor.connect_to(Some(&descriptor())).unwrap_err();

	match err {
		Error::ConnectionFailure {
			cause,
			attempts,
			source,
			..
		} => {
			assert_eq!(cause, FailureCause::Unreachable);
			assert_eq!(attempts, MAX_CONNECT_ATTEMPTS);
			assert!(source.message().contains("#3"), "last failure expected, got {source}");
		}
		other => panic!("expected ConnectionFailure, got {other:?}"),
	}
	assert_eq!(transport.handle_calls(), 0);
}

#[test]
fn custom_version_gate_is_honored() {
	let transport = ScriptedTransport::always_succeeding().with_version("5_0");
	let supervisor = ConnectionSupervisor::new(&transport).with_version_gate(VersionGate::new("5_0"));

	let session = supervisor.connect_to(Some(&descriptor())).unwrap();

	assert_eq!(session.api_version(), "5_0");
}

/// Gateway whose handle belongs to whichever connect succeeded last, like SDKs
/// keeping one current session. `handle()` lingers so a racing connect can land.
#[derive(Default)]
struct LastConnectedTransport {
	current: parking_lot::Mutex<Option<String>>,
}

struct UrlHandle(String);

impl SessionHandle for UrlHandle {
	fn api_version(&self) -> std::result::Result<String, TransportFailure> {
		Ok("4_3".to_string())
	}
}

impl TransportGateway for LastConnectedTransport {
	type Handle = UrlHandle;

	fn connect(&self, url: &str, _username: &str, _password: &str) -> std::result::Result<(), TransportFailure> {
		*self.current.lock() = Some(url.to_string());
		Ok(())
	}

	fn handle(&self) -> std::result::Result<UrlHandle, TransportFailure> {
		thread::sleep(Duration::from_millis(20));
		self.current.lock().clone().map(UrlHandle).ok_or_else(|| TransportFailure::new("no open session"))
	}
}

#[test]
fn concurrent_callers_get_their_own_session_handle() {
	let supervisor = ConnectionSupervisor::new(LastConnectedTransport::default());

	thread::scope(|scope| {
		let workers: Vec<_> = (1..=6u16)
			.map(|n| {
				let supervisor = &supervisor;
				scope.spawn(move || {
					let descriptor = EndpointDescriptor::new(format!("10.0.0.{n}"), n, "admin", "s3cret");
					supervisor.connect_to(Some(&descriptor)).unwrap()
				})
			})
			.collect();

		for worker in workers {
			let session = worker.join().unwrap();
			assert_eq!(session.handle().0, session.url(), "session carries another endpoint's handle");
		}
	});
}

#[test]
fn shared_supervisor_serves_concurrent_callers() {
	let transport = Arc::new(ScriptedTransport::always_succeeding());
	let supervisor = Arc::new(ConnectionSupervisor::new(Arc::clone(&transport)));

	let workers: Vec<_> = ["10.0.0.12", "10.0.0.13", "10.0.0.14", "10.0.0.15"]
		.into_iter()
		.map(|ip| {
			let supervisor = Arc::clone(&supervisor);
			thread::spawn(move || {
				let descriptor = EndpointDescriptor::new(ip, 8080, "admin", "s3cret");
				supervisor.connect_to(Some(&descriptor)).map(|session| session.url().to_string())
			})
		})
		.collect();

	for worker in workers {
		assert!(worker.join().unwrap().is_ok());
	}
	assert_eq!(transport.connect_calls(), 4);
	assert_eq!(transport.handle_calls(), 4);
}
