//! Test doubles for code built on hvlink-runtime.
//!
//! [`ScriptedTransport`] stands in for a hypervisor SDK and counts every call
//! the connection core makes, so retry and gating behavior can be asserted
//! without a real host. [`SharedBuffer`] captures status output.
//!
//! # Example
//!
//! ```ignore
//! use hvlink_runtime::testing::ScriptedTransport;
//! use hvlink_runtime::ConnectionSupervisor;
//!
//! let transport = ScriptedTransport::failing_times(2);
//! let supervisor = ConnectionSupervisor::new(&transport);
//! let session = supervisor.connect_to(Some(&descriptor))?;
//! assert_eq!(transport.connect_calls(), 3);
//! ```

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use hvlink_protocol::{EndpointDescriptor, REQUIRED_API_VERSION};
use parking_lot::Mutex;

use crate::status::Sink;
use crate::transport::{SessionHandle, TransportFailure, TransportGateway};

/// Arguments of one recorded `connect` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectCall {
	pub url: String,
	pub username: String,
	pub password: String,
}

enum Policy {
	/// Pops one outcome per call, then repeats `fallback`.
	Script { outcomes: VecDeque<bool>, fallback: bool },
	/// Succeeds only for this exact url and credentials.
	Accept(EndpointDescriptor),
}

/// In-memory transport with scripted connect outcomes and call counters.
pub struct ScriptedTransport {
	policy: Mutex<Policy>,
	version: String,
	handle_fails: bool,
	connected: AtomicBool,
	connect_calls: AtomicU32,
	handle_calls: AtomicU32,
	version_reads: Arc<AtomicU32>,
	calls: Mutex<Vec<ConnectCall>>,
}

impl ScriptedTransport {
	fn with_policy(policy: Policy) -> Self {
		Self {
			policy: Mutex::new(policy),
			version: REQUIRED_API_VERSION.to_string(),
			handle_fails: false,
			connected: AtomicBool::new(false),
			connect_calls: AtomicU32::new(0),
			handle_calls: AtomicU32::new(0),
			version_reads: Arc::new(AtomicU32::new(0)),
			calls: Mutex::new(Vec::new()),
		}
	}

	/// Every connect succeeds.
	pub fn always_succeeding() -> Self {
		Self::scripted(std::iter::empty(), true)
	}

	/// Every connect fails.
	pub fn always_failing() -> Self {
		Self::scripted(std::iter::empty(), false)
	}

	/// The first `failures` connects fail, later ones succeed.
	pub fn failing_times(failures: usize) -> Self {
		Self::scripted(std::iter::repeat_n(false, failures), true)
	}

	/// Connect outcomes taken in order, then `fallback` for every further call.
	pub fn scripted(outcomes: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
		Self::with_policy(Policy::Script {
			outcomes: outcomes.into_iter().collect(),
			fallback,
		})
	}

	/// Behaves like a live host that only accepts `good`'s url and credentials.
	pub fn accepting(good: EndpointDescriptor) -> Self {
		Self::with_policy(Policy::Accept(good))
	}

	/// Reports `version` from every issued handle.
	pub fn with_version(mut self, version: impl Into<String>) -> Self {
		self.version = version.into();
		self
	}

	/// Makes `handle()` fail even after a successful connect.
	pub fn with_failing_handle(mut self) -> Self {
		self.handle_fails = true;
		self
	}

	pub fn connect_calls(&self) -> u32 {
		self.connect_calls.load(Ordering::SeqCst)
	}

	pub fn handle_calls(&self) -> u32 {
		self.handle_calls.load(Ordering::SeqCst)
	}

	/// Number of `api_version` reads across all issued handles.
	pub fn version_reads(&self) -> u32 {
		self.version_reads.load(Ordering::SeqCst)
	}

	pub fn calls(&self) -> Vec<ConnectCall> {
		self.calls.lock().clone()
	}
}

impl TransportGateway for ScriptedTransport {
	type Handle = ScriptedHandle;

	fn connect(&self, url: &str, username: &str, password: &str) -> Result<(), TransportFailure> {
		let attempt = self.connect_calls.fetch_add(1, Ordering::SeqCst) + 1;
		self.calls.lock().push(ConnectCall {
			url: url.to_string(),
			username: username.to_string(),
			password: password.to_string(),
		});

		let accepted = match &mut *self.policy.lock() {
			Policy::Script { outcomes, fallback } => outcomes.pop_front().unwrap_or(*fallback),
			Policy::Accept(good) => good.connection_url() == url && good.username() == username && good.password() == password,
		};

		self.connected.store(accepted, Ordering::SeqCst);
		if accepted {
			Ok(())
		} else {
			Err(TransportFailure::new(format!("scripted connect failure #{attempt} for {url}")))
		}
	}

	fn handle(&self) -> Result<ScriptedHandle, TransportFailure> {
		let id = self.handle_calls.fetch_add(1, Ordering::SeqCst) + 1;
		if self.handle_fails || !self.connected.load(Ordering::SeqCst) {
			return Err(TransportFailure::new("no open session"));
		}
		Ok(ScriptedHandle {
			id,
			version: self.version.clone(),
			reads: Arc::clone(&self.version_reads),
		})
	}
}

/// Session handle issued by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct ScriptedHandle {
	id: u32,
	version: String,
	reads: Arc<AtomicU32>,
}

impl ScriptedHandle {
	/// Sequence number of this handle, starting at 1 per transport.
	pub fn id(&self) -> u32 {
		self.id
	}
}

impl SessionHandle for ScriptedHandle {
	fn api_version(&self) -> Result<String, TransportFailure> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		Ok(self.version.clone())
	}
}

/// In-memory writer whose contents stay readable after being handed out as a [`Sink`].
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn sink(&self) -> Sink {
		Arc::new(Mutex::new(self.clone()))
	}

	pub fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock()).into_owned()
	}

	pub fn lines(&self) -> Vec<String> {
		self.contents().lines().map(str::to_string).collect()
	}
}

impl Write for SharedBuffer {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}
