//! Human-readable status echo.
//!
//! Status lines go to zero, one or two independent sinks held by an explicit
//! [`StatusSinks`] value, never to process-wide writers. Absent or blank
//! messages are dropped without touching any sink.
//!
//! The connection core never writes status itself; [`StatusEcho`] wraps a
//! supervisor on the caller's side and reports each terminal outcome.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use hvlink_protocol::EndpointDescriptor;
use parking_lot::Mutex;
use tracing::warn;

use crate::error::Result;
use crate::supervisor::{ConnectionSupervisor, Session};
use crate::transport::TransportGateway;

/// A shared text sink.
pub type Sink = Arc<Mutex<dyn Write + Send>>;

/// Wraps a writer as a [`Sink`].
pub fn sink<W: Write + Send + 'static>(writer: W) -> Sink {
	Arc::new(Mutex::new(writer))
}

/// Pair of optional sinks receiving one line per terminal connect outcome.
#[derive(Clone, Default)]
pub struct StatusSinks {
	primary: Option<Sink>,
	secondary: Option<Sink>,
}

impl StatusSinks {
	/// No sinks; every message is dropped.
	pub fn none() -> Self {
		Self::default()
	}

	pub fn with_primary(mut self, sink: Sink) -> Self {
		self.primary = Some(sink);
		self
	}

	pub fn with_secondary(mut self, sink: Sink) -> Self {
		self.secondary = Some(sink);
		self
	}

	/// Primary sink on stdout.
	pub fn stdout() -> Self {
		Self::none().with_primary(sink(io::stdout()))
	}

	/// Primary sink on stderr.
	pub fn stderr() -> Self {
		Self::none().with_primary(sink(io::stderr()))
	}

	/// Returns `true` when no sink is configured.
	pub fn is_empty(&self) -> bool {
		self.primary.is_none() && self.secondary.is_none()
	}

	/// Writes `message` as one line to every configured sink.
	///
	/// Write failures are logged and otherwise ignored; status echo never fails a caller.
	pub fn emit(&self, message: Option<&str>) {
		let Some(message) = message.filter(|m| !m.trim().is_empty()) else {
			return;
		};

		for (name, sink) in [("primary", &self.primary), ("secondary", &self.secondary)] {
			let Some(sink) = sink else {
				continue;
			};
			let mut writer = sink.lock();
			if let Err(err) = writeln!(writer, "{message}").and_then(|()| writer.flush()) {
				warn!(target: "hvlink", sink = name, error = %err, "failed to write status line");
			}
		}
	}
}

impl StatusSinks {
	/// Emits the single line describing a terminal connect outcome.
	pub fn report<H>(&self, outcome: &Result<Session<H>>) {
		let line = match outcome {
			Ok(session) => format!("Connected to {} (API {})", session.url(), session.api_version()),
			Err(err) => err.to_string(),
		};
		self.emit(Some(&line));
	}
}

/// Supervisor wrapper that echoes one status line per `connect_to` call.
pub struct StatusEcho<T> {
	supervisor: ConnectionSupervisor<T>,
	sinks: StatusSinks,
}

impl<T: TransportGateway> StatusEcho<T> {
	pub fn new(supervisor: ConnectionSupervisor<T>, sinks: StatusSinks) -> Self {
		Self { supervisor, sinks }
	}

	pub fn supervisor(&self) -> &ConnectionSupervisor<T> {
		&self.supervisor
	}

	pub fn sinks(&self) -> &StatusSinks {
		&self.sinks
	}

	/// Same contract as [`ConnectionSupervisor::connect_to`], plus one status line.
	pub fn connect_to(&self, descriptor: Option<&EndpointDescriptor>) -> Result<Session<T::Handle>> {
		let outcome = self.supervisor.connect_to(descriptor);
		self.sinks.report(&outcome);
		outcome
	}
}

impl fmt::Debug for StatusSinks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StatusSinks")
			.field("primary", &self.primary.is_some())
			.field("secondary", &self.secondary.is_some())
			.finish()
	}
}
