//! Stderr `tracing` subscriber setup for embedders of the runtime.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Installs a stderr subscriber for `hvlink` diagnostics.
///
/// `RUST_LOG` wins when set. Returns `false` if a global subscriber already exists.
pub fn init_logging(verbosity: u8) -> bool {
	// 0 = errors only
	// 1 = info for hvlink (session ready, exhausted attempts)
	// 2+ = debug for everything, one line per attempt
	let filter = match verbosity {
		0 => "error",
		1 => "warn,hvlink=info",
		_ => "debug",
	};

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.try_init()
		.is_ok()
}
