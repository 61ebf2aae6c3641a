//! Runtime lifecycle of the binary.
//!
//! A `generate` call that outlived its deadline is still parked on the
//! blocking pool. Dropping a runtime waits for those threads forever, so the
//! binary shuts down with a bounded grace period instead.

use std::time::Duration;

use tokio::runtime::{Builder, Runtime};

/// How long shutdown waits for abandoned blocking calls.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

pub fn build_runtime() -> std::io::Result<Runtime> {
    Builder::new_multi_thread()
        .enable_all()
        .thread_name("speech-batch")
        .build()
}

/// Stop `runtime`, abandoning blocking calls still running after
/// [`SHUTDOWN_GRACE`].
pub fn shutdown(runtime: Runtime) {
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
}
