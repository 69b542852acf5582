//! Profiling utilities based on the `puffin` crate.
//!
//! With the `profiling` feature disabled the scope macros expand to nothing,
//! so instrumented code compiles either way.

use crate::config::{Config, ProfilingMode};

#[cfg(feature = "profiling")]
pub use puffin::{profile_function, profile_scope};

#[cfg(not(feature = "profiling"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __ferrule_profile_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "profiling"))]
pub use crate::__ferrule_profile_noop as profile_function;
#[cfg(not(feature = "profiling"))]
pub use crate::__ferrule_profile_noop as profile_scope;

/// Global profiling server instance.
#[cfg(feature = "profiling")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Enable profiling according to `config`.
///
/// # Example
/// ```no_run
/// use ferrule_core::config::{Config, ProfilingMode};
/// use ferrule_core::profiling::init_profiling;
///
/// let config = Config {
///     profiling: ProfilingMode::WithWebServer,
///     ..Config::default()
/// };
/// init_profiling(&config);
/// ```
#[cfg(feature = "profiling")]
pub fn init_profiling(config: &Config) {
    match config.profiling {
        ProfilingMode::Off => puffin::set_scopes_on(false),
        ProfilingMode::On => puffin::set_scopes_on(true),
        ProfilingMode::WithWebServer => {
            puffin::set_scopes_on(true);

            match puffin_http::Server::new(&config.profiling_address) {
                Ok(server) => {
                    tracing::info!(
                        "Puffin profiler server started on http://{}",
                        config.profiling_address
                    );
                    let _ = PROFILING_SERVER.set(server);
                }
                Err(e) => {
                    tracing::error!("Failed to start puffin server: {}", e);
                }
            }
        }
    }
}

#[cfg(not(feature = "profiling"))]
pub fn init_profiling(config: &Config) {
    if config.profiling != ProfilingMode::Off {
        tracing::warn!("profiling requested but the `profiling` feature is disabled");
    }
}

/// Mark the end of one run-loop iteration.
///
/// Call this once per turn of the event loop so scopes are grouped by
/// iteration in the viewer.
#[inline]
pub fn new_frame() {
    #[cfg(feature = "profiling")]
    puffin::GlobalProfiler::lock().new_frame();
}
