//! Profiling utilities based on the `puffin` crate.

pub use puffin::{profile_function, profile_scope};

#[cfg(feature = "profiling")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Enable puffin scopes and start the HTTP server on `addr` (e.g. `"0.0.0.0:8585"`).
///
/// # Example
/// ```no_run
/// bitfont_core::profiling::init_profiling("0.0.0.0:8585");
/// ```
#[cfg(feature = "profiling")]
pub fn init_profiling(addr: &str) {
    puffin::set_scopes_on(true);

    match puffin_http::Server::new(addr) {
        Ok(server) => {
            tracing::info!("Puffin profiler server started on http://{}", addr);
            let _ = PROFILING_SERVER.set(server);
        }
        Err(e) => {
            tracing::error!("Failed to start puffin server: {}", e);
        }
    }
}

/// Mark the start of a new profiling frame.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}
