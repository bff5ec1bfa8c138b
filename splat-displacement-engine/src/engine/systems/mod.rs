//! Runtime diagnostics.

/// FPS overlay and periodic status logging.
pub mod fps_tracking;
