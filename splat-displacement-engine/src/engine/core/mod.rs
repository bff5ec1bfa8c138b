//! Application bootstrap: plugin setup, state machine and window.

/// `create_app`: plugins, resources and the per-state system schedule.
pub mod app_setup;

/// Loading → AssetsLoaded → ComputePipelinesReady → Running.
pub mod app_state;

/// Primary window for native and web builds.
pub mod window_config;
