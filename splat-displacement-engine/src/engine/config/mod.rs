//! Installation configuration loaded from `config/installation.config.json`.
//!
//! Every tunable of the physics kernel, the sensor coupling, the gallery and the
//! splat material lives here. Values are validated once when the asset loads;
//! downstream systems trust them.

/// Configuration asset, its sections and validation.
pub mod installation;

pub use installation::{Backend, ConfigError, InstallationConfig};
