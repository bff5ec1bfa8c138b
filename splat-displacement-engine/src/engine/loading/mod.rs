//! Staged loading: config, gallery manifest, rest textures, displacement
//! textures, then the gallery layers.

/// Installation config and gallery manifest loading.
pub mod manifest_loader;

/// Gallery layer entity creation once all textures exist.
pub mod layer_creator;

/// Loading milestones used by the state transitions.
pub mod progress;

/// Sampling setup and creation of the storage textures.
pub mod texture_config;

/// Load state monitoring of the initial rest textures.
pub mod texture_loader;
