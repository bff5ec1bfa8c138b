//! Asset and texture types shared by loading, simulation and rendering.

/// Gallery manifest written by the pre-processor.
pub mod gallery_manifest;

/// Handles and constructors for the slot-addressed displacement textures.
pub mod displacement_textures;
