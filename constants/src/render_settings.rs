/// Calibration factor from simulated offset to rendered scene units.
pub const OFFSET_SCALE: f32 = 1.0;

/// How strongly displacement tints a splat (0 = no tint).
pub const TINT_STRENGTH: f32 = 0.5;

/// Billboard half-size in clip space.
pub const POINT_SIZE: f32 = 0.004;
