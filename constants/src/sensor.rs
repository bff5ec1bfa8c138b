/// Default world-space centre of the sensor's view.
pub const SENSOR_CENTER: [f32; 3] = [0.0, 0.0, 0.0];

/// Default half-extents (U, V) of the region the sensor sees, in scene units.
/// Negative values flip that axis.
pub const SENSOR_HALF_EXTENTS: [f32; 2] = [6.0, 6.0];

/// Default world axis mapped to sensor U (0 = X, 1 = Y, 2 = Z).
pub const SENSOR_U_AXIS: usize = 0;

/// Default world axis mapped to sensor V.
pub const SENSOR_V_AXIS: usize = 1;

/// Default motion field resolution (depth frame downsampled by 8).
pub const MOTION_FIELD_WIDTH: u32 = 80;
pub const MOTION_FIELD_HEIGHT: u32 = 60;

/// Pointer stand-in: flow units per pixel/second of cursor motion.
pub const POINTER_FLOW_GAIN: f32 = 0.002;

/// Pointer stand-in: Gaussian blob radius in field UV.
pub const POINTER_BLOB_RADIUS: f32 = 0.08;

/// Pointer stand-in: per-frame field decay.
pub const POINTER_FIELD_DECAY: f32 = 0.85;
