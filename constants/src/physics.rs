/// Default force gain applied to sampled flow.
pub const FORCE_GAIN: f32 = 10.0;

/// Default per-frame exponential pull toward rest (0-1).
pub const RETURN_RATE: f32 = 0.95;

/// Default per-frame velocity damping (0-1).
pub const DAMPING: f32 = 0.9;

/// Default simulation time step in seconds.
pub const TIME_STEP: f32 = 1.0 / 60.0;

/// Default depth falloff; 0 disables depth weighting.
pub const DEPTH_FALLOFF: f32 = 0.5;

/// Default component-wise offset clamp, in scene units.
pub const MAX_OFFSET: f32 = 5.0;

/// Default scatter gain; 0 disables scatter.
pub const NOISE_GAIN: f32 = 0.0;

/// Default scatter re-seed rate in Hz.
pub const NOISE_RATE: f32 = 2.0;

/// Default UV tolerance outside [0, 1] that still samples the sensor.
pub const UV_MARGIN: f32 = 0.05;

/// Default stiffness for the spring return model.
pub const SPRING_STIFFNESS: f32 = 4.0;
