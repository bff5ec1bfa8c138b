/// Seconds each scene is shown, including its outgoing blend.
pub const CYCLE_SECONDS: f32 = 60.0;

/// Seconds of the cross-fade between two scenes.
pub const BLEND_SECONDS: f32 = 5.0;

/// Fraction of the cycle after which the blend may start.
pub const BLEND_START_FRACTION: f32 = 0.9;

/// Extra margin around the bounding sphere when framing (0.1 = 10%).
pub const FRAMING_MARGIN: f32 = 0.01;

/// Camera elevation in degrees (positive looks down).
pub const CAMERA_ELEVATION_DEG: f32 = 20.0;

/// Camera orbit speed in degrees per second.
pub const ORBIT_SPEED_DEG: f32 = 10.0;

/// Bounding-sphere scale for displacement reach; 0 = unlimited.
pub const DISPLACE_RADIUS_SCALE: f32 = 1.5;

/// Play the gallery in a new random order on every start.
pub const SHUFFLE_SCENES: bool = true;

/// Fallback vertical field of view in degrees.
pub const FALLBACK_VERTICAL_FOV_DEG: f32 = 26.0;

/// Fallback sphere radius (world units) when a scene has no bounds entry.
pub const DEFAULT_SPHERE_RADIUS: f32 = 50.0;

/// Manifest file written by the pre-processor.
pub const GALLERY_MANIFEST_FILE: &str = "gallery.manifest.json";

/// Suffix of per-scene rest position textures.
pub const REST_TEXTURE_SUFFIX: &str = ".restpos.dds";
