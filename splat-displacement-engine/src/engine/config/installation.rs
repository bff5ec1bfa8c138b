use crate::engine::gallery::rotation::GallerySettings;
use crate::physics::{AxisMapping, DisplacementParams, ReturnModel, SensorProjection};
use bevy::prelude::*;
use constants::{gallery, physics, render_settings, sensor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Asset path of the configuration, relative to the asset root.
pub const CONFIG_PATH: &str = "config/installation.config.json";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be finite")]
    NotFinite { field: &'static str },

    #[error("sensor.half_extents[{axis}] must not be zero")]
    ZeroHalfExtent { axis: usize },

    #[error("{field} must be 0 (X), 1 (Y) or 2 (Z), got {axis}")]
    AxisOutOfRange { field: &'static str, axis: usize },

    #[error("sensor.u_axis and sensor.v_axis must differ, both are {0}")]
    DuplicateSensorAxis(usize),

    #[error("motion field resolution {width}x{height} must be non-zero")]
    EmptyMotionField { width: u32, height: u32 },

    #[error("gallery.blend_seconds ({blend}) must be shorter than gallery.cycle_seconds ({cycle})")]
    BlendNotShorterThanCycle { blend: f32, cycle: f32 },
}

/// Where the kernel runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    /// WGSL compute shader dispatched from the render world.
    #[default]
    Gpu,
    /// `rayon` over the CPU-side double buffer, uploaded as a texture.
    Cpu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub force_gain: f32,
    pub return_rate: f32,
    pub damping: f32,
    pub dt: f32,
    pub depth_falloff: f32,
    pub max_offset: f32,
    pub noise_gain: f32,
    pub noise_rate: f32,
    pub uv_margin: f32,
    pub return_model: ReturnModel,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            force_gain: physics::FORCE_GAIN,
            return_rate: physics::RETURN_RATE,
            damping: physics::DAMPING,
            dt: physics::TIME_STEP,
            depth_falloff: physics::DEPTH_FALLOFF,
            max_offset: physics::MAX_OFFSET,
            noise_gain: physics::NOISE_GAIN,
            noise_rate: physics::NOISE_RATE,
            uv_margin: physics::UV_MARGIN,
            return_model: ReturnModel::ExponentialDecay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    pub enabled: bool,
    pub flow_gain: f32,
    pub blob_radius: f32,
    pub decay: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            flow_gain: sensor::POINTER_FLOW_GAIN,
            blob_radius: sensor::POINTER_BLOB_RADIUS,
            decay: sensor::POINTER_FIELD_DECAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub center: [f32; 3],
    pub half_extents: [f32; 2],
    pub u_axis: usize,
    pub v_axis: usize,
    pub field_width: u32,
    pub field_height: u32,
    pub pointer: PointerConfig,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            center: sensor::SENSOR_CENTER,
            half_extents: sensor::SENSOR_HALF_EXTENTS,
            u_axis: sensor::SENSOR_U_AXIS,
            v_axis: sensor::SENSOR_V_AXIS,
            field_width: sensor::MOTION_FIELD_WIDTH,
            field_height: sensor::MOTION_FIELD_HEIGHT,
            pointer: PointerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Manifest written by the pre-processor, relative to the asset root.
    pub manifest_path: String,
    pub cycle_seconds: f32,
    pub blend_seconds: f32,
    pub blend_start_fraction: f32,
    pub camera_elevation_deg: f32,
    pub orbit_speed_deg: f32,
    pub framing_margin: f32,
    /// Bounding-sphere scale for displacement reach; 0 = unlimited.
    pub displace_radius_scale: f32,
    pub vertical_fov_deg: f32,
    /// Shuffle the scene order once at startup.
    pub shuffle: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            manifest_path: format!("gallery/{}", gallery::GALLERY_MANIFEST_FILE),
            cycle_seconds: gallery::CYCLE_SECONDS,
            blend_seconds: gallery::BLEND_SECONDS,
            blend_start_fraction: gallery::BLEND_START_FRACTION,
            camera_elevation_deg: gallery::CAMERA_ELEVATION_DEG,
            orbit_speed_deg: gallery::ORBIT_SPEED_DEG,
            framing_margin: gallery::FRAMING_MARGIN,
            displace_radius_scale: gallery::DISPLACE_RADIUS_SCALE,
            vertical_fov_deg: gallery::FALLBACK_VERTICAL_FOV_DEG,
            shuffle: gallery::SHUFFLE_SCENES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub offset_scale: f32,
    pub tint_strength: f32,
    pub point_size: f32,
    pub base_colour: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            offset_scale: render_settings::OFFSET_SCALE,
            tint_strength: render_settings::TINT_STRENGTH,
            point_size: render_settings::POINT_SIZE,
            base_colour: [0.85, 0.9, 1.0, 1.0],
        }
    }
}

/// Whole installation configuration. Missing sections and fields take defaults.
#[derive(Asset, TypePath, Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallationConfig {
    pub physics: PhysicsConfig,
    pub sensor: SensorConfig,
    pub gallery: GalleryConfig,
    pub render: RenderConfig,
    pub backend: Backend,
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field })
    }
}

impl InstallationConfig {
    /// Check every field once, at load. Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        finite("physics.force_gain", p.force_gain)?;
        unit("physics.return_rate", p.return_rate)?;
        unit("physics.damping", p.damping)?;
        positive("physics.dt", p.dt)?;
        non_negative("physics.depth_falloff", p.depth_falloff)?;
        positive("physics.max_offset", p.max_offset)?;
        non_negative("physics.noise_gain", p.noise_gain)?;
        non_negative("physics.noise_rate", p.noise_rate)?;
        non_negative("physics.uv_margin", p.uv_margin)?;
        if let ReturnModel::StiffSpring { stiffness } = p.return_model {
            positive("physics.return_model.stiffness", stiffness)?;
        }

        let s = &self.sensor;
        for (i, value) in s.center.iter().enumerate() {
            finite(["sensor.center.x", "sensor.center.y", "sensor.center.z"][i], *value)?;
        }
        for (axis, extent) in s.half_extents.iter().enumerate() {
            finite("sensor.half_extents", *extent)?;
            if *extent == 0.0 {
                return Err(ConfigError::ZeroHalfExtent { axis });
            }
        }
        for (field, axis) in [("sensor.u_axis", s.u_axis), ("sensor.v_axis", s.v_axis)] {
            if axis > 2 {
                return Err(ConfigError::AxisOutOfRange { field, axis });
            }
        }
        if s.u_axis == s.v_axis {
            return Err(ConfigError::DuplicateSensorAxis(s.u_axis));
        }
        if s.field_width == 0 || s.field_height == 0 {
            return Err(ConfigError::EmptyMotionField {
                width: s.field_width,
                height: s.field_height,
            });
        }
        non_negative("sensor.pointer.flow_gain", s.pointer.flow_gain)?;
        positive("sensor.pointer.blob_radius", s.pointer.blob_radius)?;
        unit("sensor.pointer.decay", s.pointer.decay)?;

        let g = &self.gallery;
        positive("gallery.cycle_seconds", g.cycle_seconds)?;
        positive("gallery.blend_seconds", g.blend_seconds)?;
        unit("gallery.blend_start_fraction", g.blend_start_fraction)?;
        if g.blend_seconds >= g.cycle_seconds {
            return Err(ConfigError::BlendNotShorterThanCycle {
                blend: g.blend_seconds,
                cycle: g.cycle_seconds,
            });
        }
        finite("gallery.camera_elevation_deg", g.camera_elevation_deg)?;
        finite("gallery.orbit_speed_deg", g.orbit_speed_deg)?;
        non_negative("gallery.framing_margin", g.framing_margin)?;
        non_negative("gallery.displace_radius_scale", g.displace_radius_scale)?;
        positive("gallery.vertical_fov_deg", g.vertical_fov_deg)?;
        if g.vertical_fov_deg >= 180.0 {
            return Err(ConfigError::OutOfUnitRange {
                field: "gallery.vertical_fov_deg / 180",
                value: g.vertical_fov_deg / 180.0,
            });
        }

        let r = &self.render;
        non_negative("render.offset_scale", r.offset_scale)?;
        unit("render.tint_strength", r.tint_strength)?;
        positive("render.point_size", r.point_size)?;
        Ok(())
    }

    /// Kernel tunables. Spatial gating starts disabled; the gallery sets it per scene.
    pub fn displacement_params(&self) -> DisplacementParams {
        let p = &self.physics;
        DisplacementParams {
            force_gain: p.force_gain,
            return_rate: p.return_rate,
            damping: p.damping,
            dt: p.dt,
            depth_falloff: p.depth_falloff,
            max_offset: p.max_offset,
            noise_gain: p.noise_gain,
            noise_rate: p.noise_rate,
            uv_margin: p.uv_margin,
            scene_center: Vec3::ZERO,
            max_radius: 0.0,
            return_model: p.return_model,
        }
    }

    pub fn sensor_projection(&self) -> SensorProjection {
        SensorProjection::orthographic(
            Vec3::from_array(self.sensor.center),
            Vec2::from_array(self.sensor.half_extents),
            AxisMapping {
                u: self.sensor.u_axis,
                v: self.sensor.v_axis,
            },
        )
    }

    pub fn gallery_settings(&self) -> GallerySettings {
        GallerySettings {
            cycle_seconds: self.gallery.cycle_seconds,
            blend_seconds: self.gallery.blend_seconds,
            blend_start_fraction: self.gallery.blend_start_fraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(InstallationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped: InstallationConfig = serde_json::from_str(include_str!(
            "../../../assets/config/installation.config.json"
        ))
        .unwrap();
        assert_eq!(shipped.validate(), Ok(()));
        assert_eq!(shipped, InstallationConfig::default());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: InstallationConfig = serde_json::from_str(
            r#"{
                "physics": { "damping": 0.8, "return_model": { "kind": "StiffSpring", "stiffness": 6.0 } },
                "backend": "Cpu"
            }"#,
        )
        .unwrap();

        assert_eq!(config.physics.damping, 0.8);
        assert_eq!(config.physics.force_gain, physics::FORCE_GAIN);
        assert_eq!(
            config.physics.return_model,
            ReturnModel::StiffSpring { stiffness: 6.0 }
        );
        assert_eq!(config.backend, Backend::Cpu);
        assert_eq!(config.gallery, GalleryConfig::default());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn each_invalid_field_is_named() {
        let cases: Vec<(fn(&mut InstallationConfig), ConfigError)> = vec![
            (
                |c| c.physics.damping = 1.5,
                ConfigError::OutOfUnitRange {
                    field: "physics.damping",
                    value: 1.5,
                },
            ),
            (
                |c| c.physics.return_rate = -0.1,
                ConfigError::OutOfUnitRange {
                    field: "physics.return_rate",
                    value: -0.1,
                },
            ),
            (
                |c| c.physics.dt = 0.0,
                ConfigError::NotPositive {
                    field: "physics.dt",
                    value: 0.0,
                },
            ),
            (
                |c| c.physics.max_offset = -1.0,
                ConfigError::NotPositive {
                    field: "physics.max_offset",
                    value: -1.0,
                },
            ),
            (
                |c| c.physics.force_gain = f32::NAN,
                ConfigError::NotFinite {
                    field: "physics.force_gain",
                },
            ),
            (
                |c| c.sensor.half_extents = [6.0, 0.0],
                ConfigError::ZeroHalfExtent { axis: 1 },
            ),
            (
                |c| c.sensor.v_axis = c.sensor.u_axis,
                ConfigError::DuplicateSensorAxis(0),
            ),
            (
                |c| c.sensor.u_axis = 3,
                ConfigError::AxisOutOfRange {
                    field: "sensor.u_axis",
                    axis: 3,
                },
            ),
            (
                |c| c.sensor.field_width = 0,
                ConfigError::EmptyMotionField {
                    width: 0,
                    height: 60,
                },
            ),
            (
                |c| c.gallery.blend_seconds = 60.0,
                ConfigError::BlendNotShorterThanCycle {
                    blend: 60.0,
                    cycle: 60.0,
                },
            ),
        ];

        for (mutate, expected) in cases {
            let mut config = InstallationConfig::default();
            mutate(&mut config);
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn sensor_projection_uses_configured_axes() {
        let mut config = InstallationConfig::default();
        config.sensor.u_axis = 2;
        config.sensor.v_axis = 1;
        config.sensor.half_extents = [2.0, 2.0];

        let uv = config
            .sensor_projection()
            .project_uv(Vec3::new(100.0, 0.0, 2.0))
            .unwrap();
        assert_eq!(uv, Vec2::new(1.0, 0.5));
    }
}
