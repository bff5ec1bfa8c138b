//! Gallery rotation timing and camera framing, free of ECS access.
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GallerySettings {
    pub cycle_seconds: f32,
    pub blend_seconds: f32,
    /// Fraction of the cycle after which the blend starts.
    pub blend_start_fraction: f32,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            cycle_seconds: constants::gallery::CYCLE_SECONDS,
            blend_seconds: constants::gallery::BLEND_SECONDS,
            blend_start_fraction: constants::gallery::BLEND_START_FRACTION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Showing,
    Blending { started_at: f32 },
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalleryTick {
    /// Scene that owns the physics this frame.
    pub active: usize,
    /// Scene fading in; equals `active` outside a blend or with one scene.
    pub incoming: usize,
    /// Smoothstepped blend factor, 0 = only `active` visible.
    pub blend: f32,
    /// The blend completed this tick and `active` changed.
    pub swapped: bool,
}

#[derive(Debug, Clone)]
pub struct GalleryRotation {
    scene_count: usize,
    settings: GallerySettings,
    active: usize,
    cycle_started_at: f32,
    phase: Phase,
}

impl GalleryRotation {
    pub fn new(scene_count: usize, settings: GallerySettings, now: f32) -> Self {
        Self {
            scene_count,
            settings,
            active: 0,
            cycle_started_at: now,
            phase: Phase::Showing,
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Scene after `index`, wrapping.
    pub fn next_of(&self, index: usize) -> usize {
        if self.scene_count == 0 {
            0
        } else {
            (index + 1) % self.scene_count
        }
    }

    pub fn tick(&mut self, now: f32) -> GalleryTick {
        if self.scene_count < 2 {
            return GalleryTick {
                active: self.active,
                incoming: self.active,
                blend: 0.0,
                swapped: false,
            };
        }

        let incoming = self.next_of(self.active);
        match self.phase {
            Phase::Showing => {
                let blend_at = self.settings.cycle_seconds * self.settings.blend_start_fraction;
                if now - self.cycle_started_at >= blend_at {
                    self.phase = Phase::Blending { started_at: now };
                }
                GalleryTick {
                    active: self.active,
                    incoming,
                    blend: 0.0,
                    swapped: false,
                }
            }
            Phase::Blending { started_at } => {
                let t = (now - started_at) / self.settings.blend_seconds;
                if t >= 1.0 {
                    self.active = incoming;
                    self.cycle_started_at = now;
                    self.phase = Phase::Showing;
                    return GalleryTick {
                        active: self.active,
                        incoming: self.next_of(self.active),
                        blend: 0.0,
                        swapped: true,
                    };
                }
                GalleryTick {
                    active: self.active,
                    incoming,
                    blend: smoothstep(t),
                    swapped: false,
                }
            }
        }
    }
}

/// Hermite smoothstep on `[0, 1]`.
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl SceneSphere {
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            center: self.center.lerp(other.center, t),
            radius: self.radius + (other.radius - self.radius) * t,
        }
    }

    /// Sphere after a similarity transform (uniform scale assumed).
    pub fn transformed(self, transform: &Transform) -> Self {
        Self {
            center: transform.transform_point(self.center),
            radius: self.radius * transform.scale.abs().max_element(),
        }
    }
}

/// Camera distance that fits a sphere of `radius` into a vertical FOV.
pub fn framing_distance(radius: f32, vertical_fov: f32, margin: f32) -> f32 {
    radius / (vertical_fov * 0.5).tan() * (1.0 + margin)
}

/// Orbiting camera looking at the sphere centre from `elevation_deg` above the horizon.
pub fn orbit_camera_transform(
    sphere: SceneSphere,
    vertical_fov: f32,
    margin: f32,
    elevation_deg: f32,
    orbit_deg: f32,
) -> Transform {
    let distance = framing_distance(sphere.radius, vertical_fov, margin);
    let elevation = elevation_deg.to_radians();
    let azimuth = orbit_deg.rem_euclid(360.0).to_radians();
    let direction = Vec3::new(
        elevation.cos() * azimuth.sin(),
        elevation.sin(),
        elevation.cos() * azimuth.cos(),
    );
    Transform::from_translation(sphere.center + direction * distance)
        .looking_at(sphere.center, Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GallerySettings {
        GallerySettings {
            cycle_seconds: 10.0,
            blend_seconds: 2.0,
            blend_start_fraction: 0.5,
        }
    }

    #[test]
    fn swaps_exactly_once_per_cycle() {
        let mut rotation = GalleryRotation::new(3, settings(), 0.0);
        let mut swaps = Vec::new();
        for i in 0..88 {
            let now = i as f32 * 0.25;
            let tick = rotation.tick(now);
            if tick.swapped {
                swaps.push((now, tick.active));
            }
        }
        assert_eq!(swaps, vec![(7.0, 1), (14.0, 2), (21.0, 0)]);
    }

    #[test]
    fn blend_follows_smoothstep() {
        let mut rotation = GalleryRotation::new(2, settings(), 0.0);
        assert_eq!(rotation.tick(5.0).blend, 0.0);

        let mid = rotation.tick(6.0);
        assert_eq!(mid.blend, 0.5);
        assert_eq!((mid.active, mid.incoming), (0, 1));

        let quarter = rotation.tick(5.5);
        assert!((quarter.blend - smoothstep(0.25)).abs() < 1e-6);
        assert!(quarter.blend < 0.25);
    }

    #[test]
    fn single_scene_never_blends() {
        let mut rotation = GalleryRotation::new(1, settings(), 0.0);
        for i in 0..100 {
            let tick = rotation.tick(i as f32);
            assert_eq!(tick.blend, 0.0);
            assert!(!tick.swapped);
            assert_eq!(tick.incoming, 0);
        }
    }

    #[test]
    fn framing_distance_matches_fov() {
        let fov = 60f32.to_radians();
        let distance = framing_distance(10.0, fov, 0.1);
        assert!((distance - 10.0 / 30f32.to_radians().tan() * 1.1).abs() < 1e-4);
    }

    #[test]
    fn orbit_camera_looks_at_centre_from_elevation() {
        let sphere = SceneSphere {
            center: Vec3::new(1.0, 2.0, 3.0),
            radius: 5.0,
        };
        let transform = orbit_camera_transform(sphere, 1.0, 0.0, 30.0, 90.0);
        let to_centre = (sphere.center - transform.translation).normalize();

        assert!((transform.forward().as_vec3() - to_centre).length() < 1e-5);
        assert!(
            (transform.translation.distance(sphere.center) - framing_distance(5.0, 1.0, 0.0))
                .abs()
                < 1e-4
        );
        assert!(transform.translation.y > sphere.center.y);
        assert!(transform.translation.x > sphere.center.x);
    }

    #[test]
    fn sphere_lerp_and_transform() {
        let a = SceneSphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let b = SceneSphere {
            center: Vec3::new(2.0, 0.0, 0.0),
            radius: 3.0,
        };
        assert_eq!(
            a.lerp(b, 0.5),
            SceneSphere {
                center: Vec3::X,
                radius: 2.0
            }
        );

        let world = Transform::from_scale(Vec3::splat(10.0));
        assert_eq!(b.transformed(&world).radius, 30.0);
        assert_eq!(b.transformed(&world).center, Vec3::new(20.0, 0.0, 0.0));
    }
}
