//! Scene bounding spheres used to frame the gallery camera.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    /// Centroid of the scene's real points, in scene space.
    pub center: [f32; 3],
    /// Largest distance from the centroid to any real point.
    pub radius: f32,
}

impl BoundingSphere {
    /// Centroid plus maximum distance. Non-finite positions are skipped.
    pub fn from_positions(positions: &[[f32; 3]]) -> Option<Self> {
        let mut sum = [0.0f64; 3];
        let mut count = 0usize;
        for p in positions.iter().filter(|p| p.iter().all(|c| c.is_finite())) {
            sum[0] += p[0] as f64;
            sum[1] += p[1] as f64;
            sum[2] += p[2] as f64;
            count += 1;
        }
        if count == 0 {
            return None;
        }

        let center = [
            sum[0] / count as f64,
            sum[1] / count as f64,
            sum[2] / count as f64,
        ];

        let radius_squared = positions
            .iter()
            .filter(|p| p.iter().all(|c| c.is_finite()))
            .map(|p| {
                let dx = p[0] as f64 - center[0];
                let dy = p[1] as f64 - center[1];
                let dz = p[2] as f64 - center[2];
                dx * dx + dy * dy + dz * dz
            })
            .fold(0.0f64, f64::max);

        Some(Self {
            center: [center[0] as f32, center[1] as f32, center[2] as f32],
            radius: radius_squared.sqrt() as f32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_points_center_on_midpoint() {
        let sphere = BoundingSphere::from_positions(&[
            [1.0, 2.0, 3.0],
            [3.0, 2.0, 3.0],
            [2.0, 4.0, 3.0],
            [2.0, 0.0, 3.0],
        ])
        .unwrap();

        assert_eq!(sphere.center, [2.0, 2.0, 3.0]);
        assert!((sphere.radius - 2.0).abs() < 1e-6);
    }

    #[test]
    fn non_finite_points_are_ignored() {
        let sphere =
            BoundingSphere::from_positions(&[[0.0, 0.0, 0.0], [f32::NAN, 1.0, 1.0]]).unwrap();
        assert_eq!(sphere.center, [0.0, 0.0, 0.0]);
        assert_eq!(sphere.radius, 0.0);
    }

    #[test]
    fn empty_scene_has_no_sphere() {
        assert!(BoundingSphere::from_positions(&[]).is_none());
    }
}
