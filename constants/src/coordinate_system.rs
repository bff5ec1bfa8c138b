/// Scene-to-world rotation applied to every splat scene (row-major).
/// Rx=180 followed by Ry=180: (x, y, z) -> (-x, -y, z).
pub const SCENE_TO_WORLD_ROTATION: [[f64; 3]; 3] = [
    [-1.0, 0.0, 0.0], // X = -X
    [0.0, -1.0, 0.0], // Y = -Y
    [0.0, 0.0, 1.0],  // Z = Z
];

/// Uniform scale applied after the rotation.
pub const SCENE_TO_WORLD_SCALE: f64 = 10.0;

/// Euler angles (degrees, XYZ order) matching `SCENE_TO_WORLD_ROTATION`.
pub const SCENE_ROTATION_EULER_DEG: [f32; 3] = [180.0, 180.0, 0.0];

/// Map a scene-space (PLY) coordinate into world space.
pub fn scene_to_world(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let input = [x, y, z];
    let mut output = [0.0; 3];

    for i in 0..3 {
        for j in 0..3 {
            output[i] += SCENE_TO_WORLD_ROTATION[i][j] * input[j];
        }
    }

    (
        output[0] * SCENE_TO_WORLD_SCALE,
        output[1] * SCENE_TO_WORLD_SCALE,
        output[2] * SCENE_TO_WORLD_SCALE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_to_world_flips_x_and_y_then_scales() {
        assert_eq!(scene_to_world(1.0, 2.0, 3.0), (-10.0, -20.0, 30.0));
    }
}
