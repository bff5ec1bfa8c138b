use bevy::math::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Right/up of the active render viewpoint. Orients forces, never positions them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerBasis {
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for ViewerBasis {
    fn default() -> Self {
        Self {
            right: Vec3::X,
            up: Vec3::Y,
        }
    }
}

impl ViewerBasis {
    /// Basis columns of a world-from-camera matrix: column 0 is right, column 1 is up.
    /// Normalised so camera scale never scales forces.
    pub fn from_world_transform(world_from_camera: &Mat4) -> Self {
        Self {
            right: world_from_camera.x_axis.xyz().normalize_or_zero(),
            up: world_from_camera.y_axis.xyz().normalize_or_zero(),
        }
    }

    /// Re-express the basis in the local space of `world_from_local`
    /// (the splat entity's transform). A singular transform leaves it unchanged.
    pub fn relative_to(&self, world_from_local: &Mat4) -> Self {
        let determinant = world_from_local.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return *self;
        }
        let local_from_world = world_from_local.inverse();
        if !local_from_world.is_finite() {
            return *self;
        }
        Self {
            right: local_from_world
                .transform_vector3(self.right)
                .normalize_or_zero(),
            up: local_from_world.transform_vector3(self.up).normalize_or_zero(),
        }
    }
}

/// Which world axes feed sensor U and V (0 = X, 1 = Y, 2 = Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMapping {
    pub u: usize,
    pub v: usize,
}

impl Default for AxisMapping {
    fn default() -> Self {
        Self {
            u: constants::sensor::SENSOR_U_AXIS,
            v: constants::sensor::SENSOR_V_AXIS,
        }
    }
}

/// Fixed world-to-sensor-clip matrix of the sensor's unmoving viewpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorProjection {
    pub matrix: Mat4,
}

impl Default for SensorProjection {
    fn default() -> Self {
        Self::orthographic(
            Vec3::from_array(constants::sensor::SENSOR_CENTER),
            Vec2::from_array(constants::sensor::SENSOR_HALF_EXTENTS),
            AxisMapping::default(),
        )
    }
}

impl SensorProjection {
    /// Orthographic projection centred on `center`. A negative half-extent flips that axis.
    pub fn orthographic(center: Vec3, half_extents: Vec2, axes: AxisMapping) -> Self {
        let mut rows = [[0.0f32; 4]; 4];
        rows[0][axes.u] = 1.0 / half_extents.x;
        rows[0][3] = -center[axes.u] / half_extents.x;
        rows[1][axes.v] = 1.0 / half_extents.y;
        rows[1][3] = -center[axes.v] / half_extents.y;
        rows[3][3] = 1.0;

        // from_cols_array_2d reads columns; the rows above need a transpose.
        Self {
            matrix: Mat4::from_cols_array_2d(&rows).transpose(),
        }
    }

    /// Sensor UV of a position: `clip.xy / clip.w * 0.5 + 0.5`.
    /// `None` when the projection is degenerate for this point.
    pub fn project_uv(&self, position: Vec3) -> Option<Vec2> {
        let clip = self.matrix * position.extend(1.0);
        if !(clip.w > 0.0) || !clip.is_finite() {
            return None;
        }
        let uv = clip.xy() / clip.w * 0.5 + 0.5;
        uv.is_finite().then_some(uv)
    }
}

/// UV inside `[0, 1]` widened by `margin` on every side.
pub fn uv_in_bounds(uv: Vec2, margin: f32) -> bool {
    uv.cmpge(Vec2::splat(-margin)).all() && uv.cmple(Vec2::splat(1.0 + margin)).all()
}

/// Both sub-frames for one physics pass. They never share a source.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraFrame {
    pub viewer: ViewerBasis,
    pub sensor: SensorProjection,
}
