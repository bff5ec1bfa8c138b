use crate::engine::config::InstallationConfig;
use crate::engine::simulation::SensorMotionFieldResource;
use crate::physics::SensorMotionField;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Flow below this magnitude is snapped to zero after decay.
const REST_THRESHOLD: f32 = 1e-6;

/// Window cursor (pixels, y down) to field UV (y up). `None` outside the window.
pub fn window_to_field_uv(cursor: Vec2, window_size: Vec2) -> Option<Vec2> {
    if window_size.x <= 0.0 || window_size.y <= 0.0 {
        return None;
    }
    let uv = Vec2::new(cursor.x / window_size.x, 1.0 - cursor.y / window_size.y);
    (uv.cmpge(Vec2::ZERO).all() && uv.cmple(Vec2::ONE).all()).then_some(uv)
}

/// Add `flow` to every cell, weighted by a Gaussian of `radius` (UV units) around `uv`.
pub fn deposit_blob(field: &mut SensorMotionField, uv: Vec2, flow: Vec2, radius: f32) {
    if radius <= 0.0 || !flow.is_finite() {
        return;
    }
    let width = field.width();
    let size = Vec2::new(width as f32, field.height() as f32);
    let inv_two_sigma_sq = 1.0 / (2.0 * radius * radius);

    for (index, cell) in field.cells_mut().iter_mut().enumerate() {
        let x = index as u32 % width;
        let y = index as u32 / width;
        let centre = (Vec2::new(x as f32, y as f32) + 0.5) / size;
        let weight = (-(centre.distance_squared(uv)) * inv_two_sigma_sq).exp();
        cell.flow += flow * weight;
    }
}

/// Cursor state carried between frames.
#[derive(Default)]
pub struct PointerTrail {
    last: Option<Vec2>,
}

/// Synthesises sensor flow from left-button drags.
///
/// The field decays every frame and receives a blob of the cursor velocity
/// (pixels per second, y up) while the button is held.
pub fn pointer_motion_source(
    config: Res<InstallationConfig>,
    mut field: ResMut<SensorMotionFieldResource>,
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut trail: Local<PointerTrail>,
) {
    let pointer = &config.sensor.pointer;
    if !pointer.enabled {
        return;
    }

    if field.0.peak_flow() > 0.0 {
        let field = &mut field.0;
        field.decay(pointer.decay);
        if field.peak_flow() < REST_THRESHOLD {
            field.cells_mut().iter_mut().for_each(|c| c.flow = Vec2::ZERO);
        }
    }

    let Ok(window) = windows.single() else {
        trail.last = None;
        return;
    };
    let cursor = window.cursor_position();
    let previous = std::mem::replace(&mut trail.last, cursor);

    let (Some(cursor), Some(previous)) = (cursor, previous) else {
        return;
    };
    let dt = time.delta_secs();
    if !buttons.pressed(MouseButton::Left) || dt <= 0.0 {
        return;
    }
    let Some(uv) = window_to_field_uv(cursor, window.size()) else {
        return;
    };

    let delta = cursor - previous;
    let flow = Vec2::new(delta.x, -delta.y) / dt * pointer.flow_gain;
    if flow != Vec2::ZERO {
        deposit_blob(&mut field.0, uv, flow, pointer.blob_radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_y_is_flipped() {
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(window_to_field_uv(Vec2::new(0.0, 0.0), size), Some(Vec2::new(0.0, 1.0)));
        assert_eq!(window_to_field_uv(Vec2::new(400.0, 600.0), size), Some(Vec2::new(0.5, 0.0)));
        assert_eq!(window_to_field_uv(Vec2::new(900.0, 10.0), size), None);
        assert_eq!(window_to_field_uv(Vec2::ONE, Vec2::ZERO), None);
    }

    #[test]
    fn blob_peaks_at_the_cursor_and_keeps_direction() {
        let mut field = SensorMotionField::zeros(9, 9);
        deposit_blob(&mut field, Vec2::splat(0.5), Vec2::new(2.0, -1.0), 0.1);

        let centre = field.get(4, 4);
        assert!((centre.flow - Vec2::new(2.0, -1.0)).length() < 1e-4);
        let edge = field.get(0, 4);
        assert!(edge.flow.length() < centre.flow.length());
        assert!(edge.flow.x > 0.0 && edge.flow.y < 0.0);
        assert_eq!(centre.depth, 0.0);
    }

    #[test]
    fn degenerate_blobs_leave_the_field_untouched() {
        let mut field = SensorMotionField::zeros(4, 4);
        deposit_blob(&mut field, Vec2::splat(0.5), Vec2::ONE, 0.0);
        deposit_blob(&mut field, Vec2::splat(0.5), Vec2::new(f32::NAN, 0.0), 0.1);
        assert_eq!(field.peak_flow(), 0.0);
    }
}
