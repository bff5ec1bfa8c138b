use crate::engine::compute::displacement_compute::DisplacementFrame;
use crate::engine::core::app_state::FpsText;
use crate::engine::simulation::SensorMotionFieldResource;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

/// Log FPS, generation and sensor activity every five seconds.
pub fn fps_notification_system(
    diagnostics: Res<DiagnosticsStore>,
    frame: Res<DisplacementFrame>,
    field: Res<SensorMotionFieldResource>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_send_time < 5.0 {
        return;
    }

    if let Some(value) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
    {
        info!(
            "fps {:.1}, generation {}, peak flow {:.3}",
            value,
            frame.generation,
            field.0.peak_flow()
        );
        *last_send_time = current_time;
    }
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
