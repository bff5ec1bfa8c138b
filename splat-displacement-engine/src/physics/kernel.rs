use crate::physics::camera_frame::{CameraFrame, uv_in_bounds};
use crate::physics::identity::RestTexel;
use crate::physics::motion_field::SensorMotionField;
use crate::physics::params::{DisplacementParams, ReturnModel};
use bevy::math::Vec3;

/// Offset and velocity of one slot, in scene space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlotState {
    pub offset: Vec3,
    pub velocity: Vec3,
}

impl SlotState {
    pub const ZERO: Self = Self {
        offset: Vec3::ZERO,
        velocity: Vec3::ZERO,
    };

    fn sanitized(self) -> Self {
        if self.offset.is_finite() && self.velocity.is_finite() {
            self
        } else {
            Self::ZERO
        }
    }
}

/// Read-only inputs shared by every slot of one pass.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub field: &'a SensorMotionField,
    pub frame: &'a CameraFrame,
    pub params: &'a DisplacementParams,
    /// Seconds since start, seeds the scatter.
    pub time: f32,
}

/// One slot, one frame. Never fails and never yields a non-finite state.
pub fn update_slot(slot: u32, previous: SlotState, rest: RestTexel, inputs: &FrameInputs) -> SlotState {
    if !rest.is_valid() {
        return SlotState::ZERO;
    }

    let previous = previous.sanitized();
    let current = rest.position() + previous.offset;
    let force = force_at(slot, current, inputs);
    integrate(previous, force, inputs.params)
}

/// World force acting on a splat currently at `current`.
pub fn force_at(slot: u32, current: Vec3, inputs: &FrameInputs) -> Vec3 {
    let params = inputs.params;

    if params.max_radius > 0.0 && current.distance(params.scene_center) > params.max_radius {
        return Vec3::ZERO;
    }

    let Some(uv) = inputs.frame.sensor.project_uv(current) else {
        return Vec3::ZERO;
    };
    if !uv_in_bounds(uv, params.uv_margin) {
        return Vec3::ZERO;
    }

    let sample = inputs.field.sample(uv);
    let depth_weight = (-sample.depth * params.depth_falloff).exp();
    let viewer = &inputs.frame.viewer;
    let mut force =
        (viewer.right * sample.flow.x + viewer.up * sample.flow.y) * params.force_gain * depth_weight;

    if params.noise_gain > 0.0 {
        let epoch = (inputs.time * params.noise_rate).floor().max(0.0) as u32;
        force += scatter(slot, epoch) * params.noise_gain * sample.flow.length();
    }

    if force.is_finite() { force } else { Vec3::ZERO }
}

/// Spring-damper step followed by the component-wise clamp.
pub fn integrate(previous: SlotState, force: Vec3, params: &DisplacementParams) -> SlotState {
    let mut velocity = previous.velocity + force * params.dt;
    if let ReturnModel::StiffSpring { stiffness } = params.return_model {
        velocity -= previous.offset * stiffness * params.dt;
    }
    velocity *= params.damping;
    // At most max_offset per step.
    let speed_limit = Vec3::splat(params.max_offset / params.dt);
    velocity = velocity.clamp(-speed_limit, speed_limit);

    let mut offset = previous.offset + velocity * params.dt;
    if params.return_model == ReturnModel::ExponentialDecay {
        offset *= params.return_rate;
    }
    let limit = Vec3::splat(params.max_offset);
    offset = offset.clamp(-limit, limit);

    SlotState { offset, velocity }.sanitized()
}

/// PCG hash; the compute shader uses the same constants.
pub fn pcg_hash(value: u32) -> u32 {
    let state = value.wrapping_mul(747_796_405).wrapping_add(2_891_336_453);
    let word = ((state >> ((state >> 28) + 4)) ^ state).wrapping_mul(277_803_737);
    (word >> 22) ^ word
}

/// Per-slot pseudo-random direction in `[-1, 1]^3`, re-seeded every epoch.
pub fn scatter(slot: u32, epoch: u32) -> Vec3 {
    let h0 = pcg_hash(slot ^ pcg_hash(epoch));
    let h1 = pcg_hash(h0);
    let h2 = pcg_hash(h1);
    let unit = |h: u32| h as f32 / u32::MAX as f32 * 2.0 - 1.0;
    Vec3::new(unit(h0), unit(h1), unit(h2))
}
