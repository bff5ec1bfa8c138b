use crate::physics::identity::{RestStateStore, RestTexel, StableId};
use crate::physics::kernel::{FrameInputs, SlotState, update_slot};
use bevy::math::Vec3;
use rayon::prelude::*;

/// Two generations of per-slot state. The kernel reads one and writes the other;
/// after a pass the written one becomes current.
#[derive(Debug, Clone)]
pub struct DisplacementState {
    generations: [Vec<SlotState>; 2],
    read: usize,
    generation: u64,
    reset_pending: bool,
}

impl DisplacementState {
    pub fn new(capacity: usize) -> Self {
        Self {
            generations: [
                vec![SlotState::ZERO; capacity],
                vec![SlotState::ZERO; capacity],
            ],
            read: 0,
            generation: 0,
            reset_pending: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.generations[0].len()
    }

    /// Completed passes since creation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the most recently completed generation.
    pub fn read_index(&self) -> usize {
        self.read
    }

    /// Most recently completed generation.
    pub fn current(&self) -> &[SlotState] {
        &self.generations[self.read]
    }

    pub fn state(&self, id: StableId) -> Option<SlotState> {
        self.current().get(id.slot()).copied()
    }

    /// Current offset of `id`; zero for ids outside the store.
    pub fn offset(&self, id: StableId) -> Vec3 {
        self.state(id).map(|s| s.offset).unwrap_or(Vec3::ZERO)
    }

    /// The next pass writes zeros for every slot.
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    /// Run the kernel over every slot in parallel, then swap generations.
    pub fn step(&mut self, store: &RestStateStore, inputs: &FrameInputs) {
        let reset = std::mem::take(&mut self.reset_pending);
        let rest = store.texels();

        let (first, second) = self.generations.split_at_mut(1);
        let (read, write) = if self.read == 0 {
            (&first[0], &mut second[0])
        } else {
            (&second[0], &mut first[0])
        };

        write
            .par_iter_mut()
            .zip(read.par_iter())
            .enumerate()
            .for_each(|(slot, (next, previous))| {
                *next = if reset {
                    SlotState::ZERO
                } else {
                    let texel = rest.get(slot).copied().unwrap_or(RestTexel::INVALID);
                    update_slot(slot as u32, *previous, texel, inputs)
                };
            });

        self.read ^= 1;
        self.generation += 1;
    }

    /// Current offsets as RGBA32F texture bytes `(x, y, z, 0)`.
    pub fn offset_texture_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.capacity() * 16);
        for state in self.current() {
            for value in [state.offset.x, state.offset.y, state.offset.z, 0.0] {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::camera_frame::CameraFrame;
    use crate::physics::motion_field::{FlowSample, SensorMotionField};
    use crate::physics::params::DisplacementParams;
    use bevy::math::Vec2;

    #[test]
    fn read_and_write_generations_alternate() {
        let mut store = RestStateStore::with_capacity(4);
        store.write_snapshot([(StableId(0), Vec3::ZERO)]);
        let field = SensorMotionField::uniform(
            2,
            2,
            FlowSample {
                flow: Vec2::X,
                depth: 0.0,
            },
        );
        let frame = CameraFrame::default();
        let params = DisplacementParams::default();
        let inputs = FrameInputs {
            field: &field,
            frame: &frame,
            params: &params,
            time: 0.0,
        };

        let mut state = DisplacementState::new(4);
        let before = state.current().as_ptr();
        state.step(&store, &inputs);
        let after = state.current().as_ptr();
        assert_ne!(before, after);
        assert_eq!(state.read_index(), 1);

        let first_offset = state.offset(StableId(0));
        state.step(&store, &inputs);
        assert_eq!(state.current().as_ptr(), before);
        assert!(state.offset(StableId(0)).x > first_offset.x);
        assert_eq!(state.generation(), 2);
    }

    #[test]
    fn reset_zeroes_the_next_generation_once() {
        let mut store = RestStateStore::with_capacity(2);
        store.write_snapshot([(StableId(1), Vec3::ZERO)]);
        let field = SensorMotionField::uniform(
            1,
            1,
            FlowSample {
                flow: Vec2::Y,
                depth: 0.0,
            },
        );
        let frame = CameraFrame::default();
        let params = DisplacementParams::default();
        let inputs = FrameInputs {
            field: &field,
            frame: &frame,
            params: &params,
            time: 0.0,
        };

        let mut state = DisplacementState::new(2);
        state.step(&store, &inputs);
        assert_ne!(state.offset(StableId(1)), Vec3::ZERO);

        state.request_reset();
        state.step(&store, &inputs);
        assert_eq!(state.state(StableId(1)), Some(SlotState::ZERO));

        state.step(&store, &inputs);
        assert_ne!(state.offset(StableId(1)), Vec3::ZERO);
    }

    #[test]
    fn out_of_range_ids_read_zero() {
        let state = DisplacementState::new(2);
        assert_eq!(state.offset(StableId(10)), Vec3::ZERO);
        assert_eq!(state.state(StableId(10)), None);
    }
}
