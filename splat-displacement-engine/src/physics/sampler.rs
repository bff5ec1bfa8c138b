use crate::physics::double_buffer::DisplacementState;
use crate::physics::identity::{RestStateStore, StableId};
use bevy::math::Vec3;

/// Rest position plus the calibrated offset, before the entity transform.
pub fn displaced_position(rest: Vec3, offset: Vec3, offset_scale: f32) -> Vec3 {
    rest + offset * offset_scale
}

/// Cosmetic colour multiplier: white at rest, shifting toward the offset
/// direction (mapped to RGB) as the offset approaches `max_offset`.
pub fn displacement_tint(offset: Vec3, max_offset: f32, strength: f32) -> Vec3 {
    if max_offset <= 0.0 || !offset.is_finite() {
        return Vec3::ONE;
    }
    let magnitude = (offset.length() / max_offset).clamp(0.0, 1.0);
    let direction = offset.normalize_or_zero() * 0.5 + 0.5;
    Vec3::ONE.lerp(direction, magnitude * strength.clamp(0.0, 1.0))
}

impl DisplacementState {
    /// Displaced position of a valid entity, read from the current generation.
    pub fn displaced_position(
        &self,
        store: &RestStateStore,
        id: StableId,
        offset_scale: f32,
    ) -> Option<Vec3> {
        let rest = store.get(id)?;
        Some(displaced_position(rest, self.offset(id), offset_scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_scale_renders_rest() {
        assert_eq!(displaced_position(Vec3::ONE, Vec3::X, 0.0), Vec3::ONE);
        assert_eq!(
            displaced_position(Vec3::ONE, Vec3::X, 2.0),
            Vec3::new(3.0, 1.0, 1.0)
        );
    }

    #[test]
    fn tint_is_white_at_rest_and_saturates() {
        assert_eq!(displacement_tint(Vec3::ZERO, 5.0, 1.0), Vec3::ONE);

        let full = displacement_tint(Vec3::new(10.0, 0.0, 0.0), 5.0, 1.0);
        assert_eq!(full, Vec3::new(1.0, 0.5, 0.5));

        let none = displacement_tint(Vec3::new(10.0, 0.0, 0.0), 5.0, 0.0);
        assert_eq!(none, Vec3::ONE);
    }

    #[test]
    fn invalid_entities_have_no_position() {
        let store = RestStateStore::with_capacity(2);
        let state = DisplacementState::new(2);
        assert_eq!(state.displaced_position(&store, StableId(0), 1.0), None);
    }
}
