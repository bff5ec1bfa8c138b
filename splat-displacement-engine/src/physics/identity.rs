use crate::physics::error::RestTextureError;
use bevy::math::Vec3;
use bytemuck::{Pod, Zeroable};
use constants::texture::{MAX_SLOTS, TEXEL_CHANNELS};

/// Identifier assigned once at load time. Addresses every per-splat slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StableId(pub u32);

impl StableId {
    pub fn slot(self) -> usize {
        self.0 as usize
    }

    /// Texel of this id in every slot-addressed texture.
    pub fn texel(self) -> (u32, u32) {
        constants::texture::slot_texel(self.0)
    }
}

/// One RGBA32F texel of the rest texture: `(x, y, z, valid)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RestTexel {
    pub position: [f32; 3],
    pub valid: f32,
}

impl RestTexel {
    pub const INVALID: Self = Self {
        position: [0.0; 3],
        valid: 0.0,
    };

    pub fn new(position: Vec3) -> Self {
        if !position.is_finite() {
            return Self::INVALID;
        }
        Self {
            position: position.to_array(),
            valid: 1.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid > 0.5
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Outcome of one snapshot write, for logging by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    pub written: usize,
    pub out_of_capacity: usize,
    pub non_finite: usize,
}

/// Dense `stableId -> restPosition` mapping of fixed capacity.
#[derive(Debug, Clone)]
pub struct RestStateStore {
    texels: Vec<RestTexel>,
}

impl Default for RestStateStore {
    fn default() -> Self {
        Self::with_capacity(MAX_SLOTS)
    }
}

impl RestStateStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            texels: vec![RestTexel::INVALID; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.texels.len()
    }

    /// Replace the whole store with `entities`. Collection order is irrelevant;
    /// every slot not named this call becomes invalid.
    pub fn write_snapshot<I>(&mut self, entities: I) -> SnapshotReport
    where
        I: IntoIterator<Item = (StableId, Vec3)>,
    {
        self.texels.fill(RestTexel::INVALID);

        let mut report = SnapshotReport::default();
        for (id, position) in entities {
            let Some(texel) = self.texels.get_mut(id.slot()) else {
                report.out_of_capacity += 1;
                continue;
            };
            *texel = RestTexel::new(position);
            if texel.is_valid() {
                report.written += 1;
            } else {
                report.non_finite += 1;
            }
        }
        report
    }

    /// Rest position of a valid slot.
    pub fn get(&self, id: StableId) -> Option<Vec3> {
        self.texels
            .get(id.slot())
            .filter(|t| t.is_valid())
            .map(RestTexel::position)
    }

    pub fn texels(&self) -> &[RestTexel] {
        &self.texels
    }

    pub fn valid_count(&self) -> usize {
        self.texels.iter().filter(|t| t.is_valid()).count()
    }

    /// Rebuild from raw little-endian RGBA32F texture bytes.
    pub fn from_rgba32f_bytes(bytes: &[u8], capacity: usize) -> Result<Self, RestTextureError> {
        let texel_bytes = TEXEL_CHANNELS * size_of::<f32>();
        let expected = capacity * texel_bytes;
        if bytes.len() != expected {
            return Err(RestTextureError::LengthMismatch {
                slots: capacity,
                expected,
                found: bytes.len(),
            });
        }

        let texels = bytes
            .chunks_exact(texel_bytes)
            .map(|chunk| {
                let channel = |i: usize| {
                    f32::from_le_bytes([
                        chunk[i * 4],
                        chunk[i * 4 + 1],
                        chunk[i * 4 + 2],
                        chunk[i * 4 + 3],
                    ])
                };
                if channel(3) > 0.5 {
                    RestTexel::new(Vec3::new(channel(0), channel(1), channel(2)))
                } else {
                    RestTexel::INVALID
                }
            })
            .collect();

        Ok(Self { texels })
    }

    /// Texture bytes for GPU upload, slot order preserved.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_clears_slots_missing_this_frame() {
        let mut store = RestStateStore::with_capacity(8);
        store.write_snapshot([(StableId(1), Vec3::X), (StableId(2), Vec3::Y)]);
        store.write_snapshot([(StableId(2), Vec3::Z)]);

        assert_eq!(store.get(StableId(1)), None);
        assert_eq!(store.get(StableId(2)), Some(Vec3::Z));
        assert_eq!(store.valid_count(), 1);
    }

    #[test]
    fn out_of_capacity_and_non_finite_are_reported() {
        let mut store = RestStateStore::with_capacity(4);
        let report = store.write_snapshot([
            (StableId(0), Vec3::ONE),
            (StableId(4), Vec3::ONE),
            (StableId(3), Vec3::new(f32::NAN, 0.0, 0.0)),
        ]);

        assert_eq!(
            report,
            SnapshotReport {
                written: 1,
                out_of_capacity: 1,
                non_finite: 1,
            }
        );
        assert_eq!(store.get(StableId(3)), None);
    }

    #[test]
    fn texture_bytes_preserve_slots() {
        let mut store = RestStateStore::with_capacity(3);
        store.write_snapshot([(StableId(2), Vec3::new(1.0, -2.0, 3.0))]);

        let rebuilt = RestStateStore::from_rgba32f_bytes(store.as_bytes(), 3).unwrap();
        assert_eq!(rebuilt.get(StableId(2)), Some(Vec3::new(1.0, -2.0, 3.0)));
        assert_eq!(rebuilt.get(StableId(0)), None);
        assert_eq!(rebuilt.texels(), store.texels());
    }

    #[test]
    fn wrong_texture_length_is_rejected() {
        assert_eq!(
            RestStateStore::from_rgba32f_bytes(&[0u8; 20], 2).unwrap_err(),
            RestTextureError::LengthMismatch {
                slots: 2,
                expected: 32,
                found: 20,
            }
        );
    }
}
