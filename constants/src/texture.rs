/// Side length of every slot-addressed texture (rest positions, offsets, velocities).
/// Must match between the pre-processor and the engine.
pub const REST_TEXTURE_SIZE: usize = 1024;

/// Number of identity slots a rest texture can hold.
pub const MAX_SLOTS: usize = REST_TEXTURE_SIZE * REST_TEXTURE_SIZE;

/// Channels per texel in the RGBA32F slot textures.
pub const TEXEL_CHANNELS: usize = 4;

/// Workgroup edge used by the displacement compute shader (8x8 threads).
pub const COMPUTE_WORKGROUP_SIZE: u32 = 8;

/// Slot texel for a stable identity: `(id % size, id / size)`.
pub fn slot_texel(stable_id: u32) -> (u32, u32) {
    let size = REST_TEXTURE_SIZE as u32;
    (stable_id % size, stable_id / size)
}
