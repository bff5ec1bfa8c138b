use crate::error::PreprocessError;
use constants::texture::{MAX_SLOTS, REST_TEXTURE_SIZE, TEXEL_CHANNELS};
use ddsfile::{AlphaMode, D3D10ResourceDimension, Dds, DxgiFormat, NewDxgiParams};
use std::path::Path;

/// Texel data for a rest position texture: slot `i` holds `(x, y, z, 1)` for point `i`,
/// unused slots stay `(0, 0, 0, 0)`. Points beyond capacity are dropped.
pub fn rest_position_texels(positions: &[[f32; 3]]) -> Vec<f32> {
    let mut texels = vec![0.0f32; MAX_SLOTS * TEXEL_CHANNELS];
    for (slot, position) in positions.iter().take(MAX_SLOTS).enumerate() {
        let base = slot * TEXEL_CHANNELS;
        texels[base..base + 3].copy_from_slice(position);
        texels[base + 3] = 1.0;
    }
    texels
}

pub fn write_rest_position_dds(path: &Path, data: &[f32]) -> Result<(), PreprocessError> {
    let dds_error = |e: ddsfile::Error| PreprocessError::Dds {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut bytes = Vec::with_capacity(data.len() * 4);
    for &float_val in data {
        bytes.extend_from_slice(&float_val.to_le_bytes());
    }

    let params = NewDxgiParams {
        height: REST_TEXTURE_SIZE as u32,
        width: REST_TEXTURE_SIZE as u32,
        depth: None,
        format: DxgiFormat::R32G32B32A32_Float,
        mipmap_levels: Some(1),
        array_layers: Some(1),
        caps2: None,
        is_cubemap: false,
        resource_dimension: D3D10ResourceDimension::Texture2D,
        alpha_mode: AlphaMode::Unknown,
    };

    let mut dds = Dds::new_dxgi(params).map_err(dds_error)?;
    dds.data = bytes;
    let mut file = std::fs::File::create(path).map_err(|e| PreprocessError::io(path, e))?;
    dds.write(&mut file).map_err(dds_error)?;
    Ok(())
}
