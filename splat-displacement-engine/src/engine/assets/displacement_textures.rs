use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageFilterMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResource;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use constants::texture::REST_TEXTURE_SIZE;

/// Every texture the displacement pass reads or writes.
///
/// `offsets[i]` and `velocities[i]` form generation `i`; the pass of generation
/// counter `g` reads `g % 2` and writes `(g + 1) % 2`.
#[derive(Resource, ExtractResource, Clone, Default)]
pub struct DisplacementTextures {
    /// Rest positions of the physics-active scene, `(x, y, z, valid)`.
    pub rest: Handle<Image>,
    /// Sensor motion field, `(flowX, flowY, depth, 1)`.
    pub motion_field: Handle<Image>,
    pub offsets: [Handle<Image>; 2],
    pub velocities: [Handle<Image>; 2],
}

impl DisplacementTextures {
    pub fn read_index(generation: u64) -> usize {
        (generation % 2) as usize
    }

    pub fn write_index(generation: u64) -> usize {
        ((generation + 1) % 2) as usize
    }
}

fn nearest_sampler() -> ImageSampler {
    ImageSampler::Descriptor(ImageSamplerDescriptor {
        mag_filter: ImageFilterMode::Nearest,
        min_filter: ImageFilterMode::Nearest,
        ..default()
    })
}

fn slot_extent() -> Extent3d {
    Extent3d {
        width: REST_TEXTURE_SIZE as u32,
        height: REST_TEXTURE_SIZE as u32,
        depth_or_array_layers: 1,
    }
}

/// Offset or velocity generation texture.
///
/// GPU state lives only in the render world. CPU state keeps zeroed main-world
/// data so each pass can be uploaded.
pub fn create_state_image(cpu_side: bool) -> Image {
    let mut image = if cpu_side {
        Image::new_fill(
            slot_extent(),
            TextureDimension::D2,
            &[0u8; 16],
            TextureFormat::Rgba32Float,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        )
    } else {
        Image::new_uninit(
            slot_extent(),
            TextureDimension::D2,
            TextureFormat::Rgba32Float,
            RenderAssetUsages::RENDER_WORLD,
        )
    };
    image.texture_descriptor.usage = TextureUsages::TEXTURE_BINDING
        | TextureUsages::STORAGE_BINDING
        | TextureUsages::COPY_SRC
        | TextureUsages::COPY_DST;
    image.sampler = nearest_sampler();
    image
}

/// Rest texture built from store bytes (upstream snapshots).
pub fn create_rest_image(bytes: Vec<u8>) -> Image {
    let mut image = Image::new(
        slot_extent(),
        TextureDimension::D2,
        bytes,
        TextureFormat::Rgba32Float,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = nearest_sampler();
    image
}

/// Motion field texture of the configured resolution.
pub fn create_motion_field_image(width: u32, height: u32, bytes: Vec<u8>) -> Image {
    let mut image = Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        bytes,
        TextureFormat::Rgba32Float,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    image.texture_descriptor.usage |= TextureUsages::COPY_DST;
    image.sampler = nearest_sampler();
    image
}

/// Use nearest filtering on a loaded texture.
pub fn configure_nearest_sampling(image: &mut Image) {
    image.sampler = nearest_sampler();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_and_write_indices_never_alias() {
        for generation in 0..6u64 {
            let read = DisplacementTextures::read_index(generation);
            let write = DisplacementTextures::write_index(generation);
            assert_ne!(read, write);
            assert_eq!(DisplacementTextures::read_index(generation + 1), write);
        }
    }

    #[test]
    fn cpu_state_image_is_zeroed_and_storage_capable() {
        let image = create_state_image(true);
        let data = image.data.as_ref().unwrap();
        assert_eq!(data.len(), REST_TEXTURE_SIZE * REST_TEXTURE_SIZE * 16);
        assert!(data.iter().all(|b| *b == 0));
        assert!(
            image
                .texture_descriptor
                .usage
                .contains(TextureUsages::STORAGE_BINDING)
        );
        assert!(create_state_image(false).data.is_none());
    }
}
