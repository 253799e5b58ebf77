use crate::error::RenderError;
use sketchbook_assets::{AssetId, FallbackKind, ImageData, TextureCache};
use std::collections::BTreeMap;

/// How texel values are interpreted when sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TexelSpace {
    /// Display colors, decoded to linear by the sampler.
    Color,
    /// Heights and masks, sampled as stored.
    Data,
}

impl TexelSpace {
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            TexelSpace::Color => wgpu::TextureFormat::Rgba8UnormSrgb,
            TexelSpace::Data => wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    /// Color space a slot's texture is uploaded in.
    pub fn for_slot(kind: FallbackKind) -> Self {
        match kind {
            FallbackKind::Albedo => TexelSpace::Color,
            FallbackKind::Bump | FallbackKind::Specular => TexelSpace::Data,
        }
    }
}

/// GPU copies of cached images, one per (image, color space) pair.
pub struct GpuTextures {
    views: BTreeMap<(AssetId, TexelSpace), wgpu::TextureView>,
    white: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl GpuTextures {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let white = upload_image(
            device,
            queue,
            &ImageData::solid([255, 255, 255, 255]),
            TexelSpace::Color,
            "white_texture",
        );
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("material_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        Self {
            views: BTreeMap::new(),
            white,
            sampler,
        }
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Opaque white, for materials without a color map.
    pub fn white(&self) -> &wgpu::TextureView {
        &self.white
    }

    /// Load `path` through the cache (falling back per `kind`) and make sure
    /// it is resident on the GPU.
    pub fn resolve(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        cache: &mut TextureCache,
        path: Option<&str>,
        kind: FallbackKind,
    ) -> Result<(AssetId, TexelSpace), RenderError> {
        let id = match path {
            Some(p) => cache.load_or_fallback(p, kind),
            None => cache.fallback(kind),
        };
        let space = TexelSpace::for_slot(kind);
        if !self.views.contains_key(&(id, space)) {
            let image = cache.get(id)?;
            let label = path.unwrap_or("fallback");
            let view = upload_image(device, queue, image, space, label);
            tracing::debug!(texture = label, width = image.width, height = image.height, "texture uploaded");
            self.views.insert((id, space), view);
        }
        Ok((id, space))
    }

    pub fn view(&self, key: (AssetId, TexelSpace)) -> Option<&wgpu::TextureView> {
        self.views.get(&key)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }
}

fn upload_image(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &ImageData,
    space: TexelSpace,
    label: &str,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: space.format(),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            aspect: wgpu::TextureAspect::All,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
        },
        &image.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(image.bytes_per_row()),
            rows_per_image: Some(image.height),
        },
        texture.size(),
    );
    texture.create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_maps_are_srgb_and_data_maps_are_not() {
        assert_eq!(
            TexelSpace::for_slot(FallbackKind::Albedo).format(),
            wgpu::TextureFormat::Rgba8UnormSrgb
        );
        assert_eq!(
            TexelSpace::for_slot(FallbackKind::Bump).format(),
            wgpu::TextureFormat::Rgba8Unorm
        );
        assert_eq!(TexelSpace::for_slot(FallbackKind::Specular), TexelSpace::Data);
    }
}
