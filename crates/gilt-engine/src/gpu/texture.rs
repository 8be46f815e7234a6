use anyhow::Result;

use crate::coords::PixelSize;
use crate::render::allocate_id;

use super::GpuContext;

/// An RGBA8 texture that render states can sample from.
///
/// Smoothing selects linear filtering; repeating selects wrap addressing.
/// Both only affect sampling, never the stored texels.
#[derive(Debug)]
pub struct Texture {
    id: u64,
    size: PixelSize,
    srgb: bool,
    smooth: bool,
    repeated: bool,
    device: wgpu::Device,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl Texture {
    /// Uploads tightly packed RGBA8 `pixels` of the given size.
    pub fn from_rgba8(ctx: &GpuContext, size: PixelSize, pixels: &[u8], srgb: bool) -> Result<Self> {
        anyhow::ensure!(!size.is_empty(), "texture has zero size");
        let expected = size.width as usize * size.height as usize * 4;
        anyhow::ensure!(
            pixels.len() == expected,
            "texture data is {} bytes, expected {expected} for {}x{}",
            pixels.len(),
            size.width,
            size.height
        );

        let format = if srgb { wgpu::TextureFormat::Rgba8UnormSrgb } else { wgpu::TextureFormat::Rgba8Unorm };
        let texture = create_color_texture(&ctx.device, size, format, wgpu::TextureUsages::empty());

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width * 4),
                rows_per_image: Some(size.height),
            },
            extent(size),
        );

        Ok(Self::from_parts(&ctx.device, texture, size, srgb))
    }

    /// A single opaque white texel.
    pub fn white(ctx: &GpuContext) -> Result<Self> {
        Self::from_rgba8(ctx, PixelSize::new(1, 1), &[255; 4], false)
    }

    /// Wraps a texture created elsewhere (render-texture color attachments).
    pub(crate) fn from_parts(device: &wgpu::Device, texture: wgpu::Texture, size: PixelSize, srgb: bool) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = create_sampler(device, false, false);
        let id = allocate_id();
        log::debug!("texture {id} created ({}x{}, srgb={srgb})", size.width, size.height);
        Self { id, size, srgb, smooth: false, repeated: false, device: device.clone(), texture, view, sampler }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn size(&self) -> PixelSize {
        self.size
    }

    #[inline]
    pub fn is_srgb(&self) -> bool {
        self.srgb
    }

    #[inline]
    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    #[inline]
    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    pub fn set_smooth(&mut self, smooth: bool) {
        if self.smooth != smooth {
            self.smooth = smooth;
            self.sampler = create_sampler(&self.device, smooth, self.repeated);
        }
    }

    pub fn set_repeated(&mut self, repeated: bool) {
        if self.repeated != repeated {
            self.repeated = repeated;
            self.sampler = create_sampler(&self.device, self.smooth, repeated);
        }
    }

    #[inline]
    pub fn raw(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub(crate) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub(crate) fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

pub(crate) fn extent(size: PixelSize) -> wgpu::Extent3d {
    wgpu::Extent3d { width: size.width, height: size.height, depth_or_array_layers: 1 }
}

/// Creates a sampleable color texture; `extra` adds usages on top of sampling and copying.
pub(crate) fn create_color_texture(
    device: &wgpu::Device,
    size: PixelSize,
    format: wgpu::TextureFormat,
    extra: wgpu::TextureUsages,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("gilt texture"),
        size: extent(size),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_DST
            | wgpu::TextureUsages::COPY_SRC
            | extra,
        view_formats: &[],
    })
}

fn create_sampler(device: &wgpu::Device, smooth: bool, repeated: bool) -> wgpu::Sampler {
    let address = if repeated { wgpu::AddressMode::Repeat } else { wgpu::AddressMode::ClampToEdge };
    let filter = if smooth { wgpu::FilterMode::Linear } else { wgpu::FilterMode::Nearest };
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("gilt sampler"),
        address_mode_u: address,
        address_mode_v: address,
        address_mode_w: address,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

/// Creates an 8-bit stencil attachment of `size`.
pub(crate) fn create_stencil_view(device: &wgpu::Device, size: PixelSize) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("gilt stencil"),
        size: extent(size),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: super::STENCIL_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
