//! GPU textures.
//!
//! [`Texture`] wraps a WGPU texture together with its view and sampler. Paint
//! maps decoded from swatch images, the depth buffer and the placeholder bound
//! to materials without a map are all created here.

use anyhow::{Context, Result, anyhow};
use image::{GenericImageView, ImageFormat, load_from_memory_with_format};
use wgpu::util::DeviceExt;

/// A GPU texture with a view and optional sampler.
///
/// Cloning is cheap: the WGPU handles are reference counted, so one decoded
/// swatch texture can be shared by every mesh of a model.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

fn texture_descriptor<'a>(
    label: Option<&'a str>,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
    view_formats: &'a [wgpu::TextureFormat],
) -> wgpu::TextureDescriptor<'a> {
    wgpu::TextureDescriptor {
        label,
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats,
    }
}

impl Texture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    /// Paint maps and the placeholder are sampled as sRGB.
    pub const MAP_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    fn with_view(texture: wgpu::Texture, sampler: wgpu::Sampler) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            sampler: Some(sampler),
        }
    }

    /// Create a depth buffer of `size` pixels, at least 1x1.
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let texture = device.create_texture(&texture_descriptor(
            Some(label),
            size[0],
            size[1],
            Self::DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            &[Self::DEPTH_FORMAT],
        ));
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("depth_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });
        Self::with_view(texture, sampler)
    }

    /// A 1x1 texture of a single sRGB colour.
    ///
    /// Bound in place of a surface map so the model shader can always sample;
    /// white leaves the base colour unchanged.
    pub fn create_solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: [u8; 4],
        label: &str,
    ) -> Self {
        Self::upload(device, queue, &rgba, 1, 1, Some(label))
    }

    /// Decode image file contents and upload them as an sRGB texture.
    ///
    /// `format` is a file extension hint such as `"png"`; without it the
    /// format is guessed from the data.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
        format: Option<&str>,
    ) -> Result<Self> {
        let decoded = match format {
            None => image::load_from_memory(bytes),
            Some(ext) => {
                let fmt = ImageFormat::from_extension(ext)
                    .ok_or_else(|| anyhow!("unknown image format `{ext}` for {label}"))?;
                load_from_memory_with_format(bytes, fmt)
            }
        };
        let img = decoded.with_context(|| format!("decoding texture {label}"))?;
        Self::from_image(device, queue, &img, Some(label))
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Result<Self> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(anyhow!("texture {:?} has no pixels", label));
        }
        Ok(Self::upload(device, queue, &img.to_rgba8(), width, height, label))
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: Option<&str>,
    ) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &texture_descriptor(
                label,
                width,
                height,
                Self::MAP_FORMAT,
                wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                &[],
            ),
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );
        Self::with_view(texture, create_default_sampler(device))
    }
}

/// Repeating, linearly filtered sampler for paint maps.
pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("map_sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
