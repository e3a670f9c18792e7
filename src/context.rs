//! The GPU and window context.

use std::sync::Arc;

use anyhow::{Context as _, anyhow};
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, OrbitController, Projection},
    config::ViewerConfig,
    data_structures::{ground::Ground, texture},
    pipelines::{
        Pipelines,
        basic::mk_model_pipeline,
        ground::mk_ground_pipeline,
        light::{LightResources, LightUniform},
    },
    resources::texture::material_layout,
};

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub ground: Ground,
    pub material_layout: wgpu::BindGroupLayout,
    /// White 1x1 texture bound by materials without a surface map.
    pub placeholder: texture::Texture,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>, viewer: &ViewerConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating the render surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("requesting the GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are computed in linear space, so prefer an sRGB surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("the surface supports no texture format"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let projection = Projection::new(
            config.width,
            config.height,
            cgmath::Deg(viewer.camera.fovy),
            viewer.camera.znear,
            viewer.camera.zfar,
        );
        let camera = Camera::new(viewer.camera.position);
        let controller = OrbitController::new(
            viewer.orbit.rotate_speed,
            viewer.orbit.zoom_speed,
            viewer.orbit.damping,
        );
        let camera = CameraResources::new(&device, camera, controller, &projection);

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let light = LightResources::new(LightUniform::from(&viewer.light), &device);

        let material_layout = material_layout(&device);
        let ground_layout = crate::data_structures::ground::mk_bind_group_layout(&device);
        let pipelines = Pipelines {
            model: mk_model_pipeline(
                &device,
                &config,
                &material_layout,
                &camera.bind_group_layout,
                &light.bind_group_layout,
            ),
            ground: mk_ground_pipeline(&device, &config, &camera.bind_group_layout, &ground_layout),
        };
        let ground = Ground::new(
            &device,
            &ground_layout,
            viewer.scene.ground_size,
            viewer.scene.ground_colour,
        );
        let placeholder =
            texture::Texture::create_solid(&device, &queue, [255, 255, 255, 255], "placeholder");

        let [r, g, b] = viewer.scene.background.to_linear();
        let clear_colour = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        };

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            pipelines,
            ground,
            material_layout,
            placeholder,
            clear_colour,
        })
    }
}

/// The GPU handles background loads need, detached from the window.
///
/// Cloning only bumps reference counts.
#[derive(Clone, Debug)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub material_layout: wgpu::BindGroupLayout,
    pub placeholder: texture::Texture,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            material_layout: ctx.material_layout.clone(),
            placeholder: ctx.placeholder.clone(),
        }
    }
}
