use cgmath::InnerSpace;
use wgpu::util::DeviceExt;

use crate::config::LightConfig;

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

/// One directional light plus ambient, all colours in linear RGB.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// Unit vector pointing towards the light.
    direction: [f32; 3],
    // Uniforms require 16 byte spacing
    _padding: u32,
    color: [f32; 3],
    _padding2: u32,
    ambient: [f32; 3],
    _padding3: u32,
}

impl LightUniform {
    pub fn direction(&self) -> [f32; 3] {
        self.direction
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.ambient
    }
}

impl From<&LightConfig> for LightUniform {
    fn from(config: &LightConfig) -> Self {
        let direction = cgmath::Vector3::from(config.direction);
        let direction = if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            cgmath::Vector3::unit_y()
        };
        let [r, g, b] = config.colour.to_linear();
        let i = config.intensity;
        Self {
            direction: direction.into(),
            _padding: 0,
            color: [r * i, g * i, b * i],
            _padding2: 0,
            ambient: config.ambient.to_linear(),
            _padding3: 0,
        }
    }
}

impl LightResources {
    pub fn new(uniform: LightUniform, device: &wgpu::Device) -> Self {
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::showroom::style::Rgb;

    #[test]
    fn default_light_points_up_with_intensity() {
        let uniform = LightUniform::from(&LightConfig::default());
        assert_eq!(uniform.direction(), [0.0, 1.0, 0.0]);
        assert_eq!(uniform.color(), [2.0, 2.0, 2.0]);
        let ambient = Rgb::from_hex(0x404040).to_linear();
        assert_eq!(uniform.ambient(), ambient);
    }

    #[test]
    fn direction_is_normalized() {
        let config = LightConfig {
            direction: [0.0, 3.0, 4.0],
            ..LightConfig::default()
        };
        let [x, y, z] = LightUniform::from(&config).direction();
        assert_eq!(x, 0.0);
        assert!((y - 0.6).abs() < 1e-6);
        assert!((z - 0.8).abs() < 1e-6);
    }

    #[test]
    fn uniform_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);
    }
}
