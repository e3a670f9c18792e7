//! Camera, projection and orbit controls.
//!
//! [`Camera`] and [`OrbitController`] are plain data and can be driven without a
//! GPU. [`CameraResources`] bundles them with the uniform buffer the pipelines
//! read from.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};
use wgpu::util::DeviceExt;
use winit::event::{MouseButton, MouseScrollDelta, WindowEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

// Keeps the polar angle away from the poles so `look_at` never degenerates.
const POLAR_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P) -> Self {
        Self {
            position: position.into(),
            target: Point3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn look_at<P: Into<Point3<f32>>>(&mut self, target: P) {
        self.target = target.into();
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }
}

#[derive(Debug, Clone)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Orbits the camera around its target.
///
/// Dragging with the left button rotates, the wheel zooms. Every [`update`]
/// keeps the distance to the target within `min_distance..=max_distance`.
///
/// [`update`]: OrbitController::update
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians per pixel of mouse motion.
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    /// Fraction of the pending rotation dropped per update; `0.0` disables damping.
    pub damping: f32,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    dragging: bool,
}

impl OrbitController {
    pub fn new(rotate_speed: f32, zoom_speed: f32, damping: f32) -> Self {
        Self {
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            rotate_speed,
            zoom_speed,
            damping: damping.clamp(0.0, 1.0),
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            dragging: false,
        }
    }

    pub fn set_zoom_bounds(&mut self, min_distance: f32, max_distance: f32) {
        self.min_distance = min_distance;
        self.max_distance = max_distance.max(min_distance);
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.dragging = state.is_pressed(),
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / 100.0,
                };
                self.zoom(amount);
            }
            WindowEvent::Focused(false) => self.dragging = false,
            _ => (),
        }
    }

    /// Raw mouse motion; only rotates while the left button is held.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        if self.dragging {
            self.rotate(dx as f32, dy as f32);
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.theta_delta -= dx * self.rotate_speed;
        self.phi_delta -= dy * self.rotate_speed;
    }

    /// Positive amounts move the camera towards the target.
    pub fn zoom(&mut self, amount: f32) {
        self.scale *= 0.95f32.powf(amount * self.zoom_speed);
    }

    fn is_idle(&self) -> bool {
        self.theta_delta == 0.0 && self.phi_delta == 0.0 && self.scale == 1.0
    }

    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.position - camera.target;
        let radius = offset.magnitude();
        if radius <= f32::EPSILON {
            self.reset_deltas();
            return;
        }
        if self.is_idle() && radius >= self.min_distance && radius <= self.max_distance {
            return;
        }

        let theta = offset.x.atan2(offset.z) + self.theta_delta;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + self.phi_delta)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        camera.position = camera.target
            + Vector3::new(
                radius * sin_phi * sin_theta,
                radius * cos_phi,
                radius * sin_phi * cos_theta,
            );

        if self.damping > 0.0 {
            self.theta_delta *= 1.0 - self.damping;
            self.phi_delta *= 1.0 - self.damping;
            if self.theta_delta.abs() < 1e-5 && self.phi_delta.abs() < 1e-5 {
                self.theta_delta = 0.0;
                self.phi_delta = 0.0;
            }
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
        }
        self.scale = 1.0;
    }

    fn reset_deltas(&mut self) {
        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(
        device: &wgpu::Device,
        camera: Camera,
        controller: OrbitController,
        projection: &Projection,
    ) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            controller,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Recompute the view-projection and upload it.
    pub fn write_to_buffer(&mut self, queue: &wgpu::Queue, projection: &Projection) {
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(camera: &Camera) -> f32 {
        (camera.position - camera.target).magnitude()
    }

    #[test]
    fn idle_update_keeps_exact_position() {
        let mut camera = Camera::new((0.0, 15.0, 15.0));
        let mut controller = OrbitController::new(0.005, 1.0, 0.0);
        controller.set_zoom_bounds(20.0, 50.0);
        controller.update(&mut camera);
        assert_eq!(camera.position, Point3::new(0.0, 15.0, 15.0));
    }

    #[test]
    fn update_clamps_to_min_distance() {
        let mut camera = Camera::new((0.0, 3.0, 3.0));
        let mut controller = OrbitController::new(0.005, 1.0, 0.0);
        controller.set_zoom_bounds(5.0, 30.0);
        controller.update(&mut camera);
        assert!((distance(&camera) - 5.0).abs() < 1e-4);
        // direction is preserved
        assert!((camera.position.y - camera.position.z).abs() < 1e-4);
    }

    #[test]
    fn zoom_respects_max_distance() {
        let mut camera = Camera::new((0.0, 5.0, 10.0));
        let mut controller = OrbitController::new(0.005, 1.0, 0.0);
        controller.set_zoom_bounds(5.0, 30.0);
        for _ in 0..200 {
            controller.zoom(-1.0);
            controller.update(&mut camera);
        }
        assert!((distance(&camera) - 30.0).abs() < 1e-3);
    }

    #[test]
    fn rotation_only_while_dragging() {
        let mut camera = Camera::new((0.0, 5.0, 10.0));
        let mut controller = OrbitController::new(0.01, 1.0, 0.0);
        controller.handle_mouse(100.0, 0.0);
        controller.update(&mut camera);
        assert_eq!(camera.position, Point3::new(0.0, 5.0, 10.0));

        controller.rotate(100.0, 0.0);
        let before = distance(&camera);
        controller.update(&mut camera);
        assert!(camera.position.x.abs() > 1.0);
        assert!((distance(&camera) - before).abs() < 1e-4);
    }

    #[test]
    fn polar_angle_never_flips_over_the_pole() {
        let mut camera = Camera::new((0.0, 5.0, 10.0));
        let mut controller = OrbitController::new(0.01, 1.0, 0.0);
        controller.rotate(0.0, 10_000.0);
        controller.update(&mut camera);
        assert!(camera.position.y > 0.0);
        assert!(camera.position.z.abs() < 0.01);
    }

    #[test]
    fn projection_ignores_zero_height() {
        let mut projection = Projection::new(800, 600, cgmath::Deg(75.0), 0.1, 1000.0);
        projection.resize(1024, 0);
        assert!((projection.aspect() - 800.0 / 600.0).abs() < f32::EPSILON);
        projection.resize(1000, 500);
        assert!((projection.aspect() - 2.0).abs() < f32::EPSILON);
    }
}
