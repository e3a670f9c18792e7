//! Scene graph.
//!
//! A loaded vehicle is a tree of [`SceneNode`]s: [`ContainerNode`]s group
//! children and [`ModelNode`]s carry meshes. Every node has one local and one
//! world transform. Hiding a node hides its whole subtree.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        model::{self, Material},
    },
    render::{Instanced, Render},
    showroom::updater::Fragment,
};

pub trait SceneNode: Send {
    fn get_local_transform(&self) -> &Instance;

    fn set_local_transform(&mut self, instance: Instance);

    fn get_world_transform(&self) -> &Instance;

    /// Recompute world transforms for this subtree below `parent`.
    fn update_world_transforms(&mut self, parent: &Instance);

    fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Instance::default());
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// Visit every material in this subtree.
    fn for_each_material_mut(&mut self, visit: &mut dyn FnMut(&mut Material));

    /// Upload transforms and pending material changes.
    fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device);

    /// Draw data for the visible part of this subtree.
    fn get_render(&self) -> Vec<Instanced<'_>>;
}

impl std::fmt::Debug for dyn SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("visible", &self.is_visible())
            .field("children", &self.get_children().len())
            .finish()
    }
}

impl<'a> From<&'a dyn SceneNode> for Render<'a> {
    fn from(sn: &'a dyn SceneNode) -> Self {
        Render::Defaults(sn.get_render())
    }
}

impl Fragment for Box<dyn SceneNode> {
    type Surface = Material;

    fn set_visible(&mut self, visible: bool) {
        (**self).set_visible(visible);
    }

    fn is_visible(&self) -> bool {
        (**self).is_visible()
    }

    fn traverse_surfaces(&mut self, visit: &mut dyn FnMut(&mut Material)) {
        (**self).for_each_material_mut(visit);
    }
}

pub struct ContainerNode {
    pub children: Vec<Box<dyn SceneNode>>,
    local: Instance,
    world: Instance,
    visible: bool,
}

impl ContainerNode {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            local: Instance::default(),
            world: Instance::default(),
            visible: true,
        }
    }
}

impl Default for ContainerNode {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneNode for ContainerNode {
    fn get_local_transform(&self) -> &Instance {
        &self.local
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    fn get_world_transform(&self) -> &Instance {
        &self.world
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&self.world);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn for_each_material_mut(&mut self, visit: &mut dyn FnMut(&mut Material)) {
        for child in self.children.iter_mut() {
            child.for_each_material_mut(visit);
        }
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue, device));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        if !self.visible {
            return Vec::new();
        }
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .collect()
    }
}

pub struct ModelNode {
    children: Vec<Box<dyn SceneNode>>,
    instance_buffer: wgpu::Buffer,
    local: Instance,
    world: Instance,
    visible: bool,
    model: model::Model,
}

impl ModelNode {
    pub fn from_model(device: &wgpu::Device, model: model::Model) -> Self {
        let local = Instance::default();
        let world = Instance::default();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&[world.to_raw()]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            children: Vec::new(),
            instance_buffer,
            local,
            world,
            visible: true,
            model,
        }
    }
}

impl SceneNode for ModelNode {
    fn get_local_transform(&self) -> &Instance {
        &self.local
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    fn get_world_transform(&self) -> &Instance {
        &self.world
    }

    fn update_world_transforms(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        for child in self.children.iter_mut() {
            child.update_world_transforms(&self.world);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn for_each_material_mut(&mut self, visit: &mut dyn FnMut(&mut Material)) {
        for material in self.model.materials.iter_mut() {
            visit(material);
        }
        for child in self.children.iter_mut() {
            child.for_each_material_mut(visit);
        }
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        let raw: InstanceRaw = self.world.to_raw();
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&[raw]));
        for material in self.model.materials.iter_mut() {
            material.write_to_buffer(queue, device);
        }
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue, device));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        if !self.visible {
            return Vec::new();
        }
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .chain([Instanced {
                instance: &self.instance_buffer,
                model: &self.model,
                amount: 1,
            }])
            .collect()
    }
}
