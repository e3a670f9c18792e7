//! Loading vehicle models and textures from files or the network.

use std::collections::HashMap;

use anyhow::{Context, anyhow};

use crate::{
    context::InitContext,
    data_structures::{
        instance::Instance,
        model::{self, Material},
        scene_graph::{ContainerNode, ModelNode, SceneNode},
        texture::Texture,
    },
    resources::texture::{load_binary, load_texture, resolve_location},
};

pub mod texture;

/// What a glTF material contributes before it is instantiated per mesh.
#[derive(Clone)]
struct MaterialTemplate {
    name: String,
    base_color: [f32; 3],
    map: Option<Texture>,
}

impl MaterialTemplate {
    fn fallback() -> Self {
        Self {
            name: "default".to_string(),
            base_color: [1.0, 1.0, 1.0],
            map: None,
        }
    }

    fn instantiate(&self, ctx: &InitContext) -> Material {
        Material::new(
            &ctx.device,
            &self.name,
            self.base_color,
            self.map.clone(),
            ctx.placeholder.clone(),
            &ctx.material_layout,
        )
    }
}

/// Fetch and decode a glTF or GLB file into a scene graph.
///
/// The returned root is visible with its world transforms computed.
pub async fn load_model_gltf(
    location: &str,
    ctx: &InitContext,
) -> anyhow::Result<Box<dyn SceneNode>> {
    let bytes = load_binary(location).await?;
    let gltf = gltf::Gltf::from_slice(&bytes).with_context(|| format!("parsing {location}"))?;

    let mut buffer_data: Vec<Vec<u8>> = Vec::new();
    for buffer in gltf.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| anyhow!("{location} references a missing binary chunk"))?,
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => {
                return Err(anyhow!("{location}: embedded data URIs are not supported"));
            }
            gltf::buffer::Source::Uri(uri) => load_binary(&resolve_location(location, uri)?).await?,
        };
        if data.len() < buffer.length() {
            return Err(anyhow!(
                "{location}: buffer {} holds {} bytes, expected {}",
                buffer.index(),
                data.len(),
                buffer.length()
            ));
        }
        buffer_data.push(data);
    }

    // Decode each image once even if several materials share it.
    let mut images: HashMap<usize, Texture> = HashMap::new();
    let mut templates = Vec::new();
    for material in gltf.materials() {
        let index = templates.len();
        let pbr = material.pbr_metallic_roughness();
        let [r, g, b, _] = pbr.base_color_factor();
        let map = match pbr.base_color_texture() {
            Some(info) => {
                let image = info.texture().source();
                let image_index = image.index();
                let texture = match images.get(&image_index) {
                    Some(texture) => texture.clone(),
                    None => {
                        let texture = load_image(location, image, &buffer_data, ctx).await?;
                        images.insert(image_index, texture.clone());
                        texture
                    }
                };
                Some(texture)
            }
            None => None,
        };
        templates.push(MaterialTemplate {
            name: material
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{location}#{index}")),
            base_color: [r, g, b],
            map,
        });
    }

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| anyhow!("{location} contains no scene"))?;

    let mut root = ContainerNode::new();
    for node in scene.nodes() {
        root.add_child(to_scene_node(node, &buffer_data, &templates, ctx));
    }
    root.update_world_transform_all();
    log::debug!("Decoded {} with {} materials", location, templates.len());

    Ok(Box::new(root))
}

async fn load_image(
    location: &str,
    image: gltf::Image<'_>,
    buffer_data: &[Vec<u8>],
    ctx: &InitContext,
) -> anyhow::Result<Texture> {
    match image.source() {
        gltf::image::Source::View { view, mime_type } => {
            let buffer = &buffer_data[view.buffer().index()];
            let bytes = buffer
                .get(view.offset()..view.offset() + view.length())
                .ok_or_else(|| anyhow!("{location}: image view out of bounds"))?;
            Texture::from_bytes(
                &ctx.device,
                &ctx.queue,
                bytes,
                location,
                mime_type.split('/').last(),
            )
        }
        gltf::image::Source::Uri { uri, .. } => {
            load_texture(&resolve_location(location, uri)?, &ctx.device, &ctx.queue).await
        }
    }
}

fn to_scene_node(
    node: gltf::scene::Node,
    buffer_data: &[Vec<u8>],
    templates: &[MaterialTemplate],
    ctx: &InitContext,
) -> Box<dyn SceneNode> {
    let mut scene_node: Box<dyn SceneNode> = match node.mesh() {
        Some(mesh) => {
            let mut meshes = Vec::new();
            let mut materials = Vec::new();
            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::warn!(
                        "Skipping primitive {} of mesh {:?}: unsupported mode {:?}",
                        primitive.index(),
                        mesh.name(),
                        primitive.mode()
                    );
                    continue;
                }
                let Some(mesh_data) = read_primitive(&primitive, buffer_data) else {
                    log::warn!(
                        "Skipping primitive {} of mesh {:?}: no geometry",
                        primitive.index(),
                        mesh.name()
                    );
                    continue;
                };
                let template = primitive
                    .material()
                    .index()
                    .and_then(|idx| templates.get(idx))
                    .cloned()
                    .unwrap_or_else(MaterialTemplate::fallback);
                materials.push(template.instantiate(ctx));
                meshes.push(mesh_data.upload(
                    &ctx.device,
                    mesh.name().unwrap_or("unknown_mesh"),
                    materials.len() - 1,
                ));
            }
            let model = model::Model { meshes, materials };
            Box::new(ModelNode::from_model(&ctx.device, model))
        }
        None => Box::new(ContainerNode::new()),
    };

    let (translation, rotation, scale) = node.transform().decomposed();
    scene_node.set_local_transform(Instance::from_decomposed(translation, rotation, scale));
    for child in node.children() {
        scene_node.add_child(to_scene_node(child, buffer_data, templates, ctx));
    }

    scene_node
}

struct PrimitiveData {
    vertices: Vec<model::ModelVertex>,
    indices: Vec<u32>,
}

fn read_primitive(primitive: &gltf::Primitive, buffer_data: &[Vec<u8>]) -> Option<PrimitiveData> {
    let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));

    let mut vertices: Vec<model::ModelVertex> = reader
        .read_positions()?
        .map(|position| model::ModelVertex {
            position,
            tex_coords: [0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
        })
        .collect();
    if let Some(normals) = reader.read_normals() {
        vertices
            .iter_mut()
            .zip(normals)
            .for_each(|(vertex, normal)| vertex.normal = normal);
    }
    if let Some(tex_coords) = reader.read_tex_coords(0) {
        vertices
            .iter_mut()
            .zip(tex_coords.into_f32())
            .for_each(|(vertex, uv)| vertex.tex_coords = uv);
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..vertices.len() as u32).collect(),
    };

    if indices.is_empty() {
        return None;
    }
    Some(PrimitiveData { vertices, indices })
}

impl PrimitiveData {
    fn upload(self, device: &wgpu::Device, name: &str, material: usize) -> model::Mesh {
        use wgpu::util::DeviceExt;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Index Buffer")),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        model::Mesh {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: self.indices.len() as u32,
            material,
        }
    }
}
