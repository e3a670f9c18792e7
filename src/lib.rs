//! flow-showroom
//!
//! A cross-platform vehicle showroom. Car variants are loaded from glTF,
//! recoloured or retextured from swatches, and viewed with an orbit camera
//! that reframes itself per variant. The same crate runs natively on winit
//! and in the browser, where the page supplies the controls.
//!
//! High-level modules
//! - `showroom`: appearance state, variant registry, framing and the frame driver
//! - `camera`: orbit camera, projection and the camera uniform
//! - `config`: TOML viewer configuration with stock defaults
//! - `context`: GPU and window context that owns device, queue and pipelines
//! - `data_structures`: meshes, materials, textures, instances and the scene graph
//! - `flow`: the winit event loop and background loading
//! - `pipelines`: the lit model pipeline and the ground pipeline
//! - `resources`: fetching textures and glTF models
//! - `render`: render composition for pipeline batching
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod showroom;
#[cfg(target_arch = "wasm32")]
pub mod web;
