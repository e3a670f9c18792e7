//! Scene data: models, textures, the scene graph and the ground plane.
//!
//! - `model` holds meshes, materials and the draw helpers
//! - `texture` wraps GPU textures
//! - `instance` holds node transforms
//! - `scene_graph` organizes a loaded vehicle hierarchically
//! - `ground` is the floor plane

pub mod ground;
pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
