//! Render composition and pipeline batching.
//!
//! Scene objects describe themselves as a [`Render`]; the frame loop sorts
//! those descriptions into one batch per pipeline before drawing.

use crate::{data_structures::ground::Ground, data_structures::model::Model};

/// A model and the instance buffer holding its transforms.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// What to draw for one scene object.
///
/// - `None` renders nothing
/// - `Default` and `Defaults` render lit models
/// - `Ground` renders the unlit floor plane
/// - `Composed` renders several of the above
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Ground(&'a Ground),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(self, models: &mut Vec<Instanced<'a>>, grounds: &mut Vec<&'a Ground>) {
        match self {
            Render::Default(instanced) => models.push(instanced),
            Render::Defaults(mut vec) => models.append(&mut vec),
            Render::Ground(ground) => grounds.push(ground),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(models, grounds)),
            Render::None => (),
        }
    }
}

impl<'a> From<&'a Ground> for Render<'a> {
    fn from(ground: &'a Ground) -> Self {
        Render::Ground(ground)
    }
}
