#![allow(dead_code)]

use flow_showroom::{
    camera::{Camera, OrbitController},
    showroom::{
        Showroom,
        framing::FramingTable,
        style::Rgb,
        updater::{Fragment, Surface},
    },
};

/// A material that records what was applied to it. Maps are texture names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockSurface {
    pub color: Option<Rgb>,
    pub map: Option<String>,
    pub updates: u32,
}

impl Surface for MockSurface {
    type Map = String;

    fn set_base_color(&mut self, color: Rgb) {
        self.color = Some(color);
    }

    fn clear_map(&mut self) {
        self.map = None;
    }

    fn set_map(&mut self, map: String) {
        self.map = Some(map);
    }

    fn mark_needs_update(&mut self) {
        self.updates += 1;
    }
}

#[derive(Debug, Clone)]
pub struct MockFragment {
    pub visible: bool,
    pub surfaces: Vec<MockSurface>,
}

impl MockFragment {
    /// A visible fragment with `meshes` untouched materials, as a loader returns it.
    pub fn with_meshes(meshes: usize) -> Self {
        Self {
            visible: true,
            surfaces: vec![MockSurface::default(); meshes],
        }
    }

    pub fn all_colored(&self, color: Rgb) -> bool {
        self.surfaces.iter().all(|s| s.color == Some(color))
    }

    pub fn all_mapped(&self, map: &str) -> bool {
        self.surfaces.iter().all(|s| s.map.as_deref() == Some(map))
    }

    pub fn unmapped(&self) -> bool {
        self.surfaces.iter().all(|s| s.map.is_none())
    }
}

impl Fragment for MockFragment {
    type Surface = MockSurface;

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn traverse_surfaces(&mut self, visit: &mut dyn FnMut(&mut MockSurface)) {
        self.surfaces.iter_mut().for_each(visit);
    }
}

pub struct Scene {
    pub showroom: Showroom<MockFragment>,
    pub camera: Camera,
    pub controller: OrbitController,
}

impl Scene {
    /// Stock framing, floor at 1 and the camera where the viewer starts it.
    pub fn new() -> Self {
        Self {
            showroom: Showroom::new(FramingTable::default(), 1.0),
            camera: Camera::new((0.0, 5.0, 10.0)),
            controller: OrbitController::new(0.005, 1.0, 0.0),
        }
    }

    /// Both stock vehicles loaded, nothing selected yet.
    pub fn loaded() -> Self {
        let mut scene = Self::new();
        scene.showroom.model_loaded("mclaren", MockFragment::with_meshes(3));
        scene.showroom.model_loaded("porsche", MockFragment::with_meshes(2));
        scene
    }

    pub fn select_model(&mut self, name: &str) -> bool {
        self.showroom
            .select_model(name, &mut self.camera, &mut self.controller)
    }

    pub fn fragment(&self, name: &str) -> &MockFragment {
        self.showroom
            .registry()
            .get(name)
            .unwrap_or_else(|| panic!("{name} is not registered"))
    }

    pub fn advance(&mut self) -> bool {
        self.showroom
            .advance_frame(&mut self.camera, &mut self.controller)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
