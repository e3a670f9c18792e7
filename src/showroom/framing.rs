//! Per-variant camera framing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::camera::{Camera, OrbitController};

/// Where the camera starts and how far it may zoom for one variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FramingPolicy {
    pub position: [f32; 3],
    pub min_distance: f32,
    pub max_distance: f32,
}

impl FramingPolicy {
    pub fn apply(&self, camera: &mut Camera, controller: &mut OrbitController) {
        camera.position = self.position.into();
        controller.set_zoom_bounds(self.min_distance, self.max_distance);
    }
}

/// Variant name to framing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FramingTable(BTreeMap<String, FramingPolicy>);

impl FramingTable {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, name: impl Into<String>, policy: FramingPolicy) -> Self {
        self.0.insert(name.into(), policy);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&FramingPolicy> {
        self.0.get(name)
    }

    /// Variant names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FramingTable {
    fn default() -> Self {
        Self::new()
            .with(
                "mclaren",
                FramingPolicy {
                    position: [0.0, 3.0, 3.0],
                    min_distance: 5.0,
                    max_distance: 30.0,
                },
            )
            .with(
                "porsche",
                FramingPolicy {
                    position: [0.0, 15.0, 15.0],
                    min_distance: 20.0,
                    max_distance: 50.0,
                },
            )
    }
}
