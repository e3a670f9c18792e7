//! The showroom controller.
//!
//! [`Showroom`] owns everything the page-level logic needs: the appearance
//! state, the registry of loaded variants, the framing table and the frame
//! driver. It is generic over the [`Fragment`] type so the same transitions
//! drive GPU scene nodes at runtime and in-memory fragments in tests.
//!
//! Asynchronous work never happens in here. Operations that need a texture
//! fetched return a [`TextureRequest`]; whoever runs the event loop performs
//! the fetch and reports back through [`Showroom::texture_loaded`] or
//! [`Showroom::texture_failed`].

pub mod appearance;
pub mod frame;
pub mod framing;
pub mod registry;
pub mod style;
pub mod updater;

use crate::camera::{Camera, OrbitController};

use appearance::AppearanceState;
use frame::FrameDriver;
use framing::FramingTable;
use registry::ModelRegistry;
use style::{Selection, SwatchStyle};
use updater::{Fragment, MapOf, TextureRequest, apply_color, apply_texture_map};

/// A visitor's choice on the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Swatch(SwatchStyle),
    SelectModel(String),
}

#[derive(Debug)]
pub struct Showroom<F: Fragment> {
    appearance: AppearanceState,
    registry: ModelRegistry<F>,
    framing: FramingTable,
    frame_driver: FrameDriver,
}

impl<F: Fragment> Showroom<F> {
    /// An empty showroom whose frame driver is already running, so orbit
    /// input and the floor clamp work before any model arrives.
    pub fn new(framing: FramingTable, floor: f32) -> Self {
        let mut frame_driver = FrameDriver::new(floor);
        frame_driver.start();
        Self {
            appearance: AppearanceState::new(),
            registry: ModelRegistry::new(),
            framing,
            frame_driver,
        }
    }

    pub fn appearance(&self) -> &AppearanceState {
        &self.appearance
    }

    pub fn registry(&self) -> &ModelRegistry<F> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ModelRegistry<F> {
        &mut self.registry
    }

    pub fn framing(&self) -> &FramingTable {
        &self.framing
    }

    pub fn frame_driver(&self) -> &FrameDriver {
        &self.frame_driver
    }

    pub fn handle_input(
        &mut self,
        input: Input,
        camera: &mut Camera,
        controller: &mut OrbitController,
    ) -> Option<TextureRequest> {
        match input {
            Input::Swatch(style) => self.select_swatch(&style),
            Input::SelectModel(name) => {
                self.select_model(&name, camera, controller);
                None
            }
        }
    }

    /// Handle a swatch click from its computed style.
    ///
    /// A colour that cannot be parsed leaves the state untouched.
    pub fn select_swatch(&mut self, style: &SwatchStyle) -> Option<TextureRequest> {
        match style.resolve() {
            Ok(selection) => self.select(selection),
            Err(e) => {
                log::warn!("Ignoring swatch {:?}: {}", style, e);
                None
            }
        }
    }

    /// Make `selection` the current appearance and apply it to the active variant.
    ///
    /// Colours are applied immediately. Textures yield a request to fetch
    /// them, or `None` when no active variant is loaded yet.
    pub fn select(&mut self, selection: Selection) -> Option<TextureRequest> {
        let sequence = self.appearance.select(selection.clone());
        let active = self.appearance.active_model_name().to_string();
        let slot = self.registry.slot_mut(&active)?;
        slot.applied_sequence = sequence;
        match selection {
            Selection::Color(color) => {
                apply_color(&mut slot.fragment, Some(color));
                None
            }
            Selection::Texture(url) => Some(TextureRequest {
                url,
                model: active,
                sequence,
            }),
        }
    }

    /// Show exactly the variant called `name` and frame the camera for it.
    ///
    /// Returns whether a framing policy was found. Unknown names still swap
    /// visibility and become the active variant; the camera keeps its
    /// position and zoom bounds but is re-aimed at the origin.
    pub fn select_model(
        &mut self,
        name: &str,
        camera: &mut Camera,
        controller: &mut OrbitController,
    ) -> bool {
        for (key, fragment) in self.registry.iter_mut() {
            fragment.set_visible(key == name);
        }
        let framed = match self.framing.lookup(name) {
            Some(policy) => {
                policy.apply(camera, controller);
                true
            }
            None => {
                log::debug!("No framing policy for variant {}", name);
                false
            }
        };
        camera.look_at((0.0, 0.0, 0.0));
        self.appearance.set_active_model(name);
        framed
    }

    /// Register a freshly loaded variant.
    ///
    /// The fragment starts hidden and receives the current appearance: a
    /// colour right away, a texture through the returned request. A frame
    /// driver stopped earlier is started again.
    pub fn model_loaded(&mut self, name: &str, fragment: F) -> Option<TextureRequest> {
        let sequence = self.appearance.sequence();
        let color = self.appearance.selected_color();
        let texture = self.appearance.selected_texture().map(str::to_string);

        let slot = match self.registry.insert(name, fragment) {
            Ok(slot) => slot,
            Err(_) => {
                log::warn!("Variant {} is already registered, dropping the new load", name);
                return None;
            }
        };
        slot.fragment.set_visible(false);
        slot.applied_sequence = sequence;
        apply_color(&mut slot.fragment, color);
        log::info!("Registered variant {}", name);

        if self.frame_driver.start() {
            log::info!("Frame driver started");
        }

        texture.map(|url| TextureRequest {
            url,
            model: name.to_string(),
            sequence,
        })
    }

    /// A variant could not be loaded. It stays unavailable for the session.
    pub fn model_failed(&mut self, name: &str, error: &anyhow::Error) {
        log::error!("An error occurred while loading the model {}: {:#}", name, error);
    }

    /// Apply a fetched texture unless a newer appearance already reached the variant.
    pub fn texture_loaded(&mut self, request: &TextureRequest, map: MapOf<F>) -> bool {
        let Some(slot) = self.registry.slot_mut(&request.model) else {
            log::debug!("Texture {} arrived for unknown variant {}", request.url, request.model);
            return false;
        };
        if slot.applied_sequence > request.sequence {
            log::debug!(
                "Dropping stale texture {} for {} (selection {} < {})",
                request.url,
                request.model,
                request.sequence,
                slot.applied_sequence
            );
            return false;
        }
        apply_texture_map(&mut slot.fragment, &map);
        slot.applied_sequence = request.sequence;
        true
    }

    pub fn texture_failed(&mut self, request: &TextureRequest, error: &anyhow::Error) {
        log::error!(
            "An error occurred while loading the texture {}: {:#}",
            request.url,
            error
        );
    }

    /// One frame's camera step; see [`FrameDriver::advance`].
    pub fn advance_frame(&mut self, camera: &mut Camera, controller: &mut OrbitController) -> bool {
        self.frame_driver.advance(camera, controller)
    }

    pub fn shutdown(&mut self) {
        self.frame_driver.stop();
    }
}
