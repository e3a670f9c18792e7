//! The per-frame camera step.

use crate::camera::{Camera, OrbitController};

/// Drives the camera once per displayed frame.
///
/// The showroom starts its driver on creation and it keeps running until
/// [`stop`](FrameDriver::stop) is called on shutdown. While stopped the event
/// loop does not request redraws.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    running: bool,
    floor: f32,
    frames: u64,
}

impl FrameDriver {
    pub fn new(floor: f32) -> Self {
        Self {
            running: false,
            floor,
            frames: 0,
        }
    }

    /// Returns `true` only for the call that actually started the driver.
    pub fn start(&mut self) -> bool {
        let started = !self.running;
        self.running = true;
        started
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance the orbit controls and keep the camera above the floor.
    ///
    /// Returns `false` without touching the camera when the driver is stopped.
    pub fn advance(&mut self, camera: &mut Camera, controller: &mut OrbitController) -> bool {
        if !self.running {
            return false;
        }
        controller.update(camera);
        if camera.position.y < self.floor {
            camera.position.y = self.floor;
        }
        self.frames += 1;
        true
    }
}
