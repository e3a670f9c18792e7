//! Viewer configuration.
//!
//! Every field has a default matching the stock showroom page, so an empty or
//! missing configuration file yields the standard viewer.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::showroom::framing::FramingTable;
use crate::showroom::style::{Rgb, SwatchStyle};

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_ENV: &str = "SHOWROOM_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_models")]
    pub models: Vec<ModelSource>,
    #[serde(default)]
    pub framing: FramingTable,
    /// Variant selected once the page settles.
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_selection_delay_ms")]
    pub default_selection_delay_ms: u64,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub orbit: OrbitConfig,
    #[serde(default)]
    pub light: LightConfig,
    /// Swatches bound to the digit keys on native builds.
    #[serde(default = "default_swatches")]
    pub swatches: Vec<SwatchStyle>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            models: default_models(),
            framing: FramingTable::default(),
            default_model: default_model(),
            default_selection_delay_ms: default_selection_delay_ms(),
            scene: SceneConfig::default(),
            camera: CameraConfig::default(),
            orbit: OrbitConfig::default(),
            light: LightConfig::default(),
            swatches: default_swatches(),
        }
    }
}

impl ViewerConfig {
    pub fn enabled_models(&self) -> impl Iterator<Item = &ModelSource> {
        self.models.iter().filter(|m| m.enabled)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from the file named by `SHOWROOM_CONFIG`, or fall back to defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from(std::path::Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Result<Self> {
        Ok(Self::default())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        use anyhow::Context;

        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config = Self::from_toml(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            log::info!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            log::info!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }
}

/// A model variant and where to fetch it from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSource {
    pub name: String,
    pub url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ModelSource {
    fn remote(name: &str, enabled: bool) -> Self {
        Self {
            name: name.to_string(),
            url: format!("https://hadi-rgb.github.io/viewerbucket/models/{name}.glb"),
            enabled,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_background")]
    pub background: Rgb,
    #[serde(default = "default_ground_colour")]
    pub ground_colour: Rgb,
    #[serde(default = "default_ground_size")]
    pub ground_size: f32,
    /// Lowest height the camera may reach.
    #[serde(default = "default_floor")]
    pub floor: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: default_background(),
            ground_colour: default_ground_colour(),
            ground_size: default_ground_size(),
            floor: default_floor(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fovy")]
    pub fovy: f32,
    #[serde(default = "default_znear")]
    pub znear: f32,
    #[serde(default = "default_zfar")]
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            fovy: default_fovy(),
            znear: default_znear(),
            zfar: default_zfar(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitConfig {
    #[serde(default = "default_rotate_speed")]
    pub rotate_speed: f32,
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
    #[serde(default)]
    pub damping: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            rotate_speed: default_rotate_speed(),
            zoom_speed: default_zoom_speed(),
            damping: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightConfig {
    /// Direction the light arrives from.
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_light_colour")]
    pub colour: Rgb,
    #[serde(default = "default_light_intensity")]
    pub intensity: f32,
    #[serde(default = "default_ambient")]
    pub ambient: Rgb,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            colour: default_light_colour(),
            intensity: default_light_intensity(),
            ambient: default_ambient(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_models() -> Vec<ModelSource> {
    vec![
        ModelSource::remote("mclaren", true),
        ModelSource::remote("mercedes", false),
        ModelSource::remote("porsche", true),
    ]
}

fn default_model() -> String {
    "mclaren".to_string()
}

fn default_selection_delay_ms() -> u64 {
    1000
}

fn default_background() -> Rgb {
    Rgb::from_hex(0x63c5da)
}

fn default_ground_colour() -> Rgb {
    Rgb::from_hex(0x9897a8)
}

fn default_ground_size() -> f32 {
    1000.0
}

fn default_floor() -> f32 {
    1.0
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 5.0, 10.0]
}

fn default_fovy() -> f32 {
    75.0
}

fn default_znear() -> f32 {
    0.1
}

fn default_zfar() -> f32 {
    1000.0
}

fn default_rotate_speed() -> f32 {
    0.005
}

fn default_zoom_speed() -> f32 {
    1.0
}

fn default_light_direction() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

fn default_light_colour() -> Rgb {
    Rgb::WHITE
}

fn default_light_intensity() -> f32 {
    2.0
}

fn default_ambient() -> Rgb {
    Rgb::from_hex(0x404040)
}

fn default_swatches() -> Vec<SwatchStyle> {
    ["#ff0000", "#1b1b1b", "#f5f5f5", "#ffb400", "#0047ab", "#2e8b57"]
        .into_iter()
        .map(SwatchStyle::color)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_page() {
        let config = ViewerConfig::default();
        let enabled: Vec<_> = config.enabled_models().map(|m| m.name.as_str()).collect();
        assert_eq!(enabled, ["mclaren", "porsche"]);
        assert_eq!(
            config.models[0].url,
            "https://hadi-rgb.github.io/viewerbucket/models/mclaren.glb"
        );
        assert_eq!(config.default_model, "mclaren");
        assert_eq!(config.default_selection_delay_ms, 1000);
        assert_eq!(config.scene.background, Rgb::from_hex(0x63c5da));
        assert_eq!(config.light.ambient, Rgb::from_hex(0x404040));
        assert_eq!(config.scene.floor, 1.0);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = ViewerConfig::from_toml("").unwrap();
        assert_eq!(config.models, ViewerConfig::default().models);
        assert_eq!(config.framing, FramingTable::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let config = ViewerConfig::from_toml(
            r##"
            default_model = "porsche"

            [scene]
            background = "#000000"

            [[models]]
            name = "porsche"
            url = "models/porsche.glb"
            "##,
        )
        .unwrap();
        assert_eq!(config.default_model, "porsche");
        assert_eq!(config.scene.background, Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(config.scene.ground_size, 1000.0);
        assert_eq!(config.models.len(), 1);
        assert!(config.models[0].enabled);
    }

    #[test]
    fn bad_colour_is_an_error() {
        assert!(ViewerConfig::from_toml("[scene]\nbackground = \"nope\"").is_err());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn missing_file_gives_defaults() {
        let config =
            ViewerConfig::load_from(std::path::Path::new("/nonexistent/showroom.toml")).unwrap();
        assert_eq!(config.default_model, "mclaren");
    }
}
