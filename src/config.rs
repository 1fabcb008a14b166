//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`STAR_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use starscape_core::RangeSpec;
use starscape_render::{PostChain, PostEffect};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub postprocessing: PostProcessingConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`STAR_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Optional local overrides
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // STAR_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("STAR_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Starscape".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position [x, y, z]
    pub position: [f32; 3],
    /// Point the camera orbits [x, y, z]
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Radians of orbit per pixel dragged
    pub orbit_sensitivity: f32,
    /// Distance change per scroll line
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Idle orbit speed in radians per second (0 disables)
    pub auto_rotate: f32,
    /// Pixels the pointer may move during a click before it becomes a drag
    pub drag_threshold: f64,
    /// Smooth drag input
    pub smoothing: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 10.0],
            target: [0.0, 0.0, 0.0],
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 1.0,
            min_distance: 3.0,
            max_distance: 60.0,
            auto_rotate: 0.0,
            drag_threshold: 4.0,
            smoothing: false,
        }
    }
}

/// Scene construction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for procedural generation; unset draws from OS entropy
    pub seed: Option<u64>,
    pub asteroid_count: usize,
    pub wormhole_ring_count: usize,
    pub star_count: usize,
    /// Surface texture of the moon
    pub moon_texture: PathBuf,
    /// Optional RON scene template used instead of the built-in scene
    pub path: Option<PathBuf>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            asteroid_count: 60,
            wormhole_ring_count: 10,
            star_count: 5000,
            moon_texture: PathBuf::from("assets/moon.png"),
            path: None,
        }
    }
}

/// Animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Fraction of the remaining scale change the panel covers per 60 Hz frame
    pub panel_damping: f32,
    /// Scale panel damping by elapsed time instead of applying it once per frame
    pub frame_rate_independent_damping: bool,
    /// Longest frame step fed to the animators, in seconds
    pub max_frame_dt: f32,
    /// Pulse angular speed while idle
    pub pulse_idle_speed: f32,
    /// Pulse angular speed while hovered
    pub pulse_hover_speed: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            panel_damping: 0.1,
            frame_rate_independent_damping: true,
            max_frame_dt: 0.25,
            pulse_idle_speed: 2.0,
            pulse_hover_speed: 5.0,
        }
    }
}

/// The starfield speed control
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub speed_min: f32,
    pub speed_max: f32,
    pub speed_step: f32,
    pub speed_default: f32,
    /// Show the control panel at startup
    pub panel_expanded: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        let spec = RangeSpec::default();
        Self {
            speed_min: spec.min,
            speed_max: spec.max,
            speed_step: spec.step,
            speed_default: spec.default,
            panel_expanded: false,
        }
    }
}

impl ControlsConfig {
    pub fn speed_spec(&self) -> RangeSpec {
        RangeSpec {
            min: self.speed_min,
            max: self.speed_max,
            step: self.speed_step,
            default: self.speed_default,
        }
    }
}

/// Bloom parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub enabled: bool,
    pub threshold: f32,
    pub smoothing: f32,
    pub intensity: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.2,
            smoothing: 0.9,
            intensity: 1.5,
        }
    }
}

/// Film grain parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub enabled: bool,
    pub opacity: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            opacity: 0.02,
        }
    }
}

/// Vignette parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteConfig {
    pub enabled: bool,
    pub darkness: f32,
    pub offset: f32,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            darkness: 1.1,
            offset: 0.1,
        }
    }
}

/// Depth-of-field parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthOfFieldConfig {
    pub enabled: bool,
    pub focus_distance: f32,
    pub focal_length: f32,
    pub bokeh_scale: f32,
}

impl Default for DepthOfFieldConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            focus_distance: 0.0,
            focal_length: 0.02,
            bokeh_scale: 2.0,
        }
    }
}

/// Post-processing stack configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessingConfig {
    pub bloom: BloomConfig,
    pub noise: NoiseConfig,
    pub vignette: VignetteConfig,
    pub depth_of_field: DepthOfFieldConfig,
    /// Background colour of the scene [r, g, b]
    pub background_color: [f32; 3],
}

impl PostProcessingConfig {
    /// The effect stack for the enabled effects
    pub fn chain(&self) -> PostChain {
        let mut effects = Vec::new();
        if self.bloom.enabled {
            effects.push(PostEffect::Bloom {
                threshold: self.bloom.threshold,
                smoothing: self.bloom.smoothing,
                intensity: self.bloom.intensity,
            });
        }
        if self.noise.enabled {
            effects.push(PostEffect::Noise { opacity: self.noise.opacity });
        }
        if self.vignette.enabled {
            effects.push(PostEffect::Vignette {
                darkness: self.vignette.darkness,
                offset: self.vignette.offset,
            });
        }
        if self.depth_of_field.enabled {
            effects.push(PostEffect::DepthOfField {
                focus_distance: self.depth_of_field.focus_distance,
                focal_length: self.depth_of_field.focal_length,
                bokeh_scale: self.depth_of_field.bokeh_scale,
            });
        }
        PostChain::new(effects)
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace); `RUST_LOG` takes precedence
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.controls.speed_spec(), RangeSpec::default());
        assert!(config.animation.frame_rate_independent_damping);
        assert_eq!(config.scene.seed, None);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("panel_damping"));
        assert!(toml.contains("[postprocessing.bloom]"));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: AppConfig = toml::from_str("[window]\ntitle = \"Custom\"\n").unwrap();
        assert_eq!(config.window.title, "Custom");
        assert_eq!(config.window.height, 720);
    }

    #[test]
    fn test_default_chain_has_all_effects_in_order() {
        let chain = PostProcessingConfig::default().chain();
        let names: Vec<&str> = chain.effects().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["bloom", "noise", "vignette", "depth of field"]);
    }

    #[test]
    fn test_disabled_effect_left_out() {
        let mut post = PostProcessingConfig::default();
        post.noise.enabled = false;
        post.bloom.enabled = false;
        let chain = post.chain();
        assert_eq!(chain.effects().len(), 2);
        assert_eq!(chain.effects()[0].name(), "vignette");
    }
}
