//! Game configuration
//!
//! Tuning values and background scene definitions. Loaded once at startup
//! from JSON; validation happens here so the simulation never sees a
//! malformed scene.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, Result};
use crate::sim::scene::TransitionStyle;

/// Number of scenes the phase bands refer to (waves, late waves, boss)
pub const REQUIRED_SCENES: usize = 3;

/// One parallax layer of a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerDef {
    /// Full-arena background scaled to cover, scrolling downward and wrapping
    Scrolling {
        asset: String,
        /// Scroll speed in units per second
        speed: f32,
    },
    /// Decorative prop placed at a relative anchor, optionally rotating
    Sprite {
        asset: String,
        #[serde(default = "default_sprite_scale")]
        scale: f32,
        #[serde(default = "default_anchor_x")]
        anchor_x: f32,
        #[serde(default = "default_anchor_y")]
        anchor_y: f32,
        /// Radians per second
        #[serde(default)]
        rotation_speed: f32,
    },
}

fn default_sprite_scale() -> f32 {
    0.35
}

fn default_anchor_x() -> f32 {
    0.5
}

fn default_anchor_y() -> f32 {
    0.3
}

impl LayerDef {
    pub fn asset(&self) -> &str {
        match self {
            LayerDef::Scrolling { asset, .. } | LayerDef::Sprite { asset, .. } => asset,
        }
    }

    fn scrolling(asset: &str, speed: f32) -> Self {
        LayerDef::Scrolling {
            asset: asset.to_string(),
            speed,
        }
    }

    fn prop(asset: &str, scale: f32, anchor_x: f32, anchor_y: f32) -> Self {
        LayerDef::Sprite {
            asset: asset.to_string(),
            scale,
            anchor_x,
            anchor_y,
            rotation_speed: 0.0,
        }
    }
}

/// A named set of layers drawn behind a band of phases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    pub name: String,
    /// How this scene is revealed when it becomes the crossfade target
    #[serde(default)]
    pub entry: TransitionStyle,
    pub layers: Vec<LayerDef>,
}

/// Game tuning and scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    /// Player movement per tick
    pub player_speed: f32,
    pub start_lives: u32,
    /// Crossfade duration between scenes (ms)
    pub crossfade_ms: f32,
    /// Scenes in band order: phases 0-4, phases 5-8, boss
    pub scenes: Vec<SceneDef>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            player_speed: PLAYER_SPEED,
            start_lives: PLAYER_START_LIVES,
            crossfade_ms: 1000.0,
            scenes: vec![
                SceneDef {
                    name: "deep-space".to_string(),
                    entry: TransitionStyle::CrossDissolve,
                    layers: vec![
                        LayerDef::scrolling("assets/space.png", 10.0),
                        LayerDef::scrolling("assets/clouds.png", 60.0),
                        LayerDef::scrolling("assets/stars.png", 25.0),
                    ],
                },
                SceneDef {
                    name: "blue-nebula".to_string(),
                    entry: TransitionStyle::CrossDissolve,
                    layers: vec![
                        LayerDef::scrolling("assets/blue-back.png", 5.0),
                        LayerDef::scrolling("assets/blue-stars.png", 12.0),
                        LayerDef::prop("assets/prop-small.png", 1.5, 0.8, 0.2),
                        LayerDef::prop("assets/planet-big.png", 1.0, 0.62, 0.18),
                        LayerDef::prop("assets/planet-big.png", 1.2, 0.18, 0.32),
                        LayerDef::prop("assets/planet-big.png", 1.1, 0.8, 0.45),
                        LayerDef::prop("assets/planet-big.png", 1.0, 0.35, 0.15),
                    ],
                },
                SceneDef {
                    name: "boss-sector".to_string(),
                    entry: TransitionStyle::Reveal,
                    layers: vec![
                        LayerDef::scrolling("assets/brown-back.png", 20.0),
                        LayerDef::scrolling("assets/brown-stars.png", 15.0),
                        LayerDef::scrolling("assets/brown-far-planet.png", 30.0),
                        LayerDef::prop("assets/ring-planet.png", 1.5, 0.3, 0.6),
                        LayerDef::prop("assets/brown-big-planet.png", 1.5, 0.7, 0.4),
                        LayerDef::prop("assets/asteroid.png", 1.5, 0.5, 0.3),
                        LayerDef::prop("assets/asteroid-2.png", 1.5, 0.8, 0.2),
                    ],
                },
            ],
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "Loaded configuration: {}x{} arena, {} scenes",
            config.arena_width,
            config.arena_height,
            config.scenes.len()
        );
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            log::warn!("Failed to serialize configuration: {e}");
            String::new()
        })
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<()> {
        let arena_ok = |v: f32| v.is_finite() && v > 0.0;
        if !arena_ok(self.arena_width) || !arena_ok(self.arena_height) {
            return Err(ConfigError::InvalidArena {
                width: self.arena_width,
                height: self.arena_height,
            });
        }
        if !self.player_speed.is_finite() || self.player_speed <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "player_speed",
                value: self.player_speed,
            });
        }
        if self.start_lives == 0 || self.start_lives > PLAYER_MAX_LIVES {
            return Err(ConfigError::InvalidValue {
                field: "start_lives",
                value: self.start_lives as f32,
            });
        }
        if !self.crossfade_ms.is_finite() || self.crossfade_ms <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "crossfade_ms",
                value: self.crossfade_ms,
            });
        }
        if self.scenes.len() < REQUIRED_SCENES {
            return Err(ConfigError::MissingScenes {
                needed: REQUIRED_SCENES,
                found: self.scenes.len(),
            });
        }

        let mut names = HashSet::new();
        for scene in &self.scenes {
            if !names.insert(scene.name.as_str()) {
                return Err(ConfigError::DuplicateScene(scene.name.clone()));
            }
            if scene.layers.is_empty() {
                return Err(ConfigError::EmptyScene(scene.name.clone()));
            }
            if scene.layers.len() > MAX_SCENE_LAYERS {
                return Err(ConfigError::TooManyLayers {
                    scene: scene.name.clone(),
                    count: scene.layers.len(),
                    max: MAX_SCENE_LAYERS,
                });
            }
            for (index, layer) in scene.layers.iter().enumerate() {
                if let Some(reason) = layer_problem(layer) {
                    return Err(ConfigError::InvalidLayer {
                        scene: scene.name.clone(),
                        layer: index,
                        reason,
                    });
                }
            }
        }
        Ok(())
    }
}

fn layer_problem(layer: &LayerDef) -> Option<String> {
    if layer.asset().trim().is_empty() {
        return Some("empty asset path".to_string());
    }
    match *layer {
        LayerDef::Scrolling { speed, .. } => {
            if !speed.is_finite() || speed < 0.0 {
                return Some(format!("scroll speed {speed} must be finite and >= 0"));
            }
        }
        LayerDef::Sprite {
            scale,
            anchor_x,
            anchor_y,
            rotation_speed,
            ..
        } => {
            if !rotation_speed.is_finite() {
                return Some("rotation speed must be finite".to_string());
            }
            if !scale.is_finite() || scale <= 0.0 {
                return Some(format!("scale {scale} must be > 0"));
            }
            if !(0.0..=1.0).contains(&anchor_x) || !(0.0..=1.0).contains(&anchor_y) {
                return Some(format!("anchor ({anchor_x}, {anchor_y}) outside 0..1"));
            }
        }
    }
    None
}
