//! Galactic Defender - a vertical arcade shooter core
//!
//! Core modules:
//! - `sim`: Frame simulation (entities, collisions, enemy behavior, phases, scenes)
//! - `render`: Read-only snapshots and sprite instance buffers for a renderer
//! - `settings`: Data-driven tuning and scene definitions
//! - `highscores`: Run summaries and the high score table
//! - `error`: Startup configuration errors

pub mod error;
pub mod highscores;
pub mod render;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, Result};
pub use highscores::{RunHistory, RunSummary};
pub use settings::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 4.0;
    /// Distance from the bottom edge to the player's top at spawn
    pub const PLAYER_SPAWN_OFFSET: f32 = 80.0;
    pub const PLAYER_START_LIVES: u32 = 5;
    pub const PLAYER_MAX_LIVES: u32 = 9;
    /// Player sprite sheet frame duration (ms)
    pub const PLAYER_FRAME_MS: f32 = 120.0;

    /// Player projectiles
    pub const MAX_PLAYER_BULLETS: usize = 5;
    pub const BULLET_SPEED: f32 = 6.0;
    pub const MISSILE_SPEED: f32 = 7.0;

    /// Damage and scoring
    pub const MISSILE_BOSS_DAMAGE: i32 = 3;
    pub const SPLASH_RADIUS: f32 = 110.0;
    pub const SPLASH_DAMAGE: i32 = 1;
    pub const SCORE_HIT: u64 = 20;
    pub const SCORE_KILL: u64 = 100;
    pub const SCORE_BOSS_KILL: u64 = 1000;

    /// Phases
    pub const BOSS_PHASE: u32 = 9;
    pub const PHASE_COUNT: u32 = 10;
    pub const MAX_WAVE_SIZE: usize = 25;
    /// First phase that mixes random enemy sprites
    pub const MIXED_SPRITE_PHASE: u32 = 7;
    /// First phase where kills can drop power-ups
    pub const POWERUP_MIN_PHASE: u32 = 3;

    /// Normal enemies
    pub const ENEMY_BOX_W: f32 = 64.0;
    pub const ENEMY_BOX_H: f32 = 72.0;
    pub const ENEMY_STEP_DOWN: f32 = 10.0;
    pub const ENEMY_FRAME_MS: f32 = 250.0;

    /// Boss
    pub const BOSS_HEALTH: i32 = 60;
    pub const BOSS_SPEED: f32 = 1.2;
    pub const BOSS_SPAWN_Y: f32 = 60.0;
    pub const BOSS_SIDE_INSET: f32 = 40.0;
    pub const BOSS_BOB_BASE_Y: f32 = 50.0;
    pub const BOSS_BOB_AMPLITUDE: f32 = 25.0;
    pub const BOSS_FRAME_MS: f32 = 300.0;
    pub const BOSS_SHOT_INITIAL_MS: f32 = 1000.0;
    pub const BOSS_SHOT_MS: f32 = 400.0;
    pub const BOSS_FAN_INITIAL_MS: f32 = 2000.0;
    pub const BOSS_FAN_MS: f32 = 1800.0;
    pub const BOSS_FAN_SPREAD: f32 = 0.8;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 40.0;
    pub const POWERUP_DROP_CHANCE: f64 = 0.18;
    pub const POWERUP_DESPAWN_MARGIN: f32 = 60.0;
    pub const SHIELD_CHARGES: u32 = 2;
    pub const MISSILE_DURATION_MS: f32 = 10_000.0;

    /// Visual timers (ms per frame)
    pub const EXPLOSION_FRAME_MS: f32 = 60.0;
    pub const SHIELD_IMPACT_FRAME_MS: f32 = 55.0;
    pub const ENEMY_BULLET_FLICKER_MS: f64 = 120.0;

    /// Number of runs kept in the history
    pub const MAX_RUN_HISTORY: usize = 100;

    /// Layers a single scene may hold
    pub const MAX_SCENE_LAYERS: usize = 64;
}
