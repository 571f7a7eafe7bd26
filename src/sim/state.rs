//! Game state and core simulation types
//!
//! Everything a tick mutates lives in `GameState`. Entities are plain data;
//! behavior lives in the sibling modules.

use chrono::{DateTime, Utc};
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounded, Rect};
use super::progression;
use super::resource::{Assets, Sprite, SpriteKey};
use super::scene::{SceneDirector, TransitionStyle};
use super::timer::{Countdown, FrameTimer};
use crate::consts::*;
use crate::error::Result;
use crate::highscores::RunSummary;
use crate::settings::GameConfig;

/// Which screen the host is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Title screen, nothing simulates
    Start,
    /// Run history / ranking, nothing simulates
    History,
    /// Gameplay
    Playing,
}

/// Player weapon mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weapon {
    #[default]
    Normal,
    Missile,
}

/// Player animation row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerAnim {
    #[default]
    Idle,
    Run,
    Shoot,
}

impl PlayerAnim {
    /// Sprite sheet row, falling back to row 0 when the sheet is shorter
    pub fn row(self, rows: u32) -> u32 {
        let row = match self {
            PlayerAnim::Idle => 0,
            PlayerAnim::Run => 1,
            PlayerAnim::Shoot => 2,
        };
        if row >= rows { 0 } else { row }
    }
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub sprite: Sprite,
    /// Movement per tick
    pub speed: f32,
    pub lives: u32,
    /// Hits absorbed before lives are touched
    pub shield_hits: u32,
    pub weapon: Weapon,
    /// Time left on the special weapon (zero while normal)
    pub weapon_timer: Countdown,
    pub anim: PlayerAnim,
    /// Sprite sheet column
    pub anim_frames: FrameTimer,
}

impl Player {
    pub fn new(config: &GameConfig, assets: &Assets) -> Self {
        Self {
            pos: Vec2::new(
                config.arena_width / 2.0 - PLAYER_SIZE / 2.0,
                config.arena_height - PLAYER_SPAWN_OFFSET,
            ),
            sprite: Sprite::new(SpriteKey::Player, assets),
            speed: config.player_speed,
            lives: config.start_lives,
            shield_hits: 0,
            weapon: Weapon::Normal,
            weapon_timer: Countdown::default(),
            anim: PlayerAnim::Idle,
            anim_frames: FrameTimer::new(PLAYER_FRAME_MS),
        }
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.sprite.size,
        }
    }
}

/// Player projectile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletKind {
    Normal,
    /// Heavier hit on the boss plus splash damage
    Missile,
}

/// A player projectile, travelling upward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub sprite: Sprite,
    pub speed: f32,
    pub kind: BulletKind,
}

impl Bounded for Bullet {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.sprite.size,
        }
    }
}

/// Enemy variants with their own fire timers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal {
        /// Re-randomized after every shot
        fire: Countdown,
    },
    Boss {
        /// Fast single center shot
        shot: Countdown,
        /// Slower five-bullet fan
        fan: Countdown,
    },
}

/// An enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub sprite: Sprite,
    /// Horizontal movement per tick
    pub speed: f32,
    /// +1 moving right, -1 moving left
    pub dir: f32,
    pub health: i32,
    pub max_health: i32,
    /// Two-frame idle animation
    pub anim: FrameTimer,
}

impl Enemy {
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss { .. })
    }

    /// Apply damage, clamping at zero; returns true if destroyed
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.health = (self.health - damage).max(0);
        self.health == 0
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.sprite.size,
        }
    }
}

/// An enemy projectile, travelling downward with optional drift
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub sprite: Sprite,
    /// Downward movement per tick
    pub speed: f32,
    /// Sideways movement per tick (boss fan only)
    pub vx: f32,
}

impl Bounded for EnemyBullet {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.sprite.size,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// One extra life
    Life,
    /// Two shield charges
    Shield,
    /// Missile launcher for ten seconds
    Time,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Life, PowerUpKind::Shield, PowerUpKind::Time];
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    /// Fall per tick
    pub vy: f32,
    pub sprite: Sprite,
}

impl Bounded for PowerUp {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.sprite.size,
        }
    }
}

/// Transient explosion animation, positioned by its center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    pub scale: f32,
    pub anim: FrameTimer,
}

/// Flash drawn over the player when a shield charge absorbs a hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldImpact {
    pub active: bool,
    pub anim: FrameTimer,
}

impl Default for ShieldImpact {
    fn default() -> Self {
        Self {
            active: false,
            anim: FrameTimer::new(SHIELD_IMPACT_FRAME_MS),
        }
    }
}

impl ShieldImpact {
    pub fn trigger(&mut self) {
        self.active = true;
        self.anim.reset();
    }
}

/// Things that happened during a tick, for audio cues and persistence
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BulletFired(BulletKind),
    EnemyHit { boss: bool },
    EnemyDestroyed { boss: bool, at: Vec2 },
    /// Enemies finished off by missile splash (no reward)
    SplashKills(usize),
    PowerUpDropped(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    PlayerHit { lives_left: u32 },
    ShieldAbsorbed { charges_left: u32 },
    WeaponExpired,
    PhaseAdvanced { phase: u32 },
    SceneTransitionStarted {
        from: usize,
        to: usize,
        style: TransitionStyle,
    },
    SceneChanged { scene: usize },
    Victory,
    GameOver,
    /// Terminal state reached; hand to the persistence collaborator
    RunFinished(RunSummary),
    Reset,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed
    pub seed: u64,
    pub rng: Pcg32,
    /// Sprite handles (kept across resets)
    pub assets: Assets,
    pub screen: Screen,
    pub paused: bool,
    pub game_over: bool,
    /// Boss defeated; phase advancement stops
    pub victory: bool,
    /// Current phase index, 0..=BOSS_PHASE
    pub phase: u32,
    /// Highest phase reached this run, 1-based
    pub highest_phase: u32,
    pub score: u64,
    pub high_score: u64,
    /// Accumulated simulated time (ms)
    pub time_ms: f64,
    /// Host timestamp of the previous tick; `None` right after a reset
    pub last_frame_ms: Option<f64>,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub power_ups: Vec<PowerUp>,
    pub explosions: Vec<Explosion>,
    pub shield_impact: ShieldImpact,
    pub scenes: SceneDirector,
    /// Run summary already emitted for this run
    pub run_recorded: bool,
    /// Events from the latest tick
    pub events: Vec<GameEvent>,
    /// Stamps finished runs; the only wall-clock read in the simulation
    pub wall_clock: fn() -> DateTime<Utc>,
    next_id: u32,
}

impl GameState {
    /// Create a new game on the start screen; fails on invalid configuration
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let assets = Assets::new();
        let scenes = SceneDirector::new(&config);
        let player = Player::new(&config, &assets);

        let mut state = Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            assets,
            screen: Screen::Start,
            paused: false,
            game_over: false,
            victory: false,
            phase: 0,
            highest_phase: 1,
            score: 0,
            high_score: 0,
            time_ms: 0.0,
            last_frame_ms: None,
            player,
            bullets: Vec::new(),
            enemies: Vec::new(),
            enemy_bullets: Vec::new(),
            power_ups: Vec::new(),
            explosions: Vec::new(),
            shield_impact: ShieldImpact::default(),
            scenes,
            run_recorded: false,
            events: Vec::new(),
            wall_clock: Utc::now,
            next_id: 1,
        };

        // Spawn the first wave right away so an empty frame never advances the phase
        progression::spawn_wave(&mut state);

        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Leave the menus and begin a fresh run
    pub fn start_run(&mut self) {
        self.screen = Screen::Playing;
        self.reset();
    }

    /// Reinitialize every piece of run state. High score and assets survive.
    pub fn reset(&mut self) {
        self.game_over = false;
        self.victory = false;
        self.paused = false;
        self.run_recorded = false;
        self.phase = 0;
        self.highest_phase = 1;
        self.score = 0;
        self.time_ms = 0.0;
        self.last_frame_ms = None;
        self.player = Player::new(&self.config, &self.assets);
        self.bullets.clear();
        self.enemies.clear();
        self.enemy_bullets.clear();
        self.power_ups.clear();
        self.explosions.clear();
        self.shield_impact = ShieldImpact::default();
        self.scenes.reset();
        progression::spawn_wave(self);
        self.events.push(GameEvent::Reset);
        log::info!("Game reset (high score {})", self.high_score);
    }

    /// Add points and keep the high score in step
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    pub fn spawn_explosion(&mut self, center: Vec2, scale: f32) {
        self.explosions.push(Explosion {
            center,
            scale,
            anim: FrameTimer::new(EXPLOSION_FRAME_MS),
        });
    }

    /// Live boss, if any
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }

    /// True while the simulation should advance
    pub fn is_simulating(&self) -> bool {
        self.screen == Screen::Playing && !self.paused && !self.game_over
    }

    /// Take the events produced by the latest tick
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Resolve entity boxes whose sprites finished loading
    pub fn sync_sprites(&mut self) {
        let assets = &self.assets;
        self.player.sprite.resolve(assets);
        for b in &mut self.bullets {
            b.sprite.resolve(assets);
        }
        for e in &mut self.enemies {
            e.sprite.resolve(assets);
        }
        for b in &mut self.enemy_bullets {
            b.sprite.resolve(assets);
        }
        for p in &mut self.power_ups {
            p.sprite.resolve(assets);
        }
    }
}
