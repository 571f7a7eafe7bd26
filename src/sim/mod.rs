//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host timestamps in; the wall clock is only read through
//!   `GameState::wall_clock` to stamp finished runs
//! - Seeded RNG only
//! - Stable iteration order (list order)
//! - No rendering or platform dependencies

pub mod behavior;
pub mod collision;
pub mod effects;
pub mod geometry;
pub mod player;
pub mod progression;
pub mod resource;
pub mod scene;
pub mod state;
pub mod tick;
pub mod timer;

pub use geometry::{Bounded, Rect, intersects, overlapping};
pub use resource::{Assets, ResourceHandle, Sprite, SpriteKey};
pub use scene::{SceneBlend, SceneDirector, TransitionStyle};
pub use state::{
    Bullet, BulletKind, Enemy, EnemyBullet, EnemyKind, Explosion, GameEvent, GameState, Player,
    PlayerAnim, PowerUp, PowerUpKind, Screen, ShieldImpact, Weapon,
};
pub use tick::{TickInput, tick};
pub use timer::{Countdown, FrameTimer};
