//! Read-only view of a game state for the rendering sink

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::sim::geometry::{Bounded, Rect};
use crate::sim::resource::{Sprite, SpriteKey};
use crate::sim::scene::{LayerPlacement, SceneBlend};
use crate::sim::state::{GameState, Screen, Weapon};

/// A sprite frame positioned in arena space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpriteView {
    pub key: SpriteKey,
    pub rect: Rect,
    /// Sheet column
    pub frame: u32,
    /// Sheet row (player sheet only)
    pub row: u32,
    pub alpha: f32,
    /// False while the image is loading; the sink skips these
    pub ready: bool,
}

impl SpriteView {
    fn of(sprite: &Sprite, pos: Vec2, frame: u32) -> Self {
        Self {
            key: sprite.key,
            rect: Rect {
                pos,
                size: sprite.size,
            },
            frame,
            row: 0,
            alpha: 1.0,
            ready: sprite.drawable(),
        }
    }

    /// View centered on `center` with an explicit size
    fn centered(key: SpriteKey, center: Vec2, size: Vec2, frame: u32, ready: bool) -> Self {
        Self {
            key,
            rect: Rect {
                pos: center - size / 2.0,
                size,
            },
            frame,
            row: 0,
            alpha: 1.0,
            ready: ready && size.x > 0.0 && size.y > 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyView {
    pub sprite: SpriteView,
    pub boss: bool,
    pub health: i32,
    pub max_health: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub sprite: SpriteView,
    /// Pulsing aura while shield charges remain
    pub aura: Option<SpriteView>,
    /// Impact flash after a shield absorbs a hit
    pub impact: Option<SpriteView>,
}

/// Background scenes and how to blend them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    pub blend: SceneBlend,
    pub current: Vec<LayerPlacement>,
    pub next: Vec<LayerPlacement>,
}

/// Numbers the overlay shows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    /// 1-based
    pub phase: u32,
    pub enemies: usize,
    pub score: u64,
    pub high_score: u64,
    pub lives: u32,
    pub shield_charges: u32,
    /// Missile time left, whole seconds rounded up
    pub weapon_seconds: Option<u32>,
    /// Boss health bar: (bar rect at full health, fill fraction)
    pub boss_bar: Option<(Rect, f32)>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub screen: Screen,
    pub paused: bool,
    pub game_over: bool,
    pub victory: bool,
    pub scene: SceneView,
    pub player: PlayerView,
    pub bullets: Vec<SpriteView>,
    pub enemies: Vec<EnemyView>,
    pub enemy_bullets: Vec<SpriteView>,
    pub power_ups: Vec<SpriteView>,
    pub explosions: Vec<SpriteView>,
    pub hud: Hud,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            screen: state.screen,
            paused: state.paused,
            game_over: state.game_over,
            victory: state.victory,
            scene: capture_scene(state),
            player: capture_player(state),
            bullets: state
                .bullets
                .iter()
                .map(|b| SpriteView::of(&b.sprite, b.pos, 0))
                .collect(),
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    sprite: SpriteView::of(&e.sprite, e.pos, e.anim.frame),
                    boss: e.is_boss(),
                    health: e.health,
                    max_health: e.max_health,
                })
                .collect(),
            enemy_bullets: {
                let flicker = enemy_bullet_frame(state.time_ms);
                state
                    .enemy_bullets
                    .iter()
                    .map(|b| SpriteView::of(&b.sprite, b.pos, flicker))
                    .collect()
            },
            power_ups: state
                .power_ups
                .iter()
                .map(|p| SpriteView::of(&p.sprite, p.pos, 0))
                .collect(),
            explosions: capture_explosions(state),
            hud: capture_hud(state),
        }
    }
}

/// Two-frame flicker shared by every enemy bullet
pub fn enemy_bullet_frame(time_ms: f64) -> u32 {
    ((time_ms / ENEMY_BULLET_FLICKER_MS).floor() as u64 % 2) as u32
}

fn capture_scene(state: &GameState) -> SceneView {
    let scenes = &state.scenes;
    let arena = scenes.arena();
    let blend = scenes.blend();
    let placements = |index: Option<usize>| -> Vec<LayerPlacement> {
        index
            .and_then(|i| scenes.scene(i))
            .map(|scene| {
                scene
                    .layers
                    .iter()
                    .filter_map(|l| l.placement(arena))
                    .collect()
            })
            .unwrap_or_default()
    };
    SceneView {
        blend,
        current: placements(Some(blend.current)),
        next: placements(blend.next),
    }
}

fn capture_player(state: &GameState) -> PlayerView {
    let player = &state.player;
    let (_, rows) = state.assets.player_sheet();
    let mut sprite = SpriteView::of(&player.sprite, player.pos, player.anim_frames.frame);
    sprite.row = player.anim.row(rows);

    let center = player.center();
    let size = player.sprite.size;

    let aura = (player.shield_hits > 0).then(|| {
        let pulse = 0.8 + 0.05 * (state.time_ms * 0.005).sin() as f32;
        let mut view = SpriteView::centered(
            SpriteKey::ShieldAura,
            center,
            Vec2::new(size.x * 2.2, size.y * 1.6) * pulse,
            0,
            state.assets.is_ready(SpriteKey::ShieldAura),
        );
        view.alpha = 0.65;
        view
    });

    let impact = state.shield_impact.active.then(|| {
        let mut view = SpriteView::centered(
            SpriteKey::ShieldImpact,
            center,
            Vec2::new(size.x * 2.3, size.y * 2.3 * 0.9),
            state.shield_impact.anim.frame,
            state.assets.is_ready(SpriteKey::ShieldImpact),
        );
        view.alpha = 0.85;
        view
    });

    PlayerView {
        sprite,
        aura,
        impact,
    }
}

fn capture_explosions(state: &GameState) -> Vec<SpriteView> {
    let frame_size = state
        .assets
        .size_of(SpriteKey::Explosion)
        .map_or(0.0, |s| s.y);
    state
        .explosions
        .iter()
        .map(|e| {
            SpriteView::centered(
                SpriteKey::Explosion,
                e.center,
                Vec2::splat(frame_size * e.scale),
                e.anim.frame,
                frame_size > 0.0,
            )
        })
        .collect()
}

fn capture_hud(state: &GameState) -> Hud {
    let player = &state.player;
    let weapon_seconds = (player.weapon == Weapon::Missile)
        .then(|| (player.weapon_timer.remaining() / 1000.0).ceil() as u32);
    let boss_bar = state.boss().map(|boss| {
        let bounds = boss.bounds();
        let fill = boss.health.max(0) as f32 / boss.max_health.max(1) as f32;
        (
            Rect::new(bounds.pos.x, bounds.pos.y - 12.0, bounds.size.x, 6.0),
            fill,
        )
    });

    Hud {
        phase: state.phase + 1,
        enemies: state.enemies.len(),
        score: state.score,
        high_score: state.high_score,
        lives: player.lives,
        shield_charges: player.shield_hits,
        weapon_seconds,
        boss_bar,
    }
}
