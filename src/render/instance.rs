//! Sprite instance buffer for GPU upload

use bytemuck::{Pod, Zeroable};

use super::snapshot::{RenderSnapshot, SpriteView};
use crate::sim::resource::SpriteKey;
use crate::sim::scene::LayerPlacement;
use crate::sim::state::PowerUpKind;

/// One textured quad
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    /// Sheet cell (column, row)
    pub frame: [u32; 2],
    /// Texture id, see `sprite_id`
    pub texture: u32,
    pub alpha: f32,
    /// Rotation about the quad center (radians)
    pub angle: f32,
}

impl SpriteInstance {
    pub const fn new(position: [f32; 2], size: [f32; 2], texture: u32, alpha: f32) -> Self {
        Self {
            position,
            size,
            frame: [0, 0],
            texture,
            alpha,
            angle: 0.0,
        }
    }

    fn from_view(view: &SpriteView) -> Self {
        Self {
            position: view.rect.pos.to_array(),
            size: view.rect.size.to_array(),
            frame: [view.frame, view.row],
            texture: sprite_id(view.key),
            alpha: view.alpha,
            angle: 0.0,
        }
    }
}

/// Texture ids
pub mod textures {
    /// Solid black, used for fade overlays
    pub const BLACK: u32 = 0;
    pub const PLAYER: u32 = 1;
    pub const PLAYER_BULLET: u32 = 2;
    pub const MISSILE: u32 = 3;
    pub const ENEMY_BULLET: u32 = 4;
    /// Normal enemies occupy ENEMY_BASE..ENEMY_BASE + ENEMY_SPRITE_COUNT
    pub const ENEMY_BASE: u32 = 10;
    pub const BOSS: u32 = 20;
    pub const POWERUP_LIFE: u32 = 30;
    pub const POWERUP_SHIELD: u32 = 31;
    pub const POWERUP_TIME: u32 = 32;
    pub const EXPLOSION: u32 = 40;
    pub const SHIELD_IMPACT: u32 = 41;
    pub const SHIELD_AURA: u32 = 42;
    /// Scene layers: LAYER_BASE + scene * LAYERS_PER_SCENE + layer
    pub const LAYER_BASE: u32 = 1000;
    pub const LAYERS_PER_SCENE: u32 = crate::consts::MAX_SCENE_LAYERS as u32;
    /// Health bar fill
    pub const BAR_FILL: u32 = 2000;
    pub const BAR_BACK: u32 = 2001;
}

pub fn sprite_id(key: SpriteKey) -> u32 {
    use textures::*;
    match key {
        SpriteKey::Player => PLAYER,
        SpriteKey::PlayerBullet => PLAYER_BULLET,
        SpriteKey::Missile => MISSILE,
        SpriteKey::EnemyBullet => ENEMY_BULLET,
        SpriteKey::Enemy(i) => ENEMY_BASE + u32::from(i),
        SpriteKey::Boss => BOSS,
        SpriteKey::PowerUp(PowerUpKind::Life) => POWERUP_LIFE,
        SpriteKey::PowerUp(PowerUpKind::Shield) => POWERUP_SHIELD,
        SpriteKey::PowerUp(PowerUpKind::Time) => POWERUP_TIME,
        SpriteKey::Explosion => EXPLOSION,
        SpriteKey::ShieldImpact => SHIELD_IMPACT,
        SpriteKey::ShieldAura => SHIELD_AURA,
    }
}

pub fn layer_id(scene: usize, layer: usize) -> u32 {
    textures::LAYER_BASE + scene as u32 * textures::LAYERS_PER_SCENE + layer as u32
}

fn push_layers(out: &mut Vec<SpriteInstance>, scene: usize, layers: &[LayerPlacement], alpha: f32) {
    for (i, placement) in layers.iter().enumerate() {
        let texture = layer_id(scene, i);
        match *placement {
            LayerPlacement::Tiled { upper, lower } => {
                for rect in [upper, lower] {
                    out.push(SpriteInstance::new(
                        rect.pos.to_array(),
                        rect.size.to_array(),
                        texture,
                        alpha,
                    ));
                }
            }
            LayerPlacement::Prop { rect, angle } => {
                let mut instance =
                    SpriteInstance::new(rect.pos.to_array(), rect.size.to_array(), texture, alpha);
                instance.angle = angle;
                out.push(instance);
            }
        }
    }
}

fn push_view(out: &mut Vec<SpriteInstance>, view: &SpriteView) {
    if view.ready {
        out.push(SpriteInstance::from_view(view));
    }
}

/// Flatten a snapshot into draw order, back to front. Loading sprites are skipped.
pub fn sprite_instances(snapshot: &RenderSnapshot, arena: [f32; 2]) -> Vec<SpriteInstance> {
    let mut out = Vec::new();
    let scene = &snapshot.scene;
    let blend = scene.blend;

    push_layers(&mut out, blend.current, &scene.current, 1.0);
    if blend.darken > 0.0 {
        out.push(SpriteInstance::new([0.0, 0.0], arena, textures::BLACK, blend.darken));
    }
    if let Some(next) = blend.next {
        if blend.black > 0.0 {
            out.push(SpriteInstance::new([0.0, 0.0], arena, textures::BLACK, blend.black));
        }
        if blend.next_alpha > 0.0 {
            push_layers(&mut out, next, &scene.next, blend.next_alpha);
        }
    }

    let player = &snapshot.player;
    push_view(&mut out, &player.sprite);
    if let Some(aura) = &player.aura {
        push_view(&mut out, aura);
    }
    for b in &snapshot.bullets {
        push_view(&mut out, b);
    }
    if let Some(impact) = &player.impact {
        push_view(&mut out, impact);
    }
    for e in &snapshot.enemies {
        push_view(&mut out, &e.sprite);
    }
    if let Some((bar, fill)) = snapshot.hud.boss_bar {
        out.push(SpriteInstance::new(
            bar.pos.to_array(),
            bar.size.to_array(),
            textures::BAR_BACK,
            1.0,
        ));
        out.push(SpriteInstance::new(
            bar.pos.to_array(),
            [bar.size.x * fill, bar.size.y],
            textures::BAR_FILL,
            1.0,
        ));
    }
    for b in &snapshot.enemy_bullets {
        push_view(&mut out, b);
    }
    for p in &snapshot.power_ups {
        push_view(&mut out, p);
    }
    for x in &snapshot.explosions {
        push_view(&mut out, x);
    }
    out
}

/// Raw bytes for a vertex buffer upload
pub fn as_bytes(instances: &[SpriteInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
