//! Player movement, firing and animation

use glam::Vec2;

use super::resource::{Sprite, SpriteKey};
use super::state::{Bullet, BulletKind, GameEvent, GameState, PlayerAnim, Weapon};
use super::tick::TickInput;
use crate::consts::*;

/// Move, fire and animate the player from this tick's input
pub fn apply_input(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    let arena = Vec2::new(state.config.arena_width, state.config.arena_height);
    let player = &mut state.player;

    let mut dir = Vec2::ZERO;
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    let moving = dir != Vec2::ZERO;
    player.pos += dir * player.speed;
    player.pos = player
        .pos
        .clamp(Vec2::ZERO, (arena - player.sprite.size).max(Vec2::ZERO));

    player.anim = if input.fire {
        PlayerAnim::Shoot
    } else if moving {
        PlayerAnim::Run
    } else {
        PlayerAnim::Idle
    };

    let (columns, _) = state.assets.player_sheet();
    player.anim_frames.tick_wrapping(dt_ms, columns);

    if input.fire {
        fire(state);
    }
}

/// Spawn a bullet for the current weapon, up to the on-screen cap
pub fn fire(state: &mut GameState) -> bool {
    if state.bullets.len() >= MAX_PLAYER_BULLETS {
        return false;
    }

    let player = &state.player;
    let (kind, key, speed, lift) = match player.weapon {
        Weapon::Normal => (BulletKind::Normal, SpriteKey::PlayerBullet, BULLET_SPEED, 2.0),
        Weapon::Missile => (BulletKind::Missile, SpriteKey::Missile, MISSILE_SPEED, 4.0),
    };
    let sprite = Sprite::new(key, &state.assets);
    let pos = Vec2::new(
        player.pos.x + player.sprite.size.x / 2.0 - sprite.size.x / 2.0,
        player.pos.y - lift,
    );
    state.bullets.push(Bullet {
        pos,
        sprite,
        speed,
        kind,
    });
    state.events.push(GameEvent::BulletFired(kind));
    true
}

/// Move player bullets up and drop the ones fully above the arena
pub fn advance_bullets(state: &mut GameState) {
    for b in &mut state.bullets {
        b.pos.y -= b.speed;
    }
    state.bullets.retain(|b| b.pos.y + b.sprite.size.y >= 0.0);
}
