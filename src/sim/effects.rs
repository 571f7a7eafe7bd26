//! Power-ups, status timers and transient visual cues

use glam::Vec2;
use rand::Rng;

use super::geometry::overlapping;
use super::resource::{Sprite, SpriteKey};
use super::state::{GameEvent, GameState, Player, PowerUp, PowerUpKind, Weapon};
use crate::consts::*;

/// Drop a random power-up centered on `center`
pub fn spawn_power_up(state: &mut GameState, center: Vec2) {
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let vy = 2.0 + state.rng.random_range(0.0..1.5);
    state.power_ups.push(PowerUp {
        kind,
        pos: center - Vec2::splat(POWERUP_SIZE / 2.0),
        vy,
        sprite: Sprite::new(SpriteKey::PowerUp(kind), &state.assets),
    });
    state.events.push(GameEvent::PowerUpDropped(kind));
}

/// Apply a collected power-up to the player
pub fn apply_power_up(player: &mut Player, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Life => player.lives = (player.lives + 1).min(PLAYER_MAX_LIVES),
        PowerUpKind::Shield => player.shield_hits = SHIELD_CHARGES,
        PowerUpKind::Time => {
            player.weapon = Weapon::Missile;
            player.weapon_timer.set(MISSILE_DURATION_MS);
        }
    }
}

/// Count down the special weapon; returns true when it just reverted
pub fn tick_weapon(player: &mut Player, dt_ms: f32) -> bool {
    if player.weapon == Weapon::Normal {
        return false;
    }
    if player.weapon_timer.tick(dt_ms) {
        player.weapon = Weapon::Normal;
        player.weapon_timer.clear();
        return true;
    }
    false
}

/// Weapon countdown, then falling pickups: collect on contact, drop below the arena
pub fn update_power_ups(state: &mut GameState, dt_ms: f32) {
    if tick_weapon(&mut state.player, dt_ms) {
        state.events.push(GameEvent::WeaponExpired);
        log::debug!("Missile launcher expired");
    }

    let floor = state.config.arena_height + POWERUP_DESPAWN_MARGIN;
    let mut collected = Vec::new();
    let player = &state.player;
    state.power_ups.retain_mut(|p| {
        p.pos.y += p.vy;
        if overlapping(p, player) {
            collected.push(p.kind);
            return false;
        }
        p.pos.y <= floor
    });

    for kind in collected {
        apply_power_up(&mut state.player, kind);
        state.events.push(GameEvent::PowerUpCollected(kind));
        log::debug!("Collected {kind:?}");
    }
}

/// Step explosion animations and drop finished ones
pub fn update_explosions(state: &mut GameState, dt_ms: f32) {
    let frames = state.assets.strip_frames(SpriteKey::Explosion);
    state.explosions.retain_mut(|e| {
        e.anim.tick(dt_ms);
        e.anim.frame < frames
    });
}

/// Step the shield impact flash until its last frame
pub fn update_shield_impact(state: &mut GameState, dt_ms: f32) {
    let impact = &mut state.shield_impact;
    if !impact.active {
        return;
    }
    impact.anim.tick(dt_ms);
    if impact.anim.frame >= state.assets.shield_frames() {
        impact.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;

    fn playing_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 11).unwrap();
        state.start_run();
        state
    }

    fn drop_on_player(state: &mut GameState, kind: PowerUpKind) {
        let pos = state.player.pos;
        state.power_ups.push(PowerUp {
            kind,
            pos,
            vy: 2.0,
            sprite: Sprite::new(SpriteKey::PowerUp(kind), &state.assets),
        });
    }

    #[test]
    fn test_life_caps_at_nine() {
        let mut state = playing_state();
        state.player.lives = 9;
        apply_power_up(&mut state.player, PowerUpKind::Life);
        assert_eq!(state.player.lives, 9);
        state.player.lives = 4;
        apply_power_up(&mut state.player, PowerUpKind::Life);
        assert_eq!(state.player.lives, 5);
    }

    #[test]
    fn test_shield_replaces_charges() {
        let mut state = playing_state();
        state.player.shield_hits = 1;
        apply_power_up(&mut state.player, PowerUpKind::Shield);
        assert_eq!(state.player.shield_hits, 2);
        apply_power_up(&mut state.player, PowerUpKind::Shield);
        assert_eq!(state.player.shield_hits, 2);
    }

    #[test]
    fn test_missile_reverts_at_ten_seconds() {
        let mut state = playing_state();
        apply_power_up(&mut state.player, PowerUpKind::Time);
        assert_eq!(state.player.weapon, Weapon::Missile);

        for _ in 0..99 {
            assert!(!tick_weapon(&mut state.player, 100.0));
        }
        assert_eq!(state.player.weapon, Weapon::Missile);
        assert_eq!(state.player.weapon_timer.remaining(), 100.0);

        assert!(tick_weapon(&mut state.player, 100.0));
        assert_eq!(state.player.weapon, Weapon::Normal);
        assert_eq!(state.player.weapon_timer.remaining(), 0.0);
    }

    #[test]
    fn test_pickup_collected_on_contact() {
        let mut state = playing_state();
        drop_on_player(&mut state, PowerUpKind::Shield);
        update_power_ups(&mut state, 16.0);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.player.shield_hits, 2);
        assert!(state
            .events
            .contains(&GameEvent::PowerUpCollected(PowerUpKind::Shield)));
    }

    #[test]
    fn test_time_pickup_is_not_charged_for_its_own_frame() {
        let mut state = playing_state();
        drop_on_player(&mut state, PowerUpKind::Time);
        update_power_ups(&mut state, 500.0);
        assert_eq!(state.player.weapon, Weapon::Missile);
        assert_eq!(state.player.weapon_timer.remaining(), MISSILE_DURATION_MS);
    }

    #[test]
    fn test_pickup_expires_below_arena() {
        let mut state = playing_state();
        let sprite = Sprite::new(SpriteKey::PowerUp(PowerUpKind::Life), &state.assets);
        state.power_ups.push(PowerUp {
            kind: PowerUpKind::Life,
            pos: Vec2::new(10.0, ARENA_HEIGHT + POWERUP_DESPAWN_MARGIN - 1.0),
            vy: 3.0,
            sprite,
        });
        update_power_ups(&mut state, 16.0);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.player.lives, PLAYER_START_LIVES);
    }

    #[test]
    fn test_spawned_power_up_is_centered() {
        let mut state = playing_state();
        spawn_power_up(&mut state, Vec2::new(200.0, 100.0));
        let p = &state.power_ups[0];
        assert_eq!(p.pos, Vec2::new(180.0, 80.0));
        assert!(p.vy >= 2.0 && p.vy < 3.5);
    }

    #[test]
    fn test_explosion_lifetime_follows_sheet() {
        let mut state = playing_state();
        state.spawn_explosion(Vec2::ZERO, 1.0);
        update_explosions(&mut state, EXPLOSION_FRAME_MS);
        assert!(state.explosions.is_empty());

        state.assets.mark_ready(SpriteKey::Explosion, 192, 64);
        state.spawn_explosion(Vec2::ZERO, 1.0);
        update_explosions(&mut state, EXPLOSION_FRAME_MS);
        update_explosions(&mut state, EXPLOSION_FRAME_MS);
        assert_eq!(state.explosions.len(), 1);
        update_explosions(&mut state, EXPLOSION_FRAME_MS);
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_shield_impact_runs_its_frames() {
        let mut state = playing_state();
        state.assets.mark_ready(SpriteKey::ShieldImpact, 128, 64);
        state.shield_impact.trigger();
        update_shield_impact(&mut state, SHIELD_IMPACT_FRAME_MS);
        assert!(state.shield_impact.active);
        update_shield_impact(&mut state, SHIELD_IMPACT_FRAME_MS);
        assert!(!state.shield_impact.active);
    }
}
