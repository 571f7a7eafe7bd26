//! Phase progression and wave spawning
//!
//! Phases 0-8 are escalating waves of normal enemies, phase 9 is the boss.
//! Clearing a wave advances the phase (wrapping after the boss) and may move
//! the background to another scene band.

use glam::Vec2;
use rand::Rng;

use super::resource::{ENEMY_SPRITE_COUNT, Sprite, SpriteKey};
use super::state::{Enemy, EnemyKind, GameEvent, GameState};
use super::timer::{Countdown, FrameTimer};
use crate::consts::*;

/// Enemies in a phase's wave
pub fn wave_size(phase: u32) -> usize {
    if phase >= BOSS_PHASE {
        1
    } else {
        MAX_WAVE_SIZE.min(5 + phase as usize * 2)
    }
}

/// Horizontal speed of normal enemies
pub fn enemy_speed(phase: u32) -> f32 {
    1.0 + phase as f32 * 0.5
}

/// Background scene for a phase band
pub fn scene_for_phase(phase: u32) -> usize {
    match phase {
        0..=4 => 0,
        5..=8 => 1,
        _ => 2,
    }
}

/// Replace the enemies with the current phase's wave. Live enemy bullets go too.
pub fn spawn_wave(state: &mut GameState) {
    state.enemies.clear();
    state.enemy_bullets.clear();

    if state.phase >= BOSS_PHASE {
        spawn_boss(state);
        return;
    }

    let phase = state.phase;
    for i in 0..wave_size(phase) {
        let sprite_index = if phase >= MIXED_SPRITE_PHASE {
            state.rng.random_range(0..ENEMY_SPRITE_COUNT)
        } else {
            (phase % ENEMY_SPRITE_COUNT as u32) as u8
        };
        let first_shot = state.rng.random_range(0.0..2000.0);
        let id = state.next_entity_id();
        let enemy = Enemy {
            id,
            kind: EnemyKind::Normal {
                fire: Countdown::new(first_shot),
            },
            pos: Vec2::new(60.0 + (i % 5) as f32 * 120.0, 50.0 + (i / 5) as f32 * 60.0),
            sprite: Sprite::new(SpriteKey::Enemy(sprite_index), &state.assets),
            speed: enemy_speed(phase),
            dir: 1.0,
            health: 1,
            max_health: 1,
            anim: FrameTimer::new(ENEMY_FRAME_MS),
        };
        state.enemies.push(enemy);
    }
    log::debug!("Spawned wave of {} for phase {}", state.enemies.len(), phase);
}

fn spawn_boss(state: &mut GameState) {
    let sprite = Sprite::new(SpriteKey::Boss, &state.assets);
    let id = state.next_entity_id();
    let boss = Enemy {
        id,
        kind: EnemyKind::Boss {
            shot: Countdown::new(BOSS_SHOT_INITIAL_MS),
            fan: Countdown::new(BOSS_FAN_INITIAL_MS),
        },
        pos: Vec2::new(
            state.config.arena_width / 2.0 - sprite.size.x / 2.0,
            BOSS_SPAWN_Y,
        ),
        sprite,
        speed: BOSS_SPEED,
        dir: 1.0,
        health: BOSS_HEALTH,
        max_health: BOSS_HEALTH,
        anim: FrameTimer::new(BOSS_FRAME_MS),
    };
    state.enemies.push(boss);
    log::info!("Boss spawned");
}

/// Advance to the next phase once the wave is gone. Returns true if it advanced.
pub fn advance_if_cleared(state: &mut GameState) -> bool {
    if !state.enemies.is_empty() || state.victory {
        return false;
    }

    state.phase = (state.phase + 1) % PHASE_COUNT;
    state.highest_phase = state.highest_phase.max(state.phase + 1);
    spawn_wave(state);
    state.events.push(GameEvent::PhaseAdvanced { phase: state.phase });
    log::info!("Phase {} ({} enemies)", state.phase + 1, state.enemies.len());

    let from = state.scenes.current();
    let to = scene_for_phase(state.phase);
    if let Some(style) = state.scenes.start_transition(to) {
        state
            .events
            .push(GameEvent::SceneTransitionStarted { from, to, style });
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::scene::TransitionStyle;

    fn new_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 42).unwrap();
        state.start_run();
        state
    }

    #[test]
    fn test_wave_sizes() {
        assert_eq!(wave_size(0), 5);
        assert_eq!(wave_size(4), 13);
        assert_eq!(wave_size(8), 21);
        assert_eq!(wave_size(9), 1);
        for phase in 0..9 {
            assert_eq!(wave_size(phase), 25.min(5 + phase as usize * 2));
        }
    }

    #[test]
    fn test_scene_bands() {
        assert_eq!(scene_for_phase(0), 0);
        assert_eq!(scene_for_phase(4), 0);
        assert_eq!(scene_for_phase(5), 1);
        assert_eq!(scene_for_phase(8), 1);
        assert_eq!(scene_for_phase(9), 2);
    }

    #[test]
    fn test_wave_grid_layout() {
        let state = new_state();
        assert_eq!(state.enemies[0].pos, Vec2::new(60.0, 50.0));
        assert_eq!(state.enemies[4].pos, Vec2::new(540.0, 50.0));
        assert!(state.enemies.iter().all(|e| e.health == 1 && !e.is_boss()));
        assert!(state
            .enemies
            .iter()
            .all(|e| e.sprite.key == SpriteKey::Enemy(0)));
    }

    #[test]
    fn test_phase_cycles_through_boss_and_wraps() {
        let mut state = new_state();
        for expected in 1..=9 {
            state.enemies.clear();
            assert!(advance_if_cleared(&mut state));
            assert_eq!(state.phase, expected);
            assert_eq!(state.enemies.len(), wave_size(expected));
        }
        assert!(state.enemies[0].is_boss());
        assert_eq!(state.enemies[0].health, BOSS_HEALTH);

        state.enemies.clear();
        assert!(advance_if_cleared(&mut state));
        assert_eq!(state.phase, 0);
        assert_eq!(state.highest_phase, 10);
    }

    #[test]
    fn test_no_advance_with_enemies_or_victory() {
        let mut state = new_state();
        assert!(!advance_if_cleared(&mut state));

        state.enemies.clear();
        state.victory = true;
        assert!(!advance_if_cleared(&mut state));
        assert_eq!(state.phase, 0);
    }

    #[test]
    fn test_spawn_clears_enemy_bullets() {
        let mut state = new_state();
        state.enemy_bullets.push(crate::sim::state::EnemyBullet {
            pos: Vec2::ZERO,
            sprite: Sprite::new(SpriteKey::EnemyBullet, &state.assets),
            speed: 2.0,
            vx: 0.0,
        });
        state.enemies.clear();
        advance_if_cleared(&mut state);
        assert!(state.enemy_bullets.is_empty());
    }

    #[test]
    fn test_band_change_starts_transition() {
        let mut state = new_state();
        state.phase = 4;
        state.enemies.clear();
        advance_if_cleared(&mut state);
        assert_eq!(state.scenes.next(), Some(1));
        assert!(state.events.contains(&GameEvent::SceneTransitionStarted {
            from: 0,
            to: 1,
            style: TransitionStyle::CrossDissolve,
        }));
    }

    #[test]
    fn test_boss_phase_uses_reveal() {
        let mut state = new_state();
        state.phase = 8;
        state.enemies.clear();
        advance_if_cleared(&mut state);
        assert_eq!(state.phase, 9);
        assert_eq!(state.scenes.next(), Some(2));
        assert_eq!(
            state.scenes.crossfade().map(|f| f.style),
            Some(TransitionStyle::Reveal)
        );
    }

    #[test]
    fn test_same_band_keeps_scene() {
        let mut state = new_state();
        state.enemies.clear();
        advance_if_cleared(&mut state);
        assert_eq!(state.phase, 1);
        assert_eq!(state.scenes.next(), None);
    }

    #[test]
    fn test_late_phases_mix_sprites() {
        let mut state = new_state();
        state.phase = 7;
        spawn_wave(&mut state);
        assert_eq!(state.enemies.len(), 19);
        assert!(state.enemies.iter().all(|e| matches!(
            e.sprite.key,
            SpriteKey::Enemy(i) if i < ENEMY_SPRITE_COUNT
        )));
        assert!(state.enemies.iter().all(|e| e.speed == 4.5));
    }

    #[test]
    fn test_boss_centered_once_sprite_ready() {
        let mut state = new_state();
        state.assets.mark_ready(SpriteKey::Boss, 200, 100);
        state.phase = BOSS_PHASE;
        spawn_wave(&mut state);
        let boss = state.boss().unwrap();
        assert_eq!(boss.pos, Vec2::new(ARENA_WIDTH / 2.0 - 100.0, BOSS_SPAWN_Y));
        assert_eq!(state.enemies.len(), 1);
    }
}
