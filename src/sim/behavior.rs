//! Enemy and boss behavior
//!
//! Normal enemies sweep sideways, stepping down at each wall, and fire single
//! shots on a randomized cooldown that shortens as phases advance. The boss
//! sweeps inside an inset, bobs vertically and runs two independent fire
//! patterns: a fast center shot and a slower five-bullet fan.

use glam::Vec2;
use rand::Rng;

use super::resource::{Sprite, SpriteKey};
use super::state::{EnemyBullet, EnemyKind, GameState};
use crate::consts::*;

/// Enemy bullet fall speed for a phase
pub fn enemy_bullet_speed(phase: u32) -> f32 {
    2.0 + phase as f32 * 0.3
}

/// Base cooldown between normal enemy shots (ms), before the random part
pub fn enemy_fire_interval(phase: u32) -> f32 {
    2000.0 - phase as f32 * 200.0
}

/// Move every enemy, run fire timers and animations, then move enemy bullets
pub fn update_enemies(state: &mut GameState, dt_ms: f32) {
    let width = state.config.arena_width;
    let phase = state.phase;
    let bullet_speed = enemy_bullet_speed(phase);
    let bob = (state.time_ms * 0.001).sin() as f32 * BOSS_BOB_AMPLITUDE;
    let bullet_sprite = Sprite::new(SpriteKey::EnemyBullet, &state.assets);
    let bullet_w = bullet_sprite.size.x;
    let mut shots: Vec<EnemyBullet> = Vec::new();

    for enemy in &mut state.enemies {
        let size = enemy.sprite.size;
        enemy.pos.x += enemy.speed * enemy.dir;

        match &mut enemy.kind {
            EnemyKind::Boss { shot, fan } => {
                if enemy.pos.x <= BOSS_SIDE_INSET
                    || enemy.pos.x + size.x >= width - BOSS_SIDE_INSET
                {
                    enemy.dir = -enemy.dir;
                }
                enemy.pos.y = BOSS_BOB_BASE_Y + bob;

                let center_x = enemy.pos.x + size.x / 2.0;
                if fan.tick(dt_ms) {
                    let origin_y = enemy.pos.y + size.y - 10.0;
                    for step in -2..=2 {
                        shots.push(EnemyBullet {
                            pos: Vec2::new(center_x - bullet_w / 2.0, origin_y),
                            sprite: bullet_sprite,
                            speed: bullet_speed + 1.0,
                            vx: step as f32 * BOSS_FAN_SPREAD,
                        });
                    }
                    fan.set(BOSS_FAN_MS);
                }
                if shot.tick(dt_ms) {
                    shots.push(EnemyBullet {
                        pos: Vec2::new(center_x - bullet_w / 2.0, enemy.pos.y + size.y),
                        sprite: bullet_sprite,
                        speed: bullet_speed + 2.0,
                        vx: 0.0,
                    });
                    shot.set(BOSS_SHOT_MS);
                }
            }
            EnemyKind::Normal { fire } => {
                if enemy.pos.x <= 0.0 || enemy.pos.x + size.x >= width {
                    enemy.dir = -enemy.dir;
                    enemy.pos.y += ENEMY_STEP_DOWN;
                }

                if fire.tick(dt_ms) {
                    shots.push(EnemyBullet {
                        pos: Vec2::new(
                            enemy.pos.x + size.x / 2.0 - bullet_w / 2.0,
                            enemy.pos.y + size.y,
                        ),
                        sprite: bullet_sprite,
                        speed: bullet_speed,
                        vx: 0.0,
                    });
                    let jitter: f32 = state.rng.random_range(0.0..1000.0);
                    fire.set(enemy_fire_interval(phase) + jitter);
                }
            }
        }

        enemy.anim.tick_wrapping(dt_ms, 2);
    }

    state.enemy_bullets.extend(shots);
    advance_enemy_bullets(state);
}

/// Move enemy bullets and drop the ones that left the arena
pub fn advance_enemy_bullets(state: &mut GameState) {
    let width = state.config.arena_width;
    let height = state.config.arena_height;
    for b in &mut state.enemy_bullets {
        b.pos.y += b.speed;
        b.pos.x += b.vx;
    }
    state
        .enemy_bullets
        .retain(|b| b.pos.y < height && b.pos.x + b.sprite.size.x > 0.0 && b.pos.x < width);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::progression::spawn_wave;
    use crate::sim::timer::Countdown;

    fn playing_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 3).unwrap();
        state.start_run();
        state
    }

    fn hold_fire(state: &mut GameState) {
        for enemy in &mut state.enemies {
            if let EnemyKind::Normal { fire } = &mut enemy.kind {
                *fire = Countdown::new(1e9);
            }
        }
    }

    fn boss_state() -> GameState {
        let mut state = playing_state();
        state.assets.mark_ready(SpriteKey::Boss, 200, 100);
        state.phase = BOSS_PHASE;
        spawn_wave(&mut state);
        state
    }

    #[test]
    fn test_fire_interval_shrinks_with_phase() {
        assert_eq!(enemy_fire_interval(0), 2000.0);
        assert_eq!(enemy_fire_interval(5), 1000.0);
        assert!((enemy_bullet_speed(5) - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_normal_enemy_bounces_and_steps_down() {
        let mut state = playing_state();
        hold_fire(&mut state);
        state.enemies.truncate(1);
        state.enemies[0].pos = Vec2::new(ARENA_WIDTH - 64.0 - 0.5, 50.0);

        update_enemies(&mut state, 16.0);
        let enemy = &state.enemies[0];
        assert_eq!(enemy.dir, -1.0);
        assert_eq!(enemy.pos.y, 60.0);

        update_enemies(&mut state, 16.0);
        let enemy = &state.enemies[0];
        assert_eq!(enemy.dir, -1.0);
        assert_eq!(enemy.pos.y, 60.0);
    }

    #[test]
    fn test_normal_enemy_fires_and_rearms() {
        let mut state = playing_state();
        hold_fire(&mut state);
        state.enemies.truncate(1);
        if let EnemyKind::Normal { fire } = &mut state.enemies[0].kind {
            *fire = Countdown::new(10.0);
        }

        update_enemies(&mut state, 16.0);
        assert_eq!(state.enemy_bullets.len(), 1);
        let bullet = &state.enemy_bullets[0];
        assert_eq!(bullet.vx, 0.0);
        assert_eq!(bullet.speed, 2.0);

        match &state.enemies[0].kind {
            EnemyKind::Normal { fire } => {
                assert!(fire.remaining() >= 2000.0 && fire.remaining() < 3000.0);
            }
            _ => panic!("expected normal enemy"),
        }
    }

    #[test]
    fn test_boss_fan_and_center_shot() {
        let mut state = boss_state();

        // Center shot at 1000 ms, fan at 2000 ms
        update_enemies(&mut state, 1000.0);
        assert_eq!(state.enemy_bullets.len(), 1);
        assert_eq!(state.enemy_bullets[0].speed, enemy_bullet_speed(9) + 2.0);

        state.enemy_bullets.clear();
        update_enemies(&mut state, 1000.0);
        // Fan (5) plus another center shot (re-armed at 400 ms)
        assert_eq!(state.enemy_bullets.len(), 6);
        let mut drifts: Vec<f32> = state
            .enemy_bullets
            .iter()
            .filter(|b| b.speed == enemy_bullet_speed(9) + 1.0)
            .map(|b| b.vx)
            .collect();
        drifts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(drifts, vec![-1.6, -0.8, 0.0, 0.8, 1.6]);

        match &state.enemies[0].kind {
            EnemyKind::Boss { shot, fan } => {
                assert_eq!(shot.remaining(), BOSS_SHOT_MS);
                assert_eq!(fan.remaining(), BOSS_FAN_MS);
            }
            _ => panic!("expected boss"),
        }
    }

    #[test]
    fn test_boss_stays_inside_inset() {
        let mut state = boss_state();
        state.enemies[0].pos.x = ARENA_WIDTH - BOSS_SIDE_INSET - 200.0;
        update_enemies(&mut state, 1.0);
        assert_eq!(state.enemies[0].dir, -1.0);
    }

    #[test]
    fn test_boss_bobs_with_game_clock() {
        let mut state = boss_state();
        state.time_ms = 0.0;
        update_enemies(&mut state, 1.0);
        assert_eq!(state.enemies[0].pos.y, BOSS_BOB_BASE_Y);

        state.time_ms = std::f64::consts::FRAC_PI_2 * 1000.0;
        update_enemies(&mut state, 1.0);
        assert!((state.enemies[0].pos.y - (BOSS_BOB_BASE_Y + BOSS_BOB_AMPLITUDE)).abs() < 1e-3);
    }

    #[test]
    fn test_enemy_animation_toggles() {
        let mut state = playing_state();
        hold_fire(&mut state);
        update_enemies(&mut state, ENEMY_FRAME_MS);
        assert_eq!(state.enemies[0].anim.frame, 1);
        update_enemies(&mut state, ENEMY_FRAME_MS);
        assert_eq!(state.enemies[0].anim.frame, 0);
    }

    #[test]
    fn test_enemy_bullets_culled_outside_arena() {
        let mut state = playing_state();
        let sprite = Sprite::new(SpriteKey::EnemyBullet, &state.assets);
        let make = |x: f32, y: f32, vx: f32| EnemyBullet {
            pos: Vec2::new(x, y),
            sprite,
            speed: 3.0,
            vx,
        };
        state.enemy_bullets = vec![
            make(100.0, ARENA_HEIGHT - 2.0, 0.0),
            make(100.0, 100.0, 0.0),
            make(-13.0, 100.0, -2.0),
        ];
        advance_enemy_bullets(&mut state);
        assert_eq!(state.enemy_bullets.len(), 1);
        assert_eq!(state.enemy_bullets[0].pos, Vec2::new(100.0, 103.0));
    }
}
