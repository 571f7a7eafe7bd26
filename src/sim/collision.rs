//! Bullet collision resolution
//!
//! Player bullets stop at the first enemy they overlap. Missiles hit the boss
//! harder and splash every other enemy within range of the missile's center.
//! Enemy bullets are absorbed by shield charges before they cost a life.

use glam::Vec2;
use rand::Rng;

use super::effects;
use super::geometry::{Bounded, intersects, overlapping};
use super::state::{Bullet, BulletKind, GameEvent, GameState};
use crate::consts::*;

/// The enemy one player bullet struck
#[derive(Debug, Clone, Copy)]
struct HitReport {
    /// Enemy center, for kill explosions and drops
    target_center: Vec2,
    target_id: u32,
}

/// Resolve every player bullet against the enemies, in list order
pub fn resolve_player_bullets(state: &mut GameState) {
    let bullets = std::mem::take(&mut state.bullets);
    let mut survivors = Vec::with_capacity(bullets.len());

    for bullet in bullets {
        let Some(index) = state.enemies.iter().position(|e| overlapping(&bullet, e)) else {
            survivors.push(bullet);
            continue;
        };
        let report = strike(state, &bullet, index);
        if bullet.kind == BulletKind::Missile {
            splash(state, bullet.center(), report.target_id);
        }
    }

    state.bullets = survivors;
}

/// Apply one bullet's damage to `state.enemies[index]`
fn strike(state: &mut GameState, bullet: &Bullet, index: usize) -> HitReport {
    let target = &mut state.enemies[index];
    let boss = target.is_boss();
    let damage = match (bullet.kind, boss) {
        (BulletKind::Missile, true) => MISSILE_BOSS_DAMAGE,
        _ => 1,
    };
    let destroyed = target.take_damage(damage);
    let report = HitReport {
        target_center: target.center(),
        target_id: target.id,
    };

    state.events.push(GameEvent::EnemyHit { boss });

    if !destroyed {
        // Hit flash at the bullet tip; a kill gets the larger explosion instead
        let tip = Vec2::new(bullet.pos.x + bullet.sprite.size.x / 2.0, bullet.pos.y);
        state.spawn_explosion(tip, if boss { 1.3 } else { 0.9 });
        state.add_score(SCORE_HIT);
        return report;
    }

    state.enemies.remove(index);
    state.spawn_explosion(report.target_center, if boss { 2.2 } else { 1.2 });
    state.events.push(GameEvent::EnemyDestroyed {
        boss,
        at: report.target_center,
    });

    if boss {
        state.add_score(SCORE_BOSS_KILL);
        state.victory = true;
        state.events.push(GameEvent::Victory);
        log::info!("Boss destroyed, victory with score {}", state.score);
    } else {
        state.add_score(SCORE_KILL);
        if state.phase >= POWERUP_MIN_PHASE && state.rng.random_bool(POWERUP_DROP_CHANCE) {
            effects::spawn_power_up(state, report.target_center);
        }
    }
    report
}

/// Splash damage around a missile impact. Kills here award nothing.
fn splash(state: &mut GameState, impact: Vec2, struck_id: u32) {
    for enemy in state.enemies.iter_mut().filter(|e| e.id != struck_id) {
        if enemy.center().distance(impact) < SPLASH_RADIUS {
            enemy.take_damage(SPLASH_DAMAGE);
        }
    }

    let before = state.enemies.len();
    state.enemies.retain(|e| !e.is_dead());
    let kills = before - state.enemies.len();
    if kills > 0 {
        state.events.push(GameEvent::SplashKills(kills));
        log::debug!("Missile splash removed {kills} enemies");
    }
}

/// Resolve enemy bullets against the player. Every overlapping bullet is consumed.
pub fn resolve_enemy_bullets(state: &mut GameState) {
    let player_box = state.player.bounds();
    let before = state.enemy_bullets.len();
    state
        .enemy_bullets
        .retain(|b| !intersects(&b.bounds(), &player_box));
    let hits = before - state.enemy_bullets.len();

    for _ in 0..hits {
        let player = &mut state.player;
        if player.shield_hits > 0 {
            player.shield_hits -= 1;
            let charges_left = player.shield_hits;
            state.shield_impact.trigger();
            state
                .events
                .push(GameEvent::ShieldAbsorbed { charges_left });
            continue;
        }

        player.lives = player.lives.saturating_sub(1);
        let lives_left = player.lives;
        let center = player.center();
        state.spawn_explosion(center, 1.1);
        state.events.push(GameEvent::PlayerHit { lives_left });

        if lives_left == 0 && !state.game_over {
            state.game_over = true;
            state.events.push(GameEvent::GameOver);
            log::info!("Game over at phase {} with score {}", state.phase + 1, state.score);
        }
    }
}
