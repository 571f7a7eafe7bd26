//! Galactic Defender headless runner
//!
//! Plays the simulation with a simple autopilot at 60 frames per second of
//! simulated time and logs what happened. Useful for soak testing and tuning.
//!
//! Usage: galactic-defender [config.json] [--seed N] [--frames N] [--history runs.json]

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::process::ExitCode;

    use galactic_defender::render::{RenderSnapshot, sprite_instances};
    use galactic_defender::sim::{
        Bounded, GameEvent, GameState, PowerUpKind, SpriteKey, TickInput, tick,
    };
    use galactic_defender::highscores::{RANKED_ENTRIES, history_row};
    use galactic_defender::{GameConfig, RunHistory};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    struct Options {
        config: Option<String>,
        seed: u64,
        frames: u64,
        history: Option<String>,
    }

    fn parse_args() -> Result<Options, String> {
        let mut options = Options {
            config: None,
            seed: 2024,
            frames: 60 * 60 * 5,
            history: None,
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().ok_or("--seed needs a value")?;
                    options.seed = value.parse().map_err(|_| format!("bad seed: {value}"))?;
                }
                "--frames" => {
                    let value = args.next().ok_or("--frames needs a value")?;
                    options.frames = value
                        .parse()
                        .map_err(|_| format!("bad frame count: {value}"))?;
                }
                "--history" => {
                    options.history = Some(args.next().ok_or("--history needs a path")?);
                }
                path => options.config = Some(path.to_string()),
            }
        }
        Ok(options)
    }

    fn load_config(path: Option<&str>) -> Result<GameConfig, String> {
        let Some(path) = path else {
            return Ok(GameConfig::default());
        };
        let json = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        GameConfig::from_json(&json).map_err(|e| format!("{path}: {e}"))
    }

    fn load_history(path: Option<&str>) -> RunHistory {
        let Some(path) = path else {
            return RunHistory::new();
        };
        match fs::read_to_string(path) {
            Ok(json) => RunHistory::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable history {path}: {e}");
                RunHistory::new()
            }),
            Err(_) => RunHistory::new(),
        }
    }

    /// Stand-in image sizes so every entity gets a real box
    fn load_placeholder_assets(state: &mut GameState) {
        let assets = &mut state.assets;
        assets.mark_ready(SpriteKey::Player, 160, 120);
        assets.mark_ready(SpriteKey::PlayerBullet, 14, 34);
        assets.mark_ready(SpriteKey::Missile, 20, 48);
        assets.mark_ready(SpriteKey::EnemyBullet, 14, 34);
        for i in 0..7 {
            assets.mark_ready(SpriteKey::Enemy(i), 64, 72);
        }
        assets.mark_ready(SpriteKey::Boss, 240, 120);
        for kind in PowerUpKind::ALL {
            assets.mark_ready(SpriteKey::PowerUp(kind), 40, 40);
        }
        assets.mark_ready(SpriteKey::Explosion, 512, 64);
        assets.mark_ready(SpriteKey::ShieldImpact, 384, 64);
        assets.mark_ready(SpriteKey::ShieldAura, 128, 128);
        state.scenes.mark_all_ready(1024, 1536);
    }

    /// Track the lowest enemy, dodge bullets about to land, tap fire
    fn autopilot(state: &GameState, frame: u64) -> TickInput {
        let player = state.player.bounds();
        let center = player.center();
        let mut input = TickInput {
            fire: frame % 6 == 0,
            ..Default::default()
        };

        let threat = state.enemy_bullets.iter().find(|b| {
            let b = b.bounds();
            b.bottom() > player.pos.y - 90.0
                && b.pos.y < player.bottom()
                && b.right() > player.pos.x - 8.0
                && b.pos.x < player.right() + 8.0
        });
        if let Some(bullet) = threat {
            let dodge_left = bullet.center().x > center.x;
            input.left = dodge_left;
            input.right = !dodge_left;
            return input;
        }

        let target = state
            .power_ups
            .first()
            .map(|p| p.center())
            .or_else(|| {
                state
                    .enemies
                    .iter()
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .map(|e| e.center())
            });
        if let Some(target) = target {
            input.left = target.x < center.x - 4.0;
            input.right = target.x > center.x + 4.0;
        }
        input
    }

    pub fn run() -> ExitCode {
        env_logger::init();

        let options = match parse_args() {
            Ok(options) => options,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        };
        let config = match load_config(options.config.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Invalid configuration: {e}");
                return ExitCode::FAILURE;
            }
        };
        let mut history = load_history(options.history.as_deref());

        let mut state = match GameState::new(config, options.seed) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Cannot start: {e}");
                return ExitCode::FAILURE;
            }
        };
        state.high_score = history.high_score();
        load_placeholder_assets(&mut state);
        log::info!("Galactic Defender headless run, seed {}", options.seed);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, 0.0);

        let mut kills = 0u32;
        let mut finished = false;
        for frame in 1..=options.frames {
            let input = autopilot(&state, frame);
            tick(&mut state, &input, frame as f64 * FRAME_MS);

            for event in state.drain_events() {
                match event {
                    GameEvent::EnemyDestroyed { .. } => kills += 1,
                    GameEvent::PhaseAdvanced { phase } => {
                        log::info!("Frame {frame}: phase {}", phase + 1);
                    }
                    GameEvent::RunFinished(summary) => {
                        history.record(summary);
                        finished = true;
                    }
                    _ => {}
                }
            }
            if finished {
                break;
            }
        }

        let snapshot = RenderSnapshot::capture(&state);
        let quads = sprite_instances(
            &snapshot,
            [state.config.arena_width, state.config.arena_height],
        );
        log::info!(
            "Stopped at phase {} with score {} ({} kills, {} lives, {} quads on screen)",
            snapshot.hud.phase,
            snapshot.hud.score,
            kills,
            snapshot.hud.lives,
            quads.len()
        );
        match serde_json::to_string(&snapshot.hud) {
            Ok(json) => println!("{json}"),
            Err(e) => log::warn!("Cannot encode HUD: {e}"),
        }

        if let Some(path) = options.history.as_deref() {
            if let Err(e) = fs::write(path, history.to_json()) {
                log::error!("Cannot save history to {path}: {e}");
                return ExitCode::FAILURE;
            }
            log::info!("History saved ({} runs)", history.len());
            for (i, run) in history.ranked(RANKED_ENTRIES).into_iter().enumerate() {
                log::info!("{}", history_row(i + 1, run));
            }
        }
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host embeds the library directly on the web
}
