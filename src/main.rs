//! Invader Storm entry point
//!
//! Headless demo: the autopilot plays a seeded session and the run summary
//! is printed as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use serde::Serialize;

    use invader_storm::audio::{AudioManager, LogToneBackend};
    use invader_storm::autopilot::Autopilot;
    use invader_storm::consts::FRAME_MS;
    use invader_storm::sim::{GameMode, GamePhase, GameState, Upgrades};
    use invader_storm::sinks::{RenderFrame, RenderSink, UiSink, UiSnapshot};
    use invader_storm::{Game, Settings};

    #[derive(Parser, Debug)]
    #[command(name = "invader-storm")]
    #[command(about = "Run a headless autopilot session and print a JSON summary")]
    pub struct Cli {
        /// Display frames to run (60 per second)
        #[arg(long, default_value_t = 36_000)]
        frames: u32,
        /// Settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,
        /// RNG seed (overrides the settings file)
        #[arg(long)]
        seed: Option<u64>,
        /// Play time attack instead of the configured mode
        #[arg(long, default_value_t = false)]
        time_attack: bool,
    }

    /// Logs a one-line frame digest every few seconds
    #[derive(Default)]
    struct LogRenderer {
        frames: u64,
    }

    impl RenderSink for LogRenderer {
        fn render(&mut self, frame: &RenderFrame) {
            self.frames += 1;
            if self.frames % 600 == 0 {
                log::debug!(
                    "frame {}: {:?}, {} sprites, combo {:?}",
                    self.frames,
                    frame.phase,
                    frame.sprites.len(),
                    frame.hud.combo.map(|c| c.count)
                );
            }
        }
    }

    #[derive(Default)]
    struct LogUi {
        final_score: Option<u64>,
    }

    impl UiSink for LogUi {
        fn update(&mut self, ui: &UiSnapshot) {
            log::debug!(
                "score {} lives {} level {} ({})",
                ui.score,
                ui.lives,
                ui.level,
                ui.mode.label()
            );
        }

        fn game_over(&mut self, final_score: u64) {
            log::info!("Final score: {}", final_score);
            self.final_score = Some(final_score);
        }
    }

    #[derive(Debug, Serialize)]
    struct RunSummary {
        seed: u64,
        mode: GameMode,
        frames: u32,
        ticks: u64,
        phase: GamePhase,
        score: u64,
        final_score: Option<u64>,
        level: u32,
        lives: u32,
        max_combo: u32,
        meteors_destroyed: u32,
        upgrades: Upgrades,
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run(cli: &Cli) -> invader_storm::error::Result<()> {
        let settings = match &cli.settings {
            Some(path) => Settings::load(path).unwrap_or_else(|err| {
                log::warn!("Using default settings: {}", err);
                Settings::default()
            }),
            None => Settings::default(),
        };
        let seed = cli.seed.or(settings.seed).unwrap_or_else(clock_seed);
        let mode = if cli.time_attack {
            GameMode::TimeAttack
        } else {
            settings.mode
        };
        log::info!("Invader Storm (headless) seed {} mode {}", seed, mode.label());

        let mut audio = AudioManager::new(Some(Box::new(LogToneBackend::default())));
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let state = GameState::with_rules(seed, settings.rules(), mode);
        let mut game = Game::new(state, LogRenderer::default(), audio, LogUi::default());
        let pilot = Autopilot::default();

        let mut frames = 0;
        while frames < cli.frames && !game.state().is_over() {
            let input = pilot.decide(game.state());
            game.frame(FRAME_MS, &input);
            pilot.spend_points(game.state_mut());
            frames += 1;
        }

        let state = game.state();
        let summary = RunSummary {
            seed,
            mode,
            frames,
            ticks: state.frame,
            phase: state.phase,
            score: state.score,
            final_score: game.ui_sink().final_score,
            level: state.level,
            lives: state.lives,
            max_combo: state.combo.max,
            meteors_destroyed: state.meteors_destroyed,
            upgrades: state.upgrades,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = headless::Cli::parse();
    if let Err(err) = headless::run(&cli) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm
}
