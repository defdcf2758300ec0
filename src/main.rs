//! Note Siege headless runner
//!
//! Plays the simulation with a simple bot against a file-backed store and
//! logs a summary. Useful for balancing and for exercising persistence.
//!
//! Usage:
//!   RUST_LOG=info cargo run --release -- --frames 36000 --accuracy 0.85
//!
//! The browser build enters through `web::WebGame` instead.

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use note_siege::Session;
    use note_siege::audio::NullAudio;
    use note_siege::consts::FRAME_MS;
    use note_siege::notes::Clef;
    use note_siege::persistence::FileStorage;
    use note_siege::platform;
    use note_siege::settings::Settings;
    use note_siege::sim::{AnswerOutcome, GameEvent, GamePhase};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    #[derive(Parser)]
    #[command(name = "note-siege")]
    #[command(about = "Run Note Siege headless with a scripted player")]
    struct Args {
        /// RNG seed for the simulation (defaults to the wall clock)
        #[arg(long)]
        seed: Option<u64>,
        /// Number of 60 Hz frames to simulate
        #[arg(long, default_value_t = 36_000)]
        frames: u64,
        /// Probability that the bot answers correctly
        #[arg(long, default_value_t = 0.9)]
        accuracy: f64,
        /// Delay between a prompt and the bot's answer
        #[arg(long, default_value_t = 900)]
        reaction_ms: u32,
        /// Clef for the prompt (treble, bass, alto, tenor)
        #[arg(long)]
        clef: Option<String>,
        /// Directory holding progress, settings and high scores
        #[arg(long, default_value = "saves")]
        save_dir: PathBuf,
        /// Clear saved progress before starting
        #[arg(long)]
        reset: bool,
    }

    #[derive(Default)]
    struct Summary {
        correct: u32,
        wrong: u32,
        timeouts: u32,
        interceptions: u32,
        destroyed: u32,
        levels: u32,
        runs: u32,
    }

    impl Summary {
        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::WrongAnswer { .. } => self.wrong += 1,
                GameEvent::AnswerTimeout { .. } => self.timeouts += 1,
                GameEvent::Interception { .. } => self.interceptions += 1,
                GameEvent::EnemyDestroyed => self.destroyed += 1,
                GameEvent::LevelUp { .. } => self.levels += 1,
                GameEvent::GameStarted { .. } => self.runs += 1,
                _ => {}
            }
        }
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();
        if !(0.0..=1.0).contains(&args.accuracy) {
            bail!("--accuracy must be within 0..=1, got {}", args.accuracy);
        }

        std::fs::create_dir_all(&args.save_dir)
            .with_context(|| format!("creating save dir {}", args.save_dir.display()))?;
        let storage = FileStorage::new(&args.save_dir);
        let mut settings = Settings::load(&storage);
        if let Some(name) = &args.clef {
            settings.clef = Clef::parse(name).with_context(|| format!("unknown clef {name:?}"))?;
        }

        let seed = args.seed.unwrap_or_else(|| platform::now_ms().unsigned_abs());
        log::info!("Note Siege (headless) seed {seed}, {} frames", args.frames);

        let mut session =
            Session::with_settings(seed, settings, Box::new(storage), Box::new(NullAudio));
        if args.reset {
            session.reset_progress();
        }

        let mut bot_rng = Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15);
        let reaction_frames = (args.reaction_ms as f64 / FRAME_MS).round() as u64;
        let mut prompt_since: Option<u64> = None;
        let mut summary = Summary::default();
        let mut clock_ms = platform::now_ms();

        session.start();
        for frame in 0..args.frames {
            if session.state().phase == GamePhase::GameOver {
                log::info!("Restarting after game over (score {})", session.state().score);
                session.start();
                prompt_since = None;
            }

            let state = session.state();
            let ready = state.phase == GamePhase::Running
                && state.enemy.as_ref().is_some_and(|e| e.is_active());
            match (ready, state.current_note, prompt_since) {
                (true, Some(_), None) => prompt_since = Some(frame),
                (true, Some(expected), Some(since)) if frame - since >= reaction_frames => {
                    let pick = if bot_rng.random_bool(args.accuracy) {
                        expected
                    } else {
                        let range = state.available_note_indices();
                        let offset = bot_rng.random_range(1..range.len());
                        (expected + offset) % range.len()
                    };
                    if session.answer_now(pick) == AnswerOutcome::Correct {
                        summary.correct += 1;
                    }
                    prompt_since = None;
                }
                (false, _, _) => prompt_since = None,
                _ => {}
            }

            clock_ms += FRAME_MS as i64;
            for event in session.frame(FRAME_MS, clock_ms) {
                summary.record(&event);
            }
        }
        session.shutdown();

        let state = session.state();
        let hud = session.hud();
        println!();
        println!("=== RUN SUMMARY ===");
        println!("  Seed:          {seed}");
        println!("  Runs:          {}", summary.runs);
        let champion = if hud.champion { " (champion)" } else { "" };
        println!("  Reached:       {}{champion}", hud.level_label);
        println!("  Score:         {}", state.score);
        println!("  Best:          {}", hud.best);
        println!("  Lives:         {}", state.lives);
        println!("  Correct:       {}", summary.correct);
        println!("  Wrong:         {}", summary.wrong);
        println!("  Timeouts:      {}", summary.timeouts);
        println!("  Interceptions: {}", summary.interceptions);
        println!("  Destroyed:     {}", summary.destroyed);
        println!("  Level ups:     {}", summary.levels);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    runner::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::init, this is just to satisfy the compiler
}
