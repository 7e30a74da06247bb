//! Cluster Shot headless runner
//!
//! Plays a session in the terminal: a demo by default, or a scripted
//! player with `--play`. Prints the board after every placement and the
//! final snapshot as JSON.
//!
//! Run with `--help` for the available flags.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use cluster_shot::sim::{GameEvent, TickInput};
use cluster_shot::{Difficulty, Engine, FrameSink, HighScores, InputSource, Settings, Snapshot};

#[derive(Parser, Debug)]
#[command(about = "Headless cluster-matching bubble shooter", version)]
struct Args {
    /// Drive the session with a scripted player instead of the demo autopilot
    #[arg(long)]
    play: bool,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Difficulty preset (easy, normal, hard); replaces the palette
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,

    /// JSON high score file to read and update
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Stop after this many ticks even without a game over
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u64,

    /// Do not print the board after each placement
    #[arg(long)]
    quiet: bool,
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(value).ok_or_else(|| format!("unknown difficulty: {value}"))
}

/// Turns a random way for a random number of ticks, then fires
struct ScriptedPlayer {
    rng: Pcg32,
    hold: u32,
    turn_left: bool,
}

impl ScriptedPlayer {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            hold: 0,
            turn_left: true,
        }
    }
}

impl InputSource for ScriptedPlayer {
    fn poll(&mut self) -> TickInput {
        if self.hold == 0 {
            self.hold = self.rng.random_range(0..30);
            self.turn_left = self.rng.random_bool(0.5);
            return TickInput {
                fire: true,
                ..Default::default()
            };
        }
        self.hold -= 1;
        TickInput {
            aim_left: self.turn_left,
            aim_right: !self.turn_left,
            fire: false,
        }
    }
}

/// Prints the board whenever a piece settles
struct TextSink {
    quiet: bool,
}

impl FrameSink for TextSink {
    fn present(&mut self, snapshot: &Snapshot, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::ClusterCleared(cluster) => {
                    log::info!("Cleared {} pieces of color {}", cluster.len(), cluster.color.0)
                }
                GameEvent::Placed(placement) if placement.overwrote => {
                    log::warn!("Overwrote piece at ({}, {})", placement.col, placement.row)
                }
                _ => {}
            }
        }
        let placed = events.iter().any(|e| matches!(e, GameEvent::Placed(_)));
        if placed && !self.quiet {
            println!("score {}\n{}", snapshot.score, snapshot.to_text());
        }
    }
}

fn run(args: Args) -> cluster_shot::error::Result<()> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(difficulty) = args.difficulty {
        settings.apply_preset(difficulty);
    }
    let scores = match &args.scores {
        Some(path) => HighScores::load(path)?,
        None => HighScores::new(),
    };

    let player = ScriptedPlayer::new(settings.seed.unwrap_or(7));
    let sink = TextSink {
        quiet: args.quiet,
    };
    let mut engine = Engine::new(settings, player, sink, scores)?;

    if args.play {
        engine.start();
    } else {
        engine.start_demo();
    }

    let mut ticks = 0;
    while !engine.is_over() && ticks < args.max_ticks {
        engine.frame();
        ticks += 1;
    }
    if !engine.is_over() {
        log::warn!("Stopped after {} ticks without game over", ticks);
    }

    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);

    let (_, _, scores) = engine.into_parts();
    if let Some(path) = &args.scores {
        scores.save(path)?;
    }
    if let Some(top) = scores.top_score() {
        println!("best score: {top}");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    log::info!("Cluster Shot (headless) starting...");

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["cluster-shot"]).expect("parse");
        assert!(!args.play);
        assert!(!args.quiet);
        assert_eq!(args.max_ticks, 200_000);
        assert!(args.settings.is_none());
        assert!(args.difficulty.is_none());
    }

    #[test]
    fn test_equals_form_and_paths() {
        let args = Args::try_parse_from([
            "cluster-shot",
            "--max-ticks=5",
            "--quiet",
            "--settings",
            "game.json",
            "--scores=scores.json",
        ])
        .expect("parse");
        assert_eq!(args.max_ticks, 5);
        assert!(args.quiet);
        assert_eq!(args.settings, Some(PathBuf::from("game.json")));
        assert_eq!(args.scores, Some(PathBuf::from("scores.json")));
    }

    #[test]
    fn test_difficulty_flag() {
        let args = Args::try_parse_from(["cluster-shot", "--difficulty", "hard"]).expect("parse");
        assert_eq!(args.difficulty, Some(Difficulty::Hard));
        assert!(Args::try_parse_from(["cluster-shot", "--difficulty", "brutal"]).is_err());
    }

    #[test]
    fn test_help_is_available() {
        let err = Args::try_parse_from(["cluster-shot", "--help"]).expect_err("help exits");
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_runs_a_short_quiet_session() {
        let args = Args::try_parse_from(["cluster-shot", "--quiet", "--max-ticks", "50"])
            .expect("parse");
        run(args).expect("run");
    }
}
