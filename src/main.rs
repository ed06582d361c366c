//! droptris: falling-block, snake and pong arcade games in the terminal.

mod app;
mod input;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    let theme = theme::Theme::load(args.theme.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("starting {:?} with seed {}", args.game, seed);
    let mut app = App::new(args, theme, seed);
    app.run()?;
    Ok(())
}

/// Route `log` output to a file so it never draws over the terminal UI.
fn init_logging(path: &std::path::Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Falling-block, snake and pong in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "droptris",
    version,
    about = "Falling-block, snake and pong arcade games in the terminal.",
    long_about = "droptris bundles three small single-screen arcade games.\n\n\
        CONTROLS (tetris):\n  Left/Right  Move    Down      Soft drop   Space      Hard drop\n  W / Up      Rotate CW   Q          Rotate CCW\n\n\
        CONTROLS (snake):\n  Arrows      Turn    Space/Enter  Restart after game over\n\n\
        CONTROLS (pong):\n  Mouse       Move paddle   Up/Down  Nudge paddle\n\n\
        Everywhere: P pauses, Esc or Ctrl-C quits."
)]
pub struct Args {
    /// Which game to play.
    #[arg(value_enum, default_value = "tetris")]
    pub game: GameKind,

    /// Seed for piece, food and serve randomness. Random if not set.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses built-in colours if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Disable the line-clear flash.
    #[arg(long)]
    pub no_animation: bool,

    /// Write log output to this file (filter with RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GameKind {
    #[default]
    Tetris,
    Snake,
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_tetris() {
        let args = Args::try_parse_from(["droptris"]).unwrap();
        assert_eq!(args.game, GameKind::Tetris);
        assert_eq!(args.seed, None);
        assert!(!args.no_animation);
    }

    #[test]
    fn test_parses_game_and_seed() {
        let args = Args::try_parse_from(["droptris", "snake", "--seed", "42"]).unwrap();
        assert_eq!(args.game, GameKind::Snake);
        assert_eq!(args.seed, Some(42));
    }

    #[test]
    fn test_rejects_unknown_game() {
        assert!(Args::try_parse_from(["droptris", "breakout"]).is_err());
    }
}
