use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use torus_life::config::Config;
use torus_life::game::Game;
use torus_life::game::Outcome;
use torus_life::grid::Grid;
use torus_life::pattern::Pattern;
use torus_life::terminal::Terminal;

fn main() -> anyhow::Result<()> {
    // Frames go to stdout, so keep the log on stderr. Redirect it to keep the screen clean.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("Invalid configuration")?;

    let pattern = match std::env::args_os().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            Pattern::load(&path).with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => Pattern::seed(),
    };

    let grid = Grid::from_pattern(&pattern).context("Pattern does not fit on the grid")?;

    let terminal = Terminal::new(config.cell_size).context("Failed to set up the terminal")?;
    let summary = Game::new(grid, terminal, config).run()?;

    match summary.outcome {
        Outcome::Extinct => info!(generations = summary.generations, "Population died out"),
        Outcome::Closed => info!(generations = summary.generations, "Window closed"),
    }

    Ok(())
}
