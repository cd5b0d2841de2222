use std::io;
use std::time::Duration;

use tracing::debug;
use tracing::info;

use crate::config::Config;
use crate::events::Event;
use crate::grid::Grid;

/// Whatever shows the grid to the user.
pub trait Frontend {
    /// Show one frame. Only the current generation of each cell is meant to be drawn.
    fn draw(&mut self, grid: &Grid) -> io::Result<()>;

    /// Block for about `timeout`, handling input in the meantime. Returns early with the first
    /// event that should reach the loop.
    fn wait(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

impl<F: Frontend + ?Sized> Frontend for &mut F {
    fn draw(&mut self, grid: &Grid) -> io::Result<()> {
        (**self).draw(grid)
    }

    fn wait(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        (**self).wait(timeout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every cell died
    Extinct,

    /// The frontend asked to close
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub outcome: Outcome,

    /// Generations advanced before the loop ended
    pub generations: u64,
}

pub struct Game<F> {
    grid: Grid,
    frontend: F,
    config: Config,
    generation: u64,
}

impl<F: Frontend> Game<F> {
    pub fn new(grid: Grid, frontend: F, config: Config) -> Self {
        Self {
            grid,
            frontend,
            config,
            generation: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run one frame: compute the next generation, draw the current one, wait a tick, then swap.
    ///
    /// Returns `Some` once the loop should stop.
    pub fn tick(&mut self) -> io::Result<Option<Outcome>> {
        self.grid.compute_next_generation();
        self.frontend.draw(&self.grid)?;

        if let Some(Event::Exit) = self.frontend.wait(self.config.tick)? {
            info!(generation = self.generation, "Closed by the user");
            return Ok(Some(Outcome::Closed));
        }

        let population = self.grid.swap_generation();
        self.generation += 1;

        debug!(generation = self.generation, population, "Advanced");

        if population == 0 {
            info!(generation = self.generation, "End of the game");

            // Leave the empty board up for a moment. An exit request only cuts this short.
            self.frontend.draw(&self.grid)?;
            self.frontend.wait(self.config.linger)?;

            return Ok(Some(Outcome::Extinct));
        }

        Ok(None)
    }

    /// Tick until the population dies out or the frontend closes
    pub fn run(&mut self) -> io::Result<Summary> {
        info!(population = self.grid.population(), "Starting");

        loop {
            if let Some(outcome) = self.tick()? {
                return Ok(Summary {
                    outcome,
                    generations: self.generation,
                });
            }
        }
    }
}
