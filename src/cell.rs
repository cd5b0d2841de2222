/// A single square of the board.
///
/// Every cell carries two flags: `alive` is what is drawn this frame, `alive_next_gen` is what
/// the rule computed for the following frame. The grid fills in every `alive_next_gen` before
/// touching any `alive`, so neighbor counts always read a consistent generation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Cell {
    pub row: usize,
    pub column: usize,

    alive: bool,
    alive_next_gen: bool,
}

impl Cell {
    /// Return a dead cell at the given position
    pub const fn dead(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            alive: false,
            alive_next_gen: false,
        }
    }

    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    pub const fn is_alive_next_gen(&self) -> bool {
        self.alive_next_gen
    }

    /// Bring the cell to life in the current generation. Only used while seeding.
    pub(crate) fn revive(&mut self) {
        self.alive = true;
    }

    pub(crate) fn set_next_gen(&mut self, alive: bool) {
        self.alive_next_gen = alive;
    }

    /// Commit the precomputed next generation.
    pub(crate) fn swap_generation(&mut self) {
        self.alive = self.alive_next_gen;
    }
}
