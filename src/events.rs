/// Requests a frontend can raise while the loop waits between generations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Close the host and stop the simulation
    Exit,
}
