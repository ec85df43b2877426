use autodrop_core::Placement;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Still alive when the piece budget ran out.
    BudgetExhausted,
    /// A commit left something in the top row.
    TopOut,
}

/// What one driver iteration did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    pub placement: Placement,
    pub lines_cleared: u32,
    pub alive: bool,
}

/// Totals of a finished (or paused) run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Spawn counter minus one, the way the reference run reports it.
    pub pieces: u64,
    /// Raw spawn counter, including the initial spawn.
    pub spawned: u64,
    pub lines_cleared: u64,
    pub end: EndReason,
}

impl RunOutcome {
    pub fn topped_out(&self) -> bool {
        self.end == EndReason::TopOut
    }

    /// Spawn count at which the game ended, for the "game over after" line.
    pub fn game_over_after(&self) -> Option<u64> {
        self.topped_out().then_some(self.spawned)
    }
}
