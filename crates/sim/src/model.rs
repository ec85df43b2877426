//! Simulation model - one self-playing game.
//!
//! Owns the board, the piece source and the active piece; borrows the weights.
//! Each driver step searches the best landing for the current piece, commits it,
//! clears lines, and spawns the next piece while the game is alive.

use autodrop_core::{Board, PieceKind, Placement, RotationState};
use autodrop_engine::{collides, stamp, Lcg, PieceProvider, SimConfig};
use autodrop_eval::Weights;
use autodrop_search::{ExhaustiveSearch, INITIAL_BEST};

use crate::outcome::{EndReason, RunOutcome, StepReport};
use crate::SimError;

pub struct Simulation<'w, P: PieceProvider = Lcg> {
    board: Board,
    alive: bool,
    count: u64,
    current: PieceKind,
    next: PieceKind,
    rotation: usize,
    x: i32,
    y: i32,
    lines_cleared: u64,
    weights: &'w Weights,
    provider: P,
}

impl<'w> Simulation<'w, Lcg> {
    /// Game fed by the deterministic LCG seeded with `seed`.
    pub fn new(
        width: usize,
        height: usize,
        weights: &'w Weights,
        seed: u64,
    ) -> Result<Self, SimError> {
        Self::with_provider(width, height, weights, Lcg::new(seed))
    }
}

impl<'w> Simulation<'w, Box<dyn PieceProvider>> {
    pub fn from_config(config: &SimConfig, weights: &'w Weights) -> Result<Self, SimError> {
        config.validate()?;
        Self::with_provider(config.width, config.height, weights, config.provider())
    }
}

impl<'w, P: PieceProvider> Simulation<'w, P> {
    /// Allocates the board, queues the first piece, and spawns it.
    pub fn with_provider(
        width: usize,
        height: usize,
        weights: &'w Weights,
        mut provider: P,
    ) -> Result<Self, SimError> {
        let board = Board::new(width, height)?;
        let next = provider.next_kind();
        let mut sim = Self {
            board,
            alive: true,
            count: 0,
            current: next,
            next,
            rotation: 0,
            x: 0,
            y: 0,
            lines_cleared: 0,
            weights,
            provider,
        };
        sim.spawn();
        Ok(sim)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Raw spawn counter; the first spawn counts.
    #[inline]
    pub fn piece_count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn lines_cleared(&self) -> u64 {
        self.lines_cleared
    }

    #[inline]
    pub fn current_kind(&self) -> PieceKind {
        self.current
    }

    #[inline]
    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    #[inline]
    pub fn rotation_index(&self) -> usize {
        self.rotation
    }

    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[inline]
    pub fn weights(&self) -> &'w Weights {
        self.weights
    }

    fn current_rotation(&self) -> &'static RotationState {
        let rotations = self.current.rotations();
        &rotations[self.rotation.min(rotations.len() - 1)]
    }

    /// Promote the queued piece, reset rotation and position, queue a new one.
    /// No collision check happens here.
    pub fn spawn(&mut self) {
        self.count += 1;
        self.current = self.next;
        self.rotation = 0;
        self.x = self.board.width() as i32 / 2 - 1;
        self.y = 0;
        self.next = self.provider.next_kind();
    }

    /// Would the current piece, in rotation `rotation`, collide at (x, y)?
    /// Unknown rotation indices collide.
    pub fn collides(&self, x: i32, y: i32, rotation: usize) -> bool {
        match self.current.rotation(rotation) {
            Some(state) => collides(&self.board, state, x, y),
            None => true,
        }
    }

    /// Best landing for the current piece. The board is not touched.
    pub fn solve(&self) -> Option<Placement> {
        ExhaustiveSearch::new(self.weights).find_best_placement(&self.board, self.current)
    }

    /// Move the active piece to a placement's rotation and position.
    /// Rotation indices past the kind's cycle are clamped to the last one.
    pub fn set_placement(&mut self, placement: &Placement) {
        self.rotation = placement.rotation.min(self.current.rotation_count() - 1);
        self.x = placement.x;
        self.y = placement.y;
    }

    /// OR the active piece into the board. Any bit in the top row afterwards ends
    /// the game, whether or not this piece put it there.
    pub fn commit(&mut self) {
        let rotation = self.current_rotation();
        stamp(&mut self.board, rotation, self.x, self.y);
        if self.board.top_row_occupied() {
            self.alive = false;
        }
    }

    /// Clear full rows on the real board.
    pub fn try_melt(&mut self) -> u32 {
        self.board.clear_lines()
    }

    /// One driver iteration; `None` once the game is over.
    ///
    /// If no landing beats the initial incumbent, the piece is committed at
    /// rotation 0 in the top-left corner, which always tops out.
    pub fn step(&mut self) -> Option<StepReport> {
        if !self.alive {
            return None;
        }

        let placement = self
            .solve()
            .unwrap_or_else(|| Placement::new(self.current, 0, 0, 0).with_score(INITIAL_BEST));

        self.set_placement(&placement);
        self.commit();
        let lines = self.try_melt();
        self.lines_cleared += lines as u64;

        if self.alive {
            self.spawn();
        }

        Some(StepReport {
            placement,
            lines_cleared: lines,
            alive: self.alive,
        })
    }

    /// Run up to `limit` iterations or until top-out.
    pub fn run(&mut self, limit: u64) -> RunOutcome {
        self.run_observed(limit, |_| {})
    }

    /// Like [`Simulation::run`], calling `observe` after every iteration.
    pub fn run_observed<F>(&mut self, limit: u64, mut observe: F) -> RunOutcome
    where
        F: FnMut(&StepReport),
    {
        for _ in 0..limit {
            match self.step() {
                Some(report) => observe(&report),
                None => break,
            }
        }
        self.outcome()
    }

    /// Totals so far.
    pub fn outcome(&self) -> RunOutcome {
        RunOutcome {
            pieces: self.count.saturating_sub(1),
            spawned: self.count,
            lines_cleared: self.lines_cleared,
            end: if self.alive {
                EndReason::BudgetExhausted
            } else {
                EndReason::TopOut
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodrop_engine::{GeneratorKind, SevenBag};

    fn reference_sim(weights: &Weights) -> Simulation<'_> {
        Simulation::new(10, 20, weights, 12345).expect("simulation")
    }

    #[test]
    fn test_initial_state() {
        let weights = Weights::REFERENCE;
        let sim = reference_sim(&weights);
        assert!(sim.is_alive());
        assert_eq!(sim.piece_count(), 1);
        assert_eq!(sim.position(), (4, 0));
        assert_eq!(sim.rotation_index(), 0);
        // first two LCG draws for seed 12345 are both 6
        assert_eq!(sim.current_kind(), PieceKind::S);
        assert_eq!(sim.next_kind(), PieceKind::S);
        assert!(sim.board().is_empty());
    }

    #[test]
    fn test_spawn_promotes_queue() {
        let weights = Weights::REFERENCE;
        let mut sim = reference_sim(&weights);
        sim.set_placement(&Placement::new(PieceKind::S, 1, 7, 3));
        sim.spawn();
        assert_eq!(sim.piece_count(), 2);
        assert_eq!(sim.current_kind(), PieceKind::S);
        // third draw is 4
        assert_eq!(sim.next_kind(), PieceKind::J);
        assert_eq!(sim.rotation_index(), 0);
        assert_eq!(sim.position(), (4, 0));
    }

    #[test]
    fn test_first_steps_match_reference() {
        let weights = Weights::REFERENCE;
        let mut sim = reference_sim(&weights);
        let expected = [
            (PieceKind::S, 0, 0, 18),
            (PieceKind::S, 0, 2, 18),
            (PieceKind::J, 2, 7, 18),
            (PieceKind::Z, 0, 5, 18),
            (PieceKind::T, 2, 7, 17),
        ];
        for (kind, rotation, x, y) in expected {
            let report = sim.step().expect("alive");
            let p = report.placement;
            assert_eq!((p.kind, p.rotation, p.x, p.y), (kind, rotation, x, y));
        }
        assert_eq!(sim.piece_count(), 6);
    }

    #[test]
    fn test_commit_is_bitwise_or() {
        let weights = Weights::REFERENCE;
        let mut sim = reference_sim(&weights);
        sim.set_placement(&Placement::new(PieceKind::S, 0, 0, 18));
        sim.commit();
        sim.commit();
        assert_eq!(sim.board().row(18), 0b011);
        assert_eq!(sim.board().row(19), 0b110);
        assert!(sim.is_alive());
    }

    #[test]
    fn test_commit_in_top_row_tops_out() {
        let weights = Weights::REFERENCE;
        let mut sim = reference_sim(&weights);
        sim.set_placement(&Placement::new(PieceKind::S, 0, 0, 0));
        sim.commit();
        assert!(!sim.is_alive());
        assert_eq!(sim.step(), None);
        assert_eq!(sim.outcome().end, EndReason::TopOut);
    }

    #[test]
    fn test_top_out_triggers_without_touching_row_zero() {
        let weights = Weights::REFERENCE;
        let mut fresh = reference_sim(&weights);
        // left over in row 0 from an earlier commit
        fresh.board.or_row(0, 1 << 9);
        fresh.set_placement(&Placement::new(PieceKind::S, 0, 0, 18));
        fresh.commit();
        assert!(!fresh.is_alive());
    }

    #[test]
    fn test_collides_delegates_to_current_kind() {
        let weights = Weights::REFERENCE;
        let sim = reference_sim(&weights);
        assert!(sim.collides(-1, 0, 0));
        assert!(!sim.collides(0, 0, 0));
        assert!(sim.collides(0, 0, 9));
        // S vertical is 2 wide
        assert!(!sim.collides(8, 0, 1));
        assert!(sim.collides(9, 0, 1));
    }

    #[test]
    fn test_run_counts_reference_style() {
        let weights = Weights::REFERENCE;
        let mut sim = reference_sim(&weights);
        let outcome = sim.run(100);
        assert_eq!(outcome.pieces, 100);
        assert_eq!(outcome.spawned, 101);
        assert_eq!(outcome.lines_cleared, 38);
        assert_eq!(outcome.end, EndReason::BudgetExhausted);
    }

    #[test]
    fn test_run_resumes() {
        let weights = Weights::REFERENCE;
        let mut split = reference_sim(&weights);
        split.run(60);
        let resumed = split.run(40);

        let mut whole = reference_sim(&weights);
        assert_eq!(resumed, whole.run(100));
        assert_eq!(split.board(), whole.board());
    }

    #[test]
    fn test_high_stacking_weights_top_out() {
        let weights = Weights::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let mut sim = reference_sim(&weights);
        let outcome = sim.run(1000);
        assert_eq!(outcome.end, EndReason::TopOut);
        assert_eq!(outcome.pieces, 6);
        assert_eq!(outcome.lines_cleared, 0);
    }

    #[test]
    fn test_run_observed_sees_every_step() {
        let weights = Weights::REFERENCE;
        let mut sim = reference_sim(&weights);
        let mut steps = 0u64;
        let mut lines = 0u64;
        let outcome = sim.run_observed(250, |r| {
            steps += 1;
            lines += r.lines_cleared as u64;
        });
        assert_eq!(steps, 250);
        assert_eq!(lines, outcome.lines_cleared);
    }

    #[test]
    fn test_hopeless_weights_fall_back_and_top_out() {
        let weights = Weights::new([0.0, 0.0, -1e12, 0.0, 0.0, 0.0]);
        let mut sim = reference_sim(&weights);
        let report = sim.step().expect("first step runs");
        assert_eq!(report.placement.score, INITIAL_BEST);
        assert_eq!((report.placement.x, report.placement.y), (0, 0));
        assert!(!report.alive);
        assert_eq!(sim.outcome().pieces, 0);
    }

    #[test]
    fn test_from_config_and_bag() {
        let weights = Weights::REFERENCE;
        let cfg = SimConfig {
            generator: GeneratorKind::SevenBag,
            seed: 5,
            ..SimConfig::default()
        };
        let mut boxed = Simulation::from_config(&cfg, &weights).expect("simulation");
        let mut direct =
            Simulation::with_provider(10, 20, &weights, SevenBag::new(5)).expect("simulation");
        assert_eq!(boxed.run(200), direct.run(200));
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let weights = Weights::REFERENCE;
        assert!(matches!(
            Simulation::new(64, 20, &weights, 1),
            Err(SimError::Core(_))
        ));
        let cfg = SimConfig {
            height: 2,
            ..SimConfig::default()
        };
        assert!(matches!(
            Simulation::from_config(&cfg, &weights),
            Err(SimError::Config(_))
        ));
    }
}
