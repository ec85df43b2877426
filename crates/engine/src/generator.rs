//! piece sources - deterministic LCG and the provider trait the simulation draws from

use autodrop_core::PieceKind;

/// Anything that can feed pieces to a simulation run.
/// `Send` so whole runs can be moved onto worker threads.
pub trait PieceProvider: Send {
    fn next_kind(&mut self) -> PieceKind;
}

impl<P: PieceProvider + ?Sized> PieceProvider for Box<P> {
    fn next_kind(&mut self) -> PieceKind {
        (**self).next_kind()
    }
}

/// Linear congruential generator with the glibc `rand()` constants.
/// The arithmetic wraps as 32-bit unsigned, so any conforming implementation
/// produces the same sequence from the same seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    const A: u32 = 1_103_515_245;
    const C: u32 = 12_345;

    /// Seeds wider than 32 bits are truncated.
    pub fn new(seed: u64) -> Self {
        Self { state: seed as u32 }
    }

    #[inline]
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance and return the high 15 bits of the new state.
    #[inline]
    pub fn next_raw(&mut self) -> u32 {
        self.state = Self::A.wrapping_mul(self.state).wrapping_add(Self::C);
        (self.state >> 16) & 0x7FFF
    }

    /// Next piece index in `0..7`.
    #[inline]
    pub fn next_index(&mut self) -> usize {
        (self.next_raw() % PieceKind::COUNT as u32) as usize
    }

    /// Uniform-ish value in `0..bound`, for shuffling. `bound` must be non-zero.
    #[inline]
    pub fn next_below(&mut self, bound: u32) -> u32 {
        self.next_raw() % bound
    }
}

impl PieceProvider for Lcg {
    #[inline]
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.next_index()]
    }
}
