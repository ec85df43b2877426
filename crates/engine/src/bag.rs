use autodrop_core::PieceKind;

use crate::generator::{Lcg, PieceProvider};

/// 7-bag randomizer: every bag holds each kind once, shuffled with its own LCG.
#[derive(Clone, Debug)]
pub struct SevenBag {
    pieces: [PieceKind; 7],
    index: usize,
    rng: Lcg,
}

impl SevenBag {
    pub fn new(seed: u64) -> Self {
        let mut bag = Self {
            pieces: PieceKind::ALL,
            index: 0,
            rng: Lcg::new(seed),
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        self.pieces = PieceKind::ALL;
        shuffle(&mut self.rng, &mut self.pieces);
        self.index = 0;
    }

    pub fn next_piece(&mut self) -> PieceKind {
        if self.index >= self.pieces.len() {
            self.refill();
        }
        let piece = self.pieces[self.index];
        self.index += 1;
        piece
    }

    /// Next piece without consuming it. Past the end of a bag this previews the
    /// next bag from a copy of the RNG, so it always matches the following draw.
    pub fn peek(&self) -> PieceKind {
        if self.index < self.pieces.len() {
            return self.pieces[self.index];
        }
        let mut rng = self.rng.clone();
        let mut next = PieceKind::ALL;
        shuffle(&mut rng, &mut next);
        next[0]
    }

    pub fn remaining(&self) -> &[PieceKind] {
        &self.pieces[self.index..]
    }
}

/// Fisher-Yates, highest index first.
fn shuffle(rng: &mut Lcg, pieces: &mut [PieceKind]) {
    for i in (1..pieces.len()).rev() {
        let j = rng.next_below(i as u32 + 1) as usize;
        pieces.swap(i, j);
    }
}

impl PieceProvider for SevenBag {
    fn next_kind(&mut self) -> PieceKind {
        self.next_piece()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bag_creation() {
        let bag = SevenBag::new(1);
        assert_eq!(bag.remaining().len(), 7);
    }

    #[test]
    fn test_each_bag_holds_every_kind() {
        let mut bag = SevenBag::new(42);
        for _ in 0..50 {
            let mut seen = [false; 7];
            for _ in 0..7 {
                seen[bag.next_piece().index()] = true;
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn test_bag_peek() {
        let mut bag = SevenBag::new(7);
        let peeked = bag.peek();
        // ensure peek doesn't consume
        assert_eq!(bag.peek(), peeked);
        assert_eq!(bag.next_piece(), peeked);
    }

    #[test]
    fn test_peek_across_bag_boundary() {
        let mut bag = SevenBag::new(3);
        for _ in 0..7 {
            bag.next_piece();
        }
        assert!(bag.remaining().is_empty());
        let peeked = bag.peek();
        assert_eq!(bag.next_piece(), peeked);
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = SevenBag::new(2024);
        let mut b = SevenBag::new(2024);
        for _ in 0..70 {
            assert_eq!(a.next_kind(), b.next_kind());
        }
    }
}
