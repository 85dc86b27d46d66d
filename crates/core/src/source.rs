//! Piece source module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm used in modern Tetris.
//! Each bag contains one of each piece (I, O, T, S, Z, J, L), shuffled.
//! Draws from the bag until empty, then generates a new bag.
//!
//! The session only talks to the [`PieceSource`] trait, so tests can script
//! exact sequences. [`SevenBag`] is the default implementation and uses a
//! simple LCG so a seed always replays the same game.

use crate::piece::Piece;
use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Where the session gets its pieces from
pub trait PieceSource {
    /// Draw the next piece in sequence
    fn next_piece(&mut self) -> Piece;

    /// A fresh piece of `kind`, outside the sequence (used for hold)
    fn piece(&self, kind: PieceKind) -> Piece {
        Piece::spawn(kind)
    }

    /// Reseed; the seed is remembered for [`PieceSource::reset`]
    fn set_seed(&mut self, seed: u32);

    /// Forget any pending pieces and start the sequence over
    fn reset(&mut self);
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct SevenBag {
    /// Undrawn pieces, front first
    bag: [PieceKind; 7],
    /// Index of the front of the bag
    bag_index: usize,
    rng: SimpleRng,
    seed: u32,
}

impl SevenBag {
    pub fn new(seed: u32) -> Self {
        Self {
            bag: PieceKind::ALL,
            bag_index: PieceKind::ALL.len(),
            rng: SimpleRng::new(seed),
            seed,
        }
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Kinds still waiting in the current bag, front first
    pub fn peek_bag(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }

    /// Draw the next kind, refilling first when the bag is empty
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }
        let kind = self.bag[self.bag_index];
        self.bag_index += 1;
        kind
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for SevenBag {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PieceSource for SevenBag {
    fn next_piece(&mut self) -> Piece {
        Piece::spawn(self.draw())
    }

    fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
        self.rng = SimpleRng::new(seed);
    }

    fn reset(&mut self) {
        self.bag_index = self.bag.len();
        self.rng = SimpleRng::new(self.seed);
    }
}
