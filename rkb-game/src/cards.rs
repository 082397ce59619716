//! Random selection primitives: the shuffle and draw every part deals from.
//!
//! Parts never reach for a global generator. They hold a [`SharedRandom`]
//! handed to them at construction so a test (or a replay) can substitute a
//! scripted source without touching any other part.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of uniform randomness for the setup pipeline.
pub trait Randomizer {
    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Order in which a deck of `len` cards is dealt after shuffling.
    ///
    /// The default is a Fisher–Yates pass driven by [`Randomizer::next_unit`].
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..len).collect();
        knuth_shuffle(&mut order, self);
        order
    }
}

/// Random source shared by every part of one pipeline.
pub type SharedRandom = Rc<RefCell<dyn Randomizer>>;

/// Wrap a randomizer so several parts can draw from it in turn.
#[must_use]
pub fn shared<R: Randomizer + 'static>(source: R) -> SharedRandom {
    Rc::new(RefCell::new(source))
}

/// In-place Fisher–Yates shuffle.
///
/// For `i` from `len - 1` down to `1`, swaps element `i` with the element at
/// `floor((i + 1) * random())`.
pub fn knuth_shuffle<T, R>(items: &mut [T], rng: &mut R)
where
    R: Randomizer + ?Sized,
{
    let mut i = items.len().saturating_sub(1);
    while i > 0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let pick = (((i + 1) as f64) * rng.next_unit()).floor() as usize;
        items.swap(i, pick.min(i));
        i -= 1;
    }
}

/// Shuffle a deck using the permutation chosen by `rng`.
#[must_use]
pub fn shuffle<T>(items: Vec<T>, rng: &mut dyn Randomizer) -> Vec<T> {
    let order = rng.permutation(items.len());
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| slots.get_mut(index).and_then(Option::take))
        .collect()
}

/// Top `amount` cards of an already shuffled deck.
///
/// Drawing more cards than the deck holds returns the whole deck.
#[must_use]
pub fn draw<T>(mut cards: Vec<T>, amount: usize) -> Vec<T> {
    cards.truncate(amount);
    cards
}

/// Seeded generator used outside of tests.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: SmallRng,
    draws: u64,
}

impl SeededRandom {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Number of unit values drawn so far.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl Randomizer for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.r#gen::<f64>()
    }
}

/// Replays a fixed list of unit values, cycling when it runs out.
///
/// With [`ScriptedRandom::reversing`] the deck order is simply reversed,
/// which makes board and goal draws easy to predict.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
    reverse_decks: bool,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: 0,
            reverse_decks: false,
        }
    }

    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    #[must_use]
    pub fn reversing(values: Vec<f64>) -> Self {
        Self {
            reverse_decks: true,
            ..Self::new(values)
        }
    }
}

impl Randomizer for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }

    fn permutation(&mut self, len: usize) -> Vec<usize> {
        if self.reverse_decks {
            return (0..len).rev().collect();
        }
        let mut order: Vec<usize> = (0..len).collect();
        knuth_shuffle(&mut order, self);
        order
    }
}
