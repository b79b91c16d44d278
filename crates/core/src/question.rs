//! Question generation.
//!
//! Free questions pick both operands at random. A fixed table draws its
//! multipliers from a shuffled bag holding every value of the operand range
//! once, so a round of `span` questions visits each fact of the table exactly
//! once. The bag is refilled when it runs out.

use crate::config::OperandRange;
use crate::rng::RandomSource;
use crate::types::Question;

/// Produces multiplication facts inside a fixed operand range.
///
/// With a fixed multiplicand (a practice table) only the multiplier varies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionGenerator {
    range: OperandRange,
    table: Option<u32>,
    /// Shuffled multipliers for the table
    bag: Vec<u32>,
    /// Index into current bag
    bag_index: usize,
}

impl QuestionGenerator {
    pub fn new(range: OperandRange) -> Self {
        Self {
            range,
            table: None,
            bag: Vec::new(),
            bag_index: 0,
        }
    }

    pub fn for_table(range: OperandRange, table: u32) -> Self {
        Self {
            range,
            table: Some(table),
            bag: Vec::with_capacity(range.span() as usize),
            bag_index: 0,
        }
    }

    pub fn range(&self) -> OperandRange {
        self.range
    }

    pub fn table(&self) -> Option<u32> {
        self.table
    }

    /// Multipliers still in the current bag
    pub fn remaining(&self) -> &[u32] {
        self.bag.get(self.bag_index..).unwrap_or(&[])
    }

    /// Discard the current bag; the next table draw starts a fresh one.
    pub fn reset(&mut self) {
        self.bag.clear();
        self.bag_index = 0;
    }

    pub fn generate<R: RandomSource>(&mut self, rng: &mut R) -> Question {
        match self.table {
            Some(table) => {
                let b = self.draw(rng);
                Question::new(table, b)
            }
            None => {
                let a = self.pick(rng);
                let b = self.pick(rng);
                Question::new(a, b)
            }
        }
    }

    fn pick<R: RandomSource>(&self, rng: &mut R) -> u32 {
        self.range.min + rng.next_range(self.range.span())
    }

    fn draw<R: RandomSource>(&mut self, rng: &mut R) -> u32 {
        if self.bag_index >= self.bag.len() {
            self.refill_bag(rng);
        }
        let value = self.bag.get(self.bag_index).copied().unwrap_or(self.range.min);
        self.bag_index += 1;
        value
    }

    fn refill_bag<R: RandomSource>(&mut self, rng: &mut R) {
        self.bag.clear();
        self.bag.extend(self.range.min..=self.range.max);
        rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }
}
