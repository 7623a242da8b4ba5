use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const OPERAND_MIN: i32 = 1;
pub const OPERAND_MAX: i32 = 9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Add,
    Subtract,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
        }
    }

    pub fn apply(&self, a: i32, b: i32) -> i32 {
        match self {
            Operator::Add => a + b,
            Operator::Subtract => a - b,
        }
    }
}

/// One arithmetic prompt. Never mutated; the next trial replaces it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub operand_a: i32,
    pub operand_b: i32,
    pub operator: Operator,
    pub expected_result: i32,
}

impl Trial {
    pub fn new(operand_a: i32, operand_b: i32, operator: Operator) -> Self {
        Self {
            operand_a,
            operand_b,
            operator,
            expected_result: operator.apply(operand_a, operand_b),
        }
    }
}

impl fmt::Display for Trial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.operand_a,
            self.operator.symbol(),
            self.operand_b
        )
    }
}

pub struct TrialGenerator<R: Rng = StdRng> {
    rng: R,
}

impl TrialGenerator<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for TrialGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> TrialGenerator<R> {
    pub fn next(&mut self) -> Trial {
        let operand_a = self.rng.gen_range(OPERAND_MIN..=OPERAND_MAX);
        let operand_b = self.rng.gen_range(OPERAND_MIN..=OPERAND_MAX);
        let operator = if self.rng.gen_bool(0.5) {
            Operator::Add
        } else {
            Operator::Subtract
        };
        Trial::new(operand_a, operand_b, operator)
    }
}
