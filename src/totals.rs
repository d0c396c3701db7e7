use serde::{Deserialize, Serialize};

/// Four-count aggregate for mutation outcomes.
///
/// Forms a commutative monoid under [`Totals::add`] with the all-zero value
/// as identity, so file, package and global totals can be folded in any
/// order with the same result.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Totals {
    /// Mutations generated for the scope.
    pub generated: u64,

    /// Mutations detected by at least one test (including timeouts and
    /// mutations that could not be executed).
    pub killed: u64,

    /// Mutations that survived on a line exercised by some test.
    pub survived: u64,

    /// Mutations that survived on a line no test executed at all.
    pub no_coverage: u64,
}

impl Totals {
    /// The monoid identity.
    pub const ZERO: Totals = Totals {
        generated: 0,
        killed: 0,
        survived: 0,
        no_coverage: 0,
    };

    /// Accumulate `other` into `self`.
    pub fn add(&mut self, other: &Totals) {
        self.generated += other.generated;
        self.killed += other.killed;
        self.survived += other.survived;
        self.no_coverage += other.no_coverage;
    }

    /// Fold an iterator of totals into one.
    pub fn sum<I>(totals: I) -> Totals
    where
        I: IntoIterator<Item = Totals>,
    {
        let mut acc = Totals::ZERO;
        for t in totals {
            acc.add(&t);
        }
        acc
    }

    /// True when `generated == killed + survived + no_coverage`.
    ///
    /// Every summary produced by this crate satisfies this; a `false` here
    /// means classification drifted and the run must fail loudly.
    pub fn is_consistent(&self) -> bool {
        self.generated == self.killed + self.survived + self.no_coverage
    }

    /// Percentage of generated mutations that were killed.
    ///
    /// A scope with no mutations scores 100.0: there is nothing the tests
    /// failed to detect.
    pub fn mutation_score(&self) -> f64 {
        if self.generated == 0 {
            100.0
        } else {
            self.killed as f64 * 100.0 / self.generated as f64
        }
    }
}
