use serde::{Deserialize, Serialize};

/// Outcome reported by the mutation engine for a single mutation.
///
/// Serialized in the engine's wire form (`KILLED`, `TIMED_OUT`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationStatus {
    /// At least one test failed while the mutation was active.
    Killed,

    /// Every test passed with the mutation active.
    Survived,

    /// The test run exceeded its time allowance.
    TimedOut,

    /// The mutated code could not be produced or loaded.
    NonViable,

    /// The test run aborted with a memory error.
    MemoryError,

    /// The test run aborted for any other reason.
    RunError,
}

/// A single mutation outcome as produced by the mutation engine.
///
/// Records are immutable inputs to the report core: they are grouped,
/// classified, and annotated, never modified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MutationRecord {
    /// Outcome of running the test suite against this mutation.
    pub status: MutationStatus,

    /// 1-indexed source line the mutation was applied to.
    pub line_number: u32,

    /// Short, stable identifier of the mutation operator
    /// (for example `NEGATE_CONDITIONALS`).
    pub mutator_id: String,

    /// Fully qualified name of the class the mutation lives in.
    pub owner_class: String,

    /// Name of the test that killed this mutation, when one did.
    pub killing_test: Option<String>,
}
