use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::MutationRecord;

/// Mutation metadata embedded in a test-completion event.
///
/// Describes every mutation the engine applied to one logical source file,
/// along with the tests it examined and the mutators it used. Sets are
/// `BTreeSet` so iteration order is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MutationMetadata {
    /// Package the mutated file belongs to (for example `com.example`).
    pub package_name: String,

    /// Simple name of the source file (for example `Foo.java`).
    pub file_name: String,

    /// Fully qualified names of every class compiled from this file,
    /// including nested and inner classes.
    pub classes: BTreeSet<String>,

    /// Mutation outcomes, in the order the engine produced them.
    pub records: Vec<MutationRecord>,

    /// Identifiers of the tests examined against the mutations, in
    /// execution order.
    pub tests_examined: Vec<String>,

    /// Identifiers of the mutation operators used.
    pub mutators: BTreeSet<String>,
}

/// One per-run test-completion event.
///
/// The test-execution driver reports every completion (success, failure,
/// error, skip) through the same shape; only events carrying mutation
/// metadata contribute to the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestEvent {
    /// Human-readable description of the completed test.
    pub description: String,

    /// Mutation metadata, when this completion carries any.
    pub metadata: Option<MutationMetadata>,
}
