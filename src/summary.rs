use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::coverage::{LineCoverage, line_covered_by_any};
use crate::event::MutationMetadata;
use crate::record::{MutationRecord, MutationStatus};
use crate::totals::Totals;

/// Effective three-way outcome of a mutation after applying coverage facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Detected, or unable to survive (timeout, non-viable, run/memory error).
    Killed,

    /// Survived on a line exercised by at least one test.
    Survived,

    /// Survived on a line no test executed at all.
    NoCoverage,
}

/// Classify one mutation record against the coverage facts for its file.
///
/// A mutation is "survived" strictly when its status is `SURVIVED`; every
/// other status counts as killed. A survived mutation on a line that no test
/// exercised is reclassified as `NoCoverage`: an uncovered line cannot have
/// been meaningfully tested. This is the only place the killed / survived /
/// no-coverage taxonomy is computed; every consumer goes through it.
pub fn classify(
    record: &MutationRecord,
    classes: &BTreeSet<String>,
    coverage: &dyn LineCoverage,
) -> Outcome {
    match record.status {
        MutationStatus::Survived => {
            if line_covered_by_any(coverage, classes, record.line_number) {
                Outcome::Survived
            } else {
                Outcome::NoCoverage
            }
        }
        MutationStatus::Killed
        | MutationStatus::TimedOut
        | MutationStatus::NonViable
        | MutationStatus::MemoryError
        | MutationStatus::RunError => Outcome::Killed,
    }
}

/// Per-file aggregate state: everything the report needs for one logical
/// source file, with totals fixed at construction time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileSummary {
    /// Package the file belongs to.
    pub package_name: String,

    /// Simple name of the source file.
    pub file_name: String,

    /// Fully qualified names of the classes compiled from this file.
    pub classes: BTreeSet<String>,

    /// Mutation outcomes, in engine order.
    pub records: Vec<MutationRecord>,

    /// Tests examined against the mutations, in execution order.
    pub tests_examined: Vec<String>,

    /// Mutation operators used.
    pub mutators: BTreeSet<String>,

    /// Classified counts for this file.
    pub totals: Totals,
}

impl FileSummary {
    /// Build a summary from event metadata, classifying every record.
    pub fn build(metadata: MutationMetadata, coverage: &dyn LineCoverage) -> FileSummary {
        let mut totals = Totals::ZERO;
        for record in &metadata.records {
            totals.generated += 1;
            match classify(record, &metadata.classes, coverage) {
                Outcome::Killed => totals.killed += 1,
                Outcome::Survived => totals.survived += 1,
                Outcome::NoCoverage => totals.no_coverage += 1,
            }
        }

        FileSummary {
            package_name: metadata.package_name,
            file_name: metadata.file_name,
            classes: metadata.classes,
            records: metadata.records,
            tests_examined: metadata.tests_examined,
            mutators: metadata.mutators,
            totals,
        }
    }
}

/// Derive the report directory for a package.
///
/// Package separators become path separators; the unnamed package maps to
/// `default` so its reports never collide with the root-level index.
pub fn output_directory(package_name: &str) -> String {
    if package_name.is_empty() {
        "default".to_string()
    } else {
        package_name.replace('.', "/")
    }
}

/// Accumulating per-package state: every file summary merged for the
/// package during the run.
///
/// There is no cached totals field; [`PackageSummary::totals`] folds the
/// current file summaries on every read, so cached and live values cannot
/// diverge.
#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
    /// Package these summaries belong to.
    pub package_name: String,

    /// Report directory derived from the package name.
    pub output_directory: String,

    /// File summaries in merge order until sorted for the index.
    pub file_summaries: Vec<FileSummary>,
}

impl PackageSummary {
    pub fn new(package_name: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            output_directory: output_directory(package_name),
            file_summaries: Vec::new(),
        }
    }

    /// Fold of the current file summaries' totals.
    pub fn totals(&self) -> Totals {
        Totals::sum(self.file_summaries.iter().map(|f| f.totals))
    }

    /// Sort file summaries by file name (stable, for index emission).
    pub fn sort_file_summaries(&mut self) {
        self.file_summaries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    }
}
