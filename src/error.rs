use std::io;

use thiserror::Error;

use crate::totals::Totals;

/// Errors produced by the report core.
///
/// Only lifecycle violations and totals mismatches are meant to abort a run;
/// they indicate a defect in the calling code or in classification. Write and
/// render failures are localized to a single report: the driver logs them on
/// the operator channel and moves on.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An operation was invoked while the driver was in the wrong state.
    #[error("{operation} called in {actual} state (expected {expected})")]
    Lifecycle {
        /// State the operation requires.
        expected: &'static str,
        /// State the driver was actually in.
        actual: &'static str,
        /// Name of the offending operation.
        operation: &'static str,
    },

    /// A file summary violated `generated == killed + survived + no_coverage`.
    #[error(
        "inconsistent totals for {file_name}: generated {g} != killed {k} + survived {s} + no coverage {n}",
        g = .totals.generated,
        k = .totals.killed,
        s = .totals.survived,
        n = .totals.no_coverage,
    )]
    TotalsMismatch {
        /// File whose summary failed the invariant.
        file_name: String,
        /// The offending counts.
        totals: Totals,
    },

    /// The output sink could not create or write a report file.
    #[error("failed to write report {path}")]
    Write {
        /// Sink-relative path of the report that failed.
        path: String,
        #[source]
        source: io::Error,
    },

    /// A report payload could not be serialized.
    #[error("failed to render report payload")]
    Render(#[from] serde_json::Error),
}
