//! # mutant-report
//!
//! Result-aggregation and source-annotation core for a mutation-testing
//! report generator. It consumes per-run test-completion events, groups
//! mutation outcomes by source package and file, merges line coverage onto
//! annotated source views, and produces hierarchical totals (file → package
//! → global) that stay numerically consistent at every level.
//!
//! The mutation engine, coverage collection, HTML templating and source
//! reading are external collaborators behind the [`SourceLocator`],
//! [`LineCoverage`], [`ReportSink`] and [`ReportRenderer`] capabilities.
//! The hosting test-run driver calls [`ReportDriver::on_run_start`], feeds
//! it [`TestEvent`]s, and finishes with [`ReportDriver::on_run_end`].

pub mod aggregate;
pub mod annotate;
pub mod coverage;
pub mod driver;
pub mod error;
pub mod event;
pub mod locate;
pub mod options;
pub mod out;
pub mod record;
pub mod render;
pub mod summary;
pub mod totals;
pub mod ui;

pub use aggregate::PackageAggregate;
pub use annotate::{AnnotatedSource, Line, annotate_source, group_mutations_by_line};
pub use coverage::{LineCoverage, MemoryLineCoverage, NoCoverage};
pub use driver::{ReportDriver, RunState};
pub use error::ReportError;
pub use event::{MutationMetadata, TestEvent};
pub use locate::{DirSourceLocator, MemorySourceLocator, SourceLocator};
pub use options::ReportOptions;
pub use out::{DirSink, MemorySink, ReportSink};
pub use record::{MutationRecord, MutationStatus};
pub use render::{FileReport, GlobalIndex, JsonRenderer, PackageIndex, ReportRenderer};
pub use summary::{FileSummary, PackageSummary};
pub use totals::Totals;
pub use ui::Ui;
