use serde::Serialize;

use crate::annotate::AnnotatedSource;
use crate::error::ReportError;
use crate::totals::Totals;

/// Payload for one per-file report.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Annotated view of the source file; `lines` is empty when no locator
    /// produced source text.
    pub source_file: AnnotatedSource,

    /// Tests examined against the file's mutations, in execution order.
    pub tests_examined: Vec<String>,

    /// Mutation operators used, sorted.
    pub mutators_used: Vec<String>,

    /// Classes compiled from this file, sorted.
    pub mutated_classes: Vec<String>,

    /// Classified counts for the file, independent of annotation success.
    pub totals: Totals,
}

/// One file entry in a package index.
#[derive(Debug, Clone, Serialize)]
pub struct FileIndexEntry {
    pub file_name: String,

    /// Sink-relative path of the file's report.
    pub path: String,

    pub totals: Totals,
    pub mutation_score: f64,
}

/// Aggregate view of one package, with files sorted by name.
#[derive(Debug, Clone, Serialize)]
pub struct PackageSummaryReport {
    pub package_name: String,
    pub output_directory: String,
    pub totals: Totals,
    pub mutation_score: f64,
    pub files: Vec<FileIndexEntry>,
}

/// Payload for one per-package index report.
#[derive(Debug, Clone, Serialize)]
pub struct PackageIndex {
    pub package_data: PackageSummaryReport,
}

/// One package entry in the global index.
#[derive(Debug, Clone, Serialize)]
pub struct PackageIndexEntry {
    pub package_name: String,
    pub output_directory: String,

    /// Sink-relative path of the package's index report.
    pub path: String,

    pub totals: Totals,
    pub mutation_score: f64,
}

/// Payload for the global index report, listing every package.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalIndex {
    pub totals: Totals,
    pub mutation_score: f64,
    pub package_summaries: Vec<PackageIndexEntry>,
}

/// Turns report payloads into text for the output sink.
///
/// Byte-level formatting is the renderer's business; the driver only
/// decides paths and when to emit. An HTML renderer lives outside this
/// crate.
pub trait ReportRenderer {
    /// File extension for emitted reports, without the dot.
    fn extension(&self) -> &str;

    fn render_file(&self, report: &FileReport) -> Result<String, ReportError>;

    fn render_package_index(&self, index: &PackageIndex) -> Result<String, ReportError>;

    fn render_global_index(&self, index: &GlobalIndex) -> Result<String, ReportError>;
}

/// Renderer emitting pretty-printed JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render<T: Serialize>(value: &T) -> Result<String, ReportError> {
        let json = serde_json::to_string_pretty(value)?;
        Ok(json)
    }
}

impl ReportRenderer for JsonRenderer {
    fn extension(&self) -> &str {
        "json"
    }

    fn render_file(&self, report: &FileReport) -> Result<String, ReportError> {
        Self::render(report)
    }

    fn render_package_index(&self, index: &PackageIndex) -> Result<String, ReportError> {
        Self::render(index)
    }

    fn render_global_index(&self, index: &GlobalIndex) -> Result<String, ReportError> {
        Self::render(index)
    }
}
