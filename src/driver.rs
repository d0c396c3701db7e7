use crate::aggregate::PackageAggregate;
use crate::annotate::{AnnotatedSource, annotate_source, group_mutations_by_line, unreachable_mutation_lines};
use crate::coverage::LineCoverage;
use crate::error::ReportError;
use crate::event::TestEvent;
use crate::locate::{SourceLocator, find_source};
use crate::options::ReportOptions;
use crate::out::{ReportSink, write_report};
use crate::render::{
    FileIndexEntry, FileReport, GlobalIndex, PackageIndex, PackageIndexEntry,
    PackageSummaryReport, ReportRenderer,
};
use crate::summary::{FileSummary, output_directory};
use crate::totals::Totals;
use crate::ui::Ui;

/// Lifecycle of one reporting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, run not started.
    Idle,

    /// Accepting test-completion events.
    Running,

    /// Run ended, index reports being emitted.
    Finalizing,

    /// Terminal; no further mutation is accepted.
    Done,
}

impl RunState {
    fn name(self) -> &'static str {
        match self {
            RunState::Idle => "Idle",
            RunState::Running => "Running",
            RunState::Finalizing => "Finalizing",
            RunState::Done => "Done",
        }
    }
}

/// Orchestrates one reporting run.
///
/// While running, every event that carries mutation metadata is folded into
/// the package aggregate and eagerly turned into one per-file report. At run
/// end the aggregate is folded into global totals and one index report per
/// package plus a global index are emitted.
///
/// Calls in the wrong state fail loudly with [`ReportError::Lifecycle`]:
/// they indicate the orchestrating caller violated the contract, and
/// silently ignoring them would hide inconsistent reports.
pub struct ReportDriver {
    state: RunState,
    aggregate: PackageAggregate,
    locators: Vec<Box<dyn SourceLocator>>,
    coverage: Box<dyn LineCoverage>,
    sink: Box<dyn ReportSink>,
    renderer: Box<dyn ReportRenderer>,
    options: ReportOptions,
    ui: Ui,
}

impl ReportDriver {
    pub fn new(
        options: ReportOptions,
        locators: Vec<Box<dyn SourceLocator>>,
        coverage: Box<dyn LineCoverage>,
        sink: Box<dyn ReportSink>,
        renderer: Box<dyn ReportRenderer>,
    ) -> Self {
        let ui = if options.quiet { Ui::silent() } else { Ui::new() };
        Self {
            state: RunState::Idle,
            aggregate: PackageAggregate::new(),
            locators,
            coverage,
            sink,
            renderer,
            options,
            ui,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Operator channel, exposed so callers can inspect its counters.
    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    /// Begin accepting events.
    pub fn on_run_start(&mut self) -> Result<(), ReportError> {
        self.expect_state(RunState::Idle, "on_run_start")?;
        self.state = RunState::Running;
        Ok(())
    }

    /// Process one test-completion event.
    ///
    /// Events without mutation metadata are ignored. For events with
    /// metadata: build the file summary, merge it into the aggregate, and
    /// eagerly emit one annotated per-file report. Emission failures are
    /// reported on the operator channel and skip only that report; they
    /// never disturb aggregation or subsequent files.
    pub fn on_test_complete(&mut self, event: TestEvent) -> Result<(), ReportError> {
        self.expect_state(RunState::Running, "on_test_complete")?;

        let Some(metadata) = event.metadata else {
            return Ok(());
        };

        let summary = FileSummary::build(metadata, self.coverage.as_ref());
        if !summary.totals.is_consistent() {
            return Err(ReportError::TotalsMismatch {
                file_name: summary.file_name,
                totals: summary.totals,
            });
        }

        self.aggregate.merge(summary.clone());

        if let Err(e) = self.emit_file_report(&summary) {
            self.ui.error(format!(
                "skipping report for {}/{}: {e}",
                summary.package_name, summary.file_name
            ));
        }

        Ok(())
    }

    /// End the run: fold global totals and emit the index reports.
    pub fn on_run_end(&mut self) -> Result<Totals, ReportError> {
        self.expect_state(RunState::Running, "on_run_end")?;
        self.state = RunState::Finalizing;

        let extension = self.renderer.extension().to_string();
        let mut global_totals = Totals::ZERO;
        let mut package_entries = Vec::new();

        for (_, mut package) in self.aggregate.snapshot() {
            package.sort_file_summaries();

            let totals = package.totals();
            global_totals.add(&totals);

            let files = package
                .file_summaries
                .iter()
                .map(|f| FileIndexEntry {
                    file_name: f.file_name.clone(),
                    path: format!("{}/{}.{extension}", package.output_directory, f.file_name),
                    totals: f.totals,
                    mutation_score: f.totals.mutation_score(),
                })
                .collect();

            let index = PackageIndex {
                package_data: PackageSummaryReport {
                    package_name: package.package_name.clone(),
                    output_directory: package.output_directory.clone(),
                    totals,
                    mutation_score: totals.mutation_score(),
                    files,
                },
            };

            let index_path = format!("{}/index.{extension}", package.output_directory);
            if let Err(e) = self.emit_package_index(&index_path, &index) {
                self.ui
                    .error(format!("skipping package index {index_path}: {e}"));
            }

            package_entries.push(PackageIndexEntry {
                package_name: package.package_name,
                output_directory: package.output_directory,
                path: index_path,
                totals,
                mutation_score: totals.mutation_score(),
            });
        }

        let global = GlobalIndex {
            totals: global_totals,
            mutation_score: global_totals.mutation_score(),
            package_summaries: package_entries,
        };

        let global_path = format!("index.{extension}");
        if let Err(e) = self.emit_global_index(&global_path, &global) {
            self.ui
                .error(format!("skipping global index {global_path}: {e}"));
        }

        self.state = RunState::Done;
        Ok(global_totals)
    }

    fn emit_file_report(&mut self, summary: &FileSummary) -> Result<(), ReportError> {
        let grouping = group_mutations_by_line(&summary.records);

        // Locating source and writing the report both touch I/O; neither
        // happens while the aggregate lock is held.
        let source = find_source(&self.locators, &summary.classes, &summary.file_name);

        let lines = match &source {
            Some(text) => {
                annotate_source(text, &grouping, &summary.classes, self.coverage.as_ref())
            }
            None => Vec::new(),
        };

        if source.is_some() && self.options.warn_unreachable_mutations {
            let unreachable = unreachable_mutation_lines(&grouping, lines.len());
            if !unreachable.is_empty() {
                self.ui.warn(format!(
                    "{}/{}: mutations on lines {unreachable:?} are beyond the located source ({} lines)",
                    summary.package_name,
                    summary.file_name,
                    lines.len(),
                ));
            }
        }

        let report = FileReport {
            source_file: AnnotatedSource {
                file_name: summary.file_name.clone(),
                lines,
                mutations_by_line: grouping,
            },
            tests_examined: summary.tests_examined.clone(),
            mutators_used: summary.mutators.iter().cloned().collect(),
            mutated_classes: summary.classes.iter().cloned().collect(),
            totals: summary.totals,
        };

        let path = format!(
            "{}/{}.{}",
            output_directory(&summary.package_name),
            summary.file_name,
            self.renderer.extension(),
        );
        let text = self.renderer.render_file(&report)?;
        write_report(self.sink.as_ref(), &path, &text)
    }

    fn emit_package_index(&self, path: &str, index: &PackageIndex) -> Result<(), ReportError> {
        let text = self.renderer.render_package_index(index)?;
        write_report(self.sink.as_ref(), path, &text)
    }

    fn emit_global_index(&self, path: &str, index: &GlobalIndex) -> Result<(), ReportError> {
        let text = self.renderer.render_global_index(index)?;
        write_report(self.sink.as_ref(), path, &text)
    }

    fn expect_state(
        &self,
        expected: RunState,
        operation: &'static str,
    ) -> Result<(), ReportError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ReportError::Lifecycle {
                expected: expected.name(),
                actual: self.state.name(),
                operation,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::MemoryLineCoverage;
    use crate::event::MutationMetadata;
    use crate::locate::MemorySourceLocator;
    use crate::out::MemorySink;
    use crate::record::{MutationRecord, MutationStatus};
    use crate::render::JsonRenderer;
    use std::collections::BTreeSet;

    fn record(status: MutationStatus, line: u32) -> MutationRecord {
        MutationRecord {
            status,
            line_number: line,
            mutator_id: "NEGATE_CONDITIONALS".to_string(),
            owner_class: "com.example.Foo".to_string(),
            killing_test: match status {
                MutationStatus::Killed => Some("com.example.FooTest.testBar".to_string()),
                _ => None,
            },
        }
    }

    fn metadata(records: Vec<MutationRecord>) -> MutationMetadata {
        MutationMetadata {
            package_name: "com.example".to_string(),
            file_name: "Foo.java".to_string(),
            classes: BTreeSet::from(["com.example.Foo".to_string()]),
            records,
            tests_examined: vec!["com.example.FooTest.testBar".to_string()],
            mutators: BTreeSet::from(["NEGATE_CONDITIONALS".to_string()]),
        }
    }

    fn event(records: Vec<MutationRecord>) -> TestEvent {
        TestEvent {
            description: "com.example.FooTest".to_string(),
            metadata: Some(metadata(records)),
        }
    }

    fn driver(locator: MemorySourceLocator, coverage: MemoryLineCoverage, sink: MemorySink) -> ReportDriver {
        let mut options = ReportOptions::new();
        options.quiet = true;
        ReportDriver::new(
            options,
            vec![Box::new(locator)],
            Box::new(coverage),
            Box::new(sink),
            Box::new(JsonRenderer::new()),
        )
    }

    #[test]
    fn events_before_run_start_fail_loudly() {
        let mut d = driver(
            MemorySourceLocator::new(),
            MemoryLineCoverage::new(),
            MemorySink::new(),
        );
        let err = d.on_test_complete(event(Vec::new())).unwrap_err();
        assert!(matches!(err, ReportError::Lifecycle { operation: "on_test_complete", .. }));
    }

    #[test]
    fn events_after_done_fail_loudly() {
        let mut d = driver(
            MemorySourceLocator::new(),
            MemoryLineCoverage::new(),
            MemorySink::new(),
        );
        d.on_run_start().unwrap();
        d.on_run_end().unwrap();
        assert_eq!(d.state(), RunState::Done);

        assert!(d.on_test_complete(event(Vec::new())).is_err());
        assert!(d.on_run_end().is_err());
        assert!(d.on_run_start().is_err());
    }

    #[test]
    fn events_without_metadata_are_ignored() {
        let sink = MemorySink::new();
        let mut d = driver(
            MemorySourceLocator::new(),
            MemoryLineCoverage::new(),
            sink.clone(),
        );
        d.on_run_start().unwrap();
        d.on_test_complete(TestEvent {
            description: "plain test".to_string(),
            metadata: None,
        })
        .unwrap();
        assert_eq!(d.state(), RunState::Running);

        let totals = d.on_run_end().unwrap();
        assert_eq!(totals, Totals::ZERO);
        // Only the global index is emitted.
        assert_eq!(sink.paths(), ["index.json"]);
    }

    #[test]
    fn end_to_end_totals_match_at_every_level() {
        let mut locator = MemorySourceLocator::new();
        locator.insert("Foo.java", "line one\nline two\nline three\nline four\n");

        let mut coverage = MemoryLineCoverage::new();
        coverage.cover("com.example.Foo", 1);
        coverage.cover("com.example.Foo", 2);
        coverage.cover("com.example.Foo", 3);

        let sink = MemorySink::new();
        let mut d = driver(locator, coverage, sink.clone());

        d.on_run_start().unwrap();
        d.on_test_complete(event(vec![
            record(MutationStatus::Killed, 1),
            record(MutationStatus::Killed, 2),
            record(MutationStatus::Survived, 3),
            record(MutationStatus::Survived, 4),
        ]))
        .unwrap();
        let totals = d.on_run_end().unwrap();

        let expected = Totals {
            generated: 4,
            killed: 2,
            survived: 1,
            no_coverage: 1,
        };
        assert_eq!(totals, expected);

        let file: serde_json::Value =
            serde_json::from_str(&sink.contents("com/example/Foo.java.json").unwrap()).unwrap();
        assert_eq!(file["totals"]["generated"], 4);
        assert_eq!(file["source_file"]["lines"].as_array().unwrap().len(), 4);
        assert_eq!(file["source_file"]["lines"][2]["covered"], true);
        assert_eq!(file["source_file"]["lines"][3]["covered"], false);

        let package: serde_json::Value =
            serde_json::from_str(&sink.contents("com/example/index.json").unwrap()).unwrap();
        assert_eq!(package["package_data"]["totals"]["killed"], 2);
        assert_eq!(package["package_data"]["totals"]["no_coverage"], 1);

        let global: serde_json::Value =
            serde_json::from_str(&sink.contents("index.json").unwrap()).unwrap();
        assert_eq!(global["totals"]["generated"], 4);
        assert_eq!(global["mutation_score"], 50.0);
        assert_eq!(
            global["package_summaries"][0]["package_name"],
            "com.example"
        );
    }

    #[test]
    fn missing_source_still_emits_the_file_report() {
        let sink = MemorySink::new();
        let mut d = driver(
            MemorySourceLocator::new(),
            MemoryLineCoverage::new(),
            sink.clone(),
        );

        d.on_run_start().unwrap();
        d.on_test_complete(event(vec![record(MutationStatus::Killed, 3)]))
            .unwrap();
        let totals = d.on_run_end().unwrap();

        // Totals are independent of annotation success.
        assert_eq!(totals.generated, 1);

        let file: serde_json::Value =
            serde_json::from_str(&sink.contents("com/example/Foo.java.json").unwrap()).unwrap();
        assert!(file["source_file"]["lines"].as_array().unwrap().is_empty());
        assert!(file["source_file"]["mutations_by_line"]["3"].is_array());
    }

    #[test]
    fn mutation_beyond_source_warns_once_per_file() {
        let mut locator = MemorySourceLocator::new();
        locator.insert("Foo.java", "only line\n");

        let sink = MemorySink::new();
        let mut d = driver(locator, MemoryLineCoverage::new(), sink);

        d.on_run_start().unwrap();
        d.on_test_complete(event(vec![
            record(MutationStatus::Killed, 1),
            record(MutationStatus::Killed, 40),
        ]))
        .unwrap();

        assert_eq!(d.ui().warnings(), 1);
    }

    #[test]
    fn index_files_are_sorted_by_file_name() {
        let mut locator = MemorySourceLocator::new();
        locator.insert("Zed.java", "z\n");
        locator.insert("Abel.java", "a\n");

        let sink = MemorySink::new();
        let mut d = driver(locator, MemoryLineCoverage::new(), sink.clone());

        d.on_run_start().unwrap();
        for name in ["Zed.java", "Abel.java"] {
            let mut m = metadata(vec![record(MutationStatus::Killed, 1)]);
            m.file_name = name.to_string();
            d.on_test_complete(TestEvent {
                description: "t".to_string(),
                metadata: Some(m),
            })
            .unwrap();
        }
        d.on_run_end().unwrap();

        let package: serde_json::Value =
            serde_json::from_str(&sink.contents("com/example/index.json").unwrap()).unwrap();
        let names: Vec<&str> = package["package_data"]["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["file_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Abel.java", "Zed.java"]);
    }
}
