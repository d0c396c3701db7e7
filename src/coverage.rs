use std::collections::BTreeSet;

/// Line-coverage facts collected before mutation testing.
///
/// Implementations must tolerate classes they have never heard of by
/// reporting `false`; coverage lookup never fails.
pub trait LineCoverage {
    /// True when at least one test executed `line` of `class_name`.
    fn is_line_covered(&self, class_name: &str, line: u32) -> bool;
}

/// True when any of the classes mapped to a file reports the line covered.
///
/// One physical line may belong to several compiled classes (nested and
/// inner classes), so line coverage for a file is a disjunction across all
/// of them. This is the single coverage lookup used both for line
/// annotation and for reclassifying survived mutations.
pub fn line_covered_by_any(
    coverage: &dyn LineCoverage,
    classes: &BTreeSet<String>,
    line: u32,
) -> bool {
    classes.iter().any(|c| coverage.is_line_covered(c, line))
}

/// Coverage source that reports nothing covered.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCoverage;

impl LineCoverage for NoCoverage {
    fn is_line_covered(&self, _class_name: &str, _line: u32) -> bool {
        false
    }
}

/// In-memory coverage source backed by a set of `(class, line)` pairs.
///
/// Used by tests and by embedders that collect coverage themselves.
#[derive(Debug, Default, Clone)]
pub struct MemoryLineCoverage {
    covered: BTreeSet<(String, u32)>,
}

impl MemoryLineCoverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `line` of `class_name` as covered.
    pub fn cover(&mut self, class_name: impl Into<String>, line: u32) {
        self.covered.insert((class_name.into(), line));
    }
}

impl LineCoverage for MemoryLineCoverage {
    fn is_line_covered(&self, class_name: &str, line: u32) -> bool {
        self.covered.contains(&(class_name.to_string(), line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_class_reports_uncovered() {
        let coverage = MemoryLineCoverage::new();
        assert!(!coverage.is_line_covered("com.example.Nope", 1));
    }

    #[test]
    fn memory_coverage_tracks_pairs() {
        let mut coverage = MemoryLineCoverage::new();
        coverage.cover("com.example.Foo", 3);

        assert!(coverage.is_line_covered("com.example.Foo", 3));
        assert!(!coverage.is_line_covered("com.example.Foo", 4));
        assert!(!coverage.is_line_covered("com.example.Bar", 3));
    }

    #[test]
    fn file_coverage_is_a_disjunction_across_classes() {
        let mut coverage = MemoryLineCoverage::new();
        coverage.cover("com.example.Foo$Inner", 7);

        let classes = BTreeSet::from([
            "com.example.Foo".to_string(),
            "com.example.Foo$Inner".to_string(),
        ]);

        assert!(line_covered_by_any(&coverage, &classes, 7));
        assert!(!line_covered_by_any(&coverage, &classes, 8));
    }

    #[test]
    fn no_coverage_covers_nothing() {
        assert!(!NoCoverage.is_line_covered("com.example.Foo", 1));
    }
}
