use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::coverage::{LineCoverage, line_covered_by_any};
use crate::record::MutationRecord;

/// Group mutation records by source line.
///
/// Every record lands in exactly one group, and each group preserves the
/// relative order records had in the input. Lines without mutations are
/// simply absent; a missing key means "no mutations on this line".
pub fn group_mutations_by_line(records: &[MutationRecord]) -> BTreeMap<u32, Vec<MutationRecord>> {
    let mut grouped: BTreeMap<u32, Vec<MutationRecord>> = BTreeMap::new();
    for record in records {
        grouped
            .entry(record.line_number)
            .or_default()
            .push(record.clone());
    }
    grouped
}

/// One annotated source line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Line {
    /// 1-indexed line number.
    pub number: u32,

    /// Raw source text of the line, without the trailing newline.
    pub text: String,

    /// True when any class mapped to the file reports this line covered.
    pub covered: bool,

    /// Mutations applied to this line, in engine order.
    pub mutations: Vec<MutationRecord>,
}

/// Line-indexed annotated view of one source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotatedSource {
    /// Simple name of the source file.
    pub file_name: String,

    /// One entry per source line, in source order. Empty when no locator
    /// produced the source text.
    pub lines: Vec<Line>,

    /// The grouping the lines were built from; retains mutations on lines
    /// beyond the located source.
    pub mutations_by_line: BTreeMap<u32, Vec<MutationRecord>>,
}

/// Annotate located source text with mutations and coverage.
///
/// Produces exactly one [`Line`] per input line, numbered from 1 in source
/// order, including lines with no mutations. Empty source yields an empty
/// result.
pub fn annotate_source(
    source_text: &str,
    grouping: &BTreeMap<u32, Vec<MutationRecord>>,
    classes: &BTreeSet<String>,
    coverage: &dyn LineCoverage,
) -> Vec<Line> {
    source_text
        .lines()
        .enumerate()
        .map(|(index, text)| {
            let number = index as u32 + 1;
            Line {
                number,
                text: text.to_string(),
                covered: line_covered_by_any(coverage, classes, number),
                mutations: grouping.get(&number).cloned().unwrap_or_default(),
            }
        })
        .collect()
}

/// Lines in the grouping that no produced [`Line`] can reach because they
/// exceed the located source's line count.
pub fn unreachable_mutation_lines(
    grouping: &BTreeMap<u32, Vec<MutationRecord>>,
    source_line_count: usize,
) -> Vec<u32> {
    grouping
        .keys()
        .copied()
        .filter(|line| *line as usize > source_line_count)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::MemoryLineCoverage;
    use crate::record::MutationStatus;

    fn record(line: u32, mutator: &str) -> MutationRecord {
        MutationRecord {
            status: MutationStatus::Survived,
            line_number: line,
            mutator_id: mutator.to_string(),
            owner_class: "com.example.Foo".to_string(),
            killing_test: None,
        }
    }

    #[test]
    fn grouping_conserves_records_and_order() {
        let records = vec![
            record(2, "first_on_2"),
            record(5, "first_on_5"),
            record(2, "second_on_2"),
            record(2, "third_on_2"),
        ];

        let grouped = group_mutations_by_line(&records);

        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, records.len());

        let on_two: Vec<&str> = grouped[&2].iter().map(|r| r.mutator_id.as_str()).collect();
        assert_eq!(on_two, ["first_on_2", "second_on_2", "third_on_2"]);
        assert_eq!(grouped[&5].len(), 1);
        assert!(!grouped.contains_key(&1));
    }

    #[test]
    fn grouping_empty_input_is_empty() {
        assert!(group_mutations_by_line(&[]).is_empty());
    }

    #[test]
    fn annotate_produces_one_line_per_source_line() {
        let source = "a\nb\nc\nd\ne";
        let grouping = group_mutations_by_line(&[record(2, "m1"), record(5, "m2")]);
        let classes = BTreeSet::from(["com.example.Foo".to_string()]);

        let lines = annotate_source(source, &grouping, &classes, &MemoryLineCoverage::new());

        assert_eq!(lines.len(), 5);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.number, i as u32 + 1);
            let expect_mutations = line.number == 2 || line.number == 5;
            assert_eq!(!line.mutations.is_empty(), expect_mutations, "line {}", line.number);
        }
        assert_eq!(lines[0].text, "a");
        assert_eq!(lines[4].text, "e");
    }

    #[test]
    fn annotate_empty_source_is_empty() {
        let grouping = group_mutations_by_line(&[record(3, "m")]);
        let classes = BTreeSet::from(["com.example.Foo".to_string()]);
        let lines = annotate_source("", &grouping, &classes, &MemoryLineCoverage::new());
        assert!(lines.is_empty());
    }

    #[test]
    fn coverage_is_a_disjunction_across_mapped_classes() {
        let mut coverage = MemoryLineCoverage::new();
        coverage.cover("com.example.Foo$Inner", 2);

        let classes = BTreeSet::from([
            "com.example.Foo".to_string(),
            "com.example.Foo$Inner".to_string(),
        ]);

        let lines = annotate_source("x\ny\nz", &BTreeMap::new(), &classes, &coverage);
        assert!(!lines[0].covered);
        assert!(lines[1].covered);
        assert!(!lines[2].covered);
    }

    #[test]
    fn mutations_beyond_the_source_stay_in_the_grouping() {
        let grouping = group_mutations_by_line(&[record(2, "in"), record(99, "beyond")]);
        let classes = BTreeSet::from(["com.example.Foo".to_string()]);

        let lines = annotate_source("a\nb\nc", &grouping, &classes, &MemoryLineCoverage::new());

        assert_eq!(lines.len(), 3);
        assert!(grouping.contains_key(&99));
        assert_eq!(unreachable_mutation_lines(&grouping, lines.len()), [99]);
        assert!(unreachable_mutation_lines(&grouping, 99).is_empty());
    }
}
