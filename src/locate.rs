use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

/// Strategy resolving a class/file reference to readable source text.
///
/// Returning `None` means "not mine"; I/O trouble while probing counts as
/// no match. Locators are composed as an ordered list and the first match
/// wins, so composition is deterministic.
pub trait SourceLocator {
    /// Source text for `file_name`, if this locator can find it.
    fn locate(&self, classes: &BTreeSet<String>, file_name: &str) -> Option<String>;
}

/// First match over an ordered collection of locators.
pub fn find_source(
    locators: &[Box<dyn SourceLocator>],
    classes: &BTreeSet<String>,
    file_name: &str,
) -> Option<String> {
    locators.iter().find_map(|l| l.locate(classes, file_name))
}

/// Locator searching one source-root directory.
///
/// Tries `root/file_name` first, then `root/<package path>/file_name` for
/// the package path implied by each class name, in class order.
#[derive(Debug, Clone)]
pub struct DirSourceLocator {
    root: PathBuf,
}

impl DirSourceLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceLocator for DirSourceLocator {
    fn locate(&self, classes: &BTreeSet<String>, file_name: &str) -> Option<String> {
        let mut candidates = vec![self.root.join(file_name)];
        for class in classes {
            if let Some(package_path) = package_path_of(class) {
                candidates.push(self.root.join(package_path).join(file_name));
            }
        }

        candidates
            .into_iter()
            .find_map(|path| fs::read_to_string(path).ok())
    }
}

/// Package path implied by a fully qualified class name
/// (`com.example.Foo` implies `com/example`).
fn package_path_of(class_name: &str) -> Option<String> {
    let (package, _) = class_name.rsplit_once('.')?;
    Some(package.replace('.', "/"))
}

/// Map-backed locator for tests and embedders that hold source in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySourceLocator {
    files: BTreeMap<String, String>,
}

impl MemorySourceLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register source text under a file name.
    pub fn insert(&mut self, file_name: impl Into<String>, text: impl Into<String>) {
        self.files.insert(file_name.into(), text.into());
    }
}

impl SourceLocator for MemorySourceLocator {
    fn locate(&self, _classes: &BTreeSet<String>, file_name: &str) -> Option<String> {
        self.files.get(file_name).cloned()
    }
}
