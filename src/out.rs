use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::ReportError;

/// Output sink for rendered reports.
///
/// Paths are sink-relative and package-qualified (`com/example/Foo.java.json`)
/// or root-level (`index.json`). The caller writes and drops the writer;
/// dropping commits the report.
pub trait ReportSink {
    /// Open a writer for one report file.
    fn create(&self, relative_path: &str) -> Result<Box<dyn Write>, ReportError>;
}

/// Create the report at `relative_path` and write `text` into it.
pub fn write_report(
    sink: &dyn ReportSink,
    relative_path: &str,
    text: &str,
) -> Result<(), ReportError> {
    let mut writer = sink.create(relative_path)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|source| ReportError::Write {
            path: relative_path.to_string(),
            source,
        })?;
    Ok(())
}

/// Sink writing reports under a root directory, creating parents as needed.
#[derive(Debug, Clone)]
pub struct DirSink {
    root: PathBuf,
}

impl DirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ReportSink for DirSink {
    fn create(&self, relative_path: &str) -> Result<Box<dyn Write>, ReportError> {
        let path = self.root.join(relative_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ReportError::Write {
                path: relative_path.to_string(),
                source,
            })?;
        }
        let file = fs::File::create(&path).map_err(|source| ReportError::Write {
            path: relative_path.to_string(),
            source,
        })?;
        Ok(Box::new(file))
    }
}

/// Sink collecting reports in a shared in-memory map, for tests and
/// embedders that post-process reports themselves.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// UTF-8 contents of a committed report, if present.
    pub fn contents(&self, relative_path: &str) -> Option<String> {
        self.lock()
            .get(relative_path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Paths of all committed reports, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.files.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl ReportSink for MemorySink {
    fn create(&self, relative_path: &str) -> Result<Box<dyn Write>, ReportError> {
        Ok(Box::new(MemoryWriter {
            path: relative_path.to_string(),
            buffer: Vec::new(),
            files: Arc::clone(&self.files),
        }))
    }
}

/// Buffers writes and commits them to the shared map on drop.
struct MemoryWriter {
    path: String,
    buffer: Vec<u8>,
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        let mut files = self.files.lock().unwrap_or_else(|p| p.into_inner());
        files.insert(self.path.clone(), std::mem::take(&mut self.buffer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_sink_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirSink::new(dir.path());

        write_report(&sink, "com/example/Foo.java.json", "{}").unwrap();

        let written = fs::read_to_string(dir.path().join("com/example/Foo.java.json")).unwrap();
        assert_eq!(written, "{}");
    }

    #[test]
    fn dir_sink_writes_root_level_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirSink::new(dir.path());

        write_report(&sink, "index.json", "global").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("index.json")).unwrap(),
            "global"
        );
    }

    #[test]
    fn memory_sink_commits_on_drop() {
        let sink = MemorySink::new();

        {
            let mut writer = sink.create("index.json").unwrap();
            writer.write_all(b"partial").unwrap();
            // Not committed until the writer is dropped.
            assert_eq!(sink.contents("index.json"), None);
        }

        assert_eq!(sink.contents("index.json").as_deref(), Some("partial"));
        assert_eq!(sink.paths(), ["index.json"]);
    }

    #[test]
    fn memory_sink_lists_paths_sorted() {
        let sink = MemorySink::new();
        write_report(&sink, "zz.json", "z").unwrap();
        write_report(&sink, "aa.json", "a").unwrap();
        assert_eq!(sink.paths(), ["aa.json", "zz.json"]);
    }
}
