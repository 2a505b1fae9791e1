//! Result persistence.
//!
//! Every file is written to a temporary file in the destination directory
//! and renamed into place, so a failed persist leaves nothing at the final
//! path.

use std::io::Write;
use std::path::{Path, PathBuf};

use qexp_hal::Counts;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::error::{PipelineError, PipelineResult};
use crate::report::render_histogram;

/// Files written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPaths {
    /// `result_<id>.json`
    pub record: PathBuf,
    /// `result_<id>_histogram.txt`, when enabled.
    pub histogram: Option<PathBuf>,
}

/// Writes outcome tables under one output directory.
#[derive(Debug, Clone)]
pub struct ResultPersister {
    output_dir: PathBuf,
    histogram: bool,
}

impl ResultPersister {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            histogram: true,
        }
    }

    #[must_use]
    pub fn with_histogram(mut self, enabled: bool) -> Self {
        self.histogram = enabled;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the structured record for `source_id`.
    pub fn record_path(&self, source_id: &str) -> PathBuf {
        self.output_dir.join(format!("result_{source_id}.json"))
    }

    /// Path of the histogram for `source_id`.
    pub fn histogram_path(&self, source_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("result_{source_id}_histogram.txt"))
    }

    /// Write the record and, if enabled, the histogram.
    #[instrument(skip(self, counts), fields(dir = %self.output_dir.display()))]
    pub fn persist(
        &self,
        source_id: &str,
        counts: &Counts,
        shots: u32,
    ) -> PipelineResult<PersistedPaths> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| {
            PipelineError::PersistenceFailure {
                path: self.output_dir.clone(),
                source,
            }
        })?;

        let record = self.record_path(source_id);
        let staged_record = stage(&record, record_json(counts)?.as_bytes())?;
        let staged_histogram = if self.histogram {
            let path = self.histogram_path(source_id);
            let title = format!("Measurement outcomes for {source_id}");
            let staged = stage(&path, render_histogram(&title, counts, shots).as_bytes())?;
            Some((path, staged))
        } else {
            None
        };

        // Both files are complete on disk before either reaches its final name.
        commit(staged_record, &record)?;
        debug!("wrote {}", record.display());
        let histogram = match staged_histogram {
            Some((path, staged)) => {
                if let Err(e) = commit(staged, &path) {
                    let _ = std::fs::remove_file(&record);
                    return Err(e);
                }
                debug!("wrote {}", path.display());
                Some(path)
            }
            None => None,
        };

        Ok(PersistedPaths { record, histogram })
    }
}

/// Counts as a JSON object with 4-space indentation and sorted keys.
pub fn record_json(counts: &Counts) -> PipelineResult<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    counts
        .serialize(&mut ser)
        .map_err(|e| PipelineError::PersistenceFailure {
            path: PathBuf::from("<record>"),
            source: e.into(),
        })?;
    String::from_utf8(buf).map_err(|e| PipelineError::PersistenceFailure {
        path: PathBuf::from("<record>"),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

fn failure(path: &Path) -> impl Fn(std::io::Error) -> PipelineError + '_ {
    move |source| PipelineError::PersistenceFailure {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `contents` to a temporary file next to `path`.
fn stage(path: &Path, contents: &[u8]) -> PipelineResult<NamedTempFile> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(failure(path))?;
    tmp.write_all(contents).map_err(failure(path))?;
    tmp.as_file().sync_all().map_err(failure(path))?;
    Ok(tmp)
}

fn commit(staged: NamedTempFile, path: &Path) -> PipelineResult<()> {
    staged.persist(path).map_err(|e| failure(path)(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell_counts() -> Counts {
        [("11".to_string(), 500), ("00".to_string(), 524)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_record_json_layout() {
        let json = record_json(&bell_counts()).unwrap();
        assert_eq!(json, "{\n    \"00\": 524,\n    \"11\": 500\n}");
    }

    #[test]
    fn test_persist_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let persister = ResultPersister::new(dir.path());

        let paths = persister.persist("bell", &bell_counts(), 1024).unwrap();
        assert_eq!(paths.record, dir.path().join("result_bell.json"));
        let histogram = paths.histogram.unwrap();
        assert_eq!(histogram, dir.path().join("result_bell_histogram.txt"));

        let record: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.record).unwrap()).unwrap();
        assert_eq!(record["00"], 524);
        let text = std::fs::read_to_string(histogram).unwrap();
        assert!(text.contains("Dominant state: |00>"));
    }

    #[test]
    fn test_histogram_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let persister = ResultPersister::new(dir.path()).with_histogram(false);
        let paths = persister.persist("bell", &bell_counts(), 1024).unwrap();
        assert!(paths.histogram.is_none());
        assert!(!persister.histogram_path("bell").exists());
    }

    #[test]
    fn test_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("today");
        let paths = ResultPersister::new(&nested)
            .persist("bell", &bell_counts(), 1024)
            .unwrap();
        assert!(paths.record.starts_with(&nested));
    }

    #[test]
    fn test_unwritable_destination_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = ResultPersister::new(&blocker)
            .persist("bell", &bell_counts(), 1024)
            .unwrap_err();
        assert!(matches!(err, PipelineError::PersistenceFailure { .. }));
        assert!(!blocker.join("result_bell.json").exists());
    }

    #[test]
    fn test_failed_histogram_leaves_no_record() {
        let dir = tempfile::tempdir().unwrap();
        let persister = ResultPersister::new(dir.path());
        // A directory squatting on the histogram name makes the rename fail.
        std::fs::create_dir(persister.histogram_path("bell")).unwrap();

        let err = persister
            .persist("bell", &bell_counts(), 1024)
            .unwrap_err();
        assert!(matches!(err, PipelineError::PersistenceFailure { .. }));
        assert!(!persister.record_path("bell").exists());
    }
}
