//! Directory batch processing into a submission file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{DocumentOutcome, Extractor};
use crate::error::Result;
use crate::render::SubmissionWriter;
use crate::source::{document_id, DocumentLoader};

/// Shared flag that stops a batch between (or during) documents.
pub type StopFlag = Arc<AtomicBool>;

/// Counts for a finished (or stopped) batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents found in the input directory
    pub total: usize,
    /// Documents processed to an outcome
    pub processed: usize,
    /// Documents written to the submission
    pub written: usize,
    /// Documents that produced no cells
    pub empty: usize,
    /// Documents that could not be read
    pub failed: usize,
    /// Pages skipped across all documents
    pub pages_skipped: usize,
    /// Cells written across all documents
    pub cells: usize,
    /// Whether the batch was stopped early
    pub cancelled: bool,
}

/// Progress notification for one finished document.
#[derive(Debug)]
pub struct BatchProgress<'a> {
    /// Position of the document in the batch (1-indexed)
    pub index: usize,
    /// Number of documents in the batch
    pub total: usize,
    /// Path of the document
    pub path: &'a Path,
    /// What happened to it
    pub outcome: &'a DocumentOutcome,
}

/// Runs an [`Extractor`] over every document in a directory.
pub struct BatchRunner {
    extractor: Extractor,
    loader: Box<dyn DocumentLoader>,
    stop: StopFlag,
}

impl BatchRunner {
    /// Create a runner.
    pub fn new(extractor: Extractor, loader: Box<dyn DocumentLoader>) -> Self {
        Self {
            extractor,
            loader,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use an externally owned stop flag.
    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    /// The stop flag; setting it stops the batch at the next page boundary.
    pub fn stop_flag(&self) -> StopFlag {
        Arc::clone(&self.stop)
    }

    /// Extractor in use.
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Documents in `dir` the loader accepts, ordered by file name.
    pub fn discover<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && self.loader.accepts(&path) {
                paths.push(path);
            }
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    /// Process every document in `dir`, writing rows to `sink`.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        dir: P,
        sink: &mut SubmissionWriter<W>,
    ) -> Result<BatchSummary> {
        self.run_with_progress(dir, sink, |_| {})
    }

    /// Process every document in `dir`, reporting each finished document.
    ///
    /// Only failures to list the directory or to write the submission end
    /// the batch with an error; every per-document problem is counted in
    /// the summary instead.
    pub fn run_with_progress<P, W, F>(
        &self,
        dir: P,
        sink: &mut SubmissionWriter<W>,
        progress: F,
    ) -> Result<BatchSummary>
    where
        P: AsRef<Path>,
        W: Write,
        F: FnMut(&BatchProgress<'_>),
    {
        let paths = self.discover(dir)?;
        self.run_paths(&paths, sink, progress)
    }

    /// Process an already discovered list of documents, in the given order.
    ///
    /// Lets a caller size its progress display from the same listing the
    /// batch works through.
    pub fn run_paths<W, F>(
        &self,
        paths: &[PathBuf],
        sink: &mut SubmissionWriter<W>,
        mut progress: F,
    ) -> Result<BatchSummary>
    where
        W: Write,
        F: FnMut(&BatchProgress<'_>),
    {
        let total = paths.len();
        let mut summary = BatchSummary {
            total,
            ..BatchSummary::default()
        };

        for (i, path) in paths.iter().enumerate() {
            if self.stop.load(Ordering::Relaxed) {
                summary.cancelled = true;
                break;
            }

            log::info!("[{}/{}] Processing: {}", i + 1, total, document_id(path));
            let outcome = self
                .extractor
                .extract_file_until(self.loader.as_ref(), path, &self.stop);

            match &outcome {
                DocumentOutcome::Extracted(result) => {
                    sink.write_document(result)?;
                    summary.written += 1;
                    summary.cells += result.cell_count();
                    log::info!(
                        "Saved result for {} with {} blocks",
                        result.id,
                        result.cell_count()
                    );
                }
                DocumentOutcome::Empty { id, .. } => {
                    summary.empty += 1;
                    log::info!("No cells extracted from {}, skipping", id);
                }
                DocumentOutcome::Failed { .. } => summary.failed += 1,
                DocumentOutcome::Cancelled { id } => {
                    log::warn!("Stopped while processing {}", id);
                    summary.cancelled = true;
                }
            }

            if summary.cancelled {
                break;
            }
            summary.processed += 1;
            summary.pages_skipped += outcome.skipped_pages().len();
            progress(&BatchProgress {
                index: i + 1,
                total,
                path,
                outcome: &outcome,
            });
        }

        log::info!(
            "Processing complete! {} files processed.",
            summary.processed
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractOptions;
    use crate::source::GlyphDumpLoader;

    fn runner() -> BatchRunner {
        BatchRunner::new(
            Extractor::new(ExtractOptions::new().sequential()),
            Box::new(GlyphDumpLoader::new()),
        )
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.json", "notes.txt", "C.JSON"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let names: Vec<String> = runner()
            .discover(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["C.JSON", "a.json", "b.json"]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = SubmissionWriter::new(Vec::new()).unwrap();
        assert!(runner().run(dir.path().join("absent"), &mut sink).is_err());
    }

    #[test]
    fn test_stopped_before_start() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"pages": []}"#).unwrap();

        let runner = runner();
        runner.stop_flag().store(true, Ordering::Relaxed);
        let mut sink = SubmissionWriter::new(Vec::new()).unwrap();
        let summary = runner.run(dir.path(), &mut sink).unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.processed, 0);
        assert_eq!(sink.rows(), 0);
    }

    #[test]
    fn test_run_paths_uses_the_given_listing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"pages": []}"#).unwrap();
        let runner = runner();
        let paths = runner.discover(dir.path()).unwrap();
        fs::write(dir.path().join("b.json"), r#"{"pages": []}"#).unwrap();

        let mut sink = SubmissionWriter::new(Vec::new()).unwrap();
        let mut seen = Vec::new();
        let summary = runner
            .run_paths(&paths, &mut sink, |progress| {
                seen.push((progress.index, progress.total));
            })
            .unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.processed, 1);
        assert_eq!(seen, vec![(1, 1)]);
    }
}
