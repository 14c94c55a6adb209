use std::path::PathBuf;

use serde::Serialize;

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// At least one face was found and blurred; the result was written.
    Blurred {
        /// Number of face regions blurred.
        faces: usize,
        /// Path of the written file.
        output: PathBuf,
    },
    /// No faces were found; the decoded image was written back unchanged.
    NoFaces {
        /// Path of the written file.
        output: PathBuf,
    },
    /// The file was skipped. Nothing was written for it.
    Failed {
        /// Human-readable error text.
        reason: String,
    },
}

/// Outcome for a single file, keyed by its file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// File name relative to the input directory.
    pub file_name: String,
    /// Processing result.
    pub outcome: FileOutcome,
}

impl FileReport {
    /// Whether an output file was written.
    pub fn is_written(&self) -> bool {
        !matches!(self.outcome, FileOutcome::Failed { .. })
    }
}

/// Per-file results for one run over an input directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Directory that was scanned.
    pub input_dir: PathBuf,
    /// Directory outputs were written to.
    pub output_dir: PathBuf,
    /// One entry per eligible input file, in processing order.
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub(crate) fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            files: Vec::new(),
        }
    }

    /// Files that produced an output.
    pub fn processed(&self) -> usize {
        self.files.iter().filter(|f| f.is_written()).count()
    }

    /// Files that were skipped because of an error.
    pub fn failed(&self) -> usize {
        self.files.len() - self.processed()
    }

    /// Total number of faces blurred across the batch.
    pub fn faces_blurred(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.outcome {
                FileOutcome::Blurred { faces, .. } => faces,
                _ => 0,
            })
            .sum()
    }
}
