//! Append-only candidate sink.
//!
//! Scan results are written one record per line (`location,KIND,argument`).
//! The sink never truncates: repeated scans of several modules accumulate in
//! the same file.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::candidate::{CandidateParseError, MutationCandidate};

/// Errors writing or reading candidate files.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink file could not be opened or written.
    #[error("cannot write candidates to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line of a candidate file is malformed.
    #[error("malformed candidate at {path}:{line}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: CandidateParseError,
    },
}

/// Appends candidate records to a file.
pub struct CandidateSink {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl CandidateSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SinkError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(CandidateSink {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Append one candidate.
    pub fn push(&mut self, candidate: &MutationCandidate) -> Result<(), SinkError> {
        writeln!(self.writer, "{}", candidate.to_record()).map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.written += 1;
        Ok(())
    }

    /// Append every candidate of `candidates`.
    pub fn extend<'a>(
        &mut self,
        candidates: impl IntoIterator<Item = &'a MutationCandidate>,
    ) -> Result<(), SinkError> {
        for candidate in candidates {
            self.push(candidate)?;
        }
        Ok(())
    }

    /// Number of records appended through this sink.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush buffered records to disk.
    pub fn finish(mut self) -> Result<usize, SinkError> {
        self.writer.flush().map_err(|source| SinkError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), count = self.written, "candidates written");
        Ok(self.written)
    }
}

/// Read every record of a candidate file. Blank lines are skipped.
pub fn read_candidates(path: impl AsRef<Path>) -> Result<Vec<MutationCandidate>, SinkError> {
    let path = path.as_ref();
    let io_err = |source| SinkError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_err)?);

    let mut candidates = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        let candidate =
            MutationCandidate::from_record(&line).map_err(|source| SinkError::Malformed {
                path: path.to_path_buf(),
                line: idx + 1,
                source,
            })?;
        candidates.push(candidate);
    }
    Ok(candidates)
}
