//! Adapter around the external grapheme-to-phoneme tool.
//!
//! The tool is invoked once per utterance as `<binary> -t "<utterance>" -i` and
//! prints IPA with stress marks on standard output. Failures never propagate
//! past [`Phonemizer::transcribe`]: a missing binary or a nonzero exit is
//! logged and yields an empty transcription, so one bad utterance cannot abort
//! a document.

use std::path::{Path, PathBuf};
use std::process::Command;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Error, Result};

/// Converts one utterance to raw IPA.
pub trait Phonemizer: Send + Sync {
    /// Transcribe `text`. Returns an empty string on failure.
    fn transcribe(&self, text: &str) -> String;
}

impl<F> Phonemizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn transcribe(&self, text: &str) -> String {
        self(text)
    }
}

/// Phonemizer backed by the `flite` binary.
#[derive(Debug, Clone)]
pub struct FlitePhonemizer {
    program: PathBuf,
}

impl FlitePhonemizer {
    /// Create a phonemizer that runs the binary at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the binary this phonemizer runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the binary once and return its output, or the reason it failed.
    pub fn try_transcribe(&self, text: &str) -> Result<String> {
        let program = self.program.display().to_string();
        let output = Command::new(&self.program)
            .arg("-t")
            .arg(text)
            .arg("-i")
            .output()
            .map_err(|source| Error::ExternalToolUnavailable {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::ExternalToolFailed {
                program,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Phonemizer for FlitePhonemizer {
    fn transcribe(&self, text: &str) -> String {
        match self.try_transcribe(text) {
            Ok(ipa) => ipa,
            Err(e) => {
                log::warn!("Phonemizer failed, using empty transcription: {}", e);
                String::new()
            },
        }
    }
}

/// Bounded pool for concurrent phonemizer calls.
///
/// Results always come back in submission order, whatever order the calls
/// finish in.
pub struct WorkerPool {
    pool: Option<ThreadPool>,
}

impl WorkerPool {
    /// Create a pool with `workers` threads (at least one).
    ///
    /// If the threads cannot be spawned the pool falls back to running calls
    /// on the caller's thread.
    pub fn new(workers: usize) -> Self {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("phonemizer-{}", i))
            .build();
        match pool {
            Ok(pool) => Self { pool: Some(pool) },
            Err(e) => {
                log::warn!("Could not start phonemizer pool, running sequentially: {}", e);
                Self { pool: None }
            },
        }
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.as_ref().map_or(1, |p| p.current_num_threads())
    }

    /// Transcribe every text, in order.
    pub fn transcribe_batch(&self, phonemizer: &dyn Phonemizer, texts: &[String]) -> Vec<String> {
        match &self.pool {
            Some(pool) => pool.install(|| {
                texts
                    .par_iter()
                    .map(|text| phonemizer.transcribe(text))
                    .collect()
            }),
            None => texts.iter().map(|text| phonemizer.transcribe(text)).collect(),
        }
    }
}

/// Transcribe `texts` with at most `workers` concurrent calls.
///
/// Builds a pool for this call only; long runs should keep a [`WorkerPool`].
pub fn transcribe_batch(phonemizer: &dyn Phonemizer, texts: &[String], workers: usize) -> Vec<String> {
    WorkerPool::new(workers).transcribe_batch(phonemizer, texts)
}
