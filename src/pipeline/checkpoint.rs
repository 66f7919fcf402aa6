//! Progress checkpoints for resumable runs.
//!
//! A checkpoint is a small JSON file next to the output (`<output>.ipa_checkpoint`)
//! or inside an output directory (`<output>/.ipa_checkpoint`). It is written
//! after every batch, when no work is outstanding, and deleted once the run
//! completes. A missing or unreadable checkpoint means "start from the
//! beginning".

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::text::CarryState;

/// File name of a checkpoint inside an output directory.
pub const DIRECTORY_CHECKPOINT_NAME: &str = ".ipa_checkpoint";

/// Suffix appended to an output file path.
pub const FILE_CHECKPOINT_SUFFIX: &str = ".ipa_checkpoint";

/// Checkpoint location for an output file or directory.
///
/// # Examples
///
/// ```
/// use spoken_ipa::pipeline::checkpoint::checkpoint_path;
/// use std::path::Path;
///
/// assert_eq!(
///     checkpoint_path(Path::new("/tmp/no-such-dir/output.txt")),
///     Path::new("/tmp/no-such-dir/output.txt.ipa_checkpoint")
/// );
/// ```
pub fn checkpoint_path(output: &Path) -> PathBuf {
    if output.is_dir() {
        return output.join(DIRECTORY_CHECKPOINT_NAME);
    }
    let mut name = OsString::from(output.as_os_str());
    name.push(FILE_CHECKPOINT_SUFFIX);
    PathBuf::from(name)
}

/// Progress of a plain-text run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainCheckpoint {
    /// Input lines consumed.
    #[serde(default)]
    pub lines_processed: usize,
    /// Output length after the last completed batch.
    #[serde(default)]
    pub output_bytes: u64,
    /// Segmenter state after the last consumed line.
    #[serde(flatten)]
    pub carry: CarryState,
}

/// Progress of an HTML run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlCheckpoint {
    /// Paragraphs written.
    #[serde(default)]
    pub paragraphs_processed: usize,
    /// Output length after the last completed batch.
    #[serde(default)]
    pub output_bytes: u64,
}

/// Progress of a directory run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryCheckpoint {
    /// Input files whose output is complete.
    #[serde(default)]
    pub completed_files: BTreeSet<String>,
}

/// Reads, writes and removes one checkpoint file.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for an output file or directory, see [`checkpoint_path`].
    pub fn for_output(output: &Path) -> Self {
        Self::new(checkpoint_path(output))
    }

    /// Checkpoint file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the checkpoint, `Ok(None)` if there is none.
    pub fn try_load<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::CheckpointUnreadable {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })
            },
        };
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|e| Error::CheckpointUnreadable {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    /// Load the checkpoint, falling back to "no progress" if it is missing or
    /// unreadable.
    pub fn load<T: DeserializeOwned + Default>(&self) -> T {
        match self.try_load() {
            Ok(Some(checkpoint)) => checkpoint,
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("Ignoring checkpoint: {}", e);
                T::default()
            },
        }
    }

    /// Write the checkpoint, replacing any previous one.
    pub fn save<T: Serialize>(&self, checkpoint: &T) -> Result<()> {
        let data = serde_json::to_string(checkpoint)?;
        let mut tmp = OsString::from(self.path.as_os_str());
        tmp.push(".tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Delete the checkpoint. A missing file is not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
