//! Directory mode: every file under a root, one output file each.
//!
//! `<root>/a/notes.txt` is written to `<output>/ipa_notes.txt`. Progress is
//! tracked per file only; a file interrupted halfway is redone from the start
//! on resume.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::TranscriptionConfig;
use crate::error::{Error, Result};

use super::checkpoint::{CheckpointStore, DirectoryCheckpoint, DIRECTORY_CHECKPOINT_NAME};
use super::output::OutputSink;
use super::plain::{file_lines, PlainTextJob};
use super::transcriber::Transcriber;

/// Prefix of every output file name.
pub const OUTPUT_PREFIX: &str = "ipa_";

/// Every regular file under `dir`, recursively, in sorted order.
///
/// Checkpoint files are left out.
pub fn collect_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_into(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_into(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_into(&path, out)?;
            continue;
        }
        let is_checkpoint = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == DIRECTORY_CHECKPOINT_NAME);
        if !is_checkpoint {
            out.push(path);
        }
    }
    Ok(())
}

/// Output path for `input` inside `output_dir`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> Option<PathBuf> {
    let name = input.file_name()?.to_str()?;
    Some(output_dir.join(format!("{}{}", OUTPUT_PREFIX, name)))
}

/// Transcribe every file under `input_dir` into `output_dir`.
///
/// The output directory is created if needed. The checkpoint inside it
/// lists the input files already done; with `config.resume` those are
/// skipped.
pub fn transcribe_directory(
    transcriber: &Transcriber,
    input_dir: &Path,
    output_dir: &Path,
    config: &TranscriptionConfig,
) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    let store = CheckpointStore::for_output(output_dir);
    let mut checkpoint = if config.resume {
        store.load::<DirectoryCheckpoint>()
    } else {
        DirectoryCheckpoint::default()
    };
    if !checkpoint.completed_files.is_empty() {
        log::info!(
            "Resuming: skipping {} already completed files",
            checkpoint.completed_files.len()
        );
    }

    for input in collect_input_files(input_dir)? {
        let key = input.display().to_string();
        if checkpoint.completed_files.contains(&key) {
            continue;
        }
        let output = output_path_for(&input, output_dir)
            .ok_or_else(|| Error::InvalidInput(format!("unusable file name: {}", key)))?;

        log::info!("Transcribing {} -> {}", key, output.display());
        let content = fs::read_to_string(&input)?;
        PlainTextJob::new(transcriber, file_lines(&content), OutputSink::create(&output)?, config)
            .run()?;

        checkpoint.completed_files.insert(key);
        store.save(&checkpoint)?;
    }

    store.remove()
}
