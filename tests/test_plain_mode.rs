//! Tests for plain-text transcription and resuming.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use spoken_ipa::config::TranscriptionConfig;
use spoken_ipa::pipeline::plain::file_lines;
use spoken_ipa::pipeline::{
    transcribe_file, transcribe_lines, CheckpointStore, OutputSink, PlainCheckpoint,
    PlainTextJob, Transcriber,
};
use spoken_ipa::tagger::HeuristicTagger;
use tempfile::tempdir;

/// Deterministic stand-in for the external phonemizer.
fn shout(text: &str) -> String {
    format!("{}\n", text.trim().to_uppercase())
}

fn transcriber(config: &TranscriptionConfig) -> Transcriber {
    Transcriber::new(Box::new(shout), Box::new(HeuristicTagger::new()), config)
}

const BOOK: &str = "Intro.\n\
It was\n\
CHAPTER\n\
One\n\
The end\n\
came.\n\
\n\
\n\
Then silence.\n\
trailing words";

fn append_garbage(path: &Path) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(b"half-written batch that never got checkpointed").unwrap();
}

mod output_format {
    use super::*;

    #[test]
    fn test_ipa_then_original_per_unit() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("book.txt");
        let output = dir.path().join("book.ipa.txt");
        fs::write(&input, "A cat\nsat.\n\n\nThe end.\n").unwrap();

        let config = TranscriptionConfig::default();
        transcribe_file(&transcriber(&config), &input, Some(&output), &config).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "A CAT SAT.\nA cat sat.\n\nTHE END.\nThe end.\n"
        );
    }

    #[test]
    fn test_chapter_heading_kept_together() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let config = TranscriptionConfig::default();
        let lines = file_lines("CHAPTER\nOne\nIt began.\n");

        transcribe_lines(&transcriber(&config), lines, Some(&output), &config).unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "CHAPTER ONE\n\nCHAPTER One\n\nIT BEGAN.\nIt began.\n"
        );
    }

    #[test]
    fn test_batch_size_does_not_change_output() {
        let dir = tempdir().unwrap();
        let mut outputs = Vec::new();
        for batch_size in [1, 2, 3, 32] {
            let output = dir.path().join(format!("out{}.txt", batch_size));
            let config = TranscriptionConfig::default().with_batch_size(batch_size);
            transcribe_lines(&transcriber(&config), file_lines(BOOK), Some(&output), &config)
                .unwrap();
            outputs.push(fs::read_to_string(&output).unwrap());
        }
        assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_failed_phonemizer_keeps_original_text() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let config = TranscriptionConfig::default().with_phonemizer_path("/nonexistent/flite");
        let transcriber = Transcriber::from_config(&config);

        transcribe_lines(&transcriber, file_lines("Hello.\n"), Some(&output), &config).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "\nHello.\n");
    }
}

mod resume {
    use super::*;

    fn uninterrupted(dir: &Path, config: &TranscriptionConfig) -> String {
        let output = dir.join("reference.txt");
        transcribe_lines(&transcriber(config), file_lines(BOOK), Some(&output), config).unwrap();
        fs::read_to_string(&output).unwrap()
    }

    #[test]
    fn test_resume_after_first_batch_is_byte_identical() {
        let dir = tempdir().unwrap();
        let config = TranscriptionConfig::default().with_batch_size(2);
        let expected = uninterrupted(dir.path(), &config);

        let output = dir.path().join("interrupted.txt");
        let store = CheckpointStore::for_output(&output);
        let t = transcriber(&config);
        {
            let mut job =
                PlainTextJob::new(&t, file_lines(BOOK), OutputSink::create(&output).unwrap(), &config)
                    .with_checkpoints(store.clone());
            assert!(job.step().unwrap());
        }

        // The first batch ends on the heading keyword, so the heading is
        // still buffered in the checkpoint.
        let checkpoint: PlainCheckpoint = store.load();
        assert_eq!(checkpoint.lines_processed, 3);
        assert!(checkpoint.carry.in_header);
        assert_eq!(checkpoint.carry.buffered, "\nCHAPTER ");

        append_garbage(&output);
        let resumed = config.clone().with_resume(true);
        transcribe_lines(&t, file_lines(BOOK), Some(&output), &resumed).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), expected);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_resume_without_checkpoint_starts_over() {
        let dir = tempdir().unwrap();
        let config = TranscriptionConfig::default().with_batch_size(2);
        let expected = uninterrupted(dir.path(), &config);

        let output = dir.path().join("stale.txt");
        fs::write(&output, "old contents").unwrap();
        let resumed = config.clone().with_resume(true);
        transcribe_lines(&transcriber(&config), file_lines(BOOK), Some(&output), &resumed).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), expected);
    }

    #[test]
    fn test_corrupt_checkpoint_starts_over() {
        let dir = tempdir().unwrap();
        let config = TranscriptionConfig::default().with_batch_size(2);
        let expected = uninterrupted(dir.path(), &config);

        let output = dir.path().join("corrupt.txt");
        fs::write(&output, "old contents").unwrap();
        fs::write(CheckpointStore::for_output(&output).path(), "not json").unwrap();
        let resumed = config.clone().with_resume(true);
        transcribe_lines(&transcriber(&config), file_lines(BOOK), Some(&output), &resumed).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), expected);
    }

    #[test]
    fn test_checkpoint_ignored_without_resume_flag() {
        let dir = tempdir().unwrap();
        let config = TranscriptionConfig::default().with_batch_size(2);
        let expected = uninterrupted(dir.path(), &config);

        let output = dir.path().join("fresh.txt");
        let store = CheckpointStore::for_output(&output);
        store
            .save(&PlainCheckpoint {
                lines_processed: 5,
                output_bytes: 0,
                ..Default::default()
            })
            .unwrap();
        transcribe_lines(&transcriber(&config), file_lines(BOOK), Some(&output), &config).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), expected);
    }
}
