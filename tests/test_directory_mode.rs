//! Tests for directory transcription.

use std::fs;
use std::path::Path;

use spoken_ipa::config::TranscriptionConfig;
use spoken_ipa::pipeline::{transcribe_directory, CheckpointStore, DirectoryCheckpoint, Transcriber};
use spoken_ipa::tagger::HeuristicTagger;
use tempfile::tempdir;

fn shout(text: &str) -> String {
    format!("{}\n", text.trim().to_uppercase())
}

fn transcriber(config: &TranscriptionConfig) -> Transcriber {
    Transcriber::new(Box::new(shout), Box::new(HeuristicTagger::new()), config)
}

fn populate(root: &Path) {
    fs::create_dir_all(root.join("part2")).unwrap();
    fs::write(root.join("first.txt"), "Hello there.\n").unwrap();
    fs::write(root.join("part2").join("second.txt"), "Good\nbye.\n").unwrap();
}

#[test]
fn test_every_file_transcribed() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    populate(&input);

    let config = TranscriptionConfig::default();
    transcribe_directory(&transcriber(&config), &input, &output, &config).unwrap();

    assert_eq!(
        fs::read_to_string(output.join("ipa_first.txt")).unwrap(),
        "HELLO THERE.\nHello there.\n"
    );
    assert_eq!(
        fs::read_to_string(output.join("ipa_second.txt")).unwrap(),
        "GOOD BYE.\nGood bye.\n"
    );
    assert!(!CheckpointStore::for_output(&output).path().exists());
}

#[test]
fn test_resume_skips_completed_files() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    populate(&input);
    fs::create_dir_all(&output).unwrap();

    let done = input.join("first.txt");
    fs::write(output.join("ipa_first.txt"), "already done").unwrap();
    let mut checkpoint = DirectoryCheckpoint::default();
    checkpoint.completed_files.insert(done.display().to_string());
    CheckpointStore::for_output(&output).save(&checkpoint).unwrap();

    let config = TranscriptionConfig::default().with_resume(true);
    transcribe_directory(&transcriber(&config), &input, &output, &config).unwrap();

    assert_eq!(fs::read_to_string(output.join("ipa_first.txt")).unwrap(), "already done");
    assert_eq!(
        fs::read_to_string(output.join("ipa_second.txt")).unwrap(),
        "GOOD BYE.\nGood bye.\n"
    );
    assert!(!CheckpointStore::for_output(&output).path().exists());
}

#[test]
fn test_without_resume_redoes_everything() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    populate(&input);
    fs::create_dir_all(&output).unwrap();
    fs::write(output.join("ipa_first.txt"), "stale").unwrap();

    let mut checkpoint = DirectoryCheckpoint::default();
    checkpoint
        .completed_files
        .insert(input.join("first.txt").display().to_string());
    CheckpointStore::for_output(&output).save(&checkpoint).unwrap();

    let config = TranscriptionConfig::default();
    transcribe_directory(&transcriber(&config), &input, &output, &config).unwrap();

    assert_eq!(
        fs::read_to_string(output.join("ipa_first.txt")).unwrap(),
        "HELLO THERE.\nHello there.\n"
    );
}
