//! Plain-text mode.
//!
//! ```text
//! lines ─→ normalize ─→ segmenter ─┬─ unit ──────→ batch ─→ Transcriber ─┐
//!                                  └─ blank line ─→ (kept in place) ─────┴─→ output
//! ```
//!
//! Every input line is normalized and fed through the segmenter. Completed
//! units wait in a batch; blank-line markers wait alongside them in document
//! order. When the batch holds `batch_size` units it is transcribed, written
//! and checkpointed. Each unit is written as its IPA line followed by the
//! original text.

use std::fs;
use std::path::Path;

use crate::config::TranscriptionConfig;
use crate::error::Result;
use crate::text::{normalize, CarryState};

use super::checkpoint::{CheckpointStore, PlainCheckpoint};
use super::output::OutputSink;
use super::transcriber::Transcriber;

/// One pending piece of output, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Text to transcribe.
    Unit(String),
    /// Blank-line marker, written as-is.
    Verbatim(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Reading,
    Checkpointing,
    Done,
}

/// A plain-text transcription in progress.
///
/// Drive it with [`step`](Self::step), one batch per call, or run it to the
/// end with [`run`](Self::run). Dropping a job between steps leaves the
/// output and checkpoint consistent with each other.
pub struct PlainTextJob<'a> {
    transcriber: &'a Transcriber,
    lines: Vec<String>,
    next_line: usize,
    carry: CarryState,
    pending: Vec<Segment>,
    pending_units: usize,
    input_done: bool,
    sink: OutputSink,
    store: Option<CheckpointStore>,
    batch_size: usize,
    phase: Phase,
}

impl<'a> PlainTextJob<'a> {
    /// Create a job over `lines`, starting at the first line.
    pub fn new(
        transcriber: &'a Transcriber,
        lines: Vec<String>,
        sink: OutputSink,
        config: &TranscriptionConfig,
    ) -> Self {
        Self {
            transcriber,
            lines,
            next_line: 0,
            carry: CarryState::new(),
            pending: Vec::new(),
            pending_units: 0,
            input_done: false,
            sink,
            store: None,
            batch_size: config.batch_size.max(1),
            phase: Phase::Reading,
        }
    }

    /// Write a checkpoint to `store` after every batch.
    pub fn with_checkpoints(mut self, store: CheckpointStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Continue from a checkpoint instead of the first line.
    ///
    /// The sink must already be positioned at `checkpoint.output_bytes`.
    pub fn resume_from(mut self, checkpoint: PlainCheckpoint) -> Self {
        self.next_line = checkpoint.lines_processed.min(self.lines.len());
        self.carry = checkpoint.carry;
        self
    }

    /// Number of input lines consumed so far.
    pub fn lines_processed(&self) -> usize {
        self.next_line
    }

    /// Process one batch and checkpoint it. Returns `false` once the whole
    /// input has been written.
    pub fn step(&mut self) -> Result<bool> {
        while self.phase == Phase::Reading {
            self.read_next()?;
        }
        if self.phase == Phase::Checkpointing {
            self.checkpoint()?;
        }
        Ok(self.phase != Phase::Done)
    }

    /// Process the remaining input.
    pub fn run(mut self) -> Result<()> {
        while self.step()? {}
        Ok(())
    }

    fn read_next(&mut self) -> Result<()> {
        if self.next_line >= self.lines.len() {
            // End of input: whatever is still buffered is the last unit.
            if let Some(rest) = std::mem::take(&mut self.carry).finish() {
                self.push(Segment::Unit(rest));
            }
            self.flush()?;
            self.input_done = true;
            self.phase = Phase::Checkpointing;
            return Ok(());
        }

        let normalized = normalize(&self.lines[self.next_line]);
        let (emitted, carry) = std::mem::take(&mut self.carry).advance(&normalized);
        self.carry = carry;
        self.next_line += 1;

        match emitted {
            Some(marker) if marker == "\n" => self.push(Segment::Verbatim(marker)),
            Some(unit) => self.push(Segment::Unit(unit)),
            None => {},
        }

        if self.pending_units >= self.batch_size {
            self.flush()?;
            self.phase = Phase::Checkpointing;
        }
        Ok(())
    }

    fn push(&mut self, segment: Segment) {
        if matches!(segment, Segment::Unit(_)) {
            self.pending_units += 1;
        }
        self.pending.push(segment);
    }

    /// Transcribe pending units and write everything pending, in order.
    fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let texts: Vec<String> = self
            .pending
            .iter()
            .filter_map(|segment| match segment {
                Segment::Unit(text) => Some(text.clone()),
                Segment::Verbatim(_) => None,
            })
            .collect();
        log::debug!("Transcribing batch of {} units", texts.len());
        let mut results = self.transcriber.transcribe_all(&texts).into_iter();

        for segment in self.pending.drain(..) {
            match segment {
                Segment::Verbatim(marker) => self.sink.write_str(&marker)?,
                Segment::Unit(text) => {
                    let ipa = results.next().unwrap_or_default();
                    write_unit(&mut self.sink, &ipa, &text)?;
                },
            }
        }
        self.pending_units = 0;
        self.sink.flush()?;
        Ok(())
    }

    fn checkpoint(&mut self) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&PlainCheckpoint {
                lines_processed: self.next_line,
                output_bytes: self.sink.position(),
                carry: self.carry.clone(),
            })?;
        }
        self.phase = if self.input_done {
            Phase::Done
        } else {
            Phase::Reading
        };
        Ok(())
    }
}

/// IPA line, then the original text on its own line.
fn write_unit(sink: &mut OutputSink, ipa: &str, text: &str) -> Result<()> {
    sink.write_str(ipa)?;
    sink.write_str("\n")?;
    sink.write_str(text)?;
    if !text.ends_with('\n') {
        sink.write_str("\n")?;
    }
    Ok(())
}

/// Split file contents into lines, keeping line endings.
pub fn file_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(str::to_string).collect()
}

/// Split literal command-line text into lines.
pub fn literal_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// Transcribe `lines` to `output`, or to standard output when `output` is
/// `None`.
///
/// With an output path, a checkpoint is kept beside it while the run is in
/// progress and removed at the end. If `config.resume` is set and a
/// checkpoint exists, the output is cut back to the checkpointed length and
/// the run continues from the checkpointed line.
pub fn transcribe_lines(
    transcriber: &Transcriber,
    lines: Vec<String>,
    output: Option<&Path>,
    config: &TranscriptionConfig,
) -> Result<()> {
    let Some(output) = output else {
        return PlainTextJob::new(transcriber, lines, OutputSink::stdout(), config).run();
    };

    let store = CheckpointStore::for_output(output);
    let checkpoint = if config.resume {
        store.load::<PlainCheckpoint>()
    } else {
        PlainCheckpoint::default()
    };

    let job = match resumable_length(output, checkpoint.output_bytes) {
        Some(offset) if checkpoint.lines_processed > 0 => {
            log::info!("Resuming from line {}", checkpoint.lines_processed);
            let sink = OutputSink::resume(output, offset)?;
            PlainTextJob::new(transcriber, lines, sink, config).resume_from(checkpoint)
        },
        _ => {
            if checkpoint.lines_processed > 0 {
                log::warn!(
                    "Output {} is shorter than its checkpoint, starting over",
                    output.display()
                );
            }
            PlainTextJob::new(transcriber, lines, OutputSink::create(output)?, config)
        },
    };

    job.with_checkpoints(store.clone()).run()?;
    store.remove()
}

/// Transcribe the file at `input`. See [`transcribe_lines`].
pub fn transcribe_file(
    transcriber: &Transcriber,
    input: &Path,
    output: Option<&Path>,
    config: &TranscriptionConfig,
) -> Result<()> {
    let content = fs::read_to_string(input)?;
    transcribe_lines(transcriber, file_lines(&content), output, config)
}

/// `Some(offset)` if the existing output holds at least `offset` bytes.
pub(crate) fn resumable_length(output: &Path, offset: u64) -> Option<u64> {
    let len = fs::metadata(output).ok()?.len();
    (len >= offset).then_some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::HeuristicTagger;
    use tempfile::tempdir;

    fn upper(text: &str) -> String {
        text.trim().to_uppercase()
    }

    fn transcriber() -> Transcriber {
        Transcriber::new(
            Box::new(upper),
            Box::new(HeuristicTagger::new()),
            &TranscriptionConfig::default(),
        )
    }

    fn run_to_string(lines: &[&str], batch_size: usize) -> String {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let config = TranscriptionConfig::default().with_batch_size(batch_size);
        let t = transcriber();
        let lines = lines.iter().map(|l| l.to_string()).collect();
        transcribe_lines(&t, lines, Some(&path), &config).unwrap();
        fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn test_unit_followed_by_original() {
        let out = run_to_string(&["Hello there.\n"], 32);
        assert_eq!(out, "HELLO THERE.\nHello there.\n");
    }

    #[test]
    fn test_wrapped_lines_joined() {
        let out = run_to_string(&["It was\n", "late.\n"], 32);
        assert_eq!(out, "IT WAS LATE.\nIt was late.\n");
    }

    #[test]
    fn test_blank_lines_kept_in_place() {
        let out = run_to_string(&["One.\n", "\n", "\n", "Two.\n"], 1);
        assert_eq!(out, "ONE.\nOne.\n\nTWO.\nTwo.\n");
    }

    #[test]
    fn test_trailing_carry_and_marker_written() {
        let out = run_to_string(&["Done.\n", "\n", "no ending"], 32);
        assert_eq!(out, "DONE.\nDone.\n\nNO ENDING\nno ending \n");
    }

    #[test]
    fn test_trailing_marker_without_units() {
        let out = run_to_string(&["Done.\n", "\n"], 1);
        assert_eq!(out, "DONE.\nDone.\n\n");
    }

    #[test]
    fn test_checkpoint_removed_after_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let t = transcriber();
        transcribe_lines(
            &t,
            literal_lines("One.\nTwo."),
            Some(&path),
            &TranscriptionConfig::default(),
        )
        .unwrap();
        assert!(!CheckpointStore::for_output(&path).path().exists());
    }

    #[test]
    fn test_step_writes_checkpoint_per_batch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let store = CheckpointStore::for_output(&path);
        let t = transcriber();
        let config = TranscriptionConfig::default().with_batch_size(2);
        let lines = file_lines("A.\nB.\nC.\n");
        let mut job = PlainTextJob::new(&t, lines, OutputSink::create(&path).unwrap(), &config)
            .with_checkpoints(store.clone());

        assert!(job.step().unwrap());
        let checkpoint: PlainCheckpoint = store.load();
        assert_eq!(checkpoint.lines_processed, 2);
        assert_eq!(checkpoint.output_bytes, fs::metadata(&path).unwrap().len());
        assert_eq!(job.lines_processed(), 2);

        assert!(!job.step().unwrap());
        let checkpoint: PlainCheckpoint = store.load();
        assert_eq!(checkpoint.lines_processed, 3);
        assert_eq!(checkpoint.carry, CarryState::default());
    }

    #[test]
    fn test_file_lines_keep_endings() {
        assert_eq!(file_lines("a\nb"), vec!["a\n", "b"]);
        assert_eq!(literal_lines("a\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_resumable_length() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        assert_eq!(resumable_length(&path, 0), None);
        fs::write(&path, "12345").unwrap();
        assert_eq!(resumable_length(&path, 3), Some(3));
        assert_eq!(resumable_length(&path, 9), None);
    }
}
