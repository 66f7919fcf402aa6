//! Document pipeline: batching, output and resumable checkpoints.
//!
//! ```text
//! Document (plain lines | HTML | directory)
//!     ↓
//! [plain / html / directory] (units in document order)
//!     ↓
//! [Transcriber] (phonemizer → reduction → allophony, one batch at a time)
//!     ↓
//! [OutputSink] (IPA + original) ──→ [CheckpointStore] after every batch
//! ```
//!
//! # Key Design Principles
//!
//! 1. **One batch in flight**: a checkpoint is written only when every
//!    transcription requested so far has been written, so a crash loses at
//!    most the current batch.
//!
//! 2. **Exact resume**: a resumed run cuts the output back to the checkpointed
//!    length and produces the same bytes as an uninterrupted run.
//!
//! 3. **Order is positional**: results come back in submission order and
//!    untranscribed pieces keep their place in the document.

pub mod checkpoint;
pub mod directory;
pub mod html;
pub mod output;
pub mod plain;
pub mod transcriber;

pub use checkpoint::{
    checkpoint_path, CheckpointStore, DirectoryCheckpoint, HtmlCheckpoint, PlainCheckpoint,
};
pub use directory::transcribe_directory;
pub use html::{transcribe_html, HtmlJob};
pub use output::OutputSink;
pub use plain::{transcribe_file, transcribe_lines, PlainTextJob};
pub use transcriber::Transcriber;
