// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::needless_range_loop)]
#![allow(clippy::new_without_default)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # Spoken IPA
//!
//! Transcribe English text into the IPA of natural, connected American speech.
//!
//! A grapheme-to-phoneme engine gives citation forms: every "to" is `tu`,
//! every "butter" keeps its `t`. This crate post-processes that output into
//! what a speaker actually says.
//!
//! ## Core Features
//!
//! - **Normalization**: curly quotes and dashes folded, text reduced to ASCII
//! - **Segmentation**: hard-wrapped lines re-joined into whole sentences,
//!   chapter headings kept together
//! - **Weak forms**: "for" → `fɝ`, "of" → `ə` between consonants
//! - **Contractions**: "want to" → `wɑnə`, "should have" → `ʃʊdə` before a verb
//! - **Allophony**: flapping, post-nasal and cluster /t/ /d/ deletion,
//!   affrication before /ɹ/ and /j/
//! - **Documents**: plain text, HTML paragraphs and whole directories, with
//!   resumable checkpoints that reproduce byte-identical output
//!
//! ## Quick Start
//!
//! ```no_run
//! use spoken_ipa::config::TranscriptionConfig;
//! use spoken_ipa::pipeline::Transcriber;
//!
//! let config = TranscriptionConfig::default().with_phonemizer_path("/usr/bin/flite");
//! let transcriber = Transcriber::from_config(&config);
//! println!("{}", transcriber.transcribe("I want to go to the party."));
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Text preparation
pub mod text;

// External capabilities
pub mod phonemizer;
pub mod tagger;

// IPA post-processing
pub mod phonology;

// Documents and checkpoints
pub mod pipeline;

// Re-exports
pub use config::TranscriptionConfig;
pub use error::{Error, Result};
pub use pipeline::Transcriber;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
