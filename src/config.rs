//! Configuration for transcription runs.

use std::path::PathBuf;

/// An attribute rule for removing whole elements from HTML input.
///
/// An element whose open tag carries `name="value"` (either quote style, any
/// position in the tag) is removed together with everything it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRule {
    /// Attribute name, e.g. `id`
    pub name: String,
    /// Exact attribute value, e.g. `secondary`
    pub value: String,
}

impl AttributeRule {
    /// Create a new attribute rule.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Transcription configuration.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    /// Path to the external phonemizer binary.
    pub phonemizer_path: PathBuf,

    /// Utterances (plain mode) or paragraphs (HTML mode) per batch.
    pub batch_size: usize,

    /// Maximum concurrent phonemizer invocations within a batch.
    pub max_workers: usize,

    /// Continue from an existing checkpoint.
    pub resume: bool,

    /// Repair common OCR artifacts before phonemization.
    pub repair_ocr: bool,

    /// HTML elements removed by attribute match.
    pub skip_attributes: Vec<AttributeRule>,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptionConfig {
    /// Default utterances per batch.
    pub const DEFAULT_BATCH_SIZE: usize = 32;

    /// Default worker pool size.
    pub const DEFAULT_MAX_WORKERS: usize = 8;

    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            phonemizer_path: PathBuf::from("flite/bin/flite"),
            batch_size: Self::DEFAULT_BATCH_SIZE,
            max_workers: Self::DEFAULT_MAX_WORKERS,
            resume: false,
            repair_ocr: false,
            skip_attributes: vec![
                AttributeRule::new("id", "secondary"),
                AttributeRule::new("id", "actionbar"),
            ],
        }
    }

    /// Set the phonemizer binary path.
    pub fn with_phonemizer_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.phonemizer_path = path.into();
        self
    }

    /// Set the batch size. Zero is clamped to one.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the worker pool size. Zero is clamped to one.
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = workers.max(1);
        self
    }

    /// Enable resuming from a checkpoint.
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    /// Enable OCR artifact repair.
    pub fn with_repair_ocr(mut self, enable: bool) -> Self {
        self.repair_ocr = enable;
        self
    }

    /// Replace the HTML attribute denylist.
    pub fn with_skip_attributes(mut self, rules: Vec<AttributeRule>) -> Self {
        self.skip_attributes = rules;
        self
    }
}
