//! Phonemize, reduce and realize a batch of utterances.

use crate::config::TranscriptionConfig;
use crate::phonemizer::{FlitePhonemizer, Phonemizer, WorkerPool};
use crate::phonology::{realize, ReductionEngine};
use crate::tagger::{HeuristicTagger, PosTagger};
use crate::text::ocr_repair::repair_ocr;

/// Turns utterances into spoken-style IPA.
///
/// One transcriber is shared by every document of a run; it owns no
/// per-document state.
pub struct Transcriber {
    phonemizer: Box<dyn Phonemizer>,
    reduction: ReductionEngine,
    pool: WorkerPool,
    repair_ocr: bool,
}

impl Transcriber {
    /// Create a transcriber from explicit capabilities.
    pub fn new(
        phonemizer: Box<dyn Phonemizer>,
        tagger: Box<dyn PosTagger>,
        config: &TranscriptionConfig,
    ) -> Self {
        Self {
            phonemizer,
            reduction: ReductionEngine::new(tagger),
            pool: WorkerPool::new(config.max_workers),
            repair_ocr: config.repair_ocr,
        }
    }

    /// Create a transcriber using the external phonemizer and the heuristic
    /// tagger.
    pub fn from_config(config: &TranscriptionConfig) -> Self {
        Self::new(
            Box::new(FlitePhonemizer::new(&config.phonemizer_path)),
            Box::new(HeuristicTagger::new()),
            config,
        )
    }

    /// The text actually sent to the phonemizer for `text`.
    fn prepare(&self, text: &str) -> String {
        if self.repair_ocr {
            repair_ocr(text)
        } else {
            text.to_string()
        }
    }

    /// Reduce and realize one raw phonemizer result.
    pub fn postprocess(&self, raw_ipa: &str, text: &str) -> String {
        realize(&self.reduction.reduce(raw_ipa, text))
    }

    /// Transcribe one utterance.
    pub fn transcribe(&self, text: &str) -> String {
        let prepared = self.prepare(text);
        let raw = self.phonemizer.transcribe(&prepared);
        self.postprocess(&raw, &prepared)
    }

    /// Transcribe a batch, results in the order of `texts`.
    pub fn transcribe_all(&self, texts: &[String]) -> Vec<String> {
        let prepared: Vec<String> = texts.iter().map(|t| self.prepare(t)).collect();
        let raw = self
            .pool
            .transcribe_batch(self.phonemizer.as_ref(), &prepared);
        raw.iter()
            .zip(&prepared)
            .map(|(ipa, text)| self.postprocess(ipa, text))
            .collect()
    }
}
