//! Weak forms and contractions of connected speech.
//!
//! The phonemizer transcribes every word in its citation (strong) form: "for"
//! is `fɔɹ`, "want to" is `wɑnt tu`. Spoken English reduces many of these.
//! This module rewrites a transcription in two passes, both driven by the
//! original text token by token:
//!
//! 1. single-token weak forms ("for" → `fɝ`, "him" → `ɪm` after a consonant,
//!    `ʌv` → `ə` inside a consonant cluster) plus fixed pronunciation
//!    preferences that apply inside any word;
//! 2. two-token contractions ("want to" → `wɑnə`), some of them blocked by a
//!    following "not" or allowed only before a verb.
//!
//! Pass 1 relies on token `i` of the transcription matching token `i` of the
//! original text. Pass 2 removes tokens, so nothing after it may rely on that
//! alignment.

use lazy_static::lazy_static;
use std::collections::HashMap;

use super::symbols::is_consonant;
use crate::tagger::PosTagger;

/// A condition a rule needs from its surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// No condition besides not being utterance-final.
    Always,
    /// The previous transcribed word ends in a consonant.
    AfterConsonant,
    /// The word after the pair is not "not".
    BlockedByNot,
    /// The word after the pair is tagged as a verb.
    RequiresVerb,
}

/// A rewrite rule, keyed by lowercase orthography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Replace one word with its weak form.
    Single {
        /// Original word
        word: &'static str,
        /// Weak IPA form
        weak: &'static str,
        /// Conditions that must all hold
        contexts: &'static [Context],
    },
    /// Replace two adjacent words with one fused form.
    Pair {
        /// First original word
        first: &'static str,
        /// Second original word
        second: &'static str,
        /// Fused IPA form
        fused: &'static str,
        /// Conditions that must all hold
        contexts: &'static [Context],
    },
}

const ALWAYS: &[Context] = &[Context::Always];
const AFTER_CONSONANT: &[Context] = &[Context::AfterConsonant];
const NOT_BEFORE_NOT: &[Context] = &[Context::BlockedByNot];
const BEFORE_VERB: &[Context] = &[Context::BlockedByNot, Context::RequiresVerb];

/// Strong form of "of" and its reduction inside consonant clusters.
pub const STRONG_OF: &str = "ʌv";
/// Weak form of "of".
pub const WEAK_OF: &str = "ə";

/// Weak forms used whenever the word is not utterance-final.
pub const ALWAYS_REDUCED: &[(&str, &str)] = &[
    ("for", "fɝ"),
    ("your", "jɝ"),
    ("you're", "jɝ"),
    ("and", "ən"),
    ("an", "ən"),
    ("that", "ðət"),
    ("you", "jə"),
    ("do", "də"),
    ("at", "ət"),
    ("from", "fɹəm"),
    ("there", "ðɝ"),
    ("they're", "ðɝ"),
    ("when", "wən"),
    ("can", "kən"),
    ("into", "ɪndə"),
    ("some", "səm"),
    ("than", "ðən"),
    ("then", "ðən"),
    ("our", "ɝ"),
    ("because", "kəz"),
    ("us", "əs"),
    ("such", "sətʃ"),
    ("as", "əz"),
    ("i'll", "əl"),
    ("you'll", "jəl"),
    ("he'll", "hɪl"),
    ("she'll", "ʃɪl"),
    ("it'll", "ɪtəl"),
    ("we'll", "wɪl"),
    ("they'll", "ðəl"),
];

/// Weak forms that drop their initial sound, used only after a consonant.
pub const AFTER_CONSONANT_REDUCED: &[(&str, &str)] = &[
    ("him", "ɪm"),
    ("his", "ɪz"),
    ("her", "ɝ"),
    ("he", "i"),
    ("who", "u"),
    ("have", "əv"),
    ("has", "əz"),
    ("them", "əm"),
];

/// Contractions that apply unless the pair ends the utterance.
pub const CONTRACTIONS: &[(&str, &str, &str)] = &[
    ("do", "you", "dju"),
    ("what", "did", "wʌd"),
    ("i", "am", "aɪm"),
    ("he", "is", "hiz"),
    ("she", "is", "ʃiz"),
    ("it", "is", "ɪts"),
    ("we", "are", "wɝ"),
    ("want", "to", "wɑnə"),
    ("kind", "of", "kaɪndə"),
    ("give", "me", "ɡɪmi"),
    ("let", "me", "lemi"),
];

/// "X will" contractions, blocked when followed by "not".
pub const WILL_CONTRACTIONS: &[(&str, &str, &str)] = &[
    ("i", "will", "əl"),
    ("you", "will", "jəl"),
    ("he", "will", "hɪl"),
    ("she", "will", "ʃɪl"),
    ("it", "will", "ɪtəl"),
    ("we", "will", "wɪl"),
    ("they", "will", "ðəl"),
];

/// Contractions that are only natural before a verb.
pub const VERB_CONTRACTIONS: &[(&str, &str, &str)] = &[
    ("could", "have", "cʊdə"),
    ("should", "have", "ʃʊdə"),
    ("would", "have", "wʊdə"),
    ("going", "to", "gɑnə"),
];

/// Preferred pronunciations, replaced wherever they occur inside a word so
/// plurals and other inflections are covered too. First match wins.
pub const PREFERRED_PRONUNCIATIONS: &[(&str, &str)] = &[
    ("fæməli", "fæmli"),
    ("kʌmfɝtəbəl", "kʌmftɝbəl"),
    ("feɪvɝɪt", "feɪvɹɪt"),
    ("pɹɑbəbli", "pɹɑbli"),
    ("dɪfɝənt", "dɪfɹənt"),
    ("kæmɝə", "kæmɹə"),
    ("lɪsənɪŋ", "lɪsnɪŋ"),
    ("mɛmɝi", "mɛmɹi"),
    ("tɹævəlɪŋ", "tɹævlɪŋ"),
    ("nætʃɝəl", "nætʃɹəl"),
    ("æktʃəwəli", "æktʃəli"),
    ("ɹɛstɝˈɑnt", "ɹɛstˈɹɑnt"),
    ("ɛvɝi", "ɛvɹi"),
    ("dʒɛnɝəl", "dʒɛnɹəl"),
    ("ævɝɪdʒ", "ævɹɪdʒ"),
    ("pɹɪzənɝ", "pɹɪznɝ"),
    // phonemizer mistakes
    ("heɪˈvɛnt", "hævənt"),
    ("hæsnt", "hæzənt"),
    ("ʌnˈmindfəl", "ʌnˈmaɪndfəl"),
    ("junɪˈdɛntəˈfaɪəbəl", "ʌnaɪdentəˈfaɪəbəl"),
    ("waɪtɪˈkloʊks", "waɪtˈkloʊks"),
    ("waɪtɪˈkloʊk", "waɪtˈkloʊk"),
];

impl Rule {
    /// The original word that selects this rule: the word itself for a
    /// single-word rule, the first word for a pair.
    pub fn trigger(&self) -> &'static str {
        match *self {
            Rule::Single { word, .. } => word,
            Rule::Pair { first, .. } => first,
        }
    }
}

lazy_static! {
    static ref SINGLE_RULES: HashMap<&'static str, Rule> = {
        let singles = ALWAYS_REDUCED
            .iter()
            .map(|&(word, weak)| Rule::Single { word, weak, contexts: ALWAYS })
            .chain(
                AFTER_CONSONANT_REDUCED
                    .iter()
                    .map(|&(word, weak)| Rule::Single { word, weak, contexts: AFTER_CONSONANT }),
            );
        singles.map(|rule| (rule.trigger(), rule)).collect()
    };

    static ref PAIR_RULES: HashMap<&'static str, Vec<Rule>> = {
        let mut rules: HashMap<&'static str, Vec<Rule>> = HashMap::new();
        let tables = [
            (CONTRACTIONS, ALWAYS),
            (WILL_CONTRACTIONS, NOT_BEFORE_NOT),
            (VERB_CONTRACTIONS, BEFORE_VERB),
        ];
        for (table, contexts) in tables {
            for &(first, second, fused) in table {
                let rule = Rule::Pair { first, second, fused, contexts };
                rules.entry(rule.trigger()).or_default().push(rule);
            }
        }
        rules
    };
}

/// What the rule interpreter knows about a token's surroundings.
struct Surroundings<'a> {
    prev_ends_consonant: bool,
    following: Option<&'a str>,
    sentence: &'a str,
}

/// Rewrites strong-form transcriptions into connected-speech forms.
pub struct ReductionEngine {
    tagger: Box<dyn PosTagger>,
}

impl ReductionEngine {
    /// Create an engine that asks `tagger` about verb-gated contractions.
    pub fn new(tagger: Box<dyn PosTagger>) -> Self {
        Self { tagger }
    }

    /// Run both passes.
    pub fn reduce(&self, ipa_text: &str, original_text: &str) -> String {
        let reduced = self.reduce_words(ipa_text, original_text);
        self.collapse_contractions(&reduced, original_text)
    }

    /// Whether every context of a rule holds in `around`.
    fn allows(&self, contexts: &[Context], around: &Surroundings<'_>) -> bool {
        contexts.iter().all(|context| match context {
            Context::Always => true,
            Context::AfterConsonant => around.prev_ends_consonant,
            Context::BlockedByNot => around.following != Some("not"),
            Context::RequiresVerb => around
                .following
                .is_some_and(|word| self.tagger.is_verb(word, around.sentence)),
        })
    }

    /// Pass 1: single-token weak forms and preferred pronunciations.
    ///
    /// Token `i` of `ipa_text` is assumed to transcribe token `i` of
    /// `original_text`. The last token of the utterance keeps its strong form.
    pub fn reduce_words(&self, ipa_text: &str, original_text: &str) -> String {
        let mut out: Vec<String> = ipa_text.split_whitespace().map(str::to_string).collect();
        let original = lowercase_tokens(original_text);

        for i in 0..out.len() {
            let prev_ends_consonant = i > 0 && ends_in_consonant(&out[i - 1]);
            let next_first = out.get(i + 1).and_then(|next| next.chars().next());

            if out[i] == STRONG_OF {
                if prev_ends_consonant && next_first.is_some_and(is_consonant) {
                    out[i] = WEAK_OF.to_string();
                }
                continue;
            }

            if next_first.is_some() {
                let rule = original.get(i).and_then(|word| SINGLE_RULES.get(word.as_str()));
                if let Some(Rule::Single { weak, contexts, .. }) = rule {
                    let around = Surroundings {
                        prev_ends_consonant,
                        following: original.get(i + 1).map(String::as_str),
                        sentence: original_text,
                    };
                    if self.allows(contexts, &around) {
                        out[i] = weak.to_string();
                    }
                }
            }

            if let Some(preferred) = prefer_pronunciation(&out[i]) {
                out[i] = preferred;
            }
        }
        out.join(" ")
    }

    /// The fused form for the pair starting at original token `i`, if one
    /// applies. The pair must not end the utterance.
    fn contraction_at(
        &self,
        original: &[String],
        i: usize,
        prev: Option<&str>,
        sentence: &str,
    ) -> Option<&'static str> {
        let candidates = PAIR_RULES.get(original[i].as_str())?;
        let second = original.get(i + 1)?;
        let following = original.get(i + 2)?;
        let around = Surroundings {
            prev_ends_consonant: prev.is_some_and(ends_in_consonant),
            following: Some(following.as_str()),
            sentence,
        };
        candidates.iter().find_map(|rule| match *rule {
            Rule::Pair { second: expected, fused, contexts, .. }
                if expected == second.as_str() && self.allows(contexts, &around) =>
            {
                Some(fused)
            },
            _ => None,
        })
    }

    /// Pass 2: collapse two-token contractions.
    ///
    /// Builds a fresh token sequence in one forward pass. A collapsed pair
    /// consumes both of its tokens, so a pair never overlaps the next one.
    pub fn collapse_contractions(&self, ipa_text: &str, original_text: &str) -> String {
        let ipa: Vec<&str> = ipa_text.split_whitespace().collect();
        let original = lowercase_tokens(original_text);

        let mut out: Vec<&str> = Vec::with_capacity(ipa.len());
        let mut i = 0;
        while i < ipa.len() {
            if i < original.len() && i + 1 < ipa.len() {
                let prev = out.last().copied();
                if let Some(fused) = self.contraction_at(&original, i, prev, original_text) {
                    out.push(fused);
                    i += 2;
                    continue;
                }
            }
            out.push(ipa[i]);
            i += 1;
        }
        out.join(" ")
    }
}

fn lowercase_tokens(text: &str) -> Vec<String> {
    text.to_lowercase().split_whitespace().map(str::to_string).collect()
}

fn ends_in_consonant(token: &str) -> bool {
    token.chars().last().is_some_and(is_consonant)
}

/// Apply the first matching preferred pronunciation inside `word`.
fn prefer_pronunciation(word: &str) -> Option<String> {
    PREFERRED_PRONUNCIATIONS
        .iter()
        .find(|(from, _)| word.contains(from))
        .map(|(from, to)| word.replace(from, to))
}
