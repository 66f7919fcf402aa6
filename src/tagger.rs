//! Part-of-speech queries for verb-gated contractions.
//!
//! Some contractions ("should have" → "ʃʊdə", "going to" → "gɑnə") are only
//! natural when the next word is a verb. The reduction engine asks a
//! [`PosTagger`] about that word; tests substitute a fixed fake and production
//! uses [`HeuristicTagger`].

use lazy_static::lazy_static;
use std::collections::HashSet;

/// Answers whether a word is used as a verb within a sentence.
pub trait PosTagger: Send + Sync {
    /// Whether `word` is tagged as a verb in `sentence`.
    fn is_verb(&self, word: &str, sentence: &str) -> bool;
}

impl<F> PosTagger for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn is_verb(&self, word: &str, sentence: &str) -> bool {
        self(word, sentence)
    }
}

lazy_static! {
    /// Closed-class words that are never verbs in our contexts.
    static ref FUNCTION_WORDS: HashSet<&'static str> = [
        "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her", "its",
        "our", "their", "some", "any", "no", "every", "each", "all", "both", "not", "never",
        "to", "of", "in", "on", "at", "by", "for", "with", "from", "into", "about", "over",
        "under", "and", "or", "but", "so", "if", "than", "then", "as", "very", "too", "just",
        "also", "already", "still", "here", "there", "i", "you", "he", "she", "it", "we",
        "they", "me", "him", "us", "them", "what", "who", "which", "when", "where", "why",
        "how",
    ]
    .into_iter()
    .collect();

    /// Words after which the next word is a noun phrase, not a verb.
    static ref DETERMINERS: HashSet<&'static str> = [
        "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her", "its",
        "our", "their", "some", "any", "no", "every", "each",
    ]
    .into_iter()
    .collect();

    /// Subjects and modals, after which a content word is most likely a verb.
    static ref VERB_TRIGGERS: HashSet<&'static str> = [
        "i", "you", "he", "she", "it", "we", "they", "can", "could", "will", "would", "shall",
        "should", "may", "might", "must",
    ]
    .into_iter()
    .collect();

    /// Frequent verbs, including irregular past participles.
    static ref KNOWN_VERBS: HashSet<&'static str> = [
        "be", "been", "being", "am", "is", "are", "was", "were", "have", "had", "has", "do",
        "did", "done", "go", "gone", "went", "get", "got", "gotten", "make", "made", "take",
        "taken", "took", "come", "came", "see", "seen", "saw", "know", "known", "knew", "think",
        "thought", "say", "said", "tell", "told", "give", "given", "gave", "find", "found",
        "run", "ran", "eat", "eaten", "ate", "write", "written", "wrote", "speak", "spoken",
        "leave", "left", "keep", "kept", "feel", "felt", "bring", "brought", "buy", "bought",
        "become", "became", "begin", "begun", "began", "break", "broken", "choose", "chosen",
        "fall", "fallen", "fly", "flown", "forget", "forgotten", "grow", "grown", "hide",
        "hidden", "let", "put", "set", "stop", "try", "help", "want", "need", "happen", "work",
        "play", "move", "live", "die", "kill", "win", "won", "lose", "lost", "meet", "met",
        "pay", "paid", "sit", "sat", "stand", "stood", "hear", "heard", "hold", "held", "wait",
        "look", "watch", "call", "ask", "use", "show", "shown", "start", "fight", "fought",
    ]
    .into_iter()
    .collect();
}

/// Rule-based verb detector.
///
/// Finds the first occurrence of the word in the sentence and decides from the
/// word itself and the word before it:
/// - function words, and words after a determiner, are not verbs
/// - known verb forms and `-ed`/`-en`/`-ing` forms are verbs
/// - anything else is a verb only directly after a subject pronoun or modal
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTagger;

impl HeuristicTagger {
    /// Create a new tagger.
    pub fn new() -> Self {
        Self
    }

    fn tokenize(sentence: &str) -> Vec<String> {
        sentence
            .split_whitespace()
            .map(|raw| {
                raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                    .to_lowercase()
            })
            .filter(|token| !token.is_empty())
            .collect()
    }
}

impl PosTagger for HeuristicTagger {
    fn is_verb(&self, word: &str, sentence: &str) -> bool {
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
            .to_lowercase();
        let tokens = Self::tokenize(sentence);
        let Some(pos) = tokens.iter().position(|t| *t == word) else {
            return false;
        };
        let prev = pos.checked_sub(1).map(|p| tokens[p].as_str());

        if FUNCTION_WORDS.contains(word.as_str()) {
            return false;
        }
        if prev.is_some_and(|p| DETERMINERS.contains(p)) {
            return false;
        }
        if KNOWN_VERBS.contains(word.as_str()) {
            return true;
        }
        if word.len() > 3 && (word.ends_with("ed") || word.ends_with("en") || word.ends_with("ing")) {
            return true;
        }
        prev.is_some_and(|p| VERB_TRIGGERS.contains(p))
    }
}
