//! American English realization of /t/ and /d/.
//!
//! A transcription lists every /t/ and /d/ as a full stop. In running American
//! speech these are:
//! - affricated before /ɹ/ and /j/ ("tree" `tʃɹi`, "during" `dʒjʊɹɪŋ`)
//! - true at the start of a word or a stressed syllable
//! - dropped after /n/ ("twenty", "want") and between two different consonants
//! - flapped to `ɾ` between vowels, also across words ("butter", "get it")
//!
//! Runs after reduction and before the stress marks are removed, since the
//! stress marks decide which stops stay true.

use super::symbols::{is_consonant, is_letter, is_vowel, is_vowel_like, next_char, FLAP, STRESS};

/// Transcribed words the scan misclassifies; always left as they are.
pub const SKIPPED_WORDS: &[&str] = &["ɹænd", "ɹændz", "mæt"];

const AFFRICATIONS: &[(&str, &str)] = &[("tɹ", "tʃɹ"), ("dɹ", "dʒɹ"), ("tj", "tʃj"), ("dj", "dʒj")];

/// What happens to one stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Realization {
    True,
    Flap,
    Delete,
}

/// Consonants that count as "true" for cluster simplification.
fn is_cluster_consonant(c: char) -> bool {
    is_consonant(c) && !matches!(c, 'ɝ' | 'ɹ' | 'ʃ')
}

fn realize_stop(prev: char, next: Option<char>, word_final: bool) -> Realization {
    if prev == STRESS {
        return Realization::True;
    }
    let Some(next) = next.filter(|&c| is_letter(c)) else {
        return Realization::True;
    };

    if prev == 'n' && next != 'ʃ' && next != 'ʒ' && next != prev {
        // Mid-word stops survive before a vowel ("entry", "until").
        if !word_final && is_vowel_like(next) {
            return Realization::True;
        }
        return Realization::Delete;
    }
    if (is_vowel(prev) || prev == 'ɝ' || prev == 'ɹ') && is_vowel_like(next) {
        return Realization::Flap;
    }
    if is_cluster_consonant(prev) && is_cluster_consonant(next) && prev != next {
        return Realization::Delete;
    }
    Realization::True
}

/// Realize the stops of one word in place.
///
/// Only the first stop that changes is rewritten; the scan stops there, so a
/// word with two reducible stops keeps its second one.
fn realize_word(words: &mut [Vec<char>], word_idx: usize) {
    for letter_idx in 1..words[word_idx].len() {
        let letter = words[word_idx][letter_idx];
        if letter != 't' && letter != 'd' {
            continue;
        }
        let prev = words[word_idx][letter_idx - 1];
        let next = next_char(words, word_idx, letter_idx);
        let word_final = letter_idx + 1 == words[word_idx].len();
        match realize_stop(prev, next, word_final) {
            Realization::True => continue,
            Realization::Flap => {
                words[word_idx][letter_idx] = FLAP;
                return;
            },
            Realization::Delete => {
                words[word_idx].remove(letter_idx);
                return;
            },
        }
    }
}

/// Realize /t/ and /d/ across a space-separated transcription, keeping stress
/// marks.
pub fn realize_stops(ipa_text: &str) -> String {
    let affricated = AFFRICATIONS
        .iter()
        .fold(ipa_text.to_string(), |text, (from, to)| text.replace(from, to));

    let mut words: Vec<Vec<char>> = affricated.split(' ').map(|w| w.chars().collect()).collect();
    for word_idx in 0..words.len() {
        let skipped = SKIPPED_WORDS
            .iter()
            .any(|s| s.chars().eq(words[word_idx].iter().copied()));
        if !skipped {
            realize_word(&mut words, word_idx);
        }
    }

    words
        .iter()
        .map(|w| w.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove primary stress marks.
pub fn strip_stress(ipa_text: &str) -> String {
    ipa_text.replace(STRESS, "")
}

/// Realize stops, then strip stress marks.
pub fn realize(ipa_text: &str) -> String {
    strip_stress(&realize_stops(ipa_text))
}
