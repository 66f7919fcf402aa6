//! IPA symbol classes and neighbour lookup across word boundaries.
//!
//! The class membership below is tuned to the phonemizer's output rather than
//! to phonetic theory: the rhotic vowel `ɝ` is listed with the consonants
//! because the phonemizer uses it for syllabic "r", and several nasals appear
//! in both lists.

/// Vowel symbols.
pub const VOWELS: &str = "aeiouɑɒæɛɪʊʌɔœøɐɘəɤɨɵɜɞɯɲɳɴɶʉʊʏ";

/// Consonant symbols.
pub const CONSONANTS: &str = "pbtdkgqɢʔmɱnɳɲŋɴʙrʀⱱɾɽɸβfvθðszʃʒʂʐçʝxɣχʁħʕhɦɬɮʋɹɻjɰlɭʎʟɝ";

/// Primary stress mark.
pub const STRESS: char = 'ˈ';

/// Alveolar flap.
pub const FLAP: char = 'ɾ';

/// Schwa.
pub const SCHWA: char = 'ə';

/// Whether `c` is a vowel symbol.
pub fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

/// Whether `c` is a consonant symbol.
pub fn is_consonant(c: char) -> bool {
    CONSONANTS.contains(c)
}

/// Whether `c` is any phonetic letter (vowel or consonant).
pub fn is_letter(c: char) -> bool {
    is_vowel(c) || is_consonant(c)
}

/// Whether `c` is vowel-like for flapping and deletion: a vowel or the
/// rhotic vowel `ɝ`.
pub fn is_vowel_like(c: char) -> bool {
    is_vowel(c) || c == 'ɝ'
}

/// The character after `words[word_idx][letter_idx]`, looking into the next
/// word when the letter is the last of its word.
///
/// Returns `None` at the end of the utterance or when the next word is empty.
pub fn next_char(words: &[Vec<char>], word_idx: usize, letter_idx: usize) -> Option<char> {
    let word = &words[word_idx];
    if letter_idx + 1 < word.len() {
        return Some(word[letter_idx + 1]);
    }
    words.get(word_idx + 1).and_then(|next| next.first().copied())
}

/// The character before `words[word_idx][letter_idx]`, looking into the
/// previous word when the letter is the first of its word.
///
/// Returns `None` at the start of the utterance or when the previous word is
/// empty.
pub fn prev_char(words: &[Vec<char>], word_idx: usize, letter_idx: usize) -> Option<char> {
    if letter_idx > 0 {
        return words[word_idx].get(letter_idx - 1).copied();
    }
    if word_idx == 0 {
        return None;
    }
    words[word_idx - 1].last().copied()
}
