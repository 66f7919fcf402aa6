//! Repair of common OCR misreads in scanned books.
//!
//! Scanners routinely read "rn" as "nn" or "m" ("storm" becomes "stonn", "stern"
//! becomes "stem"), "I" as "1", "'t" as "7" and "ll" as "11". The word lists
//! below were collected from real scans and only cover words that are not valid
//! English on their own.

use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    /// Words where a scanned "nn" should read "rm".
    static ref RN_AS_NN: HashSet<&'static str> = [
    "aftennath", "alann", "alanned", "alanningly", "andonnan", "andonnen", "ann", "annariz",
    "annband", "annbands", "annchair", "annchairs", "anned", "annies", "annload", "annloads",
    "annor", "annored", "annorers", "annour", "annpit", "anns", "annsman", "annsmen",
    "annsmens", "anny", "annys", "bannaids", "bordennan", "bordennen", "chann", "channing",
    "confinned", "countennanding", "detennina", "detennination", "detennine", "detennined",
    "detenninedly", "ennine", "fann", "fannboy", "fanner", "fanners", "fanngirls", "fannhouse",
    "fannhouses", "fanning", "fanns", "fannwife", "fannyard", "finn", "finned", "finnly",
    "fishennans", "fonn", "fonnal", "fonnalities", "fonnality", "fonnations", "fonned",
    "fonner", "fonnerly", "fonnidable", "fonnidably", "fonning", "fonns", "fonnula", "foreann",
    "gannent", "gannents", "hailstonn", "hann", "hanned", "hanning", "hannless", "hannony",
    "hanns", "indetenninate", "infonn", "infonnal", "infonnants", "infonnation", "infonnative",
    "infonning", "innkeepera", "insunnountable", "intenneshed", "intenninably",
    "intennittently", "jenn", "kennit", "munnured", "munnuring", "munnurs", "nonnal",
    "nonnality", "outennost", "ovennatched", "pennanent", "pennanently", "penneated", "pennit",
    "pennitted", "perfonn", "perfonnance", "perfonned", "perfonnedat", "perfonner",
    "perfonners", "perfonning", "platfonn", "poleann", "poleanns", "rainstonn", "rainstonns",
    "reannes", "redann", "redanns", "rivennan", "runnerhan", "sheepfanner", "sideanned",
    "skinnish", "skinnishes", "speannen", "stonn", "stonns", "stronganns", "swann", "swanned",
    "swanning", "swanns", "tenn", "tenns", "thinning", "thunderstonn", "tonn", "tonnent",
    "tonnentor", "transfonned", "transfonns", "tunnoil", "tyrannizing", "unanned",
    "undennined", "unhanned", "unifonn", "unifonned", "uppennost", "vennin", "wann", "wanned",
    "wanner", "wannest", "wanning", "wannly", "wannth", "windstonn", "wonn", "wonned", "wonns",
    "wonnwood",
    ]
    .into_iter()
    .collect();

    /// Words where each scanned "m" should read "rn".
    static ref RN_AS_M: HashSet<&'static str> = [
        "comer", "comers", "bum", "bums", "bam", "bom", "hom", "leam", "stem", "wom",
    ]
    .into_iter()
    .collect();
}

/// Replace misread "rn" sequences in known words.
///
/// The lookup uses the lowercase alphabetic letters of each word, so
/// punctuation attached to a word does not prevent the repair.
pub fn repair_scanned_words(text: &str) -> Vec<String> {
    text.split(' ')
        .map(|word| {
            let key: String = word
                .chars()
                .filter(|c| c.is_alphabetic())
                .collect::<String>()
                .to_lowercase();
            if RN_AS_NN.contains(key.as_str()) {
                word.replace("nn", "rm")
            } else if RN_AS_M.contains(key.as_str()) {
                word.replace('m', "rn")
            } else {
                word.to_string()
            }
        })
        .collect()
}

/// Replace digits that were misread letters.
///
/// Words following `chapter` and words containing parentheses are left alone,
/// since those are usually real numbers.
pub fn repair_scanned_numbers(mut words: Vec<String>) -> Vec<String> {
    let mut i = 0;
    while i < words.len() {
        let word = words[i].clone();
        if (i > 0 && words[i - 1] == "chapter") || word.contains('(') || word.contains(')') {
            i += 1;
            continue;
        }
        match word.as_str() {
            "1" => words[i] = "I".to_string(),
            "\"1" => words[i] = "\"I".to_string(),
            "7" | "7/" | "\"7" if i > 0 => {
                words[i - 1].push_str("'t");
                words.remove(i);
                continue;
            },
            "7." | "7...." if i > 0 => {
                let tail = word.replace('7', "t");
                words[i - 1].push('\'');
                words[i - 1].push_str(&tail);
                words.remove(i);
                continue;
            },
            _ if word.contains("11") => words[i] = word.replace("11", "ll"),
            _ => {},
        }
        i += 1;
    }
    words
}

/// Lowercase an utterance and apply both repairs.
///
/// # Examples
///
/// ```
/// use spoken_ipa::text::ocr_repair::repair_ocr;
///
/// assert_eq!(repair_ocr("The stonn was loud"), "the storm was loud");
/// assert_eq!(repair_ocr("don 7 go"), "don't go");
/// ```
pub fn repair_ocr(text: &str) -> String {
    repair_scanned_numbers(repair_scanned_words(&text.to_lowercase())).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split(' ').map(str::to_string).collect()
    }

    #[test]
    fn test_nn_word_replaced() {
        let result = repair_scanned_words("the stonn was loud");
        assert_eq!(result.join(" "), "the storm was loud");
    }

    #[test]
    fn test_nn_word_with_punctuation() {
        let result = repair_scanned_words("a fonnidable, pennanent foe");
        assert_eq!(result.join(" "), "a formidable, permanent foe");
    }

    #[test]
    fn test_regular_nn_word_unchanged() {
        let result = repair_scanned_words("running is fun");
        assert_eq!(result[0], "running");
    }

    #[test]
    fn test_m_word_replaced() {
        let result = repair_scanned_words("the stem broke");
        assert_eq!(result[1], "stern");
    }

    #[test]
    fn test_one_becomes_i() {
        let result = repair_scanned_numbers(words("hello 1 said"));
        assert_eq!(result[1], "I");
        let result = repair_scanned_numbers(words("\"1 said"));
        assert_eq!(result[0], "\"I");
    }

    #[test]
    fn test_chapter_number_skipped() {
        let result = repair_scanned_numbers(words("chapter 1"));
        assert_eq!(result[1], "1");
    }

    #[test]
    fn test_parenthesized_number_skipped() {
        let result = repair_scanned_numbers(words("(1) thing"));
        assert_eq!(result[0], "(1)");
    }

    #[test]
    fn test_seven_merges_into_previous_word() {
        assert_eq!(repair_scanned_numbers(words("can 7 stop")), words("can't stop"));
        assert_eq!(repair_scanned_numbers(words("won 7. no")), words("won't. no"));
    }

    #[test]
    fn test_leading_seven_left_alone() {
        assert_eq!(repair_scanned_numbers(words("7 days")), words("7 days"));
    }

    #[test]
    fn test_eleven_becomes_ll() {
        assert_eq!(repair_scanned_numbers(words("we11 then")), words("well then"));
    }
}
