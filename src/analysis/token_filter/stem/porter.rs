//! Porter stemming algorithm.
//!
//! The stemmer applies the five rule steps of Porter (1980):
//! 1. Plurals, -ed and -ing, and a terminal y
//! 2. Double suffixes such as -ational and -iveness
//! 3. -icate, -ative, -ness and similar
//! 4. -al, -ance, -ence and the other single suffixes
//! 5. A final -e and a double l
//!
//! Within a step only the longest matching suffix is considered. If its
//! condition on the stem fails, the word is left alone for that step.
//!
//! # Examples
//!
//! ```
//! use inaworld::analysis::token_filter::stem::Stemmer;
//! use inaworld::analysis::token_filter::stem::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("flies"), "fli");
//! assert_eq!(stemmer.stem("relational"), "relat");
//! ```

use crate::analysis::token_filter::stem::Stemmer;

const STEP2: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("abli", "able"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
];

const STEP3: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

// longer suffixes precede the shorter ones they end with
const STEP4: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Porter stemmer for lowercase ASCII English words.
///
/// Words that are not purely ASCII letters are only lowercased.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }

    /// Whether the letter at `pos` is a consonant. `y` is a consonant at the
    /// start of a word or after a vowel.
    fn is_consonant(word: &[u8], pos: usize) -> bool {
        match word[pos] {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => pos == 0 || !Self::is_consonant(word, pos - 1),
            _ => true,
        }
    }

    /// Number of vowel-consonant sequences in `word`.
    fn measure(word: &[u8]) -> usize {
        let n = word.len();
        let mut i = 0;
        let mut m = 0;

        while i < n && Self::is_consonant(word, i) {
            i += 1;
        }
        while i < n {
            while i < n && !Self::is_consonant(word, i) {
                i += 1;
            }
            if i >= n {
                break;
            }
            while i < n && Self::is_consonant(word, i) {
                i += 1;
            }
            m += 1;
        }

        m
    }

    fn contains_vowel(word: &[u8]) -> bool {
        (0..word.len()).any(|i| !Self::is_consonant(word, i))
    }

    fn ends_with_double_consonant(word: &[u8]) -> bool {
        let n = word.len();
        n >= 2 && word[n - 1] == word[n - 2] && Self::is_consonant(word, n - 1)
    }

    /// Consonant-vowel-consonant ending whose last letter is not w, x or y.
    fn ends_cvc(word: &[u8]) -> bool {
        let n = word.len();
        n >= 3
            && Self::is_consonant(word, n - 3)
            && !Self::is_consonant(word, n - 2)
            && Self::is_consonant(word, n - 1)
            && !matches!(word[n - 1], b'w' | b'x' | b'y')
    }

    /// Stem left after removing `suffix`, if the word ends with it.
    fn stem_of<'a>(word: &'a [u8], suffix: &str) -> Option<&'a [u8]> {
        word.strip_suffix(suffix.as_bytes())
    }

    fn step1a(word: &mut Vec<u8>) {
        if word.ends_with(b"sses") || word.ends_with(b"ies") {
            word.truncate(word.len() - 2);
        } else if word.ends_with(b"s") && !word.ends_with(b"ss") {
            word.pop();
        }
    }

    fn step1b(word: &mut Vec<u8>) {
        if let Some(stem) = Self::stem_of(word, "eed") {
            if Self::measure(stem) > 0 {
                word.pop();
            }
            return;
        }

        let stem_len = match Self::stem_of(word, "ed").or(Self::stem_of(word, "ing")) {
            Some(stem) if Self::contains_vowel(stem) => stem.len(),
            _ => return,
        };
        word.truncate(stem_len);

        if word.ends_with(b"at") || word.ends_with(b"bl") || word.ends_with(b"iz") {
            word.push(b'e');
        } else if Self::ends_with_double_consonant(word)
            && !matches!(word.last(), Some(b'l' | b's' | b'z'))
        {
            word.pop();
        } else if Self::measure(word) == 1 && Self::ends_cvc(word) {
            word.push(b'e');
        }
    }

    fn step1c(word: &mut [u8]) {
        if Self::stem_of(word, "y").is_some_and(Self::contains_vowel) {
            let last = word.len() - 1;
            word[last] = b'i';
        }
    }

    /// Replace the first listed suffix the word ends with, when the
    /// remaining stem has a positive measure.
    fn replace_suffix(word: &mut Vec<u8>, rules: &[(&str, &str)]) {
        for (suffix, replacement) in rules {
            if let Some(stem) = Self::stem_of(word, suffix) {
                if Self::measure(stem) > 0 {
                    let stem_len = stem.len();
                    word.truncate(stem_len);
                    word.extend_from_slice(replacement.as_bytes());
                }
                return;
            }
        }
    }

    fn step4(word: &mut Vec<u8>) {
        for suffix in STEP4 {
            if let Some(stem) = Self::stem_of(word, suffix) {
                let removable = Self::measure(stem) > 1
                    && (*suffix != "ion" || matches!(stem.last(), Some(b's' | b't')));
                if removable {
                    let stem_len = stem.len();
                    word.truncate(stem_len);
                }
                return;
            }
        }
    }

    fn step5(word: &mut Vec<u8>) {
        if let Some(stem) = Self::stem_of(word, "e") {
            let m = Self::measure(stem);
            if m > 1 || (m == 1 && !Self::ends_cvc(stem)) {
                word.pop();
            }
        }

        if word.ends_with(b"ll") && Self::measure(word) > 1 {
            word.pop();
        }
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let lowered = word.to_lowercase();
        if lowered.len() <= 2 || !lowered.bytes().all(|b| b.is_ascii_lowercase()) {
            return lowered;
        }

        let mut word = lowered.into_bytes();
        Self::step1a(&mut word);
        Self::step1b(&mut word);
        Self::step1c(&mut word);
        Self::replace_suffix(&mut word, STEP2);
        Self::replace_suffix(&mut word, STEP3);
        Self::step4(&mut word);
        Self::step5(&mut word);

        // only ASCII letters were written
        word.into_iter().map(char::from).collect()
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}
