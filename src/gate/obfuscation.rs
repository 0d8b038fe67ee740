use super::lexicon::Wordlist;
use super::{CheckOutcome, ContentCheck, GateError, GateInput};
use regex::Regex;
use std::future::Future;
use std::pin::Pin;

/// Words shorter than this are not spelled-out-checked.
const MIN_LETTERS: usize = 3;

/// Maximum run of non-letters accepted between two letters of a word.
const MAX_GAP: usize = 8;

/// Catches words broken up by spacing or symbols: `f u c k`, `fu ck`,
/// `s.h.i.t`, `f    u    c    k`.
///
/// Runs on the lowercased text with links removed, since normalization
/// would already have deleted the separators it looks for. Unbroken words
/// are left to the lexicon check.
pub struct ObfuscationCheck {
    patterns: Vec<(String, Regex)>,
}

impl ObfuscationCheck {
    pub fn new(wordlist: &Wordlist) -> Result<Self, GateError> {
        let mut patterns = Vec::new();
        for word in wordlist.words() {
            if word.len() < MIN_LETTERS || !word.chars().all(|c| c.is_ascii_lowercase()) {
                continue;
            }
            patterns.push((word.to_string(), Regex::new(&spelled_out_pattern(word))?));
        }
        patterns.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Self { patterns })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    fn check(&self, text: &str) -> CheckOutcome {
        let hit = self.patterns.iter().find(|(word, re)| {
            re.find_iter(text).any(|m| m.len() > word.len())
        });
        match hit {
            Some((word, _)) => CheckOutcome::Reject(format!("spelled-out '{word}'")),
            None => CheckOutcome::Pass,
        }
    }
}

/// `fuck` -> `\bf[^a-z]{0,8}u[^a-z]{0,8}c[^a-z]{0,8}k\b`
fn spelled_out_pattern(word: &str) -> String {
    let letters: Vec<String> = word.chars().map(|c| c.to_string()).collect();
    let gap = format!("[^a-z]{{0,{MAX_GAP}}}");
    format!(r"\b{}\b", letters.join(&gap))
}

impl ContentCheck for ObfuscationCheck {
    fn name(&self) -> &'static str {
        "obfuscation"
    }

    fn evaluate<'a>(
        &'a self,
        input: &'a GateInput,
    ) -> Pin<Box<dyn Future<Output = Result<CheckOutcome, GateError>> + Send + 'a>> {
        Box::pin(futures::future::ready(Ok(self.check(&input.unlinked))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> CheckOutcome {
        ObfuscationCheck::new(&Wordlist::builtin()).unwrap().check(text)
    }

    #[test]
    fn test_pattern_shape() {
        assert_eq!(spelled_out_pattern("ass"), r"\ba[^a-z]{0,8}s[^a-z]{0,8}s\b");
    }

    #[test]
    fn test_spaced_and_starred_variants_are_caught() {
        assert!(check("f u c k").is_reject());
        assert!(check("f*u*c*k").is_reject());
        assert!(check("what a s.h.i.t day").is_reject());
        assert!(check("f - u - c - k").is_reject());
    }

    #[test]
    fn test_partly_broken_words_are_caught() {
        assert!(check("fu ck").is_reject());
        assert!(check("f u ck off").is_reject());
        assert!(check("sh it happens").is_reject());
        assert!(check("bull-shit").is_reject());
    }

    #[test]
    fn test_plain_words_are_left_to_other_checks() {
        // No separators: the lexicon check handles these.
        assert_eq!(check("fuck"), CheckOutcome::Pass);
        assert_eq!(check("it's a hit"), CheckOutcome::Pass);
        assert_eq!(check("fuck, again"), CheckOutcome::Pass);
    }

    #[test]
    fn test_letters_inside_words_do_not_match() {
        assert_eq!(check("if u c kim say hi"), CheckOutcome::Pass);
        assert_eq!(check("hello world"), CheckOutcome::Pass);
    }

    #[test]
    fn test_wide_gaps_are_caught_up_to_the_limit() {
        assert!(check("f    u    c    k").is_reject());
        assert!(check("s    h    i    t").is_reject());
        assert_eq!(check("s          h          i          t"), CheckOutcome::Pass);
    }

    #[test]
    fn test_short_and_phrase_entries_are_skipped() {
        let mut wordlist = Wordlist::default();
        wordlist.insert("ok");
        wordlist.insert("son of a bitch");
        wordlist.insert("frak");
        let check = ObfuscationCheck::new(&wordlist).unwrap();
        assert_eq!(check.pattern_count(), 1);
    }
}
