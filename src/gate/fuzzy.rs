use super::lexicon::Wordlist;
use super::{CheckOutcome, ContentCheck, GateError, GateInput};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Similarity matching is limited to words at least this long; short words
/// are too close to ordinary vocabulary (`pass`/`ass`, `shirt`/`shit`).
const MIN_SIMILARITY_LEN: usize = 5;

/// Near-miss spellings on the normalized text: stretched letters
/// (`fuuuuck`, `shiiiit`) and longer entries with one letter dropped, added
/// or swapped with its neighbour (`motherfuckr`, `assholes`, `bastrad`).
///
/// A single substituted letter is not a near-miss. That edit mostly lands on
/// ordinary words (`jackals`, `shifty`, `ducking`).
pub struct FuzzyCheck {
    wordlist: Arc<Wordlist>,
    threshold: f64,
    candidates: Vec<String>,
}

impl FuzzyCheck {
    pub fn new(wordlist: Arc<Wordlist>, threshold: f64) -> Self {
        let mut candidates: Vec<String> = wordlist
            .words()
            .filter(|w| w.chars().count() >= MIN_SIMILARITY_LEN)
            .map(str::to_string)
            .collect();
        candidates.sort();
        Self {
            wordlist,
            threshold,
            candidates,
        }
    }

    fn check(&self, normalized: &str) -> CheckOutcome {
        for token in normalized.split(' ').filter(|t| !t.is_empty()) {
            if let Some(entry) = self.match_stretched(token) {
                return CheckOutcome::Reject(format!("stretched spelling of '{entry}'"));
            }
            if let Some((entry, score)) = self.match_similar(token) {
                return CheckOutcome::Reject(format!(
                    "close to '{entry}' (similarity {score:.2})"
                ));
            }
        }
        CheckOutcome::Pass
    }

    fn match_stretched(&self, token: &str) -> Option<String> {
        [1, 2]
            .into_iter()
            .filter_map(|keep| squash_runs(token, keep))
            .find(|squashed| self.wordlist.contains_word(squashed))
    }

    fn match_similar(&self, token: &str) -> Option<(&str, f64)> {
        let len = token.chars().count();
        if len < MIN_SIMILARITY_LEN {
            return None;
        }
        self.candidates
            .iter()
            .filter(|entry| entry.chars().count().abs_diff(len) <= 1)
            .filter(|entry| is_single_slip(token, entry))
            .map(|entry| (entry.as_str(), strsim::jaro_winkler(token, entry)))
            .find(|(_, score)| *score >= self.threshold)
    }
}

/// One dropped, added or transposed letter. Equal-length pairs at edit
/// distance 1 are either a transposition (two positions differ) or a
/// substitution (one does); only the former counts.
fn is_single_slip(token: &str, entry: &str) -> bool {
    if strsim::osa_distance(token, entry) != 1 {
        return false;
    }
    match strsim::hamming(token, entry) {
        Ok(differing) => differing == 2,
        Err(_) => true,
    }
}

/// Shorten every run of three or more identical characters to `keep`
/// characters. `None` when the token has no such run.
fn squash_runs(token: &str, keep: usize) -> Option<String> {
    let chars: Vec<char> = token.chars().collect();
    let mut out = String::with_capacity(token.len());
    let mut changed = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        if run >= 3 {
            changed = true;
            out.extend(std::iter::repeat_n(c, keep));
        } else {
            out.extend(std::iter::repeat_n(c, run));
        }
        i += run;
    }
    changed.then_some(out)
}

impl ContentCheck for FuzzyCheck {
    fn name(&self) -> &'static str {
        "fuzzy"
    }

    fn evaluate<'a>(
        &'a self,
        input: &'a GateInput,
    ) -> Pin<Box<dyn Future<Output = Result<CheckOutcome, GateError>> + Send + 'a>> {
        Box::pin(futures::future::ready(Ok(self.check(&input.normalized))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> CheckOutcome {
        FuzzyCheck::new(Arc::new(Wordlist::builtin()), 0.94).check(text)
    }

    #[test]
    fn test_squash_runs() {
        assert_eq!(squash_runs("fuuuuck", 1).as_deref(), Some("fuck"));
        assert_eq!(squash_runs("fuuuuck", 2).as_deref(), Some("fuuck"));
        assert_eq!(squash_runs("asssss", 2).as_deref(), Some("ass"));
        assert_eq!(squash_runs("book", 1), None);
    }

    #[test]
    fn test_stretched_letters_are_caught() {
        assert!(check("oh fuuuuuck").is_reject());
        assert!(check("shiiiiit happens").is_reject());
        assert!(check("what a biiiitch").is_reject());
    }

    #[test]
    fn test_single_slip() {
        assert!(is_single_slip("assholes", "asshole"));
        assert!(is_single_slip("motherfuckr", "motherfucker"));
        assert!(is_single_slip("bastrad", "bastard"));
        assert!(!is_single_slip("jackals", "jackass"));
        assert!(!is_single_slip("asshole", "asshole"));
        assert!(!is_single_slip("basted", "bastard"));
    }

    #[test]
    fn test_near_misses_of_long_entries_are_caught() {
        assert!(check("you assholes").is_reject());
        assert!(check("motherfuckr").is_reject());
        assert!(check("you bastrad").is_reject());
    }

    #[test]
    fn test_ordinary_words_pass() {
        for text in [
            "a classic pass",
            "nice shirt",
            "the banker and the tanker",
            "shifty basted ducking",
            "the jackals howled",
            "whorls and tankers",
            "hello world",
            "zzz sleeeepy",
        ] {
            assert_eq!(check(text), CheckOutcome::Pass, "{text}");
        }
    }

    #[test]
    fn test_threshold_is_respected() {
        let strict = FuzzyCheck::new(Arc::new(Wordlist::builtin()), 1.0);
        assert_eq!(strict.check("motherfuckr"), CheckOutcome::Pass);
    }
}
