use super::{CheckOutcome, ContentCheck, GateError, GateInput};
use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

/// Entries shipped with the relay. `WORDLIST_PATH` adds to these.
const BUILTIN_ENTRIES: &[&str] = &[
    "arse",
    "arsehole",
    "ass",
    "asshole",
    "bastard",
    "bitch",
    "bitches",
    "bollocks",
    "bullshit",
    "cock",
    "cunt",
    "dickhead",
    "dipshit",
    "douchebag",
    "fuck",
    "fucked",
    "fucker",
    "fucking",
    "fucks",
    "goddamn",
    "horseshit",
    "jackass",
    "motherfucker",
    "piss",
    "pissed",
    "shit",
    "shithead",
    "shitty",
    "slut",
    "twat",
    "wanker",
    "whore",
    "piece of shit",
    "son of a bitch",
];

/// Blocked vocabulary, split into single words (token lookups) and
/// multi-word phrases (substring lookups).
#[derive(Debug, Clone, Default)]
pub struct Wordlist {
    words: HashSet<String>,
    phrases: Vec<String>,
}

impl Wordlist {
    pub fn builtin() -> Self {
        let mut wordlist = Self::default();
        for entry in BUILTIN_ENTRIES {
            wordlist.insert(entry);
        }
        wordlist
    }

    /// Add one entry. Entries are folded the same way messages are
    /// normalized; an entry that folds to nothing is ignored.
    pub fn insert(&mut self, entry: &str) -> bool {
        let folded = fold_entry(entry);
        if folded.is_empty() {
            return false;
        }
        if folded.contains(' ') {
            if self.phrases.contains(&folded) {
                return false;
            }
            self.phrases.push(folded);
            true
        } else {
            self.words.insert(folded)
        }
    }

    /// Add entries from text: one per line, `#` starts a comment line,
    /// blank lines are skipped. Returns how many new entries were added.
    pub fn extend_from_str(&mut self, content: &str) -> usize {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter(|line| self.insert(line))
            .count()
    }

    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize, GateError> {
        let content = std::fs::read_to_string(path).map_err(|e| GateError::Wordlist {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(self.extend_from_str(&content))
    }

    pub fn contains_word(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.phrases.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len() + self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn fold_entry(entry: &str) -> String {
    entry
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Exact wordlist lookup on the normalized text.
pub struct LexiconCheck {
    wordlist: Arc<Wordlist>,
}

impl LexiconCheck {
    pub fn new(wordlist: Arc<Wordlist>) -> Self {
        Self { wordlist }
    }

    fn check(&self, normalized: &str) -> CheckOutcome {
        if let Some(token) = normalized
            .split(' ')
            .find(|token| self.wordlist.contains_word(token))
        {
            return CheckOutcome::Reject(format!("wordlist term '{token}'"));
        }

        let padded = format!(" {normalized} ");
        if let Some(phrase) = self
            .wordlist
            .phrases()
            .find(|phrase| padded.contains(&format!(" {phrase} ")))
        {
            return CheckOutcome::Reject(format!("wordlist phrase '{phrase}'"));
        }

        CheckOutcome::Pass
    }
}

impl ContentCheck for LexiconCheck {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn evaluate<'a>(
        &'a self,
        input: &'a GateInput,
    ) -> Pin<Box<dyn Future<Output = Result<CheckOutcome, GateError>> + Send + 'a>> {
        Box::pin(futures::future::ready(Ok(self.check(&input.normalized))))
    }
}
