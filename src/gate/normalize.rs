use super::GateError;
use regex::Regex;

const URL_PATTERN: &str = r"(?:https?://|www\.)\S+";
const EMAIL_PATTERN: &str = r"[\w.+-]+@[\w-]+(?:\.[\w-]+)+";

/// Canonical form the word checks compare against.
///
/// Lowercases, drops URLs and e-mail addresses, deletes everything that is
/// neither alphanumeric nor whitespace, then collapses whitespace. Deleting
/// punctuation (rather than replacing it) is what turns `fu.ck` into `fuck`.
pub struct Normalizer {
    url: Regex,
    email: Regex,
}

impl Normalizer {
    pub fn new() -> Result<Self, GateError> {
        Ok(Self {
            url: Regex::new(URL_PATTERN)?,
            email: Regex::new(EMAIL_PATTERN)?,
        })
    }

    /// Lowercased text with URLs and e-mail addresses blanked out.
    /// Punctuation and spacing are kept.
    pub fn strip_links(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let without_urls = self.url.replace_all(&lowered, " ");
        self.email.replace_all(&without_urls, " ").into_owned()
    }

    pub fn normalize(&self, text: &str) -> String {
        let kept: String = self
            .strip_links(text)
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();

        kept.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
