use regex::{Regex, RegexBuilder};

pub const LOCALE_FRENCH: &str = "fr-CA";
pub const LOCALE_ENGLISH: &str = "en-CA";

/// Title-based locale heuristic.
///
/// Titles default to French; any whole-word, case-insensitive stop word
/// match flips them to English.
#[derive(Debug, Clone)]
pub struct LocaleDetector {
    stop_words: Option<Regex>,
}

impl LocaleDetector {
    pub fn new<S: AsRef<str>>(stop_words: &[S]) -> Result<Self, regex::Error> {
        if stop_words.is_empty() {
            return Ok(Self { stop_words: None });
        }

        let alternation = stop_words
            .iter()
            .map(|w| regex::escape(w.as_ref()))
            .collect::<Vec<_>>()
            .join("|");

        let regex = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            stop_words: Some(regex),
        })
    }

    pub fn detect(&self, title: &str) -> &'static str {
        match &self.stop_words {
            Some(regex) if regex.is_match(title) => LOCALE_ENGLISH,
            _ => LOCALE_FRENCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STOP_WORDS_ENGLISH;

    fn detector() -> LocaleDetector {
        LocaleDetector::new(STOP_WORDS_ENGLISH).unwrap()
    }

    #[test]
    fn test_english_title() {
        assert_eq!(detector().detect("A guide about cloud computing"), "en-CA");
    }

    #[test]
    fn test_french_title() {
        assert_eq!(detector().detect("Gérer mes clés OpenPGP"), "fr-CA");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(detector().detect("THE Big Picture"), "en-CA");
    }

    #[test]
    fn test_whole_words_only() {
        assert_eq!(detector().detect("Andromède et thermodynamique"), "fr-CA");
        assert_eq!(detector().detect("Installation de Debian"), "fr-CA");
    }

    #[test]
    fn test_empty_title_is_french() {
        assert_eq!(detector().detect(""), "fr-CA");
    }

    #[test]
    fn test_no_stop_words_always_french() {
        let detector = LocaleDetector::new::<&str>(&[]).unwrap();
        assert_eq!(detector.detect("The thing about your key"), "fr-CA");
    }
}
