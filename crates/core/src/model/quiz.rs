use thiserror::Error;
use url::Url;

use crate::model::Language;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizLinkError {
    #[error("invalid quiz url: {0}")]
    InvalidUrl(String),

    #[error("quiz url must use http or https: {0}")]
    UnsupportedScheme(String),
}

/// External quiz page for a language.
///
/// The link is validated but kept as configured, not in normalised form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizLink {
    language: Language,
    url: String,
}

impl QuizLink {
    /// Parses and validates a quiz link.
    ///
    /// # Errors
    ///
    /// Returns `QuizLinkError` if the URL does not parse or is not http(s).
    pub fn new(language: Language, raw: &str) -> Result<Self, QuizLinkError> {
        let raw = raw.trim();
        let parsed = Url::parse(raw).map_err(|e| QuizLinkError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(QuizLinkError::UnsupportedScheme(parsed.scheme().to_owned()));
        }
        Ok(Self {
            language,
            url: raw.to_owned(),
        })
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_fragment_and_path() {
        let link = QuizLink::new(
            Language::JavaScript,
            "https://itproger.com/test/javascript#google_vignette",
        )
        .unwrap();
        assert_eq!(link.url(), "https://itproger.com/test/javascript#google_vignette");
        assert_eq!(link.language(), Language::JavaScript);
    }

    #[test]
    fn returns_link_as_configured() {
        let link = QuizLink::new(Language::Python, "  https://itproger.com  ").unwrap();
        assert_eq!(link.url(), "https://itproger.com");

        let link = QuizLink::new(Language::Python, "HTTPS://ItProger.com/test/python").unwrap();
        assert_eq!(link.url(), "HTTPS://ItProger.com/test/python");
    }

    #[test]
    fn rejects_non_http_links() {
        assert!(matches!(
            QuizLink::new(Language::Sql, "ftp://example.com/quiz"),
            Err(QuizLinkError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            QuizLink::new(Language::Sql, "not a url"),
            Err(QuizLinkError::InvalidUrl(_))
        ));
    }
}
