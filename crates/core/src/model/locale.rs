use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LocaleError {
    #[error("unsupported locale: {0} (expected `en` or `uk`)")]
    Unsupported(String),
}

/// Language of the bot's own texts and of the built-in course outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Uk,
}

impl Locale {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Uk => "uk",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "uk" | "ua" => Ok(Locale::Uk),
            _ => Err(LocaleError::Unsupported(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_loosely() {
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert_eq!(" UK ".parse::<Locale>(), Ok(Locale::Uk));
        assert_eq!("ua".parse::<Locale>(), Ok(Locale::Uk));
        assert!(matches!(
            "de".parse::<Locale>(),
            Err(LocaleError::Unsupported(code)) if code == "de"
        ));
    }
}
