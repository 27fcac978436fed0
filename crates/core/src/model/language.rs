use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LanguageError {
    #[error("unknown language: {0}")]
    Unknown(String),
}

/// The fixed set of programming languages the course covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Java,
    JavaScript,
    Python,
    Cpp,
    CSharp,
    Sql,
}

impl Language {
    /// All languages in menu order.
    pub const ALL: [Language; 6] = [
        Language::Java,
        Language::JavaScript,
        Language::Python,
        Language::Cpp,
        Language::CSharp,
        Language::Sql,
    ];

    /// Name shown to users and used as the storage key.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Sql => "SQL",
        }
    }

    /// Exact, case-sensitive match against the display names.
    #[must_use]
    pub fn from_display(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.display_name() == name)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_display(s).ok_or_else(|| LanguageError::Unknown(s.to_owned()))
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_names_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_display(lang.display_name()), Some(lang));
        }
        assert_eq!("C++".parse::<Language>(), Ok(Language::Cpp));
        assert_eq!("C#".parse::<Language>(), Ok(Language::CSharp));
    }

    #[test]
    fn matching_is_case_sensitive_and_exact() {
        assert_eq!(Language::from_display("python"), None);
        assert_eq!(Language::from_display("PYTHON"), None);
        assert_eq!(Language::from_display(" Python"), None);
        assert_eq!(Language::from_display("Python "), None);
        assert_eq!(Language::from_display("Javascript"), None);
        assert_eq!(
            "Rust".parse::<Language>(),
            Err(LanguageError::Unknown("Rust".into()))
        );
    }

    #[test]
    fn serializes_as_display_name() {
        let json = serde_json::to_string(&Language::CSharp).unwrap();
        assert_eq!(json, "\"C#\"");
        let back: Language = serde_json::from_str("\"SQL\"").unwrap();
        assert_eq!(back, Language::Sql);
        assert!(serde_json::from_str::<Language>("\"sql\"").is_err());
    }

    proptest! {
        #[test]
        fn only_members_of_the_fixed_set_are_accepted(input in "\\PC{0,12}") {
            let accepted = Language::from_display(&input).is_some();
            let member = ["Java", "JavaScript", "Python", "C++", "C#", "SQL"].contains(&input.as_str());
            prop_assert_eq!(accepted, member);
        }
    }
}
