use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable identifier of a chat on the messaging transport.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(i64);

impl ChatId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChatId({})", self.0)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("lesson numbers start at 1")]
pub struct LessonNumberError;

/// 1-based position of a lesson within its language.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LessonNumber(u32);

impl LessonNumber {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(u32::MAX);

    /// Creates a lesson number.
    ///
    /// # Errors
    ///
    /// Returns `LessonNumberError` for zero.
    pub fn new(number: u32) -> Result<Self, LessonNumberError> {
        if number == 0 {
            return Err(LessonNumberError);
        }
        Ok(Self(number))
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for LessonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonNumber({})", self.0)
    }
}

impl fmt::Display for LessonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_number_rejects_zero() {
        assert_eq!(LessonNumber::new(0), Err(LessonNumberError));
        let first = LessonNumber::new(1).unwrap();
        assert_eq!(first.value(), 1);
        assert_eq!(first.to_string(), "1");
    }

    #[test]
    fn chat_id_formats_raw_value() {
        let id = ChatId::new(-100_123);
        assert_eq!(id.to_string(), "-100123");
        assert_eq!(format!("{id:?}"), "ChatId(-100123)");
    }
}
