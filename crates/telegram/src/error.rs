use reqwest::StatusCode;
use thiserror::Error;

use services::TransportError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TelegramError {
    #[error("request failed: {0}")]
    Http(reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    HttpStatus(StatusCode),
    #[error("telegram API error ({code:?}): {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
    #[error("telegram reported success without a result")]
    MissingResult,
}

impl From<reqwest::Error> for TelegramError {
    // Request URLs embed the bot token.
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

impl From<TelegramError> for TransportError {
    fn from(err: TelegramError) -> Self {
        match err {
            TelegramError::Api { code, description } => Self::Rejected { code, description },
            other => Self::Unavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_become_rejections() {
        let err = TelegramError::Api {
            code: Some(403),
            description: "Forbidden: bot was blocked by the user".into(),
        };
        assert_eq!(
            TransportError::from(err),
            TransportError::Rejected {
                code: Some(403),
                description: "Forbidden: bot was blocked by the user".into(),
            }
        );
    }

    #[test]
    fn status_errors_become_unavailable() {
        let err = TelegramError::HttpStatus(StatusCode::BAD_GATEWAY);
        assert!(matches!(
            TransportError::from(err),
            TransportError::Unavailable(msg) if msg.contains("502")
        ));
    }
}
