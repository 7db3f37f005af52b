use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

pub type Result<T> = core::result::Result<T, EngineError>;

/// Errors produced by the article engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A content block exceeded its size limit. `field` names the offending
    /// block (e.g. `content`, `dualLanguage.ar.content`).
    #[error("content too large in field '{field}'")]
    ContentTooLarge { field: String },

    #[error("article not found")]
    ArticleNotFound,

    #[error("dual-language article requires at least one language content block")]
    DualLanguageRequired,

    #[error("translation provider error: {detail}")]
    TranslationProviderError { detail: String },

    #[error("an article with slug '{slug}' already exists for language '{language}'")]
    DuplicateSlugLanguage { slug: String, language: String },

    #[error("unsupported language code: '{code}'")]
    InvalidLanguage { code: String },

    #[error("invalid identifier: '{value}'")]
    InvalidIdentifier { value: String },

    #[error(transparent)]
    Store(#[from] mongodb::error::Error),
}

impl IntoResponse for EngineError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            EngineError::ContentTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, self.to_string())
            }
            EngineError::ArticleNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            EngineError::DualLanguageRequired => (StatusCode::BAD_REQUEST, self.to_string()),
            EngineError::TranslationProviderError { .. } => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            EngineError::DuplicateSlugLanguage { .. } => (StatusCode::CONFLICT, self.to_string()),
            EngineError::InvalidLanguage { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            EngineError::InvalidIdentifier { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            EngineError::Store(e) => {
                tracing::error!(%e, "store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_too_large_names_field() {
        let err = EngineError::ContentTooLarge {
            field: "dualLanguage.ar.content".to_string(),
        };
        assert!(err.to_string().contains("dualLanguage.ar.content"));
    }

    #[test]
    fn test_duplicate_slug_language_message() {
        let err = EngineError::DuplicateSlugLanguage {
            slug: "hello-world".to_string(),
            language: "ar".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("hello-world"));
        assert!(message.contains("ar"));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                EngineError::ContentTooLarge {
                    field: "content".to_string(),
                },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (EngineError::ArticleNotFound, StatusCode::NOT_FOUND),
            (EngineError::DualLanguageRequired, StatusCode::BAD_REQUEST),
            (
                EngineError::TranslationProviderError {
                    detail: "boom".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                EngineError::DuplicateSlugLanguage {
                    slug: "s".to_string(),
                    language: "en".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                EngineError::InvalidLanguage {
                    code: "xx".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
