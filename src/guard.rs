//! Content Guard: size-invariant validation applied before every write.
//!
//! Every write entry point (create, update, dual-language create/update,
//! merge operations) runs the same guard rather than re-deriving the checks
//! per operation. The guard is pure and runs before anything is recomputed
//! or persisted, so a violation aborts the whole write with no partial state.

use crate::error::EngineError;
use crate::model::Article;

/// Maximum length of an HTML content body, in characters.
pub const MAX_HTML_LEN: usize = 10_000_000;

/// Maximum length of a plain-text content body, in characters.
pub const MAX_PLAIN_TEXT_LEN: usize = 5_000_000;

/// Validate the size limits of a single content block.
///
/// `field` names the block in error reports, e.g. `content` or
/// `dualLanguage.ar.content`.
pub fn validate_content_size(
    field: &str,
    html: &str,
    plain_text: Option<&str>,
) -> Result<(), EngineError> {
    if html.chars().count() > MAX_HTML_LEN {
        return Err(EngineError::ContentTooLarge {
            field: field.to_string(),
        });
    }
    if let Some(text) = plain_text {
        if text.chars().count() > MAX_PLAIN_TEXT_LEN {
            return Err(EngineError::ContentTooLarge {
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

/// Validate every content block on an article: the primary block and each
/// dual-language overlay block independently. All checks must pass before
/// any persistence occurs.
pub fn validate_article_content(article: &Article) -> Result<(), EngineError> {
    validate_content_size(
        "content",
        &article.content.html,
        article.content.plain_text.as_deref(),
    )?;

    if let Some(overlay) = &article.dual_language {
        for (language, block) in overlay {
            let field = format!("dualLanguage.{}.content", language.code());
            validate_content_size(
                &field,
                &block.content.html,
                block.content.plain_text.as_deref(),
            )?;
        }
    }

    Ok(())
}
