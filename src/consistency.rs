//! The pre-write consistency pass.
//!
//! Runs on every persist, before the write is handed to the store. Order
//! matters: the Content Guard runs first, and a size violation aborts the
//! whole write with nothing recomputed or stamped.
//!
//! Word counts and reading time are recomputed only when the underlying
//! plain text changed (or the record is new). Unchanged text keeps its
//! stored derived values untouched; they are restored from the previous
//! record rather than recounted.

use chrono::Utc;

use crate::error::EngineError;
use crate::guard;
use crate::language::Language;
use crate::model::Article;
use crate::reading_time;

/// Validate and normalize an article ahead of a persist operation.
///
/// `previous` is the stored record for updates, `None` for creates.
pub fn finalize_for_write(
    article: &mut Article,
    previous: Option<&Article>,
) -> Result<(), EngineError> {
    guard::validate_article_content(article)?;

    let is_new = previous.is_none();

    recompute_primary(article, previous, is_new);
    recompute_overlays(article, previous, is_new);
    default_fill_from_english(article, previous, is_new);

    let now = Utc::now();
    article.updated_at = now;
    if is_new {
        article.created_at = now;
    }

    Ok(())
}

fn recompute_primary(article: &mut Article, previous: Option<&Article>, is_new: bool) {
    let changed = match previous {
        Some(prev) => prev.content.plain_text != article.content.plain_text,
        None => true,
    };

    if is_new || changed {
        let words = reading_time::word_count(article.content.plain_text_str());
        article.content.word_count = words;
        article.stats.reading_time = reading_time::reading_minutes_for_words(words);
    } else if let Some(prev) = previous {
        article.content.word_count = prev.content.word_count;
        article.stats.reading_time = prev.stats.reading_time;
    }
}

fn recompute_overlays(article: &mut Article, previous: Option<&Article>, is_new: bool) {
    let Some(overlay) = article.dual_language.as_mut() else {
        return;
    };

    for (language, block) in overlay.iter_mut() {
        let prev_block = previous.and_then(|p| p.overlay(*language));
        let changed = match prev_block {
            Some(prev) => prev.content.plain_text != block.content.plain_text,
            None => true,
        };

        if is_new || changed {
            block.content.word_count =
                reading_time::word_count(block.content.plain_text_str());
        } else if let Some(prev) = prev_block {
            block.content.word_count = prev.content.word_count;
        }
    }
}

/// One-directional default-fill of the primary author/title/subtitle from
/// the English narrow overlays. Fires only when the primary field is empty
/// and the English overlay value is present and newly set (or the record is
/// new); a non-empty primary field is never overwritten.
fn default_fill_from_english(article: &mut Article, previous: Option<&Article>, is_new: bool) {
    let en = Language::English;

    let overlay_author = article
        .dual_language_author
        .as_ref()
        .and_then(|m| m.get(&en))
        .cloned();
    if let Some(value) = overlay_author {
        let prev_value = previous
            .and_then(|p| p.dual_language_author.as_ref())
            .and_then(|m| m.get(&en));
        let newly_set = is_new || prev_value != Some(&value);
        if newly_set && !value.is_empty() && article.author.is_empty() {
            article.author = value;
        }
    }

    let overlay_title = article
        .dual_language_title
        .as_ref()
        .and_then(|m| m.get(&en))
        .cloned();
    if let Some(value) = overlay_title {
        let prev_value = previous
            .and_then(|p| p.dual_language_title.as_ref())
            .and_then(|m| m.get(&en));
        let newly_set = is_new || prev_value != Some(&value);
        if newly_set && !value.is_empty() && article.title.is_empty() {
            article.title = value;
        }
    }

    let overlay_subtitle = article
        .dual_language_subtitle
        .as_ref()
        .and_then(|m| m.get(&en))
        .cloned();
    if let Some(value) = overlay_subtitle {
        let prev_value = previous
            .and_then(|p| p.dual_language_subtitle.as_ref())
            .and_then(|m| m.get(&en));
        let newly_set = is_new || prev_value != Some(&value);
        let subtitle_empty = article.subtitle.as_deref().unwrap_or("").is_empty();
        if newly_set && !value.is_empty() && subtitle_empty {
            article.subtitle = Some(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::MAX_HTML_LEN;
    use crate::model::{sample_article, ContentBlock, LocalizedContent};
    use std::collections::BTreeMap;

    fn with_plain_text(text: &str) -> Article {
        let mut article = sample_article();
        article.content.plain_text = Some(text.to_string());
        article
    }

    // ==================== Primary Recompute Tests ====================

    #[test]
    fn test_create_recomputes_word_count_and_reading_time() {
        let mut article = with_plain_text(&"word ".repeat(450));

        finalize_for_write(&mut article, None).expect("Should pass");

        assert_eq!(article.content.word_count, 450);
        assert_eq!(article.stats.reading_time, 3);
    }

    #[test]
    fn test_create_empty_text_floors_reading_time() {
        let mut article = with_plain_text("");

        finalize_for_write(&mut article, None).expect("Should pass");

        assert_eq!(article.content.word_count, 0);
        assert_eq!(article.stats.reading_time, 1);
    }

    #[test]
    fn test_update_with_changed_text_recomputes() {
        let mut previous = with_plain_text("one two three");
        finalize_for_write(&mut previous, None).expect("Should pass");
        assert_eq!(previous.content.word_count, 3);

        let mut updated = previous.clone();
        updated.content.plain_text = Some("one two three four five".to_string());

        finalize_for_write(&mut updated, Some(&previous)).expect("Should pass");
        assert_eq!(updated.content.word_count, 5);
    }

    #[test]
    fn test_update_with_unchanged_text_keeps_stored_values() {
        let mut previous = with_plain_text("one two three");
        finalize_for_write(&mut previous, None).expect("Should pass");
        // Simulate a stored record whose derived fields predate a formula
        // change; unchanged text must not trigger a recount.
        previous.content.word_count = 999;
        previous.stats.reading_time = 42;

        let mut updated = previous.clone();
        updated.title = "Retitled".to_string();
        updated.content.word_count = 0; // clobbered by patch application

        finalize_for_write(&mut updated, Some(&previous)).expect("Should pass");

        assert_eq!(updated.content.word_count, 999);
        assert_eq!(updated.stats.reading_time, 42);
    }

    // ==================== Overlay Recompute Tests ====================

    #[test]
    fn test_overlay_word_counts_are_scoped_per_language() {
        let mut previous = sample_article();
        let mut overlay = BTreeMap::new();
        overlay.insert(
            Language::English,
            LocalizedContent {
                content: ContentBlock {
                    html: String::new(),
                    plain_text: Some("alpha beta".to_string()),
                    word_count: 0,
                },
                ..Default::default()
            },
        );
        overlay.insert(
            Language::Arabic,
            LocalizedContent {
                content: ContentBlock {
                    html: String::new(),
                    plain_text: Some("واحد اثنان ثلاثة".to_string()),
                    word_count: 0,
                },
                ..Default::default()
            },
        );
        previous.dual_language = Some(overlay);
        finalize_for_write(&mut previous, None).expect("Should pass");

        {
            let overlay = previous.dual_language.as_ref().unwrap();
            assert_eq!(overlay.get(&Language::English).unwrap().content.word_count, 2);
            assert_eq!(overlay.get(&Language::Arabic).unwrap().content.word_count, 3);
        }

        // Change only the Arabic text; the English count must be carried, not
        // recounted.
        let mut updated = previous.clone();
        {
            let overlay = updated.dual_language.as_mut().unwrap();
            let ar = overlay.get_mut(&Language::Arabic).unwrap();
            ar.content.plain_text = Some("واحد اثنان".to_string());
            let en = overlay.get_mut(&Language::English).unwrap();
            en.content.word_count = 0;
        }

        finalize_for_write(&mut updated, Some(&previous)).expect("Should pass");

        let overlay = updated.dual_language.as_ref().unwrap();
        assert_eq!(overlay.get(&Language::Arabic).unwrap().content.word_count, 2);
        assert_eq!(overlay.get(&Language::English).unwrap().content.word_count, 2);
    }

    // ==================== Guard Ordering Tests ====================

    #[test]
    fn test_guard_violation_aborts_before_recompute() {
        let mut article = with_plain_text("some words here");
        article.content.html = "a".repeat(MAX_HTML_LEN + 1);

        let result = finalize_for_write(&mut article, None);

        assert!(matches!(
            result,
            Err(EngineError::ContentTooLarge { .. })
        ));
        // Nothing recomputed or stamped.
        assert_eq!(article.content.word_count, 0);
        assert_eq!(article.stats.reading_time, 0);
    }

    // ==================== Default-Fill Tests ====================

    #[test]
    fn test_default_fill_populates_empty_author_on_create() {
        let mut article = sample_article();
        article.author = String::new();
        let mut authors = BTreeMap::new();
        authors.insert(Language::English, "X".to_string());
        article.dual_language_author = Some(authors);

        finalize_for_write(&mut article, None).expect("Should pass");

        assert_eq!(article.author, "X");
    }

    #[test]
    fn test_default_fill_never_overwrites_existing_author() {
        let mut previous = sample_article();
        previous.author = "Y".to_string();
        finalize_for_write(&mut previous, None).expect("Should pass");

        let mut updated = previous.clone();
        let mut authors = BTreeMap::new();
        authors.insert(Language::English, "X".to_string());
        updated.dual_language_author = Some(authors);

        finalize_for_write(&mut updated, Some(&previous)).expect("Should pass");

        assert_eq!(updated.author, "Y");
    }

    #[test]
    fn test_default_fill_requires_newly_set_overlay() {
        // The overlay value was already stored before; clearing the primary
        // later must not re-trigger the fill.
        let mut previous = sample_article();
        let mut titles = BTreeMap::new();
        titles.insert(Language::English, "Overlay title".to_string());
        previous.dual_language_title = Some(titles);
        finalize_for_write(&mut previous, None).expect("Should pass");

        let mut updated = previous.clone();
        updated.title = String::new();

        finalize_for_write(&mut updated, Some(&previous)).expect("Should pass");

        assert!(updated.title.is_empty());
    }

    #[test]
    fn test_default_fill_title_and_subtitle() {
        let mut article = sample_article();
        article.title = String::new();
        article.subtitle = None;

        let mut titles = BTreeMap::new();
        titles.insert(Language::English, "Filled title".to_string());
        article.dual_language_title = Some(titles);

        let mut subtitles = BTreeMap::new();
        subtitles.insert(Language::English, "Filled subtitle".to_string());
        article.dual_language_subtitle = Some(subtitles);

        finalize_for_write(&mut article, None).expect("Should pass");

        assert_eq!(article.title, "Filled title");
        assert_eq!(article.subtitle.as_deref(), Some("Filled subtitle"));
    }

    #[test]
    fn test_default_fill_ignores_non_english_overlay() {
        let mut article = sample_article();
        article.author = String::new();
        let mut authors = BTreeMap::new();
        authors.insert(Language::Arabic, "كاتب".to_string());
        article.dual_language_author = Some(authors);

        finalize_for_write(&mut article, None).expect("Should pass");

        assert!(article.author.is_empty());
    }

    // ==================== Timestamp Tests ====================

    #[test]
    fn test_create_stamps_both_timestamps() {
        let mut article = sample_article();
        let before = Utc::now();

        finalize_for_write(&mut article, None).expect("Should pass");

        assert!(article.created_at >= before);
        assert_eq!(article.created_at, article.updated_at);
    }

    #[test]
    fn test_update_keeps_created_at() {
        let mut previous = sample_article();
        finalize_for_write(&mut previous, None).expect("Should pass");
        let created = previous.created_at;

        let mut updated = previous.clone();
        updated.content.plain_text = Some("different text now".to_string());
        finalize_for_write(&mut updated, Some(&previous)).expect("Should pass");

        assert_eq!(updated.created_at, created);
        assert!(updated.updated_at >= created);
    }
}
