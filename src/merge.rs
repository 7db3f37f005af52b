//! Dual-language merge rules.
//!
//! Two overlay mechanisms coexist on an article and merge differently:
//!
//! - the full `dual_language` content block merges by shallow per-field
//!   overwrite: supplied fields replace, omitted fields survive from the
//!   existing block;
//! - the narrow author/title/subtitle maps merge additively only: a value is
//!   written only when non-empty, so an empty or absent input can never erase
//!   an existing overlay entry.
//!
//! The asymmetry is observable behavior and both rules are kept exactly as
//! they are. An existing overlay block is never replaced wholesale.

use std::collections::BTreeMap;

use crate::language::Language;
use crate::model::{
    Article, ArticleStatus, LocalizedContent, LocalizedContentPatch, SecondaryFields,
};

/// Merge a partial secondary-language payload over an existing overlay block.
///
/// Returns the merged block. When no block exists yet the patch seeds a new
/// one. A merged block without an explicit status defaults to draft.
pub fn merge_localized_content(
    existing: Option<&LocalizedContent>,
    patch: LocalizedContentPatch,
) -> LocalizedContent {
    let mut block = existing.cloned().unwrap_or_default();

    if let Some(title) = patch.title {
        block.title = title;
    }
    if let Some(subtitle) = patch.subtitle {
        block.subtitle = Some(subtitle);
    }
    if let Some(excerpt) = patch.excerpt {
        block.excerpt = Some(excerpt);
    }
    if let Some(content) = patch.content {
        // Shallow: a supplied content body replaces the whole block,
        // including any previously stored plain text.
        block.content = content.into_block();
    }
    if let Some(image) = patch.featured_image {
        block.featured_image = Some(image);
    }
    if let Some(meta) = patch.meta {
        block.meta = Some(meta);
    }
    if let Some(read_time) = patch.read_time {
        block.read_time = Some(read_time);
    }
    if let Some(status) = patch.status {
        block.status = status;
    } else if existing.is_none() {
        block.status = ArticleStatus::Draft;
    }

    block
}

/// Merge a full set of per-language content patches into an article's
/// overlay map, initializing the map when absent.
pub fn apply_content_overlays(
    article: &mut Article,
    patches: BTreeMap<Language, LocalizedContentPatch>,
) {
    let overlay = article.dual_language.get_or_insert_with(BTreeMap::new);
    for (language, patch) in patches {
        let merged = merge_localized_content(overlay.get(&language), patch);
        overlay.insert(language, merged);
    }
}

/// Apply the narrow author/title/subtitle overlays to an article.
///
/// Each map is created empty when it does not yet exist; then each supplied
/// language key is set only if its value is non-empty.
pub fn apply_field_overlays(article: &mut Article, fields: SecondaryFields) {
    if let Some(values) = fields.author {
        merge_overlay_map(
            article.dual_language_author.get_or_insert_with(BTreeMap::new),
            values,
        );
    }
    if let Some(values) = fields.title {
        merge_overlay_map(
            article.dual_language_title.get_or_insert_with(BTreeMap::new),
            values,
        );
    }
    if let Some(values) = fields.subtitle {
        merge_overlay_map(
            article.dual_language_subtitle.get_or_insert_with(BTreeMap::new),
            values,
        );
    }
}

fn merge_overlay_map(target: &mut BTreeMap<Language, String>, values: BTreeMap<Language, String>) {
    for (language, value) in values {
        if !value.is_empty() {
            target.insert(language, value);
        }
    }
}
