//! The article record and its write payloads.
//!
//! An article carries its canonical content in a primary language and may
//! additionally carry secondary-language content in two forms: a full
//! per-language overlay block (`dual_language`) mirroring the primary content
//! shape, and three narrow per-field overlay maps (`dual_language_author`,
//! `dual_language_title`, `dual_language_subtitle`) for the cases where only
//! those fields need a second-language variant. The two forms have different
//! merge semantics and are kept as distinct structures on purpose.

use std::collections::BTreeMap;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Publish status of an article or of one of its language blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// An HTML content body with its derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
    /// Derived from `plain_text`; recomputed by the consistency pass, never
    /// author-supplied.
    #[serde(default)]
    pub word_count: u32,
}

impl ContentBlock {
    pub fn plain_text_str(&self) -> &str {
        self.plain_text.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedImage {
    pub url: String,
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SeoMeta {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_image: Option<String>,
}

/// Reference to the series an article belongs to, with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRef {
    pub series: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub shares: u64,
    /// Minutes, derived from the primary content's plain text.
    #[serde(default)]
    pub reading_time: u32,
}

/// A full secondary-language content block, mirroring the primary shape.
/// Each block publishes independently of the primary language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedContent {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: ContentBlock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SeoMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
    #[serde(default)]
    pub status: ArticleStatus,
}

impl LocalizedContent {
    /// A block counts as empty when it carries neither a title nor any
    /// content body.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.content.html.is_empty()
            && self.content.plain_text_str().is_empty()
    }
}

/// Provenance record for one machine-translated target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationMeta {
    pub status: String,
    pub last_translated_at: DateTime<Utc>,
    pub translation_provider: String,
}

/// The persisted article record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub slug: String,
    pub language: Language,

    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub author: String,
    pub content: ContentBlock,
    pub featured_image: FeaturedImage,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesRef>,
    #[serde(default)]
    pub meta: SeoMeta,

    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_latest: bool,

    #[serde(default)]
    pub stats: Stats,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language: Option<BTreeMap<Language, LocalizedContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language_author: Option<BTreeMap<Language, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language_title: Option<BTreeMap<Language, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language_subtitle: Option<BTreeMap<Language, String>>,

    #[serde(default)]
    pub translation_meta: BTreeMap<Language, TranslationMeta>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// The overlay block for a language, if one exists.
    pub fn overlay(&self, language: Language) -> Option<&LocalizedContent> {
        self.dual_language.as_ref().and_then(|m| m.get(&language))
    }
}

// ==================== Write payloads ====================

/// Author-supplied content body for create/update payloads. Derived fields
/// are not accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContentInput {
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
}

impl ContentInput {
    pub fn into_block(self) -> ContentBlock {
        ContentBlock {
            html: self.html,
            plain_text: self.plain_text,
            word_count: 0,
        }
    }
}

/// Partial secondary-language content, merged shallowly over an existing
/// overlay block: supplied fields replace, omitted fields are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SeoMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
}

/// Per-language values for the narrow author/title/subtitle overlays.
/// Applied additively: empty values never erase an existing overlay entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<BTreeMap<Language, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<BTreeMap<Language, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<BTreeMap<Language, String>>,
}

/// Payload for creating an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    pub slug: String,
    pub language: Language,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub author: String,
    pub content: ContentInput,
    pub featured_image: FeaturedImage,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesRef>,
    #[serde(default)]
    pub meta: SeoMeta,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_latest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language: Option<BTreeMap<Language, LocalizedContentPatch>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language_author: Option<BTreeMap<Language, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language_title: Option<BTreeMap<Language, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language_subtitle: Option<BTreeMap<Language, String>>,
}

/// Partial update payload for an article. Omitted fields are left untouched;
/// overlay entries merge per the dual-language merge rules rather than
/// replacing the whole overlay.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SeoMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_latest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language: Option<BTreeMap<Language, LocalizedContentPatch>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language_author: Option<BTreeMap<Language, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language_title: Option<BTreeMap<Language, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual_language_subtitle: Option<BTreeMap<Language, String>>,
}

/// The ephemeral result of a preview translation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationPreview {
    pub language: Language,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub html: String,
}

/// A minimal valid article for unit tests across the crate.
#[cfg(test)]
pub(crate) fn sample_article() -> Article {
    let now = Utc::now();
    Article {
        id: None,
        slug: "hello-world".to_string(),
        language: Language::English,
        title: "Hello World".to_string(),
        subtitle: Some("A greeting".to_string()),
        excerpt: Some("The classic first post.".to_string()),
        author: "Jane Doe".to_string(),
        content: ContentBlock {
            html: "<p>Hello, world.</p>".to_string(),
            plain_text: Some("Hello, world.".to_string()),
            word_count: 0,
        },
        featured_image: FeaturedImage {
            url: "https://cdn.example.com/hello.jpg".to_string(),
            alt: "A sunrise".to_string(),
            caption: None,
        },
        categories: vec!["general".to_string()],
        series: None,
        meta: SeoMeta::default(),
        status: ArticleStatus::Draft,
        is_featured: false,
        is_latest: false,
        stats: Stats::default(),
        dual_language: None,
        dual_language_author: None,
        dual_language_title: None,
        dual_language_subtitle: None,
        translation_meta: BTreeMap::new(),
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_camel_case() {
        let article = sample_article();
        let value = serde_json::to_value(&article).expect("serialize");

        assert!(value.get("featuredImage").is_some());
        assert!(value.get("isFeatured").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value["content"].get("wordCount").is_some());
        // absent optionals stay off the wire
        assert!(value.get("dualLanguage").is_none());
        assert!(value.get("_id").is_none());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ArticleStatus::Published).unwrap(),
            "\"published\""
        );
    }

    #[test]
    fn test_localized_content_is_empty() {
        let block = LocalizedContent::default();
        assert!(block.is_empty());

        let with_title = LocalizedContent {
            title: "T".to_string(),
            ..Default::default()
        };
        assert!(!with_title.is_empty());

        let with_html = LocalizedContent {
            content: ContentBlock {
                html: "<p>x</p>".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!with_html.is_empty());
    }

    #[test]
    fn test_overlay_lookup() {
        let mut article = sample_article();
        assert!(article.overlay(Language::Arabic).is_none());

        let mut overlay = BTreeMap::new();
        overlay.insert(
            Language::Arabic,
            LocalizedContent {
                title: "مرحبا".to_string(),
                ..Default::default()
            },
        );
        article.dual_language = Some(overlay);

        assert_eq!(article.overlay(Language::Arabic).unwrap().title, "مرحبا");
        assert!(article.overlay(Language::Turkish).is_none());
    }

    #[test]
    fn test_patch_deserializes_with_missing_fields() {
        let patch: ArticlePatch = serde_json::from_str(r#"{"title": "New"}"#).expect("parse");
        assert_eq!(patch.title.as_deref(), Some("New"));
        assert!(patch.content.is_none());
        assert!(patch.dual_language.is_none());
    }

    #[test]
    fn test_draft_defaults() {
        let draft: ArticleDraft = serde_json::from_str(
            r#"{
                "slug": "s",
                "language": "en",
                "title": "T",
                "content": {"html": "<p>x</p>"},
                "featuredImage": {"url": "u", "alt": "a"}
            }"#,
        )
        .expect("parse");

        assert_eq!(draft.status, ArticleStatus::Draft);
        assert!(!draft.is_featured);
        assert!(draft.author.is_empty());
        assert!(draft.categories.is_empty());
    }
}
