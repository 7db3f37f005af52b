//! Article service: the engine's produced interface.
//!
//! Owns the write path (guard → merge → consistency pass → store) and the
//! translation orchestration. The store and the translator are injected so
//! the whole layer runs against fakes in tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use bson::oid::ObjectId;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::consistency::finalize_for_write;
use crate::error::EngineError;
use crate::language::Language;
use crate::merge;
use crate::model::{
    Article, ArticleDraft, ArticlePatch, LocalizedContentPatch, SecondaryFields, Stats,
    TranslationMeta, TranslationPreview,
};
use crate::store::{ArticleFilter, ArticleStore};
use crate::translator::Translator;

/// Provenance marker stored for machine-produced siblings.
const MACHINE_TRANSLATED: &str = "machine";

/// One page of a listing, with the total match count for pagination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    pub items: Vec<Article>,
    pub total: u64,
    pub page: u64,
    pub limit: i64,
}

pub struct ArticleService {
    store: Arc<dyn ArticleStore>,
    translator: Translator,
}

impl ArticleService {
    pub fn new(store: Arc<dyn ArticleStore>, translator: Translator) -> Self {
        Self { store, translator }
    }

    // ==================== CRUD ====================

    pub async fn create_article(&self, draft: ArticleDraft) -> Result<Article, EngineError> {
        let mut article = article_from_draft(draft);

        // Pre-check for a friendlier error; the unique index still backs
        // this up against races.
        if self
            .store
            .find_by_slug_language(&article.slug, article.language)
            .await?
            .is_some()
        {
            return Err(EngineError::DuplicateSlugLanguage {
                slug: article.slug,
                language: article.language.code().to_string(),
            });
        }

        finalize_for_write(&mut article, None)?;
        let stored = self.store.insert(article).await?;
        info!(slug = %stored.slug, language = %stored.language, "created article");
        Ok(stored)
    }

    pub async fn update_article(
        &self,
        id: ObjectId,
        patch: ArticlePatch,
    ) -> Result<Article, EngineError> {
        let previous = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(EngineError::ArticleNotFound)?;

        let mut article = previous.clone();
        apply_patch(&mut article, patch);
        finalize_for_write(&mut article, Some(&previous))?;

        self.store.save(&article).await?;
        Ok(article)
    }

    pub async fn delete_article(&self, id: ObjectId) -> Result<(), EngineError> {
        if !self.store.delete_by_id(id).await? {
            return Err(EngineError::ArticleNotFound);
        }
        info!(%id, "deleted article");
        Ok(())
    }

    pub async fn list_articles(
        &self,
        filter: ArticleFilter,
        limit: i64,
        page: u64,
    ) -> Result<ArticlePage, EngineError> {
        let limit = limit.max(1);
        let page = page.max(1);
        let skip = (page - 1) * limit as u64;

        let items = self.store.list(&filter, skip, limit).await?;
        let total = self.store.count(&filter).await?;

        Ok(ArticlePage {
            items,
            total,
            page,
            limit,
        })
    }

    /// Exact `(slug, language)` lookup, falling back to a record whose
    /// dual-language overlay carries a block for the requested language.
    pub async fn get_article_by_slug(
        &self,
        slug: &str,
        language: Language,
    ) -> Result<Article, EngineError> {
        if let Some(article) = self.store.find_by_slug_language(slug, language).await? {
            return Ok(article);
        }
        self.store
            .find_dual_language_fallback(slug, language)
            .await?
            .ok_or(EngineError::ArticleNotFound)
    }

    // ==================== Dual-language writes ====================

    pub async fn create_dual_language_article(
        &self,
        draft: ArticleDraft,
    ) -> Result<Article, EngineError> {
        let has_block = |patches: &BTreeMap<Language, LocalizedContentPatch>, lang| {
            patches
                .get(&lang)
                .map(|p| !merge::merge_localized_content(None, p.clone()).is_empty())
                .unwrap_or(false)
        };

        let populated = draft
            .dual_language
            .as_ref()
            .map(|patches| {
                has_block(patches, Language::English) || has_block(patches, Language::Arabic)
            })
            .unwrap_or(false);
        if !populated {
            return Err(EngineError::DualLanguageRequired);
        }

        self.create_article(draft).await
    }

    pub async fn update_dual_language_article(
        &self,
        id: ObjectId,
        patch: ArticlePatch,
    ) -> Result<Article, EngineError> {
        // Same write path as a plain update; overlay entries in the patch
        // merge block-by-block and never replace the overlay wholesale.
        self.update_article(id, patch).await
    }

    /// Merge a partial secondary-language content block into an article.
    ///
    /// Load-merge-save is not atomic against concurrent writers to the same
    /// record; last write wins, matching the source system.
    pub async fn add_secondary_language_content(
        &self,
        id: ObjectId,
        language: Language,
        patch: LocalizedContentPatch,
    ) -> Result<Article, EngineError> {
        let previous = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(EngineError::ArticleNotFound)?;

        let mut article = previous.clone();
        let mut patches = BTreeMap::new();
        patches.insert(language, patch);
        merge::apply_content_overlays(&mut article, patches);

        finalize_for_write(&mut article, Some(&previous))?;
        self.store.save(&article).await?;
        info!(slug = %article.slug, language = %language, "merged secondary-language content");
        Ok(article)
    }

    /// Apply the narrow author/title/subtitle overlays (additive-only).
    pub async fn add_secondary_language_fields(
        &self,
        id: ObjectId,
        fields: SecondaryFields,
    ) -> Result<Article, EngineError> {
        let previous = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(EngineError::ArticleNotFound)?;

        let mut article = previous.clone();
        merge::apply_field_overlays(&mut article, fields);

        finalize_for_write(&mut article, Some(&previous))?;
        self.store.save(&article).await?;
        Ok(article)
    }

    // ==================== Translation orchestration ====================

    /// Produce (or refresh) the persisted sibling record for `target`.
    ///
    /// Provider failure is not fatal here: the sibling is still written with
    /// the source HTML, so content availability never hinges on the
    /// translation provider. The sibling is always a draft; machine output
    /// is never auto-published.
    pub async fn translate_article(
        &self,
        id: ObjectId,
        target: Language,
    ) -> Result<Article, EngineError> {
        let article = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(EngineError::ArticleNotFound)?;

        if article.language == target {
            return Ok(article);
        }

        let translated_html = match self
            .translator
            .translate_html(&article.content.html, target)
            .await
        {
            Ok(html) => html,
            Err(e) => {
                warn!(slug = %article.slug, target = %target, error = %e,
                    "translation failed, storing source HTML unchanged");
                article.content.html.clone()
            }
        };

        let sibling = build_sibling(&article, target, translated_html, self.translator.provider());
        let stored = self.store.upsert_sibling(&sibling).await?;
        info!(slug = %stored.slug, language = %target, "upserted translated sibling");
        Ok(stored)
    }

    /// Translate the headline fields and body for editorial review without
    /// persisting anything. Provider errors propagate.
    pub async fn preview_translation(
        &self,
        id: ObjectId,
        target: Language,
    ) -> Result<TranslationPreview, EngineError> {
        let article = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(EngineError::ArticleNotFound)?;

        if target.is_canonical() {
            return Ok(TranslationPreview {
                language: target,
                title: article.title,
                subtitle: article.subtitle,
                excerpt: article.excerpt,
                html: article.content.html,
            });
        }

        let (title, subtitle, excerpt, html) = tokio::try_join!(
            self.translator.translate_text(&article.title, target),
            self.translate_optional(article.subtitle.as_deref(), target),
            self.translate_optional(article.excerpt.as_deref(), target),
            self.translator.translate_html(&article.content.html, target),
        )?;

        Ok(TranslationPreview {
            language: target,
            title,
            subtitle,
            excerpt,
            html,
        })
    }

    async fn translate_optional(
        &self,
        text: Option<&str>,
        target: Language,
    ) -> Result<Option<String>, EngineError> {
        match text {
            Some(text) => Ok(Some(self.translator.translate_text(text, target).await?)),
            None => Ok(None),
        }
    }
}

fn article_from_draft(draft: ArticleDraft) -> Article {
    let now = Utc::now();
    let mut article = Article {
        id: None,
        slug: draft.slug,
        language: draft.language,
        title: draft.title,
        subtitle: draft.subtitle,
        excerpt: draft.excerpt,
        author: draft.author,
        content: draft.content.into_block(),
        featured_image: draft.featured_image,
        categories: draft.categories,
        series: draft.series,
        meta: draft.meta,
        status: draft.status,
        is_featured: draft.is_featured,
        is_latest: draft.is_latest,
        stats: Stats::default(),
        dual_language: None,
        dual_language_author: draft.dual_language_author,
        dual_language_title: draft.dual_language_title,
        dual_language_subtitle: draft.dual_language_subtitle,
        translation_meta: BTreeMap::new(),
        created_at: now,
        updated_at: now,
    };

    if let Some(patches) = draft.dual_language {
        merge::apply_content_overlays(&mut article, patches);
    }

    article
}

fn apply_patch(article: &mut Article, patch: ArticlePatch) {
    if let Some(title) = patch.title {
        article.title = title;
    }
    if let Some(subtitle) = patch.subtitle {
        article.subtitle = Some(subtitle);
    }
    if let Some(excerpt) = patch.excerpt {
        article.excerpt = Some(excerpt);
    }
    if let Some(author) = patch.author {
        article.author = author;
    }
    if let Some(content) = patch.content {
        article.content = content.into_block();
    }
    if let Some(image) = patch.featured_image {
        article.featured_image = image;
    }
    if let Some(categories) = patch.categories {
        article.categories = categories;
    }
    if let Some(series) = patch.series {
        article.series = Some(series);
    }
    if let Some(meta) = patch.meta {
        article.meta = meta;
    }
    if let Some(status) = patch.status {
        article.status = status;
    }
    if let Some(is_featured) = patch.is_featured {
        article.is_featured = is_featured;
    }
    if let Some(is_latest) = patch.is_latest {
        article.is_latest = is_latest;
    }

    if let Some(patches) = patch.dual_language {
        merge::apply_content_overlays(article, patches);
    }
    merge::apply_field_overlays(
        article,
        SecondaryFields {
            author: patch.dual_language_author,
            title: patch.dual_language_title,
            subtitle: patch.dual_language_subtitle,
        },
    );
}

/// Assemble the sibling record for a persisted translation. Everything but
/// the HTML body is copied from the source; plain text and word count stay
/// untranslated on purpose; recomputing them from translated HTML would
/// change observable behavior.
fn build_sibling(
    source: &Article,
    target: Language,
    translated_html: String,
    provider: &str,
) -> Article {
    let now = Utc::now();

    let mut content = source.content.clone();
    content.html = translated_html;

    let mut translation_meta = BTreeMap::new();
    translation_meta.insert(
        target,
        TranslationMeta {
            status: MACHINE_TRANSLATED.to_string(),
            last_translated_at: now,
            translation_provider: provider.to_string(),
        },
    );

    Article {
        id: None,
        slug: source.slug.clone(),
        language: target,
        title: source.title.clone(),
        subtitle: source.subtitle.clone(),
        excerpt: source.excerpt.clone(),
        author: source.author.clone(),
        content,
        featured_image: source.featured_image.clone(),
        categories: source.categories.clone(),
        series: source.series.clone(),
        meta: source.meta.clone(),
        // Machine translations are never auto-published.
        status: crate::model::ArticleStatus::Draft,
        is_featured: source.is_featured,
        is_latest: source.is_latest,
        stats: source.stats.clone(),
        dual_language: None,
        dual_language_author: None,
        dual_language_title: None,
        dual_language_subtitle: None,
        translation_meta,
        created_at: now,
        updated_at: now,
    }
}
