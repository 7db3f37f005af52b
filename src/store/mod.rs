//! Persistence seam for article records.
//!
//! The engine talks to its document store through the [`ArticleStore`]
//! trait so the orchestration logic stays testable against an in-memory
//! implementation. The production implementation is MongoDB-backed.

mod memory;
mod mongo;

pub use memory::MemoryArticleStore;
pub use mongo::MongoArticleStore;

use async_trait::async_trait;
use bson::oid::ObjectId;
use serde::Deserialize;

use crate::error::EngineError;
use crate::language::Language;
use crate::model::{Article, ArticleStatus};

/// Listing filter for article queries.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFilter {
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_featured: Option<bool>,
}

/// Document-store operations consumed by the article engine.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Insert a new record, assigning its identifier. Fails with
    /// `DuplicateSlugLanguage` when `(slug, language)` is already taken.
    async fn insert(&self, article: Article) -> Result<Article, EngineError>;

    /// Replace an existing record by its identifier.
    async fn save(&self, article: &Article) -> Result<(), EngineError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Article>, EngineError>;

    async fn find_by_slug_language(
        &self,
        slug: &str,
        language: Language,
    ) -> Result<Option<Article>, EngineError>;

    /// Fallback lookup for slug reads: a record with the given slug whose
    /// dual-language overlay carries a block for `language`.
    async fn find_dual_language_fallback(
        &self,
        slug: &str,
        language: Language,
    ) -> Result<Option<Article>, EngineError>;

    /// Atomically insert-or-replace the record keyed by the article's
    /// `(slug, language)`. This is a single find-and-update-or-insert so
    /// concurrent translations of the same article cannot produce duplicate
    /// siblings.
    async fn upsert_sibling(&self, article: &Article) -> Result<Article, EngineError>;

    /// Delete by identifier; returns whether a record was removed.
    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, EngineError>;

    /// Newest-first page of records matching the filter.
    async fn list(
        &self,
        filter: &ArticleFilter,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Article>, EngineError>;

    async fn count(&self, filter: &ArticleFilter) -> Result<u64, EngineError>;
}
