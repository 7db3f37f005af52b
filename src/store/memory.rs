//! In-memory article store, used by tests and local development.
//!
//! Operations take a single lock for their whole duration, which gives this
//! implementation the same atomicity on `upsert_sibling` that the MongoDB
//! store gets from `find_one_and_update`.

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::Mutex;

use crate::error::EngineError;
use crate::language::Language;
use crate::model::Article;

use super::{ArticleFilter, ArticleStore};

#[derive(Default)]
pub struct MemoryArticleStore {
    articles: Mutex<Vec<Article>>,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(filter: &ArticleFilter, article: &Article) -> bool {
        if let Some(language) = filter.language {
            if article.language != language {
                return false;
            }
        }
        if let Some(status) = filter.status {
            if article.status != status {
                return false;
            }
        }
        if let Some(category) = &filter.category {
            if !article.categories.contains(category) {
                return false;
            }
        }
        if let Some(is_featured) = filter.is_featured {
            if article.is_featured != is_featured {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl ArticleStore for MemoryArticleStore {
    async fn insert(&self, mut article: Article) -> Result<Article, EngineError> {
        let mut articles = self.articles.lock().await;
        if articles
            .iter()
            .any(|a| a.slug == article.slug && a.language == article.language)
        {
            return Err(EngineError::DuplicateSlugLanguage {
                slug: article.slug.clone(),
                language: article.language.code().to_string(),
            });
        }

        article.id = Some(ObjectId::new());
        articles.push(article.clone());
        Ok(article)
    }

    async fn save(&self, article: &Article) -> Result<(), EngineError> {
        let id = article.id.ok_or(EngineError::ArticleNotFound)?;
        let mut articles = self.articles.lock().await;
        match articles.iter_mut().find(|a| a.id == Some(id)) {
            Some(stored) => {
                *stored = article.clone();
                Ok(())
            }
            None => Err(EngineError::ArticleNotFound),
        }
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Article>, EngineError> {
        let articles = self.articles.lock().await;
        Ok(articles.iter().find(|a| a.id == Some(id)).cloned())
    }

    async fn find_by_slug_language(
        &self,
        slug: &str,
        language: Language,
    ) -> Result<Option<Article>, EngineError> {
        let articles = self.articles.lock().await;
        Ok(articles
            .iter()
            .find(|a| a.slug == slug && a.language == language)
            .cloned())
    }

    async fn find_dual_language_fallback(
        &self,
        slug: &str,
        language: Language,
    ) -> Result<Option<Article>, EngineError> {
        let articles = self.articles.lock().await;
        Ok(articles
            .iter()
            .find(|a| a.slug == slug && a.overlay(language).is_some())
            .cloned())
    }

    async fn upsert_sibling(&self, article: &Article) -> Result<Article, EngineError> {
        let mut articles = self.articles.lock().await;
        match articles
            .iter_mut()
            .find(|a| a.slug == article.slug && a.language == article.language)
        {
            Some(stored) => {
                let id = stored.id;
                *stored = article.clone();
                stored.id = id;
                Ok(stored.clone())
            }
            None => {
                let mut stored = article.clone();
                stored.id = Some(ObjectId::new());
                articles.push(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, EngineError> {
        let mut articles = self.articles.lock().await;
        let before = articles.len();
        articles.retain(|a| a.id != Some(id));
        Ok(articles.len() < before)
    }

    async fn list(
        &self,
        filter: &ArticleFilter,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Article>, EngineError> {
        let articles = self.articles.lock().await;
        let mut matching: Vec<Article> = articles
            .iter()
            .filter(|a| Self::matches(filter, a))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(skip as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, filter: &ArticleFilter) -> Result<u64, EngineError> {
        let articles = self.articles.lock().await;
        Ok(articles.iter().filter(|a| Self::matches(filter, a)).count() as u64)
    }
}
