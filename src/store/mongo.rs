//! MongoDB-backed article store.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database, IndexModel};

use crate::error::EngineError;
use crate::language::Language;
use crate::model::Article;

use super::{ArticleFilter, ArticleStore};

const COLLECTION: &str = "articles";

/// MongoDB error code for a unique-index violation.
const DUPLICATE_KEY: i32 = 11000;

pub struct MongoArticleStore {
    collection: Collection<Article>,
}

impl MongoArticleStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Article>(COLLECTION),
        }
    }

    /// Create the indexes the engine relies on. The `(slug, language)`
    /// unique index backs the duplicate check and the sibling upsert.
    pub async fn ensure_indexes(&self) -> Result<(), EngineError> {
        let unique = IndexModel::builder()
            .keys(doc! { "slug": 1, "language": 1 })
            .options(
                mongodb::options::IndexOptions::builder()
                    .unique(true)
                    .build(),
            )
            .build();
        self.collection.create_index(unique).await?;

        let recency = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .build();
        self.collection.create_index(recency).await?;

        Ok(())
    }

    fn filter_to_document(filter: &ArticleFilter) -> Document {
        let mut query = doc! {};
        if let Some(language) = filter.language {
            query.insert("language", language.code());
        }
        if let Some(status) = filter.status {
            // ArticleStatus serializes to its lowercase wire name.
            if let Ok(value) = bson::to_bson(&status) {
                query.insert("status", value);
            }
        }
        if let Some(category) = &filter.category {
            query.insert("categories", category.as_str());
        }
        if let Some(is_featured) = filter.is_featured {
            query.insert("isFeatured", is_featured);
        }
        query
    }

    fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
        match &*error.kind {
            ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
                write_error.code == DUPLICATE_KEY
            }
            _ => false,
        }
    }
}

#[async_trait]
impl ArticleStore for MongoArticleStore {
    async fn insert(&self, mut article: Article) -> Result<Article, EngineError> {
        let result = self.collection.insert_one(&article).await.map_err(|e| {
            if Self::is_duplicate_key(&e) {
                EngineError::DuplicateSlugLanguage {
                    slug: article.slug.clone(),
                    language: article.language.code().to_string(),
                }
            } else {
                EngineError::Store(e)
            }
        })?;

        article.id = result.inserted_id.as_object_id();
        Ok(article)
    }

    async fn save(&self, article: &Article) -> Result<(), EngineError> {
        let id = article.id.ok_or(EngineError::ArticleNotFound)?;
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, article)
            .await?;
        if result.matched_count == 0 {
            return Err(EngineError::ArticleNotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Article>, EngineError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_slug_language(
        &self,
        slug: &str,
        language: Language,
    ) -> Result<Option<Article>, EngineError> {
        Ok(self
            .collection
            .find_one(doc! { "slug": slug, "language": language.code() })
            .await?)
    }

    async fn find_dual_language_fallback(
        &self,
        slug: &str,
        language: Language,
    ) -> Result<Option<Article>, EngineError> {
        let status_path = format!("dualLanguage.{}.status", language.code());
        let mut filter = doc! { "slug": slug };
        filter.insert(status_path, doc! { "$exists": true });
        Ok(self.collection.find_one(filter).await?)
    }

    async fn upsert_sibling(&self, article: &Article) -> Result<Article, EngineError> {
        let filter = doc! {
            "slug": &article.slug,
            "language": article.language.code(),
        };

        let mut fields = bson::to_document(article).map_err(mongodb::error::Error::from)?;
        fields.remove("_id");

        let updated = self
            .collection
            .find_one_and_update(filter, doc! { "$set": fields })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        // With upsert + After an absent result cannot happen.
        updated.ok_or(EngineError::ArticleNotFound)
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<bool, EngineError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn list(
        &self,
        filter: &ArticleFilter,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Article>, EngineError> {
        let query = Self::filter_to_document(filter);
        let mut cursor = self
            .collection
            .find(query)
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(limit)
            .await?;

        let mut articles = Vec::new();
        while let Some(article) = cursor.try_next().await? {
            articles.push(article);
        }
        Ok(articles)
    }

    async fn count(&self, filter: &ArticleFilter) -> Result<u64, EngineError> {
        let query = Self::filter_to_document(filter);
        Ok(self.collection.count_documents(query).await?)
    }
}
