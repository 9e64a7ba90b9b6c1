use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::api::{ApiClient, ApiError, ApiRequest, Paginated};
use crate::models::{Article, ArticlePayload, RelatedEntity};
use crate::utils::generate_slug;

use super::{fetch_data, send_ok, StoreError};

const ARTICLES_PATH: &str = "/articles";
const MANAGEMENT_PATH: &str = "/articlesManagement";

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const FETCH_FAILED: &str = "Failed to load articles!";
const DETAIL_FAILED: &str = "Failed to load article details!";
const CREATE_FAILED: &str = "Failed to create article!";
const UPDATE_FAILED: &str = "Failed to update article!";
const DELETE_FAILED: &str = "Failed to delete article!";

/// Drop repeated article ids. Each id keeps the position of its first
/// occurrence and the value of its last.
pub fn dedupe_by_id(articles: Vec<Article>) -> Vec<Article> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Article> = Vec::with_capacity(articles.len());
    for article in articles {
        match positions.get(&article.id) {
            Some(&index) => unique[index] = article,
            None => {
                positions.insert(article.id.clone(), unique.len());
                unique.push(article);
            }
        }
    }
    unique
}

/// Paginated article listing plus article management.
#[derive(Debug)]
pub struct ArticleStore {
    client: ApiClient,
    articles: Vec<Article>,
    loading: bool,
    error: Option<String>,
    current_page: u32,
    total_pages: u32,
    total_items: u64,
    items_per_page: u32,
}

impl ArticleStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            articles: Vec::new(),
            loading: false,
            error: None,
            current_page: 1,
            total_pages: 1,
            total_items: 0,
            items_per_page: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Always 0 after a fetch: the listing ignores the backend's
    /// `totalItems`.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// Load one page of articles. With tags, each tag is fetched in turn and
    /// the results are merged without duplicates; pagination reflects the
    /// last tag's response.
    pub async fn fetch_articles(&mut self, tags: &[String], page: u32, limit: u32) -> &[Article] {
        self.loading = true;
        self.error = None;
        self.current_page = page;
        self.items_per_page = limit;

        let result = self.load_articles(tags, page, limit).await;
        match result {
            Ok(articles) => self.articles = articles,
            Err(e) => {
                warn!(error = %e, "Failed to fetch articles");
                self.error = Some(FETCH_FAILED.to_string());
            }
        }

        self.loading = false;
        &self.articles
    }

    async fn load_articles(
        &mut self,
        tags: &[String],
        page: u32,
        limit: u32,
    ) -> Result<Vec<Article>, ApiError> {
        if tags.is_empty() {
            let listing = self.fetch_page(None, page, limit).await?;
            self.apply_pagination(&listing);
            return Ok(listing.items);
        }

        let mut all = Vec::new();
        for tag in tags {
            let listing = self.fetch_page(Some(tag.as_str()), page, limit).await?;
            debug!(tag = %tag, count = listing.items.len(), "Fetched articles for tag");
            self.apply_pagination(&listing);
            all.extend(listing.items);
        }
        Ok(dedupe_by_id(all))
    }

    async fn fetch_page(
        &self,
        tag: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<Paginated<Article>, ApiError> {
        let mut request = ApiRequest::get(ARTICLES_PATH);
        if let Some(tag) = tag {
            request = request.query("tag", tag);
        }
        request = request.query("page", page).query("limit", limit);
        fetch_data(&self.client, request).await
    }

    fn apply_pagination(&mut self, listing: &Paginated<Article>) {
        // The backend's totalItems is not carried over.
        self.total_items = 0;
        self.total_pages = listing.total_pages;
        self.current_page = listing.current_page;
    }

    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_to_page(&mut self, page: u32) -> bool {
        if page >= 1 && page <= self.total_pages {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    pub async fn get_article_by_slug(&mut self, slug: &str) -> Option<Article> {
        self.loading = true;
        self.error = None;

        let request = ApiRequest::get(format!("{}/{}", ARTICLES_PATH, slug));
        let result = fetch_data::<Article>(&self.client, request).await;
        self.loading = false;

        match result {
            Ok(article) => Some(article),
            Err(e) => {
                warn!(error = %e, slug, "Failed to fetch article");
                self.error = Some(DETAIL_FAILED.to_string());
                None
            }
        }
    }

    pub async fn create_article(&self, article: &ArticlePayload) -> Result<Article, StoreError> {
        let request = ApiRequest::post(MANAGEMENT_PATH)
            .json(article)
            .map_err(|e| write_failed(CREATE_FAILED, e))?;
        fetch_data(&self.client, request)
            .await
            .map_err(|e| write_failed(CREATE_FAILED, e))
    }

    pub async fn update_article(
        &self,
        slug: &str,
        article: &ArticlePayload,
    ) -> Result<Article, StoreError> {
        let request = ApiRequest::put(format!("{}/{}", MANAGEMENT_PATH, slug))
            .json(article)
            .map_err(|e| write_failed(UPDATE_FAILED, e))?;
        fetch_data(&self.client, request)
            .await
            .map_err(|e| write_failed(UPDATE_FAILED, e))
    }

    pub async fn delete_article(&mut self, slug: &str) -> Result<(), StoreError> {
        let request = ApiRequest::delete(format!("{}/{}", MANAGEMENT_PATH, slug));
        send_ok(&self.client, request)
            .await
            .map_err(|e| write_failed(DELETE_FAILED, e))?;
        self.articles.retain(|a| a.slug != slug);
        Ok(())
    }

    /// Create or replace the advisor/school/visa type attached to an article.
    pub async fn manage_related_entity<B: Serialize>(
        &self,
        article_id: &str,
        entity: RelatedEntity,
        data: &B,
    ) -> Result<serde_json::Value, StoreError> {
        let message = format!("Failed to manage {}", entity.as_str());
        let request = ApiRequest::put(entity.path(article_id))
            .json(data)
            .map_err(|e| write_failed(&message, e))?;
        let envelope = self
            .client
            .api_request::<serde_json::Value>(request)
            .await
            .map_err(|e| write_failed(&message, e))?;
        if !envelope.is_success() {
            return Err(write_failed(&message, envelope.application_error()));
        }
        Ok(envelope.data.unwrap_or(serde_json::Value::Null))
    }

    pub async fn unlink_related_entity(
        &self,
        article_id: &str,
        entity: RelatedEntity,
    ) -> Result<(), StoreError> {
        let message = format!("Failed to unlink {}", entity.as_str());
        send_ok(&self.client, ApiRequest::delete(entity.path(article_id)))
            .await
            .map_err(|e| write_failed(&message, e))
    }

    pub fn generate_slug(&self, title: &str) -> String {
        generate_slug(title)
    }
}

fn write_failed(message: &str, cause: ApiError) -> StoreError {
    error!(error = %cause, "{}", message);
    StoreError::new(message, cause)
}
