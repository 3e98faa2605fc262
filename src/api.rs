//! HTTP client for the paperless-ngx REST API.
//!
//! All list endpoints share the same `count`/`next`/`results` envelope.
//! Reference collections (tags, custom fields) are loaded all-or-nothing:
//! a partial page is never surfaced. The document collection deliberately
//! takes the opposite policy and returns whatever pages succeeded.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::contract::DocumentApi;
use crate::error::ApiError;
use crate::model::{CustomField, Document, FieldSchema, NamedEntity, Page, Tag};

/// Reference lookup categories exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefEndpoint {
    Correspondents,
    DocumentTypes,
    StoragePaths,
}

impl RefEndpoint {
    /// URL path segment for this category.
    pub fn path(self) -> &'static str {
        match self {
            RefEndpoint::Correspondents => "correspondents",
            RefEndpoint::DocumentTypes => "document_types",
            RefEndpoint::StoragePaths => "storage_paths",
        }
    }
}

/// Token-authenticated client for one paperless-ngx instance.
pub struct PaperlessClient {
    http: Client,
    base_url: String,
    token: String,
    page_size: usize,
}

impl PaperlessClient {
    pub fn new(base_url: &str, token: &str, page_size: usize) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            page_size,
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .header("Authorization", format!("Token {}", self.token))
    }

    /// GET `url` and decode the JSON body.
    ///
    /// Non-success statuses and undecodable bodies map to distinct
    /// `ApiError` variants.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: url.to_string(),
                status,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Malformed {
                endpoint: url.to_string(),
                source,
            })
    }

    /// Follow `next` links from `first_url` until the collection is
    /// exhausted. Any page failure aborts the walk.
    async fn collect_all_pages<T: serde::de::DeserializeOwned>(
        &self,
        first_url: String,
    ) -> Result<Vec<T>, ApiError> {
        let mut results = Vec::new();
        let mut url = Some(first_url);
        while let Some(current) = url {
            let page: Page<T> = self.get_json(&current).await?;
            results.extend(page.results);
            url = page.next;
        }
        Ok(results)
    }

    /// Load the complete `tag id -> name` mapping.
    pub async fn load_tags(&self) -> Result<HashMap<u64, String>, ApiError> {
        let url = format!("{}/tags/?page_size={}", self.base_url, self.page_size);
        let tags: Vec<Tag> = self.collect_all_pages(url).await?;
        info!(count = tags.len(), "Loaded tag list");
        Ok(tags.into_iter().map(|tag| (tag.id, tag.name)).collect())
    }

    /// Load the complete custom-field schema, including the choice tables
    /// of select fields.
    pub async fn load_custom_fields(&self) -> Result<HashMap<u64, FieldSchema>, ApiError> {
        let url = format!("{}/custom_fields/?page_size={}", self.base_url, self.page_size);
        let fields: Vec<CustomField> = self.collect_all_pages(url).await?;
        info!(count = fields.len(), "Loaded custom-field schema");
        Ok(fields
            .into_iter()
            .map(|field| (field.id, FieldSchema::from(field)))
            .collect())
    }

    /// Fetch the document collection page by page.
    ///
    /// Page N+1 is requested only after page N succeeded. A failed page
    /// ends the walk and whatever was accumulated so far is returned: the
    /// caller can still act on a partial document set, unlike the
    /// reference collections above. With `tag`, only documents carrying
    /// that tag id are kept.
    pub async fn list_documents(&self, tag: Option<u64>) -> Vec<Document> {
        let mut documents: Vec<Document> = Vec::new();
        let mut page = 1usize;
        loop {
            let url = format!(
                "{}/documents/?page_size={}&page={}",
                self.base_url, self.page_size, page
            );
            let body: Page<Document> = match self.get_json(&url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, page, "Document page failed, continuing with partial set");
                    break;
                }
            };
            documents.extend(body.results);
            if body.next.is_none() {
                break;
            }
            page += 1;
        }
        if let Some(tag_id) = tag {
            documents.retain(|doc| doc.tags.contains(&tag_id));
        }
        documents
    }

    /// Fetch the full per-document record. The list endpoint returns only
    /// a summary; this carries the complete custom-field list.
    pub async fn get_document(&self, id: u64) -> Result<serde_json::Value, ApiError> {
        let url = format!("{}/documents/{}/", self.base_url, id);
        self.get_json(&url).await
    }

    /// Download the document's binary content.
    pub async fn download_document(&self, id: u64) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}/documents/{}/download/", self.base_url, id);
        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: url,
                status,
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: url,
                source,
            })?;
        Ok(bytes.to_vec())
    }

    /// Look up the display name behind a reference id.
    pub async fn lookup_name(&self, endpoint: RefEndpoint, id: u64) -> Result<String, ApiError> {
        let url = format!("{}/{}/{}/", self.base_url, endpoint.path(), id);
        let entity: NamedEntity = self.get_json(&url).await?;
        Ok(entity.name)
    }
}

#[async_trait]
impl DocumentApi for PaperlessClient {
    async fn load_tags(&self) -> Result<HashMap<u64, String>, ApiError> {
        PaperlessClient::load_tags(self).await
    }

    async fn load_custom_fields(&self) -> Result<HashMap<u64, FieldSchema>, ApiError> {
        PaperlessClient::load_custom_fields(self).await
    }

    async fn list_documents(&self, tag: Option<u64>) -> Vec<Document> {
        PaperlessClient::list_documents(self, tag).await
    }

    async fn get_document(&self, id: u64) -> Result<serde_json::Value, ApiError> {
        PaperlessClient::get_document(self, id).await
    }

    async fn download_document(&self, id: u64) -> Result<Vec<u8>, ApiError> {
        PaperlessClient::download_document(self, id).await
    }

    async fn lookup_name(&self, endpoint: RefEndpoint, id: u64) -> Result<String, ApiError> {
        PaperlessClient::lookup_name(self, endpoint, id).await
    }
}
