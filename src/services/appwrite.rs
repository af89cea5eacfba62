use crate::models::{PreferenceProfile, PropertyRecord, UpdatePreferencesRequest};
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub listings: String,
    pub preferences: String,
}

/// Appwrite API client
///
/// Reads the listing store and the buyer preference documents:
/// - Fetching the available-listing snapshot
/// - Reading a buyer's preference profile
/// - Saving preference updates
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!(
            "{}/{}",
            self.documents_url(collection),
            urlencoding::encode(document_id)
        )
    }

    async fn check_status(
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, AppwriteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            401 | 403 => Err(AppwriteError::Unauthorized),
            404 => Err(AppwriteError::NotFound(context.to_string())),
            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("{} failed: {} - {}", context, status, body);
                Err(AppwriteError::ApiError(format!("{}: {}", context, status)))
            }
        }
    }

    /// Fetch every available listing, newest first.
    ///
    /// Pages through the collection `page_size` documents at a time until the
    /// store's reported `total` has been read.
    pub async fn fetch_available_listings(
        &self,
        page_size: usize,
    ) -> Result<Vec<PropertyRecord>, AppwriteError> {
        let page_size = page_size.max(1);
        let mut listings = Vec::new();
        let mut offset = 0usize;

        loop {
            let page = self.fetch_listing_page(page_size, offset).await?;
            let received = page.documents.len();
            offset += received;

            listings.extend(page.documents.iter().filter_map(|doc| match decode_listing(doc) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    tracing::warn!("Skipping undecodable listing document: {}", e);
                    None
                }
            }));

            if offset as u64 >= page.total {
                break;
            }
            if received == 0 {
                tracing::warn!(
                    "Listing store reported {} documents but stopped returning them after {}",
                    page.total,
                    offset
                );
                break;
            }
        }

        tracing::debug!("Fetched {} listings across {} documents", listings.len(), offset);

        Ok(listings)
    }

    async fn fetch_listing_page(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<DocumentPage, AppwriteError> {
        let queries = [
            r#"equal("status", ["available"])"#.to_string(),
            r#"orderDesc("$createdAt")"#.to_string(),
            format!("limit({})", limit),
            format!("offset({})", offset),
        ];

        let query_string = queries
            .iter()
            .map(|q| format!("queries[]={}", urlencoding::encode(q)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!(
            "{}?{}",
            self.documents_url(&self.collections.listings),
            query_string
        );

        tracing::debug!("Fetching listing page from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let response = Self::check_status(response, "Fetching listings").await?;
        let mut json: Value = response.json().await?;

        let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);

        let documents = match json.get_mut("documents").map(Value::take) {
            Some(Value::Array(documents)) => documents,
            _ => return Err(AppwriteError::InvalidResponse("Missing documents array".into())),
        };

        Ok(DocumentPage { total, documents })
    }

    /// Fetch the preference profile document for a buyer
    pub async fn get_preferences(
        &self,
        buyer_id: &str,
    ) -> Result<PreferenceProfile, AppwriteError> {
        let url = self.document_url(&self.collections.preferences, buyer_id);

        tracing::debug!("Fetching preferences for buyer: {}", buyer_id);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        let context = format!("Preferences for buyer {}", buyer_id);
        let response = Self::check_status(response, &context).await?;
        let json: Value = response.json().await?;

        decode_preferences(&json, buyer_id)
    }

    /// Save an explicit preference update and return the stored profile
    pub async fn update_preferences(
        &self,
        buyer_id: &str,
        update: &UpdatePreferencesRequest,
    ) -> Result<PreferenceProfile, AppwriteError> {
        let url = self.document_url(&self.collections.preferences, buyer_id);

        let data = serde_json::to_value(update)
            .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to encode update: {}", e)))?;
        let payload = serde_json::json!({ "data": strip_nulls(data) });

        let response = self
            .client
            .patch(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        let context = format!("Updating preferences for buyer {}", buyer_id);
        let response = Self::check_status(response, &context).await?;
        let json: Value = response.json().await?;

        tracing::debug!("Saved preferences for buyer {}", buyer_id);

        decode_preferences(&json, buyer_id)
    }
}

/// One page of a document list response
struct DocumentPage {
    total: u64,
    documents: Vec<Value>,
}

/// Fields left unset in an update must not overwrite stored values
fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

/// Copy an Appwrite system attribute (`$id`, `$createdAt`) onto its domain name when absent
fn promote_system_field(doc: &mut Map<String, Value>, system: &str, field: &str) {
    if doc.contains_key(field) {
        return;
    }
    if let Some(value) = doc.get(system).cloned() {
        doc.insert(field.to_string(), value);
    }
}

fn document_object(doc: &Value) -> Result<Map<String, Value>, AppwriteError> {
    let data = doc.get("data").unwrap_or(doc);
    data.as_object()
        .cloned()
        .ok_or_else(|| AppwriteError::InvalidResponse("Document is not an object".into()))
}

/// Decode a listing document, falling back to Appwrite's system attributes
pub fn decode_listing(doc: &Value) -> Result<PropertyRecord, AppwriteError> {
    let mut object = document_object(doc)?;
    promote_system_field(&mut object, "$id", "id");
    promote_system_field(&mut object, "$createdAt", "createdAt");

    serde_json::from_value(Value::Object(object))
        .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse listing: {}", e)))
}

fn decode_preferences(doc: &Value, buyer_id: &str) -> Result<PreferenceProfile, AppwriteError> {
    let mut object = document_object(doc)?;
    promote_system_field(&mut object, "$id", "buyerId");

    let mut profile: PreferenceProfile = serde_json::from_value(Value::Object(object))
        .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse preferences: {}", e)))?;

    if profile.buyer_id.is_empty() {
        profile.buyer_id = buyer_id.to_string();
    }

    Ok(profile)
}
