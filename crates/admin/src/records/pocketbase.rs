//! `PocketBase` REST client.
//!
//! Endpoints used (relative to the backend base URL):
//! - `GET    /api/collections/{collection}/records?page=&perPage=&sort=`
//! - `GET    /api/collections/{collection}/records/{id}`
//! - `POST   /api/collections/{collection}/records` (multipart)
//! - `PATCH  /api/collections/{collection}/records/{id}` (JSON)
//! - `DELETE /api/collections/{collection}/records/{id}`
//!
//! Files are served from `/api/files/{collection}/{id}/{file}`.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument};
use url::Url;

use super::{ListQuery, Record, RecordForm, RecordPage, RecordStore, RecordsError};

/// `PocketBase` API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct PocketBaseClient {
    inner: Arc<PocketBaseClientInner>,
}

struct PocketBaseClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl PocketBaseClient {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(PocketBaseClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str().trim_end_matches('/')
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RecordsError> {
        let mut endpoint = self.inner.base_url.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(endpoint)
    }

    fn records_url(&self, collection: &str, id: Option<&str>) -> Result<Url, RecordsError> {
        match id {
            Some(id @ ("" | "." | "..")) => Err(RecordsError::NotFound(id.to_string())),
            Some(id) => self.endpoint(&["api", "collections", collection, "records", id]),
            None => self.endpoint(&["api", "collections", collection, "records"]),
        }
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RecordsError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| RecordsError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    async fn parse_error(response: reqwest::Response) -> RecordsError {
        let status = response.status().as_u16();
        let url = response.url().path().to_string();

        if status == 404 {
            return RecordsError::NotFound(url);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        RecordsError::Api { status, message }
    }
}

impl std::fmt::Debug for PocketBaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PocketBaseClient")
            .field("base_url", &self.base_url())
            .finish_non_exhaustive()
    }
}

impl RecordStore for PocketBaseClient {
    #[instrument(skip(self))]
    async fn list(&self, collection: &str, query: &ListQuery) -> Result<RecordPage, RecordsError> {
        let mut url = self.records_url(collection, None)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &query.page.to_string())
                .append_pair("perPage", &query.per_page.to_string());
            if let Some(sort) = &query.sort {
                pairs.append_pair("sort", sort);
            }
        }

        let response = self.inner.client.get(url).send().await?;
        let page: RecordPage = Self::handle_response(response).await?;
        debug!(collection = %collection, items = page.items.len(), "Listed records");
        Ok(page)
    }

    async fn get_one(&self, collection: &str, id: &str) -> Result<Record, RecordsError> {
        let url = self.records_url(collection, Some(id))?;
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(self, form))]
    async fn create(&self, collection: &str, form: RecordForm) -> Result<Record, RecordsError> {
        let url = self.records_url(collection, None)?;

        let mut body = Form::new();
        for (name, value) in form.fields {
            body = body.text(name, value);
        }
        for (name, upload) in form.files {
            body = body.part(name, Part::bytes(upload.bytes).file_name(upload.file_name));
        }

        let response = self.inner.client.post(url).multipart(body).send().await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(self, fields))]
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Record, RecordsError> {
        let url = self.records_url(collection, Some(id))?;
        let response = self
            .inner
            .client
            .patch(url)
            .json(&Value::Object(fields))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<(), RecordsError> {
        let url = self.records_url(collection, Some(id))?;
        let response = self.inner.client.delete(url).send().await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    fn file_url(&self, collection: &str, record_id: &str, file_name: &str) -> String {
        match self.endpoint(&["api", "files", collection, record_id, file_name]) {
            Ok(url) => url.into(),
            Err(_) => format!(
                "{}/api/files/{collection}/{record_id}/{file_name}",
                self.base_url()
            ),
        }
    }
}
