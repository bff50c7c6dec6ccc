//! Reqwest implementation of [`RecordStore`].

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::record::{Query, RecordStore};

/// Client for a REST resource server (json-server style).
///
/// Each operation is one HTTP round trip against
/// `{base_url}/{collection}[/{id}]` with JSON bodies. Cheap to clone.
#[derive(Clone)]
pub struct RestStore {
    inner: Arc<RestStoreInner>,
}

struct RestStoreInner {
    client: reqwest::Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl RestStore {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let base_url = config.api_url.as_str().trim_end_matches('/').to_owned();

        Ok(Self {
            inner: Arc::new(RestStoreInner { client, base_url }),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{collection}", self.inner.base_url)
    }

    fn record_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.inner.base_url)
    }

    /// Issue a request and translate non-success statuses.
    async fn send(
        &self,
        method: Method,
        url: String,
        collection: &str,
        id: Option<&str>,
        query: Option<&Query>,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, StoreError> {
        debug!(%method, %url, "store request");

        let mut request = self.inner.client.request(method, &url);
        if let Some(query) = query {
            request = request.query(query.pairs());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.to_owned(),
                id: id.unwrap_or_default().to_owned(),
            });
        }
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                collection: collection.to_owned(),
            });
        }

        Ok(response)
    }
}

impl RecordStore for RestStore {
    async fn fetch_record(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        let response = self
            .send(
                Method::GET,
                self.record_url(collection, id),
                collection,
                Some(id),
                None,
                None,
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn fetch_collection(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<Value>, StoreError> {
        let response = self
            .send(
                Method::GET,
                self.collection_url(collection),
                collection,
                None,
                Some(query),
                None,
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn create_record(&self, collection: &str, fields: Value) -> Result<Value, StoreError> {
        let response = self
            .send(
                Method::POST,
                self.collection_url(collection),
                collection,
                None,
                None,
                Some(&fields),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn patch_record(
        &self,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<(), StoreError> {
        self.send(
            Method::PATCH,
            self.record_url(collection, id),
            collection,
            Some(id),
            None,
            Some(&partial),
        )
        .await?;
        Ok(())
    }

    async fn replace_record(
        &self,
        collection: &str,
        id: &str,
        record: Value,
    ) -> Result<(), StoreError> {
        self.send(
            Method::PUT,
            self.record_url(collection, id),
            collection,
            Some(id),
            None,
            Some(&record),
        )
        .await?;
        Ok(())
    }

    async fn delete_record(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.send(
            Method::DELETE,
            self.record_url(collection, id),
            collection,
            Some(id),
            None,
            None,
        )
        .await?;
        Ok(())
    }
}
