//! End-to-end test harness.
//!
//! Spins up an in-process axum server speaking the store's REST contract
//! (collection routes, exact-match query filtering, PATCH merge) over a
//! [`MemoryStore`], then points a real [`RestStore`] at it. Tests exercise
//! the full client stack over actual HTTP instead of poking the in-memory
//! backend directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::{Path, Query as HttpQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use url::Url;

use ecru_store::{MemoryStore, Query, RecordStore, RestStore, StoreConfig, StoreError};

/// One running mock store plus a client pointed at it.
///
/// The backing [`MemoryStore`] stays accessible for seeding and direct
/// inspection; the server task dies with the runtime.
pub struct TestContext {
    pub store: RestStore,
    pub backing: MemoryStore,
    pub base_url: Url,
}

impl TestContext {
    /// Bind the mock server on an ephemeral port and build a client for it.
    ///
    /// # Panics
    ///
    /// Panics on bind or client construction failure; tests have no caller
    /// to propagate to.
    pub async fn spawn() -> Self {
        let backing = MemoryStore::new();
        let app = router(backing.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr: SocketAddr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        let base_url: Url = format!("http://{addr}/").parse().expect("base url");
        let config = StoreConfig::for_endpoint(base_url.clone());
        let store = RestStore::new(&config).expect("rest client");

        Self {
            store,
            backing,
            base_url,
        }
    }

    /// Seed a record directly into the backing store.
    pub async fn seed(&self, collection: &str, record: Value) {
        self.backing.seed(collection, record).await;
    }
}

fn router(store: MemoryStore) -> Router {
    Router::new()
        .route("/{collection}", get(list_records).post(create_record))
        .route(
            "/{collection}/{id}",
            get(fetch_record)
                .patch(patch_record)
                .put(replace_record)
                .delete(delete_record),
        )
        .with_state(store)
}

async fn list_records(
    State(store): State<MemoryStore>,
    Path(collection): Path<String>,
    HttpQuery(params): HttpQuery<HashMap<String, String>>,
) -> Result<Json<Vec<Value>>, Response> {
    let mut query = Query::all();
    for (field, value) in params {
        query = query.eq(field, value);
    }
    store
        .fetch_collection(&collection, &query)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn create_record(
    State(store): State<MemoryStore>,
    Path(collection): Path<String>,
    Json(fields): Json<Value>,
) -> Result<(StatusCode, Json<Value>), Response> {
    store
        .create_record(&collection, fields)
        .await
        .map(|created| (StatusCode::CREATED, Json(created)))
        .map_err(error_response)
}

async fn fetch_record(
    State(store): State<MemoryStore>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, Response> {
    store
        .fetch_record(&collection, &id)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn patch_record(
    State(store): State<MemoryStore>,
    Path((collection, id)): Path<(String, String)>,
    Json(partial): Json<Value>,
) -> Result<StatusCode, Response> {
    store
        .patch_record(&collection, &id, partial)
        .await
        .map(|()| StatusCode::OK)
        .map_err(error_response)
}

async fn replace_record(
    State(store): State<MemoryStore>,
    Path((collection, id)): Path<(String, String)>,
    Json(record): Json<Value>,
) -> Result<StatusCode, Response> {
    store
        .replace_record(&collection, &id, record)
        .await
        .map(|()| StatusCode::OK)
        .map_err(error_response)
}

async fn delete_record(
    State(store): State<MemoryStore>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, Response> {
    store
        .delete_record(&collection, &id)
        .await
        .map(|()| StatusCode::OK)
        .map_err(error_response)
}

fn error_response(err: StoreError) -> Response {
    let status = match err {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Status { status, .. } => {
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string()).into_response()
}
