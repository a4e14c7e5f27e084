//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! No external services are needed: [`MockCatalogServer`] serves the stock
//! and catalog endpoints from an in-process `axum` router bound to an
//! ephemeral loopback port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_cart::CatalogApiConfig;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Stock/catalog service double.
#[derive(Clone)]
pub struct MockCatalogServer {
    state: MockState,
    base_url: String,
}

#[derive(Clone, Default)]
struct MockState {
    stock: Arc<RwLock<HashMap<i64, Value>>>,
    products: Arc<RwLock<HashMap<i64, Value>>>,
    forced_status: Arc<RwLock<Option<StatusCode>>>,
    stock_hits: Arc<AtomicUsize>,
    product_hits: Arc<AtomicUsize>,
}

impl MockCatalogServer {
    /// Start the server on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = MockState::default();

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock catalog server");
        let addr = listener
            .local_addr()
            .expect("Failed to read mock server address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            state,
            base_url: format!("http://{addr}"),
        }
    }

    /// Base URL of the running server.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn api_config(&self) -> CatalogApiConfig {
        CatalogApiConfig {
            base_url: self.base_url.clone(),
            ..CatalogApiConfig::default()
        }
    }

    /// Register a catalog product and its stock level.
    ///
    /// # Panics
    ///
    /// Panics if `record` has no integer `id`.
    pub fn insert_product(&self, record: Value, stock: u32) {
        let id = record["id"].as_i64().expect("product record needs an id");
        self.set_stock(id, stock);
        write(&self.state.products).insert(id, record);
    }

    /// Set only the stock level for a product.
    pub fn set_stock(&self, id: i64, amount: u32) {
        self.set_raw_stock(id, json!({ "id": id, "amount": amount }));
    }

    /// Serve an arbitrary stock body for a product.
    pub fn set_raw_stock(&self, id: i64, body: Value) {
        write(&self.state.stock).insert(id, body);
    }

    /// Respond to every request with `status` until cleared with `None`.
    pub fn force_status(&self, status: Option<StatusCode>) {
        *write(&self.state.forced_status) = status;
    }

    /// Number of stock requests served.
    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }

    /// Number of product detail requests served.
    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn lookup(state: &MockState, table: &RwLock<HashMap<i64, Value>>, id: i64) -> Response {
    let forced = *state
        .forced_status
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(status) = forced {
        return (status, "forced failure").into_response();
    }

    let record = table
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get(&id)
        .cloned();

    match record {
        Some(body) => Json(body).into_response(),
        None => (StatusCode::NOT_FOUND, "{}").into_response(),
    }
}

async fn stock(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    lookup(&state, &state.stock, id)
}

async fn product(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    lookup(&state, &state.products, id)
}
