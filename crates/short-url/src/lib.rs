//! Redirect server for a fixed set of short paths.
//!
//! The mapping is loaded once at startup from a JSON document of the form
//! `{"paths": {"/short": "https://long.example/"}}`. A request whose path is a
//! key is redirected with `303 See Other`; every other path gets `200` with a
//! plain `Not Found` body.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::Uri;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Body returned for paths with no mapping.
pub const NOT_FOUND_BODY: &str = "Not Found";

/// Short path to target URL table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UrlMapping {
    #[serde(default)]
    pub paths: HashMap<String, String>,
}

impl UrlMapping {
    pub fn target(&self, path: &str) -> Option<&str> {
        self.paths.get(path).map(String::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("cannot read mapping file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse mapping file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and parses the mapping file at `path`.
pub fn load_mapping(path: &Path) -> Result<UrlMapping, MappingError> {
    let contents = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| MappingError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds the router; every path goes through the redirect lookup.
pub fn create_app(mapping: UrlMapping) -> Router {
    Router::new()
        .fallback(redirect)
        .with_state(Arc::new(mapping))
        .layer(TraceLayer::new_for_http())
}

async fn redirect(State(mapping): State<Arc<UrlMapping>>, uri: Uri) -> Response {
    match mapping.target(uri.path()) {
        Some(target) => {
            tracing::debug!(path = uri.path(), target, "redirecting");
            Redirect::to(target).into_response()
        }
        None => NOT_FOUND_BODY.into_response(),
    }
}
