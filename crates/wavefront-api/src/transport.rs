//! Transport abstraction shared by every Wavefront service.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Method, Url};

use crate::error::{ApiError, ApiResult};
use crate::search::{self, SearchCondition, SearchPage};

/// A fully resolved request, ready to be executed by a [`Transport`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Bytes>,
}

impl ApiRequest {
    /// Resolve `path` against `base` and attach query parameters and body.
    pub fn new(
        base: &Url,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> ApiResult<Self> {
        // Resolve beneath the base so a path prefix such as `/wavefront/` survives.
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let prefix = format!("{}/", base.path());
            base.set_path(&prefix);
        }
        let mut url = base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidRequest(format!("cannot resolve {path}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(Self {
            method,
            url,
            body: body.map(Bytes::from),
        })
    }

    /// Value of the first query parameter named `key`.
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

/// Minimal Wavefront API abstraction for testability.
///
/// [`crate::WavefrontClient`] is the production implementation. Services
/// only ever talk to a `dyn Transport`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Build a request for `path` (e.g. `/api/v2/user`).
    fn new_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> ApiResult<ApiRequest>;

    /// Execute a request and return the full response body.
    async fn execute(&self, request: ApiRequest) -> ApiResult<Bytes>;

    /// Fetch one page of search results for entities of type `kind`.
    async fn search(
        &self,
        kind: &str,
        filter: &[SearchCondition],
        offset: usize,
    ) -> ApiResult<SearchPage> {
        search::search_page(self, kind, filter, offset).await
    }
}
