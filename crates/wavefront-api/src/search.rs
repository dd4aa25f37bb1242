//! Generic Wavefront search API.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::transport::Transport;

/// Base path of the search API.
pub const SEARCH_PATH: &str = "/api/v2/search";

/// Number of items requested per page.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// How a search condition matches its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchingMethod {
    #[default]
    Contains,
    StartsWith,
    Exact,
    TagPath,
}

/// A single search condition; conditions are combined with AND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCondition {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub matching_method: MatchingMethod,
    #[serde(default)]
    pub negated: bool,
}

impl SearchCondition {
    /// Condition matching entities whose `key` contains `value`.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            matching_method: MatchingMethod::default(),
            negated: false,
        }
    }

    /// Set the matching method.
    pub fn matching(mut self, method: MatchingMethod) -> Self {
        self.matching_method = method;
        self
    }

    /// Invert the condition.
    pub fn negated(mut self) -> Self {
        self.negated = true;
        self
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Raw items; their shape depends on the searched entity type.
    pub items: serde_json::Value,
    pub more_items: bool,
    pub next_offset: usize,
}

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    limit: usize,
    offset: usize,
    query: &'a [SearchCondition],
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    items: serde_json::Value,
    #[serde(default)]
    more_items: bool,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    limit: usize,
}

/// POST a search for `kind` through `transport` and decode a single page.
pub async fn search_page<T: Transport + ?Sized>(
    transport: &T,
    kind: &str,
    filter: &[SearchCondition],
    offset: usize,
) -> ApiResult<SearchPage> {
    let body = serde_json::to_vec(&SearchBody {
        limit: DEFAULT_PAGE_LIMIT,
        offset,
        query: filter,
    })?;
    let path = format!("{SEARCH_PATH}/{kind}");
    let request = transport.new_request(Method::POST, &path, &[], Some(body))?;
    let body = transport.execute(request).await?;
    let envelope: SearchEnvelope = serde_json::from_slice(&body)?;

    let page = envelope.response;
    // A missing limit would otherwise pin the cursor in place.
    let limit = if page.limit == 0 {
        DEFAULT_PAGE_LIMIT
    } else {
        page.limit
    };

    Ok(SearchPage {
        items: page.items,
        more_items: page.more_items,
        next_offset: page.offset + limit,
    })
}
