//! Offset/limit pagination shared by every list endpoint.
//!
//! A request carries optional `offset` and `limit` query parameters which are
//! resolved into a [`Window`]. The handler fetches at most `limit` records
//! starting at `offset` in a stable order and wraps them in a [`Page`]:
//!
//! ```json
//! {
//!   "_links": {
//!     "self": { "href": "http://127.0.0.1:3000/books?offset=10&limit=10" },
//!     "prev": { "href": "http://127.0.0.1:3000/books?offset=0&limit=10" },
//!     "next": { "href": "http://127.0.0.1:3000/books?offset=20&limit=10" }
//!   },
//!   "items": [...]
//! }
//! ```
//!
//! `prev` is present iff `offset > 0` and points at `max(offset - limit, 0)`.
//! `next` is present iff the page came back full; no total count is taken,
//! so a full last page still advertises a `next` that will come back empty.
//!
//! # Example
//!
//! ```ignore
//! async fn list_books(
//!     State(state): State<AppState>,
//!     Query(params): Query<PaginationParams>,
//! ) -> Result<Json<Page<Book>>, AppError> {
//!     let window = params.window()?;
//!     let books = state.store.list_books(window).await?;
//!     let url = PageUrl::new(&state.server_config.public_url, "/books")?;
//!
//!     Ok(Json(Page::new(books, window, &url)))
//! }
//! ```

use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::{IntoParams, ToSchema};

use crate::errors::AppError;
use crate::validation::FieldErrors;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Raw pagination query parameters.
///
/// Both values arrive as strings so that malformed input is reported as a
/// validation error on the right field instead of a generic query rejection.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Number of items to skip (integer >= 0, default: 0)
    #[serde(default)]
    pub offset: Option<String>,
    /// Maximum number of items to return (integer > 0, default: 10, capped at 100)
    #[serde(default)]
    pub limit: Option<String>,
}

impl PaginationParams {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset: Some(offset.to_string()),
            limit: Some(limit.to_string()),
        }
    }

    /// Resolves the parameters, reporting both fields when both are bad.
    pub fn window(&self) -> Result<Window, AppError> {
        let mut errors = FieldErrors::new();

        let offset = match parse_param(self.offset.as_deref()) {
            Some(Ok(offset)) if offset >= 0 => offset,
            None => 0,
            _ => {
                errors.push("offset", "offset has to be an integer of 0 or more");
                0
            }
        };

        let limit = match parse_param(self.limit.as_deref()) {
            Some(Ok(limit)) if limit > 0 => limit.min(MAX_LIMIT),
            None => DEFAULT_LIMIT,
            _ => {
                errors.push("limit", "limit has to be an integer bigger than 0");
                DEFAULT_LIMIT
            }
        };

        errors.into_result()?;

        Ok(Window { offset, limit })
    }
}

/// Empty strings count as absent, matching how HTML forms submit blanks.
fn parse_param(raw: Option<&str>) -> Option<Result<i64, std::num::ParseIntError>> {
    match raw.map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(value.parse::<i64>()),
    }
}

/// A resolved offset/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Window {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }

    pub fn prev(&self) -> Option<Window> {
        (self.offset > 0).then(|| Window {
            offset: (self.offset - self.limit).max(0),
            limit: self.limit,
        })
    }

    pub fn next(&self, returned: usize) -> Option<Window> {
        (returned as i64 >= self.limit).then(|| Window {
            offset: self.offset + self.limit,
            limit: self.limit,
        })
    }
}

/// Builds the absolute hrefs for a list endpoint.
///
/// Extra parameters (such as `search`) are carried into every link so that
/// navigating pages keeps the same query.
#[derive(Debug, Clone)]
pub struct PageUrl {
    base: Url,
    params: Vec<(String, String)>,
}

impl PageUrl {
    pub fn new(public_url: &str, path: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(&format!("{}{}", public_url.trim_end_matches('/'), path))?;

        Ok(Self {
            base,
            params: Vec::new(),
        })
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn href(&self, window: Window) -> String {
        let mut url = self.base.clone();
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.append_pair("offset", &window.offset.to_string());
            query.append_pair("limit", &window.limit.to_string());
            for (key, value) in &self.params {
                query.append_pair(key, value);
            }
        }
        url.into()
    }

    fn link(&self, window: Window) -> Link {
        Link {
            href: self.href(window),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Links {
    #[serde(rename = "self")]
    pub current: Link,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
}

/// The list envelope: navigation links plus the items of one window.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    #[serde(rename = "_links")]
    pub links: Links,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: Window, url: &PageUrl) -> Self {
        let links = Links {
            current: url.link(window),
            prev: window.prev().map(|w| url.link(w)),
            next: window.next(items.len()).map(|w| url.link(w)),
        };

        Self { links, items }
    }
}
