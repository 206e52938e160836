//! Parameter Store access.
//!
//! [`ParameterStore`] is the seam between the sync flows and AWS: one call
//! lists a page under a path, one call writes a parameter. [`fetch_all`]
//! drives the paginated read loop on top of it.
//!
//! # Rate limiting
//!
//! Parameter Store throttles aggressive callers, so every flow waits a fixed
//! [`CALL_DELAY`] between consecutive calls through a [`Throttle`]. The wait
//! applies even when a page comes back empty or a write returns instantly.
//! Calls are never issued concurrently.

pub mod ssm;

pub use ssm::SsmStore;

use std::future::Future;
use std::time::Duration;

use crate::model::Record;

/// Records requested per list call (the service maximum).
pub const PAGE_SIZE: i32 = 10;

/// Fixed pause between consecutive store calls.
pub const CALL_DELAY: Duration = Duration::from_millis(200);

/// Emit a progress warning every this many pages.
const PAGE_WARN_INTERVAL: usize = 100;

/// Store call failures. Never retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to list parameters under {path}: {message}")]
    List { path: String, message: String },

    #[error("Failed to write parameter {name}: {message}")]
    Put { name: String, message: String },

    #[error("Pagination under {path} stalled: the store returned the same continuation token twice")]
    StalledPagination { path: String },
}

/// What to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Path prefix, e.g. `/app/production`.
    pub path: String,
    /// Include parameters nested below direct children.
    pub recursive: bool,
    /// Return decrypted `SecureString` values.
    pub decrypt: bool,
}

impl Query {
    /// Non-recursive, non-decrypting query for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
            decrypt: false,
        }
    }
}

/// One page of a list call.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// Records in the order the store returned them.
    pub records: Vec<Record>,
    /// Parameters on this page that could not be represented as a [`Record`].
    pub skipped: usize,
    /// Present when more pages remain.
    pub next_token: Option<String>,
}

/// A paginated key-value parameter store.
pub trait ParameterStore: Send + Sync {
    /// List one page of parameters under `query.path`.
    fn list_page(
        &self,
        query: &Query,
        next_token: Option<&str>,
    ) -> impl Future<Output = Result<Page, StoreError>> + Send;

    /// Create or overwrite one parameter.
    fn put(&self, record: &Record) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Fixed delay between consecutive store calls.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No delay at all.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleep for the configured delay.
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(CALL_DELAY)
    }
}

/// Result of a full paginated read.
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    /// All records, in arrival order across pages.
    pub records: Vec<Record>,
    /// Number of list calls made.
    pub pages: usize,
    /// Parameters skipped across all pages.
    pub skipped: usize,
}

/// Read every parameter under `query.path`.
///
/// Issues list calls until the store stops returning a continuation token,
/// pausing `throttle` between calls. There is no page cap; progress is
/// logged per page and a warning is emitted every hundred pages so a
/// runaway loop is visible. A token repeated back-to-back is treated as a
/// stalled server and ends the loop with an error.
///
/// # Errors
///
/// Returns the first failing call's error; nothing is retried.
pub async fn fetch_all<S: ParameterStore>(
    store: &S,
    query: &Query,
    throttle: &Throttle,
) -> Result<Fetched, StoreError> {
    let mut fetched = Fetched::default();
    let mut next_token: Option<String> = None;

    loop {
        if fetched.pages > 0 {
            throttle.wait().await;
        }

        let page = store.list_page(query, next_token.as_deref()).await?;
        fetched.pages += 1;
        fetched.skipped += page.skipped;
        fetched.records.extend(page.records);

        tracing::debug!(
            path = %query.path,
            page = fetched.pages,
            total = fetched.records.len(),
            more = page.next_token.is_some(),
            "Fetched page"
        );

        if fetched.pages % PAGE_WARN_INTERVAL == 0 {
            tracing::warn!(
                path = %query.path,
                pages = fetched.pages,
                total = fetched.records.len(),
                "Still paginating"
            );
        }

        match page.next_token {
            None => break,
            Some(token) if next_token.as_deref() == Some(token.as_str()) => {
                return Err(StoreError::StalledPagination {
                    path: query.path.clone(),
                });
            }
            Some(token) => next_token = Some(token),
        }
    }

    Ok(fetched)
}
