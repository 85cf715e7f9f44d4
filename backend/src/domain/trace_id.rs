//! Per-request correlation id.
//!
//! The [`Trace`](crate::middleware::Trace) middleware mints one id per
//! request and runs the handler inside [`TraceId::scope`]. Errors built while
//! the id is in scope copy it into their `traceId` field.
//!
//! Task-locals do not follow work onto other tasks. Password hashing runs on
//! the blocking pool, so it goes through [`TraceId::spawn_blocking`], which
//! carries both the id and the active `tracing` span across.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task::JoinError;
use tokio::task_local;
use tracing::Span;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Random v4 UUID identifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current id.
    ///
    /// ```
    /// use aircraft_backend::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id = TraceId::generate();
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }

    /// Run `work` on the blocking pool with the caller's trace id and span.
    pub async fn spawn_blocking<F, T>(work: F) -> Result<T, JoinError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let trace_id = Self::current();
        let span = Span::current();
        tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            match trace_id {
                Some(id) => CURRENT.sync_scope(id, work),
                None => work(),
            }
        })
        .await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
