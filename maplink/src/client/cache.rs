//! Lazy, license-aware cache for the basemap service client.
//!
//! [`ClientCache`] constructs the client on first use, coalesces concurrent
//! construction into a single factory invocation, and keeps the client's
//! `license` query parameter in sync with an external [`LicenseSource`].
//!
//! # Architecture
//!
//! ```text
//! acquire() ──► ┌──────────────┐
//!               │ State lookup │──► Ready ──► refresh license ──► handle
//!               └──────┬───────┘
//!                      │ Idle                        Pending
//!                      ▼                                │
//!               ┌──────────────┐                        │
//!               │   Factory    │──► shared future ◄─────┘ (callers join)
//!               └──────────────┘         │
//!                                        ▼
//!                          Ok ──► Ready        Err ──► Idle (retryable)
//! ```
//!
//! All callers that join an in-flight construction observe the identical
//! outcome: the same handle, or the same error value. A failed construction
//! is fanned out to every joined caller and then cleared, so the next call
//! retries instead of observing a poisoned cache.

use std::sync::Arc;

use futures::future::{FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::error::ClientError;
use super::factory::ClientFactory;
use super::handle::BasemapClient;
use super::license::LicenseSource;
use crate::http::BoxFuture;

/// Query parameter carrying the license id on service requests.
pub const LICENSE_PARAM: &str = "license";

/// Shared in-flight construction future.
type InitFuture = Shared<BoxFuture<'static, Result<Arc<BasemapClient>, ClientError>>>;

/// Lifecycle of the cached client.
enum CacheState {
    /// No client yet and no construction underway.
    Idle,

    /// Construction underway; callers join the shared future.
    Pending(InitFuture),

    /// Client constructed. Terminal apart from parameter refreshes.
    Ready(Arc<BasemapClient>),
}

/// State guarded by one lock, never held across an await point.
struct CacheInner {
    state: CacheState,

    /// Incremented whenever a new construction attempt starts. Lets stale
    /// waiters detect that the cache moved on without them.
    epoch: u64,
}

/// Outcome of a state lookup: either the cached handle, or a construction
/// attempt to join.
enum Join {
    Ready(Arc<BasemapClient>),
    Wait { future: InitFuture, epoch: u64 },
}

/// Lazy, license-aware cache for the basemap service client.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use maplink::client::{ClientCache, SharedLicense, StaticClientFactory};
///
/// let cache = ClientCache::new(factory, license);
/// let client = cache.acquire().await?;
/// ```
pub struct ClientCache {
    factory: Arc<dyn ClientFactory>,
    license: Arc<dyn LicenseSource>,
    inner: Mutex<CacheInner>,

    /// License id most recently applied to the client. `None` both before
    /// any application and when an absent license was last observed; the
    /// two states agree with the accessor semantics, so no parameter is
    /// written until a license actually materializes.
    last_applied: Mutex<Option<String>>,
}

impl ClientCache {
    /// Creates a cache over the given construction and license seams.
    pub fn new(factory: Arc<dyn ClientFactory>, license: Arc<dyn LicenseSource>) -> Self {
        Self {
            factory,
            license,
            inner: Mutex::new(CacheInner {
                state: CacheState::Idle,
                epoch: 0,
            }),
            last_applied: Mutex::new(None),
        }
    }

    /// Returns the shared client, constructing it on first use.
    ///
    /// Concurrent callers issued while construction is in flight all join
    /// the same attempt and observe the identical outcome. On success the
    /// client's license parameter is refreshed against the license source
    /// before the handle is returned.
    ///
    /// # Errors
    ///
    /// Returns the construction error when the factory fails. The failed
    /// attempt is cleared, so a subsequent call retries construction.
    pub async fn acquire(&self) -> Result<Arc<BasemapClient>, ClientError> {
        let client = match self.join_or_start() {
            Join::Ready(client) => client,
            Join::Wait { future, epoch } => match future.await {
                Ok(client) => {
                    self.settle_ok(epoch, &client);
                    client
                }
                Err(error) => {
                    self.settle_err(epoch, &error);
                    return Err(error);
                }
            },
        };

        self.refresh_license(&client);
        Ok(client)
    }

    /// Drops the cached client and the last-applied license so the next
    /// call reconstructs from scratch.
    ///
    /// Exists for test isolation; production callers keep the cached
    /// instance for the process lifetime.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.state = CacheState::Idle;
        inner.epoch += 1;
        *self.last_applied.lock() = None;
    }

    /// Looks up the current state, starting a construction attempt if none
    /// exists yet.
    fn join_or_start(&self) -> Join {
        let mut inner = self.inner.lock();
        match &inner.state {
            CacheState::Ready(client) => Join::Ready(Arc::clone(client)),
            CacheState::Pending(future) => Join::Wait {
                future: future.clone(),
                epoch: inner.epoch,
            },
            CacheState::Idle => {
                let factory = Arc::clone(&self.factory);
                let construct: BoxFuture<'static, Result<Arc<BasemapClient>, ClientError>> =
                    Box::pin(async move { factory.create().await.map(Arc::new) });
                let future = construct.shared();

                inner.epoch += 1;
                inner.state = CacheState::Pending(future.clone());
                debug!("Constructing basemap client");

                Join::Wait {
                    future,
                    epoch: inner.epoch,
                }
            }
        }
    }

    /// Publishes a successful construction. Only a waiter of the attempt
    /// that is still current transitions the state; the rest are no-ops.
    fn settle_ok(&self, epoch: u64, client: &Arc<BasemapClient>) {
        let mut inner = self.inner.lock();
        if inner.epoch == epoch && matches!(inner.state, CacheState::Pending(_)) {
            inner.state = CacheState::Ready(Arc::clone(client));
        }
    }

    /// Clears a failed construction so the next call retries.
    fn settle_err(&self, epoch: u64, error: &ClientError) {
        let mut inner = self.inner.lock();
        if inner.epoch == epoch && matches!(inner.state, CacheState::Pending(_)) {
            inner.state = CacheState::Idle;
            warn!(error = %error, "Basemap client construction failed; next call will retry");
        }
    }

    /// Re-applies the license query parameter when the externally observed
    /// license id changed since the last application.
    ///
    /// An absent license after a set one is written as an empty string; an
    /// unchanged value writes nothing.
    fn refresh_license(&self, client: &BasemapClient) {
        let current = self.license.current();
        let mut last = self.last_applied.lock();
        if *last != current {
            client.set_query_param(LICENSE_PARAM, current.as_deref().unwrap_or(""));
            debug!(
                license = current.as_deref().unwrap_or(""),
                "Applied license to basemap client"
            );
            *last = current;
        }
    }
}
