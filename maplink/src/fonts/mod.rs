//! Font endpoint reachability probe and glyph URL resolution.
//!
//! The remote basemap service serves font glyphs from a URL template with
//! `{fontstack}` and `{range}` placeholders. Whether that endpoint is
//! reachable is probed at most once per process: a HEAD request against
//! the template with fixed defaults substituted, status below 400 counting
//! as reachable. Failures are never surfaced to callers - the probe
//! degrades to `false` and logs one warning; glyph URL resolution then
//! falls back to the locally served font path.

use std::sync::Arc;

use futures::future::{FutureExt, Shared};
use parking_lot::Mutex;
use tracing::warn;

use crate::http::{AsyncHttpClient, BoxFuture};
use crate::settings::{BasemapSettings, FONTS_API_PATH};

/// Fontstack substituted into the template for the probe request.
const PROBE_FONTSTACK: &str = "Open Sans";

/// Glyph range substituted into the template for the probe request.
const PROBE_RANGE: &str = "0-255";

/// `{fontstack}` placeholder in font URL templates.
pub const FONTSTACK_PLACEHOLDER: &str = "{fontstack}";

/// `{range}` placeholder in font URL templates.
pub const RANGE_PLACEHOLDER: &str = "{range}";

/// Shared in-flight probe future.
type ProbeFuture = Shared<BoxFuture<'static, bool>>;

/// Lifecycle of the cached probe result.
enum ProbeState {
    /// No probe issued yet.
    Unchecked,

    /// Probe underway; callers join the shared future.
    Pending(ProbeFuture),

    /// Result cached for the process lifetime (until `reset`).
    Checked(bool),
}

/// State guarded by one lock, never held across an await point.
struct ProbeInner {
    state: ProbeState,

    /// Incremented on every new probe and on `reset`, so stale waiters
    /// cannot clobber a state that moved on without them.
    epoch: u64,
}

/// One-shot reachability probe for the remote font endpoint.
pub struct FontProbe {
    settings: BasemapSettings,
    http: Arc<dyn AsyncHttpClient>,
    inner: Mutex<ProbeInner>,
}

impl FontProbe {
    /// Creates a probe over the given settings and HTTP client.
    pub fn new(settings: BasemapSettings, http: Arc<dyn AsyncHttpClient>) -> Self {
        Self {
            settings,
            http,
            inner: Mutex::new(ProbeInner {
                state: ProbeState::Unchecked,
                epoch: 0,
            }),
        }
    }

    /// Whether the remote font endpoint is reachable.
    ///
    /// Probed at most once; concurrent callers share the in-flight check
    /// and the result is cached until [`reset`](Self::reset). Never fails:
    /// a disabled service resolves `false` without any network request, a
    /// network error or a status of 400 or above resolves `false` with one
    /// logged warning.
    pub async fn can_access_fonts(&self) -> bool {
        let (future, epoch) = {
            let mut inner = self.inner.lock();
            match &inner.state {
                ProbeState::Checked(reachable) => return *reachable,
                ProbeState::Pending(future) => (future.clone(), inner.epoch),
                ProbeState::Unchecked => {
                    let future =
                        Self::probe(self.settings.clone(), Arc::clone(&self.http)).shared();
                    inner.epoch += 1;
                    inner.state = ProbeState::Pending(future.clone());
                    (future, inner.epoch)
                }
            }
        };

        let reachable = future.await;

        let mut inner = self.inner.lock();
        if inner.epoch == epoch && matches!(inner.state, ProbeState::Pending(_)) {
            inner.state = ProbeState::Checked(reachable);
        }
        reachable
    }

    /// Clears the cached probe result and any in-flight probe.
    ///
    /// Intended for test isolation; production callers keep the cached
    /// result for the process lifetime.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.state = ProbeState::Unchecked;
        inner.epoch += 1;
    }

    /// Resolves the glyph URL template clients should use.
    ///
    /// Returns the remote font library template when the service is
    /// enabled and the endpoint reachable; otherwise the locally served
    /// fallback `<base-path>/api/fonts/{fontstack}/{range}` with the
    /// placeholders left for downstream substitution.
    pub async fn glyph_url(&self) -> String {
        if !self.settings.enabled || !self.can_access_fonts().await {
            return self
                .settings
                .prepend_base_path(&format!("/{}/{{fontstack}}/{{range}}", FONTS_API_PATH));
        }
        self.settings.font_library_url.clone()
    }

    /// The probe request itself. Runs at most once per epoch.
    fn probe(settings: BasemapSettings, http: Arc<dyn AsyncHttpClient>) -> BoxFuture<'static, bool> {
        Box::pin(async move {
            if !settings.enabled {
                return false;
            }

            let url = settings
                .font_library_url
                .replace(FONTSTACK_PLACEHOLDER, PROBE_FONTSTACK)
                .replace(RANGE_PLACEHOLDER, PROBE_RANGE);

            let failure = match http.head(&url).await {
                Ok(status) if status < 400 => None,
                Ok(status) => Some(format!("status: {}", status)),
                Err(error) => Some(error.to_string()),
            };

            match failure {
                None => true,
                Some(reason) => {
                    warn!(
                        url = %url,
                        reason = %reason,
                        docs = %settings.docs_url,
                        "Unable to access fonts from the basemap service. To avoid \
                         unnecessary requests, disable the service in the settings. \
                         See the documentation for details."
                    );
                    false
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockAsyncHttpClient;
    use crate::http::HttpError;
    use std::time::Duration;

    fn settings() -> BasemapSettings {
        BasemapSettings::new(
            "https://basemaps.example.com",
            "https://fonts.example.com/{fontstack}/{range}",
        )
    }

    #[tokio::test]
    async fn test_disabled_service_probes_false_without_network() {
        let http = Arc::new(MockAsyncHttpClient::with_head(Ok(200)));
        let probe = FontProbe::new(settings().with_enabled(false), http.clone());

        assert!(!probe.can_access_fonts().await);
        assert_eq!(http.head_calls(), 0, "Disabled service must not hit the network");
    }

    #[tokio::test]
    async fn test_reachable_endpoint_probes_true() {
        let http = Arc::new(MockAsyncHttpClient::with_head(Ok(200)));
        let probe = FontProbe::new(settings(), http.clone());

        assert!(probe.can_access_fonts().await);
        assert_eq!(http.head_calls(), 1);
    }

    #[tokio::test]
    async fn test_error_status_probes_false() {
        let http = Arc::new(MockAsyncHttpClient::with_head(Ok(404)));
        let probe = FontProbe::new(settings(), http.clone());

        assert!(!probe.can_access_fonts().await);
    }

    #[tokio::test]
    async fn test_network_error_probes_false() {
        let http = Arc::new(MockAsyncHttpClient::with_head(Err(HttpError::Request(
            "connection refused".to_string(),
        ))));
        let probe = FontProbe::new(settings(), http.clone());

        assert!(!probe.can_access_fonts().await);
    }

    #[tokio::test]
    async fn test_result_is_cached() {
        let http = Arc::new(MockAsyncHttpClient::with_head(Ok(500)));
        let probe = FontProbe::new(settings(), http.clone());

        assert!(!probe.can_access_fonts().await);
        assert!(!probe.can_access_fonts().await);
        assert_eq!(http.head_calls(), 1, "Probe result should be cached");
    }

    #[tokio::test]
    async fn test_concurrent_probes_coalesce() {
        let mut mock = MockAsyncHttpClient::with_head(Ok(200));
        mock.delay = Some(Duration::from_millis(20));
        let http = Arc::new(mock);
        let probe = FontProbe::new(settings(), http.clone());

        let (a, b, c) = tokio::join!(
            probe.can_access_fonts(),
            probe.can_access_fonts(),
            probe.can_access_fonts()
        );

        assert!(a && b && c);
        assert_eq!(http.head_calls(), 1, "Concurrent probes share one request");
    }

    #[tokio::test]
    async fn test_reset_reprobes() {
        let http = Arc::new(MockAsyncHttpClient::with_head(Ok(200)));
        let probe = FontProbe::new(settings(), http.clone());

        assert!(probe.can_access_fonts().await);
        probe.reset();
        assert!(probe.can_access_fonts().await);
        assert_eq!(http.head_calls(), 2);
    }

    #[tokio::test]
    async fn test_glyph_url_fallback_when_disabled() {
        let http = Arc::new(MockAsyncHttpClient::with_head(Ok(200)));
        let probe = FontProbe::new(
            settings().with_enabled(false).with_base_path("/app"),
            http,
        );

        assert_eq!(
            probe.glyph_url().await,
            "/app/api/fonts/{fontstack}/{range}"
        );
    }

    #[tokio::test]
    async fn test_glyph_url_fallback_when_unreachable() {
        let http = Arc::new(MockAsyncHttpClient::with_head(Ok(503)));
        let probe = FontProbe::new(settings(), http);

        assert_eq!(probe.glyph_url().await, "/api/fonts/{fontstack}/{range}");
    }

    #[tokio::test]
    async fn test_glyph_url_remote_when_reachable() {
        let http = Arc::new(MockAsyncHttpClient::with_head(Ok(200)));
        let probe = FontProbe::new(settings(), http);

        assert_eq!(
            probe.glyph_url().await,
            "https://fonts.example.com/{fontstack}/{range}"
        );
    }
}
