//! reqwest client with the directory service's replay rules
//!
//! A failed attempt is sent again only when that cannot apply a write twice.
//! A connect failure means the service never saw the request, so any method
//! may be replayed. A 5xx or a timeout leaves the outcome unknown: only
//! idempotent methods (GET, PUT, DELETE) are replayed then, so a `create` or
//! `$ref` POST reaches the service at most once.

use std::time::Duration;

use dirgraph_domain::{DirectoryError, HttpConfig};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// How a failed attempt bears on replaying it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    /// No connection was made.
    Unsent,
    /// The service may or may not have applied the request.
    Unknown,
}

impl Failure {
    fn of_status(status: StatusCode) -> Option<Self> {
        status.is_server_error().then_some(Self::Unknown)
    }

    fn of_error(err: &reqwest::Error) -> Option<Self> {
        if err.is_connect() {
            Some(Self::Unsent)
        } else if err.is_timeout() {
            Some(Self::Unknown)
        } else {
            None
        }
    }

    fn replayable(self, method: &Method) -> bool {
        match self {
            Self::Unsent => true,
            Self::Unknown => method.is_idempotent(),
        }
    }
}

/// HTTP client for directory requests: timeout, user agent and bounded
/// replays with exponential backoff.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client configured from the `[http]` section.
    ///
    /// # Errors
    /// Returns `DirectoryError::InvalidInput` if reqwest rejects the settings.
    pub fn from_config(config: &HttpConfig) -> Result<Self, DirectoryError> {
        Self::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .max_attempts(config.max_attempts)
            .base_backoff(Duration::from_millis(config.base_backoff_ms))
            .user_agent(config.user_agent.clone())
            .build()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send a request, replaying it while the failure allows.
    ///
    /// The last response is returned whatever its status; an error is
    /// returned only when no response arrived.
    ///
    /// # Errors
    /// `Transport` when the final attempt got no response, `InvalidInput`
    /// when the request cannot be built.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, DirectoryError> {
        let mut pending = builder.build().map_err(into_directory_error)?;
        let method = pending.method().clone();
        let url = pending.url().clone();
        let mut attempt = 1;

        loop {
            // Streaming bodies cannot be cloned; those requests go out once.
            let spare = pending.try_clone();
            let outcome = self.client.execute(pending).await;

            let failure = match &outcome {
                Ok(response) => {
                    debug!(attempt, %method, %url, status = %response.status(), "response received");
                    Failure::of_status(response.status())
                }
                Err(err) => {
                    debug!(attempt, %method, %url, error = %err, "no response");
                    Failure::of_error(err)
                }
            };

            let replay = match failure {
                Some(failure) if attempt < self.max_attempts && failure.replayable(&method) => {
                    spare.map(|next| (failure, next))
                }
                _ => None,
            };
            let Some((failure, next)) = replay else {
                return outcome.map_err(into_directory_error);
            };

            warn!(attempt, %method, %url, ?failure, "replaying directory request");
            let delay = self.backoff_delay(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            pending = next;
            attempt += 1;
        }
    }

    /// Delay before replay number `retry` (1-based), doubling each time.
    fn backoff_delay(&self, retry: usize) -> Duration {
        let shift = retry.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }
}

fn into_directory_error(err: reqwest::Error) -> DirectoryError {
    InfraError::from(err).into()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        let defaults = HttpConfig::default();
        Self {
            timeout: Duration::from_secs(defaults.timeout_seconds),
            max_attempts: defaults.max_attempts,
            base_backoff: Duration::from_millis(defaults.base_backoff_ms),
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts per request, initial try included. Clamped to 1.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// Returns `DirectoryError::InvalidInput` if reqwest rejects the settings.
    pub fn build(self) -> Result<HttpClient, DirectoryError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        Ok(HttpClient {
            client: builder.build().map_err(into_directory_error)?,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use super::*;

    fn client(max_attempts: usize) -> HttpClient {
        HttpClient::builder()
            .base_backoff(Duration::from_millis(1))
            .max_attempts(max_attempts)
            .build()
            .expect("http client")
    }

    /// Answers 500 for the first `failures` calls, then `then`.
    fn failing_first(
        failures: usize,
        then: u16,
    ) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync + 'static {
        let calls = Arc::new(AtomicUsize::new(0));
        move |_req: &Request| {
            if calls.fetch_add(1, Ordering::SeqCst) < failures {
                ResponseTemplate::new(500)
            } else {
                ResponseTemplate::new(then)
            }
        }
    }

    #[tokio::test]
    async fn replays_reads_after_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/contoso/users/u1"))
            .respond_with(failing_first(2, 200))
            .expect(3)
            .mount(&server)
            .await;

        let client = client(3);
        let url = format!("{}/contoso/users/u1", server.uri());
        let response = client.send(client.request(Method::GET, url)).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn creates_are_sent_once_after_a_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contoso/groups"))
            .respond_with(failing_first(1, 201))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(3);
        let url = format!("{}/contoso/groups", server.uri());
        let response = client
            .send(client.request(Method::POST, url).json(&json!({ "displayName": "Team" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn patches_are_not_replayed() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(3);
        let response = client.send(client.request(Method::PATCH, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn deletes_stop_at_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(502))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(2);
        let response = client.send(client.request(Method::DELETE, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn client_errors_are_returned_first_time() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(3);
        let response = client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn refused_connections_surface_as_transport_errors() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(2);
        let result = client.send(client.request(Method::POST, format!("http://{addr}"))).await;

        match result {
            Err(DirectoryError::Transport { message }) => {
                assert!(message.to_lowercase().contains("http"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn only_unsent_requests_replay_regardless_of_method() {
        assert!(Failure::Unsent.replayable(&Method::POST));
        assert!(Failure::Unsent.replayable(&Method::PATCH));
        assert!(!Failure::Unknown.replayable(&Method::POST));
        assert!(!Failure::Unknown.replayable(&Method::PATCH));
        assert!(Failure::Unknown.replayable(&Method::GET));
        assert!(Failure::Unknown.replayable(&Method::PUT));
        assert!(Failure::Unknown.replayable(&Method::DELETE));
    }

    #[test]
    fn only_server_errors_count_as_failures() {
        assert_eq!(Failure::of_status(StatusCode::BAD_GATEWAY), Some(Failure::Unknown));
        assert_eq!(Failure::of_status(StatusCode::TOO_MANY_REQUESTS), None);
        assert_eq!(Failure::of_status(StatusCode::CREATED), None);
    }

    #[test]
    fn backoff_doubles_per_replay() {
        let client = HttpClient::builder().base_backoff(Duration::from_millis(100)).build().unwrap();
        assert_eq!(client.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(client.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(client.backoff_delay(3), Duration::from_millis(400));
    }

    #[test]
    fn from_config_clamps_attempts() {
        let config = HttpConfig { max_attempts: 0, ..HttpConfig::default() };
        let client = HttpClient::from_config(&config).unwrap();
        assert_eq!(client.max_attempts, 1);
    }
}
