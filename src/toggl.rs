use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::error::RequestError;

pub const DEFAULT_BASE_URL: &str = "https://www.toggl.com/api/v8";

/// Password the service expects alongside an API token in Basic auth.
const TOKEN_PASSWORD: &str = "api_token";

/// Sends one HTTP request to a REST API and hands back the raw response body.
///
/// `route` is relative to the requester's base URL and may carry a query
/// string. Implementations return the body of any 2xx response untouched,
/// including an empty one.
pub trait RestRequester: Send + Sync {
    fn request(
        &self,
        method: Method,
        route: &str,
        payload: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, RequestError>;
}

pub struct TogglRestClientBuilder {
    base_url: String,
    token: String,
    pause_between_requests: Duration,
    timeout: Option<Duration>,
    user_agent: String,
}

impl TogglRestClientBuilder {
    /// Minimum spacing between the start of two consecutive requests.
    pub fn pause_between_requests(mut self, pause: Duration) -> Self {
        self.pause_between_requests = pause;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<TogglRestClient, RequestError> {
        let mut builder = Client::builder().user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(RequestError::Setup)?;

        Ok(TogglRestClient {
            client,
            base_url: self.base_url,
            credentials: STANDARD.encode(format!("{}:{}", self.token, TOKEN_PASSWORD)),
            pause_between_requests: self.pause_between_requests,
            last_request: Mutex::new(None),
        })
    }
}

/// Blocking transport for the Toggl REST API.
///
/// Safe to share between threads; the spacing between requests holds across
/// all callers of one instance.
pub struct TogglRestClient {
    client: Client,
    base_url: String,
    credentials: String,
    pause_between_requests: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl TogglRestClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, RequestError> {
        Self::builder(base_url, token).build()
    }

    pub fn builder(base_url: impl Into<String>, token: impl Into<String>) -> TogglRestClientBuilder {
        TogglRestClientBuilder {
            base_url: base_url.into(),
            token: token.into(),
            pause_between_requests: Duration::ZERO,
            timeout: None,
            user_agent: concat!("togglapi/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn pause_between_requests(&self) -> Duration {
        self.pause_between_requests
    }

    fn url_for(&self, route: &str) -> String {
        join_url(&self.base_url, route)
    }

    // The lock is held while waiting so concurrent callers queue up behind
    // each other instead of all waking at the same instant.
    fn wait_for_turn(&self) {
        let mut last_request = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(previous) = *last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.pause_between_requests {
                let wait = self.pause_between_requests - elapsed;
                tracing::debug!(?wait, "throttling request");
                thread::sleep(wait);
            }
        }

        *last_request = Some(Instant::now());
    }
}

impl RestRequester for TogglRestClient {
    fn request(
        &self,
        method: Method,
        route: &str,
        payload: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, RequestError> {
        let url = self.url_for(route);
        self.wait_for_turn();

        tracing::debug!(%method, %url, "sending request");

        let mut request = self
            .client
            .request(method.clone(), url.as_str())
            .header(AUTHORIZATION, format!("Basic {}", self.credentials));
        if let Some(payload) = payload {
            request = request.header(CONTENT_TYPE, "application/json").body(payload);
        }

        let response = request.send().map_err(|err| RequestError::Transport {
            method: method.clone(),
            url: url.clone(),
            source: Box::new(err),
        })?;

        let status = response.status();
        let content = response.bytes().map_err(|err| RequestError::Transport {
            method: method.clone(),
            url: url.clone(),
            source: Box::new(err),
        })?;

        if !status.is_success() {
            tracing::warn!(%method, %url, status = status.as_u16(), "request rejected");
            return Err(RequestError::Api {
                method,
                url,
                status: status.as_u16(),
                status_line: status.to_string(),
                body: String::from_utf8_lossy(&content).into_owned(),
            });
        }

        tracing::trace!(%method, %url, bytes = content.len(), "received response");
        Ok(content.to_vec())
    }
}

fn join_url(base_url: &str, route: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        route.trim_start_matches('/')
    )
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_uses_a_single_slash() {
        assert_eq!(
            join_url("https://api.example.com/v8", "workspaces"),
            "https://api.example.com/v8/workspaces"
        );
        assert_eq!(
            join_url("https://api.example.com/v8/", "/workspaces/7/projects"),
            "https://api.example.com/v8/workspaces/7/projects"
        );
    }

    #[test]
    fn credentials_use_token_mode_password() {
        let client = TogglRestClient::new("http://api.example.com", "secret").unwrap();
        let decoded = STANDARD.decode(&client.credentials).unwrap();
        assert_eq!(decoded, b"secret:api_token");
    }

    #[test]
    fn builder_defaults_to_no_throttle() {
        let client = TogglRestClient::new(DEFAULT_BASE_URL, "token").unwrap();
        assert_eq!(client.pause_between_requests(), Duration::ZERO);
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);

        let throttled = TogglRestClient::builder(DEFAULT_BASE_URL, "token")
            .pause_between_requests(Duration::from_millis(33))
            .build()
            .unwrap();
        assert_eq!(throttled.pause_between_requests(), Duration::from_millis(33));
    }

    #[test]
    fn wait_for_turn_spaces_consecutive_calls() {
        let client = TogglRestClient::builder(DEFAULT_BASE_URL, "token")
            .pause_between_requests(Duration::from_millis(20))
            .build()
            .unwrap();
        let started = Instant::now();
        client.wait_for_turn();
        client.wait_for_turn();
        client.wait_for_turn();
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
