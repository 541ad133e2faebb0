//! Document loading over blocking HTTP.

use tracing::{debug, info};
use ureq::Agent;

use crate::error::{LoadError, LoadErrorKind};

/// User-Agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("rsub/", env!("CARGO_PKG_VERSION"));

/// Source of raw documents.
pub trait Loader {
    /// Load every document in source order.
    ///
    /// On failure, documents loaded so far travel inside the error.
    fn load(&self) -> Result<Vec<String>, LoadError>;
}

/// Create the HTTP agent used by [`HttpLoader`].
///
/// Error statuses are returned as ordinary responses so that a 404 page is
/// loaded like any other body. No timeout is set.
pub fn create_agent() -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into()
}

/// Fetches each URL with a GET request, one after another.
pub struct HttpLoader {
    agent: Agent,
    urls: Vec<String>,
    user_agent: String,
}

impl HttpLoader {
    /// Create a loader for `urls`.
    ///
    /// The list is expected to be non-empty; callers validate it.
    #[must_use]
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            agent: create_agent(),
            urls,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Use a preconfigured agent.
    #[must_use]
    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agent = agent;
        self
    }

    /// Override the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Configured source URLs.
    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    fn fetch(&self, url: &str) -> Result<String, (LoadErrorKind, ureq::Error)> {
        let response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| (LoadErrorKind::Fetch, e))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();
        let bytes = body
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| (LoadErrorKind::Read, e))?;

        debug!("{} returned {} ({} bytes)", url, status, bytes.len());
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Loader for HttpLoader {
    fn load(&self) -> Result<Vec<String>, LoadError> {
        let mut documents = Vec::with_capacity(self.urls.len());
        for url in &self.urls {
            info!("Fetching {}", url);
            match self.fetch(url) {
                Ok(text) => documents.push(text),
                Err((kind, source)) => return Err(LoadError::new(url, kind, documents, source)),
            }
        }
        Ok(documents)
    }
}
